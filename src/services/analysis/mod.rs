pub mod analyzer;
pub mod charts;
pub mod detector;
pub mod types;
pub mod utils;

pub use analyzer::{analyse, analyse_at, profile_columns};
pub use charts::suggest_charts;
pub use detector::{detect_column_type, TYPE_DETECTION_THRESHOLD};
pub use types::*;
