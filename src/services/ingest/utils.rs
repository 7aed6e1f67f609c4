use std::collections::HashSet;

/// Turns a raw header cell into a usable, unique column name. Names stay
/// human-readable since they end up in chart labels; only blanks and
/// duplicates are rewritten.
pub fn clean_column_name(name: &str, position: usize, existing_names: &mut HashSet<String>) -> String {
    let trimmed = name.trim();
    let base_name = if trimmed.is_empty() {
        format!("column_{}", position + 1)
    } else {
        trimmed.to_string()
    };

    // If the name already exists, add a numeric suffix
    let mut cleaned = base_name.clone();
    let mut counter = 1;
    while !existing_names.insert(cleaned.clone()) {
        cleaned = format!("{}_{}", base_name, counter);
        counter += 1;
    }

    cleaned
}

pub fn clean_headers<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut existing_names = HashSet::new();
    raw.into_iter()
        .enumerate()
        .map(|(idx, name)| clean_column_name(name, idx, &mut existing_names))
        .collect()
}
