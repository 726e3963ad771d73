/// Render an optional integer column, `-` when NULL
pub fn format_optional(value: Option<i64>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "-".to_string(),
    }
}

/// Left-align `text` in a cell of `width` characters
pub fn pad_cell(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}
