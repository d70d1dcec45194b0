/// Used when the quiz title has nothing usable left after cleaning.
pub const DEFAULT_EXPORT_NAME: &str = "Moodle_Quiz_Export";
const MAX_TITLE_CHARS: usize = 50;

/// `{cleaned title}.csv`, keeping ASCII letters, digits, `_` and spaces.
pub fn export_filename(title: Option<&str>) -> String {
    format!("{}.csv", export_stem(title.unwrap_or_default()))
}

fn export_stem(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '_' => Some(c),
            c if c.is_whitespace() => Some(' '),
            _ => None,
        })
        .take(MAX_TITLE_CHARS)
        .collect();
    let mut stem = cleaned.trim().to_string();
    if stem.is_empty() {
        return DEFAULT_EXPORT_NAME.to_string();
    }
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    stem
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
