//! Turns raw OCR output into a label usable as a filename

use regex::Regex;
use std::sync::OnceLock;

/// Leading run of non-digit characters
fn re_leading_non_digits() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"^\D*").expect("invalid regex"))
}

/// Clean up OCR text for use as a filename stem
///
/// Slashes become dashes, line and form feeds disappear, backslashes become
/// colons, and every colon-separated segment is trimmed up to its first digit.
/// Surrounding whitespace is only stripped when `trim` is set; the historical
/// behaviour keeps it.
pub fn sanitize_label(raw: &str, trim: bool) -> String {
    let mut text = raw.replace('/', "-");
    if trim {
        text = text.trim().to_string();
    }

    let text: String = text.chars().filter(|c| !matches!(c, '\n' | '\x0c')).collect();
    let text = text.replace('\\', ":");

    normalize_colon_segments(&text)
}

/// Drop everything before the first digit of each `:`-separated segment
///
/// A segment without any digit becomes empty: `"x:ab:1"` -> `"::1"`.
pub fn normalize_colon_segments(text: &str) -> String {
    text.split(':')
        .map(|segment| re_leading_non_digits().replace(segment, ""))
        .collect::<Vec<_>>()
        .join(":")
}
