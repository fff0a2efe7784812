//! Text formatting for titles, author lists and intro paragraphs

use crate::field::Field;

/// Replace characters that are unsafe in file paths.
///
/// `/`, `\` and `:` become a full-width comma, double quotes become a space.
/// Applying it twice gives the same result as applying it once.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '，',
            '"' => ' ',
            other => other,
        })
        .collect()
}

/// File name for a record, derived from its title
pub fn file_name(title: &str) -> Field<String> {
    Field::text(sanitize_title(title.trim()))
}

/// Join author names with ", " and wrap the result in double quotes
pub fn format_authors(authors: &[String]) -> Field<String> {
    let names: Vec<&str> = authors
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        return Field::Unknown;
    }
    Field::Known(format!("\"{}\"", names.join(", ")))
}

/// Backslash-escape asterisk, underscore, backtick, tilde and hyphen so
/// intro text renders literally in markdown
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '_' | '`' | '~' | '-') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
