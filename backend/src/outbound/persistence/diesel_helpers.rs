//! Small helpers shared by the Diesel repositories.

use std::fmt::Display;

use uuid::Uuid;

/// `ILIKE` pattern matching any value that contains `needle`.
///
/// `%`, `_` and `\` in the needle are escaped so they match literally.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Message for a stored row that no longer satisfies domain validation.
pub(crate) fn corrupt_row(table: &str, id: Uuid, column: &str, error: impl Display) -> String {
    format!("{table} row {id} has invalid {column}: {error}")
}
