//! Joiners for generated text.

use std::fmt::Display;

/// Joins items with `, `.
pub fn comma<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    with(items, ", ")
}

/// Joins items with ` AND `.
pub fn and<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    with(items, " AND ")
}

/// Joins items with an arbitrary delimiter.
pub fn with<I>(items: I, delimiter: &str) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push_str(delimiter);
        }
        out.push_str(&item.to_string());
    }
    out
}

/// `n` copies of `item` joined with `, `, e.g. `?, ?, ?`.
pub fn repeat_comma(item: &str, n: usize) -> String {
    comma(std::iter::repeat(item).take(n))
}
