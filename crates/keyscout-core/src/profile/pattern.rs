use indexmap::IndexMap;

use crate::table::value::Value;

/// Reduce a string to its character-class shape.
///
/// ASCII uppercase letters become `A`, lowercase letters `a` and digits `9`;
/// every other character is kept. The classes are disjoint, so the result
/// does not depend on replacement order, and simplifying an already
/// simplified string returns it unchanged.
pub fn simplify(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                'A'
            } else if c.is_ascii_lowercase() {
                'a'
            } else if c.is_ascii_digit() {
                '9'
            } else {
                c
            }
        })
        .collect()
}

/// Dominant structural pattern among the leading string values.
///
/// Takes at most `sample_size` values in column order, keeps those stored
/// as strings and returns the most frequent simplified shape. On a tie the
/// shape first seen in the scan wins.
/// Returns `None` when the sample holds no strings.
pub fn infer_pattern<'a, I>(values: I, sample_size: usize) -> Option<String>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for value in values.into_iter().take(sample_size).filter_map(Value::as_str) {
        *counts.entry(simplify(value)).or_default() += 1;
    }
    let max = counts.values().copied().max()?;

    counts
        .into_iter()
        .find(|&(_, count)| count == max)
        .map(|(pattern, _)| pattern)
}
