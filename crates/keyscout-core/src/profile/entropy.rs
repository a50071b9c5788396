use std::collections::HashMap;

/// Shannon entropy (base 2) of a multiset of values, rounded to 4 places.
///
/// An empty input has entropy 0.0, as does a single repeated value.
/// `n` pairwise-distinct values give `log2(n)`.
pub fn shannon_entropy<S: AsRef<str>>(values: &[S]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value.as_ref()).or_default() += 1;
    }

    let total = values.len() as f64;
    let entropy: f64 = counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum();

    round_to(entropy, 4)
}

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    // -0.0 from a single-valued column would otherwise print as "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
