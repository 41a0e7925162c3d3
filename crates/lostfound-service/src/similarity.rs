//! Normalized edit-distance similarity between short texts.
//!
//! Used by the candidate matcher to compare item titles. Comparison is
//! case-insensitive and counts Unicode scalar values, not bytes.

/// Similarity of `a` and `b` in `[0, 1]`.
///
/// Returns `(len(longer) - distance) / len(longer)` where `distance` is the
/// Levenshtein distance between the lowercased strings, and `1.0` when both
/// are empty.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let (longer, shorter) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    if longer.is_empty() {
        return 1.0;
    }

    let distance = levenshtein(&longer, &shorter);
    (longer.len() - distance) as f64 / longer.len() as f64
}

/// Edit distance with unit costs, using a single reusable row.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }

    row[b.len()]
}
