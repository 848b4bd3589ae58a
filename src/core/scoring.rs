use std::collections::HashMap;

/// Tokenize a comma-separated interest list
///
/// Tokens are trimmed and lower-cased; empty tokens are dropped.
/// Duplicates are kept because repetition weighs into the similarity score.
pub fn normalize_interests(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Frequency of each distinct token in an interest sequence
pub fn interest_vector<S: AsRef<str>>(interests: &[S]) -> HashMap<&str, u64> {
    let mut counts = HashMap::with_capacity(interests.len());
    for token in interests {
        *counts.entry(token.as_ref()).or_insert(0) += 1;
    }
    counts
}

/// Cosine similarity of two interest frequency vectors, in `[0, 1]`
///
/// score = dot(A, B) / (|A| * |B|)
///
/// Counts are accumulated as integers, so the score is exactly symmetric and
/// an interest sequence compared with itself scores exactly `1.0`.
/// Returns `0.0` when either side has no interests.
pub fn cosine_similarity<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> f64 {
    let vec_a = interest_vector(a);
    let vec_b = interest_vector(b);

    let norm_a_sq: u64 = vec_a.values().map(|c| c * c).sum();
    let norm_b_sq: u64 = vec_b.values().map(|c| c * c).sum();
    if norm_a_sq == 0 || norm_b_sq == 0 {
        return 0.0;
    }

    // Tokens missing from either side contribute nothing to the dot product
    let dot: u64 = vec_a
        .iter()
        .filter_map(|(token, count_a)| vec_b.get(token).map(|count_b| count_a * count_b))
        .sum();

    let magnitude = ((norm_a_sq as f64) * (norm_b_sq as f64)).sqrt();
    (dot as f64 / magnitude).clamp(0.0, 1.0)
}
