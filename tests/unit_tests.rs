// Unit tests for Pairwire scoring

use pairwire::core::scoring::{cosine_similarity, normalize_interests};

fn samples() -> Vec<Vec<String>> {
    [
        "music, hiking, reading",
        "music, hiking",
        "music",
        "music, music, music, hiking",
        "chess, golf",
        "Reading , MUSIC",
        "a, b, c, d, e, f, g",
        "a, a, b, b",
        "a, b",
        "surfing",
    ]
    .iter()
    .map(|raw| normalize_interests(raw))
    .collect()
}

#[test]
fn test_score_is_symmetric() {
    let samples = samples();
    for a in &samples {
        for b in &samples {
            assert_eq!(
                cosine_similarity(a, b),
                cosine_similarity(b, a),
                "asymmetric score for {:?} / {:?}",
                a,
                b
            );
        }
    }
}

#[test]
fn test_score_within_unit_range() {
    let samples = samples();
    for a in &samples {
        for b in &samples {
            let score = cosine_similarity(a, b);
            assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
        }
    }
}

#[test]
fn test_self_score_is_one() {
    for a in samples() {
        assert_eq!(cosine_similarity(&a, &a), 1.0, "self score for {:?}", a);
    }
}

#[test]
fn test_no_shared_tokens_scores_zero() {
    let a = normalize_interests("music, hiking");
    let b = normalize_interests("chess, golf, golf");
    assert_eq!(cosine_similarity(&a, &b), 0.0);
}

#[test]
fn test_empty_interests_score_zero() {
    let a = normalize_interests("music");
    let empty: Vec<String> = Vec::new();
    assert_eq!(cosine_similarity(&a, &empty), 0.0);
    assert_eq!(cosine_similarity(&empty, &a), 0.0);
}

#[test]
fn test_partial_overlap_is_strictly_between() {
    let alice = normalize_interests("music, hiking, reading");
    let bob = normalize_interests("music, hiking");
    let score = cosine_similarity(&alice, &bob);
    assert!(score > 0.0 && score < 1.0, "expected partial score, got {}", score);
}

#[test]
fn test_normalization_makes_case_irrelevant() {
    let a = normalize_interests("Music, HIKING");
    let b = normalize_interests("music,hiking ");
    assert_eq!(a, b);
    assert_eq!(cosine_similarity(&a, &b), 1.0);
}

#[test]
fn test_repeated_interests_carry_weight() {
    let fan = normalize_interests("music, music, music, hiking");
    let musician = normalize_interests("music");
    let hiker = normalize_interests("hiking");
    assert!(cosine_similarity(&fan, &musician) > cosine_similarity(&fan, &hiker));
}
