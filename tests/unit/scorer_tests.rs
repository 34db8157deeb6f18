/*!
 * Tests for rule-based window scoring
 */

use plotclip::analysis::{DetectedGenre, ImportanceScorer};
use plotclip::app_config::Config;

/// Test keyword scoring with the default category table
#[test]
fn test_score_withRepeatedKeyword_shouldScaleWithWeight() {
    let config = Config::default();
    let scorer = ImportanceScorer::new(&config.categories, &config.scoring.weights, None);

    // 发现 belongs to clue_reveal (weight 8); three hits give at least 24
    let clue_idx = config
        .categories
        .iter()
        .position(|c| c.name == "clue_reveal")
        .unwrap();
    let scores = scorer.score("他发现了什么 她发现了什么 大家都发现了", 0.5);
    assert!(scores[clue_idx] >= 24.0);
}

/// Test that the best category is picked deterministically
#[test]
fn test_best_category_withConflictText_shouldPickKeyConflict() {
    let config = Config::default();
    let scorer = ImportanceScorer::new(&config.categories, &config.scoring.weights, None);

    let (idx, score) = scorer.best_category("双方冲突激烈 争执不断！", 0.5);
    assert_eq!(config.categories[idx].name, "key_conflict");
    // 冲突 + 争执 + 激烈 at weight 10, plus one exclamation
    assert!((score - 33.0).abs() < 1e-9);
}

/// Test the positional edge boost against an identical middle window
#[test]
fn test_score_withEdgePositions_shouldApplyBoost() {
    let config = Config::default();
    let scorer = ImportanceScorer::new(&config.categories, &config.scoring.weights, None);

    let text = "他们发现了关键证据";
    let middle = scorer.best_category(text, 0.5).1;
    let opening = scorer.best_category(text, 0.05).1;
    let closing = scorer.best_category(text, 0.95).1;

    assert!((opening - middle * 1.3).abs() < 1e-9);
    assert!((closing - middle * 1.3).abs() < 1e-9);
    // The band edges themselves are not boosted
    let at_band = scorer.best_category(text, 0.2).1;
    assert!((at_band - middle).abs() < 1e-9);
}

/// Test that a detected genre raises every category uniformly
#[test]
fn test_score_withDetectedGenre_shouldAddConfidenceScaledBonus() {
    let config = Config::default();
    let genre = DetectedGenre {
        name: "legal".to_string(),
        keywords: vec!["法庭".to_string(), "律师".to_string(), "证据".to_string()],
        confidence: 0.5,
    };

    let plain = ImportanceScorer::new(&config.categories, &config.scoring.weights, None);
    let with_genre =
        ImportanceScorer::new(&config.categories, &config.scoring.weights, Some(&genre));

    let text = "法庭上律师出示了证据";
    let base = plain.score(text, 0.5);
    let boosted = with_genre.score(text, 0.5);

    // Three distinct genre keywords * 5.0 bonus * 0.5 confidence
    for (b, p) in boosted.iter().zip(base.iter()) {
        assert!((b - p - 7.5).abs() < 1e-9);
    }
}
