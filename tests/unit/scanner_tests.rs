/*!
 * Tests for the sliding-window scan
 */

use plotclip::analysis::{ImportanceScorer, WindowScanner};
use plotclip::app_config::{Config, RescoringConfig};
use plotclip::providers::mock::MockProvider;
use plotclip::rescorer::AiRescorer;

use crate::common;

/// Test that the scan finds the conflict stretch of an episode
#[test]
fn test_scan_withConflictStretch_shouldYieldKeyConflictCandidates() {
    let config = Config::default();
    let scorer = ImportanceScorer::new(&config.categories, &config.scoring.weights, None);
    let scanner = WindowScanner::new(&scorer, &config.scan);

    let episode = common::conflict_episode(200, 60..90);
    let candidates = scanner.scan(&episode);

    assert!(!candidates.is_empty());
    for candidate in &candidates {
        assert_eq!(config.categories[candidate.category_index].name, "key_conflict");
        assert!(candidate.end_index > 60 && candidate.start_index < 90);
        assert_eq!(candidate.end_index - candidate.start_index, 25);
    }
}

/// Test that a quiet episode produces no candidates
#[test]
fn test_scan_withQuietEpisode_shouldYieldNothing() {
    let config = Config::default();
    let scorer = ImportanceScorer::new(&config.categories, &config.scoring.weights, None);
    let scanner = WindowScanner::new(&scorer, &config.scan);

    let episode = common::conflict_episode(100, 0..0);
    assert!(scanner.scan(&episode).is_empty());
}

/// Test that rescoring blends the rule score with the provider score
#[tokio::test]
async fn test_scan_with_withScoringProvider_shouldBlendScores() {
    let config = Config::default();
    let scorer = ImportanceScorer::new(&config.categories, &config.scoring.weights, None);
    let scanner = WindowScanner::new(&scorer, &config.scan);

    let rescoring = RescoringConfig {
        rule_weight: 0.6,
        adaptive_rule_weight: false,
        timeout_secs: 5,
        ..RescoringConfig::default()
    };
    let rescorer = AiRescorer::new(Box::new(MockProvider::scoring(10.0)), &rescoring);

    let episode = common::conflict_episode(200, 60..90);
    let rule_only = scanner.scan(&episode);
    let blended = scanner.scan_with(&episode, &rescorer).await;

    assert_eq!(rule_only.len(), blended.len());
    for (r, b) in rule_only.iter().zip(blended.iter()) {
        assert_eq!(r.start_index, b.start_index);
        assert!((b.score - (r.score * 0.6 + 10.0 * 0.4)).abs() < 1e-9);
    }
}

/// Test that a dead provider leaves the rule-only result untouched
#[tokio::test]
async fn test_scan_with_withFailingProvider_shouldMatchRuleOnlyScan() {
    let config = Config::default();
    let scorer = ImportanceScorer::new(&config.categories, &config.scoring.weights, None);
    let scanner = WindowScanner::new(&scorer, &config.scan);

    let rescoring = RescoringConfig {
        timeout_secs: 5,
        ..RescoringConfig::default()
    };
    let rescorer = AiRescorer::new(Box::new(MockProvider::failing()), &rescoring);

    let episode = common::conflict_episode(200, 60..90);
    let rule_only = scanner.scan(&episode);
    let degraded = scanner.scan_with(&episode, &rescorer).await;

    assert_eq!(rule_only.len(), degraded.len());
    for (r, d) in rule_only.iter().zip(degraded.iter()) {
        assert_eq!(r.start_index, d.start_index);
        assert!((r.score - d.score).abs() < 1e-9);
    }
}
