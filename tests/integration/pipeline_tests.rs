/*!
 * End-to-end tests for the highlight analysis pipeline
 */

use plotclip::analysis::HighlightPipeline;
use plotclip::analysis::cache::ScoreCache;
use plotclip::app_config::{Config, RescoringConfig};
use plotclip::providers::mock::MockProvider;
use plotclip::rescorer::AiRescorer;

use crate::common;

fn rescorer_with(provider: MockProvider) -> AiRescorer {
    let config = RescoringConfig {
        enabled: true,
        rule_weight: 0.6,
        adaptive_rule_weight: false,
        timeout_secs: 5,
        ..RescoringConfig::default()
    };
    AiRescorer::new(Box::new(provider), &config)
}

/// Test that a conflict-heavy episode yields a refined conflict clip
#[tokio::test]
async fn test_analyze_withConflictEpisode_shouldProduceRefinedClip() {
    let config = Config::default();
    let pipeline = HighlightPipeline::new(&config);
    let episode = common::conflict_episode(200, 60..90);

    let clips = pipeline.analyze(&episode, None).await;

    assert!(!clips.is_empty());
    assert!(clips.len() <= config.selection.max_clips);
    for clip in &clips {
        assert_eq!(clip.category, "key_conflict");
        assert!(clip.score >= 15.0);
        assert!(clip.start_index < clip.end_index);
        assert!(clip.end_index <= episode.len());
        assert_eq!(clip.start_time_ms, episode[clip.start_index].start_time_ms);
        assert_eq!(clip.end_time_ms, episode[clip.end_index - 1].end_time_ms);
    }
}

/// Test that a dead provider degrades to exactly the rule-only result
#[tokio::test]
async fn test_analyze_withFailingProvider_shouldMatchRuleOnlyResult() {
    let config = Config::default();
    let episode = common::conflict_episode(200, 60..90);

    // Separate pipelines so the cache cannot mask the comparison
    let rule_pipeline = HighlightPipeline::new(&config);
    let expected = rule_pipeline.analyze_rules_only(&episode);

    let degraded_pipeline = HighlightPipeline::new(&config);
    let rescorer = rescorer_with(MockProvider::failing());
    let actual = degraded_pipeline.analyze(&episode, Some(&rescorer)).await;

    assert_eq!(expected.len(), actual.len());
    for (e, a) in expected.iter().zip(actual.iter()) {
        assert_eq!(e.start_index, a.start_index);
        assert_eq!(e.end_index, a.end_index);
        assert_eq!(e.category, a.category);
        assert!((e.score - a.score).abs() < 1e-9);
    }
}

/// Test that a working provider changes scores without inventing clips
#[tokio::test]
async fn test_analyze_withScoringProvider_shouldRerankNotInvent() {
    let config = Config::default();
    let episode = common::conflict_episode(200, 60..90);

    let rule_pipeline = HighlightPipeline::new(&config);
    let rule_clips = rule_pipeline.analyze_rules_only(&episode);

    let blended_pipeline = HighlightPipeline::new(&config);
    let rescorer = rescorer_with(MockProvider::scoring(10.0));
    let blended_clips = blended_pipeline.analyze(&episode, Some(&rescorer)).await;

    assert_eq!(rule_clips.len(), blended_clips.len());
    for (r, b) in rule_clips.iter().zip(blended_clips.iter()) {
        assert_eq!(r.category, b.category);
        // Blending toward a 10-point scale pulls large rule scores down
        assert!(b.score < r.score);
    }
}

/// Test that a second analysis of the same episode hits the cache
#[tokio::test]
async fn test_analyze_withRepeatedEpisode_shouldHitCache() {
    let config = Config::default();
    let pipeline = HighlightPipeline::new(&config);
    let episode = common::conflict_episode(200, 60..90);

    let first = pipeline.analyze(&episode, None).await;
    let second = pipeline.analyze(&episode, None).await;

    assert_eq!(first.len(), second.len());
    let (hits, misses, _) = pipeline.cache().stats();
    assert_eq!(hits, 1);
    assert_eq!(misses, 1);
}

/// Test that pipelines can share one cache across instances
#[tokio::test]
async fn test_with_cache_shouldShareEntriesBetweenPipelines() {
    let config = Config::default();
    let cache = ScoreCache::default();
    let episode = common::conflict_episode(200, 60..90);

    let first = HighlightPipeline::with_cache(&config, cache.clone());
    first.analyze(&episode, None).await;

    let second = HighlightPipeline::with_cache(&config, cache.clone());
    second.analyze(&episode, None).await;

    let (hits, misses, _) = cache.stats();
    assert_eq!(hits, 1);
    assert_eq!(misses, 1);
}
