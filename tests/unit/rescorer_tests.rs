/*!
 * Tests for AI rescoring and provider reply handling
 */

use plotclip::app_config::RescoringConfig;
use plotclip::providers::mock::MockProvider;
use plotclip::rescorer::AiRescorer;

const WINDOW_TEXT: &str = "双方在法庭上激烈冲突，律师出示了关键证据！";

fn rescoring_config(rule_weight: f64, adaptive: bool) -> RescoringConfig {
    RescoringConfig {
        enabled: true,
        rule_weight,
        adaptive_rule_weight: adaptive,
        timeout_secs: 5,
        ..RescoringConfig::default()
    }
}

/// Test blending with a provider that replies in a ```json fence
#[tokio::test]
async fn test_rescore_withFencedJsonReply_shouldBlend() {
    let config = rescoring_config(0.6, false);
    let rescorer = AiRescorer::new(Box::new(MockProvider::fenced_json(8.0)), &config);

    let blended = rescorer.rescore(WINDOW_TEXT, "key_conflict", 30.0, None).await;
    // 30 * 0.6 + 8 * 0.4
    assert!((blended - 21.2).abs() < 1e-9);
}

/// Test blending with a provider that replies with a bare JSON object
#[tokio::test]
async fn test_rescore_withBareJsonReply_shouldBlend() {
    let config = rescoring_config(0.5, false);
    let rescorer = AiRescorer::new(Box::new(MockProvider::bare_json(6.0)), &config);

    let blended = rescorer.rescore(WINDOW_TEXT, "key_conflict", 20.0, None).await;
    assert!((blended - 13.0).abs() < 1e-9);
}

/// Test that a confident genre shifts weight toward the provider score
#[tokio::test]
async fn test_rescore_withConfidentGenre_shouldUseAdaptiveWeight() {
    let config = rescoring_config(0.6, true);
    let rescorer = AiRescorer::new(Box::new(MockProvider::scoring(10.0)), &config);

    let cautious = rescorer.rescore(WINDOW_TEXT, "key_conflict", 30.0, Some(0.5)).await;
    let confident = rescorer.rescore(WINDOW_TEXT, "key_conflict", 30.0, Some(0.9)).await;

    // 30 * 0.6 + 10 * 0.4 vs 30 * 0.4 + 10 * 0.6
    assert!((cautious - 22.0).abs() < 1e-9);
    assert!((confident - 18.0).abs() < 1e-9);
}

/// Test that an empty reply keeps the rule score
#[tokio::test]
async fn test_rescore_withEmptyReply_shouldKeepRuleScore() {
    let config = rescoring_config(0.6, false);
    let rescorer = AiRescorer::new(Box::new(MockProvider::empty()), &config);

    let score = rescorer.rescore(WINDOW_TEXT, "key_conflict", 25.0, None).await;
    assert!((score - 25.0).abs() < 1e-9);
}

/// Test that intermittent failures only degrade the failing requests
#[tokio::test]
async fn test_rescore_withIntermittentProvider_shouldDegradePerRequest() {
    let config = rescoring_config(0.6, false);
    let provider = MockProvider::intermittent(10.0, 2);
    let rescorer = AiRescorer::new(Box::new(provider.clone()), &config);

    // Request 1 succeeds, request 2 fails, request 3 succeeds again
    let first = rescorer.rescore(WINDOW_TEXT, "key_conflict", 20.0, None).await;
    let second = rescorer.rescore(WINDOW_TEXT, "key_conflict", 20.0, None).await;
    let third = rescorer.rescore(WINDOW_TEXT, "key_conflict", 20.0, None).await;

    assert!((first - 16.0).abs() < 1e-9);
    assert!((second - 20.0).abs() < 1e-9);
    assert!((third - 16.0).abs() < 1e-9);
    assert_eq!(provider.request_count(), 3);
}

/// Test connection probing through the rescorer
#[tokio::test]
async fn test_test_connection_shouldReflectProviderHealth() {
    let config = rescoring_config(0.6, false);

    let healthy = AiRescorer::new(Box::new(MockProvider::scoring(5.0)), &config);
    assert!(healthy.test_connection().await.is_ok());

    let dead = AiRescorer::new(Box::new(MockProvider::failing()), &config);
    assert!(dead.test_connection().await.is_err());
}
