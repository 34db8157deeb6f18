/*!
 * AI rescoring of candidate windows.
 *
 * A window's rule-based score can be blended with a 0-10 judgment from an
 * LLM provider. The provider reply is parsed leniently (fenced JSON, bare
 * JSON, or a bare number); anything unusable degrades to the rule score,
 * so a provider outage never changes which windows exist, only how they
 * rank.
 */

use std::time::Duration;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::{RescoringConfig, ScoreProviderKind};
use crate::providers::ScoreProvider;
use crate::providers::ollama::Ollama;
use crate::providers::openai::OpenAI;

/// Genre confidence above which the rule signal yields weight to the AI
const ADAPTIVE_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Rule weight used once the genre is confidently known
const ADAPTIVE_RULE_WEIGHT: f64 = 0.4;

/// Upper bound of the AI score scale
const MAX_AI_SCORE: f64 = 10.0;

/// Windows shorter than this are not worth a provider round trip
const MIN_TEXT_CHARS: usize = 10;

/// Window text is truncated to this many characters in the prompt
const MAX_TEXT_CHARS: usize = 500;

static SCORE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+\.?\d*)").unwrap());

/// Outcome of parsing a provider reply
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedScore {
    /// A JSON object carried a numeric `score` field
    Structured(f64),
    /// The reply was (or contained) a bare number
    RawNumber(f64),
    /// Nothing numeric could be extracted
    Unavailable,
}

/// Blends rule-based window scores with provider judgments
pub struct AiRescorer {
    provider: Box<dyn ScoreProvider>,
    timeout_secs: u64,
    rule_weight: f64,
    adaptive_rule_weight: bool,
}

impl AiRescorer {
    /// Create a rescorer over an existing provider
    pub fn new(provider: Box<dyn ScoreProvider>, config: &RescoringConfig) -> Self {
        Self {
            provider,
            timeout_secs: config.timeout_secs,
            rule_weight: config.rule_weight,
            adaptive_rule_weight: config.adaptive_rule_weight,
        }
    }

    /// Create a rescorer with the provider named in the configuration
    pub fn from_config(config: &RescoringConfig) -> Self {
        let provider: Box<dyn ScoreProvider> = match config.provider {
            ScoreProviderKind::Ollama => Box::new(Ollama::new(
                config.get_endpoint(),
                config.get_model(),
                config.timeout_secs,
            )),
            ScoreProviderKind::OpenAI => Box::new(OpenAI::new(
                config.api_key.clone(),
                config.get_endpoint(),
                config.get_model(),
                config.timeout_secs,
            )),
        };
        Self::new(provider, config)
    }

    /// Test the underlying provider connection
    pub async fn test_connection(&self) -> Result<(), crate::errors::ProviderError> {
        self.provider.test_connection().await
    }

    /// Score a window with the provider and blend with the rule score.
    ///
    /// Any failure (transport, timeout, unusable reply, zero score) returns
    /// the rule score unchanged.
    pub async fn rescore(
        &self,
        text: &str,
        category_name: &str,
        rule_score: f64,
        genre_confidence: Option<f64>,
    ) -> f64 {
        if text.chars().count() < MIN_TEXT_CHARS {
            return rule_score;
        }

        let prompt = build_prompt(text, category_name);
        let reply = match tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            self.provider.send(&prompt),
        )
        .await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                warn!("{} rescoring failed, keeping rule score: {}", self.provider.name(), e);
                return rule_score;
            }
            Err(_) => {
                warn!(
                    "{} rescoring timed out after {}s, keeping rule score",
                    self.provider.name(),
                    self.timeout_secs
                );
                return rule_score;
            }
        };

        let ai_score = match parse_score(&reply) {
            ParsedScore::Structured(s) | ParsedScore::RawNumber(s) => s,
            ParsedScore::Unavailable => {
                warn!(
                    "Unusable {} reply, keeping rule score: '{}'",
                    self.provider.name(),
                    reply.chars().take(80).collect::<String>()
                );
                return rule_score;
            }
        };

        if ai_score <= 0.0 {
            return rule_score;
        }

        let rule_weight = self.effective_rule_weight(genre_confidence);
        let blended = rule_score * rule_weight + ai_score * (1.0 - rule_weight);
        debug!(
            "Blended score {:.1} (rule {:.1} x {:.1} + ai {:.1} x {:.1})",
            blended,
            rule_score,
            rule_weight,
            ai_score,
            1.0 - rule_weight
        );
        blended
    }

    /// The rule weight in effect for a given genre confidence.
    ///
    /// A confidently detected genre means the category keyword tables fit
    /// the show well, so the rule signal can afford to yield weight.
    pub fn effective_rule_weight(&self, genre_confidence: Option<f64>) -> f64 {
        match genre_confidence {
            Some(c) if self.adaptive_rule_weight && c > ADAPTIVE_CONFIDENCE_THRESHOLD => {
                ADAPTIVE_RULE_WEIGHT
            }
            _ => self.rule_weight,
        }
    }
}

impl std::fmt::Debug for AiRescorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiRescorer")
            .field("provider", &self.provider.name())
            .field("timeout_secs", &self.timeout_secs)
            .field("rule_weight", &self.rule_weight)
            .finish()
    }
}

/// Build the fixed-format scoring prompt for a window
fn build_prompt(text: &str, category_name: &str) -> String {
    let text: String = if text.chars().count() > MAX_TEXT_CHARS {
        let truncated: String = text.chars().take(MAX_TEXT_CHARS).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    };

    format!(
        "你是专业的电视剧剪辑师，专注于识别精彩片段。\n\n\
         该片段的候选剧情类型为「{}」，请评估以下对话片段的剪辑价值：\n\
         \"{}\"\n\n\
         评估标准：\n\
         1. 剧情重要性(0-2分)：是否推进主要故事线，包含关键信息\n\
         2. 戏剧张力(0-2分)：是否包含冲突、转折、意外发现\n\
         3. 情感共鸣(0-2分)：是否引发观众情感反应，有感人或震撼时刻\n\
         4. 角色发展(0-2分)：是否展现角色成长、关系变化、重要决定\n\
         5. 观众吸引力(0-2分)：是否制造悬念、幽默、紧张感\n\n\
         请根据以上标准给出0-10分的综合评分。\n\
         只需要输出数字，例如：8.5",
        category_name, text
    )
}

/// Parse a provider reply into a score.
///
/// Tried in order: JSON inside a ```json fence, any bare JSON object with
/// a `score` field, then the first bare number anywhere in the reply.
pub fn parse_score(reply: &str) -> ParsedScore {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return ParsedScore::Unavailable;
    }

    let candidate = strip_fences(trimmed);

    if let Some(open) = candidate.find('{') {
        if let Some(close) = candidate.rfind('}') {
            if close > open {
                if let Ok(value) =
                    serde_json::from_str::<serde_json::Value>(&candidate[open..=close])
                {
                    if let Some(score) = value.get("score").and_then(|v| v.as_f64()) {
                        return ParsedScore::Structured(score.clamp(0.0, MAX_AI_SCORE));
                    }
                }
            }
        }
    }

    if let Some(capture) = SCORE_REGEX.captures(candidate) {
        if let Ok(score) = capture[1].parse::<f64>() {
            return ParsedScore::RawNumber(score.clamp(0.0, MAX_AI_SCORE));
        }
    }

    ParsedScore::Unavailable
}

/// Strip a ```json or plain ``` fence around the reply, if any
fn strip_fences(text: &str) -> &str {
    if let Some(start) = text.find("```json") {
        let rest = &text[start + 7..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
        return rest.trim();
    }
    if let Some(start) = text.find("```") {
        let rest = &text[start + 3..];
        if let Some(end) = rest.rfind("```") {
            return rest[..end].trim();
        }
        return rest.trim();
    }
    text
}
