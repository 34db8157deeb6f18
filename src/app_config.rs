use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Window scanning parameters
    #[serde(default)]
    pub scan: ScanConfig,

    /// Candidate selection parameters
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Boundary refinement parameters
    #[serde(default)]
    pub refine: RefineConfig,

    /// Scoring parameters (rule weights + optional AI rescoring)
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Clip cutting parameters
    #[serde(default)]
    pub cut: CutConfig,

    /// Plot-point category table
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,

    /// Genre keyword tables used for dominant-genre detection
    #[serde(default = "default_genres")]
    pub genres: Vec<GenreProfile>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// A plot-point category: keyword table plus scoring/duration parameters.
///
/// Loaded once at startup and never mutated during a run.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Category identifier (e.g. "key_conflict")
    pub name: String,

    /// Keywords whose occurrences score toward this category
    pub keywords: Vec<String>,

    /// Score contributed per keyword occurrence
    pub weight: f64,

    /// Target clip duration in seconds for this category
    pub target_duration_secs: f64,

    /// Minimum window score for a candidate of this category
    pub min_score: f64,
}

/// Genre keyword profile for dominant-genre detection
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenreProfile {
    /// Genre identifier (e.g. "legal", "crime")
    pub name: String,

    /// Keywords characteristic of this genre
    pub keywords: Vec<String>,
}

/// Window scanning parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScanConfig {
    /// Window size in subtitle lines
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Scan stride in subtitle lines
    #[serde(default = "default_stride")]
    pub stride: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            stride: default_stride(),
        }
    }
}

/// Candidate selection parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SelectionConfig {
    /// Minimum gap in subtitle lines between retained candidates
    #[serde(default = "default_min_gap")]
    pub min_gap: usize,

    /// Maximum number of clips kept per episode
    #[serde(default = "default_max_clips")]
    pub max_clips: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_gap: default_min_gap(),
            max_clips: default_max_clips(),
        }
    }
}

/// Boundary refinement parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefineConfig {
    /// Hard ceiling on expansion, as a multiple of the category target duration
    #[serde(default = "default_expansion_ceiling")]
    pub expansion_ceiling: f64,

    /// Lines to look back past the expanded start when snapping
    #[serde(default = "default_lookaround_lines")]
    pub lookback_lines: usize,

    /// Lines to look ahead past the expanded end when snapping
    #[serde(default = "default_lookaround_lines")]
    pub lookahead_lines: usize,

    /// Minimum line offset from the anchor before a terminal mark can end a clip
    #[serde(default = "default_min_end_offset")]
    pub min_end_offset: usize,

    /// Maximum character count for a line to qualify as a short terminal line
    #[serde(default = "default_short_line_chars")]
    pub short_line_chars: usize,

    /// Phrases that mark a natural scene start
    #[serde(default = "default_scene_starters")]
    pub scene_starters: Vec<String>,

    /// Phrases that mark a natural scene end
    #[serde(default = "default_scene_enders")]
    pub scene_enders: Vec<String>,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            expansion_ceiling: default_expansion_ceiling(),
            lookback_lines: default_lookaround_lines(),
            lookahead_lines: default_lookaround_lines(),
            min_end_offset: default_min_end_offset(),
            short_line_chars: default_short_line_chars(),
            scene_starters: default_scene_starters(),
            scene_enders: default_scene_enders(),
        }
    }
}

/// Scoring parameters: rule weights plus the optional AI rescoring pass
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ScoringConfig {
    /// Rule-based scoring weights
    #[serde(default)]
    pub weights: ScoringWeights,

    /// AI rescoring configuration
    #[serde(default)]
    pub rescoring: RescoringConfig,
}

/// Weights applied by the rule-based importance scorer
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScoringWeights {
    /// Score per exclamation mark
    #[serde(default = "default_exclamation_weight")]
    pub exclamation: f64,

    /// Score per question mark
    #[serde(default = "default_question_weight")]
    pub question: f64,

    /// Score per ellipsis marker
    #[serde(default = "default_ellipsis_weight")]
    pub ellipsis: f64,

    /// Flat bonus per distinct dominant-genre keyword present in the window
    #[serde(default = "default_genre_bonus")]
    pub genre_bonus: f64,

    /// Multiplier applied to windows starting in the outer edges of the episode
    #[serde(default = "default_edge_boost")]
    pub edge_boost: f64,

    /// Fraction of the episode on each side counted as the edge
    #[serde(default = "default_edge_band")]
    pub edge_band: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exclamation: default_exclamation_weight(),
            question: default_question_weight(),
            ellipsis: default_ellipsis_weight(),
            genre_bonus: default_genre_bonus(),
            edge_boost: default_edge_boost(),
            edge_band: default_edge_band(),
        }
    }
}

/// Scoring provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScoreProviderKind {
    // @provider: Ollama
    #[default]
    Ollama,
    // @provider: OpenAI-compatible chat endpoint
    OpenAI,
}

impl ScoreProviderKind {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ollama => "Ollama",
            Self::OpenAI => "OpenAI",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Ollama => "ollama".to_string(),
            Self::OpenAI => "openai".to_string(),
        }
    }
}

impl std::fmt::Display for ScoreProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for ScoreProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// AI rescoring configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RescoringConfig {
    /// Whether AI rescoring is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Scoring provider to use
    #[serde(default)]
    pub provider: ScoreProviderKind,

    /// Model name
    #[serde(default = "String::new")]
    pub model: String,

    /// API key
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_rescoring_timeout_secs")]
    pub timeout_secs: u64,

    /// Share of the blended score taken from the rule-based signal
    #[serde(default = "default_rule_weight")]
    pub rule_weight: f64,

    /// Drop rule_weight to 0.4 when genre detection confidence exceeds 0.7
    #[serde(default = "default_true")]
    pub adaptive_rule_weight: bool,
}

impl Default for RescoringConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: ScoreProviderKind::default(),
            model: String::new(),
            api_key: String::new(),
            endpoint: String::new(),
            timeout_secs: default_rescoring_timeout_secs(),
            rule_weight: default_rule_weight(),
            adaptive_rule_weight: true,
        }
    }
}

impl RescoringConfig {
    /// Get the model for the configured provider, with a provider-specific fallback
    pub fn get_model(&self) -> String {
        if !self.model.is_empty() {
            return self.model.clone();
        }
        match self.provider {
            ScoreProviderKind::Ollama => default_ollama_model(),
            ScoreProviderKind::OpenAI => default_openai_model(),
        }
    }

    /// Get the endpoint for the configured provider, with a provider-specific fallback
    pub fn get_endpoint(&self) -> String {
        if !self.endpoint.is_empty() {
            return self.endpoint.clone();
        }
        match self.provider {
            ScoreProviderKind::Ollama => default_ollama_endpoint(),
            ScoreProviderKind::OpenAI => default_openai_endpoint(),
        }
    }
}

/// Clip cutting configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CutConfig {
    /// Seconds of lead-in kept before the clip start
    #[serde(default = "default_start_buffer_secs")]
    pub start_buffer_secs: f64,

    /// Seconds of tail kept after the clip end
    #[serde(default = "default_end_buffer_secs")]
    pub end_buffer_secs: f64,

    /// ffmpeg invocation timeout in seconds
    #[serde(default = "default_cut_timeout_secs")]
    pub timeout_secs: u64,

    /// x264 preset
    #[serde(default = "default_preset")]
    pub preset: String,

    /// x264 constant rate factor
    #[serde(default = "default_crf")]
    pub crf: u8,
}

impl Default for CutConfig {
    fn default() -> Self {
        Self {
            start_buffer_secs: default_start_buffer_secs(),
            end_buffer_secs: default_end_buffer_secs(),
            timeout_secs: default_cut_timeout_secs(),
            preset: default_preset(),
            crf: default_crf(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_window_size() -> usize {
    25
}

fn default_stride() -> usize {
    15
}

fn default_min_gap() -> usize {
    40
}

fn default_max_clips() -> usize {
    5
}

fn default_expansion_ceiling() -> f64 {
    1.2
}

fn default_lookaround_lines() -> usize {
    3
}

fn default_min_end_offset() -> usize {
    15
}

fn default_short_line_chars() -> usize {
    20
}

fn default_exclamation_weight() -> f64 {
    3.0
}

fn default_question_weight() -> f64 {
    2.0
}

fn default_ellipsis_weight() -> f64 {
    1.5
}

fn default_genre_bonus() -> f64 {
    5.0
}

fn default_edge_boost() -> f64 {
    1.3
}

fn default_edge_band() -> f64 {
    0.2
}

fn default_rescoring_timeout_secs() -> u64 {
    30
}

fn default_rule_weight() -> f64 {
    0.6
}

fn default_start_buffer_secs() -> f64 {
    1.0
}

fn default_end_buffer_secs() -> f64 {
    2.0
}

fn default_cut_timeout_secs() -> u64 {
    300
}

fn default_preset() -> String {
    "medium".to_string()
}

fn default_crf() -> u8 {
    23
}

fn default_true() -> bool {
    true
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ollama_model() -> String {
    "llama2".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_scene_starters() -> Vec<String> {
    ["那么", "现在", "这时", "突然", "接下来", "首先", "然后", "于是"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_scene_enders() -> Vec<String> {
    ["好的", "明白", "知道了", "算了", "结束", "完了", "离开", "再见"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn category(
    name: &str,
    keywords: &[&str],
    weight: f64,
    target_duration_secs: f64,
    min_score: f64,
) -> CategoryConfig {
    CategoryConfig {
        name: name.to_string(),
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
        weight,
        target_duration_secs,
        min_score,
    }
}

/// Default plot-point category table, tuned for Chinese-language episodic drama
fn default_categories() -> Vec<CategoryConfig> {
    vec![
        category(
            "key_conflict",
            &["冲突", "争执", "对抗", "质疑", "反驳", "争议", "激烈", "愤怒", "不同意", "辩论"],
            10.0,
            180.0,
            15.0,
        ),
        category(
            "character_turn",
            &["决定", "改变", "选择", "转变", "觉悟", "明白", "意识到", "发现自己", "突然", "忽然"],
            9.0,
            150.0,
            12.0,
        ),
        category(
            "clue_reveal",
            &["发现", "揭露", "真相", "证据", "线索", "秘密", "暴露", "证明", "找到", "原来"],
            8.0,
            160.0,
            10.0,
        ),
        category(
            "emotional_outburst",
            &["哭", "痛苦", "绝望", "愤怒", "激动", "崩溃", "心痛", "感动", "震撼", "泪水"],
            7.0,
            140.0,
            8.0,
        ),
        category(
            "important_dialogue",
            &["告诉", "承认", "坦白", "解释", "澄清", "说明", "表态", "保证", "宣布"],
            6.0,
            170.0,
            6.0,
        ),
    ]
}

fn genre(name: &str, keywords: &[&str]) -> GenreProfile {
    GenreProfile {
        name: name.to_string(),
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
    }
}

/// Default genre keyword tables
fn default_genres() -> Vec<GenreProfile> {
    vec![
        genre("legal", &["法官", "检察官", "律师", "法庭", "审判", "证据", "案件", "起诉", "辩护", "判决", "申诉", "听证会"]),
        genre("crime", &["警察", "犯罪", "嫌疑人", "调查", "破案", "线索", "凶手", "案发", "侦探", "刑侦", "追踪", "逮捕"]),
        genre("medical", &["医生", "护士", "医院", "手术", "病人", "诊断", "治疗", "病情", "急诊", "救护车", "药物", "病房"]),
        genre("romance", &["爱情", "喜欢", "心动", "表白", "约会", "分手", "复合", "结婚", "情侣", "恋人", "暗恋", "初恋"]),
        genre("family", &["家庭", "父母", "孩子", "兄弟", "姐妹", "亲情", "家人", "团聚", "离别", "成长", "教育", "代沟"]),
        genre("business", &["公司", "老板", "员工", "合作", "竞争", "项目", "会议", "谈判", "投资", "创业", "职场", "晋升"]),
        genre("historical", &["皇帝", "大臣", "朝廷", "战争", "将军", "士兵", "王朝", "宫廷", "政治", "权力", "叛乱", "起义"]),
        genre("fantasy", &["魔法", "武功", "修炼", "仙人", "妖怪", "神话", "传说", "法术", "灵力", "异能", "穿越", "重生"]),
    ]
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(anyhow!("At least one plot-point category is required"));
        }

        for cat in &self.categories {
            if cat.keywords.is_empty() {
                return Err(anyhow!("Category '{}' has no keywords", cat.name));
            }
            if cat.target_duration_secs <= 0.0 {
                return Err(anyhow!(
                    "Category '{}' has a non-positive target duration",
                    cat.name
                ));
            }
            if cat.min_score < 0.0 {
                return Err(anyhow!("Category '{}' has a negative min_score", cat.name));
            }
        }

        if self.scan.window_size == 0 {
            return Err(anyhow!("scan.window_size must be positive"));
        }
        if self.scan.stride == 0 {
            return Err(anyhow!("scan.stride must be positive"));
        }
        if self.selection.max_clips == 0 {
            return Err(anyhow!("selection.max_clips must be positive"));
        }
        if self.refine.expansion_ceiling < 1.0 {
            return Err(anyhow!("refine.expansion_ceiling must be at least 1.0"));
        }

        let rw = self.scoring.rescoring.rule_weight;
        if !(0.0..=1.0).contains(&rw) {
            return Err(anyhow!("scoring.rescoring.rule_weight must be in [0, 1]"));
        }

        // Remote providers need credentials; Ollama runs locally without any
        if self.scoring.rescoring.enabled
            && self.scoring.rescoring.provider == ScoreProviderKind::OpenAI
            && self.scoring.rescoring.api_key.is_empty()
        {
            return Err(anyhow!("An API key is required for the OpenAI provider"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            scan: ScanConfig::default(),
            selection: SelectionConfig::default(),
            refine: RefineConfig::default(),
            scoring: ScoringConfig::default(),
            cut: CutConfig::default(),
            categories: default_categories(),
            genres: default_genres(),
            log_level: LogLevel::default(),
        }
    }
}
