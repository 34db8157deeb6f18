/*!
 * # plotclip - subtitle-driven highlight clip extraction
 *
 * A Rust library for selecting and cutting highlight clips from episodic
 * drama, driven entirely by the subtitle files.
 *
 * ## Features
 *
 * - Parse SRT subtitle files, tolerating malformed entries
 * - Score sliding windows of dialogue against plot-point categories
 * - Detect the dominant genre and bias scoring toward it
 * - Optionally blend rule scores with an LLM judgment:
 *   - Ollama (local LLM)
 *   - OpenAI-compatible APIs
 * - Refine clip boundaries to natural dialogue breaks
 * - Cut clips from episode videos with ffmpeg
 * - Batch processing with per-episode reports
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Subtitle file handling and processing
 * - `timecode`: SRT timecode parsing and formatting
 * - `analysis`: The highlight selection pipeline:
 *   - `analysis::genre`: Dominant-genre detection
 *   - `analysis::scorer`: Rule-based window scoring
 *   - `analysis::scanner`: Sliding-window scan
 *   - `analysis::dedup`: Overlap resolution
 *   - `analysis::selector`: Top-N selection
 *   - `analysis::refine`: Boundary refinement
 *   - `analysis::cache`: Per-episode result caching
 *   - `analysis::pipeline`: Stage orchestration
 * - `rescorer`: AI score blending
 * - `providers`: LLM provider clients
 * - `media_cutter`: ffmpeg clip cutting
 * - `report`: Per-episode reports
 * - `app_controller`: Batch orchestration
 */

pub mod analysis;
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod media_cutter;
pub mod providers;
pub mod report;
pub mod rescorer;
pub mod subtitle_processor;
pub mod timecode;

pub use analysis::{ClipCandidate, HighlightPipeline};
pub use app_config::Config;
pub use app_controller::Controller;
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
