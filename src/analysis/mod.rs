/*!
 * Highlight analysis: everything between a parsed subtitle sequence and a
 * list of refined clips ready for cutting.
 *
 * The stages run in a fixed order: genre detection, sliding-window scan
 * and scoring, overlap resolution, top-N selection, boundary refinement.
 * Each stage is usable on its own; `pipeline` wires them together.
 */

pub mod cache;
pub mod dedup;
pub mod genre;
pub mod pipeline;
pub mod refine;
pub mod scanner;
pub mod scorer;
pub mod selector;

pub use cache::ScoreCache;
pub use dedup::OverlapResolver;
pub use genre::{DetectedGenre, GenreDetector};
pub use pipeline::HighlightPipeline;
pub use refine::{BoundaryRefiner, ClipCandidate};
pub use scanner::{WindowCandidate, WindowScanner};
pub use scorer::ImportanceScorer;
pub use selector::select_top;
