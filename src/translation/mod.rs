/*!
 * Subtitle translation pipeline.
 *
 * - `batch`: partitioning, the batch orchestrator and its run report
 */

// Re-export main types for easier usage
pub use self::batch::{partition, BatchOptions, BatchReport, BatchTranslator};

// Submodules
pub mod batch;
