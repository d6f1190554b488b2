//! AI orchestration adapters (optional subsystem).
//!
//! These components bridge the item store and the AI assistant. Failures are
//! isolated and never affect mutations.

pub mod insights_refresher;
pub mod magic_fill;

pub use insights_refresher::{
    AiInsightSink, Insight, InsightsRefresher, InsightsRefresherHandle, LatestInsight,
};
pub use magic_fill::{
    MAGIC_FILL_MIN_NAME_LEN, MagicFillOutcome, apply_suggestion, category_labels, magic_fill,
    snapshot_items,
};
