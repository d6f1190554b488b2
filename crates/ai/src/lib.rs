//! `nexus-ai`
//!
//! **Responsibility:** Optional AI subsystem boundary.
//!
//! This crate is intentionally **not** part of the domain model:
//! - It must not depend on inventory types; callers hand it plain snapshots.
//! - It must not mutate domain state.
//! - Its public operations never fail: missing credentials and service errors
//!   degrade to fixed results instead.

pub mod assistant;
pub mod client;
pub mod config;
pub mod gemini;
pub mod insights;
pub mod result;
pub mod suggestion;

pub use assistant::InventoryAssistant;
pub use client::{FieldType, GenerationRequest, ResponseSchema, SchemaField, TextGenerator};
pub use config::AiConfig;
pub use gemini::GeminiClient;
pub use insights::{
    INSIGHTS_EMPTY_MESSAGE, INSIGHTS_FAILED_MESSAGE, INSIGHTS_UNAVAILABLE_MESSAGE,
    InventoryItemSnapshot,
};
pub use result::AiError;
pub use suggestion::AiItemSuggestion;
