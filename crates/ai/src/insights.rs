//! Whole-inventory narrative insights.

use serde::Serialize;

use crate::client::GenerationRequest;
use crate::result::AiError;

/// Returned when no credential is configured.
pub const INSIGHTS_UNAVAILABLE_MESSAGE: &str = "AI Insights unavailable. Please check your API Key.";

/// Returned when the call or its decoding fails.
pub const INSIGHTS_FAILED_MESSAGE: &str = "Failed to analyze inventory.";

/// Returned when the service answers with no text.
pub const INSIGHTS_EMPTY_MESSAGE: &str = "Could not generate insights.";

/// Minimized per-item summary sent to the service.
///
/// Only name, quantity, price and category leave the process; ids, SKUs,
/// descriptions and timestamps stay local.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryItemSnapshot {
    pub name: String,
    #[serde(rename = "qty")]
    pub quantity: u64,
    #[serde(rename = "price")]
    pub unit_price: f64,
    #[serde(rename = "cat")]
    pub category: String,
}

pub fn insights_request(items: &[InventoryItemSnapshot]) -> Result<GenerationRequest, AiError> {
    let summary = serde_json::to_string(items).map_err(|e| AiError::InvalidInput(e.to_string()))?;

    Ok(GenerationRequest::text(format!(
        "You are assisting an inventory manager. Review this inventory list: {summary}\n\
         Give exactly 3 short bullet points covering:\n\
         1. Stock risks (low stock or overstock).\n\
         2. Anomalies in how value is distributed.\n\
         3. One concise, actionable tip.\n\
         Stay under 100 words in total. Plain text with bullet points only, no markdown formatting."
    )))
}
