//! Magic-fill: structured attribute suggestions for a product name.

use serde::{Deserialize, Serialize};

use crate::client::{FieldType, GenerationRequest, ResponseSchema};
use crate::result::AiError;

/// Suggested attributes for a pending item draft. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiItemSuggestion {
    /// Expected to be one of the known categories; callers must not rely on it.
    pub category: String,
    pub estimated_price: f64,
    pub description: String,
    pub suggested_threshold: f64,
}

/// The four-field response schema.
pub fn suggestion_schema(category_labels: &[String]) -> ResponseSchema {
    let category_hint = if category_labels.is_empty() {
        "Best fit product category".to_string()
    } else {
        format!("Best fit category from: {}", category_labels.join(", "))
    };

    ResponseSchema::new()
        .field("category", FieldType::String, category_hint)
        .field(
            "estimatedPrice",
            FieldType::Number,
            "Estimated market unit price in USD",
        )
        .field(
            "description",
            FieldType::String,
            "Short, professional product description (max 15 words)",
        )
        .field(
            "suggestedThreshold",
            FieldType::Number,
            "Recommended low stock alert threshold (e.g. 5, 10)",
        )
}

pub fn suggestion_request(item_name: &str, category_labels: &[String]) -> GenerationRequest {
    GenerationRequest::structured(
        format!(
            "Analyze the product name \"{item_name}\" and suggest realistic inventory details. \
             Return JSON only."
        ),
        suggestion_schema(category_labels),
    )
}

/// Schema-validating parse of the service's JSON answer.
///
/// All four fields must be present with their declared types; the numeric
/// fields must be finite and non-negative.
pub fn parse_suggestion(text: &str) -> Result<AiItemSuggestion, AiError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(AiError::EmptyResponse);
    }

    let suggestion: AiItemSuggestion =
        serde_json::from_str(body).map_err(|e| AiError::InvalidResponse(e.to_string()))?;

    for (field, value) in [
        ("estimatedPrice", suggestion.estimated_price),
        ("suggestedThreshold", suggestion.suggested_threshold),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(AiError::InvalidResponse(format!(
                "{field} must be a non-negative number, got {value}"
            )));
        }
    }

    Ok(suggestion)
}

/// Models sometimes wrap JSON in a ```json fence even when asked not to.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
