use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::client::TextGenerator;
use crate::config::AiConfig;
use crate::gemini::GeminiClient;
use crate::insights::{
    INSIGHTS_EMPTY_MESSAGE, INSIGHTS_FAILED_MESSAGE, INSIGHTS_UNAVAILABLE_MESSAGE,
    InventoryItemSnapshot, insights_request,
};
use crate::result::AiError;
use crate::suggestion::{AiItemSuggestion, parse_suggestion, suggestion_request};

/// AI suggestion adapter.
///
/// Advisory only: both operations always return a value, and nothing else in
/// the system waits on them. Without a generator (no credential) no request is
/// ever made.
#[derive(Clone, Default)]
pub struct InventoryAssistant {
    generator: Option<Arc<dyn TextGenerator>>,
    category_labels: Vec<String>,
}

impl core::fmt::Debug for InventoryAssistant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InventoryAssistant")
            .field("enabled", &self.is_enabled())
            .field("category_labels", &self.category_labels)
            .finish()
    }
}

impl InventoryAssistant {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
            category_labels: Vec::new(),
        }
    }

    /// Adapter with no credential.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Gemini-backed when the config carries a key, disabled otherwise.
    pub fn from_config(config: &AiConfig) -> Self {
        match GeminiClient::from_config(config) {
            Some(client) => Self::new(Arc::new(client)),
            None => {
                warn!("no AI API key configured; suggestions and insights are disabled");
                Self::disabled()
            }
        }
    }

    /// Category names offered to the model for magic fill.
    pub fn with_categories<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Suggest category, price, description and threshold for a product name.
    ///
    /// `None` means "unavailable": no credential, a failed call, or an answer
    /// that does not match the schema.
    pub async fn suggest_item_details(&self, item_name: &str) -> Option<AiItemSuggestion> {
        let Some(generator) = &self.generator else {
            warn!("item suggestion requested without an AI API key");
            return None;
        };

        let request = suggestion_request(item_name, &self.category_labels);
        let result = generator
            .generate(request)
            .await
            .and_then(|text| parse_suggestion(&text));

        match result {
            Ok(suggestion) => {
                debug!(item = item_name, category = %suggestion.category, "item suggestion received");
                Some(suggestion)
            }
            Err(e) => {
                error!(item = item_name, error = %e, "item suggestion failed");
                None
            }
        }
    }

    /// Short bullet-point observations on the whole inventory.
    pub async fn generate_inventory_insights(&self, items: &[InventoryItemSnapshot]) -> String {
        let Some(generator) = &self.generator else {
            return INSIGHTS_UNAVAILABLE_MESSAGE.to_string();
        };

        let result = match insights_request(items) {
            Ok(request) => generator.generate(request).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(text) => text,
            Err(AiError::EmptyResponse) => {
                warn!(items = items.len(), "insights response was empty");
                INSIGHTS_EMPTY_MESSAGE.to_string()
            }
            Err(e) => {
                error!(items = items.len(), error = %e, "inventory insights failed");
                INSIGHTS_FAILED_MESSAGE.to_string()
            }
        }
    }
}
