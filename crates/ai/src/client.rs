//! Port for the external text-generation service.

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue, json};

use crate::result::AiError;

/// JSON type of a structured-response field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
}

impl FieldType {
    fn wire_name(self) -> &'static str {
        match self {
            FieldType::String => "STRING",
            FieldType::Number => "NUMBER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    pub field_type: FieldType,
    pub description: String,
}

/// Object schema the service must answer with. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseSchema {
    pub fields: Vec<SchemaField>,
}

impl ResponseSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(
        mut self,
        name: impl Into<String>,
        field_type: FieldType,
        description: impl Into<String>,
    ) -> Self {
        self.fields.push(SchemaField {
            name: name.into(),
            field_type,
            description: description.into(),
        });
        self
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// OpenAPI-subset object schema, as accepted by `generationConfig.responseSchema`.
    pub fn to_json(&self) -> JsonValue {
        let mut properties = Map::new();
        for f in &self.fields {
            properties.insert(
                f.name.clone(),
                json!({
                    "type": f.field_type.wire_name(),
                    "description": f.description,
                }),
            );
        }

        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": self.field_names(),
            "propertyOrdering": self.field_names(),
        })
    }
}

/// One prompt; structured when `response_schema` is set (JSON out), free text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub response_schema: Option<ResponseSchema>,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
        }
    }

    pub fn structured(prompt: impl Into<String>, schema: ResponseSchema) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: Some(schema),
        }
    }
}

/// External text-generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the raw response text.
    async fn generate(&self, request: GenerationRequest) -> Result<String, AiError>;
}
