use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enums::Type;

/// Subset of the OpenAPI schema accepted as `responseSchema`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<Type>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, Schema>>,
    /// Keeps field order stable in generated JSON; the API otherwise sorts keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_ordering: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl Schema {
    pub fn object() -> SchemaBuilder {
        SchemaBuilder::new(Type::Object)
    }

    pub fn array() -> SchemaBuilder {
        SchemaBuilder::new(Type::Array)
    }

    pub fn string() -> Self {
        Self::of(Type::String)
    }

    pub fn number() -> Self {
        Self::of(Type::Number)
    }

    fn of(ty: Type) -> Self {
        Self {
            ty: Some(ty),
            ..Default::default()
        }
    }
}

pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new(ty: Type) -> Self {
        Self {
            schema: Schema::of(ty),
        }
    }

    /// Adds an optional field.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        self.schema
            .property_ordering
            .get_or_insert_with(Vec::new)
            .push(name.clone());
        self.schema
            .properties
            .get_or_insert_with(HashMap::new)
            .insert(name, schema);
        self
    }

    /// Adds a field and marks it required.
    #[must_use]
    pub fn required_property(self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        let mut builder = self.property(name.clone(), schema);
        builder
            .schema
            .required
            .get_or_insert_with(Vec::new)
            .push(name);
        builder
    }

    #[must_use]
    pub fn items(mut self, schema: Schema) -> Self {
        self.schema.items = Some(Box::new(schema));
        self
    }

    #[must_use]
    pub const fn item_count(mut self, min: i64, max: i64) -> Self {
        self.schema.min_items = Some(min);
        self.schema.max_items = Some(max);
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}
