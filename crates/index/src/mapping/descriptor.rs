//! Mapping descriptor types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entity's declared index mapping.
///
/// Descriptors are immutable once loaded; the catalog owns them and every
/// other component only borrows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingDescriptor {
    /// Unique key of the mapped entity (e.g. a fully-qualified type name).
    pub entity: String,

    /// Index name without the deployment prefix.
    pub index: String,

    /// Declared fields, in declaration order.
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,

    /// Index-level settings overlaid on the configured defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

impl MappingDescriptor {
    /// Creates a descriptor with no properties.
    pub fn new(entity: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            index: index.into(),
            properties: Vec::new(),
            settings: None,
        }
    }

    /// Adds a property.
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Sets index-level settings.
    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = Some(settings);
        self
    }
}

/// A single mapped field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Field name; must not contain `.`.
    pub name: String,

    /// Elasticsearch field type tag (`text`, `keyword`, `nested`, ...).
    #[serde(rename = "type")]
    pub field_type: String,

    /// Sub-fields of `nested` and `object` properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDescriptor>,

    /// Extra field parameters copied verbatim into the mapping
    /// (`analyzer`, `format`, `normalizer`, ...).
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl PropertyDescriptor {
    /// Creates a scalar property.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            properties: Vec::new(),
            options: Map::new(),
        }
    }

    /// Creates a `nested` property with the given children.
    pub fn nested(name: impl Into<String>, properties: Vec<PropertyDescriptor>) -> Self {
        Self {
            properties,
            ..Self::new(name, "nested")
        }
    }

    /// Adds an extra mapping parameter.
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Returns true for types that carry sub-properties.
    pub fn is_container(&self) -> bool {
        matches!(self.field_type.as_str(), "nested" | "object")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_deserialize() {
        let descriptor: MappingDescriptor = serde_json::from_value(json!({
            "entity": "App\\Entity\\Order",
            "index": "orders",
            "properties": [
                { "name": "number", "type": "keyword" },
                { "name": "note", "type": "text", "analyzer": "english" },
                {
                    "name": "lines",
                    "type": "nested",
                    "properties": [
                        { "name": "sku", "type": "keyword" },
                        { "name": "price", "type": "double" }
                    ]
                }
            ]
        }))
        .unwrap();

        assert_eq!(descriptor.index, "orders");
        assert_eq!(descriptor.properties.len(), 3);
        assert_eq!(descriptor.properties[1].options["analyzer"], "english");
        assert!(descriptor.properties[2].is_container());
        assert_eq!(descriptor.properties[2].properties[1].field_type, "double");
        assert!(descriptor.settings.is_none());
    }

    #[test]
    fn test_builder_helpers() {
        let descriptor = MappingDescriptor::new("User", "users")
            .with_property(PropertyDescriptor::new("email", "keyword"))
            .with_property(PropertyDescriptor::nested(
                "roles",
                vec![PropertyDescriptor::new("code", "keyword")],
            ));

        assert_eq!(descriptor.properties[0].name, "email");
        assert_eq!(descriptor.properties[1].field_type, "nested");
        assert!(!descriptor.properties[0].is_container());
    }
}
