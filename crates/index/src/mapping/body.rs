//! Index creation bodies.
//!
//! Turns a [`MappingDescriptor`] into the JSON body sent with an index create
//! request: index settings plus a `mappings.properties` tree. Nested and object
//! fields recurse so multi-value sub-documents keep their own field mappings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::MappingBuildError;

use super::descriptor::{MappingDescriptor, PropertyDescriptor};

/// Field type tags accepted in mapping files.
pub const KNOWN_FIELD_TYPES: &[&str] = &[
    "text",
    "keyword",
    "match_only_text",
    "wildcard",
    "long",
    "integer",
    "short",
    "byte",
    "double",
    "float",
    "half_float",
    "scaled_float",
    "unsigned_long",
    "boolean",
    "date",
    "date_nanos",
    "binary",
    "ip",
    "geo_point",
    "geo_shape",
    "completion",
    "search_as_you_type",
    "dense_vector",
    "flattened",
    "object",
    "nested",
];

/// Default index settings applied to every created index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSettings {
    /// `index.number_of_shards`
    pub number_of_shards: u32,
    /// `index.number_of_replicas`
    pub number_of_replicas: u32,
    /// `index.refresh_interval`
    pub refresh_interval: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            number_of_shards: 1,
            number_of_replicas: 1,
            refresh_interval: "1s".to_string(),
        }
    }
}

/// Builds the index creation body for a descriptor.
///
/// The descriptor's own `settings` object is overlaid on `settings`, key by key.
pub fn build_mapping_body(
    descriptor: &MappingDescriptor,
    settings: &IndexSettings,
) -> Result<Value, MappingBuildError> {
    let mut index_settings = Map::new();
    index_settings.insert("number_of_shards".into(), json!(settings.number_of_shards));
    index_settings.insert(
        "number_of_replicas".into(),
        json!(settings.number_of_replicas),
    );
    index_settings.insert("refresh_interval".into(), json!(settings.refresh_interval));

    match &descriptor.settings {
        None => {}
        Some(Value::Object(overrides)) => {
            for (key, value) in overrides {
                index_settings.insert(key.clone(), value.clone());
            }
        }
        Some(_) => {
            return Err(MappingBuildError::new(
                &descriptor.entity,
                "settings",
                "index settings must be a JSON object",
            ));
        }
    }

    let properties = build_properties(&descriptor.entity, "", &descriptor.properties)?;

    Ok(json!({
        "settings": Value::Object(index_settings),
        "mappings": {
            "properties": properties
        }
    }))
}

fn build_properties(
    entity: &str,
    parent: &str,
    properties: &[PropertyDescriptor],
) -> Result<Value, MappingBuildError> {
    let mut seen = HashSet::with_capacity(properties.len());
    let mut out = Map::new();

    for property in properties {
        let path = if parent.is_empty() {
            property.name.clone()
        } else {
            format!("{}.{}", parent, property.name)
        };

        if property.name.is_empty() {
            return Err(MappingBuildError::new(entity, &path, "property name is empty"));
        }
        if property.name.contains('.') {
            return Err(MappingBuildError::new(
                entity,
                &path,
                "property name must not contain '.'",
            ));
        }
        if !seen.insert(property.name.as_str()) {
            return Err(MappingBuildError::new(entity, &path, "property declared twice"));
        }
        if !KNOWN_FIELD_TYPES.contains(&property.field_type.as_str()) {
            return Err(MappingBuildError::new(
                entity,
                &path,
                format!("unknown type '{}'", property.field_type),
            ));
        }

        let mut field = Map::new();
        field.insert("type".into(), Value::String(property.field_type.clone()));
        for (key, value) in &property.options {
            field.insert(key.clone(), value.clone());
        }

        if property.is_container() {
            if property.properties.is_empty() {
                return Err(MappingBuildError::new(
                    entity,
                    &path,
                    format!("{} property has no sub-properties", property.field_type),
                ));
            }
            field.insert(
                "properties".into(),
                build_properties(entity, &path, &property.properties)?,
            );
        } else if !property.properties.is_empty() {
            return Err(MappingBuildError::new(
                entity,
                &path,
                format!(
                    "{} property cannot declare sub-properties",
                    property.field_type
                ),
            ));
        }

        out.insert(property.name.clone(), Value::Object(field));
    }

    Ok(Value::Object(out))
}
