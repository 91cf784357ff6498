//! Mapping catalog.
//!
//! The catalog keeps descriptors in load order and indexes them by entity
//! identifier. Lookups by index name are linear and return the first match.

use std::collections::HashMap;

use crate::error::CatalogError;

use super::descriptor::MappingDescriptor;

/// Read-only store of declared entity-to-index mappings.
#[derive(Debug, Clone, Default)]
pub struct MappingCatalog {
    descriptors: Vec<MappingDescriptor>,
    by_entity: HashMap<String, usize>,
}

impl MappingCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, preserving the order of `descriptors`.
    ///
    /// Two descriptors for the same entity are rejected. Repeated index names
    /// are accepted; [`find_by_index_name`](Self::find_by_index_name) returns
    /// the first of them.
    pub fn from_descriptors(descriptors: Vec<MappingDescriptor>) -> Result<Self, CatalogError> {
        let mut by_entity = HashMap::with_capacity(descriptors.len());
        for (position, descriptor) in descriptors.iter().enumerate() {
            if by_entity.insert(descriptor.entity.clone(), position).is_some() {
                return Err(CatalogError::DuplicateEntity {
                    entity: descriptor.entity.clone(),
                });
            }
        }

        let duplicate_indexes = {
            let mut seen = HashMap::new();
            descriptors
                .iter()
                .filter(|d| seen.insert(d.index.as_str(), ()).is_some())
                .count()
        };
        if duplicate_indexes > 0 {
            tracing::warn!(
                duplicates = duplicate_indexes,
                "Mapping catalog declares the same index name for several entities"
            );
        }

        Ok(Self {
            descriptors,
            by_entity,
        })
    }

    /// Returns the descriptor for an entity.
    pub fn get(&self, entity: &str) -> Option<&MappingDescriptor> {
        self.by_entity.get(entity).map(|&i| &self.descriptors[i])
    }

    /// Returns the first descriptor whose index name equals `name`.
    pub fn find_by_index_name(&self, name: &str) -> Option<&MappingDescriptor> {
        self.descriptors.iter().find(|d| d.index == name)
    }

    /// Iterates descriptors in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &MappingDescriptor> {
        self.descriptors.iter()
    }

    /// Returns entity identifiers in catalog order.
    pub fn entities(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.entity.as_str()).collect()
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if no descriptor is declared.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl<'a> IntoIterator for &'a MappingCatalog {
    type Item = &'a MappingDescriptor;
    type IntoIter = std::slice::Iter<'a, MappingDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MappingCatalog {
        MappingCatalog::from_descriptors(vec![
            MappingDescriptor::new("User", "users"),
            MappingDescriptor::new("Order", "orders"),
            MappingDescriptor::new("LegacyOrder", "orders"),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_by_entity() {
        let catalog = catalog();
        assert_eq!(catalog.get("Order").map(|d| d.index.as_str()), Some("orders"));
        assert!(catalog.get("Missing").is_none());
    }

    #[test]
    fn test_find_by_index_name_returns_first_match() {
        let catalog = catalog();
        let found = catalog.find_by_index_name("orders").unwrap();
        assert_eq!(found.entity, "Order");
        assert!(catalog.find_by_index_name("products").is_none());
    }

    #[test]
    fn test_order_is_preserved() {
        let catalog = catalog();
        assert_eq!(catalog.entities(), vec!["User", "Order", "LegacyOrder"]);
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_duplicate_entity_rejected() {
        let result = MappingCatalog::from_descriptors(vec![
            MappingDescriptor::new("User", "users"),
            MappingDescriptor::new("User", "people"),
        ]);
        assert!(matches!(
            result,
            Err(CatalogError::DuplicateEntity { entity }) if entity == "User"
        ));
    }
}
