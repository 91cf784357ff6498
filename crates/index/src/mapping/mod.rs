//! Entity-to-index mapping declarations.
//!
//! - [`MappingDescriptor`] / [`PropertyDescriptor`] describe one entity's index
//! - [`MappingCatalog`] holds every declared descriptor in load order
//! - [`CatalogLoader`] reads descriptors from JSON mapping files
//! - [`build_mapping_body`] turns a descriptor into an index creation body

mod body;
mod catalog;
mod descriptor;
mod loader;

pub use body::{IndexSettings, KNOWN_FIELD_TYPES, build_mapping_body};
pub use catalog::MappingCatalog;
pub use descriptor::{MappingDescriptor, PropertyDescriptor};
pub use loader::CatalogLoader;
