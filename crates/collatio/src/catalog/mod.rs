//! Registry of the classification labels a reviewer can assign to a
//! variation.
//!
//! The catalog is an owned value constructed once per session and passed by
//! reference to whatever needs it; there is no global label list.

mod registry;

pub use registry::{CatalogChange, DEFAULT_VARIATION_TYPES, VariationTypeCatalog};
