//! Input layer: JSON tree document + validated in-memory structures.
//!
//! This module stands in for the file-format access layer: it owns the
//! abstract NeXus tree the converter walks, and the serde shapes used to
//! materialize one from a JSON document.

pub mod node;
pub mod spec;

pub use node::{Attribute, DType, Dataset, Group, Node, Tree};
pub use spec::TreeSpec;
