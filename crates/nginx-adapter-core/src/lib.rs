//! Core domain types for the NGINX service mesh adapter.
//!
//! This crate contains:
//! - The adapter error catalog
//! - OAM component and application configuration types
//! - Total conversions over type-erased settings values
//! - Error and message aggregation for batch operations
//! - The mesh operations trait implemented by cluster backends

pub mod aggregate;
pub mod error;
pub mod mesh;
pub mod oam;
pub mod value;

pub use aggregate::{ErrorList, HandleOutcome, merge_errors, merge_msgs};
pub use error::{Error, ErrorCode, Result, Severity};
pub use mesh::MeshOperations;
pub use oam::{ApplicationConfiguration, Component, ConfigurationComponent, ConfigurationTrait};
