//! KDL configuration parsing for the NGINX service mesh adapter.
//!
//! This crate handles parsing of the adapter configuration (adapter.kdl):
//! - Helm chart coordinates for the mesh control plane
//! - Sidecar injection trait and namespace label
//! - Annotation keys used to build core component manifests

pub mod adapter;
pub mod error;

pub use adapter::{
    AdapterConfig, AnnotationKeys, HelmConfig, SidecarInjectionConfig, load_config,
    load_or_default, parse_adapter_config,
};
pub use error::{ConfigError, ConfigResult};
