//! Component dispatch and mesh backends for the NGINX service mesh adapter.
//!
//! Provides:
//! - The component dispatcher and its handlers
//! - Kubernetes backend (Helm + server-side apply)
//! - Dry-run backend for previews

pub mod dispatcher;
pub mod dry_run;
pub mod handlers;
pub mod helm;
pub mod kubernetes;

pub use dispatcher::{ComponentDispatcher, label_namespaces};
pub use dry_run::{DryRunMesh, MeshCall};
pub use handlers::{ComponentHandler, CoreComponentHandler, NginxHandler, render_manifest};
pub use helm::{HelmError, HelmRunner};
pub use kubernetes::KubernetesMesh;
pub use nginx_adapter_core::mesh::MeshOperations;
