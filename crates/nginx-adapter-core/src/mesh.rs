//! Mesh operations trait.
//!
//! The dispatcher never talks to the cluster itself. Everything that touches
//! Helm or the Kubernetes API goes through a [`MeshOperations`] backend.

use async_trait::async_trait;

use crate::Result;

/// Cluster-side operations the adapter delegates to.
#[async_trait]
pub trait MeshOperations: Send + Sync {
    /// Name of this backend.
    fn name(&self) -> &'static str;

    /// Install (or remove) the mesh control plane at a version.
    ///
    /// Returns a human readable status message.
    async fn install_or_remove(
        &self,
        delete: bool,
        version: &str,
        namespace: &str,
    ) -> Result<String>;

    /// Apply (or delete) a YAML manifest in a namespace.
    async fn apply_manifest(&self, document: &[u8], delete: bool, namespace: &str) -> Result<()>;

    /// Label (or unlabel) a namespace for automatic sidecar injection.
    async fn label_namespace(&self, namespace: &str, delete: bool) -> Result<()>;
}
