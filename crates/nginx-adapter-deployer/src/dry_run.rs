//! Dry-run backend.
//!
//! Records every operation instead of touching a cluster.

use async_trait::async_trait;
use nginx_adapter_core::{MeshOperations, Result};
use std::sync::Mutex;
use tracing::info;

/// An operation captured by [`DryRunMesh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshCall {
    InstallOrRemove {
        delete: bool,
        version: String,
        namespace: String,
    },
    ApplyManifest {
        document: String,
        delete: bool,
        namespace: String,
    },
    LabelNamespace {
        namespace: String,
        delete: bool,
    },
}

#[derive(Debug, Default)]
pub struct DryRunMesh {
    calls: Mutex<Vec<MeshCall>>,
}

impl DryRunMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operations recorded so far, in call order.
    pub fn calls(&self) -> Vec<MeshCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, call: MeshCall) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }
}

#[async_trait]
impl MeshOperations for DryRunMesh {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn install_or_remove(
        &self,
        delete: bool,
        version: &str,
        namespace: &str,
    ) -> Result<String> {
        info!(delete, version, namespace, "Dry run: install or remove Nginx service mesh");
        self.record(MeshCall::InstallOrRemove {
            delete,
            version: version.to_string(),
            namespace: namespace.to_string(),
        });

        Ok(if delete {
            "Nginx service mesh would be removed (dry run)".to_string()
        } else {
            format!("Nginx service mesh {} would be installed (dry run)", version)
        })
    }

    async fn apply_manifest(&self, document: &[u8], delete: bool, namespace: &str) -> Result<()> {
        let document = String::from_utf8_lossy(document).into_owned();
        info!(delete, namespace, "Dry run: apply manifest");
        self.record(MeshCall::ApplyManifest {
            document,
            delete,
            namespace: namespace.to_string(),
        });
        Ok(())
    }

    async fn label_namespace(&self, namespace: &str, delete: bool) -> Result<()> {
        info!(namespace, delete, "Dry run: label namespace");
        self.record(MeshCall::LabelNamespace {
            namespace: namespace.to_string(),
            delete,
        });
        Ok(())
    }
}
