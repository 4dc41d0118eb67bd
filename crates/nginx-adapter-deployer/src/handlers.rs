//! Component handlers.

use async_trait::async_trait;
use nginx_adapter_config::AnnotationKeys;
use nginx_adapter_core::value::settings_str;
use nginx_adapter_core::{Component, Error, MeshOperations, Result};
use serde_json::{Value, json};
use tracing::{debug, error};

/// Handles one OAM component type.
#[async_trait]
pub trait ComponentHandler: Send + Sync {
    async fn handle(
        &self,
        ops: &dyn MeshOperations,
        component: &Component,
        delete: bool,
    ) -> Result<String>;
}

/// Installs or removes the NGINX service mesh control plane.
///
/// Expects a `version` string setting.
#[derive(Debug, Clone, Copy, Default)]
pub struct NginxHandler;

#[async_trait]
impl ComponentHandler for NginxHandler {
    async fn handle(
        &self,
        ops: &dyn MeshOperations,
        component: &Component,
        delete: bool,
    ) -> Result<String> {
        let version = settings_str(&component.spec.settings, "version").map_err(|e| {
            Error::process_oam(format!("component {}: {}", component.name(), e))
        })?;

        debug!(component = %component.name(), version, delete, "Handling Nginx component");
        let msg = ops
            .install_or_remove(delete, version, component.namespace())
            .await?;

        Ok(format!("{}: {}", component.name(), msg))
    }
}

/// Fallback handler that turns a component into a raw manifest.
///
/// The manifest's apiVersion and kind come from component annotations unless
/// given explicitly.
#[derive(Debug, Clone, Default)]
pub struct CoreComponentHandler {
    keys: AnnotationKeys,
}

impl CoreComponentHandler {
    pub fn new(keys: AnnotationKeys) -> Self {
        Self { keys }
    }

    pub fn api_version<'a>(&self, component: &'a Component) -> Option<&'a str> {
        component.annotation(&self.keys.api_version)
    }

    pub fn kind<'a>(&self, component: &'a Component) -> Option<&'a str> {
        component.annotation(&self.keys.kind)
    }

    /// Apply or delete the component's manifest.
    pub async fn apply(
        &self,
        ops: &dyn MeshOperations,
        component: &Component,
        delete: bool,
        api_version: Option<&str>,
        kind: Option<&str>,
    ) -> Result<String> {
        let api_version = api_version
            .filter(|v| !v.is_empty())
            .or_else(|| self.api_version(component))
            .ok_or_else(|| {
                Error::core_component_fail(format!(
                    "failed to get API Version for: {}",
                    component.name()
                ))
            })?;

        let kind = kind
            .filter(|k| !k.is_empty())
            .or_else(|| self.kind(component))
            .ok_or_else(|| {
                Error::core_component_fail(format!("failed to get kind for: {}", component.name()))
            })?;

        let document = render_manifest(component, api_version, kind).inspect_err(|e| {
            error!(component = %component.name(), error = %e, "Failed to render manifest");
        })?;

        let msg = if delete {
            format!(
                "deleted {} config \"{}\" in namespace \"{}\"",
                kind,
                component.name(),
                component.namespace()
            )
        } else {
            format!(
                "created {} \"{}\" in namespace \"{}\"",
                kind,
                component.name(),
                component.namespace()
            )
        };

        ops.apply_manifest(document.as_bytes(), delete, component.namespace())
            .await?;
        Ok(msg)
    }
}

#[async_trait]
impl ComponentHandler for CoreComponentHandler {
    async fn handle(
        &self,
        ops: &dyn MeshOperations,
        component: &Component,
        delete: bool,
    ) -> Result<String> {
        self.apply(ops, component, delete, None, None).await
    }
}

/// Build the YAML manifest for a component.
pub fn render_manifest(component: &Component, api_version: &str, kind: &str) -> Result<String> {
    let manifest = json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": {
            "name": component.name(),
            "annotations": component.metadata.annotations,
            "labels": component.metadata.labels,
        },
        "spec": Value::Object(component.spec.settings.clone()),
    });

    serde_yaml::to_string(&manifest).map_err(Error::parse_core_component)
}
