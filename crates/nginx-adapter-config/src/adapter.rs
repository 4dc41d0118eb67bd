//! Adapter configuration parsing.
//!
//! ```kdl
//! adapter "nginx-adapter" field-manager="nginx-adapter"
//!
//! helm {
//!     binary "helm"
//!     release "nginx-service-mesh"
//!     chart "nginx-service-mesh"
//!     repository "https://helm.nginx.com/stable"
//! }
//!
//! sidecar-injection trait="automaticSidecarInjection.AppMesh" {
//!     label "injector.nsm.nginx.com/auto-inject" "enabled"
//! }
//!
//! annotations api-version="example.com/apiVersion" kind="example.com/kind"
//! ```
//!
//! Every node is optional; missing values keep their defaults.

use crate::{ConfigError, ConfigResult};
use kdl::{KdlDocument, KdlNode};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Adapter-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Adapter name, used in log output.
    pub name: String,
    /// Field manager for server-side apply.
    pub field_manager: String,
    pub helm: HelmConfig,
    pub sidecar_injection: SidecarInjectionConfig,
    pub annotations: AnnotationKeys,
}

/// Where the mesh control plane chart comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelmConfig {
    pub binary: String,
    pub release: String,
    pub chart: String,
    pub repository: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidecarInjectionConfig {
    /// Trait name that triggers namespace labeling.
    pub trait_name: String,
    pub label: String,
    pub label_value: String,
}

/// Annotation keys a core component carries its resource type in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationKeys {
    pub api_version: String,
    pub kind: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            name: "nginx-adapter".to_string(),
            field_manager: "nginx-adapter".to_string(),
            helm: HelmConfig::default(),
            sidecar_injection: SidecarInjectionConfig::default(),
            annotations: AnnotationKeys::default(),
        }
    }
}

impl Default for HelmConfig {
    fn default() -> Self {
        Self {
            binary: "helm".to_string(),
            release: "nginx-service-mesh".to_string(),
            chart: "nginx-service-mesh".to_string(),
            repository: "https://helm.nginx.com/stable".to_string(),
        }
    }
}

impl Default for SidecarInjectionConfig {
    fn default() -> Self {
        Self {
            trait_name: "automaticSidecarInjection.AppMesh".to_string(),
            label: "injector.nsm.nginx.com/auto-inject".to_string(),
            label_value: "enabled".to_string(),
        }
    }
}

impl Default for AnnotationKeys {
    fn default() -> Self {
        Self {
            api_version: "pattern.meshery.io.mesh.workload.k8sAPIVersion".to_string(),
            kind: "pattern.meshery.io.mesh.workload.k8sKind".to_string(),
        }
    }
}

// Kubernetes label key: optional DNS subdomain prefix, then a name segment.
static LABEL_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*/)?[A-Za-z0-9]([-A-Za-z0-9_.]*[A-Za-z0-9])?$",
    )
    .unwrap()
});

static LABEL_VALUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9]([-A-Za-z0-9_.]*[A-Za-z0-9])?)?$").unwrap());

/// Parse adapter configuration from KDL text.
pub fn parse_adapter_config(kdl: &str) -> ConfigResult<AdapterConfig> {
    let doc: KdlDocument = kdl.parse()?;

    let mut config = AdapterConfig::default();
    let mut seen = HashSet::new();

    for node in doc.nodes() {
        let node_name = node.name().value();
        if !seen.insert(node_name.to_string()) {
            return Err(ConfigError::Duplicate(node_name.to_string()));
        }

        match node_name {
            "adapter" => {
                config.name = get_first_string_arg(node)
                    .ok_or_else(|| ConfigError::MissingField("adapter name".to_string()))?;
                if let Some(manager) = get_string_prop(node, "field-manager") {
                    config.field_manager = manager;
                }
            }
            "helm" => parse_helm(node, &mut config.helm)?,
            "sidecar-injection" => parse_sidecar_injection(node, &mut config.sidecar_injection)?,
            "annotations" => {
                if let Some(key) = get_string_prop(node, "api-version") {
                    config.annotations.api_version = key;
                }
                if let Some(key) = get_string_prop(node, "kind") {
                    config.annotations.kind = key;
                }
            }
            other => {
                debug!(node = other, "Ignoring unknown configuration node");
            }
        }
    }

    validate(&config)?;
    Ok(config)
}

/// Read and parse a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<AdapterConfig> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_adapter_config(&content)
}

/// Like [`load_config`], but falls back to defaults when the file does not exist.
pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<AdapterConfig> {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "No adapter configuration found, using defaults");
        return Ok(AdapterConfig::default());
    }
    load_config(path)
}

fn parse_helm(node: &KdlNode, helm: &mut HelmConfig) -> ConfigResult<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };

    for child in children.nodes() {
        let value = || {
            get_first_string_arg(child).ok_or_else(|| {
                ConfigError::MissingField(format!("helm {}", child.name().value()))
            })
        };
        match child.name().value() {
            "binary" => helm.binary = value()?,
            "release" => helm.release = value()?,
            "chart" => helm.chart = value()?,
            "repository" | "repo" => helm.repository = value()?,
            _ => {}
        }
    }
    Ok(())
}

fn parse_sidecar_injection(node: &KdlNode, sidecar: &mut SidecarInjectionConfig) -> ConfigResult<()> {
    if let Some(name) = get_string_prop(node, "trait") {
        sidecar.trait_name = name;
    }

    if let Some(children) = node.children() {
        for child in children.nodes() {
            if child.name().value() == "label" {
                let args = get_all_string_args(child);
                match args.as_slice() {
                    [key] => sidecar.label = key.clone(),
                    [key, value] => {
                        sidecar.label = key.clone();
                        sidecar.label_value = value.clone();
                    }
                    _ => {
                        return Err(ConfigError::InvalidValue {
                            field: "sidecar-injection label".to_string(),
                            message: "expected a key and an optional value".to_string(),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

fn validate(config: &AdapterConfig) -> ConfigResult<()> {
    let required = [
        ("adapter name", &config.name),
        ("field-manager", &config.field_manager),
        ("helm binary", &config.helm.binary),
        ("helm release", &config.helm.release),
        ("helm chart", &config.helm.chart),
        ("sidecar-injection trait", &config.sidecar_injection.trait_name),
        ("annotations api-version", &config.annotations.api_version),
        ("annotations kind", &config.annotations.kind),
    ];
    for (field, value) in required {
        if value.is_empty() {
            return Err(ConfigError::MissingField(field.to_string()));
        }
    }

    if !LABEL_KEY_REGEX.is_match(&config.sidecar_injection.label) {
        return Err(ConfigError::InvalidValue {
            field: "sidecar-injection label".to_string(),
            message: format!(
                "'{}' is not a valid label key",
                config.sidecar_injection.label
            ),
        });
    }
    if !LABEL_VALUE_REGEX.is_match(&config.sidecar_injection.label_value) {
        return Err(ConfigError::InvalidValue {
            field: "sidecar-injection label value".to_string(),
            message: format!(
                "'{}' is not a valid label value",
                config.sidecar_injection.label_value
            ),
        });
    }
    Ok(())
}

// Helper functions for extracting values from KDL nodes

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_all_string_args(node: &KdlNode) -> Vec<String> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .filter_map(|e| e.value().as_string())
        .map(|s| s.to_string())
        .collect()
}

fn get_string_prop(node: &KdlNode, name: &str) -> Option<String> {
    node.get(name)
        .and_then(|v| v.as_string())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_adapter_config("").unwrap();
        assert_eq!(config, AdapterConfig::default());
        assert_eq!(
            config.sidecar_injection.trait_name,
            "automaticSidecarInjection.AppMesh"
        );
    }

    #[test]
    fn test_parse_full_config() {
        let kdl = r#"
            adapter "edge-adapter" field-manager="edge"

            helm {
                binary "/usr/local/bin/helm"
                release "nsm"
                chart "nginx-service-mesh"
                repo "https://charts.example.com"
            }

            sidecar-injection trait="automaticSidecarInjection.Nginx" {
                label "example.com/inject" "true"
            }

            annotations api-version="example.com/apiVersion" kind="example.com/kind"
        "#;

        let config = parse_adapter_config(kdl).unwrap();
        assert_eq!(config.name, "edge-adapter");
        assert_eq!(config.field_manager, "edge");
        assert_eq!(config.helm.binary, "/usr/local/bin/helm");
        assert_eq!(config.helm.release, "nsm");
        assert_eq!(config.helm.repository, "https://charts.example.com");
        assert_eq!(
            config.sidecar_injection.trait_name,
            "automaticSidecarInjection.Nginx"
        );
        assert_eq!(config.sidecar_injection.label, "example.com/inject");
        assert_eq!(config.sidecar_injection.label_value, "true");
        assert_eq!(config.annotations.api_version, "example.com/apiVersion");
        assert_eq!(config.annotations.kind, "example.com/kind");
    }

    #[test]
    fn test_label_without_value_keeps_default_value() {
        let kdl = r#"
            sidecar-injection {
                label "example.com/inject"
            }
        "#;

        let config = parse_adapter_config(kdl).unwrap();
        assert_eq!(config.sidecar_injection.label, "example.com/inject");
        assert_eq!(config.sidecar_injection.label_value, "enabled");
    }

    #[test]
    fn test_duplicate_node() {
        let kdl = r#"
            adapter "a"
            adapter "b"
        "#;

        let result = parse_adapter_config(kdl);
        assert!(matches!(result.unwrap_err(), ConfigError::Duplicate(_)));
    }

    #[test]
    fn test_adapter_requires_name() {
        let result = parse_adapter_config(r#"adapter field-manager="x""#);
        assert!(matches!(result.unwrap_err(), ConfigError::MissingField(_)));
    }

    #[test]
    fn test_invalid_label_key() {
        let kdl = r#"
            sidecar-injection {
                label "not a label"
            }
        "#;

        let result = parse_adapter_config(kdl);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_malformed_kdl() {
        let result = parse_adapter_config("helm {");
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_or_default("/nonexistent/adapter.kdl").unwrap();
        assert_eq!(config, AdapterConfig::default());
    }
}
