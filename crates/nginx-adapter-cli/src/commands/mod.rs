//! CLI command implementations.

pub mod components;
pub mod configuration;

use anyhow::{Context, Result};
use nginx_adapter_config::{AdapterConfig, load_or_default};
use nginx_adapter_core::{Component, Error, HandleOutcome, MeshOperations};
use nginx_adapter_deployer::{CoreComponentHandler, DryRunMesh, KubernetesMesh, render_manifest};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use std::sync::Arc;

/// Whether a batch installs or deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Delete,
}

impl Action {
    pub fn is_delete(self) -> bool {
        self == Action::Delete
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "install" | "apply" => Ok(Action::Install),
            "delete" | "remove" => Ok(Action::Delete),
            _ => Err(Error::op_invalid()),
        }
    }
}

pub fn load_adapter_config(path: &str) -> Result<AdapterConfig> {
    load_or_default(path).with_context(|| format!("Failed to load adapter config: {}", path))
}

/// Pick the backend for a run.
pub async fn backend(config: &AdapterConfig, dry_run: bool) -> Result<Arc<dyn MeshOperations>> {
    if dry_run {
        return Ok(Arc::new(DryRunMesh::new()));
    }
    let mesh = KubernetesMesh::connect(config)
        .await
        .context("Failed to connect to Kubernetes")?;
    Ok(Arc::new(mesh))
}

/// Parse documents from YAML (possibly multi-document) or JSON.
///
/// A document may hold a single item or a list of items.
pub fn parse_documents<T: DeserializeOwned>(content: &str) -> Result<Vec<T>> {
    let mut items = Vec::new();
    for de in serde_yaml::Deserializer::from_str(content) {
        let value = serde_yaml::Value::deserialize(de).context("Invalid YAML document")?;
        match value {
            serde_yaml::Value::Null => {}
            serde_yaml::Value::Sequence(seq) => {
                for item in seq {
                    items.push(serde_yaml::from_value(item).context("Invalid document")?);
                }
            }
            other => items.push(serde_yaml::from_value(other).context("Invalid document")?),
        }
    }
    Ok(items)
}

pub fn read_documents<T: DeserializeOwned>(path: &str) -> Result<Vec<T>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))?;
    parse_documents(&content).with_context(|| format!("Failed to parse file: {}", path))
}

/// Print the outcome of a batch and fail if anything went wrong.
pub fn report(outcome: HandleOutcome) -> Result<()> {
    let (message, error) = outcome.into_parts();
    if !message.is_empty() {
        println!("{}", message);
    }

    match error {
        None => Ok(()),
        Some(errors) => {
            for e in errors.errors() {
                eprintln!("[{}] {}", e.code, e);
            }
            anyhow::bail!("{} operation(s) failed", errors.len());
        }
    }
}

pub fn render(config_path: &str, file: &str) -> Result<()> {
    let config = load_adapter_config(config_path)?;
    let handler = CoreComponentHandler::new(config.annotations);
    let components: Vec<Component> = read_documents(file)?;

    for comp in &components {
        let (Some(api_version), Some(kind)) = (handler.api_version(comp), handler.kind(comp)) else {
            eprintln!("# skipping {}: no apiVersion/kind annotations", comp.name());
            continue;
        };
        let manifest = render_manifest(comp, api_version, kind)?;
        println!("---\n{}", manifest.trim_end());
    }
    Ok(())
}

pub fn validate(path: &str) -> Result<()> {
    match nginx_adapter_config::load_config(path) {
        Ok(config) => {
            println!("Configuration is valid");
            println!("  adapter: {}", config.name);
            println!("  chart: {} ({})", config.helm.chart, config.helm.repository);
            println!("  sidecar trait: {}", config.sidecar_injection.trait_name);
            Ok(())
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nginx_adapter_core::{ApplicationConfiguration, ErrorCode};

    #[test]
    fn test_parse_action() {
        assert_eq!("install".parse::<Action>().unwrap(), Action::Install);
        assert!("delete".parse::<Action>().unwrap().is_delete());
        assert_eq!(
            "upgrade".parse::<Action>().unwrap_err().code,
            ErrorCode::OpInvalid
        );
    }

    #[test]
    fn test_parse_multi_document_components() {
        let yaml = r#"
apiVersion: core.oam.dev/v1alpha1
kind: Component
metadata:
  name: nginx-sm
  namespace: nginx-mesh
spec:
  type: Nginx
  settings:
    version: 1.7.0
---
apiVersion: core.oam.dev/v1alpha1
kind: Component
metadata:
  name: cfg
spec:
  type: MeshConfig
"#;

        let comps: Vec<Component> = parse_documents(yaml).unwrap();
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0].type_name(), "Nginx");
        assert_eq!(comps[0].spec.settings["version"], "1.7.0");
        assert_eq!(comps[1].namespace(), "");
    }

    #[test]
    fn test_parse_json_list() {
        let json = r#"[
            {"metadata": {"name": "a"}, "spec": {"type": "Nginx"}},
            {"metadata": {"name": "b"}, "spec": {"type": "Nginx"}}
        ]"#;

        let comps: Vec<Component> = parse_documents(json).unwrap();
        let names: Vec<&str> = comps.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_configuration() {
        let yaml = r#"
kind: ApplicationConfiguration
metadata:
  name: bookinfo
spec:
  components:
    - componentName: productpage
      traits:
        - name: automaticSidecarInjection.AppMesh
          properties:
            namespaces: [bookinfo, default]
"#;

        let configs: Vec<ApplicationConfiguration> = parse_documents(yaml).unwrap();
        assert_eq!(configs.len(), 1);
        let t = &configs[0].spec.components[0].traits[0];
        assert_eq!(t.properties["namespaces"][1], "default");
    }

    #[test]
    fn test_report_fails_on_errors() {
        let mut outcome = HandleOutcome::new();
        outcome.push_message("ok");
        outcome.push_error(Error::mesh_config("boom"));
        assert!(report(outcome).is_err());
        assert!(report(HandleOutcome::new()).is_ok());
    }
}
