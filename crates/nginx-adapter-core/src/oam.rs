//! OAM component and application configuration types.
//!
//! These mirror the `core.oam.dev/v1alpha2` documents the orchestrator sends.
//! The adapter only reads them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::value::Settings;

/// Object metadata shared by OAM documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// A workload the adapter should install or remove.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    pub metadata: Metadata,
    pub spec: ComponentSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    /// Component type name used for handler dispatch.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub settings: Settings,
}

impl Component {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            api_version: "core.oam.dev/v1alpha1".to_string(),
            kind: "Component".to_string(),
            metadata: Metadata {
                name: name.into(),
                namespace: namespace.into(),
                ..Default::default()
            },
            spec: ComponentSpec {
                type_name: type_name.into(),
                settings: Settings::new(),
            },
        }
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.annotations.insert(key.into(), value.into());
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.spec.settings.insert(key.into(), value);
        self
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn type_name(&self) -> &str {
        &self.spec.type_name
    }

    /// Look up an annotation, treating an empty value as absent.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata
            .annotations
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// An application configuration binding traits to components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationConfiguration {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub spec: ConfigurationSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationSpec {
    #[serde(default)]
    pub components: Vec<ConfigurationComponent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationComponent {
    pub component_name: String,
    #[serde(default)]
    pub traits: Vec<ConfigurationTrait>,
}

/// A named behavior attached to a component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationTrait {
    pub name: String,
    #[serde(default)]
    pub properties: Settings,
}

impl ApplicationConfiguration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            api_version: "core.oam.dev/v1alpha1".to_string(),
            kind: "ApplicationConfiguration".to_string(),
            metadata: Metadata {
                name: name.into(),
                ..Default::default()
            },
            spec: ConfigurationSpec::default(),
        }
    }

    pub fn with_component(mut self, component: ConfigurationComponent) -> Self {
        self.spec.components.push(component);
        self
    }
}

impl ConfigurationComponent {
    pub fn new(component_name: impl Into<String>) -> Self {
        Self {
            component_name: component_name.into(),
            traits: Vec::new(),
        }
    }

    pub fn with_trait(mut self, name: impl Into<String>, properties: Settings) -> Self {
        self.traits.push(ConfigurationTrait {
            name: name.into(),
            properties,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_component_deserializes_oam_fields() {
        let doc = json!({
            "apiVersion": "core.oam.dev/v1alpha1",
            "kind": "Component",
            "metadata": {
                "name": "nginx-sm",
                "namespace": "nginx-mesh",
                "annotations": {"pattern.meshery.io.mesh.workload.k8sKind": "Deployment"}
            },
            "spec": {
                "type": "Nginx",
                "settings": {"version": "1.2.0"}
            }
        });

        let comp: Component = serde_json::from_value(doc).unwrap();
        assert_eq!(comp.name(), "nginx-sm");
        assert_eq!(comp.namespace(), "nginx-mesh");
        assert_eq!(comp.type_name(), "Nginx");
        assert_eq!(
            comp.annotation("pattern.meshery.io.mesh.workload.k8sKind"),
            Some("Deployment")
        );
        assert!(comp.metadata.labels.is_empty());
        assert_eq!(comp.spec.settings["version"], json!("1.2.0"));
    }

    #[test]
    fn test_empty_annotation_is_absent() {
        let comp = Component::new("web", "default", "Deployment").with_annotation("k", "");
        assert_eq!(comp.annotation("k"), None);
        assert_eq!(comp.annotation("missing"), None);
    }

    #[test]
    fn test_configuration_defaults_missing_traits() {
        let doc = json!({
            "spec": {
                "components": [
                    {"componentName": "productpage"},
                    {"componentName": "reviews", "traits": [{"name": "mTLS"}]}
                ]
            }
        });

        let config: ApplicationConfiguration = serde_json::from_value(doc).unwrap();
        assert_eq!(config.spec.components.len(), 2);
        assert!(config.spec.components[0].traits.is_empty());
        assert_eq!(config.spec.components[1].traits[0].name, "mTLS");
        assert!(config.spec.components[1].traits[0].properties.is_empty());
    }
}
