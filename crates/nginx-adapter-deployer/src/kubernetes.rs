//! Kubernetes mesh backend.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::{Api, DeleteParams, DynamicObject, Patch, PatchParams};
use kube::core::GroupVersionKind;
use kube::discovery::{self, Scope};
use kube::{Client, ResourceExt};
use nginx_adapter_config::{AdapterConfig, SidecarInjectionConfig};
use nginx_adapter_core::{Error, MeshOperations, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::helm::HelmRunner;

/// Kubernetes-based mesh backend.
///
/// The control plane is managed through Helm; manifests and namespace labels
/// go straight to the API server.
pub struct KubernetesMesh {
    client: Client,
    helm: HelmRunner,
    sidecar: SidecarInjectionConfig,
    field_manager: String,
}

impl KubernetesMesh {
    /// Connect using the ambient kubeconfig or in-cluster configuration.
    pub async fn connect(config: &AdapterConfig) -> Result<Self> {
        let client = Client::try_default().await.map_err(Error::client_config)?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &AdapterConfig) -> Self {
        Self {
            client,
            helm: HelmRunner::new(config.helm.clone()),
            sidecar: config.sidecar_injection.clone(),
            field_manager: config.field_manager.clone(),
        }
    }

    async fn apply_object(&self, obj: DynamicObject, delete: bool, namespace: &str) -> Result<()> {
        let types = obj
            .types
            .as_ref()
            .ok_or_else(|| Error::mesh_config("manifest is missing apiVersion or kind"))?;
        let gvk = GroupVersionKind::try_from(types).map_err(Error::mesh_config)?;
        let (resource, caps) = discovery::pinned_kind(&self.client, &gvk)
            .await
            .map_err(Error::mesh_config)?;

        let api: Api<DynamicObject> = if caps.scope == Scope::Namespaced && !namespace.is_empty() {
            Api::namespaced_with(self.client.clone(), namespace, &resource)
        } else if caps.scope == Scope::Namespaced {
            Api::default_namespaced_with(self.client.clone(), &resource)
        } else {
            Api::all_with(self.client.clone(), &resource)
        };

        let name = obj.name_any();
        if delete {
            match api.delete(&name, &DeleteParams::default()).await {
                Ok(_) => info!(kind = %gvk.kind, name = %name, namespace, "Deleted resource"),
                Err(kube::Error::Api(resp)) if resp.code == 404 => {
                    debug!(kind = %gvk.kind, name = %name, namespace, "Resource already absent");
                }
                Err(e) => return Err(Error::mesh_config(e)),
            }
        } else {
            let params = PatchParams::apply(&self.field_manager).force();
            api.patch(&name, &params, &Patch::Apply(&obj))
                .await
                .map_err(Error::mesh_config)?;
            info!(kind = %gvk.kind, name = %name, namespace, "Applied resource");
        }
        Ok(())
    }
}

#[async_trait]
impl MeshOperations for KubernetesMesh {
    fn name(&self) -> &'static str {
        "kubernetes"
    }

    async fn install_or_remove(
        &self,
        delete: bool,
        version: &str,
        namespace: &str,
    ) -> Result<String> {
        if delete {
            self.helm
                .uninstall(namespace)
                .await
                .map_err(|e| Error::install_nginx(Error::apply_helm_chart(e)))?;
            return Ok("Nginx service mesh removed successfully".to_string());
        }

        self.helm
            .install(version, namespace)
            .await
            .map_err(|e| Error::install_nginx(Error::apply_helm_chart(e)))?;
        Ok(format!(
            "Nginx service mesh {} installed successfully",
            version
        ))
    }

    async fn apply_manifest(&self, document: &[u8], delete: bool, namespace: &str) -> Result<()> {
        for obj in parse_documents(document)? {
            self.apply_object(obj, delete, namespace).await?;
        }
        Ok(())
    }

    async fn label_namespace(&self, namespace: &str, delete: bool) -> Result<()> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let value = (!delete).then_some(self.sidecar.label_value.as_str());
        let patch = label_patch(&self.sidecar.label, value);

        api.patch(namespace, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(Error::load_namespace_to_mesh)?;
        Ok(())
    }
}

/// Split a YAML stream into objects, skipping empty documents.
fn parse_documents(document: &[u8]) -> Result<Vec<DynamicObject>> {
    let mut objects = Vec::new();
    for de in serde_yaml::Deserializer::from_slice(document) {
        let value = serde_yaml::Value::deserialize(de).map_err(Error::mesh_config)?;
        if value.is_null() {
            continue;
        }
        objects.push(serde_yaml::from_value(value).map_err(Error::mesh_config)?);
    }
    Ok(objects)
}

/// Merge patch that sets a namespace label, or removes it when `value` is `None`.
fn label_patch(label: &str, value: Option<&str>) -> Value {
    let mut labels = Map::new();
    labels.insert(
        label.to_string(),
        value.map_or(Value::Null, |v| Value::String(v.to_string())),
    );

    let mut metadata = Map::new();
    metadata.insert("labels".to_string(), Value::Object(labels));

    let mut patch = Map::new();
    patch.insert("metadata".to_string(), Value::Object(metadata));
    Value::Object(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nginx_adapter_core::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_parse_documents_skips_empty() {
        let yaml = br#"
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: first
data:
  key: value
---
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: second
spec:
  replicas: 1
"#;

        let objects = parse_documents(yaml).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].name_any(), "first");
        assert_eq!(objects[0].types.as_ref().unwrap().kind, "ConfigMap");
        assert_eq!(objects[1].types.as_ref().unwrap().api_version, "apps/v1");
        assert_eq!(objects[1].data["spec"]["replicas"], json!(1));
    }

    #[test]
    fn test_parse_documents_invalid_yaml() {
        let err = parse_documents(b"kind: [unterminated").unwrap_err();
        assert_eq!(err.code, ErrorCode::MeshConfig);
    }

    #[test]
    fn test_label_patch() {
        assert_eq!(
            label_patch("injector.nsm.nginx.com/auto-inject", Some("enabled")),
            json!({"metadata": {"labels": {"injector.nsm.nginx.com/auto-inject": "enabled"}}})
        );
        assert_eq!(
            label_patch("injector.nsm.nginx.com/auto-inject", None),
            json!({"metadata": {"labels": {"injector.nsm.nginx.com/auto-inject": null}}})
        );
    }
}
