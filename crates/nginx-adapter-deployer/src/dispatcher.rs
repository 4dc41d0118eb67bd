//! Component dispatcher.
//!
//! Routes each OAM component to the handler registered for its type, falling
//! back to [`CoreComponentHandler`] for anything unknown. Failures are recorded
//! per item and the batch always runs to the end.

use nginx_adapter_config::{AdapterConfig, SidecarInjectionConfig};
use nginx_adapter_core::value::property_string_list;
use nginx_adapter_core::{
    ApplicationConfiguration, Component, Error, ErrorList, HandleOutcome, MeshOperations,
    merge_errors,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::handlers::{ComponentHandler, CoreComponentHandler, NginxHandler};

/// Type name of the mesh control plane component.
pub const NGINX_COMPONENT_TYPE: &str = "Nginx";

pub struct ComponentDispatcher {
    operations: Arc<dyn MeshOperations>,
    handlers: HashMap<String, Box<dyn ComponentHandler>>,
    fallback: CoreComponentHandler,
    sidecar: SidecarInjectionConfig,
}

impl ComponentDispatcher {
    pub fn new(operations: Arc<dyn MeshOperations>, config: &AdapterConfig) -> Self {
        let mut dispatcher = Self {
            operations,
            handlers: HashMap::new(),
            fallback: CoreComponentHandler::new(config.annotations.clone()),
            sidecar: config.sidecar_injection.clone(),
        };
        dispatcher.register(NGINX_COMPONENT_TYPE, NginxHandler);
        dispatcher
    }

    /// Register a handler for a component type, replacing any existing one.
    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        handler: impl ComponentHandler + 'static,
    ) {
        self.handlers.insert(type_name.into(), Box::new(handler));
    }

    pub fn handles(&self, type_name: &str) -> bool {
        self.handlers.contains_key(type_name)
    }

    /// Install or delete each component in order.
    pub async fn handle_components(
        &self,
        components: &[Component],
        delete: bool,
    ) -> HandleOutcome {
        let mut outcome = HandleOutcome::new();
        let ops = self.operations.as_ref();

        for comp in components {
            let result = match self.handlers.get(comp.type_name()) {
                Some(handler) => {
                    debug!(
                        component = %comp.name(),
                        component_type = %comp.type_name(),
                        "Dispatching to registered handler"
                    );
                    handler.handle(ops, comp, delete).await
                }
                None => {
                    debug!(
                        component = %comp.name(),
                        component_type = %comp.type_name(),
                        "Dispatching to core component handler"
                    );
                    self.fallback.apply(ops, comp, delete, None, None).await
                }
            };

            match &result {
                Ok(msg) => info!(component = %comp.name(), "{}", msg),
                Err(e) => {
                    error!(component = %comp.name(), code = %e.code, error = %e, "Component failed")
                }
            }
            outcome.record(result);
        }

        outcome
    }

    /// Apply the traits of an application configuration.
    ///
    /// Only the sidecar injection trait has an effect; every trait still gets
    /// an "applied trait" message.
    pub async fn handle_application_configuration(
        &self,
        config: &ApplicationConfiguration,
        delete: bool,
    ) -> HandleOutcome {
        let mut outcome = HandleOutcome::new();
        let ops = self.operations.as_ref();

        for comp in &config.spec.components {
            for t in &comp.traits {
                if t.name == self.sidecar.trait_name {
                    match property_string_list(&t.properties, "namespaces") {
                        Ok(namespaces) => {
                            if let Err(errors) = label_namespaces(ops, &namespaces, delete).await {
                                errors.into_iter().for_each(|e| outcome.push_error(e));
                            }
                        }
                        Err(e) => {
                            let err = Error::process_oam(format!(
                                "trait {} on service {}: {}",
                                t.name, comp.component_name, e
                            ));
                            error!(error = %err, "Invalid trait properties");
                            outcome.push_error(err);
                        }
                    }
                }

                outcome.push_message(format!(
                    "applied trait \"{}\" on service \"{}\"",
                    t.name, comp.component_name
                ));
            }
        }

        outcome
    }
}

/// Label every namespace, continuing past individual failures.
pub async fn label_namespaces(
    ops: &dyn MeshOperations,
    namespaces: &[String],
    delete: bool,
) -> Result<(), ErrorList> {
    let mut errors = Vec::new();
    for ns in namespaces {
        match ops.label_namespace(ns, delete).await {
            Ok(()) => info!(namespace = %ns, delete, "Updated sidecar injection label"),
            Err(e) => {
                error!(namespace = %ns, error = %e, "Failed to label namespace");
                errors.push(e);
            }
        }
    }
    merge_errors(errors)
}
