//! Error catalog for the adapter.
//!
//! Every failure the adapter reports is one of a fixed set of kinds. Each kind
//! has a stable code, a severity and a short summary; the underlying cause is
//! kept as text in the long description.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum ErrorCode {
    #[display("1005")]
    #[serde(rename = "1005")]
    CustomOperation,
    #[display("1006")]
    #[serde(rename = "1006")]
    InstallNginx,
    #[display("1007")]
    #[serde(rename = "1007")]
    MeshConfig,
    #[display("1008")]
    #[serde(rename = "1008")]
    ClientConfig,
    #[display("1009")]
    #[serde(rename = "1009")]
    StreamEvent,
    #[display("1010")]
    #[serde(rename = "1010")]
    SampleApp,
    #[display("1011")]
    #[serde(rename = "1011")]
    OpInvalid,
    #[display("1012")]
    #[serde(rename = "1012")]
    NilClient,
    #[display("1013")]
    #[serde(rename = "1013")]
    ApplyHelmChart,
    #[display("1014")]
    #[serde(rename = "1014")]
    CoreComponentFail,
    #[display("1015")]
    #[serde(rename = "1015")]
    InvalidOamComponentType,
    #[display("1016")]
    #[serde(rename = "1016")]
    ProcessOam,
    #[display("1017")]
    #[serde(rename = "1017")]
    AddonFromTemplate,
    #[display("1018")]
    #[serde(rename = "1018")]
    ParseCoreComponent,
    #[display("1019")]
    #[serde(rename = "1019")]
    LoadNamespaceToMesh,
}

/// How urgently an error needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[display("emergency")]
    Emergency,
    #[display("alert")]
    Alert,
    #[display("critical")]
    Critical,
    #[display("fatal")]
    Fatal,
}

/// A catalogued adapter error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{}: {}", .short_description.join(". "), .long_description.join(". "))]
pub struct Error {
    pub code: ErrorCode,
    pub severity: Severity,
    pub short_description: Vec<String>,
    pub long_description: Vec<String>,
    pub probable_cause: Vec<String>,
    pub suggested_remediation: Vec<String>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    fn alert(code: ErrorCode, short: &str, cause: impl std::fmt::Display) -> Self {
        Self {
            code,
            severity: Severity::Alert,
            short_description: vec![short.to_string()],
            long_description: vec![cause.to_string()],
            probable_cause: Vec::new(),
            suggested_remediation: Vec::new(),
        }
    }

    /// An invalid operation was requested.
    pub fn op_invalid() -> Self {
        Self {
            code: ErrorCode::OpInvalid,
            severity: Severity::Alert,
            short_description: vec!["Invalid operation".to_string()],
            long_description: Vec::new(),
            probable_cause: Vec::new(),
            suggested_remediation: Vec::new(),
        }
    }

    /// The Kubernetes client has not been initialized.
    pub fn nil_client() -> Self {
        Self {
            code: ErrorCode::NilClient,
            severity: Severity::Alert,
            short_description: vec!["kubernetes client not initialized".to_string()],
            long_description: vec!["Kubernetes client is nil".to_string()],
            probable_cause: vec!["kubernetes client not initialized".to_string()],
            suggested_remediation: vec!["Reconnect the adaptor to Meshery server".to_string()],
        }
    }

    pub fn install_nginx(cause: impl std::fmt::Display) -> Self {
        Self::alert(ErrorCode::InstallNginx, "Error with Nginx installation", cause)
    }

    pub fn mesh_config(cause: impl std::fmt::Display) -> Self {
        Self::alert(ErrorCode::MeshConfig, "Error configuration mesh", cause)
    }

    pub fn client_config(cause: impl std::fmt::Display) -> Self {
        Self::alert(ErrorCode::ClientConfig, "Error setting client config", cause)
    }

    pub fn stream_event(cause: impl std::fmt::Display) -> Self {
        Self::alert(ErrorCode::StreamEvent, "Error streaming events", cause)
    }

    pub fn sample_app(cause: impl std::fmt::Display) -> Self {
        Self::alert(ErrorCode::SampleApp, "Error with sample app operation", cause)
    }

    pub fn custom_operation(cause: impl std::fmt::Display) -> Self {
        Self::alert(
            ErrorCode::CustomOperation,
            "Error with applying custom operation",
            cause,
        )
    }

    pub fn apply_helm_chart(cause: impl std::fmt::Display) -> Self {
        Self::alert(
            ErrorCode::ApplyHelmChart,
            "Error occured while applying Helm Chart",
            cause,
        )
    }

    /// Processing of a core (manifest-backed) component failed.
    pub fn core_component_fail(cause: impl std::fmt::Display) -> Self {
        Self::alert(
            ErrorCode::CoreComponentFail,
            "error in nginx core component",
            cause,
        )
    }

    pub fn invalid_oam_component_type(cause: impl std::fmt::Display) -> Self {
        Self::alert(
            ErrorCode::InvalidOamComponentType,
            "invalid OAM component type",
            cause,
        )
    }

    /// Generic failure while handling OAM input.
    pub fn process_oam(cause: impl std::fmt::Display) -> Self {
        Self::alert(ErrorCode::ProcessOam, "error performing OAM operations", cause)
    }

    pub fn addon_from_template(cause: impl std::fmt::Display) -> Self {
        Self::alert(
            ErrorCode::AddonFromTemplate,
            "Error with addon install operation",
            cause,
        )
    }

    /// A core component manifest could not be serialized.
    pub fn parse_core_component(cause: impl std::fmt::Display) -> Self {
        Self::alert(
            ErrorCode::ParseCoreComponent,
            "nginx core component manifest parsing failing",
            cause,
        )
    }

    pub fn load_namespace_to_mesh(cause: impl std::fmt::Display) -> Self {
        Self::alert(
            ErrorCode::LoadNamespaceToMesh,
            "Could not label the appropriate namespace",
            cause,
        )
    }
}
