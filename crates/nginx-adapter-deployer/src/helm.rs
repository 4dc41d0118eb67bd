//! Helm runner for installing the mesh control plane chart.

use nginx_adapter_config::HelmConfig;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum HelmError {
    #[error("failed to run helm: {0}")]
    Io(#[from] std::io::Error),

    #[error("helm {command} failed: {output}")]
    Failed { command: String, output: String },
}

/// Runs `helm` against the configured chart.
#[derive(Debug, Clone)]
pub struct HelmRunner {
    config: HelmConfig,
}

impl HelmRunner {
    pub fn new(config: HelmConfig) -> Self {
        Self { config }
    }

    /// Arguments for `helm upgrade --install`.
    pub fn install_args(&self, version: &str, namespace: &str) -> Vec<String> {
        let mut args = vec![
            "upgrade".to_string(),
            "--install".to_string(),
            self.config.release.clone(),
            self.config.chart.clone(),
        ];

        if !self.config.repository.is_empty() {
            args.push("--repo".to_string());
            args.push(self.config.repository.clone());
        }
        if !version.is_empty() {
            args.push("--version".to_string());
            args.push(version.to_string());
        }
        if !namespace.is_empty() {
            args.push("--namespace".to_string());
            args.push(namespace.to_string());
            args.push("--create-namespace".to_string());
        }
        args.push("--wait".to_string());
        args
    }

    /// Arguments for `helm uninstall`.
    pub fn uninstall_args(&self, namespace: &str) -> Vec<String> {
        let mut args = vec!["uninstall".to_string(), self.config.release.clone()];
        if !namespace.is_empty() {
            args.push("--namespace".to_string());
            args.push(namespace.to_string());
        }
        args
    }

    pub async fn install(&self, version: &str, namespace: &str) -> Result<String, HelmError> {
        info!(release = %self.config.release, version, namespace, "Running helm upgrade --install");
        self.run(self.install_args(version, namespace)).await
    }

    pub async fn uninstall(&self, namespace: &str) -> Result<String, HelmError> {
        info!(release = %self.config.release, namespace, "Running helm uninstall");
        self.run(self.uninstall_args(namespace)).await
    }

    async fn run(&self, args: Vec<String>) -> Result<String, HelmError> {
        let output = Command::new(&self.config.binary)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            let command = args.first().cloned().unwrap_or_default();
            error!(command = %command, output = %stderr, "Helm command failed");
            return Err(HelmError::Failed {
                command,
                output: format!("{}\n{}", stdout, stderr).trim().to_string(),
            });
        }

        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> HelmRunner {
        HelmRunner::new(HelmConfig::default())
    }

    #[test]
    fn test_install_args() {
        let args = runner().install_args("1.7.0", "nginx-mesh");
        assert_eq!(
            args,
            vec![
                "upgrade",
                "--install",
                "nginx-service-mesh",
                "nginx-service-mesh",
                "--repo",
                "https://helm.nginx.com/stable",
                "--version",
                "1.7.0",
                "--namespace",
                "nginx-mesh",
                "--create-namespace",
                "--wait",
            ]
        );
    }

    #[test]
    fn test_install_args_without_repo_or_namespace() {
        let runner = HelmRunner::new(HelmConfig {
            chart: "./charts/nginx-service-mesh".to_string(),
            repository: String::new(),
            ..HelmConfig::default()
        });

        let args = runner.install_args("", "");
        assert_eq!(
            args,
            vec![
                "upgrade",
                "--install",
                "nginx-service-mesh",
                "./charts/nginx-service-mesh",
                "--wait",
            ]
        );
    }

    #[test]
    fn test_uninstall_args() {
        assert_eq!(
            runner().uninstall_args("nginx-mesh"),
            vec!["uninstall", "nginx-service-mesh", "--namespace", "nginx-mesh"]
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_io_error() {
        let runner = HelmRunner::new(HelmConfig {
            binary: "/nonexistent/helm".to_string(),
            ..HelmConfig::default()
        });

        let err = runner.uninstall("default").await.unwrap_err();
        assert!(matches!(err, HelmError::Io(_)));
    }
}
