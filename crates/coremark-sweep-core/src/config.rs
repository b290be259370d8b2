//! Sweep configuration file (`sweep.yaml`).
//!
//! Every key is optional:
//!
//! ```yaml
//! xlen: 64
//! configurations: [rv64gc, rv64i_zicsr]
//! output: results/coremark_results.csv
//! raw_output_dir: results/logs
//! failure_policy: fail-fast
//! runner:
//!   program: make
//!   workdir: benchmarks/coremark
//!   clean: true
//!   extra_args: ["-j4"]
//! ```

use crate::configuration::{Configuration, Xlen};
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "coremark_results.csv";

/// What the sweep does after a configuration fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Record the failure and move on to the next configuration.
    #[default]
    Continue,
    /// Stop at the first failure.
    FailFast,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerSettings {
    pub program: String,
    pub workdir: PathBuf,
    /// Run `make clean` before each build. The build tree is shared between
    /// configurations, so disabling this is only safe for incremental runs of
    /// a single configuration.
    pub clean: bool,
    pub extra_args: Vec<String>,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            program: "make".to_string(),
            workdir: PathBuf::from("."),
            clean: true,
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub xlen: Xlen,
    /// Sweep order. Empty means the built-in list for `xlen`.
    pub configurations: Vec<Configuration>,
    pub output: PathBuf,
    pub raw_output_dir: Option<PathBuf>,
    pub failure_policy: FailurePolicy,
    pub runner: RunnerSettings,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            xlen: Xlen::default(),
            configurations: Vec::new(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            raw_output_dir: None,
            failure_policy: FailurePolicy::default(),
            runner: RunnerSettings::default(),
        }
    }
}

impl SweepConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, Some(path))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, None)
    }

    fn parse(content: &str, path: Option<&Path>) -> Result<Self, ConfigError> {
        // An empty file is a valid all-defaults config.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.map(Path::to_path_buf),
            source,
        })
    }

    /// The configurations to sweep, in order.
    pub fn resolved_configurations(&self) -> Result<Vec<Configuration>, ConfigError> {
        if self.configurations.is_empty() {
            return Ok(self.xlen.builtin_configurations());
        }
        if let Some(index) = self
            .configurations
            .iter()
            .position(|c| c.as_str().trim().is_empty())
        {
            return Err(ConfigError::EmptyConfiguration { index });
        }
        Ok(self.configurations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let cfg = SweepConfig::from_yaml_str("").unwrap();
        assert_eq!(cfg, SweepConfig::default());
        assert_eq!(cfg.output, PathBuf::from("coremark_results.csv"));
        assert_eq!(cfg.runner.program, "make");
        assert!(cfg.runner.clean);
        assert_eq!(
            cfg.resolved_configurations().unwrap(),
            Xlen::Rv32.builtin_configurations()
        );
    }

    #[test]
    fn full_document() {
        let cfg = SweepConfig::from_yaml_str(
            r#"
xlen: 64
configurations: [rv64gc, rv64i_zicsr, rv64gc]
output: out/results.csv
raw_output_dir: out/logs
failure_policy: fail-fast
runner:
  program: gmake
  workdir: bench
  clean: false
  extra_args: ["-j4"]
"#,
        )
        .unwrap();
        assert_eq!(cfg.xlen, Xlen::Rv64);
        assert_eq!(cfg.failure_policy, FailurePolicy::FailFast);
        assert_eq!(cfg.raw_output_dir, Some(PathBuf::from("out/logs")));
        assert_eq!(cfg.runner.program, "gmake");
        assert!(!cfg.runner.clean);
        assert_eq!(cfg.runner.extra_args, vec!["-j4".to_string()]);
        // Duplicates are kept: the sweep does not deduplicate.
        let names: Vec<_> = cfg
            .resolved_configurations()
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(names, ["rv64gc", "rv64i_zicsr", "rv64gc"]);
    }

    #[test]
    fn empty_configuration_list_uses_builtin_for_xlen() {
        let cfg = SweepConfig::from_yaml_str("xlen: 64\nconfigurations: []\n").unwrap();
        assert_eq!(
            cfg.resolved_configurations().unwrap(),
            Xlen::Rv64.builtin_configurations()
        );
    }

    #[test]
    fn rejects_bad_xlen_and_unknown_keys() {
        assert!(matches!(
            SweepConfig::from_yaml_str("xlen: 16"),
            Err(ConfigError::Parse { path: None, .. })
        ));
        assert!(matches!(
            SweepConfig::from_yaml_str("arch_list: [rv32gc]"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_blank_configuration_name() {
        let cfg = SweepConfig::from_yaml_str("configurations: [rv32gc, '  ']").unwrap();
        assert!(matches!(
            cfg.resolved_configurations(),
            Err(ConfigError::EmptyConfiguration { index: 1 })
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = SweepConfig::from_file(Path::new("/nonexistent/sweep.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
