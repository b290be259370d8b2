//! The sweep loop: for each configuration, run, extract, record.
//!
//! Strictly sequential. The runner shares one build tree between
//! configurations, so a configuration is fully processed before the next one
//! starts.

use crate::config::FailurePolicy;
use crate::configuration::Configuration;
use crate::error::{ExtractError, RunnerError};
use crate::metrics::{self, MetricsRecord};
use crate::runner::Runner;
use crate::table::ResultTable;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct SweepOptions {
    pub failure_policy: FailurePolicy,
    /// Where to keep each configuration's raw run text, as
    /// `<position>-<configuration>.log` with the 1-based sweep position
    /// zero-padded to two digits.
    pub raw_output_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum FailureCause {
    #[error("runner failed: {0}")]
    Runner(#[from] RunnerError),

    #[error("metrics extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

impl FailureCause {
    pub fn kind(&self) -> &'static str {
        match self {
            FailureCause::Runner(_) => "runner",
            FailureCause::Extract(_) => "extract",
        }
    }
}

#[derive(Debug)]
pub struct ConfigurationFailure {
    pub configuration: Configuration,
    pub cause: FailureCause,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Configurations never attempted because the sweep stopped early.
    pub skipped: usize,
    pub aborted: bool,
}

#[derive(Debug)]
pub struct SweepReport {
    /// Successful configurations only, in sweep order.
    pub table: ResultTable,
    pub failures: Vec<ConfigurationFailure>,
    pub summary: SweepSummary,
}

impl SweepReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && !self.summary.aborted
    }
}

pub fn run_sweep<R: Runner + ?Sized>(
    runner: &mut R,
    configurations: &[Configuration],
    options: &SweepOptions,
) -> SweepReport {
    let total = configurations.len();
    let mut table = ResultTable::new();
    let mut failures = Vec::new();
    let mut summary = SweepSummary {
        total,
        ..SweepSummary::default()
    };

    for (index, configuration) in configurations.iter().enumerate() {
        let start = Instant::now();
        tracing::info!(
            configuration = %configuration,
            "[{}/{}] running {}",
            index + 1,
            total,
            configuration
        );

        match process(runner, index, configuration, options) {
            Ok(record) => {
                tracing::info!(
                    configuration = %configuration,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "{}: CoreMark/MHz {} CPI {}",
                    configuration,
                    record.coremark_per_mhz,
                    record.cpi
                );
                table.append(configuration.clone(), record);
                summary.succeeded += 1;
            }
            Err(cause) => {
                tracing::error!(configuration = %configuration, "{}: {}", configuration, cause);
                failures.push(ConfigurationFailure {
                    configuration: configuration.clone(),
                    cause,
                });
                summary.failed += 1;
                if options.failure_policy == FailurePolicy::FailFast {
                    summary.skipped = total - index - 1;
                    summary.aborted = true;
                    tracing::warn!(
                        skipped = summary.skipped,
                        "stopping sweep after failure of {}",
                        configuration
                    );
                    break;
                }
            }
        }
    }

    SweepReport {
        table,
        failures,
        summary,
    }
}

fn process<R: Runner + ?Sized>(
    runner: &mut R,
    index: usize,
    configuration: &Configuration,
    options: &SweepOptions,
) -> Result<MetricsRecord, FailureCause> {
    let output = runner.run(configuration)?;
    if let Some(dir) = &options.raw_output_dir {
        // A log that cannot be kept does not invalidate the run.
        if let Err(e) = save_raw_output(dir, index, configuration, &output) {
            tracing::warn!(configuration = %configuration, "cannot save raw output: {}", e);
        }
    }
    Ok(metrics::extract(&output)?)
}

/// File name of a kept raw log. The position keeps repeated or colliding
/// configuration names from overwriting each other.
fn raw_output_file_name(index: usize, configuration: &Configuration) -> String {
    format!("{:02}-{}.log", index + 1, configuration.file_stem())
}

fn save_raw_output(
    dir: &Path,
    index: usize,
    configuration: &Configuration,
    output: &str,
) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(raw_output_file_name(index, configuration)), output)
}
