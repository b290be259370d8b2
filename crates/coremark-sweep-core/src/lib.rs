//! Core of the CoreMark configuration sweep.
//!
//! A sweep runs the benchmark once per processor configuration, scrapes the
//! performance counters out of the run log and tabulates one row per
//! configuration:
//!
//! ```text
//! configurations -> Runner (make clean/all/run) -> metrics::extract -> ResultTable -> CSV
//! ```
//!
//! The runner is a collaborator behind the [`Runner`] trait so the pipeline can
//! be exercised without spawning processes.

pub mod config;
pub mod configuration;
pub mod error;
pub mod metrics;
pub mod runner;
pub mod sweep;
pub mod table;

pub use config::{FailurePolicy, RunnerSettings, SweepConfig};
pub use configuration::{Configuration, Xlen};
pub use error::{ConfigError, ExtractError, RunnerError, TableError};
pub use metrics::{extract, Field, FixedPoint, MetricValue, MetricsRecord};
pub use runner::{MakeRunner, Runner, Step};
pub use sweep::{run_sweep, ConfigurationFailure, FailureCause, SweepOptions, SweepReport, SweepSummary};
pub use table::{ResultRow, ResultTable, HEADER};
