//! The external build/run collaborator.

mod make;

pub use make::MakeRunner;

use crate::configuration::Configuration;
use crate::error::RunnerError;
use std::fmt;

/// Builds and runs the benchmark for one configuration and returns the text the
/// run produced. Implementations block until the run completes.
pub trait Runner {
    fn run(&mut self, configuration: &Configuration) -> Result<String, RunnerError>;
}

impl<F> Runner for F
where
    F: FnMut(&Configuration) -> Result<String, RunnerError>,
{
    fn run(&mut self, configuration: &Configuration) -> Result<String, RunnerError> {
        self(configuration)
    }
}

/// One step of the clean/build/run cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Clean,
    Build,
    Run,
}

impl Step {
    /// Make target for the step.
    pub fn target(self) -> &'static str {
        match self {
            Step::Clean => "clean",
            Step::Build => "all",
            Step::Run => "run",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target())
    }
}
