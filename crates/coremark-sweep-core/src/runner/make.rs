//! `make`-driven runner: `make clean`, `make all XLEN=.. ARCH=..`, then
//! `make run XLEN=.. ARCH=..` whose output is returned.

use super::{Runner, Step};
use crate::config::RunnerSettings;
use crate::configuration::{Configuration, Xlen};
use crate::error::RunnerError;
use std::process::{Command, Output, Stdio};
use std::time::Instant;

/// Cap on the stderr excerpt carried by a step failure.
const STDERR_TAIL_BYTES: usize = 4096;

#[derive(Debug, Clone)]
pub struct MakeRunner {
    settings: RunnerSettings,
    xlen: Xlen,
}

impl MakeRunner {
    pub fn new(settings: RunnerSettings, xlen: Xlen) -> Self {
        Self { settings, xlen }
    }

    pub fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    fn command(&self, step: Step, configuration: &Configuration) -> Command {
        let mut cmd = Command::new(&self.settings.program);
        cmd.current_dir(&self.settings.workdir)
            .arg(step.target())
            .stdin(Stdio::null());
        if step != Step::Clean {
            cmd.arg(format!("XLEN={}", self.xlen))
                .arg(format!("ARCH={configuration}"))
                .args(&self.settings.extra_args);
        }
        cmd
    }

    fn run_step(&self, step: Step, configuration: &Configuration) -> Result<Output, RunnerError> {
        let start = Instant::now();
        let output = self
            .command(step, configuration)
            .output()
            .map_err(|source| RunnerError::Spawn {
                step,
                program: self.settings.program.clone(),
                source,
            })?;

        tracing::debug!(
            configuration = %configuration,
            step = %step,
            elapsed_ms = start.elapsed().as_millis() as u64,
            status = ?output.status.code(),
            "make step finished"
        );

        if !output.status.success() {
            return Err(RunnerError::StepFailed {
                step,
                code: output.status.code(),
                stderr_tail: stderr_tail(&output.stderr),
            });
        }
        Ok(output)
    }
}

impl Runner for MakeRunner {
    fn run(&mut self, configuration: &Configuration) -> Result<String, RunnerError> {
        if self.settings.clean {
            self.run_step(Step::Clean, configuration)?;
        }
        self.run_step(Step::Build, configuration)?;
        let output = self.run_step(Step::Run, configuration)?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        if text.trim().is_empty() {
            return Err(RunnerError::EmptyOutput { step: Step::Run });
        }
        Ok(text)
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim_end();
    if text.len() <= STDERR_TAIL_BYTES {
        return text.to_string();
    }
    let mut start = text.len() - STDERR_TAIL_BYTES;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn build_and_run_pass_xlen_arch_and_extra_args() {
        let settings = RunnerSettings {
            extra_args: vec!["-j4".into()],
            ..RunnerSettings::default()
        };
        let runner = MakeRunner::new(settings, Xlen::Rv64);
        let cfg = Configuration::from("rv64gc");

        assert_eq!(args_of(&runner.command(Step::Clean, &cfg)), ["clean"]);
        assert_eq!(
            args_of(&runner.command(Step::Build, &cfg)),
            ["all", "XLEN=64", "ARCH=rv64gc", "-j4"]
        );
        assert_eq!(
            args_of(&runner.command(Step::Run, &cfg)),
            ["run", "XLEN=64", "ARCH=rv64gc", "-j4"]
        );
    }

    #[test]
    fn stderr_tail_keeps_the_end() {
        let long = format!("{}END", "é".repeat(STDERR_TAIL_BYTES));
        let tail = stderr_tail(long.as_bytes());
        assert!(tail.len() <= STDERR_TAIL_BYTES);
        assert!(tail.ends_with("END"));
        assert_eq!(stderr_tail(b"short\n"), "short");
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let settings = RunnerSettings {
            program: "/nonexistent/coremark-make".into(),
            ..RunnerSettings::default()
        };
        let mut runner = MakeRunner::new(settings, Xlen::Rv32);
        let err = runner.run(&Configuration::from("rv32gc")).unwrap_err();
        assert!(matches!(
            err,
            RunnerError::Spawn {
                step: Step::Clean,
                ..
            }
        ));
    }
}
