use crate::cli::args::RunArgs;
use crate::exit_codes::{SUCCESS, SWEEP_FAILED};
use anyhow::{Context, Result};
use coremark_sweep_core::{
    run_sweep, Configuration, ConfigurationFailure, FailurePolicy, MakeRunner, SweepConfig,
    SweepOptions, SweepReport, SweepSummary,
};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn run(args: RunArgs) -> Result<i32> {
    let config = load_config(&args)?;
    let configurations = config
        .resolved_configurations()
        .context("invalid configuration list")?;

    tracing::info!(
        "sweeping {} configuration(s) at XLEN={} in {}",
        configurations.len(),
        config.xlen,
        config.runner.workdir.display()
    );

    let mut runner = MakeRunner::new(config.runner.clone(), config.xlen);
    let options = SweepOptions {
        failure_policy: config.failure_policy,
        raw_output_dir: config.raw_output_dir.clone(),
    };
    let report = run_sweep(&mut runner, &configurations, &options);

    for failure in &report.failures {
        eprintln!("FAILED {}: {}", failure.configuration, failure.cause);
    }

    // The table goes to disk before any side output can fail.
    let success = report.is_success();
    let SweepReport {
        table,
        failures,
        summary,
    } = report;
    if summary.aborted {
        eprintln!(
            "Sweep aborted after {} of {} configuration(s); {} not written",
            summary.succeeded + summary.failed,
            summary.total,
            config.output.display()
        );
    } else {
        let rows = table.len();
        table
            .write_to_path(&config.output)
            .with_context(|| format!("writing results to {}", config.output.display()))?;
        eprintln!(
            "Wrote {} row(s) to {} ({} failed)",
            rows,
            config.output.display(),
            summary.failed
        );
    }

    if let Some(path) = &args.summary_json {
        write_summary(path, &summary, &failures)?;
    }

    Ok(if success { SUCCESS } else { SWEEP_FAILED })
}

/// Config file (if any) with command-line overrides applied.
fn load_config(args: &RunArgs) -> Result<SweepConfig> {
    let mut config = match &args.config {
        Some(path) => SweepConfig::from_file(path)
            .with_context(|| format!("loading sweep config {}", path.display()))?,
        None => SweepConfig::default(),
    };

    if let Some(xlen) = args.xlen {
        config.xlen = xlen;
    }
    if !args.configurations.is_empty() {
        config.configurations = args
            .configurations
            .iter()
            .map(|c| Configuration::from(c.as_str()))
            .collect();
    }
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if let Some(dir) = &args.raw_output_dir {
        config.raw_output_dir = Some(dir.clone());
    }
    if args.fail_fast {
        config.failure_policy = FailurePolicy::FailFast;
    }
    if let Some(workdir) = &args.workdir {
        config.runner.workdir = workdir.clone();
    }
    if let Some(program) = &args.make_program {
        config.runner.program = program.clone();
    }
    if args.no_clean {
        config.runner.clean = false;
    }
    Ok(config)
}

#[derive(Serialize)]
struct SummaryJson<'a> {
    summary: &'a SweepSummary,
    failures: Vec<FailureJson>,
}

#[derive(Serialize)]
struct FailureJson {
    configuration: String,
    kind: &'static str,
    message: String,
}

fn write_summary(
    path: &Path,
    summary: &SweepSummary,
    failures: &[ConfigurationFailure],
) -> Result<()> {
    let doc = SummaryJson {
        summary,
        failures: failures
            .iter()
            .map(|f| FailureJson {
                configuration: f.configuration.to_string(),
                kind: f.cause.kind(),
                message: f.cause.to_string(),
            })
            .collect(),
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(&doc)?;
    fs::write(path, json).with_context(|| format!("writing summary to {}", path.display()))?;
    Ok(())
}
