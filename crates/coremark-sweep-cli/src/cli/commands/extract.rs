use crate::cli::args::{ExtractArgs, RecordFormat};
use crate::exit_codes::{SUCCESS, SWEEP_FAILED};
use anyhow::{Context, Result};
use coremark_sweep_core::{extract, Configuration, Field, MetricsRecord, ResultTable};
use std::io::{Read, Write};
use std::path::Path;

pub fn run(args: ExtractArgs) -> Result<i32> {
    let text = read_input(&args.input)?;
    let record = match extract(&text) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("{}: {}", args.input.display(), e);
            return Ok(SWEEP_FAILED);
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        RecordFormat::Text => write_text(&mut out, &record)?,
        RecordFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &record)?;
            writeln!(out)?;
        }
        RecordFormat::Csv => {
            let name = args
                .configuration
                .clone()
                .unwrap_or_else(|| default_configuration_name(&args.input));
            let mut table = ResultTable::new();
            table.append(Configuration::from(name), record);
            table.finalize(&mut out)?;
        }
    }
    Ok(SUCCESS)
}

/// Run logs may carry stray non-UTF-8 bytes from the target's console, so both
/// sources are decoded lossily, the same way the runner decodes its output.
fn read_input(input: &Path) -> Result<String> {
    let bytes = if input == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("reading run log from stdin")?;
        buf
    } else {
        std::fs::read(input).with_context(|| format!("reading run log {}", input.display()))?
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn default_configuration_name(input: &Path) -> String {
    if input == Path::new("-") {
        return "stdin".to_string();
    }
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}

fn write_text(out: &mut impl Write, record: &MetricsRecord) -> std::io::Result<()> {
    let width = Field::ALL
        .iter()
        .map(|f| f.column().len())
        .max()
        .unwrap_or(0);
    for field in Field::ALL {
        writeln!(out, "{:<width$}  {}", field.column(), record.get(field))?;
    }
    Ok(())
}
