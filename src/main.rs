//! Linebuf - a scripted debug harness for the text buffer.
//!
//! # Usage
//!
//! ```bash
//! linebuf session.txt
//! echo 'insert hi' | linebuf
//! linebuf --demo --format json
//! ```

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use linebuf::config::{
    HarnessFlags, OutputFormat, clear_harness_flags, global_config_path, load_harness_flags,
    local_override_path, parse_flag_tokens, save_harness_flags,
};
use linebuf::perf;
use linebuf::script::{DEMO_SCRIPT, Runner, StepReport, parse_script, render_state};

/// Run text buffer scripts and print the cursor state after each step
#[derive(Parser, Debug)]
#[command(name = "linebuf", version, about, long_about = None)]
struct Cli {
    /// Script file to run (`-` or omitted reads stdin)
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Run the built-in demo script
    #[arg(long, conflicts_with = "script")]
    demo: bool,

    /// Log every applied step at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Only report failures
    #[arg(short, long)]
    quiet: bool,

    /// Print timing for parsing and running
    #[arg(long)]
    perf: bool,

    /// Output format for step reports
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Write a trace event per step to a file
    #[arg(long, value_name = "PATH")]
    trace_log: Option<PathBuf>,

    /// Print only the status line for each step
    #[arg(long)]
    no_render: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

fn read_script(cli: &Cli) -> Result<(String, String)> {
    if cli.demo {
        return Ok(("<demo>".to_string(), DEMO_SCRIPT.to_string()));
    }
    match cli.script.as_deref() {
        Some(path) if path.as_os_str() != "-" => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read script {}", path.display()))?;
            Ok((path.display().to_string(), source))
        }
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read script from stdin")?;
            Ok(("<stdin>".to_string(), source))
        }
    }
}

fn print_report(
    out: &mut impl Write,
    report: &StepReport,
    rendered: Option<&str>,
    flags: &HarnessFlags,
) -> Result<()> {
    match flags.format.unwrap_or(OutputFormat::Text) {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, report).context("Failed to encode report")?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            let marker = if report.succeeded { "" } else { "  (blocked)" };
            writeln!(out, "{:>4}: {}{}", report.line, report.command, marker)?;
            if let Some(rendered) = rendered {
                for line in rendered.lines() {
                    writeln!(out, "      {line}")?;
                }
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_harness_flags(&global_path)?;
    }
    if cli.save {
        save_harness_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        HarnessFlags::default()
    } else {
        let global_flags = load_harness_flags(&global_path)?;
        let local_flags = load_harness_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_tracing(effective.verbose);
    perf::set_enabled(effective.perf);
    let trace_log_path = effective
        .trace_log
        .clone()
        .or_else(|| std::env::var_os("LINEBUF_TRACE_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_trace_log_path(trace_log_path.as_deref()) {
        tracing::warn!(
            path = %trace_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            %err,
            "failed to initialize trace log"
        );
    }

    let (name, source) = read_script(&cli)?;
    let steps = {
        let _scope = perf::scope("script.parse");
        parse_script(&source).with_context(|| format!("Failed to parse {name}"))?
    };
    tracing::debug!(script = %name, steps = steps.len(), "parsed script");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut runner = Runner::new();
    let _scope = perf::scope("script.run");
    for step in &steps {
        let report = match runner.apply(step) {
            Ok(report) => report.clone(),
            Err(err) => {
                out.flush()?;
                return Err(err).with_context(|| format!("{name} stopped"));
            }
        };
        if effective.quiet && report.succeeded {
            continue;
        }
        let rendered = (!effective.no_render).then(|| render_state(runner.buffer()));
        print_report(&mut out, &report, rendered.as_deref(), &effective)?;
    }
    out.flush()?;
    Ok(())
}
