use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HarnessFlags {
    pub verbose: bool,
    pub quiet: bool,
    pub perf: bool,
    pub no_render: bool,
    pub format: Option<OutputFormat>,
    pub trace_log: Option<PathBuf>,
}

impl HarnessFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            verbose: self.verbose || other.verbose,
            quiet: self.quiet || other.quiet,
            perf: self.perf || other.perf,
            no_render: self.no_render || other.no_render,
            format: other.format.or(self.format),
            trace_log: other
                .trace_log
                .clone()
                .or_else(|| self.trace_log.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("linebuf").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("linebuf")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("linebuf").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("linebuf")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".linebufrc")
}

pub fn load_harness_flags(path: &Path) -> Result<HarnessFlags> {
    if !path.exists() {
        return Ok(HarnessFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_harness_flags(path: &Path, flags: &HarnessFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# linebuf defaults (saved with --save)".to_string());
    if flags.verbose {
        lines.push("--verbose".to_string());
    }
    if flags.quiet {
        lines.push("--quiet".to_string());
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if flags.no_render {
        lines.push("--no-render".to_string());
    }
    if let Some(format) = flags.format {
        lines.push(format!("--format {}", format_name(format)));
    }
    if let Some(path) = &flags.trace_log {
        lines.push(format!("--trace-log {}", path.display()));
    }
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_harness_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> HarnessFlags {
    let mut flags = HarnessFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--verbose" || token == "-v" {
            flags.verbose = true;
        } else if token == "--quiet" || token == "-q" {
            flags.quiet = true;
        } else if token == "--perf" {
            flags.perf = true;
        } else if token == "--no-render" {
            flags.no_render = true;
        } else if token == "--format" {
            if let Some(next) = tokens.get(i + 1) {
                flags.format = parse_format(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--format=") {
            flags.format = parse_format(value);
        } else if token == "--trace-log" {
            if let Some(next) = tokens.get(i + 1) {
                flags.trace_log = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--trace-log=") {
            flags.trace_log = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

const fn format_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "text",
        OutputFormat::Json => "json",
    }
}

fn parse_format(s: &str) -> Option<OutputFormat> {
    match s {
        "text" => Some(OutputFormat::Text),
        "json" => Some(OutputFormat::Json),
        _ => None,
    }
}
