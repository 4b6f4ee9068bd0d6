//! Timing scopes and the harness trace log.
//!
//! A [`Scope`] opens a `tracing` span for its lifetime and, when timing is
//! enabled, prints its elapsed time to stderr. The trace log is a JSON-lines
//! file with one [`TraceRecord`] per event, numbered in emission order.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

static ENABLED: AtomicBool = AtomicBool::new(false);
static TRACE_LOG: Mutex<Option<TraceLog>> = Mutex::new(None);

/// Times a region of the harness until dropped.
#[derive(Debug)]
#[must_use = "a scope measures nothing unless it is held"]
pub struct Scope {
    name: &'static str,
    start: Instant,
    _span: tracing::span::EnteredSpan,
}

impl Scope {
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(elapsed_ms, "scope finished");
        if is_enabled() {
            eprintln!("[perf] {}: {elapsed_ms:.2} ms", self.name);
        }
        log_event(self.name, format!("{elapsed_ms:.3} ms"));
    }
}

/// One line of the trace log.
#[derive(Debug, Serialize)]
pub struct TraceRecord<'a> {
    pub seq: u64,
    pub elapsed_ms: f64,
    pub event: &'a str,
    pub detail: &'a str,
}

#[derive(Debug)]
struct TraceLog {
    start: Instant,
    next_seq: u64,
    writer: BufWriter<File>,
}

impl TraceLog {
    fn write(&mut self, event: &str, detail: &str) -> io::Result<()> {
        let record = TraceRecord {
            seq: self.next_seq,
            elapsed_ms: self.start.elapsed().as_secs_f64() * 1000.0,
            event,
            detail,
        };
        self.next_seq += 1;
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

fn trace_log() -> MutexGuard<'static, Option<TraceLog>> {
    TRACE_LOG.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
        _span: tracing::debug_span!("perf", scope = name).entered(),
    }
}

/// Start writing trace records to `path`, or stop when `None`.
///
/// Opening a log writes a `trace.start` record first.
pub fn set_trace_log_path(path: Option<&Path>) -> io::Result<()> {
    let mut log = trace_log();
    *log = None;
    if let Some(path) = path {
        let mut opened = TraceLog {
            start: Instant::now(),
            next_seq: 0,
            writer: BufWriter::new(File::create(path)?),
        };
        opened.write("trace.start", "linebuf")?;
        *log = Some(opened);
    }
    Ok(())
}

pub fn is_trace_log_enabled() -> bool {
    trace_log().is_some()
}

pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut log = trace_log();
    let Some(open) = log.as_mut() else {
        return;
    };
    if let Err(err) = open.write(name, detail.as_ref()) {
        tracing::warn!(%err, "dropping trace log after write failure");
        *log = None;
    }
}
