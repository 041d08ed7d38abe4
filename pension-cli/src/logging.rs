//! Process-wide tracing setup for the `pension` binary.
//!
//! Reports go to stdout, so log records are written to stderr. A second
//! layer can be pointed at a file once the configuration has been read.

use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock},
};

use anyhow::{Result, anyhow, bail};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

pub const DEFAULT_LEVEL: &str = "info";

// ── formatter ───────────────────────────────────────────────────────────────

/// `2025-10-04T14:30:05.123456+02:00  WARN submission/mod.rs:160 message`
struct LocalTimeFormat;

impl LocalTimeFormat {
    fn level_style(level: Level) -> &'static str {
        match level {
            Level::ERROR => "\x1b[1;31m",
            Level::WARN => "\x1b[1;33m",
            Level::INFO => "\x1b[1;32m",
            Level::DEBUG => "\x1b[1;34m",
            Level::TRACE => "\x1b[1;35m",
        }
    }
}

impl<S, N> FormatEvent<S, N> for LocalTimeFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f%:z");

        if writer.has_ansi_escapes() {
            let style = Self::level_style(*meta.level());
            write!(writer, "\x1b[2m{timestamp}\x1b[0m {style}{:>5}\x1b[0m ", meta.level())?;
        } else {
            write!(writer, "{timestamp} {:>5} ", meta.level())?;
        }

        if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
            let file = file
                .rsplit_once("src/")
                .or_else(|| file.rsplit_once("src\\"))
                .map_or(file, |(_, rest)| rest);
            if writer.has_ansi_escapes() {
                write!(writer, "\x1b[36m{file}:{line}\x1b[0m ")?;
            } else {
                write!(writer, "{file}:{line} ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// ── late-bound file sink ────────────────────────────────────────────────────

type SharedFile = Arc<Mutex<Option<File>>>;

/// Discards records until a file is installed.
#[derive(Clone)]
struct FileSlot(SharedFile);

struct SlotWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for SlotWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.0.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.as_mut().map_or(Ok(()), Write::flush)
    }
}

impl<'a> MakeWriter<'a> for FileSlot {
    type Writer = SlotWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        // A poisoned lock only means another thread panicked mid-write.
        SlotWriter(self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

// ── handles ─────────────────────────────────────────────────────────────────

type ReloadFn = Box<dyn Fn(EnvFilter) -> Result<()> + Send + Sync>;

static LEVEL_HANDLE: OnceLock<ReloadFn> = OnceLock::new();
static STDERR_HANDLE: OnceLock<ReloadFn> = OnceLock::new();
static FILE_SLOT: OnceLock<SharedFile> = OnceLock::new();

fn store_handle<S>(slot: &OnceLock<ReloadFn>, handle: reload::Handle<EnvFilter, S>)
where
    S: Subscriber + Send + Sync + 'static,
{
    let _ = slot.set(Box::new(move |filter| {
        handle
            .reload(filter)
            .map_err(|e| anyhow!("filter reload failed: {e}"))
    }));
}

fn initial_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

// ── public API ──────────────────────────────────────────────────────────────

/// Installs the global subscriber. `RUST_LOG` wins over `default_level`.
///
/// Calling this twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_logging(default_level: &str) {
    let file: SharedFile = Arc::new(Mutex::new(None));
    let _ = FILE_SLOT.set(file.clone());

    let (level_filter, level_handle) = reload::Layer::new(initial_filter(default_level));
    let (stderr_gate, stderr_handle) = reload::Layer::new(EnvFilter::new("trace"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalTimeFormat)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(stderr_gate);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalTimeFormat)
        .with_ansi(false)
        .with_writer(FileSlot(file));

    if tracing_subscriber::registry()
        .with(level_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        store_handle(&LEVEL_HANDLE, level_handle);
        store_handle(&STDERR_HANDLE, stderr_handle);
    }
}

/// Replaces the global filter. Accepts a bare level or any `EnvFilter`
/// directive, e.g. `"pension_core=debug,info"`.
pub fn set_log_level(level: &str) -> Result<()> {
    let filter =
        EnvFilter::try_new(level).map_err(|e| anyhow!("invalid log level '{level}': {e}"))?;
    match LEVEL_HANDLE.get() {
        Some(reload) => reload(filter),
        None => bail!("logging not yet initialized"),
    }
}

/// Silences stderr output without touching the file sink.
pub fn set_stderr_enabled(enabled: bool) -> Result<()> {
    let filter = EnvFilter::new(if enabled { "trace" } else { "off" });
    match STDERR_HANDLE.get() {
        Some(reload) => reload(filter),
        None => bail!("logging not yet initialized"),
    }
}

/// Appends log records to `path`, replacing any file already installed.
/// The parent directory must exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow!("cannot open log file '{}': {e}", path.display()))?;

    match FILE_SLOT.get() {
        Some(slot) => {
            *slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(file);
            Ok(())
        }
        None => bail!("logging not yet initialized"),
    }
}

