use std::fmt;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

// --- Formatter ---

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";

/// One line per event: `<time> <LEVEL> <crate>: <fields>`.
///
/// Debug and trace events also carry their source location. The log file
/// variant stamps a full date because it outlives a single run.
#[derive(Debug, Clone, Copy)]
struct CliFormat {
    time_format: &'static str,
}

impl CliFormat {
    fn terminal() -> Self {
        Self {
            time_format: "%H:%M:%S%.3f",
        }
    }

    fn file() -> Self {
        Self {
            time_format: "%Y-%m-%d %H:%M:%S%.3f",
        }
    }
}

impl<S, N> FormatEvent<S, N> for CliFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let style = Style::for_writer(&writer);

        let now = Local::now().format(self.time_format);
        style.paint(&mut writer, DIM, format_args!("{now} "))?;
        style.paint(&mut writer, level_code(meta.level()), format_args!("{:<5}", meta.level()))?;
        write!(writer, " {}: ", short_target(meta.target()))?;

        if *meta.level() >= Level::DEBUG {
            if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
                style.paint(&mut writer, DIM, format_args!("[{file}:{line}]"))?;
                write!(writer, " ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[derive(Debug, Clone, Copy)]
struct Style {
    ansi: bool,
}

impl Style {
    fn for_writer(writer: &Writer<'_>) -> Self {
        Self {
            ansi: writer.has_ansi_escapes(),
        }
    }

    fn paint(
        self,
        writer: &mut Writer<'_>,
        code: &str,
        text: fmt::Arguments<'_>,
    ) -> fmt::Result {
        if self.ansi {
            write!(writer, "{code}{text}{RESET}")
        } else {
            writer.write_fmt(text)
        }
    }
}

fn level_code(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "\x1b[1;31m",
        Level::WARN => "\x1b[1;33m",
        Level::INFO => "\x1b[32m",
        Level::DEBUG => "\x1b[34m",
        Level::TRACE => "\x1b[35m",
    }
}

/// The crate part of a module path, e.g. `price_feed` for
/// `price_feed::resolver`.
fn short_target(target: &str) -> &str {
    target.split("::").next().unwrap_or(target)
}

// --- Setup ---

fn make_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialises logging. Call once at startup.
///
/// - Stderr: coloured when attached to a terminal, so command output on
///   stdout stays clean for piping.
/// - File: appended to when `log_file` is given, never coloured.
/// - Level: `RUST_LOG` when set, otherwise `info` (`debug` with `verbose`).
pub fn init_logging(
    log_file: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(CliFormat::file())
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(CliFormat::terminal())
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(make_filter(verbose))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialised")?;

    Ok(())
}
