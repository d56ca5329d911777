//! Structured logging initialization.
//!
//! Logs go to stderr so stdout stays clean for `--list-generators` JSON.
//! Every line carries its `wallselect_lib::...` target, and the detached
//! background process runs inside a `background{pid=..}` span, so both
//! processes stay apart on a shared stderr.

use std::io::{self, IsTerminal};

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Builds the default filter directive for the given verbosity.
///
/// Covers both the library and the binary targets.
#[must_use]
pub fn default_directive(verbose: u8, quiet: bool) -> String {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    format!("wallselect_lib={level},wallselect={level}")
}

/// Initialize the tracing subscriber.
///
/// * `verbose` - 0 = info, 1 = debug, 2+ = trace
/// * `quiet` - only errors; wins over `verbose`
///
/// `RUST_LOG` overrides both. Calling this twice is a no-op.
pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let fmt_layer = compact_layer(io::stderr, io::stderr().is_terminal());
    let _ = tracing_subscriber::registry().with(filter).with(fmt_layer).try_init();
}

fn compact_layer<S, W>(writer: W, ansi: bool) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .with_writer(writer)
}
