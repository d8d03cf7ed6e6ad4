//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;

use super::utils::{banner, format_local_datetime, format_local_time, log_file_path, strip_ansi};

/// Width of the `#` banner that opens each run in the log file.
const BANNER_WIDTH: usize = 80;

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// A [`tracing_subscriber::Layer`] that appends all events to the dated log
/// file with timestamps and ANSI codes stripped.
///
/// Always captures events at `DEBUG` level and above regardless of the
/// console verbosity setting.  Runs on the same day share one file.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Create `log_dir` if needed, open the dated log file for appending and
    /// write the run banner.
    ///
    /// Returns `None` if the directory or file cannot be created.
    pub(super) fn new(log_dir: &Path) -> Option<Self> {
        fs::create_dir_all(log_dir).ok()?;
        let path = log_file_path(log_dir);
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .ok()?;
        let version =
            option_env!("WATCHMAKER_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        writeln!(
            file,
            "{}\n[{}] watchmaker {version}",
            banner("WATCHMAKER RUN", BANNER_WIDTH),
            format_local_datetime(),
        )
        .ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let level = *metadata.level();
        let target = metadata.target();

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let msg = strip_ansi(&extractor.message);
        let ts = format_local_time();

        let line = match (level, target) {
            (tracing::Level::INFO, "watchmaker::stage") => format!("[{ts}] ==> {msg}"),
            (tracing::Level::INFO, "watchmaker::dry_run") => format!("[{ts}]     [dry run] {msg}"),
            (tracing::Level::ERROR, _) => format!("[{ts}]     [error] {msg}"),
            (tracing::Level::WARN, _) => format!("[{ts}]     [warn] {msg}"),
            (tracing::Level::DEBUG | tracing::Level::TRACE, _) => {
                format!("[{ts}]     [debug] {msg}")
            }
            _ => format!("[{ts}]     {msg}"),
        };

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that emits watchmaker-style
/// console output.
struct WatchmakerFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for WatchmakerFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let level = *metadata.level();
        let target = metadata.target();

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let msg = &extractor.message;

        match level {
            tracing::Level::ERROR => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            tracing::Level::WARN => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            tracing::Level::INFO if target == "watchmaker::stage" => {
                writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")
            }
            tracing::Level::INFO if target == "watchmaker::dry_run" => {
                writeln!(writer, "  \x1b[33m[DRY RUN]\x1b[0m {msg}")
            }
            tracing::Level::INFO => writeln!(writer, "  {msg}"),
            _ => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Console level for a `-v` count: `INFO` by default, `DEBUG` for one,
/// `TRACE` for two or more.
#[must_use]
pub const fn console_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Console output goes to stdout (stderr for warnings and errors) at the
/// level chosen by [`console_level`].  When `log_dir` is given, every event at
/// `DEBUG` and above is also appended to `<log_dir>/watchmaker-YYYY-MM-DD.log`.
/// Must be called once at program startup, before any logging.
///
/// Returns `false` if a log directory was requested but the log file could
/// not be opened; console logging is set up either way.
#[must_use]
pub fn init_subscriber(verbosity: u8, log_dir: Option<&Path>) -> bool {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let level = console_level(verbosity);

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console_layer = fmt::layer()
        .event_format(WatchmakerFormatter)
        .with_writer(make_writer)
        .with_filter(level);

    let file_layer = log_dir.and_then(FileLayer::new);
    let file_ok = log_dir.is_none() || file_layer.is_some();

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer.map(|l| l.with_filter(LevelFilter::DEBUG)))
        .init();

    file_ok
}
