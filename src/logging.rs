use colored::*;
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// A tracing event formatter that colors each log line by level.
///
/// Lines carry no timestamp or level prefix so they read cleanly next to the
/// report itself. Warnings and errors are prefixed with their level so they
/// stay recognizable when color is unavailable (e.g. `NO_COLOR` or a pipe).
pub struct ColorizedFormatter;

impl<S, N> FormatEvent<S, N> for ColorizedFormatter
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
        let mut buffer = String::new();
        let mut buf_writer = Writer::new(&mut buffer);
        ctx.format_fields(buf_writer.by_ref(), event)?;

        let level = *event.metadata().level();
        let line = match level {
            Level::WARN | Level::ERROR => format!("{}: {}", level, buffer),
            _ => buffer,
        };

        let colored_output = match level {
            Level::INFO => line.white(),
            Level::WARN => line.yellow(),
            Level::ERROR => line.red(),
            Level::DEBUG => line.blue(),
            Level::TRACE => line.purple(),
        };

        writeln!(writer, "{}", colored_output)
    }
}

/// Install the global subscriber for the replay binary.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` over `info`.
/// Logs go to stderr so they never interleave with a report on stdout.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(ColorizedFormatter)
        .init();
}
