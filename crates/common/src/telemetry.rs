use crate::prelude::Result;
use tracing::subscriber::set_global_default;
use tracing::{Level, Subscriber};
use tracing_log::LogTracer;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt::MakeWriter};

/// Composes and returns a tracing subscriber for provider logging.
///
/// Events are emitted under the `client`, `poller`, `resource`,
/// `data_source`, `config` and `cli` targets, so `RUST_LOG=poller=debug`
/// narrows the output to status polling.
///
/// # Arguments
///
/// * `max_level`: Level used when the `RUST_LOG` environment variable is not
///   set.
/// * `sink`: Destination where logs will be written to. The CLI passes
///   `stderr` so that its JSON output on `stdout` stays clean.
///
/// # Returns
///
/// `Subscriber` instance.
///
pub fn get_subscriber<Sink>(max_level: Level, sink: Sink) -> impl Subscriber + Sync + Send
where
    Sink: for<'a> MakeWriter<'a> + Sync + Send + 'static,
{
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_error| EnvFilter::new(max_level.as_str()));

    // Compact logs for debug builds, JSON for release builds.
    #[cfg(debug_assertions)]
    let subscriber_builder = tracing_subscriber::fmt().compact();
    #[cfg(not(debug_assertions))]
    let subscriber_builder = tracing_subscriber::fmt().json().with_current_span(true);

    subscriber_builder
        .with_env_filter(env_filter)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(sink)
        .finish()
}

/// Registers a subscriber as the global default and forwards `log` records
/// from dependencies into it.
///
/// # Warning
///
/// This function should only be called **once** per process. A host that
/// embeds the provider may already own a dispatcher, in which case the error
/// is returned to the caller instead of replacing it.
///
/// # Arguments
///
/// * `subscriber`: Subscriber to set as the global default.
///
pub fn init_subscriber(subscriber: impl Subscriber + Sync + Send) -> Result<()> {
    LogTracer::init()?;

    set_global_default(subscriber)?;
    Ok(())
}
