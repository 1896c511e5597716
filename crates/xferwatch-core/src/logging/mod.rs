use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with optional quiet mode.
///
/// When `quiet` is true, only error-level events are emitted.
/// When `quiet` is false, info-level and above events are emitted.
pub fn init_logging(quiet: bool) {
    let filter = EnvFilter::from_default_env();
    let filter = if quiet {
        filter
            .add_directive(log_directive("xferwatch=error"))
            .add_directive(log_directive("xferwatch_core=error"))
    } else {
        filter
            .add_directive(log_directive("xferwatch=info"))
            .add_directive(log_directive("xferwatch_core=info"))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .init();
}

fn log_directive(directive: &str) -> tracing_subscriber::filter::Directive {
    directive.parse().expect("Invalid log directive")
}
