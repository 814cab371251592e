use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Install the global subscriber. Logs go to stderr so script output on
/// stdout stays clean. `RUST_LOG` overrides the verbosity flag.
pub fn init(verbosity: u8) -> Result<(), Box<dyn std::error::Error>> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rtedit={}", level)));

    let subscriber = tracing_subscriber::Registry::default().with(
        fmt::Layer::new()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(filter),
    );

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
