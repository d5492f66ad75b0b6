// Structured logging to stderr. stdout is reserved for the conversion display.

use tracing::subscriber::SetGlobalDefaultError;

/// Install the global subscriber at `level`. Fails if one is already installed.
pub fn init(level: tracing::Level) -> Result<(), SetGlobalDefaultError> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(cfg!(debug_assertions))
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
