// ABOUTME: Leveled logging setup driven by LOG_LEVEL and NODE_ENV.
// ABOUTME: Installs a tracing-subscriber fmt subscriber on stderr or any writer.

use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::error::SharedError;

/// Resolves the active level.
///
/// An explicit `LOG_LEVEL` of debug, info, warn or error (any case) wins.
/// Otherwise production runs log errors only and everything else logs info.
pub fn level_from_env(log_level: Option<&str>, node_env: Option<&str>) -> Level {
    match log_level.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") => Level::WARN,
        Some("error") => Level::ERROR,
        _ if node_env == Some("production") => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Level resolved from the process environment.
pub fn env_level() -> Level {
    let log_level = std::env::var("LOG_LEVEL").ok();
    let node_env = std::env::var("NODE_ENV").ok();
    level_from_env(log_level.as_deref(), node_env.as_deref())
}

fn filter(level: Level) -> EnvFilter {
    EnvFilter::default().add_directive(LevelFilter::from_level(level).into())
}

/// A subscriber writing plain-text events at `level` and above to `writer`.
pub fn subscriber<W>(level: Level, writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .finish()
}

/// Installs the global subscriber on stderr using the environment level.
pub fn init() -> Result<Level, SharedError> {
    let level = env_level();
    tracing::subscriber::set_global_default(subscriber(level, std::io::stderr))
        .map_err(|e| SharedError::Logging(e.to_string()))?;
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_level_wins() {
        assert_eq!(level_from_env(Some("DEBUG"), Some("production")), Level::DEBUG);
        assert_eq!(level_from_env(Some("warn"), None), Level::WARN);
    }

    #[test]
    fn defaults_depend_on_environment() {
        assert_eq!(level_from_env(None, Some("production")), Level::ERROR);
        assert_eq!(level_from_env(None, Some("development")), Level::INFO);
        assert_eq!(level_from_env(Some("verbose"), None), Level::INFO);
    }
}
