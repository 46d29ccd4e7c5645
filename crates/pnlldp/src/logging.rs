use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Crates whose events follow `--log-level`. Everything else logs warnings only.
const AGENT_TARGETS: [&str; 5] = [
    "pnlldp",
    "pnlldp_transport",
    "pnlldp_tlv",
    "pnlldp_peer",
    "pnlldp_mib",
];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

fn targets(level: LogLevel) -> Targets {
    let level = LevelFilter::from(level);
    AGENT_TARGETS
        .iter()
        .fold(Targets::new(), |targets, target| {
            targets.with_target(*target, level)
        })
        .with_default(level.min(LevelFilter::WARN))
}

/// Install the stderr subscriber. Stdout stays reserved for command output,
/// so `--format json` can be piped while logs are on.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let filter = targets(level);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_thread_names(true);

    let _ = match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(layer.with_target(false))
            .with(filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(layer.json())
            .with(filter)
            .try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_crates_follow_requested_level() {
        let filter = targets(LogLevel::Debug);
        assert!(filter.would_enable("pnlldp_peer", &tracing::Level::DEBUG));
        assert!(!filter.would_enable("pnlldp_peer", &tracing::Level::TRACE));
        assert!(!filter.would_enable("mio", &tracing::Level::INFO));
        assert!(filter.would_enable("mio", &tracing::Level::WARN));
    }

    #[test]
    fn off_silences_everything() {
        let filter = targets(LogLevel::Off);
        assert!(!filter.would_enable("pnlldp", &tracing::Level::ERROR));
        assert!(!filter.would_enable("mio", &tracing::Level::ERROR));
    }
}
