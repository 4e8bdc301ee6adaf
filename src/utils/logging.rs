use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::config::CONFIG;

pub const TIMING_TARGET: &str = "studio.timing";

/// Keeps the background log writers alive; drop it only at shutdown.
pub struct LoggingGuards {
    _guards: Vec<WorkerGuard>,
}

fn parse_log_level(value: &str) -> LevelFilter {
    match value.trim().to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" | "warning" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

fn general_targets(level: LevelFilter) -> Targets {
    Targets::new()
        .with_default(level)
        .with_target(TIMING_TARGET, LevelFilter::OFF)
        .with_target("hyper", LevelFilter::WARN)
        .with_target("hyper_util", LevelFilter::WARN)
        .with_target("reqwest", LevelFilter::WARN)
}

fn timing_targets() -> Targets {
    Targets::new()
        .with_default(LevelFilter::OFF)
        .with_target(TIMING_TARGET, LevelFilter::TRACE)
}

fn daily_writer(dir: &Path, file_name: &str, guards: &mut Vec<WorkerGuard>) -> NonBlocking {
    let appender = tracing_appender::rolling::daily(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    guards.push(guard);
    writer
}

/// Console output goes to stderr so stdout stays reserved for command results.
/// Generation events land in `studio.log`/`studio.jsonl`, provider timings in `timing.log`/`timing.jsonl`.
pub fn init_logging() -> LoggingGuards {
    let logs_dir = CONFIG.log_dir.as_path();
    if let Err(err) = fs::create_dir_all(logs_dir) {
        eprintln!("Failed to create logs directory {}: {err}", logs_dir.display());
    }

    let mut guards = Vec::with_capacity(4);
    let general = general_targets(parse_log_level(&CONFIG.log_level));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(general.clone());
    let studio_layer = tracing_subscriber::fmt::layer()
        .with_writer(daily_writer(logs_dir, "studio.log", &mut guards))
        .with_ansi(false)
        .with_filter(general.clone());
    let studio_json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(daily_writer(logs_dir, "studio.jsonl", &mut guards))
        .with_filter(general);
    let timing_layer = tracing_subscriber::fmt::layer()
        .with_writer(daily_writer(logs_dir, "timing.log", &mut guards))
        .with_ansi(false)
        .with_target(false)
        .with_filter(timing_targets());
    let timing_json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(daily_writer(logs_dir, "timing.jsonl", &mut guards))
        .with_filter(timing_targets());

    tracing_subscriber::registry()
        .with(console_layer)
        .with(studio_layer)
        .with(studio_json_layer)
        .with(timing_layer)
        .with(timing_json_layer)
        .init();

    LoggingGuards { _guards: guards }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_levels_default_to_info() {
        assert_eq!(parse_log_level("WARNING"), LevelFilter::WARN);
        assert_eq!(parse_log_level(" debug "), LevelFilter::DEBUG);
        assert_eq!(parse_log_level("chatty"), LevelFilter::INFO);
    }

    #[test]
    fn timing_events_stay_out_of_the_general_logs() {
        let general = general_targets(LevelFilter::DEBUG);
        assert!(!general.would_enable(TIMING_TARGET, &tracing::Level::INFO));
        assert!(general.would_enable("nano_banana_studio::generation", &tracing::Level::DEBUG));
        assert!(!general.would_enable("reqwest::connect", &tracing::Level::INFO));

        let timing = timing_targets();
        assert!(timing.would_enable(TIMING_TARGET, &tracing::Level::WARN));
        assert!(!timing.would_enable("nano_banana_studio::generation", &tracing::Level::ERROR));
    }
}
