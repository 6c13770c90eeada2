//! File-based logging initialization

use std::fs;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use super::config::DebugConfig;

/// Initialize the logging system
///
/// - Daily rotation of `<log_dir>/wallet-link.log`
/// - Non-blocking file writes
/// - Plain text or JSON lines (`WALLET_LINK_LOG_JSON=1`)
/// - Optional compact stderr output
/// - Panic hook that records panics in the log
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init(config: &DebugConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("wallet_link=info,warn"));

    let stderr_layer = config.log_to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .boxed()
    });

    let file_layer = match fs::create_dir_all(&config.log_dir) {
        Ok(()) => {
            let file_appender =
                tracing_appender::rolling::daily(&config.log_dir, &config.log_file_prefix);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            // Keep the writer alive for the lifetime of the program
            std::mem::forget(guard);

            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false);

            Some(if config.json_logs {
                layer.json().boxed()
            } else {
                layer.boxed()
            })
        }
        Err(e) => {
            eprintln!("Warning: Failed to create log directory: {}", e);
            None
        }
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if !installed {
        return;
    }

    tracing::info!(
        log_file = %config.log_path().display(),
        log_level = %config.log_level,
        stderr = config.log_to_stderr,
        "Logging initialized"
    );

    setup_panic_hook();
}

/// Log panics with their location before the default hook runs
fn setup_panic_hook() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic message".to_string()
        };

        tracing::error!(
            location = %location,
            message = %message,
            backtrace = %std::backtrace::Backtrace::capture(),
            "Application panic"
        );

        default_panic(panic_info);
    }));
}
