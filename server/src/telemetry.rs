//! Tracing subscriber setup.

use std::backtrace::Backtrace;

use tracing_subscriber::EnvFilter;

use crate::error::panic_message;

/// Install a JSON subscriber on stdout and the panic hook. `RUST_LOG` wins
/// over `default_level`.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .init();

    install_panic_hook();
}

/// Log every panic through `tracing` with a backtrace taken at the panic
/// site, before the stack unwinds into `CatchPanicLayer`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let backtrace = Backtrace::force_capture();
        let location = info
            .location()
            .map(|l| l.to_string())
            .unwrap_or_default();
        tracing::error!(
            panic = panic_message(info.payload()),
            location = %location,
            %backtrace,
            "panic"
        );
    }));
}
