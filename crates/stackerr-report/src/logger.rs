//! Process-wide tracing subscriber.
//!
//! `RUST_LOG` wins when set; otherwise [`ReportConfig::log_level`] applies.
//! Inside Lambda (`json = true`) events are flattened JSON lines on stdout so
//! that `error.values` and friends land as top-level keys.

use std::sync::atomic::{AtomicBool, Ordering};

use stackerr::env::env_is_set;
use stackerr::{Error, ResultExt};
use tracing_subscriber::EnvFilter;

use crate::config::ReportConfig;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Install the global subscriber described by `config`.
///
/// Only the first call installs anything; later calls return `Ok(())`.
pub fn init(config: &ReportConfig) -> stackerr::Result<()> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let filter = build_filter(config).map_err(|e| {
        INITIALIZED.store(false, Ordering::SeqCst);
        e
    })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| {
        INITIALIZED.store(false, Ordering::SeqCst);
        Error::wrap_boxed(e, "failed to install tracing subscriber")
            .with("json", config.json)
            .with("log_level", config.log_level.as_str())
    })?;

    tracing::debug!(log_level = %config.log_level, json = config.json, "logging initialized");
    Ok(())
}

/// True once [`init`] has installed (or is installing) the subscriber.
///
/// A failed install leaves this false, so a later [`init`] tries again.
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::Relaxed)
}

fn build_filter(config: &ReportConfig) -> stackerr::Result<EnvFilter> {
    if env_is_set("RUST_LOG") {
        return EnvFilter::try_from_default_env().wrap_err("invalid RUST_LOG filter");
    }
    Ok(EnvFilter::new(config.log_level.as_str()))
}
