//! Basic stackerr example
//!
//! Loads a JSON config file, wraps every failure with context, and hands
//! the result to the top-level handler.
//!
//! # Environment Variables
//!
//! - `LOG_LEVEL=debug` - Set log level (trace, debug, info, warn, error)
//! - `AWS_LAMBDA_FUNCTION_NAME=x` - Emit JSON lines instead of pretty logs
//! - `STACKERR_CAPTURE=0` - Skip stack capture
//!
//! # Usage
//!
//! ```text
//! cargo run -p stackerr-basic -- path/to/config.json
//! ```

use std::path::Path;

use serde_json::Value;
use stackerr::{ensure, Error, OptionExt, ResultExt};
use stackerr_report::{init, run, NoopReporter, ReportConfig};
use tracing::{debug, info};

// LOG_LEVEL=debug cargo run -p stackerr-basic -- a.json
fn main() {
    let config = ReportConfig::from_env();
    if let Err(err) = init(&config) {
        eprintln!("{:#}", err);
        std::process::exit(2);
    }
    debug!(?config, "configuration loaded");
    if config.crash_reporting_enabled() {
        info!("crash reporter endpoint set; this example has no transport and reports nothing");
    }

    let path = std::env::args().nth(1).unwrap_or_else(|| "a.json".to_string());

    let result = run(&NoopReporter, || {
        let settings = load_config(Path::new(&path))
            .map_err(|e| Error::wrap(e, "load config").with("stage", "startup"))?;
        info!(%settings, "config loaded");
        Ok(())
    });

    if let Err(err) = result {
        // Verbose form: message followed by the stack of the outermost wrap.
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn load_config(path: &Path) -> stackerr::Result<Value> {
    let raw = std::fs::read_to_string(path)
        .wrap_err("read failed")
        .map_err(|e| e.with("file", path.display().to_string()))?;

    let value: Value = serde_json::from_str(&raw)
        .wrap_err("decode failed")
        .map_err(|e| e.with("file", path.display().to_string()).with("bytes", raw.len()))?;

    ensure!(value.is_object(), "config must be a JSON object");

    let name = value
        .get("name")
        .and_then(Value::as_str)
        .ok_or_err("missing \"name\"")?;
    debug!(name, "config name");

    Ok(value)
}
