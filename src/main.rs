//! Scribble Canvas desktop application
//!
//! Logging is controlled with `RUST_LOG` (defaults to `info`).

use env_logger::Env;
use scribble_canvas::ShellConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    log::info!("Starting scribble canvas desktop app");

    scribble_canvas::run(ShellConfig::default(), std::env::args())?;

    log::info!("Window closed, exiting");
    Ok(())
}
