#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use gdi_bridge::app::AppBuilder;
use log::{error, info};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let code = AppBuilder::new()
        .build()
        .and_then(|app| app.run())
        .map_err(|err| {
            error!("{:#}", err);
            err
        })?;

    info!("exiting with code {}", code);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
