use tabled::Table;

use crate::{
    cli::App,
    error::Res,
    types::{Device, DeviceTableRow},
    warning,
};

/// Prints the playback devices of the cached account.
pub async fn devices() -> Res<()> {
    let app = App::bootstrap().await?;
    if !app.session.lock().await.has_token() {
        warning!("No cached token. Please run spotify-mcp auth first.");
        return Ok(());
    }

    let devices: Vec<Device> = app
        .client
        .devices()
        .await?
        .into_iter()
        .filter_map(|d| serde_json::from_value(d).ok())
        .collect();

    if devices.is_empty() {
        warning!("No devices found. Is Spotify open?");
        return Ok(());
    }

    let rows: Vec<DeviceTableRow> = devices.iter().map(DeviceTableRow::from).collect();
    println!("{}", Table::new(rows));
    Ok(())
}
