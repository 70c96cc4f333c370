use std::future::Future;

use serde_json::Value;

use crate::{
    error::{Res, SpotifyError},
    spotify::SpotifyApi,
    types::Device,
};

/// Session checks wrapped around account operations.
///
/// [`Guard::run`] makes sure the token is fresh, picks a fallback device when
/// none is active and logs transport failures before handing them back
/// untouched.
pub struct Guard<'a> {
    api: &'a dyn SpotifyApi,
}

impl<'a> Guard<'a> {
    pub fn new(api: &'a dyn SpotifyApi) -> Self {
        Guard { api }
    }

    /// Runs `op` behind the session checks. `op` receives the fallback device
    /// when no device was active, `None` otherwise.
    pub async fn run<T, F, Fut>(&self, operation: &str, op: F) -> Res<T>
    where
        F: FnOnce(Option<Device>) -> Fut,
        Fut: Future<Output = Res<T>>,
    {
        self.ensure_fresh_token().await;

        let device = if self.has_active_device().await {
            None
        } else {
            Some(self.candidate_device().await?)
        };

        op(device).await.inspect_err(|e| {
            if e.is_network() {
                tracing::error!(operation, error = %e, "network error");
            }
        })
    }

    /// Refreshes an expired token. A failed refresh is only logged; the
    /// operation that follows surfaces the real error.
    pub async fn ensure_fresh_token(&self) {
        if self.api.token_valid().await {
            return;
        }
        tracing::info!("token expired, refreshing");
        if let Err(e) = self.api.refresh_token().await {
            tracing::warn!(error = %e, "error refreshing token");
        }
    }

    async fn has_active_device(&self) -> bool {
        match self.list_devices().await {
            Ok(devices) => devices.iter().any(|d| d.is_active),
            Err(e) => {
                tracing::error!(error = %e, "error checking active device");
                false
            }
        }
    }

    /// The first active device, else the first device reported.
    async fn candidate_device(&self) -> Res<Device> {
        let mut devices = self.list_devices().await?;
        if devices.is_empty() {
            return Err(SpotifyError::NoDevice);
        }

        if let Some(pos) = devices.iter().position(|d| d.is_active) {
            return Ok(devices.swap_remove(pos));
        }

        let device = devices.swap_remove(0);
        tracing::info!(device = %device.name, "no active device, assigning fallback");
        Ok(device)
    }

    async fn list_devices(&self) -> Res<Vec<Device>> {
        let raw = self.api.devices().await?;
        Ok(parse_devices(&raw)
            .into_iter()
            .filter_map(|d| serde_json::from_value(d).ok())
            .collect())
    }
}

/// Extracts the `devices` array of a `/me/player/devices` payload.
pub fn parse_devices(raw: &Value) -> Vec<Value> {
    raw.get("devices")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
