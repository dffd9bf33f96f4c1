//! Setpoint service — writes from the page to a Control's channel.
//!
//! The readback is recorded in live values under its own generation, taken
//! before the write goes out, so a refresh cycle that started earlier can
//! not overwrite it with the pre-write value.

use crate::channel::ChannelReading;
use crate::control::ControlError;
use crate::registry::Device;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum SetpointError {
    #[error("no widget with id {0}")]
    NotFound(String),
    #[error("widget {0} is read-only")]
    ReadOnly(String),
    #[error(transparent)]
    Control(#[from] ControlError),
}

/// Write `value` to the Control with widget id `id`.
///
/// # Errors
///
/// Fails if the id is unknown or names a Sensor, or if the Control rejects
/// the write.
pub async fn write_setpoint(state: &AppState, id: &str, value: f64) -> Result<ChannelReading, SetpointError> {
    let control = match state.registry.get(id) {
        Some(Device::Control(control)) => control,
        Some(Device::Sensor(_)) => return Err(SetpointError::ReadOnly(id.to_string())),
        None => return Err(SetpointError::NotFound(id.to_string())),
    };

    let generation = state.live.begin();
    let reading = control.write(state.service.as_ref(), value).await?;
    state.live.record(control.widget_id(), generation, Ok(reading.value)).await;
    Ok(reading)
}

#[cfg(test)]
#[path = "setpoint_test.rs"]
mod tests;
