//! Panel routes — the page itself and the JSON API behind the refresh script.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::channel::ChannelError;
use crate::control::ControlError;
use crate::registry::{Device, DeviceKind};
use crate::services::setpoint::{self, SetpointError};
use crate::state::{AppState, LiveValue};

/// `GET /` — the page rendered at startup.
pub async fn page(State(state): State<AppState>) -> Html<String> {
    Html(state.page.to_string())
}

/// `GET /api/values` — latest reading per widget id.
pub async fn values(State(state): State<AppState>) -> Json<BTreeMap<String, LiveValue>> {
    Json(state.live.snapshot().await)
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DeviceResponse {
    pub id: String,
    pub kind: DeviceKind,
    pub prefix: String,
    pub name: String,
    pub units: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

fn to_response(device: &Device) -> DeviceResponse {
    let (name, units, bounds) = match device {
        Device::Control(c) => (c.display_name(), c.units(), Some(c.bounds())),
        Device::Sensor(s) => (s.display_name(), s.units(), None),
    };
    DeviceResponse {
        id: device.widget_id().to_string(),
        kind: device.kind(),
        prefix: device.binding().prefix().to_string(),
        name: name.to_string(),
        units: units.to_string(),
        min: bounds.map(|b| b.min()),
        max: bounds.map(|b| b.max()),
    }
}

/// `GET /api/devices` — the device list in page order.
pub async fn devices(State(state): State<AppState>) -> Json<Vec<DeviceResponse>> {
    Json(state.registry.iter().map(to_response).collect())
}

#[derive(Debug, Deserialize)]
pub struct SetpointBody {
    pub value: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SetpointResponse {
    pub id: String,
    pub value: f64,
}

/// `PUT /api/controls/:id` — write a new setpoint.
pub async fn put_control(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SetpointBody>,
) -> Result<Json<SetpointResponse>, StatusCode> {
    let reading = setpoint::write_setpoint(&state, &id, body.value)
        .await
        .map_err(|e| {
            warn!(widget_id = %id, value = body.value, error = %e, "setpoint rejected");
            setpoint_error_to_status(&e)
        })?;
    Ok(Json(SetpointResponse { id, value: reading.value }))
}

pub(crate) fn setpoint_error_to_status(err: &SetpointError) -> StatusCode {
    match err {
        SetpointError::NotFound(_) | SetpointError::ReadOnly(_) => StatusCode::NOT_FOUND,
        SetpointError::Control(ControlError::NotConnected { .. }) => StatusCode::CONFLICT,
        SetpointError::Control(ControlError::OutOfBounds { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        SetpointError::Control(ControlError::Channel(ChannelError::UnknownChannel { .. })) => StatusCode::NOT_FOUND,
        SetpointError::Control(ControlError::Channel(_) | ControlError::Connect { .. }) => StatusCode::BAD_GATEWAY,
        SetpointError::Control(ControlError::InvalidBounds { .. } | ControlError::InvalidWidgetId(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
#[path = "panel_test.rs"]
mod tests;
