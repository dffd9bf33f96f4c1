//! Control — one writable beamline parameter bound to a hardware channel.
//!
//! DESIGN
//! ======
//! A Control starts `Disconnected` and moves to `Connected` exactly once,
//! when `connect` succeeds. There is no disconnect transition: a Control
//! lives as long as the serving process. `create_gui` refuses to run before
//! the binding exists so the page never shows an input with nothing behind
//! it.
//!
//! ERROR HANDLING
//! ==============
//! `connect` does not retry. The HTTP client's timeouts bound the call, and
//! the failure propagates to startup, which aborts.

use tracing::info;

use crate::channel::{ChannelBinding, ChannelError, ChannelReading, ChannelService};
use crate::widget::{ControlFragment, InvalidWidgetId, WidgetId};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("invalid bounds: min {min} > max {max}")]
    InvalidBounds { min: f64, max: f64 },
    #[error(transparent)]
    InvalidWidgetId(#[from] InvalidWidgetId),
    #[error("control {widget_id} failed to connect: {source}")]
    Connect {
        widget_id: WidgetId,
        #[source]
        source: ChannelError,
    },
    #[error("control {widget_id} is not connected")]
    NotConnected { widget_id: WidgetId },
    #[error("value {value} outside [{min}, {max}] for control {widget_id}")]
    OutOfBounds { widget_id: WidgetId, value: f64, min: f64, max: f64 },
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// Inclusive numeric range accepted by a Control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    min: f64,
    max: f64,
}

impl Bounds {
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidBounds`] if either end is not finite or
    /// `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self, ControlError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ControlError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectionState {
    Disconnected,
    /// Bound to the channel; `readback` is the value seen at connect time.
    Connected { readback: f64 },
}

#[derive(Debug, Clone)]
pub struct Control {
    binding: ChannelBinding,
    display_name: String,
    widget_id: WidgetId,
    bounds: Bounds,
    units: String,
    state: ConnectionState,
    markup: Option<ControlFragment>,
}

// =============================================================================
// LIFECYCLE
// =============================================================================

impl Control {
    /// Build a disconnected Control.
    ///
    /// # Errors
    ///
    /// Fails on a malformed prefix or widget id, or when `min > max`.
    pub fn new(
        prefix: &str,
        display_name: impl Into<String>,
        widget_id: &str,
        min: f64,
        max: f64,
        units: impl Into<String>,
    ) -> Result<Self, ControlError> {
        Ok(Self {
            binding: ChannelBinding::new(prefix)?,
            display_name: display_name.into(),
            widget_id: WidgetId::new(widget_id)?,
            bounds: Bounds::new(min, max)?,
            units: units.into(),
            state: ConnectionState::Disconnected,
            markup: None,
        })
    }

    /// Bind to the hardware channel. Connecting twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Connect`] if the service cannot reach or does
    /// not know the channel. The Control stays disconnected.
    pub async fn connect(&mut self, service: &dyn ChannelService) -> Result<(), ControlError> {
        if self.is_connected() {
            return Ok(());
        }
        let reading = service
            .connect(&self.binding)
            .await
            .map_err(|source| ControlError::Connect { widget_id: self.widget_id.clone(), source })?;
        info!(prefix = %self.binding, widget_id = %self.widget_id, readback = reading.value, "control connected");
        self.state = ConnectionState::Connected { readback: reading.value };
        Ok(())
    }

    /// Generate the input widget and keep it as this Control's markup.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::NotConnected`] before `connect` has succeeded.
    pub fn create_gui(&mut self) -> Result<&ControlFragment, ControlError> {
        let ConnectionState::Connected { readback } = self.state else {
            return Err(ControlError::NotConnected { widget_id: self.widget_id.clone() });
        };
        let fragment = ControlFragment {
            widget_id: self.widget_id.clone(),
            prefix: self.binding.prefix().to_string(),
            label: self.display_name.clone(),
            units: self.units.clone(),
            min: self.bounds.min,
            max: self.bounds.max,
            value: self.bounds.clamp(readback),
        };
        Ok(&*self.markup.insert(fragment))
    }

    /// Write a new setpoint to the channel.
    ///
    /// # Errors
    ///
    /// Rejects writes while disconnected or outside the bounds; service
    /// failures surface as [`ControlError::Channel`].
    pub async fn write(&self, service: &dyn ChannelService, value: f64) -> Result<ChannelReading, ControlError> {
        if !self.is_connected() {
            return Err(ControlError::NotConnected { widget_id: self.widget_id.clone() });
        }
        if !self.bounds.contains(value) {
            return Err(ControlError::OutOfBounds {
                widget_id: self.widget_id.clone(),
                value,
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }
        let reading = service.write(&self.binding, value).await?;
        info!(prefix = %self.binding, widget_id = %self.widget_id, value, readback = reading.value, "control written");
        Ok(reading)
    }
}

// =============================================================================
// ACCESSORS
// =============================================================================

impl Control {
    #[must_use]
    pub fn binding(&self) -> &ChannelBinding {
        &self.binding
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn widget_id(&self) -> &WidgetId {
        &self.widget_id
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub fn units(&self) -> &str {
        &self.units
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Connected { .. })
    }

    /// Markup from the last `create_gui`, if any.
    #[must_use]
    pub fn markup(&self) -> Option<&ControlFragment> {
        self.markup.as_ref()
    }
}

#[cfg(test)]
#[path = "control_test.rs"]
mod tests;
