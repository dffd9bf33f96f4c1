//! Sensor — one read-only beamline measurement.
//!
//! Sensors have no connection step: the read path is always available
//! through the service, so the widget can be generated at any time. The
//! value element starts with a placeholder and is filled in by refresh.

use crate::channel::{ChannelBinding, ChannelError, ChannelReading, ChannelService};
use crate::widget::{InvalidWidgetId, SensorFragment, WidgetId};

#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error(transparent)]
    InvalidWidgetId(#[from] InvalidWidgetId),
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

#[derive(Debug, Clone)]
pub struct Sensor {
    binding: ChannelBinding,
    display_name: String,
    widget_id: WidgetId,
    units: String,
    markup: Option<SensorFragment>,
}

impl Sensor {
    /// # Errors
    ///
    /// Fails on a malformed prefix or widget id.
    pub fn new(
        prefix: &str,
        display_name: impl Into<String>,
        widget_id: &str,
        units: impl Into<String>,
    ) -> Result<Self, SensorError> {
        Ok(Self {
            binding: ChannelBinding::new(prefix)?,
            display_name: display_name.into(),
            widget_id: WidgetId::new(widget_id)?,
            units: units.into(),
            markup: None,
        })
    }

    /// Generate the read-only display widget and keep it as this Sensor's
    /// markup.
    pub fn create_gui(&mut self) -> &SensorFragment {
        let fragment = SensorFragment {
            widget_id: self.widget_id.clone(),
            prefix: self.binding.prefix().to_string(),
            label: self.display_name.clone(),
            units: self.units.clone(),
        };
        &*self.markup.insert(fragment)
    }

    /// # Errors
    ///
    /// Propagates the service failure unchanged.
    pub async fn read(&self, service: &dyn ChannelService) -> Result<ChannelReading, ChannelError> {
        service.read(&self.binding).await
    }

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
    pub fn units(&self) -> &str {
        &self.units
    }

    #[must_use]
    pub fn markup(&self) -> Option<&SensorFragment> {
        self.markup.as_ref()
    }
}

#[cfg(test)]
#[path = "sensor_test.rs"]
mod tests;
