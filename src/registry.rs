//! Registry — the ordered set of Controls and Sensors shown on the page.
//!
//! DESIGN
//! ======
//! The device list is data: an ordered list of channel descriptors, either
//! the built-in beamline channels or a YAML file named by configuration.
//! `DeviceRegistry::from_descriptors` is the factory keyed on `kind`. The
//! registry is built and connected once at startup, then shared read-only.
//! Every DOM id a device will emit is reserved when the device is added, so
//! the refresh script can always target exactly one element per id.
//!
//! ERROR HANDLING
//! ==============
//! `connect_all` stops at the first failing Control. A partially connected
//! panel is never served.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::channel::{ChannelBinding, ChannelService};
use crate::control::{Control, ControlError};
use crate::layout::PAGE_IDS;
use crate::sensor::{Sensor, SensorError};
use crate::widget::{ControlFragment, Fragment, SensorFragment, WidgetId};

// =============================================================================
// DESCRIPTORS
// =============================================================================

/// One entry of the channel list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChannelDescriptor {
    Control {
        prefix: String,
        name: String,
        id: String,
        min: f64,
        max: f64,
        #[serde(default)]
        units: String,
    },
    Sensor {
        prefix: String,
        name: String,
        id: String,
        #[serde(default)]
        units: String,
    },
}

/// Top-level shape of a channel list file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelsFile {
    pub channels: Vec<ChannelDescriptor>,
}

/// Channels of beamline 5.3.1: the monochromator and longitudinal stage
/// motors, and the beamstop current.
#[must_use]
pub fn default_descriptors() -> Vec<ChannelDescriptor> {
    vec![
        ChannelDescriptor::Control {
            prefix: "IOC:m1".into(),
            name: "Mono theta [deg]".into(),
            id: "mono".into(),
            min: 0.0,
            max: 100.0,
            units: "\u{00B0}".into(),
        },
        ChannelDescriptor::Control {
            prefix: "IOC:m3".into(),
            name: "Longitudinal stage [deg]".into(),
            id: "long".into(),
            min: 0.0,
            max: 100.0,
            units: "\u{00B0}".into(),
        },
        ChannelDescriptor::Sensor {
            prefix: "Bl201-beamstop:current".into(),
            name: "Current sensor".into(),
            id: "current".into(),
            units: "\u{03BC}A".into(),
        },
    ]
}

/// Parse a YAML channel list.
///
/// # Errors
///
/// Returns [`RegistryError::Parse`] on malformed YAML or an unknown `kind`.
pub fn parse_descriptors(yaml: &str) -> Result<Vec<ChannelDescriptor>, RegistryError> {
    let file: ChannelsFile = serde_yaml::from_str(yaml)?;
    Ok(file.channels)
}

/// Load descriptors from `path`, or the built-in list when `path` is `None`.
///
/// # Errors
///
/// Returns [`RegistryError::Read`] if the file cannot be read, or
/// [`RegistryError::Parse`] if it is malformed.
pub fn load_descriptors(path: Option<&Path>) -> Result<Vec<ChannelDescriptor>, RegistryError> {
    let Some(path) = path else {
        return Ok(default_descriptors());
    };
    let yaml = std::fs::read_to_string(path).map_err(|source| RegistryError::Read { path: path.to_path_buf(), source })?;
    let descriptors = parse_descriptors(&yaml)?;
    info!(path = %path.display(), count = descriptors.len(), "channel list loaded");
    Ok(descriptors)
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read channel list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("channel list parse failed: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("widget id {0} is used more than once")]
    DuplicateWidgetId(WidgetId),
    #[error("widget {widget_id} would emit DOM id {dom_id}, which is already on the page")]
    DomIdClash { widget_id: WidgetId, dom_id: String },
    #[error(transparent)]
    Control(#[from] ControlError),
    #[error(transparent)]
    Sensor(#[from] SensorError),
}

// =============================================================================
// DEVICES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Control,
    Sensor,
}

#[derive(Debug, Clone)]
pub enum Device {
    Control(Control),
    Sensor(Sensor),
}

impl Device {
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Control(_) => DeviceKind::Control,
            Self::Sensor(_) => DeviceKind::Sensor,
        }
    }

    #[must_use]
    pub fn widget_id(&self) -> &WidgetId {
        match self {
            Self::Control(c) => c.widget_id(),
            Self::Sensor(s) => s.widget_id(),
        }
    }

    #[must_use]
    pub fn binding(&self) -> &ChannelBinding {
        match self {
            Self::Control(c) => c.binding(),
            Self::Sensor(s) => s.binding(),
        }
    }

    /// Every DOM id this device's fragment will carry.
    #[must_use]
    pub fn dom_ids(&self) -> Vec<String> {
        match self {
            Self::Control(c) => ControlFragment::dom_ids(c.widget_id()),
            Self::Sensor(s) => SensorFragment::dom_ids(s.widget_id()),
        }
    }

    /// Fragment from the last `create_gui`, if any.
    #[must_use]
    pub fn markup(&self) -> Option<Fragment> {
        match self {
            Self::Control(c) => c.markup().cloned().map(Fragment::Control),
            Self::Sensor(s) => s.markup().cloned().map(Fragment::Sensor),
        }
    }

    fn from_descriptor(descriptor: ChannelDescriptor) -> Result<Self, RegistryError> {
        Ok(match descriptor {
            ChannelDescriptor::Control { prefix, name, id, min, max, units } => {
                Self::Control(Control::new(&prefix, name, &id, min, max, units)?)
            }
            ChannelDescriptor::Sensor { prefix, name, id, units } => Self::Sensor(Sensor::new(&prefix, name, &id, units)?),
        })
    }
}

/// Devices in declaration order, indexed by widget id.
#[derive(Debug, Clone)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
    index: HashMap<WidgetId, usize>,
    /// DOM ids already claimed by the page layout or an accepted device.
    reserved: HashSet<String>,
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            index: HashMap::new(),
            reserved: PAGE_IDS.iter().map(|id| (*id).to_string()).collect(),
        }
    }
}

impl DeviceRegistry {
    /// Build devices from descriptors, keeping their order.
    ///
    /// # Errors
    ///
    /// Fails on an invalid descriptor or a repeated widget id.
    pub fn from_descriptors(descriptors: Vec<ChannelDescriptor>) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for descriptor in descriptors {
            registry.push(Device::from_descriptor(descriptor)?)?;
        }
        Ok(registry)
    }

    /// Append a device.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateWidgetId`] if the id is taken, or
    /// [`RegistryError::DomIdClash`] if any DOM id the device would emit is
    /// already used by the layout or another device.
    pub fn push(&mut self, device: Device) -> Result<(), RegistryError> {
        let id = device.widget_id().clone();
        if self.index.contains_key(&id) {
            return Err(RegistryError::DuplicateWidgetId(id));
        }
        let dom_ids = device.dom_ids();
        if let Some(dom_id) = dom_ids.iter().find(|dom_id| self.reserved.contains(*dom_id)) {
            return Err(RegistryError::DomIdClash { widget_id: id, dom_id: dom_id.clone() });
        }
        self.reserved.extend(dom_ids);
        self.index.insert(id, self.devices.len());
        self.devices.push(device);
        Ok(())
    }

    /// Connect every Control in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first connection failure; later Controls are not tried.
    pub async fn connect_all(&mut self, service: &dyn ChannelService) -> Result<(), ControlError> {
        for device in &mut self.devices {
            if let Device::Control(control) = device {
                control.connect(service).await?;
            }
        }
        info!(devices = self.devices.len(), "all controls connected");
        Ok(())
    }

    /// Generate every widget fragment, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::NotConnected`] if a Control has not been
    /// connected.
    pub fn create_gui(&mut self) -> Result<Vec<Fragment>, ControlError> {
        self.devices
            .iter_mut()
            .map(|device| match device {
                Device::Control(control) => control.create_gui().cloned().map(Fragment::Control),
                Device::Sensor(sensor) => Ok(Fragment::Sensor(sensor.create_gui().clone())),
            })
            .collect()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Device> {
        let id = WidgetId::new(id).ok()?;
        self.index.get(&id).map(|&i| &self.devices[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
