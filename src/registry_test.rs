use super::*;
use crate::channel::test_helpers::MockChannelService;
use crate::widget::Fragment;

fn beamline_service() -> MockChannelService {
    MockChannelService::with_channels(&[("IOC:m1", 10.0), ("IOC:m3", 20.0), ("Bl201-beamstop:current", 0.5)])
}

// =============================================================================
// Descriptors
// =============================================================================

#[test]
fn default_descriptors_are_the_beamline_channels() {
    let ids: Vec<String> = default_descriptors()
        .into_iter()
        .map(|d| match d {
            ChannelDescriptor::Control { id, .. } | ChannelDescriptor::Sensor { id, .. } => id,
        })
        .collect();
    assert_eq!(ids, ["mono", "long", "current"]);
}

#[test]
fn parse_descriptors_reads_yaml_in_order() {
    let yaml = r#"
channels:
  - kind: control
    prefix: "IOC:m1"
    name: "Mono theta [deg]"
    id: mono
    min: 0
    max: 100
    units: "°"
  - kind: sensor
    prefix: "Bl201-beamstop:current"
    name: "Current sensor"
    id: current
"#;
    let descriptors = parse_descriptors(yaml).unwrap();
    assert_eq!(descriptors.len(), 2);
    assert_eq!(
        descriptors[0],
        ChannelDescriptor::Control {
            prefix: "IOC:m1".into(),
            name: "Mono theta [deg]".into(),
            id: "mono".into(),
            min: 0.0,
            max: 100.0,
            units: "\u{00B0}".into(),
        }
    );
    assert!(matches!(&descriptors[1], ChannelDescriptor::Sensor { units, .. } if units.is_empty()));
}

#[test]
fn parse_descriptors_rejects_unknown_kind() {
    let yaml = "channels:\n  - kind: camera\n    prefix: cam1\n    name: Cam\n    id: cam\n";
    assert!(matches!(parse_descriptors(yaml), Err(RegistryError::Parse(_))));
}

#[test]
fn load_descriptors_without_path_uses_defaults() {
    assert_eq!(load_descriptors(None).unwrap(), default_descriptors());
}

#[test]
fn load_descriptors_reports_missing_file() {
    let err = load_descriptors(Some(Path::new("/nonexistent/channels.yaml"))).unwrap_err();
    assert!(matches!(err, RegistryError::Read { .. }));
}

#[test]
fn shipped_channel_file_matches_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/channels.yaml");
    assert_eq!(load_descriptors(Some(path.as_path())).unwrap(), default_descriptors());
}

// =============================================================================
// Factory
// =============================================================================

#[test]
fn factory_builds_devices_by_kind_in_order() {
    let registry = DeviceRegistry::from_descriptors(default_descriptors()).unwrap();
    let kinds: Vec<DeviceKind> = registry.iter().map(Device::kind).collect();
    assert_eq!(kinds, [DeviceKind::Control, DeviceKind::Control, DeviceKind::Sensor]);
    assert_eq!(registry.len(), 3);
    assert_eq!(registry.get("long").unwrap().binding().prefix(), "IOC:m3");
    assert!(registry.get("missing").is_none());
    assert!(registry.get("not an id").is_none());
}

#[test]
fn factory_rejects_duplicate_widget_ids() {
    let mut descriptors = default_descriptors();
    descriptors.push(ChannelDescriptor::Sensor {
        prefix: "Bl201-beamstop:current2".into(),
        name: "Second current".into(),
        id: "mono".into(),
        units: "uA".into(),
    });
    let err = DeviceRegistry::from_descriptors(descriptors).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateWidgetId(id) if id.as_str() == "mono"));
}

#[test]
fn factory_rejects_widget_id_colliding_with_derived_dom_id() {
    let descriptors = vec![
        ChannelDescriptor::Control {
            prefix: "IOC:m1".into(),
            name: "A".into(),
            id: "a".into(),
            min: 0.0,
            max: 1.0,
            units: String::new(),
        },
        ChannelDescriptor::Sensor {
            prefix: "Bl201-beamstop:current".into(),
            name: "A slider".into(),
            id: "a-slider".into(),
            units: String::new(),
        },
    ];
    let err = DeviceRegistry::from_descriptors(descriptors).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::DomIdClash { widget_id, dom_id } if widget_id.as_str() == "a-slider" && dom_id == "a-slider"
    ));
}

#[test]
fn factory_rejects_derived_id_colliding_with_earlier_widget() {
    let descriptors = vec![
        ChannelDescriptor::Sensor { prefix: "S:1".into(), name: "W".into(), id: "a-widget".into(), units: String::new() },
        ChannelDescriptor::Sensor { prefix: "S:2".into(), name: "A".into(), id: "a".into(), units: String::new() },
    ];
    let err = DeviceRegistry::from_descriptors(descriptors).unwrap_err();
    assert!(matches!(err, RegistryError::DomIdClash { dom_id, .. } if dom_id == "a-widget"));
}

#[test]
fn factory_rejects_widget_id_used_by_page_layout() {
    let descriptors = vec![ChannelDescriptor::Sensor {
        prefix: "S:1".into(),
        name: "Scan minimum".into(),
        id: "scan-min".into(),
        units: String::new(),
    }];
    let err = DeviceRegistry::from_descriptors(descriptors).unwrap_err();
    assert!(matches!(err, RegistryError::DomIdClash { dom_id, .. } if dom_id == "scan-min"));
}

#[test]
fn failed_push_leaves_registry_unchanged() {
    let mut registry = DeviceRegistry::from_descriptors(default_descriptors()).unwrap();
    let clash = Device::Sensor(Sensor::new("S:1", "Mono slider", "mono-slider", "").unwrap());
    assert!(registry.push(clash).is_err());
    assert_eq!(registry.len(), 3);

    let ok = Device::Sensor(Sensor::new("S:2", "Other", "other", "").unwrap());
    registry.push(ok).unwrap();
    assert_eq!(registry.get("other").unwrap().dom_ids(), ["other-widget", "other"]);
}

#[test]
fn factory_rejects_inverted_bounds() {
    let descriptors = vec![ChannelDescriptor::Control {
        prefix: "IOC:m1".into(),
        name: "Mono".into(),
        id: "mono".into(),
        min: 100.0,
        max: 0.0,
        units: String::new(),
    }];
    let err = DeviceRegistry::from_descriptors(descriptors).unwrap_err();
    assert!(matches!(err, RegistryError::Control(ControlError::InvalidBounds { .. })));
}

// =============================================================================
// connect_all / create_gui
// =============================================================================

#[test]
fn create_gui_before_connect_all_fails() {
    let mut registry = DeviceRegistry::from_descriptors(default_descriptors()).unwrap();
    assert!(matches!(registry.create_gui(), Err(ControlError::NotConnected { .. })));
}

#[tokio::test]
async fn connect_all_then_create_gui_yields_unique_fragments_in_order() {
    let service = beamline_service();
    let mut registry = DeviceRegistry::from_descriptors(default_descriptors()).unwrap();
    registry.connect_all(&service).await.unwrap();

    let fragments = registry.create_gui().unwrap();
    let ids: Vec<&str> = fragments.iter().map(|f| f.widget_id().as_str()).collect();
    assert_eq!(ids, ["mono", "long", "current"]);
    assert!(matches!(&fragments[0], Fragment::Control(c) if (c.min, c.max, c.value) == (0.0, 100.0, 10.0)));
    assert!(matches!(&fragments[2], Fragment::Sensor(s) if s.units == "\u{03BC}A"));
    let markup: Vec<Fragment> = registry.iter().filter_map(Device::markup).collect();
    assert_eq!(markup, fragments);

    // Sensors are never connected.
    assert_eq!(service.connects.lock().unwrap().as_slice(), ["IOC:m1", "IOC:m3"]);
}

#[tokio::test]
async fn connect_all_stops_at_first_failure() {
    let service = MockChannelService::with_channels(&[("IOC:m3", 20.0)]);
    let mut registry = DeviceRegistry::from_descriptors(default_descriptors()).unwrap();
    let err = registry.connect_all(&service).await.unwrap_err();
    assert!(matches!(err, ControlError::Connect { widget_id, .. } if widget_id.as_str() == "mono"));
    assert_eq!(service.connects.lock().unwrap().as_slice(), ["IOC:m1"]);
}
