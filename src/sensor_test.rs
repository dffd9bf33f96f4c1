use super::*;
use crate::channel::test_helpers::MockChannelService;
use crate::widget::{Fragment, VALUE_PLACEHOLDER};

fn current() -> Sensor {
    Sensor::new("Bl201-beamstop:current", "Current sensor", "current", "\u{03BC}A").unwrap()
}

#[test]
fn create_gui_needs_no_connection() {
    let mut sensor = current();
    let fragment = sensor.create_gui().clone();
    assert_eq!(fragment.widget_id.as_str(), "current");
    assert_eq!(fragment.label, "Current sensor");
    assert_eq!(fragment.units, "\u{03BC}A");
    assert_eq!(sensor.markup(), Some(&fragment));
}

#[test]
fn rendered_fragment_shows_placeholder_and_prefix() {
    let mut sensor = current();
    let html = Fragment::from(sensor.create_gui().clone()).render();
    assert!(html.contains(r#"id="current-widget""#));
    assert!(html.contains(r#"id="current""#));
    assert!(html.contains(r#"data-prefix="Bl201-beamstop:current""#));
    assert!(html.contains(VALUE_PLACEHOLDER));
    assert!(!html.contains("<input"));
}

#[test]
fn new_rejects_bad_id() {
    assert!(matches!(
        Sensor::new("Bl201-beamstop:current", "Current", "", "uA"),
        Err(SensorError::InvalidWidgetId(_))
    ));
}

#[tokio::test]
async fn read_returns_live_value() {
    let service = MockChannelService::with_channels(&[("Bl201-beamstop:current", 0.25)]);
    let reading = current().read(&service).await.unwrap();
    assert!((reading.value - 0.25).abs() < f64::EPSILON);
}

#[tokio::test]
async fn read_failure_is_passed_through() {
    let service = MockChannelService::with_channels(&[("Bl201-beamstop:current", 0.25)]);
    service.take_offline("Bl201-beamstop:current");
    let err = current().read(&service).await.unwrap_err();
    assert!(matches!(err, ChannelError::Unreachable { .. }));
}
