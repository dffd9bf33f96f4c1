use super::*;

fn id(raw: &str) -> WidgetId {
    WidgetId::new(raw).unwrap()
}

fn mono() -> ControlFragment {
    ControlFragment {
        widget_id: id("mono"),
        prefix: "IOC:m1".into(),
        label: "Mono theta [deg]".into(),
        units: "\u{00B0}".into(),
        min: 0.0,
        max: 100.0,
        value: 12.0,
    }
}

fn current() -> SensorFragment {
    SensorFragment {
        widget_id: id("current"),
        prefix: "Bl201-beamstop:current".into(),
        label: "Current sensor".into(),
        units: "\u{03BC}A".into(),
    }
}

// =============================================================================
// WidgetId
// =============================================================================

#[test]
fn widget_id_accepts_simple_ids() {
    for raw in ["mono", "long", "current", "bl-camera", "motor_2"] {
        assert_eq!(id(raw).as_str(), raw);
    }
}

#[test]
fn widget_id_rejects_empty_and_punctuation() {
    for raw in ["", "mono theta", "a\"b", "x<y", "m.1"] {
        assert_eq!(WidgetId::new(raw), Err(InvalidWidgetId(raw.to_string())), "expected rejection for {raw:?}");
    }
}

// =============================================================================
// DOM ids
// =============================================================================

#[test]
fn control_dom_ids_cover_container_input_and_slider() {
    assert_eq!(ControlFragment::dom_ids(&id("a")), ["a-widget", "a", "a-slider"]);
    assert_eq!(Fragment::from(mono()).dom_ids(), ["mono-widget", "mono", "mono-slider"]);
}

#[test]
fn sensor_dom_ids_cover_container_and_value() {
    assert_eq!(SensorFragment::dom_ids(&id("a")), ["a-widget", "a"]);
    assert_eq!(Fragment::from(current()).widget_id().as_str(), "current");
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn control_renders_every_dom_id_once() {
    let html = Fragment::from(mono()).render();
    for dom_id in ControlFragment::dom_ids(&id("mono")) {
        assert_eq!(html.matches(&format!("id=\"{dom_id}\"")).count(), 1, "{dom_id} in {html}");
    }
}

#[test]
fn control_renders_bounds_and_value() {
    let html = Fragment::from(mono()).render();
    assert!(html.contains(r#"type="number""#));
    assert!(html.contains(r#"type="range""#));
    assert_eq!(html.matches(r#"min="0""#).count(), 2);
    assert_eq!(html.matches(r#"max="100""#).count(), 2);
    assert_eq!(html.matches(r#"value="12""#).count(), 2);
    assert!(html.contains(r#"data-prefix="IOC:m1""#));
    assert!(html.contains("Mono theta [deg]"));
    assert!(html.contains("\u{00B0}"));
}

#[test]
fn sensor_renders_placeholder_without_inputs() {
    let html = Fragment::from(current()).render();
    assert!(html.contains(r#"id="current-widget""#));
    assert!(html.contains(r#"data-kind="sensor""#));
    assert!(html.contains(&format!(">{VALUE_PLACEHOLDER}</output>")));
    assert!(html.contains("\u{03BC}A"));
    assert!(!html.contains("<input"));
}

#[test]
fn render_escapes_display_text() {
    let fragment = SensorFragment { label: "<b>Mono</b> & co".into(), ..current() };
    let html = Fragment::from(fragment).render();
    assert!(html.contains("&lt;b&gt;Mono&lt;/b&gt; &amp; co"));
    assert!(!html.contains("<b>"));
}

#[test]
fn format_number_drops_trailing_zero() {
    assert_eq!(format_number(100.0), "100");
    assert_eq!(format_number(0.0), "0");
    assert_eq!(format_number(12.5), "12.5");
    assert_eq!(format_number(-3.0), "-3");
}
