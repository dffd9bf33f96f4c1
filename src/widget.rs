//! Widget fragments — what Controls and Sensors contribute to the page.
//!
//! DESIGN
//! ======
//! A fragment is plain data (widget id, label, units, bounds) produced by
//! `create_gui`. Leptos turns it into markup through `view!`, so display
//! names and units are escaped by the renderer. Every DOM id a fragment
//! emits is derived from its widget id by the helpers in this module; the
//! registry reserves the same set before it accepts a device, which keeps
//! ids unique across the page.

use std::fmt;

use leptos::prelude::*;
use leptos::tachys::view::RenderHtml;
use leptos::tachys::view::any_view::{AnyView, IntoAny};

/// Shown in a Sensor until the first refresh delivers a value.
pub const VALUE_PLACEHOLDER: &str = "--";

// =============================================================================
// WIDGET ID
// =============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid widget id {0:?}: expected non-empty [A-Za-z0-9_-]")]
pub struct InvalidWidgetId(pub String);

/// Identifier the refresh mechanism uses to target one widget on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(String);

impl WidgetId {
    /// # Errors
    ///
    /// Returns [`InvalidWidgetId`] for an empty id or one containing
    /// characters outside `[A-Za-z0-9_-]`.
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidWidgetId> {
        let id = id.into();
        let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid { Ok(Self(id)) } else { Err(InvalidWidgetId(id)) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// DOM id of the element wrapping a whole widget.
#[must_use]
pub fn container_id(id: &WidgetId) -> String {
    format!("{id}-widget")
}

/// DOM id of a Control's range slider.
#[must_use]
pub fn slider_id(id: &WidgetId) -> String {
    format!("{id}-slider")
}

// =============================================================================
// FRAGMENTS
// =============================================================================

/// Bounded numeric input for one Control.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlFragment {
    pub widget_id: WidgetId,
    pub prefix: String,
    pub label: String,
    pub units: String,
    pub min: f64,
    pub max: f64,
    /// Initial input value, already clamped to `[min, max]`.
    pub value: f64,
}

impl ControlFragment {
    /// Every DOM id a Control with `widget_id` puts on the page.
    #[must_use]
    pub fn dom_ids(widget_id: &WidgetId) -> Vec<String> {
        vec![container_id(widget_id), widget_id.to_string(), slider_id(widget_id)]
    }
}

/// Read-only value display for one Sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorFragment {
    pub widget_id: WidgetId,
    pub prefix: String,
    pub label: String,
    pub units: String,
}

impl SensorFragment {
    /// Every DOM id a Sensor with `widget_id` puts on the page.
    #[must_use]
    pub fn dom_ids(widget_id: &WidgetId) -> Vec<String> {
        vec![container_id(widget_id), widget_id.to_string()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Control(ControlFragment),
    Sensor(SensorFragment),
}

impl Fragment {
    #[must_use]
    pub fn widget_id(&self) -> &WidgetId {
        match self {
            Self::Control(f) => &f.widget_id,
            Self::Sensor(f) => &f.widget_id,
        }
    }

    #[must_use]
    pub fn dom_ids(&self) -> Vec<String> {
        match self {
            Self::Control(f) => ControlFragment::dom_ids(&f.widget_id),
            Self::Sensor(f) => SensorFragment::dom_ids(&f.widget_id),
        }
    }

    pub fn into_any_view(self) -> AnyView {
        match self {
            Self::Control(fragment) => view! { <ControlWidget fragment/> }.into_any(),
            Self::Sensor(fragment) => view! { <SensorWidget fragment/> }.into_any(),
        }
    }

    /// Render this fragment on its own.
    #[must_use]
    pub fn render(&self) -> String {
        render_html(self.clone().into_any_view())
    }
}

impl From<ControlFragment> for Fragment {
    fn from(fragment: ControlFragment) -> Self {
        Self::Control(fragment)
    }
}

impl From<SensorFragment> for Fragment {
    fn from(fragment: SensorFragment) -> Self {
        Self::Sensor(fragment)
    }
}

// =============================================================================
// COMPONENTS
// =============================================================================

#[component]
fn ControlWidget(fragment: ControlFragment) -> impl IntoView {
    let ControlFragment { widget_id, prefix, label, units, min, max, value } = fragment;
    let (min, max, value) = (format_number(min), format_number(max), format_number(value));

    view! {
        <div id=container_id(&widget_id) class="bl-widget bl-control" data-kind="control" data-prefix=prefix>
            <label class="bl-label" for=widget_id.to_string()>
                <span class="bl-name">{label}</span>
                <span class="bl-units">{units}</span>
            </label>
            <input
                id=widget_id.to_string()
                class="bl-input form-control"
                type="number"
                min=min.clone()
                max=max.clone()
                step="any"
                value=value.clone()
            />
            <input
                id=slider_id(&widget_id)
                class="bl-slider form-range"
                type="range"
                min=min
                max=max
                step="any"
                value=value
            />
        </div>
    }
}

#[component]
fn SensorWidget(fragment: SensorFragment) -> impl IntoView {
    let SensorFragment { widget_id, prefix, label, units } = fragment;

    view! {
        <div id=container_id(&widget_id) class="bl-widget bl-sensor" data-kind="sensor" data-prefix=prefix>
            <label class="bl-label" for=widget_id.to_string()>
                <span class="bl-name">{label}</span>
                <span class="bl-units">{units}</span>
            </label>
            <output id=widget_id.to_string() class="bl-value" aria-live="polite">
                {VALUE_PLACEHOLDER}
            </output>
        </div>
    }
}

// =============================================================================
// RENDERING
// =============================================================================

/// Render a static view to an HTML string.
#[must_use]
pub fn render_html(view: impl IntoView) -> String {
    Owner::new().with(|| view.to_html())
}

/// Format a number for an HTML attribute (`100` rather than `100.0`).
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
#[path = "widget_test.rs"]
mod tests;
