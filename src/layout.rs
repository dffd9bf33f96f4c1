//! Layout assembler — composes widget fragments into the panel page.
//!
//! DESIGN
//! ======
//! The page is assembled once at startup and never restructured. Layout is
//! a header bar over a two-column body: inputs on the left (one fragment
//! per device, in declaration order) and static Camera and Scan panels on
//! the right. A refresh-interval node tells the browser script how often to
//! poll live values; values are written into elements by widget id, so the
//! page itself never changes after assembly.
//!
//! Rendering goes through Leptos components in SSR mode. The page is static:
//! no signals and no hydration, rendered to a string once at startup.

use leptos::prelude::*;

use crate::widget::{Fragment, render_html};

pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 1000;

pub const INPUTS_ID: &str = "bl-controls";
pub const OUTPUTS_ID: &str = "bl-outputs";
pub const REFRESH_ID: &str = "refresh-interval";

pub const OUTPUT_TITLES: [&str; 2] = ["Camera", "Scan"];

/// Every DOM id the layout itself emits. Widget ids must stay clear of these.
pub const PAGE_IDS: &[&str] = &[
    "app-header",
    "app-logo",
    "app-title",
    INPUTS_ID,
    OUTPUTS_ID,
    "bl-camera",
    "bl-scan",
    "bl-scan-image",
    "scan-min",
    "scan-step",
    "scan-max",
    REFRESH_ID,
];

const SCAN_FIELDS: [(&str, &str); 3] = [("Minimum", "scan-min"), ("Step", "scan-step"), ("Maximum", "scan-max")];
const SCAN_BUTTONS: [(&str, &str); 2] = [("GO", "success"), ("ABORT", "danger")];

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";
const FONT_AWESOME_CSS: &str = "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/4.7.0/css/font-awesome.min.css";
const REPOSITORY_URL: &str = "https://github.com/als-computing/beamline531";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Browser tab title.
    pub page_title: String,
    /// Heading shown in the header bar.
    pub heading: String,
    pub logo_src: String,
    pub favicon_href: String,
    pub repository_url: String,
    pub help_url: String,
    pub stylesheets: Vec<String>,
    pub refresh_script: String,
    /// Endpoint the refresh script polls.
    pub values_url: String,
    pub refresh_interval_ms: u64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_title: "BL 5.3.1".into(),
            heading: "Advanced Light Source | Beamline 5.3.1".into(),
            logo_src: "/assets/logo.svg".into(),
            favicon_href: "/assets/logo.svg".into(),
            repository_url: REPOSITORY_URL.into(),
            help_url: REPOSITORY_URL.into(),
            stylesheets: vec![BOOTSTRAP_CSS.into(), "/assets/style.css".into(), FONT_AWESOME_CSS.into()],
            refresh_script: "/assets/refresh.js".into(),
            values_url: "/api/values".into(),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
        }
    }
}

// =============================================================================
// PAGE
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    inputs: Vec<Fragment>,
    options: LayoutOptions,
}

impl Page {
    /// Compose the page. Every fragment appears exactly once, in the order
    /// given, inside the inputs region.
    #[must_use]
    pub fn assemble(fragments: Vec<Fragment>, options: &LayoutOptions) -> Self {
        Self { inputs: fragments, options: options.clone() }
    }

    /// Widget fragments, in declaration order.
    #[must_use]
    pub fn inputs(&self) -> &[Fragment] {
        &self.inputs
    }

    /// Header text of each static output panel.
    #[must_use]
    pub fn output_titles(&self) -> &'static [&'static str] {
        &OUTPUT_TITLES
    }

    #[must_use]
    pub fn refresh_interval_ms(&self) -> u64 {
        self.options.refresh_interval_ms
    }

    #[must_use]
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Render the complete HTML document.
    #[must_use]
    pub fn render(&self) -> String {
        let (inputs, options) = (self.inputs.clone(), self.options.clone());
        render_html(view! { <Document inputs options/> })
    }
}

// =============================================================================
// COMPONENTS
// =============================================================================

#[component]
fn Document(inputs: Vec<Fragment>, options: LayoutOptions) -> impl IntoView {
    let LayoutOptions {
        page_title,
        heading,
        logo_src,
        favicon_href,
        repository_url,
        help_url,
        stylesheets,
        refresh_script,
        values_url,
        refresh_interval_ms,
    } = options;
    let stylesheets = stylesheets
        .into_iter()
        .map(|href| view! { <link rel="stylesheet" href=href/> })
        .collect_view();
    let inputs = inputs.into_iter().map(Fragment::into_any_view).collect_view();

    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <title>{page_title}</title>
                <link rel="icon" href=favicon_href/>
                {stylesheets}
            </head>
            <body>
                <Header heading logo_src repository_url help_url/>
                <div class="container-fluid">
                    <div class="row">
                        <div class="col-md-4">
                            <div id=INPUTS_ID>{inputs}</div>
                        </div>
                        <div class="col-md-8">
                            <div id=OUTPUTS_ID>
                                <CameraPanel/>
                                <ScanPanel/>
                            </div>
                        </div>
                    </div>
                    <div
                        id=REFRESH_ID
                        hidden=true
                        data-interval-ms=refresh_interval_ms.to_string()
                        data-values-url=values_url
                    ></div>
                </div>
                <script src=refresh_script></script>
            </body>
        </html>
    }
}

#[component]
fn Header(heading: String, logo_src: String, repository_url: String, help_url: String) -> impl IntoView {
    view! {
        <nav id="app-header" class="navbar navbar-dark sticky-top bl-navbar">
            <div class="container-fluid">
                <img id="app-logo" src=logo_src height="60px" alt="Berkeley Lab"/>
                <div id="app-title">
                    <h3>{heading}</h3>
                </div>
                <div class="navbar-nav flex-row">
                    <NavButton icon="fa-github" href=repository_url/>
                    <NavButton icon="fa-question-circle-o" href=help_url/>
                </div>
            </div>
        </nav>
    }
}

#[component]
fn NavButton(icon: &'static str, href: String) -> impl IntoView {
    view! { <a class=format!("btn bl-nav-button fa {icon}") href=href target="_blank" rel="noopener"></a> }
}

#[component]
fn Card(title: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="card mb-3">
            <div class="card-header">{title}</div>
            <div class="card-body">{children()}</div>
        </div>
    }
}

#[component]
fn CameraPanel() -> impl IntoView {
    view! {
        <Card title=OUTPUT_TITLES[0]>
            <div id="bl-camera"></div>
        </Card>
    }
}

#[component]
fn ScanPanel() -> impl IntoView {
    let fields = SCAN_FIELDS
        .into_iter()
        .map(|(label, id)| {
            view! {
                <div class="col">
                    <label class="form-label text-center" for=id>{label}</label>
                    <input id=id class="form-control" type="number"/>
                </div>
            }
        })
        .collect_view();
    // Scan execution lives outside this panel; the buttons stay inert.
    let buttons = SCAN_BUTTONS
        .into_iter()
        .map(|(label, color)| {
            view! {
                <div class="col align-self-end">
                    <button class=format!("btn btn-{color} w-100") type="button" disabled=true>{label}</button>
                </div>
            }
        })
        .collect_view();

    view! {
        <Card title=OUTPUT_TITLES[1]>
            <div id="bl-scan">
                <div class="row">
                    <img id="bl-scan-image" alt=""/>
                </div>
                <div class="row">{fields}{buttons}</div>
            </div>
        </Card>
    }
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
