//! Beamline 5.3.1 control panel.
//!
//! ARCHITECTURE
//! ============
//! Controls and Sensors bind hardware channels on the external
//! beamline-control service and generate widget fragments. The layout
//! assembler places the fragments into a single page at startup, the
//! refresh service keeps live values current, and the Axum router serves
//! both the page and the JSON API the browser polls.

pub mod channel;
pub mod config;
pub mod control;
pub mod layout;
pub mod registry;
pub mod routes;
pub mod sensor;
pub mod services;
pub mod state;
pub mod widget;
