//! Services behind the HTTP routes and background tasks.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the interaction with the beamline-control service
//! so route handlers stay focused on protocol translation.

pub mod refresh;
pub mod setpoint;
