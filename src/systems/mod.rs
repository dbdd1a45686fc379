//! Simulation systems.
//!
//! Submodules overview
//! - [`effectexpiry`] – time gate, sweep and the per-frame expiry system
//! - [`time`] – update simulation time and delta

pub mod effectexpiry;
pub mod time;
