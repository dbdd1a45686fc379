//! ECS resources made available to systems.
//!
//! Overview
//! - `effectconfig` – INI-backed configuration (check interval, empty-collection policy)
//! - `effectscheduler` – last sweep time and the throttled sweep driver
//! - `scenario` – JSON description of an initial effect population
//! - `worldtime` – simulation time in milliseconds and the `TimeSource` trait
pub mod effectconfig;
pub mod effectscheduler;
pub mod scenario;
pub mod worldtime;
