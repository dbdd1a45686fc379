//! ECS components for entities.
//!
//! Submodules overview:
//! - [`timedeffects`] – per-entity map of effect key to remaining duration

pub mod timedeffects;
