//! Event types and observers used by the effect expiry systems.
//!
//! Submodules:
//! - [`effects`] – effect application, expiry and emptied-collection notifications
//!
//! See each submodule for concrete event data, semantics, and example usage.
pub mod effects;
