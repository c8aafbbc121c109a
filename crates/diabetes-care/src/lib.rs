//! Client-side workflow of the DiabetesCare risk checker.
//!
//! The crate collects eight measurements, submits them to a remote classifier
//! and presents the verdict with optional home-remedy advice, while keeping a
//! persisted light/dark display preference.

pub mod assessment;
pub mod config;
pub mod error;
pub mod preferences;
pub mod session;
pub mod telemetry;
