//! Lapdelta Core Library
//!
//! This crate provides the shared data model, error taxonomy, and series
//! shaping used by the lapdelta data sources and session layer.

pub mod error;
pub mod model;
pub mod series;

pub use error::LoadError;
pub use model::{
    Driver, DriverLaps, DriverPair, LapComparison, LapRecord, LapTelemetry, Mode, Provenance,
    Race, TelemetryPoint,
};
