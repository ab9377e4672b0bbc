//! Headless demo scenarios for the nodebreaker engine.
//!
//! A scenario is a RON file pairing an engine configuration and seed with a
//! deterministic autoplay policy. The [`runner::ScenarioManager`] loads the
//! gallery manifest, drives each session to its terminal state without any
//! presentation layer, and reports the outcome -- useful as living
//! documentation of engine behavior and as a smoke harness.

pub mod error;
pub mod manifest;
pub mod runner;
pub mod scenario;

pub use error::ScenarioError;
pub use manifest::{ScenarioEntry, ScenarioManifest, load_manifest};
pub use runner::{ScenarioManager, ScenarioReport, run_scenario};
pub use scenario::{Policy, ScenarioFile, load_scenario_file};
