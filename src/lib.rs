//! Chronicle - branching-narrative simulation engine
//!
//! A player advances through a fixed directed graph of scenes, each offering
//! choices that shift a small set of bounded metrics, until a terminal scene
//! or a metric collapse ends the session. This crate is the state-transition
//! and metric-evolution core; rendering belongs to the host shell, which only
//! sees read-only session views.

pub mod core;
pub mod error;
pub mod loader;
pub mod session;

pub use error::{ChronicleError, Result};
