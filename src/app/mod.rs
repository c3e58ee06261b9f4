//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the pumphouse monitor:
//! pressure-interval classification, artifact detection, MAXTIME
//! checkpoints and tank-change tracking.  All interaction with hardware,
//! the network and the filesystem happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod monitor;
pub mod ports;
pub mod state;
