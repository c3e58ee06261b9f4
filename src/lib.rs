//! Pumphouse monitor library.
//!
//! Exposes the domain core, adapters and the polling loop so integration
//! tests can drive the full system against mock ports.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod poller;
pub mod sensors;
pub mod shutdown;
