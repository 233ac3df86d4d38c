//! Taskstream - Real-time workspace event distribution.
//!
//! This crate implements the server-push subsystem of the Taskstream
//! project management platform: long-lived subscriber connections scoped by
//! workspace, and best-effort broadcast of workspace events to exactly the
//! subscribers of one workspace.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
