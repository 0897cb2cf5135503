//! # Rollcall core
//!
//! Attendance-taking sessions, the saved record history and the statistics
//! derived from it. This crate does no I/O: rosters, clocks and snapshot
//! storage are supplied through the traits in [`roster`], [`clock`] and
//! [`persistence`].

pub mod clock;
pub mod engine;
pub mod errors;
pub mod models;
pub mod persistence;
pub mod qr;
pub mod roster;
pub mod session;
pub mod stats;
pub mod store;

pub use engine::AttendanceEngine;
