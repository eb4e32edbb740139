//! Library crate for usertable.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state and update loop (`app`)
//! - REST client and the `UserService` seam (`api`)
//! - Process-wide query cache (`cache`)
//! - Error and result types (`error`)
//! - CSV export (`export`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `usertable` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod cache;
pub mod error;
pub mod export;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{AppError, Result};
