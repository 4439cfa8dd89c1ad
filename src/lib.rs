//! Minute-by-minute simulator of a national grid recovering from a blackout.
//!
//! The core ([`plants`], [`forecast`], [`sim`]) is synchronous and free of
//! I/O; [`config`], [`scenario`] and [`io`] adapt files to it.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod forecast;
pub mod io;
pub mod logging;
pub mod plants;
pub mod scenario;
/// Recovery engine, dispatch and reporting.
pub mod sim;

pub use error::Error;
