//! Native host for an inkcalc session.
//!
//! [`HttpRecognizer`] talks to the recognition service; [`Runner`] owns a
//! [`Session`](ink_editor::Session) on a single-threaded tokio `LocalSet`,
//! drives the request/response round-trip, and arms the reveal timers.

pub mod client;
pub mod config;
pub mod runner;

pub use client::{HttpRecognizer, Recognizer};
pub use config::ClientConfig;
pub use runner::Runner;
