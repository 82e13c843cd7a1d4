//! Streaming filter and aggregation of Filecoin market deal dumps.
//!
//! Records flow source -> decode -> filter -> sink, either on one task
//! ([`streaming::SequentialRunner`]) or across a pool of workers
//! ([`streaming::Pipeline`]). Both produce identical sums.

pub mod aggregate;
pub mod app;
pub mod domain;
pub mod engine;
pub mod io;
pub mod prelude;
pub mod streaming;
