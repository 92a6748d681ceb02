//! Integration layer
//!
//! Glue between the pure core and the outside world: the intent dispatcher,
//! the mounted toaster, input parsing, rendering and the async runner.

pub mod app_runner;
pub mod coalescer;
pub mod dispatcher;
pub mod input;
pub mod renderer;
pub mod toaster;
