//! # Toaster - toast notification stack
//!
//! A bounded, newest-first stack of transient notifications with
//! per-entry countdown timers, driven by intents published through a
//! dispatcher.
//!
//! ## Architecture Overview
//!
//! - **Reducer** (`core::reducer`): pure `apply(list, intent, config)` transition
//! - **Timer** (`core::timer`): frame-driven countdown with pause and resume
//! - **Dispatcher** (`integration::dispatcher`): decoupled publish/subscribe of intents
//! - **Toaster** (`integration::toaster`): the mounted stack tying the three together
//!
//! ## Example Usage
//!
//! ```rust
//! use toaster::{Dispatcher, NotificationPatch, QueueConfig, Toaster};
//!
//! let dispatcher = Dispatcher::new();
//! let mut toaster = Toaster::with_dispatcher(QueueConfig::default(), dispatcher.clone());
//!
//! dispatcher.add(NotificationPatch::new().title("Saved"));
//! toaster.process_pending();
//!
//! assert_eq!(toaster.len(), 1);
//! assert_eq!(toaster.snapshot()[0].id.to_string(), "toast-0");
//! ```
//!
//! ## Modules
//!
//! - [`core`] - Data model, reducer, timers, modal and tooltip state
//! - [`integration`] - Dispatcher, toaster, input, rendering and runner
//! - [`infrastructure`] - CLI and configuration
//! - [`utils`] - Logging, panic handling and paths

pub mod core;
pub mod infrastructure;
pub mod integration;
pub mod utils;

pub use crate::core::{
    intent::Intent,
    notification::{Notification, NotificationId, NotificationPatch, QueueConfig},
    timer::NotificationTimer,
};
pub use crate::integration::{
    dispatcher::{Dispatcher, Subscription},
    toaster::Toaster,
};

/// Result type used across the crate
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
