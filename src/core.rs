//! Core state logic
//!
//! This module contains the side-effect-free parts of the crate:
//! - Notification data model and intents
//! - The pure queue reducer
//! - Per-notification countdown timers
//! - Modal and tooltip state

pub mod intent;
pub mod notification;
pub mod reducer;
pub mod state;
pub mod timer;
