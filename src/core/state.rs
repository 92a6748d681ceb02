//! Transient widget state outside the notification stack

pub mod modal;
pub mod tooltip;

pub use modal::{ModalMsg, ModalState};
pub use tooltip::{TooltipEvent, TooltipMsg, TooltipPosition, TooltipState};
