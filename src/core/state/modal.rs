use serde::{Deserialize, Serialize};

/// Messages specific to ModalState
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalMsg {
    Open,
    Close,
    /// The close button in the dialog corner
    CloseButton,
    /// Pointer or touch pressed outside the dialog panel
    ClickOutside,
}

/// Open/closed state of a modal dialog (role `dialog`, `aria-modal`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalState {
    pub open: bool,
    /// Whether the page behind should stop scrolling while open
    pub lock_scroll: bool,
    pub close_on_outside_click: bool,
    pub scroll_lock_enabled: bool,
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            open: false,
            lock_scroll: false,
            close_on_outside_click: true,
            scroll_lock_enabled: true,
        }
    }
}

impl ModalState {
    /// Modal-specific update function
    /// Returns: whether the open state changed
    pub fn update(&mut self, msg: ModalMsg) -> bool {
        let was_open = self.open;

        match msg {
            ModalMsg::Open => self.open = true,
            ModalMsg::Close | ModalMsg::CloseButton => self.open = false,
            ModalMsg::ClickOutside => {
                if self.close_on_outside_click {
                    self.open = false;
                }
            }
        }

        self.lock_scroll = self.scroll_lock_enabled && self.open;
        was_open != self.open
    }
}
