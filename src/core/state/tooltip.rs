use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TooltipPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

/// Messages specific to TooltipState
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TooltipMsg {
    MouseEnter,
    MouseLeave,
    Focus,
    Blur,
}

impl TooltipMsg {
    fn is_mouse(self) -> bool {
        matches!(self, TooltipMsg::MouseEnter | TooltipMsg::MouseLeave)
    }

    fn opens(self) -> bool {
        matches!(self, TooltipMsg::MouseEnter | TooltipMsg::Focus)
    }
}

/// Reported when a delayed transition lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipEvent {
    Opened,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    show: bool,
    deadline: Instant,
}

/// Hover/focus driven tooltip visibility with enter and leave delays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipState {
    pub show: bool,
    pub position: TooltipPosition,
    pub enter_delay: Duration,
    pub leave_delay: Duration,
    pub mouse_listener: bool,
    pub focus_listener: bool,
    pending: Option<Pending>,
}

impl Default for TooltipState {
    fn default() -> Self {
        Self {
            show: false,
            position: TooltipPosition::default(),
            enter_delay: Duration::ZERO,
            leave_delay: Duration::ZERO,
            mouse_listener: true,
            focus_listener: true,
            pending: None,
        }
    }
}

impl TooltipState {
    pub fn new(enter_delay: Duration, leave_delay: Duration) -> Self {
        Self {
            enter_delay,
            leave_delay,
            ..Self::default()
        }
    }

    /// Focusable only when the focus listener is on
    pub fn tab_index(&self) -> Option<i32> {
        self.focus_listener.then_some(0)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Schedule the transition for `msg`, replacing any pending one
    /// Returns: whether the message was accepted
    pub fn update(&mut self, msg: TooltipMsg, now: Instant) -> bool {
        let listening = if msg.is_mouse() {
            self.mouse_listener
        } else {
            self.focus_listener
        };
        if !listening {
            return false;
        }

        let show = msg.opens();
        let delay = if show {
            self.enter_delay
        } else {
            self.leave_delay
        };
        self.pending = Some(Pending {
            show,
            deadline: now + delay,
        });
        true
    }

    /// Land a pending transition once its deadline has passed
    pub fn on_frame(&mut self, now: Instant) -> Option<TooltipEvent> {
        let pending = self.pending?;
        if now < pending.deadline {
            return None;
        }
        self.pending = None;

        if self.show == pending.show {
            return None;
        }
        self.show = pending.show;
        Some(if self.show {
            TooltipEvent::Opened
        } else {
            TooltipEvent::Closed
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::*;

    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_zero_delay_opens_on_next_frame() {
        let t0 = Instant::now();
        let mut tooltip = TooltipState::default();

        assert!(tooltip.update(TooltipMsg::MouseEnter, t0));
        assert_eq!(tooltip.on_frame(t0), Some(TooltipEvent::Opened));
        assert!(tooltip.show);
        assert_eq!(tooltip.on_frame(t0), None);
    }

    #[test]
    fn test_enter_and_leave_delays() {
        let t0 = Instant::now();
        let mut tooltip = TooltipState::new(ms(200), ms(100));

        tooltip.update(TooltipMsg::Focus, t0);
        assert_eq!(tooltip.on_frame(t0 + ms(150)), None);
        assert_eq!(tooltip.on_frame(t0 + ms(200)), Some(TooltipEvent::Opened));

        tooltip.update(TooltipMsg::Blur, t0 + ms(300));
        assert_eq!(tooltip.on_frame(t0 + ms(350)), None);
        assert_eq!(tooltip.on_frame(t0 + ms(400)), Some(TooltipEvent::Closed));
    }

    #[test]
    fn test_leave_before_open_cancels_opening() {
        let t0 = Instant::now();
        let mut tooltip = TooltipState::new(ms(200), ms(0));

        tooltip.update(TooltipMsg::MouseEnter, t0);
        tooltip.update(TooltipMsg::MouseLeave, t0 + ms(50));

        assert_eq!(tooltip.on_frame(t0 + ms(500)), None);
        assert!(!tooltip.show);
        assert!(!tooltip.has_pending());
    }

    #[rstest]
    #[case::mouse_disabled(false, true, TooltipMsg::MouseEnter)]
    #[case::focus_disabled(true, false, TooltipMsg::Focus)]
    fn test_disabled_listener_ignores_events(
        #[case] mouse_listener: bool,
        #[case] focus_listener: bool,
        #[case] msg: TooltipMsg,
    ) {
        let mut tooltip = TooltipState {
            mouse_listener,
            focus_listener,
            ..TooltipState::default()
        };
        assert!(!tooltip.update(msg, Instant::now()));
        assert!(!tooltip.has_pending());
    }

    #[test]
    fn test_tab_index_follows_focus_listener() {
        let mut tooltip = TooltipState::default();
        assert_eq!(tooltip.tab_index(), Some(0));
        tooltip.focus_listener = false;
        assert_eq!(tooltip.tab_index(), None);
        assert_eq!("right".parse::<TooltipPosition>().ok(), Some(TooltipPosition::Right));
    }
}
