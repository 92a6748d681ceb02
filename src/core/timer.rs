use std::time::{Duration, Instant};

use crate::{
    core::notification::{Notification, NotificationId},
    integration::coalescer::Coalescer,
};

/// Granularity of the countdown; frames closer together than this are coalesced
pub const TICK_STEP: Duration = Duration::from_millis(50);

/// Scheduling state of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Waiting for the next frame
    Scheduled,
    /// Not scheduled until resumed
    Paused,
    /// Reached its duration; reported once
    Expired,
    /// Owner was removed
    Cancelled,
}

/// Result of feeding one frame to a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Idle,
    Advanced,
    Expired,
}

/// Elapsed-time accumulator for one notification
#[derive(Debug, Clone)]
pub struct NotificationTimer {
    id: NotificationId,
    duration: Duration,
    elapsed: Duration,
    previous: Option<Instant>,
    schedule: Schedule,
}

impl NotificationTimer {
    pub fn new(id: NotificationId, duration: Duration, paused: bool) -> Self {
        Self {
            id,
            duration,
            elapsed: Duration::ZERO,
            previous: None,
            schedule: if paused {
                Schedule::Paused
            } else {
                Schedule::Scheduled
            },
        }
    }

    /// Timer resuming from whatever the entry has already accumulated
    pub fn for_notification(notification: &Notification) -> Self {
        let mut timer = Self::new(
            notification.id.clone(),
            notification.duration,
            notification.paused,
        );
        timer.elapsed = notification.elapsed.min(notification.duration);
        timer
    }

    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    pub fn is_scheduled(&self) -> bool {
        self.schedule == Schedule::Scheduled
    }

    pub fn is_paused(&self) -> bool {
        self.schedule == Schedule::Paused
    }

    /// elapsed / duration clamped to [0, 1]
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Advance by the whole steps that fit since the previous counted frame
    pub fn on_frame(&mut self, now: Instant) -> TimerEvent {
        if self.schedule != Schedule::Scheduled {
            return TimerEvent::Idle;
        }

        let previous = *self.previous.get_or_insert(now);
        let steps = Coalescer::decide_steps(previous, now, TICK_STEP);
        if steps == 0 {
            return TimerEvent::Idle;
        }

        let advanced = TICK_STEP.saturating_mul(steps);
        self.previous = Some(previous + advanced);
        self.elapsed = self.elapsed.saturating_add(advanced).min(self.duration);

        if self.elapsed >= self.duration {
            self.schedule = Schedule::Expired;
            log::debug!("timer {} expired after {:?}", self.id, self.elapsed);
            TimerEvent::Expired
        } else {
            TimerEvent::Advanced
        }
    }

    /// Stop scheduling; paused time never counts
    pub fn pause(&mut self) {
        if self.schedule == Schedule::Scheduled {
            self.schedule = Schedule::Paused;
            self.previous = None;
        }
    }

    /// Reschedule from the current elapsed value
    pub fn resume(&mut self) {
        if self.schedule == Schedule::Paused {
            self.schedule = Schedule::Scheduled;
            self.previous = None;
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Change the target duration; an already-passed target expires on the next frame
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
        self.elapsed = self.elapsed.min(duration);
        if self.schedule == Schedule::Scheduled && !duration.is_zero() && self.elapsed >= duration {
            // Anchor one step back so the next frame is counted.
            self.previous = self.previous.map(|previous| previous - TICK_STEP);
        }
    }

    /// Returns `true` only the first time
    pub fn cancel(&mut self) -> bool {
        if self.schedule == Schedule::Cancelled {
            return false;
        }
        self.schedule = Schedule::Cancelled;
        self.previous = None;
        true
    }
}
