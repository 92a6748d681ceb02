use std::{collections::HashMap, sync::Arc, time::Instant};

use crate::{
    core::{
        intent::Intent,
        notification::{Notification, NotificationId, NotificationPatch, QueueConfig},
        reducer,
        timer::{NotificationTimer, TimerEvent},
    },
    integration::dispatcher::{Dispatcher, Subscription},
};

/// Outcome of one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Entries whose timer expired during this frame
    pub expired: Vec<NotificationId>,
    /// Whether any timer advanced (progress changed)
    pub advanced: bool,
    /// Number of intents applied after the timers ran
    pub applied: usize,
}

/// The mounted notification stack
///
/// Owns the copy-on-write snapshot, one timer per expiring entry and the
/// dispatcher subscription through which intents arrive.
pub struct Toaster {
    config: QueueConfig,
    snapshot: Arc<Vec<Notification>>,
    timers: HashMap<NotificationId, NotificationTimer>,
    dispatcher: Dispatcher,
    subscription: Option<Subscription>,
}

impl Toaster {
    /// Create a mounted toaster with its own dispatcher
    pub fn new(config: QueueConfig) -> Self {
        Self::with_dispatcher(config, Dispatcher::new())
    }

    /// Create a mounted toaster listening on a shared dispatcher
    pub fn with_dispatcher(config: QueueConfig, dispatcher: Dispatcher) -> Self {
        let mut toaster = Self {
            config,
            snapshot: Arc::new(Vec::new()),
            timers: HashMap::new(),
            dispatcher,
            subscription: None,
        };
        toaster.mount();
        toaster
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Handle for callers that want to publish intents
    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn mount(&mut self) {
        if self.subscription.is_none() {
            self.subscription = Some(self.dispatcher.subscribe());
            log::info!("toaster mounted (capacity {})", self.config.max_capacity);
        }
    }

    /// Unsubscribe, cancel every timer and drop all entries
    pub fn unmount(&mut self) {
        if self.subscription.take().is_none() {
            return;
        }
        for (id, mut timer) in self.timers.drain() {
            if timer.cancel() {
                log::debug!("timer {id} cancelled on unmount");
            }
        }
        self.snapshot = Arc::new(Vec::new());
        log::info!("toaster unmounted");
    }

    /// Current ordered list, newest first
    pub fn snapshot(&self) -> Arc<Vec<Notification>> {
        Arc::clone(&self.snapshot)
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.snapshot.iter().find(|n| &n.id == id)
    }

    pub fn timer(&self, id: &NotificationId) -> Option<&NotificationTimer> {
        self.timers.get(id)
    }

    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    /// Live progress for entries that show a progress bar
    pub fn progress(&self, id: &NotificationId) -> Option<f64> {
        let notification = self.get(id)?;
        if !notification.options.show_progress || !notification.expires() {
            return None;
        }
        Some(
            self.timers
                .get(id)
                .map_or_else(|| notification.progress().unwrap_or(0.0), NotificationTimer::progress),
        )
    }

    /// Run the reducer and reconcile timers; returns whether the list changed
    pub fn apply(&mut self, intent: Intent) -> bool {
        if !self.is_mounted() {
            log::trace!("toaster: {} ignored while unmounted", intent.kind());
            return false;
        }

        log::debug!("toaster: applying {} {:?}", intent.kind(), intent.target());
        let next = reducer::apply(&self.snapshot, intent, &self.config);
        if next == *self.snapshot {
            return false;
        }

        self.snapshot = Arc::new(next);
        self.reconcile_timers();
        true
    }

    /// Apply every intent waiting on the subscription, in publish order
    pub fn process_pending(&mut self) -> usize {
        let Some(subscription) = self.subscription.as_mut() else {
            return 0;
        };
        let intents = subscription.drain();
        let count = intents.len();
        for intent in intents {
            self.apply(intent);
        }
        count
    }

    /// Wait for the next published intent and apply it
    pub async fn recv_and_apply(&mut self) -> Option<bool> {
        let intent = self.subscription.as_mut()?.recv().await?;
        Some(self.apply(intent))
    }

    /// Advance all timers by one frame
    ///
    /// Expired timers publish a remove intent through the dispatcher, which is
    /// then applied together with anything else already pending.
    pub fn on_frame(&mut self, now: Instant) -> FrameReport {
        let mut report = FrameReport::default();

        for (id, timer) in self.timers.iter_mut() {
            match timer.on_frame(now) {
                TimerEvent::Idle => {}
                TimerEvent::Advanced => report.advanced = true,
                TimerEvent::Expired => {
                    report.advanced = true;
                    report.expired.push(id.clone());
                }
            }
        }

        if report.advanced {
            self.write_back_elapsed();
        }

        for id in &report.expired {
            self.dispatcher.remove(id.clone());
        }

        report.applied = self.process_pending();
        report
    }

    /// Pointer entered the toast: pause when the entry pauses on hover
    pub fn pointer_enter(&mut self, id: &NotificationId) -> bool {
        self.set_hover_paused(id, true)
    }

    /// Pointer left the toast: resume from the current elapsed value
    pub fn pointer_leave(&mut self, id: &NotificationId) -> bool {
        self.set_hover_paused(id, false)
    }

    fn set_hover_paused(&mut self, id: &NotificationId, paused: bool) -> bool {
        // Intents published earlier must land before the pointer event.
        self.process_pending();
        let applies = self
            .get(id)
            .is_some_and(|n| n.options.pause_on_hover && n.paused != paused);
        if !applies {
            return false;
        }
        self.apply(Intent::Update(
            NotificationPatch::for_id(id.clone()).paused(paused),
        ))
    }

    /// Click on the toast body; closes it when `close_on_click` is set
    pub fn click(&mut self, id: &NotificationId) -> bool {
        self.process_pending();
        if self.get(id).is_some_and(|n| n.options.close_on_click) {
            self.dismiss(id)
        } else {
            false
        }
    }

    /// Close button: publish a remove regardless of options
    pub fn dismiss(&mut self, id: &NotificationId) -> bool {
        self.process_pending();
        if self.get(id).is_none() {
            return false;
        }
        self.dispatcher.remove(id.clone());
        self.process_pending() > 0
    }

    /// Keep exactly one timer per expiring entry
    fn reconcile_timers(&mut self) {
        let snapshot = Arc::clone(&self.snapshot);

        self.timers.retain(|id, timer| {
            let keep = snapshot.iter().any(|n| &n.id == id && n.expires());
            if !keep && timer.cancel() {
                log::debug!("timer {id} cancelled");
            }
            keep
        });

        for notification in snapshot.iter().filter(|n| n.expires()) {
            match self.timers.get_mut(&notification.id) {
                Some(timer) => {
                    if timer.duration() != notification.duration {
                        timer.set_duration(notification.duration);
                    }
                    timer.set_paused(notification.paused);
                }
                None => {
                    log::debug!(
                        "timer {} scheduled for {:?}",
                        notification.id,
                        notification.duration
                    );
                    self.timers.insert(
                        notification.id.clone(),
                        NotificationTimer::for_notification(notification),
                    );
                }
            }
        }
    }

    /// Publish timer progress as a new snapshot
    fn write_back_elapsed(&mut self) {
        let next = self
            .snapshot
            .iter()
            .map(|notification| {
                let mut notification = notification.clone();
                if let Some(timer) = self.timers.get(&notification.id) {
                    notification.elapsed = timer.elapsed();
                }
                notification
            })
            .collect();
        self.snapshot = Arc::new(next);
    }
}

impl Drop for Toaster {
    fn drop(&mut self) {
        self.unmount();
    }
}
