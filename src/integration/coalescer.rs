use std::time::{Duration, Instant};

/// Coalescing helper for frame ticks and render decisions
pub struct Coalescer;

impl Coalescer {
    /// Pure decision function: how many whole `step`s fit between two frames
    /// Frames closer than one step apart yield zero and are ignored.
    #[inline]
    pub fn decide_steps(previous: Instant, now: Instant, step: Duration) -> u32 {
        if step.is_zero() {
            return 0;
        }
        let delta = now.saturating_duration_since(previous);
        u32::try_from(delta.as_nanos() / step.as_nanos()).unwrap_or(u32::MAX)
    }

    /// Pure decision function: whether to render this loop based on coalesced inputs
    #[inline]
    pub fn decide_render(snapshot_changed: bool, progress_changed: bool, first_frame: bool) -> bool {
        snapshot_changed || progress_changed || first_frame
    }
}
