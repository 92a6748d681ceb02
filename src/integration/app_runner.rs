use color_eyre::eyre::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    infrastructure::config::{Config, RuntimeConfig},
    integration::{
        coalescer::Coalescer,
        dispatcher::Dispatcher,
        input::{Control, InputEvent, PointerEvent},
        renderer::{Renderer, ToastView},
        toaster::Toaster,
    },
};

/// Headless runner: frames from a tokio interval, input from a channel, output to a renderer
pub struct AppRunner<R: Renderer> {
    runtime: RuntimeConfig,
    toaster: Toaster,
    dispatcher: Dispatcher,
    renderer: R,
    cancel: CancellationToken,
    /// Set when the stack changed since the last render
    dirty: bool,
    /// Set when a timer advanced since the last render
    progressed: bool,
    rendered_once: bool,
}

impl<R: Renderer> AppRunner<R> {
    pub fn new(config: &Config, renderer: R) -> Self {
        let dispatcher = Dispatcher::new();
        let toaster = Toaster::with_dispatcher(config.queue, dispatcher.clone());

        Self {
            runtime: config.runtime.clone(),
            toaster,
            dispatcher,
            renderer,
            cancel: CancellationToken::new(),
            dirty: false,
            progressed: false,
            rendered_once: false,
        }
    }

    /// Dispatcher callers can publish intents through
    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Token that stops [`AppRunner::run`] when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run until the input closes, a quit event arrives or the token is cancelled
    ///
    /// The last state is rendered before returning. Fails up front on an
    /// unusable frame rate.
    pub async fn run(&mut self, mut input: mpsc::UnboundedReceiver<InputEvent>) -> Result<()> {
        let mut frames = tokio::time::interval(self.runtime.frame_period()?);
        frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut input_open = true;
        let cancel = self.cancel.clone();

        log::info!("AppRunner started at {:.1} fps", self.runtime.frame_rate);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    log::info!("AppRunner received cancellation signal");
                }

                event = input.recv(), if input_open => match event {
                    Some(event) => self.handle_input(event),
                    None => {
                        // Keep ticking so pending toasts can still expire.
                        input_open = false;
                    }
                },

                tick = frames.tick() => {
                    let report = self.toaster.on_frame(tick.into_std());
                    self.progressed |= report.advanced;
                    self.dirty |= report.applied > 0;

                    if !input_open && self.toaster.is_empty() {
                        log::info!("Input closed and no toast left, stopping");
                        cancel.cancel();
                    }
                }
            }

            self.render_if_needed()?;
            if cancel.is_cancelled() {
                break;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Intent(intent) => {
                log::debug!("Publishing {} from input", intent.kind());
                self.dispatcher.publish(intent);
                self.dirty |= self.toaster.process_pending() > 0;
            }
            InputEvent::Pointer(pointer) => {
                let changed = match &pointer {
                    PointerEvent::PointerEnter(id) => self.toaster.pointer_enter(id),
                    PointerEvent::PointerLeave(id) => self.toaster.pointer_leave(id),
                    PointerEvent::Click(id) => self.toaster.click(id),
                    PointerEvent::Dismiss(id) => self.toaster.dismiss(id),
                };
                self.dirty |= changed;
            }
            InputEvent::Control(Control::Quit) => {
                log::info!("Quit requested from input");
                self.cancel.cancel();
            }
        }
    }

    fn render_if_needed(&mut self) -> Result<()> {
        if !Coalescer::decide_render(self.dirty, self.progressed, !self.rendered_once) {
            return Ok(());
        }

        let snapshot = self.toaster.snapshot();
        let views: Vec<ToastView<'_>> = snapshot
            .iter()
            .map(|notification| ToastView {
                notification,
                progress: self.toaster.progress(&notification.id),
            })
            .collect();
        self.renderer.render(&views)?;

        self.dirty = false;
        self.progressed = false;
        self.rendered_once = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::{
        intent::Intent,
        notification::{NotificationId, NotificationPatch},
    };

    /// Records the ids of every rendered stack
    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<Vec<NotificationId>>,
        progress: Vec<f64>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, toasts: &[ToastView<'_>]) -> Result<()> {
            self.frames
                .push(toasts.iter().map(|v| v.notification.id.clone()).collect());
            self.progress.extend(toasts.iter().filter_map(|v| v.progress));
            Ok(())
        }
    }

    fn runner() -> AppRunner<RecordingRenderer> {
        AppRunner::new(&Config::default(), RecordingRenderer::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_until_last_toast_expires() -> Result<()> {
        let mut runner = runner();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(InputEvent::Intent(Intent::add(
            NotificationPatch::for_id("a")
                .title("Saved")
                .duration(Duration::from_millis(200))
                .show_progress(true),
        )))?;
        drop(tx);

        runner.run(rx).await?;

        let frames = &runner.renderer().frames;
        assert!(frames.iter().any(|ids| ids == &vec![NotificationId::from("a")]));
        assert_eq!(frames.last(), Some(&vec![]));
        assert!(!runner.renderer().progress.is_empty());
        assert!(runner.toaster().is_empty());
        assert_eq!(runner.toaster().active_timers(), 0);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_stops_runner() -> Result<()> {
        let mut runner = runner();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(InputEvent::Intent(Intent::add(
            NotificationPatch::for_id("a").duration(Duration::ZERO),
        )))?;
        tx.send(InputEvent::Control(Control::Quit))?;

        runner.run(rx).await?;

        // Persistent entries survive; the runner stopped on request.
        assert_eq!(runner.toaster().len(), 1);
        assert!(runner.cancel_token().is_cancelled());
        // the final state is rendered before stopping
        assert_eq!(
            runner.renderer().frames.last(),
            Some(&vec![NotificationId::from("a")])
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_quit_still_renders_once() -> Result<()> {
        let mut runner = runner();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(InputEvent::Control(Control::Quit))?;

        runner.run(rx).await?;

        assert_eq!(runner.renderer().frames, vec![Vec::<NotificationId>::new()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_unusable_frame_rate_is_an_error() {
        let mut config = Config::default();
        for frame_rate in [0.0, -1.0, 1e12] {
            config.runtime.frame_rate = frame_rate;
            let mut runner = AppRunner::new(&config, RecordingRenderer::default());
            let (_tx, rx) = mpsc::unbounded_channel();

            assert!(runner.run(rx).await.is_err());
            assert!(runner.renderer().frames.is_empty());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_keeps_toast_alive() -> Result<()> {
        let mut runner = runner();
        let token = runner.cancel_token();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(InputEvent::Intent(Intent::add(
            NotificationPatch::for_id("a")
                .duration(Duration::from_millis(100))
                .pause_on_hover(true),
        )))?;
        tx.send(InputEvent::Pointer(PointerEvent::PointerEnter("a".into())))?;

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            token.cancel();
        });
        runner.run(rx).await?;

        let toaster = runner.toaster();
        assert_eq!(toaster.len(), 1);
        assert!(toaster.get(&"a".into()).is_some_and(|n| n.paused));
        Ok(())
    }
}
