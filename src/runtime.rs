//! Async driver for a [`Viewer`].
//!
//! Messages arrive over a channel; effects that wait are spawned as tokio
//! timers that post their completion back. Each transition gets a
//! [`TransitionToken`] so a content change can abandon pending timers.

use crate::cancellation::TransitionToken;
use crate::viewer::{Effect, Message, NavKey, ViewModel, Viewer};
use anyhow::{Result, anyhow};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Where the viewer's output goes.
pub trait RenderSurface {
    fn render(&mut self, view: &ViewModel);
    fn scroll_to_top(&mut self);
}

/// Cloneable entry point for posting messages to a running viewer.
#[derive(Debug, Clone)]
pub struct ViewerHandle {
    sender: mpsc::UnboundedSender<Message>,
}

impl ViewerHandle {
    pub fn send(&self, message: Message) -> Result<()> {
        self.sender
            .send(message)
            .map_err(|err| anyhow!("viewer runtime has stopped; dropped {:?}", err.0))
    }

    pub fn set_content(&self, content: Option<String>) -> Result<()> {
        self.send(Message::ContentChanged(content))
    }

    pub fn next_page(&self) -> Result<()> {
        self.send(Message::NextPage)
    }

    pub fn previous_page(&self) -> Result<()> {
        self.send(Message::PreviousPage)
    }

    pub fn select_page(&self, index: usize) -> Result<()> {
        self.send(Message::SelectPage(index))
    }

    pub fn key_pressed(&self, key: NavKey) -> Result<()> {
        self.send(Message::KeyPressed(key))
    }
}

pub struct ViewerRuntime<S> {
    viewer: Viewer,
    surface: S,
    receiver: mpsc::UnboundedReceiver<Message>,
    accepting: bool,
    // Every timer reports back exactly once; `None` when its transition was cancelled.
    timer_sender: mpsc::UnboundedSender<Option<Message>>,
    timer_receiver: mpsc::UnboundedReceiver<Option<Message>>,
    pending_timers: usize,
    in_flight: Option<TransitionToken>,
    last_view: Option<ViewModel>,
}

impl<S: RenderSurface> ViewerRuntime<S> {
    pub fn new(viewer: Viewer, surface: S) -> (Self, ViewerHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (timer_sender, timer_receiver) = mpsc::unbounded_channel();
        let runtime = Self {
            viewer,
            surface,
            receiver,
            accepting: true,
            timer_sender,
            timer_receiver,
            pending_timers: 0,
            in_flight: None,
            last_view: None,
        };
        (runtime, ViewerHandle { sender })
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Process messages until every handle is dropped and no timer is pending,
    /// then hand the surface back.
    pub async fn run(mut self) -> S {
        self.render();
        loop {
            tokio::select! {
                message = self.receiver.recv(), if self.accepting => match message {
                    Some(message) => self.dispatch(message),
                    None => self.accepting = false,
                },
                Some(completion) = self.timer_receiver.recv(), if self.pending_timers > 0 => {
                    self.pending_timers -= 1;
                    if let Some(message) = completion {
                        self.dispatch(message);
                    }
                }
                else => break,
            }
        }
        debug!("Viewer runtime finished");
        self.surface
    }

    /// Reduce one message, perform its effects and re-render if the view changed.
    pub fn dispatch(&mut self, message: Message) {
        trace!(?message, "Dispatching viewer message");
        let effects = self.viewer.reduce(message);
        for effect in effects {
            self.run_effect(effect);
        }
        self.render();
    }

    fn render(&mut self) {
        let view = self.viewer.view();
        if self.last_view.as_ref() == Some(&view) {
            return;
        }
        self.surface.render(&view);
        self.last_view = Some(view);
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::StartFadeOut { generation, delay } => {
                let token = TransitionToken::new(generation);
                self.in_flight = Some(token.clone());
                self.spawn_timer(delay, token, "fade-out", Message::FadeOutElapsed { generation });
            }
            Effect::ScrollToTop => self.surface.scroll_to_top(),
            Effect::StartFadeIn { generation, delay } => {
                let token = match &self.in_flight {
                    Some(token) if token.generation() == generation => token.clone(),
                    _ => {
                        let token = TransitionToken::new(generation);
                        self.in_flight = Some(token.clone());
                        token
                    }
                };
                self.spawn_timer(delay, token, "fade-in", Message::FadeInElapsed { generation });
            }
            Effect::CancelTransition { generation } => {
                if let Some(token) = self.in_flight.take() {
                    if token.generation() == generation {
                        token.cancel();
                        debug!(generation, "Cancelled in-flight page transition");
                    } else {
                        self.in_flight = Some(token);
                    }
                }
            }
        }
    }

    fn spawn_timer(
        &mut self,
        delay: Duration,
        token: TransitionToken,
        stage: &'static str,
        message: Message,
    ) {
        let sender = self.timer_sender.clone();
        self.pending_timers += 1;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let completion = match token.check_cancelled(stage) {
                Ok(()) => Some(message),
                Err(err) => {
                    debug!("{err}");
                    None
                }
            };
            let _ = sender.send(completion);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerSettings;
    use crate::pagination::Paginator;
    use crate::viewer::ViewerPhase;

    const THREE_PAGES: &str = "<p>A</p><!-- pagebreak --><p>B</p><!-- pagebreak --><p>C</p>";

    #[derive(Default)]
    struct RecordingSurface {
        views: Vec<ViewModel>,
        scrolls: usize,
    }

    impl RenderSurface for RecordingSurface {
        fn render(&mut self, view: &ViewModel) {
            self.views.push(view.clone());
        }

        fn scroll_to_top(&mut self) {
            self.scrolls += 1;
        }
    }

    fn runtime() -> (ViewerRuntime<RecordingSurface>, ViewerHandle) {
        let viewer = Viewer::new(Paginator::default(), ViewerSettings::default());
        ViewerRuntime::new(viewer, RecordingSurface::default())
    }

    #[tokio::test(start_paused = true)]
    async fn completes_a_page_transition() {
        let (runtime, handle) = runtime();
        let task = tokio::spawn(runtime.run());

        handle.set_content(Some(THREE_PAGES.to_string())).unwrap();
        handle.next_page().unwrap();
        // Rejected: the first transition is still fading out.
        handle.next_page().unwrap();
        drop(handle);

        let surface = task.await.unwrap();
        assert_eq!(surface.scrolls, 1);
        let last = surface.views.last().unwrap();
        assert_eq!(last.fragment, "<p>B</p>");
        assert_eq!(last.phase, ViewerPhase::MultiPageIdle);
        assert!(surface.views.iter().any(|view| view.opacity == 0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn content_change_abandons_pending_timers() {
        let (runtime, handle) = runtime();
        let task = tokio::spawn(runtime.run());

        handle.set_content(Some(THREE_PAGES.to_string())).unwrap();
        handle.select_page(2).unwrap();
        handle
            .set_content(Some("<p>X</p><!-- pagebreak --><p>Y</p>".to_string()))
            .unwrap();
        drop(handle);

        let surface = task.await.unwrap();
        assert_eq!(surface.scrolls, 0);
        let last = surface.views.last().unwrap();
        assert_eq!(last.fragment, "<p>X</p>");
        assert_eq!(last.phase, ViewerPhase::MultiPageIdle);
    }

    #[tokio::test(start_paused = true)]
    async fn sequential_navigation_after_each_transition() {
        let (runtime, handle) = runtime();
        let task = tokio::spawn(runtime.run());

        handle.set_content(Some(THREE_PAGES.to_string())).unwrap();
        handle.next_page().unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.next_page().unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.key_pressed(NavKey::Home).unwrap();
        drop(handle);

        let surface = task.await.unwrap();
        assert_eq!(surface.scrolls, 3);
        assert_eq!(surface.views.last().unwrap().fragment, "<p>A</p>");
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_renders_only_when_the_view_changes() {
        let (mut runtime, _handle) = runtime();
        runtime.dispatch(Message::ContentChanged(Some(THREE_PAGES.to_string())));
        assert_eq!(runtime.viewer().phase(), ViewerPhase::MultiPageIdle);
        assert_eq!(runtime.surface().views.len(), 1);

        // Already on the first page: no transition and no new frame.
        runtime.dispatch(Message::SelectPage(0));
        assert_eq!(runtime.surface().views.len(), 1);

        runtime.dispatch(Message::NextPage);
        assert_eq!(runtime.viewer().phase(), ViewerPhase::MultiPageTransitioning);
        assert_eq!(runtime.viewer().state().current_page_index, 0);
        assert_eq!(runtime.surface().views.len(), 2);
        assert_eq!(runtime.surface().views[1].opacity, 0.0);
    }

    #[test]
    fn send_fails_once_runtime_is_gone() {
        let (runtime, handle) = runtime();
        drop(runtime);
        assert!(handle.next_page().is_err());
    }
}
