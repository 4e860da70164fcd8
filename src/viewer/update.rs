use super::messages::{Message, NavKey};
use super::state::{PaginationState, Transition, TransitionStage, Viewer};
use std::time::Duration;
use tracing::{debug, info};

/// Describes work that must be performed outside the pure reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Wait for the outgoing page to fade, then post `FadeOutElapsed`.
    StartFadeOut { generation: u64, delay: Duration },
    ScrollToTop,
    /// Wait for the incoming page to fade in, then post `FadeInElapsed`.
    StartFadeIn { generation: u64, delay: Duration },
    /// Abandon the timers of a transition superseded by new content.
    CancelTransition { generation: u64 },
}

impl Viewer {
    pub fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::ContentChanged(content) => self.handle_content_changed(content, &mut effects),
            Message::NextPage => self.handle_next_page(&mut effects),
            Message::PreviousPage => self.handle_previous_page(&mut effects),
            Message::SelectPage(index) => self.select_page(index, &mut effects),
            Message::FadeOutElapsed { generation } => {
                self.handle_fade_out_elapsed(generation, &mut effects)
            }
            Message::FadeInElapsed { generation } => self.handle_fade_in_elapsed(generation),
            Message::KeyPressed(key) => self.handle_key_pressed(key, &mut effects),
        }

        effects
    }

    fn handle_content_changed(&mut self, content: Option<String>, effects: &mut Vec<Effect>) {
        if let Some(transition) = self.transition.take() {
            effects.push(Effect::CancelTransition {
                generation: transition.generation,
            });
        }
        self.generation = self.generation.wrapping_add(1);

        let content = content.filter(|content| !content.is_empty());
        self.has_content = content.is_some();
        let pages = match content.as_deref() {
            Some(content) => self.paginator.paginate(Some(content)),
            None => Vec::new(),
        };
        self.state = PaginationState {
            pages,
            current_page_index: 0,
            is_transitioning: false,
        };
        info!(pages = self.state.page_count(), "Loaded content into viewer");
    }

    fn handle_next_page(&mut self, effects: &mut Vec<Effect>) {
        if self.can_go_next() {
            self.select_page(self.state.current_page_index + 1, effects);
        }
    }

    fn handle_previous_page(&mut self, effects: &mut Vec<Effect>) {
        if self.can_go_previous() {
            self.select_page(self.state.current_page_index - 1, effects);
        }
    }

    fn handle_key_pressed(&mut self, key: NavKey, effects: &mut Vec<Effect>) {
        if !self.settings.keyboard_navigation || self.state.pages.len() < 2 {
            return;
        }
        match key {
            NavKey::Left => self.handle_previous_page(effects),
            NavKey::Right => self.handle_next_page(effects),
            NavKey::Home => self.select_page(0, effects),
            NavKey::End => self.select_page(self.state.pages.len() - 1, effects),
        }
    }

    fn select_page(&mut self, target: usize, effects: &mut Vec<Effect>) {
        if self.transition.is_some() {
            debug!(page = target + 1, "Ignoring page change while a transition is in flight");
            return;
        }
        if target == self.state.current_page_index || target >= self.state.pages.len() {
            return;
        }

        self.generation = self.generation.wrapping_add(1);
        self.transition = Some(Transition {
            target,
            stage: TransitionStage::FadingOut,
            generation: self.generation,
        });
        self.state.is_transitioning = true;
        debug!(
            from = self.state.current_page_index + 1,
            to = target + 1,
            "Starting page transition"
        );
        effects.push(Effect::StartFadeOut {
            generation: self.generation,
            delay: self.settings.fade_out(),
        });
    }

    fn handle_fade_out_elapsed(&mut self, generation: u64, effects: &mut Vec<Effect>) {
        let Some(transition) = self.transition.as_mut() else {
            return;
        };
        if transition.generation != generation || transition.stage != TransitionStage::FadingOut {
            debug!(generation, "Dropping stale fade-out completion");
            return;
        }

        transition.stage = TransitionStage::FadingIn;
        self.state.current_page_index = transition.target;
        info!(page = self.state.current_page_index + 1, "Navigated to page");
        effects.push(Effect::ScrollToTop);
        effects.push(Effect::StartFadeIn {
            generation,
            delay: self.settings.fade_in(),
        });
    }

    fn handle_fade_in_elapsed(&mut self, generation: u64) {
        match self.transition {
            Some(transition)
                if transition.generation == generation
                    && transition.stage == TransitionStage::FadingIn =>
            {
                self.transition = None;
                self.state.is_transitioning = false;
            }
            _ => debug!(generation, "Dropping stale fade-in completion"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerSettings;
    use crate::pagination::Paginator;
    use crate::viewer::ViewerPhase;

    const THREE_PAGES: &str = "<p>A</p><!-- pagebreak --><p>B</p><!-- pagebreak --><p>C</p>";

    fn viewer_with(content: &str) -> Viewer {
        let mut viewer = Viewer::new(Paginator::default(), ViewerSettings::default());
        viewer.reduce(Message::ContentChanged(Some(content.to_string())));
        viewer
    }

    fn fade_out_generation(effects: &[Effect]) -> u64 {
        match effects {
            [Effect::StartFadeOut { generation, .. }] => *generation,
            other => panic!("expected a single fade-out, got {other:?}"),
        }
    }

    /// Drive a page change through both timers.
    fn complete(viewer: &mut Viewer, effects: Vec<Effect>) {
        let generation = fade_out_generation(&effects);
        let effects = viewer.reduce(Message::FadeOutElapsed { generation });
        assert_eq!(effects[0], Effect::ScrollToTop);
        viewer.reduce(Message::FadeInElapsed { generation });
    }

    #[test]
    fn loads_pages_and_starts_at_first() {
        let viewer = viewer_with(THREE_PAGES);
        assert_eq!(viewer.state().pages, vec!["<p>A</p>", "<p>B</p>", "<p>C</p>"]);
        assert_eq!(viewer.state().current_page_index, 0);
        assert_eq!(viewer.phase(), ViewerPhase::MultiPageIdle);
    }

    #[test]
    fn phases_for_absent_and_single_page_content() {
        let mut viewer = Viewer::new(Paginator::default(), ViewerSettings::default());
        assert_eq!(viewer.phase(), ViewerPhase::NoContent);
        viewer.reduce(Message::ContentChanged(Some(String::new())));
        assert_eq!(viewer.phase(), ViewerPhase::NoContent);
        viewer.reduce(Message::ContentChanged(Some("<p>only</p>".to_string())));
        assert_eq!(viewer.phase(), ViewerPhase::SinglePage);
    }

    #[test]
    fn previous_on_first_page_is_a_no_op() {
        let mut viewer = viewer_with(THREE_PAGES);
        let before = viewer.state().clone();
        assert!(viewer.reduce(Message::PreviousPage).is_empty());
        assert_eq!(viewer.state(), &before);
        assert!(viewer.transition().is_none());
    }

    #[test]
    fn next_page_commits_after_fade_out() {
        let mut viewer = viewer_with(THREE_PAGES);
        let effects = viewer.reduce(Message::NextPage);
        let generation = fade_out_generation(&effects);
        assert_eq!(viewer.phase(), ViewerPhase::MultiPageTransitioning);
        assert!(viewer.state().is_transitioning);
        assert_eq!(viewer.state().current_page_index, 0);

        let effects = viewer.reduce(Message::FadeOutElapsed { generation });
        assert_eq!(viewer.state().current_page_index, 1);
        assert_eq!(
            effects,
            vec![
                Effect::ScrollToTop,
                Effect::StartFadeIn {
                    generation,
                    delay: ViewerSettings::default().fade_in()
                }
            ]
        );
        assert!(viewer.state().is_transitioning);

        assert!(viewer.reduce(Message::FadeInElapsed { generation }).is_empty());
        assert!(!viewer.state().is_transitioning);
        assert_eq!(viewer.phase(), ViewerPhase::MultiPageIdle);
    }

    #[test]
    fn navigation_is_rejected_while_transitioning() {
        let mut viewer = viewer_with(THREE_PAGES);
        let effects = viewer.reduce(Message::SelectPage(2));
        assert!(viewer.reduce(Message::SelectPage(1)).is_empty());
        assert!(viewer.reduce(Message::NextPage).is_empty());
        complete(&mut viewer, effects);
        assert_eq!(viewer.state().current_page_index, 2);
    }

    #[test]
    fn rejects_out_of_bounds_and_same_page() {
        let mut viewer = viewer_with(THREE_PAGES);
        assert!(viewer.reduce(Message::SelectPage(3)).is_empty());
        assert!(viewer.reduce(Message::SelectPage(0)).is_empty());
        assert!(viewer.transition().is_none());
    }

    #[test]
    fn next_on_last_page_is_a_no_op() {
        let mut viewer = viewer_with(THREE_PAGES);
        let effects = viewer.reduce(Message::SelectPage(2));
        complete(&mut viewer, effects);
        assert!(viewer.reduce(Message::NextPage).is_empty());
        assert_eq!(viewer.state().current_page_index, 2);
    }

    #[test]
    fn index_stays_in_bounds_over_mixed_navigation() {
        let mut viewer = viewer_with(THREE_PAGES);
        let script = [
            Message::PreviousPage,
            Message::NextPage,
            Message::NextPage,
            Message::NextPage,
            Message::SelectPage(7),
            Message::PreviousPage,
            Message::KeyPressed(NavKey::End),
            Message::KeyPressed(NavKey::Right),
            Message::KeyPressed(NavKey::Home),
            Message::KeyPressed(NavKey::Left),
        ];
        for message in script {
            let effects = viewer.reduce(message);
            if !effects.is_empty() {
                complete(&mut viewer, effects);
            }
            assert!(viewer.state().current_page_index < viewer.state().pages.len());
        }
        assert_eq!(viewer.state().current_page_index, 0);
    }

    #[test]
    fn content_change_resets_and_cancels_transition() {
        let mut viewer = viewer_with(THREE_PAGES);
        let effects = viewer.reduce(Message::NextPage);
        let stale = fade_out_generation(&effects);

        let effects = viewer.reduce(Message::ContentChanged(Some("<p>X</p><!-- pagebreak --><p>Y</p>".to_string())));
        assert_eq!(effects, vec![Effect::CancelTransition { generation: stale }]);
        assert_eq!(viewer.state().current_page_index, 0);
        assert!(!viewer.state().is_transitioning);
        assert_eq!(viewer.phase(), ViewerPhase::MultiPageIdle);

        assert!(viewer.reduce(Message::FadeOutElapsed { generation: stale }).is_empty());
        assert_eq!(viewer.state().current_page_index, 0);
    }

    #[test]
    fn content_change_resets_index_after_navigation() {
        let mut viewer = viewer_with(THREE_PAGES);
        let effects = viewer.reduce(Message::SelectPage(2));
        complete(&mut viewer, effects);
        viewer.reduce(Message::ContentChanged(Some(THREE_PAGES.to_string())));
        assert_eq!(viewer.state().current_page_index, 0);
    }

    #[test]
    fn keyboard_navigation_can_be_disabled() {
        let settings = ViewerSettings {
            keyboard_navigation: false,
            ..ViewerSettings::default()
        };
        let mut viewer = Viewer::new(Paginator::default(), settings);
        viewer.reduce(Message::ContentChanged(Some(THREE_PAGES.to_string())));
        assert!(!viewer.settings().keyboard_navigation);
        assert!(viewer.reduce(Message::KeyPressed(NavKey::Right)).is_empty());
        assert!(!viewer.reduce(Message::NextPage).is_empty());
    }
}
