use crate::config::ViewerSettings;
use crate::pagination::Paginator;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Pages of the current content and the navigation position within them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    pub pages: Vec<String>,
    pub current_page_index: usize,
    pub is_transitioning: bool,
}

impl PaginationState {
    pub fn current_page(&self) -> Option<&str> {
        self.pages.get(self.current_page_index).map(String::as_str)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum ViewerPhase {
    NoContent,
    SinglePage,
    MultiPageIdle,
    MultiPageTransitioning,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum TransitionStage {
    FadingOut,
    FadingIn,
}

/// A page change in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub target: usize,
    pub stage: TransitionStage,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct Viewer {
    pub(super) paginator: Paginator,
    pub(super) settings: ViewerSettings,
    pub(super) has_content: bool,
    pub(super) state: PaginationState,
    pub(super) transition: Option<Transition>,
    /// Bumped on every transition start and content change; timer completions
    /// carrying an older value are ignored.
    pub(super) generation: u64,
}

impl Viewer {
    pub fn new(paginator: Paginator, settings: ViewerSettings) -> Self {
        Self {
            paginator,
            settings,
            has_content: false,
            state: PaginationState::default(),
            transition: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    pub fn transition(&self) -> Option<Transition> {
        self.transition
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> ViewerPhase {
        if !self.has_content || self.state.pages.is_empty() {
            ViewerPhase::NoContent
        } else if self.state.pages.len() == 1 {
            ViewerPhase::SinglePage
        } else if self.transition.is_some() {
            ViewerPhase::MultiPageTransitioning
        } else {
            ViewerPhase::MultiPageIdle
        }
    }

    pub fn can_go_previous(&self) -> bool {
        self.state.current_page_index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.state.current_page_index + 1 < self.state.pages.len()
    }
}
