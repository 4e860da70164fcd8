use super::state::{TransitionStage, Viewer, ViewerPhase};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use ts_rs::TS;

const NO_CONTENT_PLACEHOLDER: &str = "No content available";

/// What the rendering surface should show right now.
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export)]
pub struct ViewModel {
    pub phase: ViewerPhase,
    /// HTML of the current page. Not sanitized.
    pub fragment: String,
    pub placeholder: Option<String>,
    pub opacity: f32,
    pub stage: Option<TransitionStage>,
    pub controls: Option<PaginationControls>,
}

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export)]
pub struct PaginationControls {
    pub page_label: String,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    /// Controls stay visible but inert during a transition.
    pub dimmed: bool,
    pub indicators: Vec<PageIndicator>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[ts(export)]
pub struct PageIndicator {
    pub index: usize,
    pub active: bool,
    pub title: String,
}

impl Viewer {
    pub fn view(&self) -> ViewModel {
        let phase = self.phase();
        let stage = self.transition.map(|transition| transition.stage);

        if phase == ViewerPhase::NoContent {
            return ViewModel {
                phase,
                fragment: String::new(),
                placeholder: Some(NO_CONTENT_PLACEHOLDER.to_string()),
                opacity: 1.0,
                stage: None,
                controls: None,
            };
        }

        let opacity = match stage {
            Some(TransitionStage::FadingOut) => 0.0,
            _ => 1.0,
        };
        let controls = (self.settings.show_pagination && self.state.page_count() > 1)
            .then(|| self.controls());

        ViewModel {
            phase,
            fragment: self.state.current_page().unwrap_or_default().to_string(),
            placeholder: None,
            opacity,
            stage,
            controls,
        }
    }

    fn controls(&self) -> PaginationControls {
        let busy = self.transition.is_some();
        let current = self.state.current_page_index;
        let total = self.state.page_count();
        PaginationControls {
            page_label: format!("Page {} of {}", current + 1, total),
            can_go_previous: !busy && self.can_go_previous(),
            can_go_next: !busy && self.can_go_next(),
            dimmed: busy,
            indicators: (0..total)
                .map(|index| PageIndicator {
                    index,
                    active: index == current,
                    title: format!("Go to page {}", index + 1),
                })
                .collect(),
        }
    }
}

fn export_single_type<T: TS + 'static>(out_dir: &Path) -> Result<()> {
    T::export_all_to(out_dir).with_context(|| format!("failed to export {}", T::name()))
}

/// Write TypeScript declarations for the view model into `out_dir`,
/// replacing any previously generated `.ts` files.
pub fn export_ts_bindings(out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    for entry in fs::read_dir(out_dir)
        .with_context(|| format!("failed to list {}", out_dir.display()))?
    {
        let path = entry.context("failed to read directory entry")?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("ts") {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
        }
    }

    export_single_type::<ViewerPhase>(out_dir)?;
    export_single_type::<TransitionStage>(out_dir)?;
    export_single_type::<PageIndicator>(out_dir)?;
    export_single_type::<PaginationControls>(out_dir)?;
    export_single_type::<ViewModel>(out_dir)?;
    Ok(())
}
