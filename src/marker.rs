//! The canonical pagebreak marker and the legacy encodings rewritten into it.
//!
//! Matching is regex based and best effort: unmatched or malformed tags are
//! left untouched, and every function here is total over its input.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// The only in-band page boundary after normalization.
pub const PAGEBREAK_MARKER: &str = "<!-- pagebreak -->";

static RE_HR_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<hr[^>]*class=["'][^"']*mce-pagebreak[^"']*["'][^>]*>"#).unwrap()
});
static RE_HR_DATA_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<hr[^>]*data-mce-pagebreak[^>]*>").unwrap());
static RE_IMG_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<img[^>]*class=["'][^"']*mce-pagebreak[^"']*["'][^>]*>"#).unwrap()
});
static RE_DIV_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<div[^>]*class=["'][^"']*mce-pagebreak[^"']*["'][^>]*>.*?</div>"#).unwrap()
});
static RE_DIV_DATA_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<div[^>]*data-mce-pagebreak[^>]*>.*?</div>").unwrap());
// The old editor emitted the div and, sometimes, a trailing marker right after it.
static RE_CUSTOM_DIV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<div[^>]*class=["'][^"']*custom-pagebreak[^"']*["'][^>]*>.*?</div>(?:\s*<!-- pagebreak -->)?"#,
    )
    .unwrap()
});
static RE_DUPLICATE_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!-- pagebreak -->(?:\s*<!-- pagebreak -->)+").unwrap());

/// A historical HTML encoding of a page boundary.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum LegacyForm {
    /// `<hr class="mce-pagebreak">`
    HrClass,
    /// `<hr data-mce-pagebreak>`
    HrDataAttribute,
    /// Placeholder image emitted by the editor's pagebreak plugin.
    ImgClass,
    /// `<div class="mce-pagebreak">...</div>`
    DivClass,
    /// `<div data-mce-pagebreak>...</div>`
    DivDataAttribute,
    /// `<div class="custom-pagebreak">...</div>` with an optional trailing marker.
    CustomDiv,
}

impl LegacyForm {
    /// Every form, most specific first. Rewrites must run in this order.
    pub const ALL: [LegacyForm; 6] = [
        LegacyForm::HrClass,
        LegacyForm::HrDataAttribute,
        LegacyForm::ImgClass,
        LegacyForm::DivClass,
        LegacyForm::DivDataAttribute,
        LegacyForm::CustomDiv,
    ];

    fn pattern(self) -> &'static Regex {
        match self {
            LegacyForm::HrClass => &*RE_HR_CLASS,
            LegacyForm::HrDataAttribute => &*RE_HR_DATA_ATTRIBUTE,
            LegacyForm::ImgClass => &*RE_IMG_CLASS,
            LegacyForm::DivClass => &*RE_DIV_CLASS,
            LegacyForm::DivDataAttribute => &*RE_DIV_DATA_ATTRIBUTE,
            LegacyForm::CustomDiv => &*RE_CUSTOM_DIV,
        }
    }
}

impl std::fmt::Display for LegacyForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LegacyForm::HrClass => "hr-class",
            LegacyForm::HrDataAttribute => "hr-data-attribute",
            LegacyForm::ImgClass => "img-class",
            LegacyForm::DivClass => "div-class",
            LegacyForm::DivDataAttribute => "div-data-attribute",
            LegacyForm::CustomDiv => "custom-div",
        };
        write!(f, "{}", label)
    }
}

/// Rewrite every enabled legacy form into the canonical marker.
///
/// Forms run in [`LegacyForm::ALL`] order regardless of the order of `enabled`,
/// so that nested legacy constructs resolve the same way every time. Passes
/// repeat until nothing matches: an outer form can only match once an inner
/// one has been replaced. Every match is longer than the marker, so each pass
/// that rewrites shortens the text and the loop terminates.
pub fn rewrite_legacy<'a>(input: &'a str, enabled: &[LegacyForm]) -> Cow<'a, str> {
    let mut text = Cow::Borrowed(input);
    while let Some(rewritten) = rewrite_pass(&text, enabled) {
        text = Cow::Owned(rewritten);
    }
    text
}

/// One ordered pass over the enabled forms; `None` when nothing matched.
fn rewrite_pass(input: &str, enabled: &[LegacyForm]) -> Option<String> {
    let mut text: Option<String> = None;
    for form in LegacyForm::ALL {
        if !enabled.contains(&form) {
            continue;
        }
        let current = text.as_deref().unwrap_or(input);
        let pattern = form.pattern();
        if !pattern.is_match(current) {
            continue;
        }
        let replaced = pattern.replace_all(current, PAGEBREAK_MARKER).into_owned();
        tracing::trace!(form = %form, "Rewrote legacy pagebreak");
        text = Some(replaced);
    }
    text
}

/// Collapse runs of markers separated only by whitespace into one marker.
pub fn collapse_duplicates(input: &str) -> Cow<'_, str> {
    RE_DUPLICATE_MARKERS.replace_all(input, PAGEBREAK_MARKER)
}

pub fn count_markers(input: &str) -> usize {
    input.matches(PAGEBREAK_MARKER).count()
}
