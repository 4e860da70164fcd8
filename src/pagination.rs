//! Read-time pagination.
//!
//! Stored bodies are split on the canonical marker. The display side cannot
//! assume every write path normalized the body, so the legacy rewrites run
//! again before splitting.

use crate::marker::PAGEBREAK_MARKER;
use crate::normalizer::ContentNormalizer;

#[derive(Debug, Clone, Default)]
pub struct Paginator {
    normalizer: ContentNormalizer,
}

impl Paginator {
    pub fn new(normalizer: ContentNormalizer) -> Self {
        Self { normalizer }
    }

    /// Split content into display pages. Always returns at least one page.
    ///
    /// Pages are trimmed and empty ones dropped; if nothing survives, the
    /// original content is returned whole.
    pub fn paginate(&self, content: Option<&str>) -> Vec<String> {
        let Some(content) = content else {
            return vec![String::new()];
        };

        let normalized = self.normalizer.normalize_markup(content);
        let pages: Vec<String> = normalized
            .split(PAGEBREAK_MARKER)
            .map(str::trim)
            .filter(|page| !page.is_empty())
            .map(str::to_string)
            .collect();

        if pages.is_empty() {
            tracing::debug!(len = content.len(), "No non-empty pages; using content as one page");
            return vec![content.to_string()];
        }

        tracing::debug!(pages = pages.len(), "Split content into pages");
        pages
    }
}

/// Split content with every legacy form enabled.
pub fn split_pages(content: Option<&str>) -> Vec<String> {
    Paginator::default().paginate(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_canonical_marker() {
        assert_eq!(
            split_pages(Some("<p>A</p><!-- pagebreak --><p>B</p>")),
            vec!["<p>A</p>", "<p>B</p>"]
        );
    }

    #[test]
    fn three_markers_give_four_pages() {
        let pages = split_pages(Some(
            "<p>1</p><!-- pagebreak --><p>2</p><!-- pagebreak --><p>3</p><!-- pagebreak --><p>4</p>",
        ));
        assert_eq!(pages.len(), 4);
        assert_eq!(pages[3], "<p>4</p>");
    }

    #[test]
    fn legacy_markup_is_split_defensively() {
        assert_eq!(
            split_pages(Some(
                "<p>A</p>\n<div class=\"custom-pagebreak\"><span>Page Break</span></div>\n<p>B</p>\n<hr class=\"mce-pagebreak\" />\n<p>C</p>"
            )),
            vec!["<p>A</p>", "<p>B</p>", "<p>C</p>"]
        );
    }

    #[test]
    fn drops_empty_pages() {
        assert_eq!(
            split_pages(Some("<!-- pagebreak -->\n<p>A</p><!-- pagebreak -->  \n<!-- pagebreak --><p>B</p>\n<!-- pagebreak -->")),
            vec!["<p>A</p>", "<p>B</p>"]
        );
    }

    #[test]
    fn empty_input_yields_single_empty_page() {
        assert_eq!(split_pages(Some("")), vec![String::new()]);
        assert_eq!(split_pages(None), vec![String::new()]);
    }

    #[test]
    fn markers_only_fall_back_to_original_content() {
        let input = " <!-- pagebreak --> ";
        assert_eq!(split_pages(Some(input)), vec![input.to_string()]);
    }

    #[test]
    fn whitespace_only_input_is_kept_as_is() {
        assert_eq!(split_pages(Some("  \n ")), vec!["  \n ".to_string()]);
    }

    #[test]
    fn pages_are_never_blank_for_real_content() {
        let inputs = [
            "<p>x</p>",
            "<p>x</p><!-- pagebreak -->",
            "<hr data-mce-pagebreak><p>x</p><hr data-mce-pagebreak>",
            "a <!-- pagebreak --> b <!-- pagebreak --> c",
        ];
        for input in inputs {
            let pages = split_pages(Some(input));
            assert!(!pages.is_empty());
            assert!(pages.iter().all(|page| !page.trim().is_empty()), "input: {input}");
        }
    }

    #[test]
    fn split_is_deterministic() {
        let input = "<p>A</p><!-- pagebreak --><p>B</p><hr class='mce-pagebreak'><p>C</p>";
        assert_eq!(split_pages(Some(input)), split_pages(Some(input)));
    }
}
