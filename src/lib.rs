//! Pagebreak normalization and paginated content viewing.
//!
//! Content bodies are HTML strings that use `<!-- pagebreak -->` as their page
//! boundary. [`normalizer`] rewrites legacy encodings at save time,
//! [`pagination`] splits bodies into pages at display time, and [`viewer`]
//! owns navigation state for one rendered body.

pub mod cache;
pub mod cancellation;
pub mod config;
pub mod marker;
pub mod normalizer;
pub mod pagination;
pub mod runtime;
pub mod viewer;

pub use marker::PAGEBREAK_MARKER;
pub use normalizer::{ContentNormalizer, NormalizedBody, PageCountMetadata};
pub use pagination::{Paginator, split_pages};
