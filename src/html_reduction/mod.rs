//! HTML reduction: turns page markup into a compact skeleton for CSS authoring.
//!
//! The pipeline is parse → reduce → serialize:
//! - [`parsing`] builds a [`Document`] from arbitrary (possibly malformed) HTML
//! - [`engine`] applies the ordered [`rules`] until a fixed point
//! - [`serialization`] renders the result back to HTML
//!
//! Removal targets are described by [`ReductionPatterns`], which ships as an
//! embedded JSON table and can be replaced at start-up.

pub mod document;
pub mod engine;
pub mod parsing;
pub mod patterns;
pub mod rules;
pub mod serialization;

pub use document::{Doctype, Document, Element, Namespace, Node};
pub use engine::{
    MAX_COLLAPSE_ITERATIONS, MAX_REDUCTION_PASSES, ReductionEngine, ReductionResult,
    ReductionStats,
};
pub use parsing::parse_html;
pub use patterns::{NonVisiblePatterns, ReductionPatterns};
pub use serialization::serialize_document;

/// Reduce `raw_html` with the built-in pattern set.
///
/// # Example
/// ```
/// use kodegen_tools_restyle::html_reduction::reduce_html;
///
/// let result = reduce_html(r#"<div><script>track()</script><p class="lead">Hi</p></div>"#);
/// assert_eq!(result.reduced_html, r#"<div><p class="lead">Hi</p></div>"#);
/// assert!(result.reduced_bytes < result.original_bytes);
/// ```
#[must_use]
pub fn reduce_html(raw_html: &str) -> ReductionResult {
    ReductionEngine::default().reduce(raw_html)
}
