//! Reduction engine: runs the ordered rule set to a fixed point.
//!
//! One pass applies the rules in this order:
//! 1. tag removal (`script`, `style`, `meta`, `link`)
//! 2. comment removal
//! 3. SVG content pruning
//! 4. attribute filtering and sanitized-URL compaction
//! 5. hidden-element removal
//! 6. known non-visible component removal
//! 7. redundant wrapper collapsing
//!
//! Passes repeat until one changes nothing, capped at [`MAX_REDUCTION_PASSES`].
//! With the current rules the second pass is always a confirmation pass, but
//! the loop keeps the result independent of rule interactions added later.

use serde::Serialize;

use super::document::Document;
use super::parsing::parse_html;
use super::patterns::ReductionPatterns;
use super::rules;
use super::serialization::serialize_document;

/// Upper bound on full rule passes per document
pub const MAX_REDUCTION_PASSES: usize = 8;

/// Upper bound on wrapper-collapse sweeps within one pass
pub const MAX_COLLAPSE_ITERATIONS: usize = 64;

/// Per-rule change counters accumulated over all passes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReductionStats {
    pub passes: usize,
    pub removed_tags: usize,
    pub removed_comments: usize,
    pub pruned_svg_nodes: usize,
    pub removed_attributes: usize,
    pub compacted_urls: usize,
    pub removed_hidden: usize,
    pub removed_non_visible: usize,
    pub collapsed_wrappers: usize,
}

impl ReductionStats {
    /// Total number of changes, excluding the pass counter
    #[must_use]
    pub fn total_changes(&self) -> usize {
        self.removed_tags
            + self.removed_comments
            + self.pruned_svg_nodes
            + self.removed_attributes
            + self.compacted_urls
            + self.removed_hidden
            + self.removed_non_visible
            + self.collapsed_wrappers
    }

    fn absorb(&mut self, other: &ReductionStats) {
        self.removed_tags += other.removed_tags;
        self.removed_comments += other.removed_comments;
        self.pruned_svg_nodes += other.pruned_svg_nodes;
        self.removed_attributes += other.removed_attributes;
        self.compacted_urls += other.compacted_urls;
        self.removed_hidden += other.removed_hidden;
        self.removed_non_visible += other.removed_non_visible;
        self.collapsed_wrappers += other.collapsed_wrappers;
    }
}

/// Serialized skeleton plus size metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReductionResult {
    pub reduced_html: String,
    /// Length of the parsed, unreduced document as serialized by the same serializer
    pub original_bytes: usize,
    pub reduced_bytes: usize,
    pub stats: ReductionStats,
}

impl ReductionResult {
    #[must_use]
    pub fn bytes_saved(&self) -> usize {
        self.original_bytes.saturating_sub(self.reduced_bytes)
    }

    /// Share of the original removed, in percent (0 for empty input)
    #[must_use]
    pub fn reduction_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        self.bytes_saved() as f64 / self.original_bytes as f64 * 100.0
    }

    /// Rough token saving using the usual four-bytes-per-token estimate
    #[must_use]
    pub fn estimated_tokens_saved(&self) -> usize {
        self.bytes_saved() / 4
    }
}

/// Applies the reduction rules with a given pattern set
#[derive(Debug, Clone, Copy)]
pub struct ReductionEngine<'p> {
    patterns: &'p ReductionPatterns,
    max_passes: usize,
    max_collapse_iterations: usize,
}

impl Default for ReductionEngine<'static> {
    fn default() -> Self {
        Self::new(ReductionPatterns::builtin())
    }
}

impl<'p> ReductionEngine<'p> {
    #[must_use]
    pub fn new(patterns: &'p ReductionPatterns) -> Self {
        Self {
            patterns,
            max_passes: MAX_REDUCTION_PASSES,
            max_collapse_iterations: MAX_COLLAPSE_ITERATIONS,
        }
    }

    /// Override the pass and collapse caps (each at least 1)
    #[must_use]
    pub fn with_limits(mut self, max_passes: usize, max_collapse_iterations: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self.max_collapse_iterations = max_collapse_iterations.max(1);
        self
    }

    /// Parse, reduce and serialize `raw_html`.
    ///
    /// Never fails: malformed markup is repaired by the parser and anything
    /// the rules do not recognise is left in place.
    #[must_use]
    pub fn reduce(&self, raw_html: &str) -> ReductionResult {
        let mut doc = parse_html(raw_html);
        let original_bytes = serialize_document(&doc).len();

        let stats = self.reduce_document(&mut doc);

        let reduced_html = serialize_document(&doc);
        let reduced_bytes = reduced_html.len();

        ReductionResult {
            reduced_html,
            original_bytes,
            reduced_bytes,
            stats,
        }
    }

    /// Reduce a parsed document in place
    pub fn reduce_document(&self, doc: &mut Document) -> ReductionStats {
        let mut stats = ReductionStats::default();

        while stats.passes < self.max_passes {
            let pass = self.run_pass(doc);
            stats.passes += 1;
            stats.absorb(&pass);

            if pass.total_changes() == 0 {
                return stats;
            }
        }

        log::debug!(
            "HTML reduction hit the pass cap ({}) with changes still pending",
            self.max_passes
        );
        stats
    }

    fn run_pass(&self, doc: &mut Document) -> ReductionStats {
        let removed_tags = rules::remove_tags(doc, self.patterns);
        let removed_comments = rules::remove_comments(doc);
        let pruned_svg_nodes = rules::prune_svg_contents(doc);
        let attributes = rules::filter_attributes(doc, self.patterns);
        let removed_hidden = rules::remove_hidden(doc);
        let removed_non_visible = rules::remove_non_visible(doc, self.patterns);
        let collapsed_wrappers = rules::collapse_empty_wrappers(doc, self.max_collapse_iterations);

        ReductionStats {
            passes: 0,
            removed_tags,
            removed_comments,
            pruned_svg_nodes,
            removed_attributes: attributes.removed,
            compacted_urls: attributes.compacted_urls,
            removed_hidden,
            removed_non_visible,
            collapsed_wrappers,
        }
    }
}
