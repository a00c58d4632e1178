//! Client text scanner.
//!
//! Finds Bible references in document text and wraps them in
//! annotation spans. The scanner shares its book vocabulary with the
//! `ReferenceParser`, so anything it links is something `get_passage`
//! will resolve.
//!
//! # Scheduling
//!
//! The scanner is single-threaded and cooperative. `scan` processes a
//! subtree to completion. Nodes reported through `on_nodes_added` are
//! debounced, then processed by `tick` in chunks: each call to `tick`
//! is one frame and stops at the first yield point once the
//! [`YieldPolicy`] says the frame is spent. Nodes that were detached
//! from the document before their turn are skipped.
//!
//! - `dom`: arena document model
//! - `selector`: exclusion selectors
//! - `annotate`: match finding and span insertion
//! - `schedule`: clock, yield policies, debouncer and work queue
//! - `popup`: last-request-wins passage loading

pub mod annotate;
pub mod dom;
pub mod popup;
pub mod schedule;
pub mod selector;

pub use annotate::{annotate_text_node, find_matches, ScannerMatch, MARKER_ATTR, REFERENCE_CLASS};
pub use dom::{Document, NodeId};
pub use popup::{PassageSource, PopupLoader, PopupOutcome, ServicePassageSource};
pub use schedule::{
    Clock, Debouncer, FrameBudget, ManualClock, SystemClock, WorkQueue, YieldAfterChunks,
    YieldPolicy,
};
pub use selector::{parse_selectors, Selector};

use crate::core::config::ScannerConfig;
use crate::core::grammar::BookVocabulary;
use crate::core::reference::ReferenceParser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Result of a scan or of one frame of work
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanReport {
    pub matches: Vec<ScannerMatch>,
    /// Text nodes examined
    pub nodes_scanned: usize,
    /// Frames the work would take under the yield policy
    pub frames: usize,
}

impl ScanReport {
    fn absorb(&mut self, other: ScanReport) {
        self.matches.extend(other.matches);
        self.nodes_scanned += other.nodes_scanned;
        self.frames += other.frames;
    }
}

/// What a call to `tick` did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Nothing queued
    Idle,
    /// Added nodes are waiting for the debounce window to close
    Waiting,
    /// The frame budget ran out with work remaining
    Yielded(ScanReport),
    /// The queue was drained in this frame
    Finished(ScanReport),
}

/// Partial configuration update, unset fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScannerConfigPatch {
    pub enabled: Option<bool>,
    pub default_version: Option<String>,
    pub language: Option<String>,
    pub exclude_selectors: Option<Vec<String>>,
    pub chunk_size: Option<usize>,
    pub frame_budget_ms: Option<u64>,
    pub debounce_ms: Option<u64>,
    pub link_whole_chapters: Option<bool>,
}

/// Annotates references in a `Document`
pub struct ReferenceScanner {
    parser: Arc<ReferenceParser>,
    config: ScannerConfig,
    vocabulary: Option<Arc<BookVocabulary>>,
    exclusions: Vec<Selector>,
    clock: Arc<dyn Clock>,
    yield_policy: Box<dyn YieldPolicy>,
    custom_policy: bool,
    debouncer: Debouncer,
    added: WorkQueue<NodeId>,
    work: WorkQueue<NodeId>,
}

impl ReferenceScanner {
    pub fn new(parser: Arc<ReferenceParser>, config: ScannerConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
        let mut scanner = Self {
            parser,
            yield_policy: Box::new(FrameBudget::new(
                Arc::clone(&clock),
                Duration::from_millis(config.frame_budget_ms),
            )),
            custom_policy: false,
            debouncer: Debouncer::new(Duration::from_millis(config.debounce_ms)),
            clock,
            config,
            vocabulary: None,
            exclusions: Vec::new(),
            added: WorkQueue::new(),
            work: WorkQueue::new(),
        };
        scanner.compile();
        scanner
    }

    /// Replace the time source (the default frame budget follows it)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        if !self.custom_policy {
            self.reset_frame_budget();
        }
        self
    }

    /// Replace the "yield now?" predicate
    pub fn with_yield_policy(mut self, policy: Box<dyn YieldPolicy>) -> Self {
        self.yield_policy = policy;
        self.custom_policy = true;
        self
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Turn scanning on or off; disabling drops queued work
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        if !enabled {
            self.added.clear();
            self.work.clear();
            self.debouncer = Debouncer::new(Duration::from_millis(self.config.debounce_ms));
        }
        tracing::debug!(enabled, "Scanner toggled");
    }

    /// Apply a partial configuration
    pub fn update_config(&mut self, patch: ScannerConfigPatch) {
        let language_changed = patch
            .language
            .as_ref()
            .is_some_and(|language| *language != self.config.language);
        let budget_changed = patch.frame_budget_ms.is_some();

        if let Some(version) = patch.default_version {
            self.config.default_version = version;
        }
        if let Some(language) = patch.language {
            self.config.language = language;
        }
        if let Some(selectors) = patch.exclude_selectors {
            self.config.exclude_selectors = selectors;
        }
        if let Some(chunk_size) = patch.chunk_size {
            self.config.chunk_size = chunk_size.max(1);
        }
        if let Some(budget) = patch.frame_budget_ms {
            self.config.frame_budget_ms = budget;
        }
        if let Some(debounce) = patch.debounce_ms {
            self.config.debounce_ms = debounce;
            self.debouncer.set_delay(Duration::from_millis(debounce));
        }
        if let Some(link) = patch.link_whole_chapters {
            self.config.link_whole_chapters = link;
        }

        if language_changed {
            self.vocabulary = None;
        }
        self.compile();
        if budget_changed && !self.custom_policy {
            self.reset_frame_budget();
        }
        if let Some(enabled) = patch.enabled {
            self.set_enabled(enabled);
        }
    }

    /// Scan a subtree to completion
    ///
    /// A no-op when the scanner is disabled or `root` is not attached.
    pub fn scan(&mut self, doc: &mut Document, root: NodeId) -> ScanReport {
        let mut report = ScanReport::default();
        if !self.config.enabled || !doc.is_attached(root) {
            return report;
        }

        self.enqueue_subtree(doc, root);
        while !self.work.is_empty() {
            report.absorb(self.run_frame(doc));
        }

        tracing::debug!(
            matches = report.matches.len(),
            nodes = report.nodes_scanned,
            frames = report.frames,
            "Scan complete"
        );
        report
    }

    /// Report nodes inserted into the document (mutation observer hook)
    pub fn on_nodes_added(&mut self, nodes: &[NodeId]) {
        if !self.config.enabled || nodes.is_empty() {
            return;
        }
        for &node in nodes {
            self.added.push(node);
        }
        self.debouncer.trigger(self.clock.now());
    }

    /// Run one frame of queued work
    pub fn tick(&mut self, doc: &mut Document) -> TickOutcome {
        if !self.config.enabled {
            return TickOutcome::Idle;
        }

        if self.debouncer.take_due(self.clock.now()) {
            while let Some(node) = self.added.pop() {
                if doc.is_attached(node) {
                    self.enqueue_subtree(doc, node);
                }
            }
        }

        if self.work.is_empty() {
            return if self.debouncer.is_pending() {
                TickOutcome::Waiting
            } else {
                TickOutcome::Idle
            };
        }

        let report = self.run_frame(doc);
        if self.work.is_empty() {
            TickOutcome::Finished(report)
        } else {
            TickOutcome::Yielded(report)
        }
    }

    /// Whether any work is queued or waiting on the debounce window
    pub fn has_pending_work(&self) -> bool {
        !self.work.is_empty() || self.debouncer.is_pending()
    }

    fn run_frame(&mut self, doc: &mut Document) -> ScanReport {
        let mut report = ScanReport {
            frames: 1,
            ..ScanReport::default()
        };
        self.yield_policy.begin_frame();

        loop {
            let chunk = self.work.take_chunk(self.config.chunk_size.max(1));
            if chunk.is_empty() {
                break;
            }
            for node in chunk {
                self.process_text_node(doc, node, &mut report);
            }
            if self.work.is_empty() || self.yield_policy.should_yield() {
                break;
            }
        }

        report
    }

    fn process_text_node(&self, doc: &mut Document, node: NodeId, report: &mut ScanReport) {
        // Removed since it was queued
        if !doc.is_attached(node) || self.is_excluded(doc, node) {
            return;
        }
        let Some(vocabulary) = self.vocabulary.as_ref() else {
            return;
        };
        let Some(text) = doc.text(node) else {
            return;
        };

        report.nodes_scanned += 1;
        let matches = find_matches(
            vocabulary,
            self.parser.resolver().as_ref(),
            text,
            self.config.link_whole_chapters,
        );
        if matches.is_empty() {
            return;
        }

        annotate_text_node(doc, node, &matches, &self.config.default_version);
        report.matches.extend(matches);
    }

    /// Queue the text nodes of a subtree in document order
    fn enqueue_subtree(&mut self, doc: &Document, root: NodeId) {
        if doc.is_text(root) {
            self.work.push(root);
            return;
        }
        if self.blocks_descent(doc, root) {
            return;
        }

        let mut stack: Vec<NodeId> = doc.children(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if doc.is_text(node) {
                self.work.push(node);
            } else if !self.blocks_descent(doc, node) {
                stack.extend(doc.children(node).iter().rev().copied());
            }
        }
    }

    fn blocks_descent(&self, doc: &Document, element: NodeId) -> bool {
        doc.attribute(element, MARKER_ATTR).is_some()
            || self.exclusions.iter().any(|s| s.matches(doc, element))
    }

    fn is_excluded(&self, doc: &Document, node: NodeId) -> bool {
        let mut current = doc.parent(node);
        while let Some(element) = current {
            if self.blocks_descent(doc, element) {
                return true;
            }
            current = doc.parent(element);
        }
        false
    }

    fn compile(&mut self) {
        self.exclusions = parse_selectors(&self.config.exclude_selectors);
        if self.vocabulary.is_none() {
            self.vocabulary = match self.parser.vocabulary(&self.config.language) {
                Ok(vocabulary) => Some(vocabulary),
                Err(e) => {
                    tracing::warn!(language = %self.config.language, error = %e, "Scanner has no vocabulary");
                    None
                }
            };
        }
    }

    fn reset_frame_budget(&mut self) {
        self.yield_policy = Box::new(FrameBudget::new(
            Arc::clone(&self.clock),
            Duration::from_millis(self.config.frame_budget_ms),
        ));
    }
}
