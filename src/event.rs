//! Render event records and slow-render classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a render cycle occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderPhase {
    /// First render of the subtree
    Mount,
    /// A subsequent re-render
    Update,
    /// A re-render scheduled from within another update's commit
    NestedUpdate,
}

impl RenderPhase {
    /// Stable string form, used in mark names.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderPhase::Mount => "mount",
            RenderPhase::Update => "update",
            RenderPhase::NestedUpdate => "nested-update",
        }
    }
}

impl fmt::Display for RenderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a single render cycle against the slow threshold.
///
/// Computed per event and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderClass {
    /// Within the threshold
    Normal,
    /// Exceeded the threshold
    Slow,
}

impl RenderClass {
    /// Check if this cycle was classified as slow.
    #[inline]
    pub fn is_slow(&self) -> bool {
        matches!(self, RenderClass::Slow)
    }
}

/// Timing data for one render/commit cycle of an observed subtree.
///
/// All times are milliseconds relative to a monotonic origin. Events are
/// transient: the probe handles them synchronously and retains nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEvent {
    /// Identifies the observed subtree
    pub subtree_id: String,
    /// Why this cycle occurred
    pub phase: RenderPhase,
    /// Wall-clock render time for this cycle, including suspended work
    pub actual_duration_ms: f64,
    /// Estimated time to render the subtree without memoization
    pub base_duration_ms: f64,
    /// When the render began
    pub start_time_ms: f64,
    /// When the render was committed
    pub commit_time_ms: f64,
}

impl RenderEvent {
    /// Check whether this cycle exceeded the slow threshold.
    ///
    /// Strict inequality: a render exactly at the threshold is not slow.
    #[inline]
    pub fn is_slow(&self, threshold_ms: f64) -> bool {
        self.actual_duration_ms > threshold_ms
    }

    /// Classify this cycle against the slow threshold.
    #[inline]
    pub fn classify(&self, threshold_ms: f64) -> RenderClass {
        if self.is_slow(threshold_ms) {
            RenderClass::Slow
        } else {
            RenderClass::Normal
        }
    }

    /// Mark name for this cycle: `<subtree>-render-<phase>`.
    pub fn mark_name(&self) -> String {
        format!("{}-render-{}", self.subtree_id, self.phase.as_str())
    }

    /// Measure name for this subtree: `<subtree>-render-duration`.
    pub fn measure_name(&self) -> String {
        format!("{}-render-duration", self.subtree_id)
    }
}

/// Grouped diagnostic for a render cycle that exceeded the slow threshold.
///
/// Borrowed view over the event; formatted once when logged.
#[derive(Debug)]
pub struct SlowRenderReport<'a> {
    /// The offending event
    pub event: &'a RenderEvent,
    /// The threshold it exceeded, in milliseconds
    pub threshold_ms: f64,
}

impl fmt::Display for SlowRenderReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Slow render in {} ({}) exceeded {:.2}ms",
            self.event.subtree_id, self.event.phase, self.threshold_ms
        )?;
        writeln!(f, "  Actual duration: {:.2}ms", self.event.actual_duration_ms)?;
        writeln!(f, "  Base duration: {:.2}ms", self.event.base_duration_ms)?;
        writeln!(f, "  Start time: {:.2}ms", self.event.start_time_ms)?;
        write!(f, "  Commit time: {:.2}ms", self.event.commit_time_ms)
    }
}
