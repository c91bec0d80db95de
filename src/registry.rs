//! Performance-mark registry seam

use std::sync::Mutex;
use std::time::Instant;

/// Destination for named timing marks and measures.
///
/// Injected into the probe rather than reached through a global, so tests
/// can substitute a recording fake and assert exact mark/measure names. All
/// methods are infallible: an environment without a timing facility reports
/// it through [`supports_marking`](MarkRegistry::supports_marking) and the
/// probe skips marking silently.
pub trait MarkRegistry: Send + Sync {
    /// Whether mark creation is available in this environment.
    fn supports_marking(&self) -> bool;

    /// Record a named mark at the current instant.
    fn mark(&self, name: &str);

    /// Record a named duration measured from the most recent mark named
    /// `from_mark` to the current instant.
    fn measure(&self, name: &str, from_mark: &str);
}

/// A recorded mark: name and offset from the registry origin.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkEntry {
    /// Mark name
    pub name: String,
    /// Offset from the registry origin in milliseconds
    pub at_ms: f64,
}

/// A recorded measure.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureEntry {
    /// Measure name
    pub name: String,
    /// Name of the mark the duration is anchored at
    pub from_mark: String,
    /// Measured duration in milliseconds
    pub duration_ms: f64,
}

/// Append-style in-memory registry.
///
/// Marks and measures accumulate in insertion order. Re-marking a name
/// appends a new entry; it is never an error. A measure whose source mark
/// has not been recorded is skipped silently, matching the tolerance the
/// probe requires from any registry.
#[derive(Debug)]
pub struct InMemoryRegistry {
    origin: Instant,
    state: Mutex<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    marks: Vec<MarkEntry>,
    measures: Vec<MeasureEntry>,
}

impl InMemoryRegistry {
    /// Create an empty registry with its origin at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Mutex::new(RegistryState::default()),
        }
    }

    #[inline]
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    /// Get all recorded marks in insertion order.
    pub fn marks(&self) -> Vec<MarkEntry> {
        match self.state.lock() {
            Ok(state) => state.marks.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Get all recorded measures in insertion order.
    pub fn measures(&self) -> Vec<MeasureEntry> {
        match self.state.lock() {
            Ok(state) => state.measures.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Count marks with the given name.
    pub fn mark_count(&self, name: &str) -> usize {
        self.marks().iter().filter(|m| m.name == name).count()
    }

    /// Count measures with the given name.
    pub fn measure_count(&self, name: &str) -> usize {
        self.measures().iter().filter(|m| m.name == name).count()
    }

    /// Get the most recent mark with the given name.
    pub fn latest_mark(&self, name: &str) -> Option<MarkEntry> {
        self.marks().into_iter().rev().find(|m| m.name == name)
    }

    /// Remove all recorded marks and measures.
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.marks.clear();
            state.measures.clear();
        }
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkRegistry for InMemoryRegistry {
    fn supports_marking(&self) -> bool {
        true
    }

    fn mark(&self, name: &str) {
        let at_ms = self.now_ms();
        if let Ok(mut state) = self.state.lock() {
            state.marks.push(MarkEntry {
                name: name.to_string(),
                at_ms,
            });
        }

        tracing::trace!(
            target: "render_probe::registry",
            mark = name,
            at_ms = at_ms,
            "mark recorded"
        );
    }

    fn measure(&self, name: &str, from_mark: &str) {
        let now_ms = self.now_ms();
        if let Ok(mut state) = self.state.lock() {
            let anchor_at_ms = state
                .marks
                .iter()
                .rev()
                .find(|m| m.name == from_mark)
                .map(|m| m.at_ms);
            let Some(at_ms) = anchor_at_ms else {
                // Missing source mark is the registry's concern; skip.
                return;
            };

            let duration_ms = now_ms - at_ms;
            state.measures.push(MeasureEntry {
                name: name.to_string(),
                from_mark: from_mark.to_string(),
                duration_ms,
            });

            tracing::trace!(
                target: "render_probe::registry",
                measure = name,
                from_mark = from_mark,
                duration_ms = duration_ms,
                "measure recorded"
            );
        }
    }
}

/// A registry for environments without a timing facility.
///
/// Reports no marking support; the probe detects this and skips marking.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRegistry;

impl MarkRegistry for NoopRegistry {
    fn supports_marking(&self) -> bool {
        false
    }

    fn mark(&self, _name: &str) {}

    fn measure(&self, _name: &str, _from_mark: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_appends() {
        let registry = InMemoryRegistry::new();
        registry.mark("a");
        registry.mark("b");
        registry.mark("a");

        assert_eq!(registry.marks().len(), 3);
        assert_eq!(registry.mark_count("a"), 2);
        assert_eq!(registry.mark_count("b"), 1);
    }

    #[test]
    fn test_remark_is_not_an_error() {
        let registry = InMemoryRegistry::new();
        for _ in 0..10 {
            registry.mark("same-name");
        }
        assert_eq!(registry.mark_count("same-name"), 10);
    }

    #[test]
    fn test_measure_anchors_at_latest_mark() {
        let registry = InMemoryRegistry::new();
        registry.mark("start");
        registry.mark("start");
        registry.measure("elapsed", "start");

        let measures = registry.measures();
        assert_eq!(measures.len(), 1);
        assert_eq!(measures[0].name, "elapsed");
        assert_eq!(measures[0].from_mark, "start");
        assert!(measures[0].duration_ms >= 0.0);

        let latest = registry.latest_mark("start").unwrap();
        assert!(measures[0].duration_ms <= registry.now_ms() - latest.at_ms + 1.0);
    }

    #[test]
    fn test_measure_with_missing_mark_is_skipped() {
        let registry = InMemoryRegistry::new();
        registry.measure("elapsed", "never-marked");
        assert!(registry.measures().is_empty());
    }

    #[test]
    fn test_clear() {
        let registry = InMemoryRegistry::new();
        registry.mark("a");
        registry.measure("m", "a");
        registry.clear();

        assert!(registry.marks().is_empty());
        assert!(registry.measures().is_empty());
    }

    #[test]
    fn test_noop_registry() {
        let registry = NoopRegistry;
        assert!(!registry.supports_marking());
        registry.mark("ignored");
        registry.measure("ignored", "ignored");
    }

    #[test]
    fn test_mark_offsets_are_monotonic() {
        let registry = InMemoryRegistry::new();
        registry.mark("first");
        registry.mark("second");

        let marks = registry.marks();
        assert!(marks[1].at_ms >= marks[0].at_ms);
    }
}
