//! Render instrumentation wrapper

use crate::config::ProbeConfig;
use crate::event::{RenderClass, RenderEvent, RenderPhase, SlowRenderReport};
use crate::registry::MarkRegistry;
use std::sync::Arc;
use std::time::Instant;

/// Observes render/commit cycles of a single subtree for one mount.
///
/// Configuration is fixed at mount time. A disabled probe is a passthrough:
/// [`begin_render`](RenderProbe::begin_render) hands back an unarmed token
/// and the observer path is never entered, so disabling instrumentation
/// removes the observation work entirely rather than short-circuiting
/// inside it.
///
/// # Example
///
/// ```rust
/// use render_probe::{InMemoryRegistry, ProbeConfig, RenderPhase, RenderProbe};
/// use std::sync::Arc;
///
/// let registry = Arc::new(InMemoryRegistry::new());
/// let probe = RenderProbe::mount(
///     ProbeConfig::new("Sidebar").with_enabled(true),
///     registry.clone(),
/// );
///
/// let token = probe.begin_render();
/// // ... render the subtree ...
/// probe.end_render(token, RenderPhase::Mount);
///
/// assert_eq!(registry.mark_count("Sidebar-render-mount"), 1);
/// ```
pub struct RenderProbe {
    config: ProbeConfig,
    registry: Arc<dyn MarkRegistry>,
    origin: Instant,
}

impl RenderProbe {
    /// Mount a probe over a subtree.
    ///
    /// The configuration is fixed for the life of the mount; changing it
    /// requires remounting. Time offsets in events produced by
    /// [`begin_render`](RenderProbe::begin_render) are relative to this
    /// instant.
    pub fn mount(config: ProbeConfig, registry: Arc<dyn MarkRegistry>) -> Self {
        if config.enabled {
            tracing::debug!(
                target: "render_probe",
                subtree = %config.id,
                threshold_ms = config.slow_threshold_ms,
                "probe mounted"
            );
        }

        Self {
            config,
            registry,
            origin: Instant::now(),
        }
    }

    /// Check if this probe observes renders.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Get the mount configuration.
    #[inline]
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Begin timing a render cycle.
    ///
    /// A disabled probe returns an unarmed token, which makes
    /// [`end_render`](RenderProbe::end_render) a no-op.
    pub fn begin_render(&self) -> RenderToken {
        if !self.config.enabled {
            return RenderToken {
                start: None,
                start_ms: 0.0,
            };
        }

        let now = Instant::now();
        RenderToken {
            start: Some(now),
            start_ms: now.duration_since(self.origin).as_secs_f64() * 1000.0,
        }
    }

    /// Finish a render cycle and observe it.
    ///
    /// There is no memoization estimate at this layer, so the event's base
    /// duration equals its actual duration. Callers that track a real
    /// estimate build a [`RenderEvent`] and call
    /// [`observe`](RenderProbe::observe) directly.
    pub fn end_render(&self, token: RenderToken, phase: RenderPhase) -> Option<RenderClass> {
        let start = token.start?;
        let actual_ms = start.elapsed().as_secs_f64() * 1000.0;

        let event = RenderEvent {
            subtree_id: self.config.id.clone(),
            phase,
            actual_duration_ms: actual_ms,
            base_duration_ms: actual_ms,
            start_time_ms: token.start_ms,
            commit_time_ms: token.start_ms + actual_ms,
        };

        self.observe(&event)
    }

    /// Observe one committed render cycle.
    ///
    /// Runs synchronously on the committing thread, once per commit, in
    /// commit order. Never panics: slow-render diagnostics are side effects
    /// only, and a registry without mark support is skipped silently.
    ///
    /// Returns the cycle's classification, or `None` when disabled.
    pub fn observe(&self, event: &RenderEvent) -> Option<RenderClass> {
        // Re-checked per event in case enablement is resolved dynamically
        // rather than fixed at mount.
        if !self.config.enabled {
            return None;
        }

        let class = event.classify(self.config.slow_threshold_ms);

        if self.config.log_slow_renders && class.is_slow() {
            let report = SlowRenderReport {
                event,
                threshold_ms: self.config.slow_threshold_ms,
            };
            tracing::warn!(
                target: "render_probe",
                subtree = %event.subtree_id,
                phase = %event.phase,
                actual_ms = event.actual_duration_ms,
                threshold_ms = self.config.slow_threshold_ms,
                "{}", report
            );
        }

        if self.registry.supports_marking() {
            let mark = event.mark_name();
            self.registry.mark(&mark);
            self.registry.measure(&event.measure_name(), &mark);
        }

        tracing::trace!(
            target: "render_probe",
            subtree = %event.subtree_id,
            phase = %event.phase,
            actual_ms = event.actual_duration_ms,
            slow = class.is_slow(),
            "render observed"
        );

        Some(class)
    }

    /// Begin a scope-timed render cycle.
    pub fn scope(&self, phase: RenderPhase) -> RenderScope<'_> {
        RenderScope {
            probe: self,
            token: self.begin_render(),
            phase,
        }
    }
}

/// In-flight timing state for one render cycle.
///
/// Tokens from a disabled probe are unarmed and carry no timing state.
#[derive(Debug)]
pub struct RenderToken {
    start: Option<Instant>,
    start_ms: f64,
}

impl RenderToken {
    /// Whether this token carries timing state.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.start.is_some()
    }
}

/// Scope guard timing one render cycle.
///
/// [`commit`](RenderScope::commit) finishes the cycle and observes it.
/// Dropping the scope without committing discards the cycle unobserved,
/// since no commit ever happened.
pub struct RenderScope<'a> {
    probe: &'a RenderProbe,
    token: RenderToken,
    phase: RenderPhase,
}

impl RenderScope<'_> {
    /// Commit the render cycle and observe it.
    pub fn commit(self) -> Option<RenderClass> {
        self.probe.end_render(self.token, self.phase)
    }

    /// Get the phase this scope was opened with.
    #[inline]
    pub fn phase(&self) -> RenderPhase {
        self.phase
    }
}
