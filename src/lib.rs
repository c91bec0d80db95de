//! Render-Cycle Instrumentation
//!
//! This crate wraps a subtree of a UI component tree and observes each of
//! its render/commit cycles:
//! - Slow-render classification against a configurable threshold
//! - Grouped slow-render diagnostics via `tracing`
//! - Named timing marks and measures forwarded to an injected registry
//!
//! # Feature Flags
//!
//! - `instrumentation` (default): observation defaults on in debug builds;
//!   without it, probes must be enabled explicitly
//!
//! # Example
//!
//! ```rust
//! use render_probe::{InMemoryRegistry, ProbeConfig, RenderPhase, RenderProbe};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(InMemoryRegistry::new());
//! let probe = RenderProbe::mount(
//!     ProbeConfig::new("Sidebar").with_enabled(true),
//!     registry.clone(),
//! );
//!
//! let token = probe.begin_render();
//! // ... render the subtree ...
//! probe.end_render(token, RenderPhase::Mount);
//!
//! assert_eq!(registry.mark_count("Sidebar-render-mount"), 1);
//! assert_eq!(registry.measure_count("Sidebar-render-duration"), 1);
//! ```

mod config;
mod event;
mod probe;
mod registry;

pub use config::*;
pub use event::*;
pub use probe::*;
pub use registry::*;
