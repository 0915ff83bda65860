//! Property path tracking
//!
//! A [`PathTracker`] accumulates path segments while a caller navigates a
//! facade graph, and renders them as `activities[1].start` style strings.
//! Rendering is one-shot: it drains the accumulated segments.

use crate::model::{MethodDef, MethodKind, Value};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::trace;

#[derive(Debug, Default)]
struct TrackerState {
    base: String,
    stack: Vec<String>,
}

/// Segment stack shared by a facade and every facade derived from it.
///
/// Cloning yields another handle onto the same stack. The tracker belongs to
/// one access expression on one thread; the inner mutex only makes the handle
/// shareable, it does not make interleaved expressions meaningful.
#[derive(Clone, Default)]
pub struct PathTracker {
    state: Arc<Mutex<TrackerState>>,
}

impl PathTracker {
    /// Tracker without a base path
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker whose rendered paths are prefixed by an immutable base path
    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(TrackerState {
                base: base.into(),
                stack: Vec::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Base path prepended to every rendered path
    pub fn base(&self) -> String {
        self.state().base.clone()
    }

    /// Push a property segment onto the stack
    pub fn push_segment(&self, segment: impl Into<String>) {
        self.state().stack.push(segment.into());
    }

    /// Append `['key']` (string keys) or `[key]` to the most recent segment.
    ///
    /// Dropped when no segment has been pushed yet.
    pub fn push_indexed_suffix(&self, key: &Value) {
        let suffix = indexed_suffix(key);
        let mut state = self.state();
        match state.stack.last_mut() {
            Some(last) => last.push_str(&suffix),
            None => trace!("dropping index suffix {} with empty path stack", suffix),
        }
    }

    /// Classify an intercepted call and update the stack accordingly.
    ///
    /// `get<X>`, `set<X>` and boolean `is<X>` push `x` whatever their arity;
    /// a one-argument `get(key)` appends the key to the last segment.
    pub fn on_method_call(&self, method: &MethodDef, args: &[Value]) {
        if *method.kind() == MethodKind::ElementAccessor {
            if let Some(key) = args.first() {
                self.push_indexed_suffix(key);
            }
        } else if let Some(segment) = method.path_segment() {
            self.push_segment(segment);
        }
    }

    /// Render the current path and clear the stack
    pub fn render(&self) -> String {
        let mut state = self.state();
        let joined = state.stack.join(".");
        state.stack.clear();
        match (state.base.is_empty(), joined.is_empty()) {
            (true, _) => joined,
            (false, true) => state.base.clone(),
            (false, false) => format!("{}.{}", state.base, joined),
        }
    }

    /// Discard accumulated segments, keeping the base path
    pub fn reset(&self) {
        self.state().stack.clear();
    }

    /// Number of accumulated segments
    pub fn depth(&self) -> usize {
        self.state().stack.len()
    }

    /// Whether two handles share the same stack
    pub fn same_as(&self, other: &PathTracker) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for PathTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("PathTracker")
            .field("base", &state.base)
            .field("stack", &state.stack)
            .finish()
    }
}

fn indexed_suffix(key: &Value) -> String {
    match key {
        Value::Str(s) => format!("['{}']", s),
        other => format!("[{}]", other),
    }
}

/// Immutable dotted path built one nested segment at a time
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    /// The empty path
    pub fn root() -> Self {
        Self::default()
    }

    /// Whether no segment has been nested yet
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// New path with `segment` appended
    pub fn nested(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Segments from outermost to innermost
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments joined with `.`
    pub fn representation(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.representation())
    }
}
