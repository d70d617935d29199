#![forbid(unsafe_code)]

//! `breakwatch-web` provides browser-shaped host adapters for breakwatch.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS) pushes window sizes.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate does not bind to `wasm-bindgen`. It provides the pieces a
//! binding layer wraps: a [`WebViewport`] mirroring `window.innerWidth` /
//! `innerHeight` with resize events, a [`ClassList`] standing in for the
//! document root's class list, and [`WebHost`] tying both to a tracker.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

use breakwatch_core::{
    ClassMarker, PointSet, Result, Subscription, TrackerConfig, TrackerOptions, Viewport,
    ViewportSource,
};
use breakwatch_runtime::BreakpointTracker;
use tracing::debug;

// ---------------------------------------------------------------------------
// WebViewport
// ---------------------------------------------------------------------------

/// Host-driven browser window size.
///
/// A browser fires `resize` for height-only changes too, so
/// [`set_size`](Self::set_size) emits a signal whenever either dimension
/// changes. Clones share state.
#[derive(Debug, Clone)]
pub struct WebViewport {
    width: Viewport,
    height: Rc<Cell<f64>>,
}

impl WebViewport {
    /// Create a window of the given size. Invalid dimensions start at 0.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: Viewport::new(width),
            height: Rc::new(Cell::new(sanitize(height).unwrap_or(0.0))),
        }
    }

    /// Current inner width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width.width()
    }

    /// Current inner height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height.get()
    }

    /// Push a new window size from the host.
    ///
    /// Emits one signal if either dimension changed. Invalid samples are
    /// ignored as a whole.
    pub fn set_size(&self, width: f64, height: f64) {
        let (Some(width), Some(height)) = (sanitize(width), sanitize(height)) else {
            debug!(width, height, "ignoring invalid window size sample");
            return;
        };
        let height_changed = self.height.replace(height) != height;
        if self.width.width() != width {
            self.width.set_width(width);
        } else if height_changed {
            self.width.notify_resize();
        }
    }

    /// Emit a resize signal without changing the size.
    pub fn notify_resize(&self) {
        self.width.notify_resize();
    }

    /// Number of resize signals emitted so far.
    #[must_use]
    pub fn signal_count(&self) -> u64 {
        self.width.signal_count()
    }

    /// The underlying width source.
    #[must_use]
    pub fn as_viewport(&self) -> &Viewport {
        &self.width
    }
}

impl ViewportSource for WebViewport {
    fn width(&self) -> f64 {
        WebViewport::width(self)
    }

    fn subscribe(&self, callback: Box<dyn Fn(f64)>) -> Subscription {
        self.width.subscribe(callback)
    }
}

fn sanitize(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

// ---------------------------------------------------------------------------
// ClassList
// ---------------------------------------------------------------------------

/// In-memory class list of the document root element.
///
/// Clones share the same set, so the host keeps a handle while the tracker
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct ClassList {
    classes: Rc<RefCell<BTreeSet<String>>>,
}

impl ClassList {
    /// Empty class list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Class list seeded with existing classes.
    #[must_use]
    pub fn with_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: Rc::new(RefCell::new(classes.into_iter().map(Into::into).collect())),
        }
    }

    /// Add a class. Returns `false` if it was already present.
    pub fn add(&self, class: &str) -> bool {
        self.classes.borrow_mut().insert(class.to_owned())
    }

    /// Remove a class. Returns `false` if it was absent.
    pub fn remove(&self, class: &str) -> bool {
        self.classes.borrow_mut().remove(class)
    }

    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    /// Classes in sorted order.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.borrow().is_empty()
    }

    /// Space-separated `class` attribute value.
    #[must_use]
    pub fn to_attribute(&self) -> String {
        self.classes().join(" ")
    }
}

impl ClassMarker for ClassList {
    fn apply(&mut self, added: Option<&str>, removed: Option<&str>) {
        if let Some(class) = removed {
            self.remove(class);
        }
        if let Some(class) = added {
            self.add(class);
        }
    }
}

// ---------------------------------------------------------------------------
// WebHost
// ---------------------------------------------------------------------------

/// A browser-like embedding: one window and one document root.
#[derive(Debug, Clone)]
pub struct WebHost {
    viewport: WebViewport,
    classes: ClassList,
}

impl WebHost {
    /// Host with a window of the given size and an empty class list.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: WebViewport::new(width, height),
            classes: ClassList::new(),
        }
    }

    /// The window.
    #[must_use]
    pub fn viewport(&self) -> &WebViewport {
        &self.viewport
    }

    /// The document root class list.
    #[must_use]
    pub fn class_list(&self) -> &ClassList {
        &self.classes
    }

    /// Forward a window resize from the host.
    pub fn resize(&self, width: f64, height: f64) {
        self.viewport.set_size(width, height);
    }

    /// Build a tracker attached to this host's window and class list.
    pub fn tracker(&self, points: PointSet, options: TrackerOptions) -> Result<BreakpointTracker> {
        BreakpointTracker::builder(self.viewport.clone())
            .points(points)
            .options(options)
            .class_marker(self.classes.clone())
            .build()
    }

    /// Build a tracker from a loaded configuration.
    pub fn tracker_from_config(&self, config: TrackerConfig) -> Result<BreakpointTracker> {
        BreakpointTracker::builder(self.viewport.clone())
            .config(config)
            .class_marker(self.classes.clone())
            .build()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
