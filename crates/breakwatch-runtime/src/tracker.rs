#![forbid(unsafe_code)]

//! The breakpoint tracker.
//!
//! [`BreakpointTracker`] owns an immutable [`BreakpointTable`], remembers
//! which breakpoint was last active, and listens to its [`ViewportSource`].
//! On every size-change signal it re-classifies the viewport width and, if
//! the active breakpoint changed, dispatches the planned
//! [`TransitionEvent`]s to the listeners registered for each
//! (breakpoint, kind) pair.
//!
//! # Usage
//!
//! ```ignore
//! use breakwatch_core::{PointSet, TrackerOptions, Viewport};
//! use breakwatch_runtime::BreakpointTracker;
//!
//! let viewport = Viewport::new(500.0);
//! let points = PointSet::new().with("phone", 0).with("tablet", 600);
//! let tracker = BreakpointTracker::new(
//!     viewport.clone(),
//!     points,
//!     TrackerOptions::default().remove_default_breakpoints(true),
//! )?;
//! tracker.on_enter("tablet", |_| println!("tablet layout"))?;
//!
//! viewport.set_width(700.0); // prints "tablet layout"
//! assert_eq!(tracker.active().breakpoint().name(), "tablet");
//! ```
//!
//! # Invariants
//!
//! 1. The table and notification channels never change after construction.
//! 2. Signals that leave the active breakpoint unchanged raise nothing and
//!    leave [`ActiveState`] untouched.
//! 3. Per transition: `Enter(next)`, `Leave(previous)`, then at most one of
//!    `CrossedMin(next)` / `CrossedMax(previous)`, then the class marker,
//!    then the state update.
//! 4. No interior borrow is held while listeners run, so listeners may call
//!    any query method.
//!
//! # Failure Modes
//!
//! - A signal whose width matches no breakpoint is logged at `warn!` and
//!   leaves the state unchanged; [`BreakpointTracker::handle_resize`]
//!   returns the error to direct callers.
//! - Listeners that synchronously trigger another signal re-enter
//!   `handle_resize` before the previous state is updated; this is not
//!   guarded against.
//! - A class marker that triggers a signal from `apply` re-enters the same
//!   way; the nested transition runs without the marker.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use breakwatch_core::{
    ActiveState, Breakpoint, BreakpointTable, ClassMarker, PointSet, Result, Subscription,
    TrackerConfig, TrackerOptions, ViewportSource, marker_class, merge_points,
};
use tracing::{debug, info, info_span, trace, warn};
use web_time::Instant;

use crate::dispatch::{DispatchTable, Listener};
use crate::transition::{Transition, TransitionEvent, TransitionKind};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// State shared between the tracker handle and its viewport subscription.
struct TrackerShared {
    table: BreakpointTable,
    options: TrackerOptions,
    viewport: Rc<dyn ViewportSource>,
    active: RefCell<ActiveState>,
    dispatch: RefCell<DispatchTable>,
    marker: RefCell<Option<Box<dyn ClassMarker>>>,
    disposed: Cell<bool>,
    transitions: Cell<u64>,
}

impl TrackerShared {
    fn classify(&self) -> Result<&Breakpoint> {
        self.table.classify(self.viewport.width())
    }

    fn apply_marker(&self, added: Option<&str>, removed: Option<&str>) {
        if !self.options.update_body_class {
            return;
        }
        // Taken out of the cell so a marker that triggers a resize does not
        // hit an outstanding borrow. Nested transitions skip the marker.
        let Some(mut marker) = self.marker.borrow_mut().take() else {
            return;
        };
        let prefix = &self.options.class_prefix;
        let added = added.map(|name| marker_class(prefix, name));
        let removed = removed.map(|name| marker_class(prefix, name));
        marker.apply(added.as_deref(), removed.as_deref());
        self.marker.borrow_mut().get_or_insert(marker);
    }

    fn handle_resize(&self) -> Result<Option<Transition>> {
        if self.disposed.get() {
            return Ok(None);
        }

        let width = self.viewport.width();
        let next = match self.table.classify(width) {
            Ok(bp) => bp.clone(),
            Err(err) => {
                warn!(width, error = %err, "viewport width matched no breakpoint");
                return Err(err);
            }
        };

        let previous = self.active.borrow().breakpoint().clone();
        let Some(transition) = Transition::plan(&previous, &next) else {
            trace!(width, active = next.name(), "resize within active breakpoint");
            return Ok(None);
        };

        let span = info_span!(
            "breakpoint.transition",
            from = previous.name(),
            to = next.name(),
            direction = transition.direction().as_str(),
            listeners_invoked = tracing::field::Empty,
            duration_us = tracing::field::Empty
        );
        let _entered = span.enter();
        let start = Instant::now();

        let mut invoked = 0_u64;
        for event in &transition.events {
            // Clone the list out so listeners can reach back into the tracker.
            let listeners = self.dispatch.borrow().listeners(event);
            for listener in &listeners {
                listener(event);
            }
            invoked += listeners.len() as u64;
        }

        self.apply_marker(Some(next.name()), Some(previous.name()));
        *self.active.borrow_mut() = ActiveState::new(next, width);
        self.transitions.set(self.transitions.get() + 1);

        let duration_us = start.elapsed().as_micros() as u64;
        span.record("listeners_invoked", invoked);
        span.record("duration_us", duration_us);
        info!(
            width,
            from = transition.from.name(),
            to = transition.to.name(),
            events = transition.events.len(),
            listeners_invoked = invoked,
            "active breakpoint changed"
        );

        Ok(Some(transition))
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Step-by-step construction of a [`BreakpointTracker`].
pub struct TrackerBuilder {
    viewport: Rc<dyn ViewportSource>,
    points: PointSet,
    options: TrackerOptions,
    marker: Option<Box<dyn ClassMarker>>,
    attach: bool,
}

impl std::fmt::Debug for TrackerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerBuilder")
            .field("points", &self.points)
            .field("options", &self.options)
            .field("has_marker", &self.marker.is_some())
            .field("attach", &self.attach)
            .finish()
    }
}

impl TrackerBuilder {
    /// Caller breakpoint overrides (replaces any set earlier).
    #[must_use]
    pub fn points(mut self, points: PointSet) -> Self {
        self.points = points;
        self
    }

    /// Add one breakpoint override.
    #[must_use]
    pub fn point(mut self, name: impl Into<String>, width: impl Into<f64>) -> Self {
        self.points.insert(name, width);
        self
    }

    /// Tracker options.
    #[must_use]
    pub fn options(mut self, options: TrackerOptions) -> Self {
        self.options = options;
        self
    }

    /// Options and points from a loaded configuration.
    #[must_use]
    pub fn config(mut self, config: TrackerConfig) -> Self {
        self.options = config.options;
        self.points = config.points;
        self
    }

    /// Collaborator that maintains the active-breakpoint class.
    #[must_use]
    pub fn class_marker(mut self, marker: impl ClassMarker + 'static) -> Self {
        self.marker = Some(Box::new(marker));
        self
    }

    /// Do not subscribe to the viewport; the host calls
    /// [`BreakpointTracker::handle_resize`] itself.
    #[must_use]
    pub fn detached(mut self) -> Self {
        self.attach = false;
        self
    }

    /// Merge the table, compute the initial state, and start listening.
    pub fn build(self) -> Result<BreakpointTracker> {
        let table = merge_points(&self.points, self.options.remove_default_breakpoints)?;
        let width = self.viewport.width();
        let initial = table.classify(width)?.clone();
        let dispatch = DispatchTable::for_table(&table);

        let shared = Rc::new(TrackerShared {
            table,
            options: self.options,
            viewport: Rc::clone(&self.viewport),
            active: RefCell::new(ActiveState::new(initial.clone(), width)),
            dispatch: RefCell::new(dispatch),
            marker: RefCell::new(self.marker),
            disposed: Cell::new(false),
            transitions: Cell::new(0),
        });
        shared.apply_marker(Some(initial.name()), None);

        let subscription = self.attach.then(|| {
            let weak: Weak<TrackerShared> = Rc::downgrade(&shared);
            self.viewport.subscribe(Box::new(move |_width| {
                if let Some(shared) = weak.upgrade() {
                    // Failures are already logged inside handle_resize.
                    let _ = shared.handle_resize();
                }
            }))
        });

        info!(
            breakpoints = shared.table.len(),
            active = initial.name(),
            width,
            attached = subscription.is_some(),
            "breakpoint tracker initialized"
        );

        Ok(BreakpointTracker {
            shared,
            subscription,
        })
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Detects the active breakpoint, raises transition notifications, and
/// answers range queries against the current viewport width.
///
/// Dropping the tracker detaches it from the viewport.
pub struct BreakpointTracker {
    shared: Rc<TrackerShared>,
    subscription: Option<Subscription>,
}

impl std::fmt::Debug for BreakpointTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreakpointTracker")
            .field("table", &self.shared.table)
            .field("active", &*self.shared.active.borrow())
            .field("dispatch", &*self.shared.dispatch.borrow())
            .field("attached", &self.subscription.is_some())
            .field("disposed", &self.shared.disposed.get())
            .finish()
    }
}

impl BreakpointTracker {
    /// Build a tracker attached to `viewport`.
    pub fn new(
        viewport: impl ViewportSource + 'static,
        points: PointSet,
        options: TrackerOptions,
    ) -> Result<Self> {
        Self::builder(viewport).points(points).options(options).build()
    }

    /// Start building a tracker for `viewport` with default options.
    #[must_use]
    pub fn builder(viewport: impl ViewportSource + 'static) -> TrackerBuilder {
        TrackerBuilder {
            viewport: Rc::new(viewport),
            points: PointSet::new(),
            options: TrackerOptions::default(),
            marker: None,
            attach: true,
        }
    }

    // -- Table and state ----------------------------------------------------

    /// The merged breakpoint table.
    #[must_use]
    pub fn table(&self) -> &BreakpointTable {
        &self.shared.table
    }

    /// Options the tracker was built with.
    #[must_use]
    pub fn options(&self) -> &TrackerOptions {
        &self.shared.options
    }

    /// Current viewport width as reported by the source.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.shared.viewport.width()
    }

    /// Last recorded active state.
    #[must_use]
    pub fn active(&self) -> ActiveState {
        self.shared.active.borrow().clone()
    }

    /// Number of transitions dispatched so far.
    #[must_use]
    pub fn transition_count(&self) -> u64 {
        self.shared.transitions.get()
    }

    /// Classify the current width against the table.
    pub fn current_breakpoint(&self) -> Result<&Breakpoint> {
        self.shared.classify()
    }

    /// Look a breakpoint up by name.
    pub fn lookup(&self, name: &str) -> Result<&Breakpoint> {
        self.shared.table.lookup(name)
    }

    // -- Range queries ------------------------------------------------------

    /// Whether the width is at or above `name`'s threshold.
    pub fn is_at_least(&self, name: &str) -> Result<bool> {
        let threshold = self.lookup(name)?.threshold();
        Ok(self.width() >= f64::from(threshold))
    }

    /// Whether the width is strictly below `name`'s threshold.
    pub fn is_at_most(&self, name: &str) -> Result<bool> {
        let threshold = self.lookup(name)?.threshold();
        Ok(self.width() < f64::from(threshold))
    }

    /// Whether the width is at or above `min`'s threshold and strictly below
    /// `max`'s.
    pub fn is_between(&self, min: &str, max: &str) -> Result<bool> {
        let upper = self.lookup(max)?.threshold();
        Ok(self.is_at_least(min)? && self.width() < f64::from(upper))
    }

    /// [`is_at_least`](Self::is_at_least), running `f` when it holds.
    pub fn is_at_least_then(&self, name: &str, f: impl FnOnce()) -> Result<bool> {
        self.is_at_least(name).map(|hit| run_if(hit, f))
    }

    /// [`is_at_most`](Self::is_at_most), running `f` when it holds.
    pub fn is_at_most_then(&self, name: &str, f: impl FnOnce()) -> Result<bool> {
        self.is_at_most(name).map(|hit| run_if(hit, f))
    }

    /// [`is_between`](Self::is_between), running `f` when it holds.
    pub fn is_between_then(&self, min: &str, max: &str, f: impl FnOnce()) -> Result<bool> {
        self.is_between(min, max).map(|hit| run_if(hit, f))
    }

    // -- Subscriptions ------------------------------------------------------

    /// Register `callback` for `kind` notifications of breakpoint `name`.
    ///
    /// Listeners on one channel run in registration order.
    pub fn listen(
        &self,
        name: &str,
        kind: TransitionKind,
        callback: impl Fn(&TransitionEvent) + 'static,
    ) -> Result<&Self> {
        let listener: Listener = Rc::new(callback);
        self.shared
            .dispatch
            .borrow_mut()
            .register(name, kind, listener)?;
        Ok(self)
    }

    /// Run `callback` whenever `name` becomes active.
    pub fn on_enter(
        &self,
        name: &str,
        callback: impl Fn(&TransitionEvent) + 'static,
    ) -> Result<&Self> {
        self.listen(name, TransitionKind::Enter, callback)
    }

    /// Run `callback` whenever `name` stops being active.
    pub fn on_leave(
        &self,
        name: &str,
        callback: impl Fn(&TransitionEvent) + 'static,
    ) -> Result<&Self> {
        self.listen(name, TransitionKind::Leave, callback)
    }

    /// Run `callback` whenever the viewport grows into `name`.
    pub fn on_crossed_min(
        &self,
        name: &str,
        callback: impl Fn(&TransitionEvent) + 'static,
    ) -> Result<&Self> {
        self.listen(name, TransitionKind::CrossedMin, callback)
    }

    /// Run `callback` whenever the viewport shrinks out of `name`.
    pub fn on_crossed_max(
        &self,
        name: &str,
        callback: impl Fn(&TransitionEvent) + 'static,
    ) -> Result<&Self> {
        self.listen(name, TransitionKind::CrossedMax, callback)
    }

    /// Number of listeners registered for (`name`, `kind`).
    #[must_use]
    pub fn listener_count(&self, name: &str, kind: TransitionKind) -> usize {
        self.shared.dispatch.borrow().listener_count(name, kind)
    }

    // -- Lifecycle ----------------------------------------------------------

    /// Re-evaluate the width and dispatch a transition if the active
    /// breakpoint changed.
    ///
    /// Called automatically on viewport signals unless the tracker was built
    /// [`detached`](TrackerBuilder::detached). A disposed tracker returns
    /// `Ok(None)`.
    pub fn handle_resize(&self) -> Result<Option<Transition>> {
        self.shared.handle_resize()
    }

    /// Detach from the viewport and drop every listener.
    ///
    /// Idempotent. Later signals and `handle_resize` calls do nothing;
    /// queries keep working against the current width.
    pub fn dispose(&mut self) {
        if self.shared.disposed.replace(true) {
            return;
        }
        self.subscription = None;
        let dropped = {
            let mut dispatch = self.shared.dispatch.borrow_mut();
            let count = dispatch.total_listeners();
            dispatch.clear();
            count
        };
        debug!(listeners_dropped = dropped, "breakpoint tracker disposed");
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.get()
    }
}

fn run_if(hit: bool, f: impl FnOnce()) -> bool {
    if hit {
        f();
    }
    hit
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
