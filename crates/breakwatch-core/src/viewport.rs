#![forbid(unsafe_code)]

//! Viewport width sources and resize signals.
//!
//! A tracker needs two things from its host: the current viewport width and
//! a signal when the size changes. [`ViewportSource`] names both.
//! [`Viewport`] is the host-driven implementation: the embedding environment
//! pushes width samples and every live subscriber is told about them.
//!
//! # Design
//!
//! [`Viewport`] keeps its state in shared, reference-counted storage
//! (`Rc<RefCell<..>>`). Cloning it yields another handle to the same width
//! and subscriber list. Subscribers are held weakly; the [`Subscription`]
//! guard returned by `subscribe` owns the callback.
//!
//! # Failure Modes
//!
//! - **Non-finite or negative samples**: ignored with a `debug!` event; the
//!   previous width stays in effect.
//! - **Subscriber leak**: callbacks live as long as their guards. Dead weak
//!   references are pruned lazily on the next signal.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

/// The two host capabilities a tracker depends on.
pub trait ViewportSource {
    /// Current viewport width in CSS pixels.
    fn width(&self) -> f64;

    /// Register `callback` to run on every size-change signal with the width
    /// at signal time. Dropping the returned guard detaches it.
    fn subscribe(&self, callback: Box<dyn Fn(f64)>) -> Subscription;
}

type CallbackRc = Rc<dyn Fn(f64)>;
type CallbackWeak = Weak<dyn Fn(f64)>;

struct ViewportInner {
    width: f64,
    /// Number of signals emitted so far.
    signals: u64,
    subscribers: Vec<CallbackWeak>,
}

/// Host-driven viewport width with resize signalling.
///
/// # Invariants
///
/// 1. `set_width(w)` with `w` equal to the current width emits nothing.
/// 2. [`Viewport::notify_resize`] always emits, mirroring a host resize
///    event that did not change the width.
/// 3. Subscribers run in registration order.
pub struct Viewport {
    inner: Rc<RefCell<ViewportInner>>,
}

impl Clone for Viewport {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Viewport")
            .field("width", &inner.width)
            .field("signals", &inner.signals)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl Viewport {
    /// Create a viewport with an initial width.
    ///
    /// Invalid initial widths are clamped to 0.
    #[must_use]
    pub fn new(width: f64) -> Self {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        Self {
            inner: Rc::new(RefCell::new(ViewportInner {
                width,
                signals: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Current width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.inner.borrow().width
    }

    /// Store a new width sample and signal subscribers if it changed.
    pub fn set_width(&self, width: f64) {
        if !width.is_finite() || width < 0.0 {
            debug!(width, "ignoring invalid viewport width sample");
            return;
        }
        {
            let mut inner = self.inner.borrow_mut();
            if inner.width == width {
                return;
            }
            inner.width = width;
        }
        self.notify();
    }

    /// Signal subscribers without changing the width.
    pub fn notify_resize(&self) {
        self.notify();
    }

    /// Number of signals emitted so far.
    #[must_use]
    pub fn signal_count(&self) -> u64 {
        self.inner.borrow().signals
    }

    /// Number of registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Subscribe to resize signals.
    pub fn on_resize(&self, callback: impl Fn(f64) + 'static) -> Subscription {
        let strong: CallbackRc = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    fn notify(&self) {
        // Collect live callbacks first so no borrow is held while they run.
        let (width, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            inner.signals += 1;
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let callbacks: Vec<CallbackRc> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (inner.width, callbacks)
        };
        trace!(width, subscribers = callbacks.len(), "viewport resize signal");
        for cb in &callbacks {
            cb(width);
        }
    }
}

impl ViewportSource for Viewport {
    fn width(&self) -> f64 {
        Viewport::width(self)
    }

    fn subscribe(&self, callback: Box<dyn Fn(f64)>) -> Subscription {
        self.on_resize(callback)
    }
}

impl<V: ViewportSource + ?Sized> ViewportSource for Rc<V> {
    fn width(&self) -> f64 {
        (**self).width()
    }

    fn subscribe(&self, callback: Box<dyn Fn(f64)>) -> Subscription {
        (**self).subscribe(callback)
    }
}

/// RAII guard for a resize callback.
///
/// Dropping it drops the strong reference to the callback, so the weak
/// entry held by the source no longer upgrades.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl Subscription {
    /// Wrap an arbitrary keep-alive value as a subscription guard.
    ///
    /// For [`ViewportSource`] implementations that manage their own
    /// listener storage.
    #[must_use]
    pub fn from_guard(guard: impl std::any::Any) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn initial_width() {
        assert_eq!(Viewport::new(800.0).width(), 800.0);
        assert_eq!(Viewport::new(-5.0).width(), 0.0);
        assert_eq!(Viewport::new(f64::NAN).width(), 0.0);
    }

    #[test]
    fn set_width_signals_on_change_only() {
        let vp = Viewport::new(500.0);
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let _sub = vp.on_resize(move |_| count_clone.set(count_clone.get() + 1));

        vp.set_width(700.0);
        assert_eq!(count.get(), 1);

        vp.set_width(700.0);
        assert_eq!(count.get(), 1);
        assert_eq!(vp.signal_count(), 1);
    }

    #[test]
    fn notify_resize_always_signals() {
        let vp = Viewport::new(500.0);
        let seen = Rc::new(Cell::new(0.0));
        let seen_clone = Rc::clone(&seen);
        let _sub = vp.on_resize(move |w| seen_clone.set(w));

        vp.notify_resize();
        assert_eq!(seen.get(), 500.0);
        assert_eq!(vp.signal_count(), 1);
    }

    #[test]
    fn invalid_samples_are_ignored() {
        let vp = Viewport::new(500.0);
        vp.set_width(f64::INFINITY);
        vp.set_width(-1.0);
        assert_eq!(vp.width(), 500.0);
        assert_eq!(vp.signal_count(), 0);
    }

    #[test]
    fn drop_unsubscribes() {
        let vp = Viewport::new(0.0);
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let sub = vp.on_resize(move |_| count_clone.set(count_clone.get() + 1));

        vp.set_width(1.0);
        drop(sub);
        vp.set_width(2.0);
        assert_eq!(count.get(), 1);
        assert_eq!(vp.subscriber_count(), 0);
    }

    #[test]
    fn clones_share_state() {
        let a = Viewport::new(100.0);
        let b = a.clone();
        b.set_width(300.0);
        assert_eq!(a.width(), 300.0);
    }

    #[test]
    fn subscriber_may_read_width() {
        let vp = Viewport::new(0.0);
        let reader = vp.clone();
        let seen = Rc::new(Cell::new(0.0));
        let seen_clone = Rc::clone(&seen);
        let _sub = vp.on_resize(move |_| seen_clone.set(reader.width()));
        vp.set_width(42.0);
        assert_eq!(seen.get(), 42.0);
    }

    #[test]
    fn trait_object_subscribe() {
        let vp: Rc<dyn ViewportSource> = Rc::new(Viewport::new(10.0));
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let sub = vp.subscribe(Box::new(move |_| count_clone.set(count_clone.get() + 1)));
        assert_eq!(vp.width(), 10.0);
        drop(sub);
        assert_eq!(count.get(), 0);
    }
}
