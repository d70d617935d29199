#![forbid(unsafe_code)]

//! breakwatch public facade crate.
//!
//! Re-exports the breakpoint table, tracker, and host adapters from the
//! internal crates and offers a prelude for day-to-day usage.
//!
//! ```ignore
//! use breakwatch::prelude::*;
//!
//! let host = WebHost::new(1024.0, 768.0);
//! let tracker = host.tracker(PointSet::new(), TrackerOptions::default())?;
//! tracker.on_enter("desktop", |_| println!("desktop layout"))?;
//! host.resize(1280.0, 768.0);
//! ```

// --- Core re-exports -------------------------------------------------------

pub use breakwatch_core::{
    ActiveState, Breakpoint, BreakpointError, BreakpointRange, BreakpointTable, ClassMarker,
    ConfigIssue, DEFAULT_BREAKPOINTS, DEFAULT_CLASS_PREFIX, PointSet, Result, Subscription,
    TrackerConfig, TrackerOptions, Viewport, ViewportSource, marker_class, merge_points, name_key,
};

// --- Runtime re-exports ----------------------------------------------------

pub use breakwatch_runtime::{
    BreakpointTracker, Direction, Transition, TrackerBuilder, TransitionEvent, TransitionKind,
};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use breakwatch_web::{ClassList, WebHost, WebViewport};

/// Top-level error type.
pub type Error = BreakpointError;

/// Common imports for tracker setup.
pub mod prelude {
    pub use crate::{
        Breakpoint, BreakpointError, BreakpointTracker, ClassMarker, Error, PointSet, Result,
        TrackerOptions, TransitionEvent, TransitionKind, Viewport, ViewportSource,
    };

    #[cfg(feature = "web")]
    pub use crate::{ClassList, WebHost, WebViewport};

    pub use crate::{core, runtime};
}

pub use breakwatch_core as core;
pub use breakwatch_runtime as runtime;
#[cfg(feature = "web")]
pub use breakwatch_web as web;
