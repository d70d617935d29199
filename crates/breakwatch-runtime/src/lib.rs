#![forbid(unsafe_code)]

//! Breakwatch Runtime
//!
//! The breakpoint tracker and its notification machinery.
//!
//! # Key Components
//!
//! - [`BreakpointTracker`] - Detects the active breakpoint and dispatches transitions
//! - [`TrackerBuilder`] - Step-by-step tracker construction
//! - [`Transition`] - A planned change of active breakpoint
//! - [`TransitionEvent`] / [`TransitionKind`] - Typed enter/leave/crossing notifications
//! - [`DispatchTable`] - Per-breakpoint, per-kind listener lists
//!
//! # Role in breakwatch
//! `breakwatch-runtime` sits between the host capabilities defined in
//! `breakwatch-core` and the application. The host drives a
//! [`ViewportSource`](breakwatch_core::ViewportSource); the tracker turns
//! its signals into notifications and keeps the class marker in sync.

pub mod dispatch;
pub mod tracker;
pub mod transition;

pub use dispatch::{DispatchTable, Listener, NotificationKey};
pub use tracker::{BreakpointTracker, TrackerBuilder};
pub use transition::{Direction, Transition, TransitionEvent, TransitionKind};
