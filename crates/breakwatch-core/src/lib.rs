#![forbid(unsafe_code)]

//! Core types for breakwatch.
//!
//! This crate holds everything a breakpoint tracker needs that is not the
//! tracker itself: the ordered [`BreakpointTable`], the default-merge helper
//! [`merge_points`], tracker [`TrackerOptions`], the host capabilities
//! ([`ViewportSource`], [`ClassMarker`]) and the error model.
//!
//! # Role in breakwatch
//! `breakwatch-runtime` builds the tracker on top of these types;
//! `breakwatch-web` implements the host capabilities for a browser-like
//! embedding.

pub mod breakpoint;
pub mod config;
pub mod error;
pub mod marker;
pub mod viewport;

pub use breakpoint::{ActiveState, Breakpoint, BreakpointRange, BreakpointTable, name_key};
pub use config::{
    DEFAULT_BREAKPOINTS, DEFAULT_CLASS_PREFIX, PointSet, TrackerConfig, TrackerOptions,
    merge_points, validate_width,
};
pub use error::{BreakpointError, ConfigIssue, Result};
pub use marker::{ClassMarker, marker_class};
pub use viewport::{Subscription, Viewport, ViewportSource};
