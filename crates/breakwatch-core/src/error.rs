#![forbid(unsafe_code)]

//! Error model for breakpoint tables and trackers.
//!
//! Every failure is local and synchronous. Nothing here is transient, so
//! nothing is retried: configuration problems surface at construction and
//! runtime queries can assume a valid table.

use std::fmt;

/// Why a breakpoint configuration was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigIssue {
    /// Breakpoint name is empty or only whitespace.
    EmptyName,
    /// Width is below zero.
    NegativeWidth(f64),
    /// Width is NaN or infinite.
    NonFiniteWidth(f64),
    /// Width has a fractional part.
    FractionalWidth(f64),
    /// Width does not fit a `u32` threshold.
    WidthOutOfRange(f64),
}

/// Errors produced by breakpoint lookups, table evaluation and configuration.
#[derive(Debug)]
pub enum BreakpointError {
    /// No breakpoint with this name exists in the table.
    NotFound { name: String },
    /// A configured breakpoint is malformed.
    InvalidConfig { name: String, issue: ConfigIssue },
    /// The current width matched no breakpoint range.
    ///
    /// Happens for an empty table or one whose smallest threshold is above
    /// the observed width.
    NoActiveBreakpoint { width: f64 },
    /// A configuration file could not be read.
    Io(std::io::Error),
    /// A configuration document could not be parsed.
    Parse(String),
}

/// Standard result type for breakwatch APIs.
pub type Result<T> = std::result::Result<T, BreakpointError>;

impl BreakpointError {
    /// Shorthand for [`BreakpointError::NotFound`].
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Error kind label for tracing fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidConfig { .. } => "invalid_config",
            Self::NoActiveBreakpoint { .. } => "no_active_breakpoint",
            Self::Io(_) => "io",
            Self::Parse(_) => "parse",
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name is empty"),
            Self::NegativeWidth(w) => write!(f, "width {w} is negative"),
            Self::NonFiniteWidth(w) => write!(f, "width {w} is not finite"),
            Self::FractionalWidth(w) => write!(f, "width {w} is not a whole number"),
            Self::WidthOutOfRange(w) => write!(f, "width {w} exceeds {}", u32::MAX),
        }
    }
}

impl fmt::Display for BreakpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { name } => write!(f, "unknown breakpoint '{name}'"),
            Self::InvalidConfig { name, issue } => {
                write!(f, "invalid breakpoint '{name}': {issue}")
            }
            Self::NoActiveBreakpoint { width } => {
                write!(f, "no breakpoint matches viewport width {width}")
            }
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
        }
    }
}

impl std::error::Error for BreakpointError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BreakpointError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
