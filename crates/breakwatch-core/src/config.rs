#![forbid(unsafe_code)]

//! Tracker options, caller breakpoint overrides, and the default-merge helper.
//!
//! [`merge_points`] seeds the built-in table (unless told not to), applies
//! caller overrides by name, validates every width, and produces the
//! immutable [`BreakpointTable`].
//!
//! # Loading
//!
//! With the `config` feature a [`TrackerConfig`] can be read from TOML or
//! JSON. Point maps keep document order, so equal widths sort in the order
//! they were declared.
//!
//! ```toml
//! [options]
//! remove_default_breakpoints = true
//! class_prefix = "bp-"
//!
//! [points]
//! small = 0
//! large = 500
//! ```
//!
//! ```rust,ignore
//! let config = TrackerConfig::from_toml_file("breakpoints.toml")?;
//! let table = config.build_table()?;
//! ```

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::breakpoint::{Breakpoint, BreakpointTable};
use crate::error::{BreakpointError, ConfigIssue, Result};

/// Built-in seed table, in merge order.
pub const DEFAULT_BREAKPOINTS: [(&str, u32); 5] = [
    ("phone", 0),
    ("tabletPortrait", 600),
    ("tabletLandscape", 900),
    ("desktop", 1200),
    ("bigDesktop", 1800),
];

/// Default prefix for presentation marker classes.
pub const DEFAULT_CLASS_PREFIX: &str = "mgb-";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Behaviour switches for a tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TrackerOptions {
    /// Skip the built-in seed table; only caller points are used.
    #[cfg_attr(feature = "config", serde(alias = "removeDefaultBreakpoints"))]
    pub remove_default_breakpoints: bool,
    /// Keep a presentation marker for the active breakpoint on the
    /// document root.
    #[cfg_attr(feature = "config", serde(alias = "updateBodyClass"))]
    pub update_body_class: bool,
    /// Prefix of the marker class (`mgb-` gives `mgb-desktop`).
    #[cfg_attr(feature = "config", serde(alias = "classPrefix"))]
    pub class_prefix: String,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            remove_default_breakpoints: false,
            update_body_class: true,
            class_prefix: DEFAULT_CLASS_PREFIX.to_string(),
        }
    }
}

impl TrackerOptions {
    /// Set whether the seed table is dropped (builder pattern).
    #[must_use]
    pub fn remove_default_breakpoints(mut self, remove: bool) -> Self {
        self.remove_default_breakpoints = remove;
        self
    }

    /// Set whether the marker class is maintained (builder pattern).
    #[must_use]
    pub fn update_body_class(mut self, update: bool) -> Self {
        self.update_body_class = update;
        self
    }

    /// Set the marker class prefix (builder pattern).
    #[must_use]
    pub fn class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Caller points
// ---------------------------------------------------------------------------

/// Caller-supplied breakpoint overrides, in declaration order.
///
/// Widths are kept as raw numbers until [`merge_points`] validates them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointSet {
    entries: Vec<(String, f64)>,
}

impl PointSet {
    /// Empty override set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an override (builder pattern).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, width: impl Into<f64>) -> Self {
        self.insert(name, width);
        self
    }

    /// Add an override. Repeated names are resolved at merge time.
    pub fn insert(&mut self, name: impl Into<String>, width: impl Into<f64>) {
        self.entries.push((name.into(), width.into()));
    }

    /// Number of overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no overrides were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overrides in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, w)| (n.as_str(), *w))
    }
}

impl<S: Into<String>, W: Into<f64>> FromIterator<(S, W)> for PointSet {
    fn from_iter<I: IntoIterator<Item = (S, W)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, width) in iter {
            set.insert(name, width);
        }
        set
    }
}

#[cfg(feature = "config")]
impl Serialize for PointSet {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, width) in &self.entries {
            map.serialize_entry(name, width)?;
        }
        map.end()
    }
}

#[cfg(feature = "config")]
impl<'de> Deserialize<'de> for PointSet {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        struct PointSetVisitor;

        impl<'de> serde::de::Visitor<'de> for PointSetVisitor {
            type Value = PointSet;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of breakpoint names to widths")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<PointSet, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut set = PointSet::new();
                while let Some((name, width)) = access.next_entry::<String, f64>()? {
                    set.insert(name, width);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(PointSetVisitor)
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Validate a raw width and convert it to a threshold.
pub fn validate_width(name: &str, width: f64) -> Result<u32> {
    let issue = if name.trim().is_empty() {
        Some(ConfigIssue::EmptyName)
    } else if !width.is_finite() {
        Some(ConfigIssue::NonFiniteWidth(width))
    } else if width < 0.0 {
        Some(ConfigIssue::NegativeWidth(width))
    } else if width.fract() != 0.0 {
        Some(ConfigIssue::FractionalWidth(width))
    } else if width > f64::from(u32::MAX) {
        Some(ConfigIssue::WidthOutOfRange(width))
    } else {
        None
    };
    match issue {
        Some(issue) => Err(BreakpointError::InvalidConfig {
            name: name.to_string(),
            issue,
        }),
        // Whole, non-negative and within range: the cast is exact.
        None => Ok(width as u32),
    }
}

/// Merge caller overrides into the seed table and sort the result.
///
/// Overrides replace seed entries with the same (case-insensitive) name
/// and append new ones. The first invalid width aborts the merge.
pub fn merge_points(points: &PointSet, remove_defaults: bool) -> Result<BreakpointTable> {
    let seed = DEFAULT_BREAKPOINTS
        .iter()
        .filter(|_| !remove_defaults)
        .map(|&(name, width)| Breakpoint::new(name, width));

    let overrides = points
        .iter()
        .map(|(name, width)| validate_width(name, width).map(|t| Breakpoint::new(name, t)))
        .collect::<Result<Vec<_>>>()?;

    let table = BreakpointTable::new(seed.chain(overrides));
    if !table.has_zero_floor() {
        warn!(
            breakpoints = table.len(),
            smallest = table.get(0).map(Breakpoint::threshold),
            "breakpoint table has no zero threshold; narrow widths will match nothing"
        );
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// TrackerConfig
// ---------------------------------------------------------------------------

/// Complete tracker configuration: options plus caller points.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TrackerConfig {
    /// Behaviour switches.
    pub options: TrackerOptions,
    /// Caller breakpoint overrides.
    pub points: PointSet,
}

impl TrackerConfig {
    /// Configuration from parts.
    #[must_use]
    pub fn new(points: PointSet, options: TrackerOptions) -> Self {
        Self { options, points }
    }

    /// Merge the configured points into a table.
    pub fn build_table(&self) -> Result<BreakpointTable> {
        merge_points(&self.points, self.options.remove_default_breakpoints)
    }

    /// Collect every problem in the configuration. An empty list means the
    /// configuration builds a usable table.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors: Vec<String> = self
            .points
            .iter()
            .filter_map(|(name, width)| validate_width(name, width).err())
            .map(|e| e.to_string())
            .collect();
        if self.options.remove_default_breakpoints && self.points.is_empty() {
            errors.push("no breakpoints configured".to_string());
        }
        errors
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BreakpointError::Parse(e.to_string()))
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| BreakpointError::Parse(e.to_string()))
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
