#![forbid(unsafe_code)]

//! Named width thresholds and the ordered table that classifies widths.
//!
//! A [`BreakpointTable`] is an ascending sequence of [`Breakpoint`]s. Each
//! breakpoint owns the half-open range `[threshold, next_threshold)`; the
//! last one owns `[threshold, +inf)`.
//!
//! # Invariants
//!
//! 1. Entries are sorted ascending by threshold; equal thresholds keep
//!    insertion order (stable sort).
//! 2. Names are unique under case-insensitive comparison.
//! 3. The table never changes after construction.
//! 4. For a table whose first threshold is 0, [`BreakpointTable::classify`]
//!    matches exactly one breakpoint for every non-negative width.
//!
//! # Failure Modes
//!
//! - Empty table, or a width below the smallest threshold:
//!   [`BreakpointError::NoActiveBreakpoint`].
//! - Unknown name: [`BreakpointError::NotFound`].

use std::fmt;

use crate::error::{BreakpointError, Result};

// ---------------------------------------------------------------------------
// Breakpoint
// ---------------------------------------------------------------------------

/// A named viewport-width threshold marking the start of a responsive range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Breakpoint {
    name: String,
    threshold: u32,
}

impl Breakpoint {
    /// Create a breakpoint.
    #[must_use]
    pub fn new(name: impl Into<String>, threshold: u32) -> Self {
        Self {
            name: name.into(),
            threshold,
        }
    }

    /// Name as configured.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width at which this breakpoint's range starts.
    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Lower-cased name, the identity used for notification keys and
    /// presentation markers.
    #[must_use]
    pub fn key(&self) -> String {
        name_key(&self.name)
    }

    /// Case-insensitive name comparison.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.threshold)
    }
}

/// Case-insensitive identity of a breakpoint name.
///
/// Table merging, lookups, notification keys and marker classes all compare
/// names through this one function.
#[must_use]
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a == b || name_key(a) == name_key(b)
}

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

/// The width interval a breakpoint is active for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakpointRange {
    /// Inclusive lower bound.
    pub start: u32,
    /// Exclusive upper bound; `None` for the widest breakpoint.
    pub end: Option<u32>,
}

impl BreakpointRange {
    /// Whether `width` falls inside `[start, end)`.
    #[must_use]
    pub fn contains(&self, width: f64) -> bool {
        if width < f64::from(self.start) {
            return false;
        }
        match self.end {
            Some(end) => width < f64::from(end),
            None => true,
        }
    }

    /// Whether the interval holds no widths (shadowed by an equal threshold).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.end, Some(end) if end <= self.start)
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Ordered, immutable sequence of breakpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BreakpointTable {
    points: Vec<Breakpoint>,
}

impl BreakpointTable {
    /// Build a table from breakpoints in merge order.
    ///
    /// A later entry whose name matches an earlier one (case-insensitively)
    /// replaces it in place. The result is then stably sorted by threshold.
    #[must_use]
    pub fn new(points: impl IntoIterator<Item = Breakpoint>) -> Self {
        let mut merged: Vec<Breakpoint> = Vec::new();
        for point in points {
            match merged.iter_mut().find(|p| p.is_named(&point.name)) {
                Some(existing) => *existing = point,
                None => merged.push(point),
            }
        }
        merged.sort_by_key(Breakpoint::threshold);
        Self { points: merged }
    }

    /// Number of breakpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the table has no breakpoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Breakpoints in ascending order.
    pub fn iter(&self) -> std::slice::Iter<'_, Breakpoint> {
        self.points.iter()
    }

    /// Breakpoint names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(Breakpoint::name)
    }

    /// Breakpoint at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Breakpoint> {
        self.points.get(index)
    }

    /// Index of the breakpoint called `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.points.iter().position(|p| p.is_named(name))
    }

    /// Look a breakpoint up by name.
    pub fn lookup(&self, name: &str) -> Result<&Breakpoint> {
        self.position(name)
            .map(|i| &self.points[i])
            .ok_or_else(|| BreakpointError::not_found(name))
    }

    /// Whether the smallest threshold is 0, so every width classifies.
    #[must_use]
    pub fn has_zero_floor(&self) -> bool {
        self.points.first().is_some_and(|p| p.threshold == 0)
    }

    /// Active range of the breakpoint at `index`.
    #[must_use]
    pub fn range_at(&self, index: usize) -> Option<BreakpointRange> {
        let point = self.points.get(index)?;
        Some(BreakpointRange {
            start: point.threshold,
            end: self.points.get(index + 1).map(Breakpoint::threshold),
        })
    }

    /// Active range of the breakpoint called `name`.
    pub fn range_of(&self, name: &str) -> Result<BreakpointRange> {
        self.position(name)
            .and_then(|i| self.range_at(i))
            .ok_or_else(|| BreakpointError::not_found(name))
    }

    /// Return the first breakpoint, in table order, whose range contains
    /// `width`.
    pub fn classify(&self, width: f64) -> Result<&Breakpoint> {
        (0..self.points.len())
            .find(|&i| self.range_at(i).is_some_and(|r| r.contains(width)))
            .map(|i| &self.points[i])
            .ok_or(BreakpointError::NoActiveBreakpoint { width })
    }
}

impl<'a> IntoIterator for &'a BreakpointTable {
    type Item = &'a Breakpoint;
    type IntoIter = std::slice::Iter<'a, Breakpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

// ---------------------------------------------------------------------------
// Active state
// ---------------------------------------------------------------------------

/// Which breakpoint a tracker currently believes is active, and the width
/// sample it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveState {
    breakpoint: Breakpoint,
    observed_width: f64,
}

impl ActiveState {
    /// Record `breakpoint` as active for `observed_width`.
    #[must_use]
    pub fn new(breakpoint: Breakpoint, observed_width: f64) -> Self {
        Self {
            breakpoint,
            observed_width,
        }
    }

    /// The active breakpoint.
    #[must_use]
    pub fn breakpoint(&self) -> &Breakpoint {
        &self.breakpoint
    }

    /// Width sample the state was computed from.
    #[must_use]
    pub fn observed_width(&self) -> f64 {
        self.observed_width
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BreakpointTable {
        BreakpointTable::new([
            Breakpoint::new("phone", 0),
            Breakpoint::new("tablet", 600),
            Breakpoint::new("desktop", 1200),
        ])
    }

    #[test]
    fn sorts_ascending() {
        let t = BreakpointTable::new([
            Breakpoint::new("desktop", 1200),
            Breakpoint::new("phone", 0),
            Breakpoint::new("tablet", 600),
        ]);
        assert_eq!(t.names().collect::<Vec<_>>(), ["phone", "tablet", "desktop"]);
    }

    #[test]
    fn later_entry_overwrites_in_place() {
        let t = BreakpointTable::new([
            Breakpoint::new("phone", 0),
            Breakpoint::new("tablet", 600),
            Breakpoint::new("Tablet", 700),
        ]);
        assert_eq!(t.len(), 2);
        let tablet = t.lookup("tablet").unwrap();
        assert_eq!(tablet.name(), "Tablet");
        assert_eq!(tablet.threshold(), 700);
    }

    #[test]
    fn ties_keep_merge_order() {
        let t = BreakpointTable::new([
            Breakpoint::new("base", 0),
            Breakpoint::new("b", 500),
            Breakpoint::new("a", 500),
        ]);
        assert_eq!(t.names().collect::<Vec<_>>(), ["base", "b", "a"]);
        // The later of two equal thresholds owns the range; the earlier is shadowed.
        assert!(t.range_of("b").unwrap().is_empty());
        assert_eq!(t.classify(500.0).unwrap().name(), "a");
    }

    #[test]
    fn classify_half_open_ranges() {
        let t = table();
        assert_eq!(t.classify(0.0).unwrap().name(), "phone");
        assert_eq!(t.classify(599.0).unwrap().name(), "phone");
        assert_eq!(t.classify(599.5).unwrap().name(), "phone");
        assert_eq!(t.classify(600.0).unwrap().name(), "tablet");
        assert_eq!(t.classify(1199.9).unwrap().name(), "tablet");
        assert_eq!(t.classify(1200.0).unwrap().name(), "desktop");
        assert_eq!(t.classify(1e9).unwrap().name(), "desktop");
    }

    #[test]
    fn classify_empty_table_fails() {
        let t = BreakpointTable::default();
        assert!(matches!(
            t.classify(100.0),
            Err(BreakpointError::NoActiveBreakpoint { .. })
        ));
    }

    #[test]
    fn classify_below_floor_fails() {
        let t = BreakpointTable::new([Breakpoint::new("wide", 800)]);
        assert!(!t.has_zero_floor());
        assert!(t.classify(400.0).is_err());
        assert_eq!(t.classify(800.0).unwrap().name(), "wide");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let t = table();
        assert_eq!(t.lookup("DESKTOP").unwrap().threshold(), 1200);
        assert!(matches!(
            t.lookup("unknown"),
            Err(BreakpointError::NotFound { ref name }) if name == "unknown"
        ));
    }

    #[test]
    fn ranges() {
        let t = table();
        assert_eq!(
            t.range_of("tablet").unwrap(),
            BreakpointRange {
                start: 600,
                end: Some(1200)
            }
        );
        assert_eq!(t.range_of("desktop").unwrap().end, None);
        assert!(t.range_at(3).is_none());
    }

    #[test]
    fn key_is_lowercase() {
        assert_eq!(Breakpoint::new("TabletPortrait", 600).key(), "tabletportrait");
    }

    #[test]
    fn final_sigma_names_share_one_identity() {
        // "ΑΣ" lowercases to "ας" as a whole word, so both spell one breakpoint.
        assert_eq!(name_key("ΑΣ"), "ας");
        let t = BreakpointTable::new([
            Breakpoint::new("base", 0),
            Breakpoint::new("ΑΣ", 500),
            Breakpoint::new("ας", 1000),
        ]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.lookup("ΑΣ").unwrap().name(), "ας");
        assert_eq!(t.lookup("ας").unwrap().threshold(), 1000);
        assert!(t.lookup("ασ").is_err());
        assert_eq!(Breakpoint::new("ΑΣ", 0).key(), name_key("ας"));
    }

    #[test]
    fn display() {
        assert_eq!(Breakpoint::new("phone", 0).to_string(), "phone@0");
    }
}
