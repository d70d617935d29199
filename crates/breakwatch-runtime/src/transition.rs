#![forbid(unsafe_code)]

//! Typed transition notifications and the transition planner.
//!
//! When the active breakpoint changes from `previous` to `next`,
//! [`Transition::plan`] produces the notifications in their fixed order:
//!
//! 1. `Enter(next)`
//! 2. `Leave(previous)`
//! 3. `CrossedMin(next)` when the threshold grew, or `CrossedMax(previous)`
//!    when it shrank. Never both.
//!
//! Planning is pure; dispatching the events is the tracker's job.

use std::fmt;

use breakwatch_core::{Breakpoint, name_key};

/// The four notification kinds a breakpoint can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransitionKind {
    /// The breakpoint became active.
    Enter,
    /// The breakpoint stopped being active.
    Leave,
    /// The viewport grew into this breakpoint.
    CrossedMin,
    /// The viewport shrank out of this breakpoint.
    CrossedMax,
}

impl TransitionKind {
    /// All kinds in dispatch order.
    pub const ALL: [Self; 4] = [Self::Enter, Self::Leave, Self::CrossedMin, Self::CrossedMax];

    /// Suffix appended to the lower-cased breakpoint name to form the
    /// notification name.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Leave => "leave",
            Self::CrossedMin => "min",
            Self::CrossedMax => "max",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A notification raised for one breakpoint during a transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransitionEvent {
    /// `name` became active.
    Enter(String),
    /// `name` stopped being active.
    Leave(String),
    /// The viewport grew past the lower bound of `name`.
    CrossedMin(String),
    /// The viewport shrank past the lower bound of the next breakpoint
    /// above `name`, leaving `name`.
    CrossedMax(String),
}

impl TransitionEvent {
    /// Build an event of `kind` for `breakpoint`.
    #[must_use]
    pub fn new(kind: TransitionKind, breakpoint: impl Into<String>) -> Self {
        let name = breakpoint.into();
        match kind {
            TransitionKind::Enter => Self::Enter(name),
            TransitionKind::Leave => Self::Leave(name),
            TransitionKind::CrossedMin => Self::CrossedMin(name),
            TransitionKind::CrossedMax => Self::CrossedMax(name),
        }
    }

    /// The event's kind.
    #[must_use]
    pub fn kind(&self) -> TransitionKind {
        match self {
            Self::Enter(_) => TransitionKind::Enter,
            Self::Leave(_) => TransitionKind::Leave,
            Self::CrossedMin(_) => TransitionKind::CrossedMin,
            Self::CrossedMax(_) => TransitionKind::CrossedMax,
        }
    }

    /// Name of the breakpoint the event is about.
    #[must_use]
    pub fn breakpoint(&self) -> &str {
        match self {
            Self::Enter(name)
            | Self::Leave(name)
            | Self::CrossedMin(name)
            | Self::CrossedMax(name) => name,
        }
    }

    /// Notification name: lower-cased breakpoint name followed by the kind
    /// suffix, e.g. `tabletportraitenter`.
    #[must_use]
    pub fn event_name(&self) -> String {
        let mut name = name_key(self.breakpoint());
        name.push_str(self.kind().suffix());
        name
    }
}

impl fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.event_name())
    }
}

/// Which way the viewport moved across a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The new breakpoint has a larger threshold.
    Grow,
    /// The new breakpoint has a smaller threshold.
    Shrink,
    /// Both thresholds are equal; no crossing notification is raised.
    Level,
}

impl Direction {
    /// Label for tracing fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grow => "grow",
            Self::Shrink => "shrink",
            Self::Level => "level",
        }
    }
}

/// A detected change of active breakpoint and the notifications it raises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Previously active breakpoint.
    pub from: Breakpoint,
    /// Newly active breakpoint.
    pub to: Breakpoint,
    /// Notifications in dispatch order.
    pub events: Vec<TransitionEvent>,
}

impl Transition {
    /// Plan the notifications for moving from `previous` to `next`.
    ///
    /// Returns `None` when both name the same breakpoint.
    #[must_use]
    pub fn plan(previous: &Breakpoint, next: &Breakpoint) -> Option<Self> {
        if next.is_named(previous.name()) {
            return None;
        }

        let mut events = Vec::with_capacity(3);
        events.push(TransitionEvent::Enter(next.name().to_string()));
        events.push(TransitionEvent::Leave(previous.name().to_string()));
        if next.threshold() > previous.threshold() {
            events.push(TransitionEvent::CrossedMin(next.name().to_string()));
        } else if next.threshold() < previous.threshold() {
            events.push(TransitionEvent::CrossedMax(previous.name().to_string()));
        }

        Some(Self {
            from: previous.clone(),
            to: next.clone(),
            events,
        })
    }

    /// Direction of the move.
    #[must_use]
    pub fn direction(&self) -> Direction {
        match self.to.threshold().cmp(&self.from.threshold()) {
            std::cmp::Ordering::Greater => Direction::Grow,
            std::cmp::Ordering::Less => Direction::Shrink,
            std::cmp::Ordering::Equal => Direction::Level,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
