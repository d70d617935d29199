#![forbid(unsafe_code)]

//! Dispatch table from (breakpoint, kind) to ordered listener lists.
//!
//! One channel is created per breakpoint per [`TransitionKind`] when the
//! table is built, keyed by the lower-cased breakpoint name. Channels are
//! never added or removed afterwards; only their listener lists change.
//!
//! Listeners are stored as `Rc` so a dispatcher can clone the list out of
//! the table and invoke it without holding any borrow.

use std::rc::Rc;

use breakwatch_core::{BreakpointError, BreakpointTable, Result, name_key};
use rustc_hash::FxHashMap;

use crate::transition::{TransitionEvent, TransitionKind};

/// A registered notification callback.
pub type Listener = Rc<dyn Fn(&TransitionEvent)>;

/// Stable identity of a notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationKey {
    breakpoint: String,
    kind: TransitionKind,
}

impl NotificationKey {
    /// Key for `kind` notifications of the breakpoint called `name`.
    #[must_use]
    pub fn new(name: &str, kind: TransitionKind) -> Self {
        Self {
            breakpoint: name_key(name),
            kind,
        }
    }

    /// Lower-cased breakpoint name.
    #[must_use]
    pub fn breakpoint(&self) -> &str {
        &self.breakpoint
    }

    /// Notification kind.
    #[must_use]
    pub const fn kind(&self) -> TransitionKind {
        self.kind
    }

    /// Notification name, e.g. `desktopenter`.
    #[must_use]
    pub fn event_name(&self) -> String {
        format!("{}{}", self.breakpoint, self.kind.suffix())
    }
}

/// Listener lists for every channel of a breakpoint table.
#[derive(Default)]
pub struct DispatchTable {
    channels: FxHashMap<NotificationKey, Vec<Listener>>,
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchTable")
            .field("channels", &self.channels.len())
            .field("listeners", &self.total_listeners())
            .finish()
    }
}

impl DispatchTable {
    /// Create the four channels for every breakpoint in `table`.
    #[must_use]
    pub fn for_table(table: &BreakpointTable) -> Self {
        let channels = table
            .iter()
            .flat_map(|bp| {
                TransitionKind::ALL
                    .into_iter()
                    .map(move |kind| (NotificationKey::new(bp.name(), kind), Vec::new()))
            })
            .collect();
        Self { channels }
    }

    /// Append `listener` to the channel for (`name`, `kind`).
    pub fn register(
        &mut self,
        name: &str,
        kind: TransitionKind,
        listener: Listener,
    ) -> Result<()> {
        self.channels
            .get_mut(&NotificationKey::new(name, kind))
            .map(|list| list.push(listener))
            .ok_or_else(|| BreakpointError::not_found(name))
    }

    /// Listeners for `event`, in registration order.
    #[must_use]
    pub fn listeners(&self, event: &TransitionEvent) -> Vec<Listener> {
        self.channels
            .get(&NotificationKey::new(event.breakpoint(), event.kind()))
            .cloned()
            .unwrap_or_default()
    }

    /// Number of listeners on one channel.
    #[must_use]
    pub fn listener_count(&self, name: &str, kind: TransitionKind) -> usize {
        self.channels
            .get(&NotificationKey::new(name, kind))
            .map_or(0, Vec::len)
    }

    /// Number of listeners across all channels.
    #[must_use]
    pub fn total_listeners(&self) -> usize {
        self.channels.values().map(Vec::len).sum()
    }

    /// Number of channels.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Whether a channel exists for this key.
    #[must_use]
    pub fn contains(&self, key: &NotificationKey) -> bool {
        self.channels.contains_key(key)
    }

    /// Drop every listener. Channels stay in place.
    pub fn clear(&mut self) {
        for list in self.channels.values_mut() {
            list.clear();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
