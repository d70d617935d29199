#![forbid(unsafe_code)]

//! Presentation markers for the active breakpoint.
//!
//! A tracker with `update_body_class` enabled keeps one class on the
//! document root naming the active breakpoint. The document itself belongs
//! to the host; the tracker only talks to it through [`ClassMarker`].

use crate::breakpoint::name_key;

/// Host capability that adds and removes the active-breakpoint marker.
pub trait ClassMarker {
    /// Add the `added` class and remove the `removed` class.
    ///
    /// Both are complete class names as produced by [`marker_class`].
    fn apply(&mut self, added: Option<&str>, removed: Option<&str>);
}

impl<M: ClassMarker + ?Sized> ClassMarker for Box<M> {
    fn apply(&mut self, added: Option<&str>, removed: Option<&str>) {
        (**self).apply(added, removed);
    }
}

/// Class name for a breakpoint: `prefix` followed by the lower-cased name.
#[must_use]
pub fn marker_class(prefix: &str, name: &str) -> String {
    let mut class = String::with_capacity(prefix.len() + name.len());
    class.push_str(prefix);
    class.push_str(&name_key(name));
    class
}
