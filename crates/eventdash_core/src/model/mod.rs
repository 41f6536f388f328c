//! Dashboard domain model.
//!
//! # Responsibility
//! - Define typed rows for events, attendees and tasks.
//! - Define categorical fields with a declared order and exact stored labels.
//!
//! # Invariants
//! - Field names at the storage boundary never change (`*_COLUMNS`).
//! - Unknown categorical labels are kept, never rejected. Surrounding
//!   whitespace is dropped from every label, known or not.

pub mod attendee;
pub mod event;
pub mod task;

/// Categorical field persisted as a human-readable label.
///
/// Implementors keep a declared order for known variants. Reporting relies on
/// that order to keep chart output deterministic.
pub trait Category: Clone + Eq {
    /// Known variants in declared order.
    fn declared() -> Vec<Self>;

    /// Exact label written to storage.
    fn label(&self) -> &str;

    /// Maps a stored label to a variant, keeping unknown text (trimmed).
    fn from_label(label: &str) -> Self;

    /// Position in [`Category::declared`], `None` for unknown labels.
    fn rank(&self) -> Option<usize> {
        Self::declared().iter().position(|known| known == self)
    }

    /// Case-insensitive lookup restricted to known variants.
    ///
    /// Used by input surfaces that should reject typos instead of storing them.
    fn parse_known(input: &str) -> Option<Self> {
        let wanted = input.trim();
        Self::declared()
            .into_iter()
            .find(|known| known.label().eq_ignore_ascii_case(wanted))
    }
}
