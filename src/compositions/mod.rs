//! Published compositions: creation, slugs, sanitized descriptions, and the
//! personalized timeline.

mod sanitize;
mod slug;
mod store;
mod types;

pub use sanitize::sanitize_description;
pub use slug::{normalize_title, slug_for};
pub use store::{
    assign_slug, compositions_by_artist, create_composition, find_by_id, find_by_slug,
    set_description, summary, timeline_for, update_composition,
};
pub use types::{
    Composition, CompositionError, CompositionSummary, CompositionUpdate, NewComposition,
    ReleaseKind,
};
