//! Domain services enforcing validation and cross-entity integrity
//!
//! Uniqueness is checked before every write as a fast path; the store's own
//! unique indexes remain the authoritative guard, and their violations are
//! reported with the same errors.

pub mod note;
pub mod user;

pub use note::NoteService;
pub use user::UserService;

/// Listing an empty collection fails with `NotFound` instead of returning
/// an empty success.
pub const EMPTY_LIST_IS_NOT_FOUND: bool = true;
