use crate::{
    errors::ServerError,
    models::note::{NewNote, Note},
};

pub mod memory;
pub mod pg;

pub use memory::MemoryNoteStore;
pub use pg::{PgNoteStore, Pool};

/// Data access for notes. Every call is blocking; handlers run them on the
/// actix blocking pool.
///
/// Mutating calls return `Ok(None)` when no row matched.
pub trait NoteStore: Send + Sync {
    /// All notes, newest `created_at` first.
    fn list(&self) -> Result<Vec<Note>, ServerError>;

    fn find(&self, note_id: &str) -> Result<Option<Note>, ServerError>;

    fn insert(&self, note: NewNote) -> Result<Note, ServerError>;

    /// Replaces the transcript, marks the note edited and clears its summary.
    fn update_transcript(&self, note_id: &str, transcript: &str)
        -> Result<Option<Note>, ServerError>;

    /// Stores `summary` only if the note still carries `summarized` as its
    /// transcript.
    fn set_summary(
        &self,
        note_id: &str,
        summarized: &str,
        summary: &str,
    ) -> Result<Option<Note>, ServerError>;

    /// Removes the record and hands it back so the caller can clean up the upload.
    fn delete(&self, note_id: &str) -> Result<Option<Note>, ServerError>;
}
