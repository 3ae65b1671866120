use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::NoteStore;
use crate::{
    errors::ServerError,
    models::note::{NewNote, Note},
};

/// Process-local store backing the test suite.
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: Mutex<Vec<Note>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Note>>, ServerError> {
        self.notes.lock().map_err(|_| ServerError::BlockingError)
    }
}

impl NoteStore for MemoryNoteStore {
    fn list(&self) -> Result<Vec<Note>, ServerError> {
        // same order as the Postgres listing: created_at, then id, both descending
        let mut result: Vec<Note> = self.lock()?.clone();
        result.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(result)
    }

    fn find(&self, note_id: &str) -> Result<Option<Note>, ServerError> {
        Ok(self.lock()?.iter().find(|n| n.id == note_id).cloned())
    }

    fn insert(&self, note: NewNote) -> Result<Note, ServerError> {
        let mut notes = self.lock()?;
        let mut note = note;
        while notes.iter().any(|n| n.id == note.id) {
            note.regenerate_id();
        }
        let note = note.into_note();
        notes.push(note.clone());
        Ok(note)
    }

    fn update_transcript(
        &self,
        note_id: &str,
        transcript: &str,
    ) -> Result<Option<Note>, ServerError> {
        let mut notes = self.lock()?;
        Ok(notes.iter_mut().find(|n| n.id == note_id).map(|note| {
            note.transcript = transcript.to_string();
            note.summary.clear();
            note.is_edited = true;
            note.updated_at = Utc::now();
            note.clone()
        }))
    }

    fn set_summary(
        &self,
        note_id: &str,
        summarized: &str,
        summary: &str,
    ) -> Result<Option<Note>, ServerError> {
        let mut notes = self.lock()?;
        Ok(notes
            .iter_mut()
            .find(|n| n.id == note_id && n.transcript == summarized)
            .map(|note| {
                note.summary = summary.to_string();
                note.updated_at = Utc::now();
                note.clone()
            }))
    }

    fn delete(&self, note_id: &str) -> Result<Option<Note>, ServerError> {
        let mut notes = self.lock()?;
        Ok(notes
            .iter()
            .position(|n| n.id == note_id)
            .map(|index| notes.remove(index)))
    }
}
