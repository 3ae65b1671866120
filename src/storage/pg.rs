use chrono::Utc;
use diesel::{
    dsl,
    pg::{Pg, PgConnection},
    prelude::*,
    r2d2::ConnectionManager,
    result::{DatabaseErrorKind, Error as DieselError},
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use super::NoteStore;
use crate::{
    errors::ServerError,
    models::note::{NewNote, Note},
    schema::notes,
};

pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Newest first; ties on `created_at` fall back to the id.
fn newest_first() -> notes::BoxedQuery<'static, Pg> {
    notes::table
        .order((notes::created_at.desc(), notes::id.desc()))
        .into_boxed()
}

type SummaryTarget<'a> = dsl::Filter<
    dsl::Filter<notes::table, dsl::Eq<notes::id, &'a str>>,
    dsl::Eq<notes::transcript, &'a str>,
>;

/// The row only matches while it still holds the transcript that was summarized.
fn summary_target<'a>(note_id: &'a str, summarized: &'a str) -> SummaryTarget<'a> {
    notes::table
        .filter(notes::id.eq(note_id))
        .filter(notes::transcript.eq(summarized))
}

pub struct PgNoteStore {
    pool: Pool,
}

impl PgNoteStore {
    pub fn new(pool: Pool) -> Self {
        PgNoteStore { pool }
    }

    pub fn connect(database_url: &str) -> Result<Self, ServerError> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = r2d2::Pool::builder().build(manager)?;
        Ok(PgNoteStore::new(pool))
    }

    pub fn run_migrations(&self) -> Result<(), ServerError> {
        let mut pooled = self.pool.get()?;
        let connection: &mut PgConnection = &mut pooled;
        let applied = connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| ServerError::MigrationError(e.to_string()))?;
        for version in applied {
            log::info!("applied migration {version}");
        }
        Ok(())
    }
}

impl NoteStore for PgNoteStore {
    fn list(&self) -> Result<Vec<Note>, ServerError> {
        let mut connection = self.pool.get()?;
        let result = newest_first().load::<Note>(&mut connection)?;
        Ok(result)
    }

    fn find(&self, note_id: &str) -> Result<Option<Note>, ServerError> {
        let mut connection = self.pool.get()?;
        let result = notes::table
            .find(note_id)
            .first::<Note>(&mut connection)
            .optional()?;
        Ok(result)
    }

    fn insert(&self, note: NewNote) -> Result<Note, ServerError> {
        let mut connection = self.pool.get()?;
        let mut note = note;

        loop {
            match diesel::insert_into(notes::table)
                .values(&note)
                .get_result::<Note>(&mut connection)
            {
                Ok(inserted) => break Ok(inserted),
                Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                    log::debug!("note id {} already taken, drawing another", note.id);
                    note.regenerate_id();
                }
                Err(e) => break Err(e.into()),
            }
        }
    }

    fn update_transcript(
        &self,
        note_id: &str,
        transcript: &str,
    ) -> Result<Option<Note>, ServerError> {
        let mut connection = self.pool.get()?;
        let result = diesel::update(notes::table.find(note_id))
            .set((
                notes::transcript.eq(transcript),
                notes::summary.eq(""),
                notes::is_edited.eq(true),
                notes::updated_at.eq(Utc::now()),
            ))
            .get_result::<Note>(&mut connection)
            .optional()?;
        Ok(result)
    }

    fn set_summary(
        &self,
        note_id: &str,
        summarized: &str,
        summary: &str,
    ) -> Result<Option<Note>, ServerError> {
        let mut connection = self.pool.get()?;
        let result = diesel::update(summary_target(note_id, summarized))
            .set((
                notes::summary.eq(summary),
                notes::updated_at.eq(Utc::now()),
            ))
            .get_result::<Note>(&mut connection)
            .optional()?;
        Ok(result)
    }

    fn delete(&self, note_id: &str) -> Result<Option<Note>, ServerError> {
        let mut connection = self.pool.get()?;
        let result = diesel::delete(notes::table.find(note_id))
            .get_result::<Note>(&mut connection)
            .optional()?;
        Ok(result)
    }
}
