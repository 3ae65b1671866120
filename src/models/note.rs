use crate::schema::notes;
use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable};
use nanoid::nanoid;
use serde_derive::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Untitled Note";
const ID_LENGTH: usize = 10;

#[derive(Clone, Debug, PartialEq, Queryable, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub audio_path: String,
    pub transcript: String,
    pub summary: String,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// A summary can be (re)generated when there is none yet or the transcript
    /// was edited after recording.
    pub fn summary_enabled(&self) -> bool {
        self.summary.is_empty() || self.is_edited
    }

    pub fn has_transcript(&self) -> bool {
        !self.transcript.trim().is_empty()
    }
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = notes)]
pub struct NewNote {
    pub id: String,
    pub title: String,
    pub audio_path: String,
    pub transcript: String,
    pub summary: String,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewNote {
    pub fn new(title: Option<&str>, transcript: String, audio_path: String) -> Self {
        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => DEFAULT_TITLE.to_string(),
        };
        let time_now = Utc::now();

        NewNote {
            id: generate_id(),
            title,
            audio_path,
            transcript,
            summary: String::new(),
            is_edited: false,
            created_at: time_now,
            updated_at: time_now,
        }
    }

    /// Draws a fresh id, used when the previous one collided.
    pub fn regenerate_id(&mut self) {
        self.id = generate_id();
    }

    pub fn into_note(self) -> Note {
        Note {
            id: self.id,
            title: self.title,
            audio_path: self.audio_path,
            transcript: self.transcript,
            summary: self.summary,
            is_edited: self.is_edited,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn generate_id() -> String {
    nanoid!(ID_LENGTH)
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TranscriptUpdate {
    pub transcript: String,
}
