//! The recording front end: session state while capturing speech, and an HTTP
//! client for the notes API.

pub mod api;
pub mod session;

pub use api::{ClientError, NotesClient};
pub use session::{NoteDraft, RecognitionResult, RecordingSession, SessionError, SessionState};
