use derive_more::Display;

use crate::models::note::Note;

pub const PLACEHOLDER_AUDIO_NAME: &str = "voice-recording.webm";
pub const PLACEHOLDER_AUDIO_TYPE: &str = "audio/webm";
const TITLE_WORDS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
}

/// One entry of a speech-recognition result batch.
#[derive(Clone, Debug)]
pub struct RecognitionResult {
    pub text: String,
    pub is_final: bool,
}

impl RecognitionResult {
    pub fn interim(text: impl Into<String>) -> Self {
        RecognitionResult {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn finalized(text: impl Into<String>) -> Self {
        RecognitionResult {
            text: text.into(),
            is_final: true,
        }
    }
}

#[derive(Debug, Display, PartialEq, Eq)]
pub enum SessionError {
    #[display(fmt = "already recording")]
    AlreadyRecording,
    #[display(fmt = "Please add a title for your note")]
    MissingTitle,
    #[display(fmt = "Please record some audio first")]
    MissingTranscript,
}

impl std::error::Error for SessionError {}

/// What gets uploaded when a session is saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub transcript: String,
}

#[derive(Debug)]
pub struct RecordingSession {
    state: SessionState,
    transcript: String,
    title: String,
}

impl Default for RecordingSession {
    fn default() -> Self {
        RecordingSession {
            state: SessionState::Idle,
            transcript: String::new(),
            title: String::new(),
        }
    }
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Starts a fresh capture, dropping whatever the previous one accumulated.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.is_recording() {
            return Err(SessionError::AlreadyRecording);
        }
        self.clear();
        self.state = SessionState::Recording;
        Ok(())
    }

    pub fn stop(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Appends the finalized results of one recognition event.
    pub fn on_results(&mut self, results: &[RecognitionResult]) {
        if !self.is_recording() {
            return;
        }

        let mut finalized = String::new();
        for result in results.iter().filter(|r| r.is_final) {
            finalized.push_str(&result.text);
            finalized.push(' ');
        }
        if finalized.is_empty() {
            return;
        }

        if self.title.is_empty() {
            if let Some(title) = propose_title(&finalized) {
                self.title = title;
            }
        }
        self.transcript.push_str(&finalized);
    }

    pub fn draft(&self) -> Result<NoteDraft, SessionError> {
        if self.title.trim().is_empty() {
            return Err(SessionError::MissingTitle);
        }
        if self.transcript.trim().is_empty() {
            return Err(SessionError::MissingTranscript);
        }
        Ok(NoteDraft {
            title: self.title.clone(),
            transcript: self.transcript.clone(),
        })
    }

    /// Called after a successful save.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.title.clear();
    }
}

/// First few words of a segment, with an ellipsis when cut short.
pub fn propose_title(segment: &str) -> Option<String> {
    let words: Vec<&str> = segment.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }
    let mut title = words[..words.len().min(TITLE_WORDS)].join(" ");
    if words.len() > TITLE_WORDS {
        title.push_str("...");
    }
    Some(title)
}

/// Edits are only worth sending when they change something.
pub fn should_send_edit(note: &Note, new_transcript: &str) -> bool {
    !new_transcript.trim().is_empty() && new_transcript != note.transcript
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::note::NewNote;

    #[test]
    fn start_clears_previous_capture() {
        let mut session = RecordingSession::new();
        session.start().expect("start");
        session.on_results(&[RecognitionResult::finalized("old words")]);
        session.stop();

        session.start().expect("restart");
        assert_eq!(session.transcript(), "");
        assert_eq!(session.title(), "");
        assert!(session.is_recording());
    }

    #[test]
    fn start_while_recording_is_refused() {
        let mut session = RecordingSession::new();
        session.start().expect("start");
        assert_eq!(session.start(), Err(SessionError::AlreadyRecording));
    }

    #[test]
    fn only_final_results_accumulate() {
        let mut session = RecordingSession::new();
        session.start().expect("start");
        session.on_results(&[RecognitionResult::interim("buy mi")]);
        session.on_results(&[
            RecognitionResult::finalized("buy milk"),
            RecognitionResult::interim("and"),
        ]);
        session.on_results(&[RecognitionResult::finalized("and eggs")]);

        assert_eq!(session.transcript(), "buy milk and eggs ");
    }

    #[test]
    fn results_after_stop_are_ignored() {
        let mut session = RecordingSession::new();
        session.start().expect("start");
        session.on_results(&[RecognitionResult::finalized("kept")]);
        session.stop();
        session.on_results(&[RecognitionResult::finalized("dropped")]);

        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.transcript(), "kept ");
    }

    #[test]
    fn first_final_segment_proposes_the_title() {
        let mut session = RecordingSession::new();
        session.start().expect("start");
        session.on_results(&[RecognitionResult::finalized(
            "remember to water the plants today",
        )]);
        session.on_results(&[RecognitionResult::finalized("and feed the cat")]);

        assert_eq!(session.title(), "remember to water the...");
    }

    #[test]
    fn manual_title_is_not_overwritten() {
        let mut session = RecordingSession::new();
        session.start().expect("start");
        session.set_title("Groceries");
        session.on_results(&[RecognitionResult::finalized("buy milk and eggs")]);

        assert_eq!(session.title(), "Groceries");
    }

    #[test]
    fn short_segment_title_has_no_ellipsis() {
        assert_eq!(propose_title(" buy milk ").as_deref(), Some("buy milk"));
        assert_eq!(propose_title("   "), None);
    }

    #[test]
    fn draft_requires_title_and_transcript() {
        let mut session = RecordingSession::new();
        assert_eq!(session.draft(), Err(SessionError::MissingTitle));

        session.set_title("Groceries");
        assert_eq!(session.draft(), Err(SessionError::MissingTranscript));

        session.start().expect("start");
        session.set_title("Groceries");
        session.on_results(&[RecognitionResult::finalized("buy milk and eggs")]);
        session.stop();

        let draft = session.draft().expect("draft");
        assert_eq!(draft.title, "Groceries");
        assert_eq!(draft.transcript, "buy milk and eggs ");
    }

    #[test]
    fn session_errors_carry_their_prompt_through_anyhow() {
        let err = anyhow::Error::from(SessionError::MissingTranscript).context("saving note");
        assert_eq!(err.to_string(), "saving note");
        assert_eq!(err.root_cause().to_string(), "Please record some audio first");
    }

    #[test]
    fn edits_need_new_non_blank_text() {
        let note = NewNote::new(None, "buy milk".to_string(), "p".to_string()).into_note();
        assert!(!should_send_edit(&note, "buy milk"));
        assert!(!should_send_edit(&note, "   "));
        assert!(should_send_edit(&note, "buy milk, eggs, bread"));
    }
}
