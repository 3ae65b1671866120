use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::Utc;

use crate::errors::ServerError;

/// Upper bound for an uploaded audio blob.
pub const MAX_AUDIO_BYTES: usize = 10 * 1024 * 1024;
const FALLBACK_FILE_NAME: &str = "recording";

/// An audio part pulled out of a multipart request, not yet on disk.
#[derive(Debug, Default)]
pub struct AudioBlob {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl AudioBlob {
    pub fn check_media_type(content_type: Option<&str>) -> Result<(), ServerError> {
        match content_type {
            Some(ct) if ct.to_ascii_lowercase().starts_with("audio/") => Ok(()),
            _ => Err(ServerError::bad_request("Only audio files are allowed!")),
        }
    }

    /// Appends a streamed chunk, refusing to grow past [`MAX_AUDIO_BYTES`].
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Result<(), ServerError> {
        if self.bytes.len() + chunk.len() > MAX_AUDIO_BYTES {
            return Err(ServerError::bad_request(format!(
                "Audio file exceeds the {} MiB limit",
                MAX_AUDIO_BYTES / (1024 * 1024)
            )));
        }
        self.bytes.extend_from_slice(chunk);
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        UploadDir { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the blob under `<millis>-<name>`, creating the directory on first use.
    pub fn store(&self, blob: &AudioBlob) -> Result<PathBuf, ServerError> {
        fs::create_dir_all(&self.root)?;

        let base = stored_file_name(Utc::now().timestamp_millis(), blob.file_name.as_deref());
        let mut attempt = 0;
        loop {
            let name = if attempt == 0 {
                base.clone()
            } else {
                format!("{attempt}-{base}")
            };
            let path = self.root.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(&blob.bytes)?;
                    log::debug!("stored {} bytes at {}", blob.bytes.len(), path.display());
                    break Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => break Err(e.into()),
            }
        }
    }

    /// Best-effort removal; a missing file is not an error.
    pub fn remove(path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => log::debug!("removed upload {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::warn!("could not remove upload {}: {e}", path.display()),
        }
    }
}

/// Keeps only the last path component of a client-supplied name.
pub fn stored_file_name(millis: i64, original: Option<&str>) -> String {
    let name = original
        .and_then(|o| Path::new(o).file_name())
        .and_then(|n| n.to_str())
        .map(str::trim)
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .unwrap_or(FALLBACK_FILE_NAME);
    format!("{millis}-{name}")
}
