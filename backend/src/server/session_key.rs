//! Session signing key loading.

use std::io;
use std::path::Path;

use actix_web::cookie::Key;
use tracing::warn;

/// Derive the session key from the bytes stored at `path`.
///
/// Debug builds fall back to an ephemeral key when the file is unreadable so
/// local runs work without secrets. Release builds refuse to start.
///
/// # Errors
/// Returns [`io::Error`] in release builds when the file cannot be read, and
/// in every build when the file is too short to derive a key from.
pub fn load_session_key(path: &Path) -> io::Result<Key> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.len() >= 32 => Ok(Key::derive_from(&bytes)),
        Ok(bytes) => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "session key at {} is {} bytes; at least 32 are required",
                path.display(),
                bytes.len()
            ),
        )),
        Err(error) if cfg!(debug_assertions) => {
            warn!(path = %path.display(), %error, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(error) => Err(io::Error::other(format!(
            "failed to read session key at {}: {error}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;
    use tempfile::NamedTempFile;

    use super::*;

    fn key_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents).expect("write key");
        file
    }

    #[rstest]
    fn same_bytes_derive_same_key() {
        let file = key_file(&[7u8; 64]);
        let first = load_session_key(file.path()).expect("key loads");
        let second = load_session_key(file.path()).expect("key loads");
        assert_eq!(first.master(), second.master());
    }

    #[rstest]
    fn short_key_material_is_rejected() {
        let file = key_file(b"too short");
        let err = load_session_key(file.path())
            .err()
            .expect("short key rejected");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[cfg(debug_assertions)]
    #[rstest]
    fn missing_file_falls_back_in_debug_builds() {
        let dir = tempfile::tempdir().expect("temp dir");
        let key = load_session_key(&dir.path().join("absent"));
        assert!(key.is_ok());
    }
}
