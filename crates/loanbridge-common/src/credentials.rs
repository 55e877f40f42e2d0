//! Credential sources for the outbound API client.
//!
//! The bearer credential lives outside this codebase (it is written by the
//! login flow and cleared on logout), so the client only ever reads it. The
//! [`CredentialStore`] trait abstracts where it is read from; a storage read
//! failure is never allowed to block a request, it merely downgrades the
//! request to unauthenticated.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use secrecy::SecretString;

/// Storage key under which the bearer credential is kept.
pub const TOKEN_KEY: &str = "token";

/// A read-only source of the bearer credential.
///
/// Implementations must be infallible from the caller's perspective: any
/// underlying read error is logged and surfaces as `None`, and the request
/// proceeds unauthenticated.
pub trait CredentialStore: Send + Sync {
    /// Returns the current credential, if one is available.
    fn get(&self) -> Option<SecretString>;
}

/// Reads the credential from a file named [`TOKEN_KEY`] in a directory.
///
/// Trailing whitespace (including the newline most editors append) is
/// trimmed. A missing file means no credential; any other read error is
/// logged at warn level and also yields no credential.
#[derive(Debug, Clone)]
pub struct TokenFileStore {
    dir: PathBuf,
}

impl TokenFileStore {
    /// Creates a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The path of the credential file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKEN_KEY)
    }

    fn read(path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let token = contents.trim_end();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(
                    "failed to read credential from {}: {e}; proceeding unauthenticated",
                    path.display()
                );
                None
            }
        }
    }
}

impl CredentialStore for TokenFileStore {
    fn get(&self) -> Option<SecretString> {
        Self::read(&self.path()).map(|token| SecretString::new(token.into()))
    }
}

/// A fixed in-memory credential.
///
/// Useful in tests and for server-side embedding where the credential is
/// provisioned out of band.
#[derive(Clone)]
pub struct StaticTokenStore {
    token: SecretString,
}

impl StaticTokenStore {
    /// Creates a store holding `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::new(token.into().into()),
        }
    }
}

impl CredentialStore for StaticTokenStore {
    fn get(&self) -> Option<SecretString> {
        Some(self.token.clone())
    }
}

// Custom Debug implementation to avoid exposing the credential
impl std::fmt::Debug for StaticTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenStore")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// A store that never yields a credential.
///
/// Requests made with this store proceed unauthenticated.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialStore for NoCredentials {
    fn get(&self) -> Option<SecretString> {
        None
    }
}
