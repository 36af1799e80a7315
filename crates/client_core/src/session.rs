//! Bearer credential and the single persisted slot that holds it.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;
use shared::domain::Role;
use tracing::{debug, warn};

use crate::error::SessionError;

/// Claims read from the token payload for display routing only.
///
/// The signature is not verified here; the remote API remains the only
/// authority on what the token grants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionClaims {
    pub uid: Option<String>,
    pub role: Option<Role>,
}

impl SessionClaims {
    /// Picks `role` and `uid` out of the payload independently, so a malformed
    /// value in one never hides the other.
    fn from_payload(payload: &Value) -> Self {
        let role = payload
            .get("role")
            .and_then(|value| Role::deserialize(value).ok());
        let uid = match payload.get("uid") {
            Some(Value::String(uid)) => Some(uid.clone()),
            Some(Value::Number(uid)) => Some(uid.to_string()),
            _ => None,
        };
        Self { uid, role }
    }
}

pub fn decode_claims(token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    let data =
        jsonwebtoken::decode::<Value>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(SessionClaims::from_payload(&data.claims))
}

/// Authenticated credential passed explicitly to every component that talks
/// to the API.
#[derive(Clone)]
pub struct Session {
    token: String,
    claims: SessionClaims,
}

impl Session {
    pub fn from_token(token: impl Into<String>) -> Result<Self, SessionError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let claims = decode_claims(&token).unwrap_or_else(|err| {
            warn!(error = %err, "session: token payload is unreadable; treating claims as empty");
            SessionClaims::default()
        });
        Ok(Self { token, claims })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn claims(&self) -> &SessionClaims {
        &self.claims
    }

    pub fn is_admin(&self) -> bool {
        self.claims.role == Some(Role::Admin)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.claims.uid.as_deref().filter(|uid| !uid.is_empty())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("claims", &self.claims)
            .finish()
    }
}

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, SessionError>;
    fn save(&self, token: &str) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn store_error(&self, source: io::Error) -> SessionError {
        SessionError::Store {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.store_error(err)),
        }
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.store_error(err))?;
        }
        fs::write(&self.path, token).map_err(|err| self.store_error(err))?;
        restrict_permissions(&self.path).map_err(|err| self.store_error(err))?;
        debug!(path = %self.path.display(), "session: token persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.store_error(err)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[derive(Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
