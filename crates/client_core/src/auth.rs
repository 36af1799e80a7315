use std::sync::Arc;

use shared::{
    error::{ApiError, ErrorCode},
    protocol::{Envelope, LoginData, LoginRequest, UpdatePasswordRequest},
};
use tracing::{info, warn};

use crate::{
    error::{AuthError, GatewayError, PasswordError},
    gateway::{read_envelope, require_success, ApiClient},
    session::{Session, TokenStore},
};

const LOGIN_PATH: &str = "/users/login";
const UPDATE_PASSWORD_PATH: &str = "/users/updatePassword";
const MIN_PASSWORD_CHARS: usize = 8;

pub const LOGIN_FAILURE: &str = "Invalid login credentials.";
pub const PASSWORD_FAILURE: &str = "Failed to change password.";

/// Checks run before a password change is sent, in the order they are reported.
pub fn validate_new_password(
    new_password: &str,
    confirm_password: &str,
) -> Result<(), PasswordError> {
    if new_password.is_empty() {
        return Err(PasswordError::Required);
    }
    if new_password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(PasswordError::TooShort);
    }
    if !new_password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordError::MissingUppercase);
    }
    if new_password != confirm_password {
        return Err(PasswordError::Mismatch);
    }
    Ok(())
}

/// Login/logout lifecycle around the persisted token slot.
pub struct AuthClient {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
}

impl AuthClient {
    pub fn new(api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        Self { api, store }
    }

    /// Signs in and persists the token. Only admin tokens are kept.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let response = self
            .api
            .http()
            .post(self.api.endpoint(LOGIN_PATH))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(GatewayError::from)?;
        let envelope: Envelope<LoginData> = read_envelope(response).await?;
        let data = require_success(envelope)?;

        let session = Session::from_token(data.token)?;
        if !session.is_admin() {
            warn!(username, "auth: rejected non-admin login");
            return Err(AuthError::NotAdmin);
        }

        self.store.save(session.token())?;
        info!(username, "auth: logged in");
        Ok(session)
    }

    /// Session from the persisted slot, if one was saved by an earlier login.
    pub fn restore(&self) -> Result<Option<Session>, AuthError> {
        match self.store.load()? {
            Some(token) => Ok(Some(Session::from_token(token)?)),
            None => Ok(None),
        }
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.clear()?;
        info!("auth: logged out");
        Ok(())
    }

    pub async fn change_password(
        &self,
        session: &Session,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AuthError> {
        validate_new_password(new_password, confirm_password)?;
        let user_id = session.user_id().ok_or(AuthError::MissingUserId)?;

        let request = self
            .api
            .http()
            .put(self.api.endpoint(UPDATE_PASSWORD_PATH))
            .json(&UpdatePasswordRequest {
                user_id: user_id.to_string(),
                new_password: new_password.to_string(),
            });
        let response = self
            .api
            .authorized(request, session)
            .send()
            .await
            .map_err(GatewayError::from)?;
        let envelope: Envelope<serde_json::Value> = read_envelope(response).await?;
        if !envelope.is_success() {
            let rejection = ApiError::from_envelope(ErrorCode::Validation, &envelope);
            return Err(GatewayError::Rejected(rejection).into());
        }

        info!(user_id, "auth: password changed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
