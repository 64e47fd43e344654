use serde::Deserialize;

use crate::{Client, ClientError, ClientResult};

/// A bearer token issued by the client-credentials grant.
///
/// The token is not refreshed locally; the Web API may reject it once it expires.
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
}
impl AccessToken {
    /// Wrap an already-issued token.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// The raw bearer value.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

/// Authentication.
impl Client {
    /// Exchange a client ID and secret for an access token using the
    /// client-credentials grant.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingCredentials`] before making any request if either
    /// credential is empty, and [`ClientError::AuthError`] with the upstream body if the
    /// exchange is rejected.
    pub async fn request_access_token(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> ClientResult<AccessToken> {
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(ClientError::MissingCredentials);
        }

        let response = self
            .client
            .post(format!("{}/api/token", self.accounts_url))
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(ClientError::AuthError {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let token: TokenResponse = serde_json::from_slice(&bytes)?;
        tracing::debug!("obtained access token valid for {}s", token.expires_in);
        Ok(AccessToken::new(token.access_token))
    }
}
