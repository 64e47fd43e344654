use serde::de::DeserializeOwned;

use crate::{AccessToken, Client, ClientError, ClientResult};

/// Making requests to the Spotify Web API.
impl Client {
    /// Make an authorized `GET` request to the Web API and deserialize the response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the response is not valid.
    pub async fn request<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        endpoint: &str,
        parameters: &[(&str, String)],
    ) -> ClientResult<T> {
        let bytes = self.request_raw(token, endpoint, parameters).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) async fn request_raw(
        &self,
        token: &AccessToken,
        endpoint: &str,
        parameters: &[(&str, String)],
    ) -> ClientResult<Vec<u8>> {
        let response = self
            .client
            .get(format!("{}/{endpoint}", self.api_url))
            .bearer_auth(token.secret())
            .query(parameters)
            .send()
            .await?;

        let status = response.status();
        let bytes: Vec<u8> = response.bytes().await?.into();
        if !status.is_success() {
            tracing::warn!("{endpoint} returned {status}");
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(bytes)
    }
}
