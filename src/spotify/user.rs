use crate::{error::SpotifyError, types::User};

use super::{SpotifyClient, read_json};

impl SpotifyClient {
    /// Fetches the profile of the user the token belongs to (`GET /me`).
    ///
    /// # Errors
    ///
    /// - [`SpotifyError::NotAuthenticated`] when no token is cached yet
    /// - [`SpotifyError::Http`] with status 401 when the token was rejected
    /// - [`SpotifyError::Request`] on network or decoding failures
    pub async fn me(&self) -> Result<User, SpotifyError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(self.url("/me"))
            .bearer_auth(token)
            .send()
            .await?;

        read_json(response).await
    }
}
