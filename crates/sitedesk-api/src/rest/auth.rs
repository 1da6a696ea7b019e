// Auth endpoints (`/auth/v1/...`).
//
// Password grant and logout. The live session is held in the gateway's
// watch channel so subscribers see every sign-in and sign-out.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use super::{ErrorResponse, RestGateway};
use crate::auth::{Session, TokenResponse};
use crate::error::Error;

impl RestGateway {
    /// Exchange email and password for a session.
    pub(super) async fn password_grant(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, Error> {
        let mut url = self.auth_url("token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        debug!("signing in at {url}");

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let resp = self
            .http
            .post(url)
            .bearer_auth(self.public_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&raw)
                .ok()
                .and_then(ErrorResponse::into_message)
                .unwrap_or_else(|| format!("sign-in failed (HTTP {status})"));
            return Err(Error::Authentication { message });
        }

        let token: TokenResponse = Self::handle_response(resp).await?;
        let session = Session::from(token);
        debug!(user = %session.user.id, "sign-in successful");
        self.session.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// End the current session. A no-op when nobody is signed in.
    pub(super) async fn logout(&self) -> Result<(), Error> {
        if self.session.borrow().is_none() {
            return Ok(());
        }

        let url = self.auth_url("logout")?;
        debug!("signing out at {url}");

        let resp = self.authorized(self.http.post(url)).send().await?;
        let result = Self::handle_empty(resp).await;

        // The local session is dropped even if the server call failed.
        self.session.send_replace(None);
        debug!("sign-out complete");
        result
    }
}
