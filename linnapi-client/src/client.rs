use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::types::{Account, Authorization, Credentials, Session};

/// Public authentication server.
pub const DEFAULT_AUTH_URL: &str = "https://api.linnworks.net";

/// Client for the Linnworks API.
///
/// Holds one authenticated [`Session`]; there is no global state, so several
/// clients for different accounts can coexist.
#[derive(Debug, Clone)]
pub struct LinnworksClient {
    http: reqwest::Client,
    session: Session,
}

impl LinnworksClient {
    /// Creates a client from an existing session.
    pub fn with_session(session: Session) -> Self {
        Self::with_http(reqwest::Client::new(), session)
    }

    /// Creates a client from an existing session and a configured HTTP client.
    pub fn with_http(http: reqwest::Client, session: Session) -> Self {
        Self { http, session }
    }

    /// Logs in against the public authentication server.
    pub async fn login(credentials: &Credentials) -> Result<Self, ApiError> {
        Self::login_with(reqwest::Client::new(), credentials, DEFAULT_AUTH_URL).await
    }

    /// Logs in against a custom authentication server.
    ///
    /// Runs the two-step flow: `Multilogin` to find the user's account, then
    /// `Authorize` for a token and the server to send API calls to.
    #[instrument(skip(http, credentials), fields(username = %credentials.username))]
    pub async fn login_with(
        http: reqwest::Client,
        credentials: &Credentials,
        auth_url: &str,
    ) -> Result<Self, ApiError> {
        let mut form = vec![
            ("userName", credentials.username.clone()),
            ("password", credentials.password.clone()),
        ];

        let body = post_form(&http, &format!("{}/api/Auth/Multilogin", auth_url), &form).await?;
        let accounts: Vec<Account> = serde_json::from_str(&body)?;
        let account = accounts.into_iter().next().ok_or(ApiError::NoAccounts)?;

        form.push(("userId", account.id.clone()));
        let body = post_form(&http, &format!("{}/api/Auth/Authorize", auth_url), &form).await?;
        let authorization: Authorization = serde_json::from_str(&body)?;

        let session = Session {
            token: authorization.token.ok_or(ApiError::MissingField("Token"))?,
            server: authorization.server.ok_or(ApiError::MissingField("Server"))?,
            user_id: account.id,
        };
        debug!(server = %session.server, "authorized");

        Ok(Self { http, session })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Calls an endpoint and parses the JSON response.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let body = self.call(path, params).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Calls an endpoint whose response body carries nothing of interest.
    pub(crate) async fn request_empty(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(), ApiError> {
        self.call(path, params).await.map(|_| ())
    }

    async fn call(&self, path: &str, params: &[(&str, String)]) -> Result<String, ApiError> {
        let mut form: Vec<(&str, String)> = params.to_vec();
        form.push(("token", self.session.token.clone()));

        debug!(path, "sending request");
        post_form(&self.http, &format!("{}{}", self.session.server, path), &form).await
    }
}

async fn post_form(
    http: &reqwest::Client,
    url: &str,
    form: &[(&str, String)],
) -> Result<String, ApiError> {
    let response = http.post(url).form(form).send().await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("Message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    "Unknown error".to_string()
                } else {
                    body.clone()
                }
            });
        return Err(ApiError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            token: "tok".to_string(),
            server: "https://eu-ext.linnworks.net".to_string(),
            user_id: "user-1".to_string(),
        }
    }

    #[test]
    fn test_client_from_session() {
        let client = LinnworksClient::with_session(session());
        assert_eq!(client.session().token, "tok");
        assert_eq!(client.session().server, "https://eu-ext.linnworks.net");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials {
            username: "user@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("user@example.com"));
        assert!(!printed.contains("hunter2"));
    }

    #[tokio::test]
    #[ignore = "requires LINNWORKS_USERNAME and LINNWORKS_PASSWORD env vars"]
    async fn test_live_login() {
        let credentials = Credentials {
            username: std::env::var("LINNWORKS_USERNAME").expect("LINNWORKS_USERNAME not set"),
            password: std::env::var("LINNWORKS_PASSWORD").expect("LINNWORKS_PASSWORD not set"),
        };

        let client = LinnworksClient::login(&credentials).await.unwrap();
        assert!(!client.session().token.is_empty());
    }
}
