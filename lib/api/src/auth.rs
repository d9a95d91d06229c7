//! Authentication endpoints.

use async_trait::async_trait;
use pharmaec_access::{FetchError, Principal, PrincipalSource};
use tracing::{info, warn};

use crate::client::{ApiClient, TokenPair, decode};
use crate::error::ApiError;
use crate::transport::{ApiRequest, Body, Method};

impl ApiClient {
    /// Signs in with email and password and stores the returned tokens.
    ///
    /// The backend expects an OAuth2 password form, so the email goes in the
    /// `username` field. A 401 here means bad credentials and is returned as
    /// a status error without attempting a refresh.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        let form = vec![
            ("username".to_string(), email.to_string()),
            ("password".to_string(), password.to_string()),
        ];
        let request = ApiRequest::new(Method::Post, "/auth/login").with_body(Body::Form(form));
        let tokens: TokenPair = decode(&self.execute_once(request).await?)?;

        self.store()
            .store_tokens(&tokens.access_token, tokens.refresh_token.as_deref());
        info!("signed in");
        Ok(tokens)
    }

    /// Ends the session on the backend, then locally.
    ///
    /// The backend call is best-effort; local credentials are purged even
    /// when it fails.
    pub async fn logout(&self) {
        let request = ApiRequest::new(Method::Post, "/auth/logout")
            .with_bearer(self.store().access_token());
        if let Err(err) = self.execute_once(request).await {
            warn!(error = %err, "backend logout failed, clearing local session anyway");
        }
        self.store().purge_session();
        info!("signed out");
    }

    /// Fetches the signed-in principal.
    pub async fn me(&self) -> Result<Principal, ApiError> {
        self.get("/auth/me", Vec::new()).await
    }
}

#[async_trait(?Send)]
impl PrincipalSource for ApiClient {
    async fn fetch_principal(&self) -> Result<Principal, FetchError> {
        self.me().await.map_err(|err| {
            if err.is_unauthorized() {
                FetchError::Unauthorized {
                    message: err.user_message(),
                }
            } else {
                FetchError::Failed {
                    message: err.user_message(),
                }
            }
        })
    }
}
