//! Authenticated REST client.
//!
//! Every call attaches the stored bearer token. A 401 triggers exactly one
//! token refresh and one replay of the original request; if that does not
//! produce an authorized response the session is over: credentials are
//! purged, the logout hook fires and the caller gets
//! [`ApiError::SessionExpired`].
//!
//! Refreshes are single-flight. The backend rotates refresh tokens, so a
//! request that was rejected while another one was refreshing waits for that
//! refresh and replays with its token instead of presenting the revoked one.

use pharmaec_core::{KeyValueStore, SessionStore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::ApiError;
use crate::transport::{ApiRequest, ApiResponse, Body, HttpTransport, Method};

/// Path prefix of every backend endpoint.
pub const API_PREFIX: &str = "/api/v1";

/// Path of the token refresh endpoint.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Called once the session has been ended by the client. The dashboard
/// points the browser at the login page here.
pub type LogoutHook = Arc<dyn Fn() + Send + Sync>;

/// Token pair returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    /// Present on login; present on refresh when the backend rotates it.
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// REST client bound to one browser profile's credentials.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    store: SessionStore<Arc<dyn KeyValueStore>>,
    on_logout: Option<LogoutHook>,
    refreshing: Arc<Mutex<()>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("logout_hook", &self.on_logout.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            transport,
            store: SessionStore::new(store),
            on_logout: None,
            refreshing: Arc::new(Mutex::new(())),
        }
    }

    /// Sets the hook invoked after the client ends the session.
    #[must_use]
    pub fn with_logout_hook(mut self, hook: LogoutHook) -> Self {
        self.on_logout = Some(hook);
        self
    }

    /// The credential store this client reads and writes.
    #[must_use]
    pub fn store(&self) -> &SessionStore<Arc<dyn KeyValueStore>> {
        &self.store
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        let request = ApiRequest::new(Method::Get, path).with_query(query);
        decode(&self.execute(request).await?)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = ApiRequest::new(Method::Post, path).with_body(json_body(body)?);
        decode(&self.execute(request).await?)
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = ApiRequest::new(Method::Put, path).with_body(json_body(body)?);
        decode(&self.execute(request).await?)
    }

    /// Deletes a resource. The response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(ApiRequest::new(Method::Delete, path)).await?;
        Ok(())
    }

    /// Sends `request` with the stored bearer token and applies the 401
    /// policy. Returns the response only if its status is a success.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let request = request.with_bearer(self.store.access_token());
        let response = self.dispatch(&request).await?;
        if response.status != 401 {
            return check_status(response);
        }

        let access_token = self.renew(request.bearer.as_deref()).await?;
        let replay = request.with_bearer(Some(access_token));
        let response = self.dispatch(&replay).await?;
        if response.status == 401 {
            return Err(self.end_session("refreshed token rejected"));
        }
        check_status(response)
    }

    /// Returns an access token to replay with after `rejected` got a 401.
    ///
    /// Holds the refresh lock for the whole exchange. When the stored token
    /// no longer matches the rejected one, another request already refreshed
    /// and its token is reused.
    async fn renew(&self, rejected: Option<&str>) -> Result<String, ApiError> {
        let _refreshing = self.refreshing.lock().await;

        match self.store.access_token() {
            Some(current) if rejected != Some(current.as_str()) => {
                debug!("token already refreshed by a concurrent request");
                return Ok(current);
            }
            None if rejected.is_some() => return Err(ApiError::SessionExpired),
            _ => {}
        }

        debug!("access token rejected, attempting refresh");
        let Some(refresh_token) = self.store.refresh_token() else {
            return Err(self.end_session("no refresh token stored"));
        };
        match self.refresh(&refresh_token).await {
            Ok(access_token) => Ok(access_token),
            Err(err) => {
                warn!(error = %err, "token refresh failed");
                Err(self.end_session("token refresh failed"))
            }
        }
    }

    /// Sends `request` once, without the refresh policy. Used by the auth
    /// endpoints, where a 401 means bad credentials rather than an expired
    /// token.
    pub(crate) async fn execute_once(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        check_status(self.dispatch(&request).await?)
    }

    /// Exchanges the refresh token for a new access token and stores it,
    /// together with the rotated refresh token when one is returned.
    async fn refresh(&self, refresh_token: &str) -> Result<String, ApiError> {
        let request = ApiRequest::new(Method::Post, REFRESH_PATH)
            .with_body(json_body(&RefreshRequest { refresh_token })?);
        let tokens: TokenPair = decode(&self.execute_once(request).await?)?;
        self.store
            .store_tokens(&tokens.access_token, tokens.refresh_token.as_deref());
        info!("access token refreshed");
        Ok(tokens.access_token)
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.transport
            .send(request)
            .await
            .map_err(|report| ApiError::Transport {
                message: report.to_string(),
            })
    }

    /// Purges credentials and fires the logout hook.
    fn end_session(&self, reason: &str) -> ApiError {
        warn!(reason, "ending session");
        self.store.purge_session();
        if let Some(hook) = &self.on_logout {
            hook();
        }
        ApiError::SessionExpired
    }
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<Body, ApiError> {
    serde_json::to_value(body)
        .map(Body::Json)
        .map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })
}

fn check_status(response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_response(response.status, &response.body))
    }
}

/// Deserializes a response body. An empty body decodes as JSON `null`, so
/// `()` and `Option<T>` targets accept 204 responses.
pub(crate) fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ApiError> {
    let body = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };
    serde_json::from_str(body).map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport shared by the client tests.

    use super::*;
    use crate::error::TransportError;
    use async_trait::async_trait;
    use rootcause::prelude::Report;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses in order and records every request.
    #[derive(Default)]
    pub struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        pub fn new(responses: Vec<ApiResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().map(Ok).collect()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn push_failure(&self, details: &str) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(TransportError::RequestFailed {
                    details: details.to_string(),
                }));
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn paths(&self) -> Vec<String> {
            self.requests().into_iter().map(|r| r.path).collect()
        }
    }

    #[async_trait(?Send)]
    impl HttpTransport for ScriptedTransport {
        async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, Report<TransportError>> {
            self.requests.lock().unwrap().push(request.clone());
            match self.responses.lock().unwrap().pop_front() {
                Some(Ok(response)) => Ok(response),
                Some(Err(err)) => Err(err.into()),
                None => Ok(ApiResponse::new(500, r#"{"detail":"unscripted request"}"#)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedTransport;
    use super::*;
    use pharmaec_core::{MemoryStore, keys};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Harness {
        transport: Arc<ScriptedTransport>,
        storage: MemoryStore,
        logouts: Arc<AtomicUsize>,
        client: ApiClient,
    }

    fn harness(responses: Vec<ApiResponse>, entries: &[(&str, &str)]) -> Harness {
        let transport = Arc::new(ScriptedTransport::new(responses));
        let storage = MemoryStore::with_entries(entries.iter().copied());
        let logouts = Arc::new(AtomicUsize::new(0));
        let counter = logouts.clone();
        let client = ApiClient::new(transport.clone(), Arc::new(storage.clone()))
            .with_logout_hook(Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        Harness {
            transport,
            storage,
            logouts,
            client,
        }
    }

    const SIGNED_IN: &[(&str, &str)] = &[
        (keys::ACCESS_TOKEN, "stale"),
        (keys::REFRESH_TOKEN, "refresh-1"),
        (keys::USER_NAME, "Asha Rao"),
        (keys::USER_ROLE, "cashier"),
    ];

    #[tokio::test]
    async fn attaches_bearer_token() {
        let h = harness(vec![ApiResponse::new(200, r#"{"ok":true}"#)], SIGNED_IN);

        let body: serde_json::Value = h.client.get("/warehouses", Vec::new()).await.unwrap();

        assert_eq!(body["ok"], true);
        let requests = h.transport.requests();
        assert_eq!(requests[0].bearer.as_deref(), Some("stale"));
        assert_eq!(requests[0].method, Method::Get);
    }

    #[tokio::test]
    async fn anonymous_requests_have_no_bearer() {
        let h = harness(vec![ApiResponse::new(200, "[]")], &[]);
        let _: Vec<serde_json::Value> = h.client.get("/shops", Vec::new()).await.unwrap();
        assert!(h.transport.requests()[0].bearer.is_none());
    }

    #[tokio::test]
    async fn refreshes_once_and_replays() {
        let h = harness(
            vec![
                ApiResponse::new(401, r#"{"detail":"Token expired"}"#),
                ApiResponse::new(
                    200,
                    r#"{"access_token":"fresh","refresh_token":"refresh-2","token_type":"bearer","expires_in":1800}"#,
                ),
                ApiResponse::new(200, r#"{"id":"w1"}"#),
            ],
            SIGNED_IN,
        );

        let body: serde_json::Value = h.client.get("/warehouses/w1", Vec::new()).await.unwrap();

        assert_eq!(body["id"], "w1");
        assert_eq!(h.transport.paths(), vec!["/warehouses/w1", "/auth/refresh", "/warehouses/w1"]);
        let requests = h.transport.requests();
        assert_eq!(
            requests[1].body,
            Body::Json(serde_json::json!({"refresh_token": "refresh-1"}))
        );
        assert!(requests[1].bearer.is_none());
        assert_eq!(requests[2].bearer.as_deref(), Some("fresh"));
        assert_eq!(h.storage.get(keys::ACCESS_TOKEN).as_deref(), Some("fresh"));
        assert_eq!(h.storage.get(keys::REFRESH_TOKEN).as_deref(), Some("refresh-2"));
        assert_eq!(h.logouts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_refresh_purges_and_logs_out() {
        let h = harness(
            vec![
                ApiResponse::new(401, r#"{"detail":"Token expired"}"#),
                ApiResponse::new(401, r#"{"detail":"Invalid refresh token"}"#),
            ],
            SIGNED_IN,
        );
        h.storage.set(keys::THEME, "dark");

        let err = h.client.delete("/shops/s1").await.unwrap_err();

        assert_eq!(err, ApiError::SessionExpired);
        assert_eq!(h.transport.paths(), vec!["/shops/s1", "/auth/refresh"]);
        assert!(h.storage.get(keys::ACCESS_TOKEN).is_none());
        assert!(h.storage.get(keys::REFRESH_TOKEN).is_none());
        assert!(h.storage.get(keys::USER_NAME).is_none());
        assert!(h.storage.get(keys::USER_ROLE).is_none());
        assert_eq!(h.storage.get(keys::THEME).as_deref(), Some("dark"));
        assert_eq!(h.logouts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_refresh_token_ends_session_without_refresh_call() {
        let h = harness(
            vec![ApiResponse::new(401, "{}")],
            &[(keys::ACCESS_TOKEN, "stale")],
        );

        let err = h
            .client
            .get::<serde_json::Value>("/medicines", Vec::new())
            .await
            .unwrap_err();

        assert!(err.is_session_expired());
        assert_eq!(h.transport.paths(), vec!["/medicines"]);
        assert_eq!(h.logouts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn second_401_after_refresh_is_not_retried_again() {
        let h = harness(
            vec![
                ApiResponse::new(401, "{}"),
                ApiResponse::new(200, r#"{"access_token":"fresh"}"#),
                ApiResponse::new(401, "{}"),
            ],
            SIGNED_IN,
        );

        let err = h
            .client
            .get::<serde_json::Value>("/employees", Vec::new())
            .await
            .unwrap_err();

        assert!(err.is_session_expired());
        assert_eq!(h.transport.requests().len(), 3);
        assert!(h.storage.get(keys::ACCESS_TOKEN).is_none());
        assert_eq!(h.logouts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refresh_without_rotation_keeps_refresh_token() {
        let h = harness(
            vec![
                ApiResponse::new(401, "{}"),
                ApiResponse::new(200, r#"{"access_token":"fresh"}"#),
                ApiResponse::new(204, ""),
            ],
            SIGNED_IN,
        );

        h.client.delete("/warehouses/w1").await.unwrap();

        assert_eq!(h.storage.get(keys::REFRESH_TOKEN).as_deref(), Some("refresh-1"));
    }

    /// Backend that rotates refresh tokens and yields before answering, so
    /// concurrent requests interleave.
    struct RotatingBackend {
        refresh_token: std::sync::Mutex<String>,
        refreshes: AtomicUsize,
    }

    #[async_trait::async_trait(?Send)]
    impl HttpTransport for RotatingBackend {
        async fn send(
            &self,
            request: &ApiRequest,
        ) -> Result<ApiResponse, rootcause::prelude::Report<crate::error::TransportError>> {
            tokio::task::yield_now().await;
            if request.path == REFRESH_PATH {
                let presented = match &request.body {
                    Body::Json(body) => body["refresh_token"].as_str().unwrap_or_default().to_string(),
                    _ => String::new(),
                };
                let mut current = self.refresh_token.lock().unwrap();
                if presented != *current {
                    return Ok(ApiResponse::new(401, r#"{"detail":"Refresh token revoked"}"#));
                }
                let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
                *current = format!("refresh-{}", n + 1);
                let body = serde_json::json!({"access_token": "fresh", "refresh_token": *current});
                return Ok(ApiResponse::new(200, body.to_string()));
            }
            if request.bearer.as_deref() == Some("fresh") {
                Ok(ApiResponse::new(200, r#"{"total":3}"#))
            } else {
                Ok(ApiResponse::new(401, r#"{"detail":"Token expired"}"#))
            }
        }
    }

    #[tokio::test]
    async fn concurrent_401s_share_one_refresh() {
        let backend = Arc::new(RotatingBackend {
            refresh_token: std::sync::Mutex::new("refresh-1".to_string()),
            refreshes: AtomicUsize::new(0),
        });
        let storage = MemoryStore::with_entries(SIGNED_IN.iter().copied());
        let logouts = Arc::new(AtomicUsize::new(0));
        let counter = logouts.clone();
        let client = ApiClient::new(backend.clone(), Arc::new(storage.clone()))
            .with_logout_hook(Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));

        let (warehouses, shops, employees) = tokio::join!(
            client.get::<serde_json::Value>("/warehouses", Vec::new()),
            client.get::<serde_json::Value>("/shops", Vec::new()),
            client.get::<serde_json::Value>("/employees", Vec::new()),
        );

        assert_eq!(warehouses.unwrap()["total"], 3);
        assert_eq!(shops.unwrap()["total"], 3);
        assert_eq!(employees.unwrap()["total"], 3);
        assert_eq!(backend.refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(logouts.load(Ordering::SeqCst), 0);
        assert_eq!(storage.get(keys::REFRESH_TOKEN).as_deref(), Some("refresh-2"));
    }

    #[tokio::test]
    async fn non_auth_errors_surface_as_status() {
        let h = harness(
            vec![ApiResponse::new(403, r#"{"detail":"Not enough permissions"}"#)],
            SIGNED_IN,
        );

        let err = h
            .client
            .post::<serde_json::Value, _>("/warehouses", &serde_json::json!({"name": "North"}))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ApiError::Status {
                status: 403,
                message: "Not enough permissions".to_string()
            }
        );
        assert_eq!(h.transport.requests().len(), 1);
        assert_eq!(h.storage.get(keys::ACCESS_TOKEN).as_deref(), Some("stale"));
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let h = harness(Vec::new(), SIGNED_IN);
        h.transport.push_failure("connection refused");

        let err = h.client.delete("/shops/s1").await.unwrap_err();

        assert!(matches!(err, ApiError::Transport { ref message } if message.contains("connection refused")));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let h = harness(vec![ApiResponse::new(200, "not json")], SIGNED_IN);

        let err = h
            .client
            .get::<serde_json::Value>("/shops", Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode { .. }));
    }
}
