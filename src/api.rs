//! HTTP client for the BankEdge REST API.
//!
//! Every call except login and config carries the session's bearer token.
//! A 401 on an authenticated call clears the session and sends the browser
//! back to the login route before the error reaches the caller.

use gloo_net::http::{Method, Request, RequestBuilder};
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::models::{
    CheckoutSession, DashboardData, Device, DeviceActionResult, LoginRequest, LoginResponse,
    MlData, NewUser, PaymentDetails, PaymentIntentHandle, PaymentRecord, PaymentResultRequest,
    StripeConfig, SystemData, TransactionPage, TransactionsResponse, UserActionResult, UserUpdate,
};
use crate::session::{self, KeyValueStore, SessionStore};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Your session has expired. Please sign in again.")]
    Unauthorized,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("{message}")]
    Server { status: u16, message: String },
}

impl From<ApiError> for String {
    fn from(err: ApiError) -> Self {
        err.to_string()
    }
}

/// Pull a human-readable message out of an error body. The backend uses
/// `error` for most failures and `msg` for authentication ones.
pub fn server_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error", "msg", "message"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Request failed (HTTP {})", status))
}

pub fn check_status(status: u16, body: &str) -> Result<(), ApiError> {
    match status {
        200..=299 => Ok(()),
        401 => Err(ApiError::Unauthorized),
        _ => Err(ApiError::Server {
            status,
            message: server_message(status, body),
        }),
    }
}

pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Join a configured base (possibly empty for same-origin) with an API path.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiClient {
    base_url: String,
}

/// Client provided by `App`. Falls back to same-origin requests.
/// Status check for a finished call. A 401 on an authenticated call
/// expires the session in `store` and sends the browser to the login route.
fn settle<S: KeyValueStore>(
    status: u16,
    body: &str,
    authenticated: bool,
    store: &SessionStore<S>,
    redirect: impl FnOnce(&str),
) -> Result<(), ApiError> {
    match check_status(status, body) {
        Ok(()) => Ok(()),
        Err(ApiError::Unauthorized) if authenticated => {
            log::warn!("Received 401, token rejected");
            store.expire(redirect);
            Err(ApiError::Unauthorized)
        }
        Err(e) => {
            log::error!("API error: {}", e);
            Err(e)
        }
    }
}

pub fn use_api() -> ApiClient {
    use_context::<ApiClient>().unwrap_or_default()
}

/// Client held by a view that may have unmounted while a request was in
/// flight. `None` once the view's owner is gone.
pub fn live_client(api: StoredValue<ApiClient>) -> Option<ApiClient> {
    let client = api.try_get_value();
    if client.is_none() {
        log::debug!("View unmounted, follow-up request skipped");
    }
    client
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn builder(&self, method: Method, path: &str, authenticated: bool) -> RequestBuilder {
        let url = join_url(&self.base_url, path);
        let mut builder = RequestBuilder::new(&url).method(method);
        if authenticated {
            if let Some(token) = SessionStore::browser().token() {
                builder = builder.header("Authorization", &format!("Bearer {}", token));
            }
        }
        builder
    }

    /// Send and return the status with the raw body.
    async fn send_raw(
        &self,
        request: Result<Request, gloo_net::Error>,
    ) -> Result<(u16, String), ApiError> {
        let request = request.map_err(|e| ApiError::Network(e.to_string()))?;
        let url = request.url();
        let response = request.send().await.map_err(|e| {
            log::error!("Request to {} failed: {}", url, e);
            ApiError::Network(e.to_string())
        })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok((status, body))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: Result<Request, gloo_net::Error>,
        authenticated: bool,
    ) -> Result<T, ApiError> {
        let (status, body) = self.send_raw(request).await?;
        settle(status, &body, authenticated, &SessionStore::browser(), session::redirect_to)?;
        decode(&body)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.builder(Method::GET, path, true).build();
        self.execute(request, true).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let request = self.builder(Method::POST, path, true).json(body);
        self.execute(request, true).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.builder(Method::POST, path, true).build();
        self.execute(request, true).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let request = self.builder(Method::PUT, path, true).json(body);
        self.execute(request, true).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.builder(Method::DELETE, path, true).build();
        self.execute(request, true).await
    }

    // -- Auth --

    /// Login is unauthenticated and a 401 here only means bad credentials,
    /// so the reply body is decoded whatever the status.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = self.builder(Method::POST, "/api/login", false).json(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        });
        let (status, body) = self.send_raw(request).await?;
        match decode::<LoginResponse>(&body) {
            Ok(reply) => Ok(reply),
            Err(e) => {
                check_status(status, &body)?;
                Err(e)
            }
        }
    }

    // -- Dashboard and devices --

    pub async fn dashboard_data(&self) -> Result<DashboardData, ApiError> {
        self.get("/api/dashboard-data").await
    }

    pub async fn devices(&self) -> Result<Vec<Device>, ApiError> {
        self.get("/api/devices").await
    }

    pub async fn sync_device(&self, device_id: &str) -> Result<DeviceActionResult, ApiError> {
        self.post_empty(&format!("/api/devices/{}/sync", device_id)).await
    }

    pub async fn toggle_device_power(&self, device_id: &str) -> Result<DeviceActionResult, ApiError> {
        self.post_empty(&format!("/api/devices/{}/power", device_id)).await
    }

    // -- ML and transactions --

    pub async fn ml_data(&self) -> Result<MlData, ApiError> {
        self.get("/api/ml-data").await
    }

    pub async fn transactions(&self, page: u32, per_page: u32) -> Result<TransactionPage, ApiError> {
        let path = format!("/api/transactions?page={}&per_page={}", page.max(1), per_page);
        self.get::<TransactionsResponse>(&path)
            .await
            .map(TransactionsResponse::into_page)
    }

    // -- System management --

    pub async fn system_data(&self) -> Result<SystemData, ApiError> {
        self.get("/api/system-data").await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<UserActionResult, ApiError> {
        self.post("/api/users", user).await
    }

    pub async fn update_user(&self, user_id: i64, update: &UserUpdate) -> Result<UserActionResult, ApiError> {
        self.put(&format!("/api/users/{}", user_id), update).await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<UserActionResult, ApiError> {
        self.delete(&format!("/api/users/{}", user_id)).await
    }

    // -- Payments --

    pub async fn stripe_config(&self) -> Result<StripeConfig, ApiError> {
        let request = self.builder(Method::GET, "/api/config", false).build();
        self.execute(request, false).await
    }

    pub async fn init_payment_intent(&self) -> Result<PaymentIntentHandle, ApiError> {
        self.post_empty("/api/init-payment-intent").await
    }

    pub async fn update_payment_intent(
        &self,
        intent_id: &str,
        details: &PaymentDetails,
    ) -> Result<PaymentIntentHandle, ApiError> {
        self.post(&format!("/api/update-payment-intent/{}", intent_id), details)
            .await
    }

    pub async fn record_payment_result(&self, intent_id: &str) -> Result<PaymentRecord, ApiError> {
        self.post(
            "/api/payment-success",
            &PaymentResultRequest {
                payment_intent: intent_id.to_string(),
            },
        )
        .await
    }

    pub async fn create_checkout_session(&self, details: &PaymentDetails) -> Result<CheckoutSession, ApiError> {
        self.post("/api/create-checkout-session", details).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::models::{DashboardData, LoginResponse, Role};
    use crate::session::MemoryStorage;

    fn signed_in() -> SessionStore<MemoryStorage> {
        let store = SessionStore::new(MemoryStorage::default());
        store
            .accept_login(
                "admin.kl@bankedge.com",
                LoginResponse {
                    access_token: Some("jwt-token".to_string()),
                    role: Some(Role::parse("admin")),
                    user_location: Some("KL".to_string()),
                    msg: None,
                },
            )
            .unwrap();
        store
    }

    #[test]
    fn test_rejected_token_clears_session_and_redirects() {
        let store = signed_in();
        let target = RefCell::new(None);

        let err = settle(401, r#"{"msg": "Token has expired"}"#, true, &store, |to| {
            *target.borrow_mut() = Some(to.to_string())
        })
        .unwrap_err();

        assert_eq!(err, ApiError::Unauthorized);
        assert!(store.token().is_none());
        assert!(store.current().is_none());
        assert_eq!(target.into_inner().as_deref(), Some("/"));
    }

    #[test]
    fn test_other_errors_keep_session() {
        let store = signed_in();
        let target = RefCell::new(None);

        let err = settle(500, r#"{"error": "boom"}"#, true, &store, |to| {
            *target.borrow_mut() = Some(to.to_string())
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "boom");

        settle(401, "{}", false, &store, |to| *target.borrow_mut() = Some(to.to_string())).unwrap_err();
        assert_eq!(store.token().as_deref(), Some("jwt-token"));
        assert!(target.into_inner().is_none());
    }

    #[test]
    fn test_client_gone_after_view_unmounts() {
        let owner = Owner::new();
        let api = owner.with(|| StoredValue::new(ApiClient::new("http://localhost:5000")));
        assert!(live_client(api).is_some());

        owner.cleanup();
        assert!(live_client(api).is_none());
    }

    #[test]
    fn test_success_statuses_pass() {
        assert!(check_status(200, "{}").is_ok());
        assert!(check_status(201, "{}").is_ok());
    }

    #[test]
    fn test_unauthorized_is_distinct() {
        assert_eq!(
            check_status(401, r#"{"msg": "Token has expired"}"#),
            Err(ApiError::Unauthorized)
        );
    }

    #[test]
    fn test_server_error_uses_error_field() {
        let err = check_status(403, r#"{"error": "Unauthorized access to this device"}"#).unwrap_err();
        assert_eq!(
            err,
            ApiError::Server {
                status: 403,
                message: "Unauthorized access to this device".to_string()
            }
        );
        assert_eq!(err.to_string(), "Unauthorized access to this device");
    }

    #[test]
    fn test_server_message_falls_back_to_msg_then_status() {
        assert_eq!(server_message(400, r#"{"msg": "Bad request"}"#), "Bad request");
        assert_eq!(server_message(502, "<html>Bad Gateway</html>"), "Request failed (HTTP 502)");
        assert_eq!(server_message(500, r#"{"error": ""}"#), "Request failed (HTTP 500)");
    }

    #[test]
    fn test_decode_reports_parse_error() {
        let err = decode::<DashboardData>("not json").unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("", "/api/devices"), "/api/devices");
        assert_eq!(
            join_url("https://bankedge.example/", "/api/devices"),
            "https://bankedge.example/api/devices"
        );
        assert_eq!(join_url("http://localhost:5000", "api/login"), "http://localhost:5000/api/login");
    }
}
