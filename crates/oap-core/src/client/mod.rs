//! HTTP client for the backend's REST and RPC surfaces.
//!
//! Every operation is a single request/response round trip: build the
//! authenticated request, issue it once, normalize the result. There are no
//! retries, no caching, and no cancellation; the caller decides whether to
//! try again.

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use crate::config::BackendConfig;
use crate::error::{ApiError, ApiResult};

mod types;

pub use types::{
    ApproveJoinRequest, DEFAULT_LIST_LIMIT, EMAIL_DOMAIN, JoinRequest, JoinRequestQuery,
    NewJoinRequest, RejectJoinRequest, STATUS_ALL,
};

use types::{CreatePasswordResetParams, JoinRequestRecord, ResetPasswordParams};

/// Resource path for the join-requests table.
const JOIN_REQUESTS_PATH: &str = "/rest/v1/join_requests";
/// Path prefix for RPC function calls.
const RPC_PATH: &str = "/rest/v1/rpc";

/// Client for the access API (join requests, approvals, password reset).
///
/// Holds the resolved backend configuration and one connection pool; cheap
/// to share behind a reference for the lifetime of the program.
pub struct AccessClient {
    config: BackendConfig,
    http: reqwest::Client,
}

impl AccessClient {
    /// Creates a new client over a resolved backend configuration.
    ///
    /// # Panics
    /// In test builds (`#[cfg(test)]`), panics if `base_url` is the
    /// production backend. Unit tests must point at a mock server.
    pub fn new(config: BackendConfig) -> Self {
        #[cfg(test)]
        assert_ne!(
            config.base_url,
            crate::config::DEFAULT_BASE_URL,
            "tests must not use the production backend; point base_url at a mock server"
        );

        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Fails fast, before any network I/O, when the backend is unconfigured.
    fn ensure_configured(&self) -> ApiResult<()> {
        if self.config.base_url.trim().is_empty() {
            return Err(ApiError::config(
                "backend base URL is not configured; set base_url in [backend] or OAP_SUPABASE_URL",
            ));
        }
        if self.config.anon_key.trim().is_empty() {
            return Err(ApiError::config(
                "backend anon key is not configured; set anon_key in [backend] or OAP_SUPABASE_ANON_KEY",
            ));
        }
        Ok(())
    }

    /// Issues one request against the backend and normalizes the response.
    ///
    /// Default headers carry the anon key (`apikey` + bearer) and a JSON
    /// content type; caller-supplied headers win on conflict. The body is
    /// read as text: empty bodies yield `None`, anything else must parse as
    /// JSON. A non-success status becomes a [`ApiErrorKind::Status`] error
    /// carrying the status code and the parsed payload.
    ///
    /// [`ApiErrorKind::Status`]: crate::error::ApiErrorKind::Status
    pub async fn api_fetch<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        extra_headers: HeaderMap,
        body: Option<&B>,
    ) -> ApiResult<Option<Value>> {
        self.ensure_configured()?;

        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(&self.config.anon_key)?);
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", self.config.anon_key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &extra_headers {
            headers.insert(name.clone(), value.clone());
        }

        tracing::debug!(%method, path, "access api request");

        let mut request = self.http.request(method, &url).headers(headers);
        if let Some(body) = body {
            let encoded = serde_json::to_vec(body)
                .map_err(|e| ApiError::parse(format!("failed to encode request body: {e}")))?;
            request = request.body(encoded);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::transport(format!("failed to read response body: {e}")))?;

        // Parse before the status check: an unparseable body is a parse
        // error regardless of status.
        let payload = if text.is_empty() {
            None
        } else {
            Some(
                serde_json::from_str::<Value>(&text)
                    .map_err(|e| ApiError::parse(format!("invalid JSON in response: {e}")))?,
            )
        };

        if !status.is_success() {
            return Err(ApiError::status(status.as_u16(), payload, &text));
        }

        Ok(payload)
    }

    /// Submits a join request on behalf of an employee.
    ///
    /// The corporate email is always derived from the trimmed employee ID;
    /// a blank ID is rejected before any network I/O. Returns the created
    /// row(s) (`Prefer: return=representation`).
    pub async fn submit_join_request(
        &self,
        request: &NewJoinRequest,
    ) -> ApiResult<Vec<JoinRequest>> {
        let employee_id = request.employee_id.trim();
        if employee_id.is_empty() {
            return Err(ApiError::validation(
                "employee ID is required for a join request",
            ));
        }

        let email = format!("{employee_id}{EMAIL_DOMAIN}");
        let note = request
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let record = JoinRequestRecord {
            tenant_id: request.tenant_id,
            employee_id,
            requested_role: &request.requested_role,
            email,
            // The employee ID doubles as the initial username and display
            // name; account setup fills in the real name later.
            username: employee_id,
            full_name: employee_id,
            note,
        };

        let mut headers = HeaderMap::new();
        headers.insert("prefer", HeaderValue::from_static("return=representation"));

        let payload = self
            .api_fetch(Method::POST, JOIN_REQUESTS_PATH, headers, Some(&record))
            .await?;
        decode_rows(payload)
    }

    /// Lists join requests, newest first.
    pub async fn list_join_requests(
        &self,
        query: &JoinRequestQuery,
    ) -> ApiResult<Vec<JoinRequest>> {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in query.query_pairs() {
            serializer.append_pair(key, &value);
        }
        let path = format!("{JOIN_REQUESTS_PATH}?{}", serializer.finish());

        let payload = self
            .api_fetch(Method::GET, &path, HeaderMap::new(), None::<&Value>)
            .await?;
        decode_rows(payload)
    }

    /// Invokes a named RPC function with a JSON parameter object.
    pub async fn call_rpc<P: Serialize + ?Sized>(
        &self,
        function_name: &str,
        params: &P,
    ) -> ApiResult<Option<Value>> {
        let path = format!("{RPC_PATH}/{function_name}");
        self.api_fetch(Method::POST, &path, HeaderMap::new(), Some(params))
            .await
    }

    /// Approves a join request via the `approve_join_request` RPC.
    pub async fn approve_join_request(
        &self,
        params: &ApproveJoinRequest,
    ) -> ApiResult<Option<Value>> {
        self.call_rpc("approve_join_request", params).await
    }

    /// Rejects a join request via the `reject_join_request` RPC.
    pub async fn reject_join_request(
        &self,
        params: &RejectJoinRequest,
    ) -> ApiResult<Option<Value>> {
        self.call_rpc("reject_join_request", params).await
    }

    /// Starts a password reset for an employee ID or email address.
    pub async fn create_password_reset_request(
        &self,
        employee_id_or_email: &str,
    ) -> ApiResult<Option<Value>> {
        self.call_rpc(
            "create_password_reset_request",
            &CreatePasswordResetParams {
                employee_id_or_email,
            },
        )
        .await
    }

    /// Completes a password reset using an emailed reset token.
    pub async fn reset_password_with_token(
        &self,
        reset_token: &str,
        new_password_hash: &str,
    ) -> ApiResult<Option<Value>> {
        self.call_rpc(
            "reset_password_with_token",
            &ResetPasswordParams {
                reset_token,
                new_password_hash,
            },
        )
        .await
    }
}

/// Decodes a row-set payload; an empty body counts as no rows.
fn decode_rows(payload: Option<Value>) -> ApiResult<Vec<JoinRequest>> {
    match payload {
        None => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| ApiError::parse(format!("unexpected join request payload: {e}"))),
    }
}

fn header_value(value: &str) -> ApiResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| ApiError::config("anon key contains characters not valid in a header"))
}
