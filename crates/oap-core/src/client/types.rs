//! Request and response payload types for the access API.

use serde::{Deserialize, Serialize};

/// Fixed corporate mail domain appended to employee IDs.
pub const EMAIL_DOMAIN: &str = "@saudiags.com";

/// Default row cap for join request listings.
pub const DEFAULT_LIST_LIMIT: u32 = 100;

/// Sentinel status value meaning "no status filter".
pub const STATUS_ALL: &str = "all";

/// Input for a join request submission.
///
/// The employee enters only the ID and the requested role; email, username,
/// and display name are all derived from the ID.
#[derive(Debug, Clone)]
pub struct NewJoinRequest {
    pub tenant_id: i64,
    pub employee_id: String,
    pub requested_role: String,
    /// Optional note for the approver; dropped when blank.
    pub note: Option<String>,
}

/// Row shape sent to the join-requests resource.
#[derive(Debug, Serialize)]
pub(crate) struct JoinRequestRecord<'a> {
    pub tenant_id: i64,
    pub employee_id: &'a str,
    pub requested_role: &'a str,
    pub email: String,
    pub username: &'a str,
    pub full_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'a str>,
}

/// A join request row as returned by the backend.
///
/// The row shape is owned by the backend; most fields stay optional so the
/// client tolerates schema drift, and unknown columns are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct JoinRequest {
    pub join_request_id: i64,
    #[serde(default)]
    pub tenant_id: Option<i64>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub requested_role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Filters for listing join requests.
#[derive(Debug, Clone)]
pub struct JoinRequestQuery {
    /// Optional equality filter on the tenant.
    pub tenant_id: Option<i64>,
    /// Optional equality filter on the status; [`STATUS_ALL`] (or absent)
    /// disables it.
    pub status: Option<String>,
    /// Row cap; newest requests come first.
    pub limit: u32,
}

impl Default for JoinRequestQuery {
    fn default() -> Self {
        Self {
            tenant_id: None,
            status: None,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl JoinRequestQuery {
    /// Builds the PostgREST query pairs for this filter set.
    ///
    /// Always selects all columns, orders by the join request ID descending,
    /// and caps the row count.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("select", "*".to_string())];

        if let Some(tenant_id) = self.tenant_id {
            pairs.push(("tenant_id", format!("eq.{tenant_id}")));
        }
        if let Some(status) = self.status.as_deref()
            && status != STATUS_ALL
            && !status.is_empty()
        {
            pairs.push(("status", format!("eq.{status}")));
        }

        pairs.push(("order", "join_request_id.desc".to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}

/// Parameters for the `approve_join_request` RPC.
#[derive(Debug, Clone, Serialize)]
pub struct ApproveJoinRequest {
    #[serde(rename = "p_join_request_id")]
    pub join_request_id: i64,
    #[serde(rename = "p_approved_by_user_id")]
    pub approved_by_user_id: String,
    #[serde(rename = "p_role")]
    pub role: String,
    #[serde(rename = "p_password_hash")]
    pub password_hash: String,
}

/// Parameters for the `reject_join_request` RPC.
#[derive(Debug, Clone, Serialize)]
pub struct RejectJoinRequest {
    #[serde(rename = "p_join_request_id")]
    pub join_request_id: i64,
    #[serde(rename = "p_rejected_by_user_id")]
    pub rejected_by_user_id: String,
    /// Sent as `null` when absent.
    #[serde(rename = "p_reason")]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePasswordResetParams<'a> {
    pub employee_id_or_email: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResetPasswordParams<'a> {
    pub reset_token: &'a str,
    pub new_password_hash: &'a str,
}
