//! Join request and password reset command handlers.

use anyhow::Result;
use oap_core::client::{
    ApproveJoinRequest, JoinRequest, JoinRequestQuery, NewJoinRequest, RejectJoinRequest,
};

pub async fn submit(
    tenant: i64,
    employee: String,
    role: String,
    note: Option<String>,
) -> Result<()> {
    let client = super::access_client()?;

    let rows = client
        .submit_join_request(&NewJoinRequest {
            tenant_id: tenant,
            employee_id: employee,
            requested_role: role,
            note,
        })
        .await?;

    match rows.first() {
        Some(row) => println!("Submitted join request {}", row.join_request_id),
        None => println!("Submitted join request"),
    }
    Ok(())
}

pub async fn list(tenant: Option<i64>, status: Option<String>, limit: u32) -> Result<()> {
    let client = super::access_client()?;

    let rows = client
        .list_join_requests(&JoinRequestQuery {
            tenant_id: tenant,
            status,
            limit,
        })
        .await?;

    if rows.is_empty() {
        println!("No join requests found.");
        return Ok(());
    }

    for row in &rows {
        println!("{}", format_row(row));
    }
    Ok(())
}

fn format_row(row: &JoinRequest) -> String {
    format!(
        "#{}  {}  {}  {}",
        row.join_request_id,
        row.status.as_deref().unwrap_or("-"),
        row.employee_id.as_deref().unwrap_or("-"),
        row.requested_role.as_deref().unwrap_or("-"),
    )
}

pub async fn approve(
    join_request_id: i64,
    approver: String,
    role: String,
    password_hash: String,
) -> Result<()> {
    let client = super::access_client()?;

    client
        .approve_join_request(&ApproveJoinRequest {
            join_request_id,
            approved_by_user_id: approver,
            role,
            password_hash,
        })
        .await?;

    println!("Approved join request {join_request_id}");
    Ok(())
}

pub async fn reject(join_request_id: i64, rejecter: String, reason: Option<String>) -> Result<()> {
    let client = super::access_client()?;

    client
        .reject_join_request(&RejectJoinRequest {
            join_request_id,
            rejected_by_user_id: rejecter,
            reason,
        })
        .await?;

    println!("Rejected join request {join_request_id}");
    Ok(())
}

pub async fn reset_request(who: &str) -> Result<()> {
    let client = super::access_client()?;
    client.create_password_reset_request(who).await?;
    println!("Password reset requested for {who}");
    Ok(())
}

pub async fn reset_confirm(token: &str, password_hash: &str) -> Result<()> {
    let client = super::access_client()?;
    client.reset_password_with_token(token, password_hash).await?;
    println!("Password updated.");
    Ok(())
}
