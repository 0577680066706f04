//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "oap")]
#[command(version = "0.1")]
#[command(about = "Access portal client (join requests, approvals, password reset)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Submit a join request for an employee
    Submit {
        /// Tenant the employee is joining
        #[arg(long)]
        tenant: i64,

        /// Employee ID; the corporate email is derived from it
        #[arg(long)]
        employee: String,

        /// Role the employee is requesting
        #[arg(long)]
        role: String,

        /// Optional note for the approver
        #[arg(long)]
        note: Option<String>,
    },

    /// List join requests, newest first
    List {
        /// Filter by tenant
        #[arg(long)]
        tenant: Option<i64>,

        /// Filter by status ("all" disables the filter)
        #[arg(long)]
        status: Option<String>,

        /// Maximum number of rows
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },

    /// Approve a join request
    Approve {
        /// Join request ID
        #[arg(long = "id", value_name = "JOIN_REQUEST_ID")]
        join_request_id: i64,

        /// User ID of the approving administrator
        #[arg(long)]
        approver: String,

        /// Role to grant
        #[arg(long)]
        role: String,

        /// Password hash for the new account
        #[arg(long)]
        password_hash: String,
    },

    /// Reject a join request
    Reject {
        /// Join request ID
        #[arg(long = "id", value_name = "JOIN_REQUEST_ID")]
        join_request_id: i64,

        /// User ID of the rejecting administrator
        #[arg(long)]
        rejecter: String,

        /// Optional rejection reason
        #[arg(long)]
        reason: Option<String>,
    },

    /// Password reset flows
    Reset {
        #[command(subcommand)]
        command: ResetCommands,
    },

    /// Mark the local session authenticated
    Login,

    /// Clear the local session
    Logout,

    /// Evaluate the page gate for a path
    Gate {
        /// Page path, e.g. /dashboard.html
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ResetCommands {
    /// Request a reset token for an employee ID or email
    Request {
        #[arg(value_name = "EMPLOYEE_OR_EMAIL")]
        who: String,
    },
    /// Complete a reset with an emailed token
    Confirm {
        /// Reset token from the email
        #[arg(long)]
        token: String,

        /// Hash of the new password
        #[arg(long)]
        password_hash: String,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Show the resolved backend configuration
    Show {
        /// Print shell export lines (namespaced and legacy names)
        #[arg(long)]
        env: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Submit {
            tenant,
            employee,
            role,
            note,
        } => commands::access::submit(tenant, employee, role, note).await,

        Commands::List {
            tenant,
            status,
            limit,
        } => commands::access::list(tenant, status, limit).await,

        Commands::Approve {
            join_request_id,
            approver,
            role,
            password_hash,
        } => commands::access::approve(join_request_id, approver, role, password_hash).await,

        Commands::Reject {
            join_request_id,
            rejecter,
            reason,
        } => commands::access::reject(join_request_id, rejecter, reason).await,

        Commands::Reset { command } => match command {
            ResetCommands::Request { who } => commands::access::reset_request(&who).await,
            ResetCommands::Confirm {
                token,
                password_hash,
            } => commands::access::reset_confirm(&token, &password_hash).await,
        },

        Commands::Login => commands::session::login(),
        Commands::Logout => commands::session::logout(),
        Commands::Gate { path } => commands::session::gate(&path),

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Show { env } => commands::config::show(env),
        },
    }
}
