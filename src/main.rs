// src/main.rs
use anyhow::{bail, Context, Result};
use attendance_gateway::{
    canon::canonical_json,
    display,
    harness::{self, HarnessOptions, ScanMode},
    AdminSession, ClientConfig, GatewayClient,
};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Attendance backend client")]
struct Cli {
    /// Backend base URL; overrides ATTENDANCE_API_BASE
    #[arg(long, global = true)]
    base: Option<String>,
    /// Print raw JSON instead of summaries
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct AdminAuth {
    /// Bearer token from a previous `login`
    #[arg(long, env = "ATTENDANCE_ADMIN_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Admin password; used to log in when no token is given
    #[arg(long, env = "ATTENDANCE_ADMIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in as admin and print the bearer token
    Login {
        #[arg(long, env = "ATTENDANCE_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List class slots
    Slots,
    /// Make a slot the active one
    SetSlot {
        slot_id: String,
        #[command(flatten)]
        auth: AdminAuth,
    },
    /// Show the active slot
    ActiveSlot {
        #[command(flatten)]
        auth: AdminAuth,
    },
    /// Show attendance rows for a subject
    Attendance {
        #[arg(long)]
        subject: String,
        /// Only rows for this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        #[command(flatten)]
        auth: AdminAuth,
    },
    /// Enroll a student (opens the backend camera)
    Enroll { roll_no: String },
    /// Scan for attendance (opens the backend camera)
    Scan {
        /// Check group membership against this slot instead of the active one
        #[arg(long)]
        slot: Option<String>,
    },
    /// Run the login → slots → set slot → active slot → scan → attendance sequence
    Debug {
        #[arg(long, default_value = harness::DEFAULT_PASSWORD)]
        password: String,
        /// Skip the camera and log a canned VALID outcome
        #[arg(long)]
        mock_scan: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env().context("invalid configuration")?;
    if let Some(base) = cli.base.as_deref() {
        config = ClientConfig { base_url: ClientConfig::new(base).base_url, ..config };
    }
    let client = GatewayClient::new(config)?;
    info!(base = client.base_url(), "using backend");

    match cli.command {
        Command::Login { password } => {
            let res = client.login(&password).await.map_err(hint)?;
            if cli.json {
                println!("{}", canonical_json(&res));
            }
            match res.session() {
                Some(session) => println!("{}", session.token()),
                None => bail!("{}", res.message.unwrap_or_else(|| "Invalid password".into())),
            }
        }
        Command::Slots => {
            let slots = client.slots().await.map_err(hint)?;
            if cli.json {
                println!("{}", canonical_json(&slots));
            } else {
                for slot in &slots {
                    println!("{}\t{}", slot.id, display::slot_label(slot));
                }
                println!("subjects: {}", display::unique_subjects(&slots).join(", "));
            }
        }
        Command::SetSlot { slot_id, auth } => {
            let slots = client.slots().await.map_err(hint)?;
            if display::find_slot(&slots, slot_id.trim()).is_none() {
                bail!("unknown slot {slot_id:?}; run `slots` to list them");
            }
            let session = admin_session(&client, auth).await?;
            let res = client.set_active_slot(&slot_id, &session).await.map_err(hint)?;
            if cli.json {
                println!("{}", canonical_json(&res));
            } else if let (true, Some(active)) = (res.ok, res.active.as_ref()) {
                println!("{}: {}", res.message, display::slot_label(active));
            }
            if !res.ok {
                bail!("failed to set slot: {}", res.message);
            }
        }
        Command::ActiveSlot { auth } => {
            let session = admin_session(&client, auth).await?;
            let active = client.active_slot(&session).await.map_err(hint)?;
            match (cli.json, active) {
                (true, active) => println!("{}", canonical_json(&active)),
                (false, Some(slot)) => println!("{}\t{}", slot.id, display::slot_label(&slot)),
                (false, None) => println!("no active slot"),
            }
        }
        Command::Attendance { subject, date, auth } => {
            let session = admin_session(&client, auth).await?;
            let rows = client
                .attendance(&subject, date.as_deref(), &session)
                .await
                .map_err(hint)?;
            if cli.json {
                println!("{}", canonical_json(&rows));
            } else {
                println!("{}", display::attendance_table(&rows));
            }
        }
        Command::Enroll { roll_no } => {
            eprintln!("Opening camera on backend... Please show barcode and face.");
            let res = client.enroll(&roll_no).await.map_err(hint)?;
            if cli.json {
                println!("{}", canonical_json(&res));
            } else {
                println!("{}", display::enroll_summary(&res));
            }
            if !res.ok {
                bail!("enrollment failed");
            }
        }
        Command::Scan { slot } => {
            eprintln!("Opening camera on backend... Please show your face.");
            let outcome = client.scan(slot.as_deref()).await.map_err(hint)?;
            if cli.json {
                println!("{}", canonical_json(&outcome));
            } else {
                println!("{}", display::scan_summary(&outcome));
            }
            if !outcome.is_marked() {
                bail!("attendance not marked");
            }
        }
        Command::Debug { password, mock_scan } => {
            let scan = if mock_scan { ScanMode::Mock } else { ScanMode::Live };
            let report = harness::run_sequence(&client, &HarnessOptions { password, scan }).await;
            for line in &report.log {
                println!("{line}");
            }
            if !report.succeeded() {
                bail!("debug sequence stopped: {:?}", report.verdict);
            }
        }
    }
    Ok(())
}

async fn admin_session(client: &GatewayClient, auth: AdminAuth) -> Result<AdminSession> {
    if let Some(token) = auth.token.filter(|t| !t.is_empty()) {
        return Ok(AdminSession::new(token));
    }
    let Some(password) = auth.password else {
        bail!("admin command needs --token or --password");
    };
    client.authenticate(&password).await.map_err(hint)
}

fn hint(e: attendance_gateway::ClientError) -> anyhow::Error {
    let hint = e.user_hint();
    anyhow::Error::new(e).context(hint)
}
