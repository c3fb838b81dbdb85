use std::{process::ExitCode, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    FetchOutcome, HttpLeaveTypeApi, LeaveTypeContext, LeaveTypesPage, MutationDialog,
    PageView, SubmitError, ToastReporter,
};
use shared::domain::LeaveTypeId;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser, Debug)]
#[command(name = "leave-types", about = "Manage leave types")]
struct Args {
    /// Overrides the api url from leave_types.toml and the environment.
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current leave types.
    List,
    /// Create a leave type.
    Add {
        name: String,
    },
    /// Rename the leave type with the given id.
    Edit {
        id: String,
        name: String,
    },
    Delete {
        id: String,
    },
}

/// Prints toasts the way a terminal user expects: successes on stdout,
/// failures on stderr.
struct ConsoleToastReporter;

impl ToastReporter for ConsoleToastReporter {
    fn report_success(&self, message: &str) {
        println!("{message}");
    }

    fn report_error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings()?;
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    let api_url = settings.api_url()?;
    let mut api = HttpLeaveTypeApi::new(api_url.as_str(), settings.request_timeout())
        .context("failed to build leave type client")?;
    debug!(
        api_url = %api.base_url(),
        timeout_secs = settings.request_timeout_secs,
        "leave type client ready"
    );
    if let Some(token) = settings.auth_token {
        api = api.with_bearer_token(token);
    }

    let ctx = LeaveTypeContext::new(Arc::new(api), Arc::new(ConsoleToastReporter));
    let mut page = LeaveTypesPage::new(ctx);
    if let Some(FetchOutcome::Failed(err)) = page.mount().await {
        return Err(anyhow!(err).context("failed to load leave types"));
    }

    // Request failures were already reported as toasts.
    let saved = match args.command {
        Command::List => true,
        Command::Add { name } => save(page.add_dialog(), name).await?,
        Command::Edit { id, name } => {
            let id = LeaveTypeId::new(id);
            let dialog = page
                .row_dialog(&id)
                .ok_or_else(|| anyhow!("no leave type with id '{id}'"))?;
            save(dialog, name).await?
        }
        Command::Delete { id } => page.delete(&LeaveTypeId::new(id)).await.is_ok(),
    };
    if !saved {
        return Ok(ExitCode::FAILURE);
    }

    print_page(&page.render());
    Ok(ExitCode::SUCCESS)
}

async fn save(dialog: &mut MutationDialog, name: String) -> Result<bool> {
    dialog.open();
    dialog.set_name(name);
    match dialog.submit().await {
        Ok(_) => Ok(true),
        Err(SubmitError::Request(_)) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

fn print_page(view: &PageView) {
    match view {
        PageView::Loading { message } => println!("{message}"),
        PageView::Empty { title, hint, .. } => {
            println!("{title}");
            println!("{hint}");
        }
        PageView::Table { rows } => {
            let width = rows
                .iter()
                .map(|row| row.id.as_str().len())
                .max()
                .unwrap_or(0)
                .max(2);
            println!("{:<width$}  NAME", "ID");
            for row in rows {
                println!("{:<width$}  {}", row.id.as_str(), row.name);
            }
        }
    }
}
