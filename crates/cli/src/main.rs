//! Remove security local prefix filters and their site bindings listed in a CSV file.

mod api_client;
mod settings;

use anyhow::{Context, Result};
use api_client::{ApiClient, ClientOptions};
use clap::{Args, Parser};
use prefixprune_core::{Action, Event, Reporter, Resource, RunPlan, read_prefix_names};
use settings::{load_settings, resolve_token, settings_path};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "prefixprune")]
#[command(
    about = "Delete local security prefix bindings and prefix filters listed in a CSV file"
)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    api: ApiArgs,

    #[command(flatten)]
    login: LoginArgs,

    #[command(flatten)]
    input: InputArgs,

    /// Settings file with auth_token, controller and query_page_size
    #[arg(long, env = "PREFIXPRUNE_SETTINGS")]
    settings: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[command(next_help_heading = "API")]
struct ApiArgs {
    /// Controller URI, ex. https://api.elcapitan.cloudgenix.com
    #[arg(long, short = 'C')]
    controller: Option<String>,
}

#[derive(Args, Debug)]
#[command(next_help_heading = "Login")]
struct LoginArgs {
    /// Do not verify SSL certificate
    #[arg(long, short = 'I', default_value_t = false)]
    insecure: bool,

    /// Ignore Region-based redirection (also -NR)
    #[arg(long = "noregion", default_value_t = false)]
    ignore_region: bool,
}

#[derive(Args, Debug)]
#[command(next_help_heading = "Prefix Filter CSV")]
struct InputArgs {
    /// Name of the file with path
    #[arg(long, short = 'F')]
    filename: Option<PathBuf>,

    /// Allowed value: security, path, qos, nat
    #[arg(long, short = 'R', default_value = "security", value_parser = Resource::ALLOWED)]
    resource: String,

    /// Allowed Actions: delete_prefix, delete_binding
    #[arg(long, short = 'A')]
    action: Option<String>,
}

/// Prints each event as a status line.
struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, event: Event) {
        println!("{event}");
        if event.is_error()
            && let Some(detail) = event.detail()
        {
            println!("\t{detail}");
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&settings_path(cli.settings.as_deref()))?;
    let token = resolve_token(&settings, |key| std::env::var(key).ok()).ok_or_else(|| {
        anyhow::anyhow!("auth token not found. Please provide a valid auth token")
    })?;

    let plan = preflight(&cli.input)?.with_page_size(settings.page_size());

    let controller = normalize_base_url(&settings.controller(cli.api.controller.as_deref()))?;
    let options = ClientOptions {
        insecure: cli.login.insecure,
        ignore_region: cli.login.ignore_region,
    };
    let client = ApiClient::login(&controller, &token, options).await?;
    tracing::info!(
        controller = %client.base_url(),
        tenant_id = %client.tenant_id(),
        "Session established"
    );

    let mut console = ConsoleReporter;
    let (_, summary) = prefixprune_core::run(&client, &plan, &mut console).await;
    println!("\n{summary}");

    Ok(())
}

/// Validate the CSV, resource and action before any network call.
fn preflight(input: &InputArgs) -> Result<RunPlan> {
    let filename = input.filename.as_ref().ok_or_else(|| {
        anyhow::anyhow!("please provide CSV filename with prefix filter information")
    })?;
    let names = read_prefix_names(filename)
        .with_context(|| format!("failed to read {}", filename.display()))?;

    input.resource.parse::<Resource>()?.ensure_supported()?;
    let action = Action::parse_required(input.action.as_deref())?;

    tracing::debug!(names = names.len(), action = %action, "Input validated");
    Ok(RunPlan::new(action, names))
}

/// Rewrite the two-letter `-NR` short flag to `--noregion`.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            if arg == "-NR" {
                OsString::from("--noregion")
            } else {
                arg
            }
        })
        .collect()
}

fn normalize_base_url(url: &str) -> Result<String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("controller URL must start with http:// or https://");
    }
    Ok(url.trim_end_matches('/').to_string())
}
