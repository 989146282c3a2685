use appsvc::{NoWait, RollbackPolicy, StdinPause, Workflow, WorkflowError};
use appsvc_cloud_azure::{AzureManagementClient, ClientSecretCredential};
use appsvc_config::{ConfigError, Credentials, Endpoints, SampleSettings};
use clap::Parser;
use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser)]
#[command(name = "appsvc-demo", version)]
#[command(
    about = "Provision an Azure App Service site, show its URL, then tear it down",
    long_about = "Provision an Azure App Service site, show its URL, then tear it down.\n\n\
    Credentials are read from AZURE_TENANT_ID, AZURE_CLIENT_ID, AZURE_SECRET and \
    AZURE_SUBSCRIPTION_ID."
)]
struct Cli {
    /// Azure region for every resource
    #[arg(short, long)]
    location: Option<String>,
    /// Resource group to provision into
    #[arg(short = 'g', long)]
    resource_group: Option<String>,
    /// Tear down right away instead of waiting for Enter
    #[arg(long)]
    no_wait: bool,
    /// Delete already-created resources when a step fails
    #[arg(long)]
    rollback_on_failure: bool,
    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    // stdout はステータス行専用、ログは stderr へ
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e @ ConfigError::MissingCredentials(_)) => {
            println!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let endpoints = Endpoints::from_env()?;

    let mut settings = SampleSettings::default();
    if let Some(location) = cli.location {
        settings.location = location;
    }
    if let Some(group) = cli.resource_group {
        settings.resource_group = group;
    }

    let credential = ClientSecretCredential::new(
        endpoints.authority_host.as_str(),
        credentials.tenant_id.as_str(),
        credentials.client_id.as_str(),
        credentials.secret.as_str(),
        endpoints.management_scope(),
    );
    let client = AzureManagementClient::new(
        endpoints.resource_manager.as_str(),
        credentials.subscription_id.as_str(),
    )?;

    let rollback = if cli.rollback_on_failure {
        RollbackPolicy::BestEffort
    } else {
        RollbackPolicy::Leave
    };
    let workflow = Workflow::new(&credential, &client, settings).with_rollback(rollback);

    let mut rng = StdRng::from_entropy();
    let mut stdout = std::io::stdout();

    let result = if cli.no_wait {
        workflow.run(&mut rng, &mut NoWait, &mut stdout).await
    } else {
        let (mut pause, cancel) = StdinPause::new();

        // 1回目の Ctrl-C は待機を打ち切って後片付けへ、2回目で中断
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            eprintln!(
                "{}",
                "Interrupted: skipping the wait, resources will be deleted. Press Ctrl-C again to abort."
                    .yellow()
            );
            cancel.cancel();
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        });

        workflow.run(&mut rng, &mut pause, &mut stdout).await
    };

    match result {
        Ok(outcome) => {
            tracing::debug!("Finished run for {}", outcome.site_name);
            println!("{}", "Sample resources deleted.".green());
            Ok(())
        }
        Err(e) => {
            report_failure(&e);
            Err(e.into())
        }
    }
}

fn report_failure(e: &WorkflowError) {
    let leftovers = e.leftovers();
    if leftovers.is_empty() {
        return;
    }

    eprintln!(
        "{}",
        "The run stopped before teardown. These resources may still exist and be billed:"
            .red()
            .bold()
    );
    for resource in leftovers {
        eprintln!("  - {}", resource);
    }
    eprintln!(
        "{}",
        "Delete the resource group in the Azure Portal or rerun with --rollback-on-failure.".yellow()
    );
}
