use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    actions::{self, OperationResult},
    auth::CredentialsProvider,
    display::{
        CardSummaryView, CustomerEditView, CustomerRowView, InvoiceEditView, InvoiceRowView,
        LatestInvoiceView,
    },
    validation::RawForm,
    AdminContext,
};
use serde::Serialize;
use shared::protocol::Revenue;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(name = "admin", about = "Invoice and customer administration against the resource API")]
struct Cli {
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,
    /// Overrides the configured resource API origin.
    #[arg(long)]
    api_base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(subcommand)]
    Invoices(ResourceCommand),
    #[command(subcommand)]
    Customers(CustomerCommand),
    /// Summary cards, monthly revenue and the latest invoices.
    Dashboard,
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand, Debug)]
enum ResourceCommand {
    Create(FormArgs),
    Update {
        id: String,
        #[command(flatten)]
        form: FormArgs,
    },
    Delete {
        id: String,
    },
    /// One page of the filtered listing.
    List {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Pages {
        #[arg(long, default_value = "")]
        query: String,
    },
    /// The record as prefilled into its edit form.
    Show {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum CustomerCommand {
    #[command(flatten)]
    Resource(ResourceCommand),
    /// Every customer as `{id, name}`, sorted for select boxes.
    All,
}

#[derive(Args, Debug)]
struct FormArgs {
    /// Form field as `key=value`; repeatable.
    #[arg(long = "field", value_parser = parse_field)]
    fields: Vec<(String, String)>,
}

impl FormArgs {
    fn to_form(&self) -> RawForm {
        self.fields.iter().cloned().collect()
    }
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Invoices,
    Customers,
}

#[derive(Serialize)]
struct DashboardView {
    cards: CardSummaryView,
    revenue: Vec<Revenue>,
    latest_invoices: Vec<LatestInvoiceView>,
}

#[derive(Serialize)]
struct PagesView {
    total_pages: u64,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config)
        .with_context(|| format!("failed to load settings from '{}'", cli.config.display()))?;
    if let Some(url) = cli.api_base_url {
        settings.api_base_url = url;
    }
    info!(api = %settings.api_base_url, page_size = settings.page_size, "admin: settings loaded");

    let ctx = AdminContext::new(&settings.client_settings()).context("invalid resource API url")?;
    let mut stale = ctx.invalidations.subscribe();

    let exit = match cli.command {
        Command::Invoices(cmd) => run_resource(&ctx, Target::Invoices, cmd).await?,
        Command::Customers(CustomerCommand::Resource(cmd)) => {
            run_resource(&ctx, Target::Customers, cmd).await?
        }
        Command::Customers(CustomerCommand::All) => {
            let customers = ctx
                .client
                .fetch_customers()
                .await
                .context("failed to fetch customers")?;
            print_json(&customers)?;
            ExitCode::SUCCESS
        }
        Command::Dashboard => {
            let overview = ctx
                .client
                .fetch_dashboard_overview()
                .await
                .context("failed to load dashboard")?;
            print_json(&DashboardView {
                cards: CardSummaryView::from(&overview.cards),
                revenue: overview.revenue,
                latest_invoices: overview
                    .latest_invoices
                    .iter()
                    .map(LatestInvoiceView::from)
                    .collect(),
            })?;
            ExitCode::SUCCESS
        }
        Command::Login { email, password } => {
            let provider = CredentialsProvider::new(ctx.client.clone());
            let form = RawForm::new()
                .with("email", email)
                .with("password", password);
            match actions::authenticate(&provider, &form).await {
                Ok(user) => {
                    print_json(&serde_json::json!({
                        "id": user.id,
                        "name": user.name,
                        "email": user.email,
                    }))?;
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    print_json(&serde_json::json!({ "error": err.to_string() }))?;
                    ExitCode::FAILURE
                }
            }
        }
    };

    while let Ok(event) = stale.try_recv() {
        info!(path = %event.path, "admin: view invalidated");
    }
    Ok(exit)
}

async fn run_resource(ctx: &AdminContext, target: Target, cmd: ResourceCommand) -> Result<ExitCode> {
    let client = &ctx.client;
    match (target, cmd) {
        (Target::Invoices, ResourceCommand::Create(form)) => {
            report(actions::create_invoice(ctx, &form.to_form()).await)
        }
        (Target::Customers, ResourceCommand::Create(form)) => {
            report(actions::create_customer(ctx, &form.to_form()).await)
        }
        (Target::Invoices, ResourceCommand::Update { id, form }) => {
            report(actions::update_invoice(ctx, &id, &form.to_form()).await)
        }
        (Target::Customers, ResourceCommand::Update { id, form }) => {
            report(actions::update_customer(ctx, &id, &form.to_form()).await)
        }
        (Target::Invoices, ResourceCommand::Delete { id }) => {
            report(actions::delete_invoice(ctx, &id).await)
        }
        (Target::Customers, ResourceCommand::Delete { id }) => {
            report(actions::delete_customer(ctx, &id).await)
        }
        (Target::Invoices, ResourceCommand::List { query, page }) => {
            let rows = client
                .list_filtered_invoices(&query, page)
                .await
                .context("failed to list invoices")?;
            let views: Vec<InvoiceRowView> = rows.iter().map(InvoiceRowView::from).collect();
            print_json(&views)?;
            Ok(ExitCode::SUCCESS)
        }
        (Target::Customers, ResourceCommand::List { query, page }) => {
            let rows = client
                .list_filtered_customers(&query, page)
                .await
                .context("failed to list customers")?;
            let views: Vec<CustomerRowView> = rows.iter().map(CustomerRowView::from).collect();
            print_json(&views)?;
            Ok(ExitCode::SUCCESS)
        }
        (Target::Invoices, ResourceCommand::Pages { query }) => {
            let total_pages = client
                .count_invoice_pages(&query)
                .await
                .context("failed to count invoice pages")?;
            print_json(&PagesView { total_pages })?;
            Ok(ExitCode::SUCCESS)
        }
        (Target::Customers, ResourceCommand::Pages { query }) => {
            let total_pages = client
                .count_customer_pages(&query)
                .await
                .context("failed to count customer pages")?;
            print_json(&PagesView { total_pages })?;
            Ok(ExitCode::SUCCESS)
        }
        (Target::Invoices, ResourceCommand::Show { id }) => {
            let invoice = client
                .fetch_invoice_by_id(&id)
                .await
                .with_context(|| format!("failed to fetch invoice '{id}'"))?;
            print_json(&InvoiceEditView::from(&invoice))?;
            Ok(ExitCode::SUCCESS)
        }
        (Target::Customers, ResourceCommand::Show { id }) => {
            let customer = client
                .fetch_customer_by_id(&id)
                .await
                .with_context(|| format!("failed to fetch customer '{id}'"))?;
            print_json(&CustomerEditView::from(&customer))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn report(result: OperationResult) -> Result<ExitCode> {
    print_json(&result)?;
    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
