//! Command-line front end for the content admin client.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use cms_admin::api::ApiClient;
use cms_admin::catalog;
use cms_admin::config::Config;
use cms_admin::confirm::{Confirm, DeleteOutcome, Prompt};
use cms_admin::controller::FeatureController;
use cms_admin::display;
use cms_admin::errors::AppError;
use cms_admin::form::{DraftValue, FieldPath, FileBlob};
use cms_admin::models::{Level, Resource};
use cms_admin::search::Facet;

#[derive(Parser)]
#[command(name = "cms-admin")]
#[command(about = "Manage the company site content from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every known resource and what it supports
    Resources,
    /// Fetch and print a resource's records
    List {
        resource: String,
        #[arg(long)]
        search: Option<String>,
        /// Keep records whose field equals VALUE, e.g. `appliedFor.career[0].title=Designer`
        #[arg(long, value_name = "PATH=VALUE")]
        facet: Option<String>,
    },
    /// Create a record
    Create {
        resource: String,
        #[command(flatten)]
        edits: Edits,
    },
    /// Edit a record; unchanged fields are not sent
    Update {
        resource: String,
        id: String,
        #[command(flatten)]
        edits: Edits,
    },
    /// Delete a record after confirmation
    Delete {
        resource: String,
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct Edits {
    /// Set a text field, e.g. `qa[0].answer=Yes`
    #[arg(long = "set", value_name = "PATH=TEXT")]
    set: Vec<String>,
    /// Set a field to a JSON value, e.g. `benefits=["Fast"]`
    #[arg(long = "json", value_name = "PATH=JSON")]
    json: Vec<String>,
    /// Attach a local file, e.g. `exp[0].icon=./icon.svg`
    #[arg(long = "file", value_name = "PATH=FILE")]
    file: Vec<String>,
}

/// Asks on the terminal.
struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &Prompt) -> bool {
        eprint!(
            "{} {} [{}] (y/N): ",
            prompt.title, prompt.text, prompt.confirm_label
        );
        if io::stderr().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    cms_admin::init_logging(&config);

    tracing::debug!(base_url = %config.base_url, "starting");

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &Config) -> Result<(), AppError> {
    match command {
        Command::Resources => {
            for resource in catalog::all() {
                println!(
                    "{:<18} {:<5} {}",
                    resource.name,
                    capability_letters(&resource),
                    resource.list_path()
                );
            }
            Ok(())
        }
        Command::List {
            resource,
            search,
            facet,
        } => {
            let mut controller = open(&resource, config)?;
            let loaded = controller.load().await;
            report(&mut controller);
            loaded?;

            if let Some(raw) = facet {
                let (path, value) = split_assignment(&raw)?;
                controller.set_facet(Some(Facet::new(path.parse::<FieldPath>()?, value)));
            }
            if let Some(query) = search {
                controller.search(&query);
            }

            let resource = controller.resource().clone();
            for record in controller.records() {
                let id = record.id(resource.id_field).unwrap_or_default();
                let summary = display::summary(&resource, record);
                if summary.is_empty() {
                    println!("{}\t{}", id, serde_json::Value::Object(record.fields().clone()));
                } else {
                    println!("{}\t{}", id, summary);
                }
            }
            Ok(())
        }
        Command::Create { resource, edits } => {
            let mut controller = open(&resource, config)?;
            controller.begin_add()?;
            apply_edits(&mut controller, &edits)?;

            let submitted = controller.submit().await;
            report(&mut controller);
            submitted.map(|_| ())
        }
        Command::Update {
            resource,
            id,
            edits,
        } => {
            let mut controller = open(&resource, config)?;
            let loaded = controller.load().await;
            report(&mut controller);
            loaded?;

            controller.begin_edit(&id)?;
            apply_edits(&mut controller, &edits)?;

            let submitted = controller.submit().await;
            report(&mut controller);
            submitted.map(|_| ())
        }
        Command::Delete { resource, id, yes } => {
            let mut controller = open(&resource, config)?;
            let outcome = if yes {
                let mut accept = |_: &Prompt| true;
                controller.confirm_and_delete(&id, &mut accept).await
            } else {
                controller.confirm_and_delete(&id, &mut TerminalConfirm).await
            };
            report(&mut controller);

            if outcome? == DeleteOutcome::Cancelled {
                println!("Cancelled");
            }
            Ok(())
        }
    }
}

fn open(name: &str, config: &Config) -> Result<FeatureController, AppError> {
    let resource = catalog::find(name)
        .ok_or_else(|| AppError::NotFound(format!("Unknown resource '{}'", name)))?;
    let client = ApiClient::new(config.base_url.clone())?;
    Ok(FeatureController::new(client, resource, config.notify_ttl))
}

fn capability_letters(resource: &Resource) -> String {
    let caps = resource.capabilities;
    let mut letters = String::new();
    if caps.create {
        letters.push('C');
    }
    letters.push('R');
    if caps.update {
        letters.push('U');
    }
    if caps.delete {
        letters.push('D');
    }
    letters
}

fn split_assignment(raw: &str) -> Result<(&str, &str), AppError> {
    raw.split_once('=')
        .ok_or_else(|| AppError::InvalidPath(format!("Expected PATH=VALUE, got '{}'", raw)))
}

fn apply_edits(controller: &mut FeatureController, edits: &Edits) -> Result<(), AppError> {
    for raw in &edits.set {
        let (path, text) = split_assignment(raw)?;
        controller.set_field(&path.parse::<FieldPath>()?, DraftValue::text(text))?;
    }
    for raw in &edits.json {
        let (path, json) = split_assignment(raw)?;
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| AppError::InvalidPath(format!("Invalid JSON for {}: {}", path, e)))?;
        controller.set_field(&path.parse::<FieldPath>()?, DraftValue::from_json(&value))?;
    }
    for raw in &edits.file {
        let (path, local) = split_assignment(raw)?;
        controller.set_file(&path.parse::<FieldPath>()?, FileBlob::from_path(local))?;
    }
    Ok(())
}

/// Print and clear queued notifications.
fn report(controller: &mut FeatureController) {
    for notification in controller.take_notifications() {
        match notification.level {
            Level::Success => println!("{}", notification.title),
            Level::Error => eprintln!(
                "{}: {}",
                notification.title,
                notification.text.unwrap_or_default()
            ),
        }
    }
}
