// ABOUTME: Command-line front-end for the site admin client
// ABOUTME: Lists, shows, creates, updates and deletes records of each resource type

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::ProgressBar;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;

use site_admin::config::Config;
use site_admin::controller::{AssumeYes, ListController, Outcome, PromptConfirm};
use site_admin::remote::{
    Contact, CrudApi, HttpUploader, Job, RemoteClient, Service, ServiceAttachments, ServiceClient,
    Testimonial, UploadFile, Uploader,
};
use site_admin::{generate_slug, logging, Resource};

#[derive(Parser)]
#[command(name = "site-admin", version, about = "Manage jobs, services, testimonials and contacts")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the admin API (overrides config and environment)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Jobs {
        #[command(subcommand)]
        action: Action,
    },
    Services {
        #[command(subcommand)]
        action: Action,
    },
    Testimonials {
        #[command(subcommand)]
        action: Action,
    },
    Contacts {
        #[command(subcommand)]
        action: Action,
    },
    /// Print the URL slug generated for a service title
    Slug { title: String },
    /// Show a service by its slug
    ServiceBySlug { slug: String },
    /// Upload a file and print the URL it is stored under
    Upload { path: PathBuf },
}

#[derive(Subcommand)]
enum Action {
    /// List records, optionally narrowed by FIELD=VALUE criteria
    List {
        #[arg(long = "where", value_name = "FIELD=VALUE")]
        criteria: Vec<String>,
    },
    /// Show one record
    Get { id: String },
    /// Create a record from the resource defaults plus edits
    Create {
        #[command(flatten)]
        edits: EditArgs,
    },
    /// Edit an existing record
    Update {
        id: String,
        #[command(flatten)]
        edits: EditArgs,
    },
    /// Delete a record after confirmation
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Edits are applied in order: drops, sets, pushes, attachments.
#[derive(Args)]
struct EditArgs {
    /// Remove the item at INDEX from a list field
    #[arg(long = "drop", value_name = "FIELD=INDEX")]
    drop: Vec<String>,

    /// Set a field; VALUE is parsed as JSON when possible
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,

    /// Append an item to a list field
    #[arg(long = "push", value_name = "FIELD=VALUE")]
    push: Vec<String>,

    /// Upload a file and store its URL in FIELD
    #[arg(long = "attach", value_name = "FIELD=PATH")]
    attach: Vec<String>,

    /// Card icon sent with the service (services only)
    #[arg(long, value_name = "PATH")]
    icon: Option<PathBuf>,

    /// Icon for the overview item at INDEX (services only)
    #[arg(long = "service-icon", value_name = "INDEX=PATH")]
    service_icons: Vec<String>,

    /// Icon for the process step at INDEX (services only)
    #[arg(long = "step-icon", value_name = "INDEX=PATH")]
    step_icons: Vec<String>,
}

impl EditArgs {
    fn has_service_files(&self) -> bool {
        self.icon.is_some() || !self.service_icons.is_empty() || !self.step_icons.is_empty()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Command::Slug { title } = &cli.command {
        println!("{}", generate_slug(title));
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?
        .with_api_url(cli.api_url)
        .validate()?;
    let remote = RemoteClient::new(config.api_url.clone(), config.request_timeout())?;
    let uploader = HttpUploader::new(remote.clone());

    match cli.command {
        Command::Jobs { action } => {
            reject_service_files(&action)?;
            run(remote.resource::<Job>(), action, &config, &uploader).await
        }
        Command::Services { action } => {
            let attachments = service_attachments(&action).await?;
            let api = ServiceClient::new(&remote).with_attachments(attachments);
            run::<Service, _>(api, action, &config, &uploader).await
        }
        Command::Testimonials { action } => {
            reject_service_files(&action)?;
            run(remote.resource::<Testimonial>(), action, &config, &uploader).await
        }
        Command::Contacts { action } => {
            reject_service_files(&action)?;
            run(remote.resource::<Contact>(), action, &config, &uploader).await
        }
        Command::ServiceBySlug { slug } => {
            let envelope = ServiceClient::new(&remote).get_by_slug(&slug).await?;
            if !envelope.success {
                bail!(
                    "Service lookup rejected: {}",
                    envelope.message.unwrap_or_default()
                );
            }
            print_json(&envelope.data)
        }
        Command::Upload { path } => {
            let file = UploadFile::from_path(&path).await?;
            let url = uploader.upload(&file).await?;
            println!("{}", url);
            Ok(())
        }
        Command::Slug { .. } => Ok(()),
    }
}

async fn run<R, A>(api: A, action: Action, config: &Config, uploader: &HttpUploader) -> Result<()>
where
    R: Resource,
    A: CrudApi<R>,
{
    let mut ctl = ListController::<R, A>::with_notice_ttl(api, config.notice_ttl());

    let outcome = match action {
        Action::List { criteria } => {
            *ctl.filter_mut() = parse_filter::<R>(&criteria)?;
            let spinner = spinner(format!("Loading {}...", R::PATH));
            let outcome = ctl.load_list().await;
            spinner.finish_and_clear();
            if outcome == Outcome::Completed {
                print_json(ctl.items())?;
                if ctl.is_filter_applied() {
                    eprintln!(
                        "{} record(s) matched {} filter(s)",
                        ctl.items().len(),
                        ctl.active_filter_count()
                    );
                }
            }
            outcome
        }
        Action::Get { id } => {
            let outcome = ctl.fetch_for_edit(&id).await;
            if let Some(record) = ctl.selected() {
                print_json(record)?;
            }
            outcome
        }
        Action::Create { edits } => {
            ctl.start_create();
            apply_edits(&mut ctl, &edits, uploader).await?;
            ctl.submit().await
        }
        Action::Update { id, edits } => match ctl.fetch_for_edit(&id).await {
            Outcome::Completed => {
                apply_edits(&mut ctl, &edits, uploader).await?;
                ctl.submit().await
            }
            other => other,
        },
        Action::Delete { id, yes } => {
            if yes {
                ctl.delete_record(&id, &AssumeYes).await
            } else {
                ctl.delete_record(&id, &PromptConfirm).await
            }
        }
    };

    if let Some(notice) = ctl.notices().current() {
        eprintln!("{}", notice);
    }

    match outcome {
        Outcome::Failed => bail!("{} command failed", R::LABEL),
        Outcome::Completed | Outcome::Cancelled | Outcome::Superseded => Ok(()),
    }
}

async fn apply_edits<R, A>(
    ctl: &mut ListController<R, A>,
    edits: &EditArgs,
    uploader: &HttpUploader,
) -> Result<()>
where
    R: Resource,
    A: CrudApi<R>,
{
    for assignment in &edits.drop {
        let (field, index) = split_assignment(assignment)?;
        ctl.remove_array_item(field, parse_index(index)?)?;
    }
    for assignment in &edits.set {
        let (field, value) = split_assignment(assignment)?;
        ctl.set_field(field, parse_value(value))?;
    }
    for assignment in &edits.push {
        let (field, value) = split_assignment(assignment)?;
        if !ctl.add_array_item(field, parse_value(value))? {
            eprintln!("Ignoring blank item for {}", field);
        }
    }
    for assignment in &edits.attach {
        let (field, path) = split_assignment(assignment)?;
        let file = UploadFile::from_path(Path::new(path)).await?;
        if ctl.attach(field, &file, uploader).await != Outcome::Completed {
            bail!("Failed to attach {} to {}", path, field);
        }
    }
    Ok(())
}

fn edits_of(action: &Action) -> Option<&EditArgs> {
    match action {
        Action::Create { edits } | Action::Update { edits, .. } => Some(edits),
        _ => None,
    }
}

fn reject_service_files(action: &Action) -> Result<()> {
    if edits_of(action).map_or(false, EditArgs::has_service_files) {
        bail!("--icon, --service-icon and --step-icon only apply to services");
    }
    Ok(())
}

/// Reads the icon files named on the command line. Their names are written
/// into the draft when the service is submitted.
async fn service_attachments(action: &Action) -> Result<ServiceAttachments> {
    let mut attachments = ServiceAttachments::default();
    let Some(edits) = edits_of(action) else {
        return Ok(attachments);
    };

    if let Some(path) = &edits.icon {
        attachments.icon = Some(UploadFile::from_path(path).await?);
    }
    for assignment in &edits.service_icons {
        let (index, path) = split_assignment(assignment)?;
        let file = UploadFile::from_path(Path::new(path)).await?;
        attachments.service_icons.insert(parse_index(index)?, file);
    }
    for assignment in &edits.step_icons {
        let (index, path) = split_assignment(assignment)?;
        let file = UploadFile::from_path(Path::new(path)).await?;
        attachments.step_icons.insert(parse_index(index)?, file);
    }
    Ok(attachments)
}

fn parse_index(raw: &str) -> Result<usize> {
    raw.trim()
        .parse()
        .with_context(|| format!("'{}' is not a list index", raw))
}

fn split_assignment(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => Ok((field.trim(), value)),
        _ => bail!("Expected FIELD=VALUE, got '{}'", raw),
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn parse_filter<R: Resource>(criteria: &[String]) -> Result<R::Filter> {
    let mut fields = Map::new();
    for criterion in criteria {
        let (field, value) = split_assignment(criterion)?;
        fields.insert(field.to_string(), criterion_value::<R>(field, value));
    }
    serde_json::from_value(Value::Object(fields))
        .with_context(|| format!("Invalid filter for {}", R::PATH))
}

// Each field is coerced on its own: `name=2024` stays text while `rating=5`
// becomes a number, even in the same filter.
fn criterion_value<R: Resource>(field: &str, raw: &str) -> Value {
    let typed = parse_value(raw);
    let single = Map::from_iter([(field.to_string(), typed.clone())]);
    match serde_json::from_value::<R::Filter>(Value::Object(single)) {
        Ok(_) => typed,
        Err(_) => Value::String(raw.to_string()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
