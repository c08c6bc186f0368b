// src/main.rs

//! Sijill CLI
//!
//! Command-line front end for composing, exporting, archiving and relaying
//! student-affairs documents. The draft lives in a TOML file between
//! invocations; the three durable collections live under the configured
//! storage directory.

use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine as _;
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use sijill::app::App;
use sijill::compose;
use sijill::config;
use sijill::error::{AppError, Result};
use sijill::models::{ActionData, Config, DirectoryEntry, Field, FormKind, LocaleConfig};
use sijill::render;
use sijill::storage::{LocalStore, StorageUsage};

/// Sijill - Student Affairs Document Generator
#[derive(Parser, Debug)]
#[command(
    name = "sijill",
    version,
    about = "Student-affairs document generator for school administration"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Path to the locale message catalog
    #[arg(long, default_value = "data/locale.toml")]
    locale: PathBuf,

    /// Path to the working draft
    #[arg(short, long, default_value = "data/draft.toml")]
    draft: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a document to the terminal
    Compose {
        /// Document kind id (e.g. annex_5_warning)
        #[arg(long)]
        form: String,
    },

    /// Render a document and write it under its export filename
    Export {
        /// Document kind id
        #[arg(long)]
        form: String,
    },

    /// Edit the working draft
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },

    /// Manage the archive of issued documents
    Archive {
        #[command(subcommand)]
        action: ArchiveAction,
    },

    /// Manage the student directory
    Students {
        #[command(subcommand)]
        action: StudentsAction,
    },

    /// Manage school branding assets
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Build the messaging handoff for the current draft
    Relay {
        /// Document kind id named in the message
        #[arg(long)]
        form: String,
    },

    /// Validate the configuration file
    Validate,

    /// Show storage usage and collection counts
    Info,
}

#[derive(Subcommand, Debug)]
enum DraftAction {
    /// Set one draft field (checkbox fields accept true/false)
    Set { name: String, value: String },
    /// Print the draft
    Show,
    /// Start a fresh draft
    New,
    /// Prefill the draft from a directory entry with this exact name
    Pick { name: String },
}

#[derive(Subcommand, Debug)]
enum ArchiveAction {
    /// Snapshot the draft into the archive
    Save {
        /// Document kind id being issued
        #[arg(long)]
        form: String,
    },
    /// List archive records, newest first
    List,
    /// Delete a record by id (irreversible)
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Restore a record's draft and document kind
    Restore { id: String },
}

#[derive(Subcommand, Debug)]
enum StudentsAction {
    /// Replace the directory with entries from a JSON file
    Import { path: PathBuf },
    /// List directory entries
    List,
    /// Autocomplete lookup
    Find { prefix: String },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Load an image file into a branding slot
    Set {
        asset: Asset,
        path: PathBuf,
    },
    /// Show which branding assets are configured
    Show,
}

/// Branding asset slots.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Asset {
    MinistryLogo,
    SchoolStamp,
    PrincipalSignature,
    CommitteeHeadSignature,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Build the controller over local storage and run the startup load.
async fn load_app(config: &Config, locale: &LocaleConfig) -> Result<App<LocalStore>> {
    let store = Arc::new(LocalStore::new(
        &config.storage.root_dir,
        config.storage.quota_bytes,
    ));
    let mut app = App::new(store, config, locale.clone());
    app.load_all().await?;
    Ok(app)
}

fn parse_record_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::validation(format!("invalid record id: {id}")))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (config, locale) = config::load_all(&cli.config, &cli.locale);

    match cli.command {
        Command::Compose { form } => {
            let app = load_app(&config, &locale).await?;
            let draft = ActionData::load_or_default(&cli.draft);
            let doc = compose::compose_by_id(&form, &draft, app.settings(), app.school());
            println!("{}", render::to_text(&doc));
        }

        Command::Export { form } => {
            let mut app = load_app(&config, &locale).await?;
            app.draft = ActionData::load_or_default(&cli.draft);

            let (doc, filename) = match FormKind::from_id(&form) {
                Some(kind) => {
                    app.set_form(kind);
                    let doc = compose::compose(kind, &app.draft, app.settings(), app.school());
                    (doc, app.compute_export_filename())
                }
                None => (compose::not_found(), locale.messages.default_document.clone()),
            };

            let out_dir = PathBuf::from(&config.export.output_dir);
            std::fs::create_dir_all(&out_dir)?;
            let out_path = out_dir.join(format!("{}.txt", filename));
            std::fs::write(&out_path, render::to_text(&doc))?;
            log::info!("Exported to {}", out_path.display());
        }

        Command::Draft { action } => match action {
            DraftAction::Set { name, value } => {
                let mut draft = ActionData::load_or_default(&cli.draft);
                let field = Field::parse(&name, &value)
                    .ok_or_else(|| AppError::validation(format!("unknown field: {name}")))?;
                draft.apply(field);
                draft.save(&cli.draft)?;
                log::info!("Set {}", name);
            }
            DraftAction::Show => {
                let draft = ActionData::load_or_default(&cli.draft);
                println!("{}", toml::to_string_pretty(&draft)?);
            }
            DraftAction::New => {
                ActionData::default().save(&cli.draft)?;
                log::info!("Started a fresh draft at {}", cli.draft.display());
            }
            DraftAction::Pick { name } => {
                let mut app = load_app(&config, &locale).await?;
                app.draft = ActionData::load_or_default(&cli.draft);

                let entry = app
                    .directory()
                    .iter()
                    .find(|e| e.name == name)
                    .cloned()
                    .ok_or_else(|| {
                        AppError::validation(format!("no directory entry named: {name}"))
                    })?;
                app.select_directory_entry(&entry);
                app.draft.save(&cli.draft)?;
                log::info!("Prefilled draft from {}", entry.name);
            }
        },

        Command::Archive { action } => match action {
            ArchiveAction::Save { form } => {
                let mut app = load_app(&config, &locale).await?;
                app.draft = ActionData::load_or_default(&cli.draft);

                let kind = FormKind::from_id(&form)
                    .ok_or_else(|| AppError::validation(format!("unknown form id: {form}")))?;
                app.set_form(kind);

                let entry = app.save_to_archive()?;
                let id = entry.id;
                log::info!("{} ({})", locale.messages.archive_saved, id);
                app.drain_saves().await;
            }
            ArchiveAction::List => {
                let app = load_app(&config, &locale).await?;
                if app.archive().is_empty() {
                    log::info!("Archive is empty");
                }
                for entry in app.archive() {
                    log::info!(
                        "{}  {}  {} ({})  {}  [{}]",
                        entry.id,
                        entry.timestamp.format("%Y-%m-%d %H:%M"),
                        entry.student_name,
                        entry.grade,
                        entry.form.title(),
                        entry.details,
                    );
                }
            }
            ArchiveAction::Delete { id, yes } => {
                let mut app = load_app(&config, &locale).await?;
                let id = parse_record_id(&id)?;
                app.delete_archive_entry(id, yes)?;
                log::info!("Deleted record {}", id);
                app.drain_saves().await;
            }
            ArchiveAction::Restore { id } => {
                let mut app = load_app(&config, &locale).await?;
                let id = parse_record_id(&id)?;
                let kind = app.restore_archive_entry(id)?;
                app.draft.save(&cli.draft)?;
                log::info!("Restored draft for {}", kind.title());
            }
        },

        Command::Students { action } => match action {
            StudentsAction::Import { path } => {
                let mut app = load_app(&config, &locale).await?;
                let content = std::fs::read_to_string(&path)?;
                let entries: Vec<DirectoryEntry> = serde_json::from_str(&content)?;
                let count = entries.len();
                app.import_directory(entries);
                log::info!("Imported {} students from {}", count, path.display());
                app.drain_saves().await;
            }
            StudentsAction::List => {
                let app = load_app(&config, &locale).await?;
                log::info!("{} students in the directory", app.directory().len());
                for entry in app.directory() {
                    log::info!(
                        "{} ({}) {}",
                        entry.name,
                        entry.grade,
                        entry.guardian_phone.as_deref().unwrap_or("-"),
                    );
                }
            }
            StudentsAction::Find { prefix } => {
                let app = load_app(&config, &locale).await?;
                for entry in app.filter_suggestions(&prefix) {
                    log::info!("{} ({})", entry.name, entry.grade);
                }
            }
        },

        Command::Settings { action } => match action {
            SettingsAction::Set { asset, path } => {
                let mut app = load_app(&config, &locale).await?;
                let bytes = std::fs::read(&path)?;
                let payload = base64::engine::general_purpose::STANDARD.encode(bytes);

                let mut settings = app.settings().clone();
                match asset {
                    Asset::MinistryLogo => settings.ministry_logo = Some(payload),
                    Asset::SchoolStamp => settings.school_stamp = Some(payload),
                    Asset::PrincipalSignature => settings.principal_signature = Some(payload),
                    Asset::CommitteeHeadSignature => {
                        settings.committee_head_signature = Some(payload)
                    }
                }
                app.update_settings(settings);
                log::info!("Updated {:?} from {}", asset, path.display());
                app.drain_saves().await;
            }
            SettingsAction::Show => {
                let app = load_app(&config, &locale).await?;
                let settings = app.settings();
                log::info!("{}/4 branding assets configured", settings.configured_count());
                log::info!("ministry_logo: {}", presence(settings.ministry_logo.is_some()));
                log::info!("school_stamp: {}", presence(settings.school_stamp.is_some()));
                log::info!(
                    "principal_signature: {}",
                    presence(settings.principal_signature.is_some())
                );
                log::info!(
                    "committee_head_signature: {}",
                    presence(settings.committee_head_signature.is_some())
                );
            }
        },

        Command::Relay { form } => {
            let mut app = load_app(&config, &locale).await?;
            app.draft = ActionData::load_or_default(&cli.draft);

            let kind = FormKind::from_id(&form)
                .ok_or_else(|| AppError::validation(format!("unknown form id: {form}")))?;
            app.set_form(kind);

            let handoff = app.build_relay_handoff()?;
            // The guidance must reach the user before the link: attaching
            // the exported file is a manual step.
            println!("{}\n", handoff.guidance);
            println!("{}", handoff.url);
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            let config = config::load_validated(&cli.config)?;
            log::info!(
                "✓ Config OK (storage at {}, relay code {})",
                config.storage.root_dir,
                config.relay.country_code
            );
        }

        Command::Info => {
            let app = load_app(&config, &locale).await?;
            log::info!("Storage directory: {}", config.storage.root_dir);
            if let Some(usage) = app.usage() {
                log::info!(
                    "Used: {} of {}",
                    StorageUsage::human(usage.used_bytes),
                    StorageUsage::human(usage.quota_bytes)
                );
            }
            log::info!("Students: {}", app.directory().len());
            log::info!("Archive records: {}", app.archive().len());
            log::info!(
                "Branding assets: {}/4",
                app.settings().configured_count()
            );
        }
    }

    Ok(())
}

fn presence(configured: bool) -> &'static str {
    if configured { "configured" } else { "not set" }
}
