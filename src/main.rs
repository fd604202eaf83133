//! # labelgate CLI
//!
//! Command-line console for printing label templates through a label
//! gateway.
//!
//! ## Usage
//!
//! ```bash
//! # Browse templates and printers
//! labelgate templates --search shelf --tag retail
//! labelgate printers
//!
//! # Inspect and edit a template's variables (remembered between runs)
//! labelgate show shelf-label
//! labelgate set shelf-label sku=A1 qty=5
//! labelgate primary shelf-label sku
//! labelgate rapid shelf-label B2
//!
//! # Print to the remembered printer
//! labelgate print shelf-label
//!
//! # Change the media loaded in a printer
//! labelgate media zebra-1 --preset 50x30
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use labelgate::{
    Config, Console, HttpApi, LabelgateError,
    catalog::LabelType,
    printer::MediaUpdate,
    store::{FileStore, OverrideStore},
    template::{TemplateFilter, all_tags},
};

/// labelgate - label template print console
#[derive(Parser, Debug)]
#[command(name = "labelgate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Label gateway base URL
    #[arg(long, env = "LG_API_BASE", global = true)]
    api_base: Option<String>,

    /// Label size catalog, e.g. "74x26, 50x30" or a JSON array
    #[arg(long, env = "LG_LABEL_PRESETS", global = true)]
    presets: Option<String>,

    /// Label color catalog, e.g. "white; black"
    #[arg(long, env = "LG_LABEL_COLORS", global = true)]
    colors: Option<String>,

    /// File holding remembered values and settings
    #[arg(long, env = "LG_STATE_FILE", global = true, value_name = "FILE")]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List templates
    Templates {
        /// Free-text search over names, tags, and variables
        #[arg(long, default_value = "")]
        search: String,

        /// Only templates with any of these tags
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },

    /// List all template tags
    Tags,

    /// List printers with their loaded media
    Printers,

    /// List label presets, colors, and types
    Presets,

    /// Remember a printer as the print target
    SelectPrinter { printer: String },

    /// Show a template's variables and settings
    Show { template: String },

    /// Set variables, e.g. `set shelf sku=A1 qty=5`
    Set {
        template: String,
        #[arg(value_name = "NAME=VALUE", required = true)]
        values: Vec<String>,
    },

    /// Write the rapid-entry value into the primary variable
    Rapid { template: String, value: String },

    /// Choose the variable that rapid entry writes to
    Primary { template: String, variable: String },

    /// Restore every variable to its default
    Reset { template: String },

    /// Empty every optional variable
    ClearOptional { template: String },

    /// Print at the template's own target size instead of the loaded media
    Target {
        template: String,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },

    /// Return to rapid entry after printing
    AutoFocus {
        template: String,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },

    /// Print a template
    Print {
        template: String,

        /// Printer id (defaults to the remembered printer)
        #[arg(long)]
        printer: Option<String>,

        /// Set variables before printing
        #[arg(long = "set", value_name = "NAME=VALUE")]
        values: Vec<String>,

        /// Show the request instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Change the media loaded in a printer
    Media {
        printer: String,

        /// Catalog preset key, e.g. 50x30
        #[arg(long)]
        preset: Option<String>,

        #[arg(long)]
        width: Option<f64>,

        #[arg(long)]
        height: Option<f64>,

        /// thermal or thermotransfer
        #[arg(long = "type")]
        media_type: Option<LabelType>,

        #[arg(long)]
        color: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), LabelgateError> {
    let config = Config::new(
        cli.api_base.as_deref(),
        cli.presets.as_deref(),
        cli.colors.as_deref(),
        cli.state_file,
    );
    tracing::debug!(?config, "starting");

    let store = OverrideStore::new(FileStore::open(&config.state_file));
    let mut console = Console::new(config.catalog(), store);
    let api = HttpApi::new(&config.api_base)?;

    match cli.command {
        Commands::Templates { search, tags } => {
            console.refresh_templates(&api).await?;
            let mut filter = TemplateFilter::new(search);
            filter.tags.extend(tags);
            let matches = console.filtered_templates(&filter);
            if matches.is_empty() {
                println!("No matches. Try clearing filters or changing the search query.");
            }
            for t in matches {
                let preview = if t.preview_available { "" } else { " (no preview)" };
                println!(
                    "{:<24} {:<32} {} variables [{}]{}",
                    t.id,
                    t.name,
                    t.variables.len(),
                    t.tags.join(", "),
                    preview
                );
            }
        }

        Commands::Tags => {
            console.refresh_templates(&api).await?;
            for tag in all_tags(console.templates()) {
                println!("{}", tag);
            }
        }

        Commands::Printers => {
            console.refresh_printers(&api).await?;
            if console.printers().is_empty() {
                println!("No printers available");
            }
            let selected = console.selected_printer().map(|p| p.id.clone());
            for p in console.printers() {
                let marker = if selected.as_deref() == Some(p.id.as_str()) { "*" } else { " " };
                let preset = p
                    .loaded_preset(console.catalog())
                    .map(|preset| format!(" - Preset {}", preset.label))
                    .unwrap_or_default();
                println!("{} {:<16} {}", marker, p.id, p.name);
                println!("    {}{}", p, preset);
            }
        }

        Commands::Presets => {
            let catalog = console.catalog();
            println!("Presets:");
            for p in catalog.presets() {
                println!("  {} mm", p.label);
            }
            println!("\nColors:");
            for c in catalog.colors() {
                println!("  {}", c);
            }
            println!("\nTypes:");
            for t in catalog.label_types() {
                println!("  {}", t);
            }
        }

        Commands::SelectPrinter { printer } => {
            console.refresh_printers(&api).await?;
            console.select_printer(&printer)?;
            println!("Selected printer {}", printer);
        }

        Commands::Show { template } => {
            open_template(&mut console, &api, &template).await?;
            console.refresh_printers(&api).await?;
            show(&console);
        }

        Commands::Set { template, values } => {
            open_template(&mut console, &api, &template).await?;
            apply_assignments(&mut console, &values)?;
            show(&console);
        }

        Commands::Rapid { template, value } => {
            let session = open_template(&mut console, &api, &template).await?;
            session.mirror_edit(value);
            println!("{} = {}", session.primary_variable(), session.rapid_value());
        }

        Commands::Primary { template, variable } => {
            let session = open_template(&mut console, &api, &template).await?;
            if !session.has_variable(&variable) {
                return Err(LabelgateError::Selection(format!(
                    "Template '{}' has no variable '{}'",
                    template, variable
                )));
            }
            session.set_primary_variable(variable);
            println!("Rapid entry: {} = {}", session.primary_variable(), session.rapid_value());
        }

        Commands::Reset { template } => {
            open_template(&mut console, &api, &template).await?.reset_to_defaults();
            println!("Defaults restored.");
        }

        Commands::ClearOptional { template } => {
            open_template(&mut console, &api, &template).await?.clear_optional();
            println!("Optional fields cleared.");
        }

        Commands::Target { template, enabled } => {
            open_template(&mut console, &api, &template).await?.set_use_template_target(enabled);
            let detail = console.active_detail().map(|d| d.target_summary()).unwrap_or_default();
            println!("Use template target: {} ({})", enabled, detail);
        }

        Commands::AutoFocus { template, enabled } => {
            open_template(&mut console, &api, &template).await?.set_auto_focus(enabled);
            println!("Focus rapid entry after print: {}", enabled);
        }

        Commands::Print {
            template,
            printer,
            values,
            dry_run,
        } => {
            console.refresh_printers(&api).await?;
            if let Some(printer) = printer {
                console.select_printer(&printer)?;
            }
            open_template(&mut console, &api, &template).await?;
            apply_assignments(&mut console, &values)?;

            if dry_run {
                let request = console.print_request()?;
                println!("{}", serde_json::to_string_pretty(&request)?);
                return Ok(());
            }

            let outcome = console.print(&api).await?;
            println!("{}", outcome.receipt);
            if outcome.refocus
                && let Some(session) = console.session()
            {
                println!("Rapid entry ({}): {}", session.primary_variable(), session.rapid_value());
            }
        }

        Commands::Media {
            printer,
            preset,
            width,
            height,
            media_type,
            color,
        } => {
            console.refresh_printers(&api).await?;
            let mut update = MediaUpdate {
                width_mm: width,
                height_mm: height,
                media_type: media_type.map(|t| t.to_string()),
                color,
            };
            if let Some(key) = preset {
                let preset = console.catalog().by_key(&key).ok_or_else(|| {
                    LabelgateError::Selection(format!("Unknown preset '{}'", key))
                })?;
                update = update.with_preset(preset);
            }
            console.update_media(&api, &printer, &update).await?;
            println!("Printer media updated.");
            if let Some(p) = console.printers().iter().find(|p| p.id == printer) {
                println!("    {}", p);
            }
        }
    }

    Ok(())
}

/// Load `template` and return its session.
async fn open_template<'a>(
    console: &'a mut Console,
    api: &HttpApi,
    template: &str,
) -> Result<&'a mut labelgate::VariableSession, LabelgateError> {
    console.load_template(api, template).await?;
    console
        .session_mut()
        .ok_or_else(|| LabelgateError::Selection(format!("Template '{}' is not loaded", template)))
}

/// Apply `NAME=VALUE` assignments to the active session.
fn apply_assignments(console: &mut Console, values: &[String]) -> Result<(), LabelgateError> {
    let Some(session) = console.session_mut() else {
        return Ok(());
    };
    for assignment in values {
        let (name, value) = assignment.split_once('=').ok_or_else(|| {
            LabelgateError::Selection(format!("Expected NAME=VALUE, got '{}'", assignment))
        })?;
        if !session.has_variable(name) {
            return Err(LabelgateError::Selection(format!("Unknown variable '{}'", name)));
        }
        session.edit(name, value);
    }
    Ok(())
}

fn show(console: &Console) {
    let (Some(detail), Some(session)) = (console.active_detail(), console.session()) else {
        return;
    };
    println!("{} [{}]", detail.display_name(), detail.tags.join(", "));
    if session.cells().is_empty() {
        println!("  No variables detected for this template.");
    }
    for (spec, cell) in detail
        .variables
        .iter()
        .filter_map(|spec| Some((spec, session.cell(&spec.name)?)))
    {
        let badge = if cell.optional { "optional" } else { "required" };
        let state = if cell.is_muted() {
            "default"
        } else if cell.touched {
            "edited"
        } else {
            ""
        };
        println!(
            "  {:<20} {:<10} {:<8} {}",
            spec.display_label(),
            badge,
            state,
            cell.value
        );
        if let Some(description) = &spec.description {
            println!("  {:<20} {}", "", description);
        }
    }

    let settings = session.settings();
    println!();
    println!("Rapid entry: {} = {}", session.primary_variable(), session.rapid_value());
    println!("Template target: {}", detail.target_summary());
    if let Some(printer) = console.selected_printer() {
        println!("Printer media: {} ({})", printer.target_summary(), printer.name);
    }
    println!(
        "Use template target: {} | Focus rapid entry after print: {}",
        settings.use_template_target, settings.auto_focus
    );
}
