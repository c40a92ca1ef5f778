use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use paperlist_core::config_file::{self, ConfigFile, DataConfig, OwnerConfig};
use paperlist_core::{
    FilterChoice, GroupBy, GroupKey, PaperRecord, VenueType, ViewAction, ViewController,
    load_records,
};
use paperlist_reporting::{
    AuthorSeparator, ExportFormat, RenderOptions, build_section_document, export_document,
    export_results, export_view,
};
use tracing_subscriber::EnvFilter;

mod output;

use output::{ChoiceRow, ColorMode};

/// Render a personal publication list from a JSON data file
#[derive(Parser, Debug)]
#[command(name = "paperlist", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the full list, grouped into sections
    Render {
        #[command(flatten)]
        view: ViewArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Render a single section, selected by year or venue type
    Section {
        #[command(flatten)]
        view: ViewArgs,

        /// Publication year of the section
        #[arg(long)]
        year: Option<i32>,

        /// Venue type of the section (conference, journal, ...)
        #[arg(long)]
        venue: Option<VenueType>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List filter choices with the number of records behind each
    Choices {
        #[command(flatten)]
        view: ViewArgs,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Write the owner name and data path to the platform config file
    InitConfig {
        /// Name to emphasize in author lists
        #[arg(long)]
        owner: String,

        /// Default publications JSON file
        #[arg(long)]
        data: Option<PathBuf>,
    },
}

/// Data source and view state shared by the subcommands.
#[derive(Args, Debug, Clone, Default)]
struct ViewArgs {
    /// Path to the publications JSON file
    data: Option<PathBuf>,

    /// Owner name to emphasize (env: PAPERLIST_OWNER)
    #[arg(long)]
    owner: Option<String>,

    /// Section dimension: venue-type or year
    #[arg(long)]
    group_by: Option<GroupBy>,

    /// Oldest first within each section
    #[arg(long)]
    ascending: bool,

    /// Comma-separated venue types to hide
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<VenueType>,

    /// Comma-separated venue types to show; all others are hidden
    #[arg(long, value_delimiter = ',')]
    only: Vec<VenueType>,

    /// Only papers where the owner is a first author
    #[arg(long)]
    first_author_only: bool,
}

#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Output format: html, markdown, text, json
    #[arg(long, default_value = "html")]
    format: ExportFormat,

    /// Punctuation after the last author: comma or period
    #[arg(long)]
    author_style: Option<AuthorSeparator>,

    /// Page title
    #[arg(long)]
    title: Option<String>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();
    let config = config_file::load_config();

    match cli.command {
        Command::Render { view, output } => render(&view, &output, &config),
        Command::Section {
            view,
            year,
            venue,
            output,
        } => section(&view, year, venue, &output, &config),
        Command::Choices { view, no_color } => choices(&view, no_color, &config),
        Command::InitConfig { owner, data } => init_config(owner, data),
    }
}

/// Logs go to stderr so stdout carries only the rendered document.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn render(view_args: &ViewArgs, out: &OutputArgs, config: &ConfigFile) -> anyhow::Result<()> {
    let controller = build_controller(view_args, config)?;
    let options = render_options(controller.owner(), out, config);
    let view = controller.derive();

    match &out.output {
        Some(path) => {
            export_results(&view, &options, out.format, path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            let color = ColorMode(!out.no_color);
            output::print_summary(&mut std::io::stdout(), &view, path, out.format, color)?;
        }
        None => {
            let mut stdout = std::io::stdout();
            stdout.write_all(export_view(&view, &options, out.format).as_bytes())?;
        }
    }
    Ok(())
}

fn section(
    view_args: &ViewArgs,
    year: Option<i32>,
    venue: Option<VenueType>,
    out: &OutputArgs,
    config: &ConfigFile,
) -> anyhow::Result<()> {
    let Some(key) = GroupKey::from_parts(year, venue) else {
        anyhow::bail!("section needs exactly one of --year or --venue");
    };
    let mut controller = build_controller(view_args, config)?;
    let group_by = match key {
        GroupKey::Venue(_) => GroupBy::VenueType,
        GroupKey::Year(_) => GroupBy::Year,
    };
    controller.update(ViewAction::SetGroupBy(group_by));

    let options = render_options(controller.owner(), out, config);
    let view = controller.derive();
    let Some(doc) = build_section_document(&view, key, &options) else {
        anyhow::bail!("no publications in section {}", key.label());
    };
    let content = export_document(&doc, out.format)
        .context("section does not support JSON output; use render --format json")?;

    match &out.output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), section = %key.label(), "wrote section");
        }
        None => std::io::stdout().write_all(content.as_bytes())?,
    }
    Ok(())
}

fn choices(view_args: &ViewArgs, no_color: bool, config: &ConfigFile) -> anyhow::Result<()> {
    let controller = build_controller(view_args, config)?;
    let rows: Vec<ChoiceRow> = controller
        .choices()
        .iter()
        .map(|&choice| ChoiceRow {
            choice,
            included: controller.state().inclusion_flags.is_set(choice),
            count: choice_count(controller.records(), choice, controller.owner()),
        })
        .collect();
    output::print_choices(&mut std::io::stdout(), &rows, ColorMode(!no_color))?;
    Ok(())
}

fn init_config(owner: String, data: Option<PathBuf>) -> anyhow::Result<()> {
    let existing = config_file::config_path()
        .and_then(|p| config_file::load_from_path(&p))
        .unwrap_or_default();
    let data = match data {
        Some(path) => Some(DataConfig {
            path: Some(absolute(path)?.display().to_string()),
        }),
        None => existing.data.clone(),
    };
    let updated = ConfigFile {
        owner: Some(OwnerConfig { name: Some(owner) }),
        data,
        ..existing
    };
    let path = config_file::save_config(&updated)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn absolute(path: PathBuf) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Resolve configuration: CLI flag > env var > config file.
fn resolve_owner(flag: Option<&str>, config: &ConfigFile) -> anyhow::Result<String> {
    flag.map(str::to_string)
        .or_else(|| std::env::var("PAPERLIST_OWNER").ok())
        .or_else(|| config.owner_name().map(str::to_string))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .context(
            "no owner name configured. Pass --owner, set PAPERLIST_OWNER, \
             or run: paperlist init-config --owner NAME",
        )
}

fn resolve_data_path(arg: Option<&PathBuf>, config: &ConfigFile) -> anyhow::Result<PathBuf> {
    let path = arg
        .cloned()
        .or_else(|| std::env::var("PAPERLIST_DATA").ok().map(PathBuf::from))
        .or_else(|| config.data_path())
        .context("no data file given. Pass a path, set PAPERLIST_DATA, or set data.path in the config")?;
    if !path.exists() {
        anyhow::bail!("publication data not found at {}", path.display());
    }
    Ok(path)
}

fn build_controller(args: &ViewArgs, config: &ConfigFile) -> anyhow::Result<ViewController> {
    let owner = resolve_owner(args.owner.as_deref(), config)?;
    let path = resolve_data_path(args.data.as_ref(), config)?;
    let records =
        load_records(&path).with_context(|| format!("failed to load {}", path.display()))?;
    let mut controller = ViewController::new(records, owner, config.choice_position());
    apply_view_args(&mut controller, args, config);
    Ok(controller)
}

/// Translate flags into view actions. Flags win over config defaults.
fn apply_view_args(controller: &mut ViewController, args: &ViewArgs, config: &ConfigFile) {
    if let Some(group_by) = args.group_by.or_else(|| config.group_by()) {
        controller.update(ViewAction::SetGroupBy(group_by));
    }
    if args.ascending {
        controller.update(ViewAction::SetSortDescending(false));
    } else if let Some(descending) = config.sort_descending() {
        controller.update(ViewAction::SetSortDescending(descending));
    }

    if !args.only.is_empty() {
        for choice in controller.choices().to_vec() {
            if let FilterChoice::Venue(v) = choice {
                controller.update(ViewAction::SetChoice(choice, args.only.contains(&v)));
            }
        }
    }
    for &venue in &args.exclude {
        controller.update(ViewAction::SetChoice(FilterChoice::Venue(venue), false));
    }
    if args.first_author_only {
        controller.update(ViewAction::SetChoice(FilterChoice::FirstAuthorOnly, true));
    }
}

fn render_options(owner: &str, out: &OutputArgs, config: &ConfigFile) -> RenderOptions {
    let display = config.display.as_ref();
    let configured_separator = display
        .and_then(|d| d.author_separator.as_deref())
        .and_then(|s| {
            s.parse::<AuthorSeparator>()
                .inspect_err(|e| tracing::warn!(error = %e, "ignoring display.author_separator"))
                .ok()
        });

    let mut options = RenderOptions::new(owner);
    options.author_separator = out
        .author_style
        .or(configured_separator)
        .unwrap_or_default();
    if let Some(title) = out
        .title
        .clone()
        .or_else(|| display.and_then(|d| d.page_title.clone()))
    {
        options.page_title = title;
    }
    options
}

fn choice_count(records: &[PaperRecord], choice: FilterChoice, owner: &str) -> usize {
    records
        .iter()
        .filter(|r| match choice {
            FilterChoice::Venue(v) => r.venue_type == v,
            FilterChoice::FirstAuthorOnly => r.is_first_author(owner),
        })
        .count()
}
