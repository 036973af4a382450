//! Bulk metadata editor for Omeka S.
//!
//! Reads a recipe (target item sets, filters and edit rules), previews the
//! resulting changes and, with `--commit`, patches each resource.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use bulkedit::batch::run_batch;
use bulkedit::core::resource::Resource;
use bulkedit::core::types::Mode;
use bulkedit::exit_codes;
use bulkedit::io::client::{ITEM_SETS, OmekaClient, PROPERTIES, RESOURCE_CLASSES, ResourceClient};
use bulkedit::io::config::{DEFAULT_CONFIG_PATH, EditorConfig, load_config, write_config};
use bulkedit::io::recipe::load_recipe;
use bulkedit::io::report::write_report;
use bulkedit::logging;

#[derive(Parser)]
#[command(
    name = "bulkedit",
    version,
    about = "Preview and apply bulk metadata edits on Omeka S resources"
)]
struct Cli {
    /// Path to the editor config file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate a recipe without contacting the remote site.
    Check { recipe: PathBuf },
    /// List item sets as `id<TAB>title`.
    Sets,
    /// List resource classes as `id<TAB>local name`.
    Classes,
    /// List property terms.
    Properties,
    /// List distinct values of a property term.
    Values {
        term: String,
        /// Maximum number of values (defaults to `values.limit` from the config).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Apply a recipe. Previews by default.
    Run {
        recipe: PathBuf,
        /// Write changes to the remote site instead of previewing them.
        #[arg(long)]
        commit: bool,
        /// Write the JSON report to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, force),
        Command::Check { recipe } => cmd_check(&recipe),
        Command::Sets => cmd_sets(&cli.config),
        Command::Classes => cmd_classes(&cli.config),
        Command::Properties => cmd_properties(&cli.config),
        Command::Values { term, limit } => cmd_values(&cli.config, &term, limit),
        Command::Run {
            recipe,
            commit,
            output,
        } => cmd_run(&cli.config, &recipe, commit, output.as_deref()),
    }
}

fn cmd_init(config_path: &Path, force: bool) -> Result<i32> {
    if !force && config_path.exists() {
        println!("init: {} already exists", config_path.display());
        return Ok(exit_codes::OK);
    }
    write_config(config_path, &EditorConfig::default())
        .with_context(|| format!("write {}", config_path.display()))?;
    println!("init: wrote {}", config_path.display());
    Ok(exit_codes::OK)
}

fn cmd_check(recipe_path: &Path) -> Result<i32> {
    let recipe = load_recipe(recipe_path)?;
    let criteria = recipe.criteria()?;
    println!(
        "check: item_sets={} resource_class={} excluded_titles={} include_media={} rules={}",
        criteria.set_ids().len(),
        criteria
            .class_id()
            .map_or_else(|| "any".to_string(), |id| id.to_string()),
        criteria.excluded_titles().len(),
        criteria.expand_to_children(),
        recipe.rules.len()
    );
    for (idx, rule) in recipe.unrecognized_rules() {
        eprintln!(
            "warning: rules[{}] has unrecognized action '{}' and will be ignored",
            idx, rule.action
        );
    }
    Ok(exit_codes::OK)
}

fn cmd_sets(config_path: &Path) -> Result<i32> {
    let client = connect(config_path)?;
    let sets = client
        .fetch_collection(ITEM_SETS, &[])
        .context("list item sets")?;
    for set in &sets {
        let title = match set.title() {
            "" => "Untitled",
            title => title,
        };
        println!("{}\t{}", display_id(set), title);
    }
    Ok(exit_codes::OK)
}

fn cmd_classes(config_path: &Path) -> Result<i32> {
    let client = connect(config_path)?;
    let classes = client
        .fetch_collection(RESOURCE_CLASSES, &[])
        .context("list resource classes")?;
    for class in &classes {
        println!(
            "{}\t{}",
            display_id(class),
            class.str_field("o:local_name").unwrap_or("")
        );
    }
    Ok(exit_codes::OK)
}

fn cmd_properties(config_path: &Path) -> Result<i32> {
    let client = connect(config_path)?;
    let properties = client
        .fetch_collection(PROPERTIES, &[])
        .context("list properties")?;
    let mut terms: Vec<&str> = properties
        .iter()
        .filter_map(|property| property.str_field("o:term"))
        .collect();
    terms.sort_unstable();
    for term in terms {
        println!("{term}");
    }
    Ok(exit_codes::OK)
}

fn cmd_values(config_path: &Path, term: &str, limit: Option<usize>) -> Result<i32> {
    let cfg = load_config(config_path)?;
    let client = OmekaClient::new(&cfg.api).context("connect to Omeka S")?;
    let limit = limit.unwrap_or(cfg.values.limit);
    let values = client
        .fetch_distinct_values(term, limit)
        .with_context(|| format!("list values of {term}"))?;
    for value in values {
        println!("{value}");
    }
    Ok(exit_codes::OK)
}

fn cmd_run(
    config_path: &Path,
    recipe_path: &Path,
    commit: bool,
    output: Option<&Path>,
) -> Result<i32> {
    let recipe = load_recipe(recipe_path)?;
    let criteria = recipe.criteria()?;
    let client = connect(config_path)?;
    let mode = if commit { Mode::Commit } else { Mode::Preview };

    let report = run_batch(&client, &criteria, &recipe.rules, mode)?;
    write_report(output, &report)?;

    let verb = if commit { "updated" } else { "would change" };
    eprintln!(
        "run: {} {} resource(s), {} error(s)",
        verb,
        report.changed.len(),
        report.failed.len()
    );
    if report.failed.is_empty() {
        Ok(exit_codes::OK)
    } else {
        Ok(exit_codes::PARTIAL)
    }
}

fn connect(config_path: &Path) -> Result<OmekaClient> {
    let cfg = load_config(config_path)?;
    OmekaClient::new(&cfg.api).context("connect to Omeka S")
}

fn display_id(resource: &Resource) -> String {
    resource
        .id()
        .map_or_else(|| "?".to_string(), |id| id.to_string())
}
