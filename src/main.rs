use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::debug;

use recipe_box::{
    open_book, open_book_unseeded, open_drafts, validate_all, AppConfig, Difficulty,
    ErrorReporter, LogReporter, RawRecipe, Recipe, RecipeFilter,
};

#[derive(Parser)]
#[command(name = "recipe-box", version, about = "Manage a local recipe collection")]
struct Cli {
    /// Data directory (overrides configuration)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List recipes, optionally filtered
    List {
        /// Text to look for in title, description and ingredients
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,
        /// Longest acceptable preparation time in minutes
        #[arg(long)]
        max_prep: Option<u32>,
        /// Longest acceptable cooking time in minutes
        #[arg(long)]
        max_cook: Option<u32>,
    },
    /// Print one recipe as JSON
    Show { id: String },
    /// Add a recipe from a JSON file
    Add { file: PathBuf },
    /// Replace a recipe with the contents of a JSON file
    Update { id: String, file: PathBuf },
    /// Delete a recipe
    Delete { id: String },
    /// Delete every recipe
    Clear,
    /// Check a JSON file against the recipe rules without saving it
    Validate { file: PathBuf },
    /// Manage the unsubmitted form draft
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
}

#[derive(Subcommand)]
enum DraftAction {
    /// Save a JSON file as the current draft
    Save { file: PathBuf },
    /// Print the current draft
    Show,
    /// Submit the draft as a new recipe and discard it
    Submit,
    /// Discard the current draft
    Discard,
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    value.parse()
}

fn read_raw(path: &Path) -> Result<RawRecipe, Box<dyn Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&content)?)
}

fn print_summary(recipe: &Recipe) {
    println!(
        "{}\t{}\t{}\t{} min prep\t{} min cook",
        recipe.id, recipe.title, recipe.difficulty, recipe.prep_time, recipe.cook_time
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }
    debug!("{:#?}", config);

    let reporter: Arc<dyn ErrorReporter> = Arc::new(LogReporter);

    match cli.command {
        Command::List {
            search,
            difficulty,
            max_prep,
            max_cook,
        } => {
            let mut filter = RecipeFilter::new()
                .search(search.unwrap_or_default())
                .difficulty(difficulty);
            if let Some(max) = max_prep {
                filter = filter.prep_time(0, max);
            }
            if let Some(max) = max_cook {
                filter = filter.cook_time(0, max);
            }

            let mut book = open_book(&config, reporter)?;
            let recipes = book.list(&filter)?;
            if recipes.is_empty() {
                println!("No recipes found.");
            }
            for recipe in &recipes {
                print_summary(recipe);
            }
        }
        Command::Show { id } => {
            let recipe = open_book(&config, reporter)?.get(&id)?;
            println!("{}", serde_json::to_string_pretty(&recipe)?);
        }
        Command::Add { file } => {
            let raw = read_raw(&file)?;
            let recipe = open_book(&config, reporter)?.create(&raw)?;
            println!("Recipe saved successfully: {}", recipe.id);
        }
        Command::Update { id, file } => {
            let raw = read_raw(&file)?;
            let recipe = open_book(&config, reporter)?.update(&id, &raw)?;
            println!("Recipe updated: {}", recipe.id);
        }
        Command::Delete { id } => {
            open_book(&config, reporter)?.delete(&id)?;
            println!("Recipe deleted: {}", id);
        }
        Command::Clear => {
            open_book_unseeded(&config, reporter)?.clear()?;
            println!("All recipes deleted.");
        }
        Command::Validate { file } => {
            let raw = read_raw(&file)?;
            if let Err(err) = validate_all(&raw, &config.validation) {
                for field_error in err.errors() {
                    eprintln!("{}: {}", field_error.field, field_error.message);
                }
                return Err("Please fix the errors before submitting".into());
            }
            println!("Recipe is valid.");
        }
        Command::Draft { action } => {
            let mut drafts = open_drafts(&config, reporter.clone())?;
            match action {
                DraftAction::Save { file } => {
                    drafts.save(&read_raw(&file)?)?;
                    println!("Draft saved.");
                }
                DraftAction::Show => match drafts.load()? {
                    Some(draft) => println!("{}", serde_json::to_string_pretty(&draft)?),
                    None => println!("No draft saved."),
                },
                DraftAction::Submit => {
                    let draft = drafts.load()?.ok_or("No draft saved.")?;
                    let recipe = open_book(&config, reporter)?.create(&draft)?;
                    drafts.discard()?;
                    println!("Recipe saved successfully: {}", recipe.id);
                }
                DraftAction::Discard => {
                    drafts.discard()?;
                    println!("Draft discarded.");
                }
            }
        }
    }

    Ok(())
}
