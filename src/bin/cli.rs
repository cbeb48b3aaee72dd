//! LinkTray CLI - manage the link list and its quick-access menu.
//!
//! Usage: linktray [OPTIONS] <COMMAND>
//!
//! Stands in for the GUI shell: every invocation acquires the single-instance
//! lock, opens the store, stages its edit, and commits before exiting.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use linktray_lib::{
    build_menu,
    db::Database,
    launch,
    lock::{InstanceLock, LOCK_FILE},
    paths,
    repo::LinkRepository,
    settings::{Settings, SETTINGS_FILE},
    tray::MenuItem,
    LinkDraft, Result,
};

#[derive(Parser)]
#[command(name = "linktray")]
#[command(version, about = "Personal link list with a quick-access menu", long_about = None)]
struct Cli {
    /// Database path (default: the per-user data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored links
    List,
    /// Add a link and save it
    Add {
        title: String,
        category: String,
        url: String,
    },
    /// Edit fields of a stored link
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },
    /// Delete a stored link
    Rm { id: i64 },
    /// Open a stored link in the default browser
    Open { id: i64 },
    /// Print the quick-access menu, grouped by category
    Menu,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // A second running instance aborts here, before the store is touched.
    let _lock = InstanceLock::acquire(&paths::app_data_path(LOCK_FILE)?)?;

    let db = Arc::new(Database::open(resolve_db_path(cli.db)?)?);
    let mut repo = LinkRepository::open(db)?;

    match cli.command {
        Commands::List => {
            let rows = repo.baseline();
            if rows.is_empty() {
                println!("No links stored.");
                return Ok(());
            }
            println!("{:>4}  {:<24} {:<16} URL", "ID", "Title", "Category");
            for row in rows {
                println!(
                    "{:>4}  {:<24} {:<16} {}",
                    row.id, row.title, row.category, row.url
                );
            }
        }
        Commands::Add {
            title,
            category,
            url,
        } => {
            let fields = LinkDraft {
                title,
                category,
                url,
            }
            .validate()?;
            repo.stage_insert(fields);
            repo.commit()?;
            println!("Saved.");
        }
        Commands::Edit {
            id,
            title,
            category,
            url,
        } => {
            let Some(row) = repo.baseline().iter().find(|row| row.id == id) else {
                println!("No link with id {id}.");
                return Ok(());
            };
            let draft = LinkDraft {
                title: title.unwrap_or_else(|| row.title.clone()),
                category: category.unwrap_or_else(|| row.category.clone()),
                url: url.unwrap_or_else(|| row.url.clone()),
            };
            repo.stage_update(id, draft.validate()?);
            repo.commit()?;
            println!("Saved.");
        }
        Commands::Rm { id } => {
            if repo.stage_delete(id) {
                repo.commit()?;
                println!("Link removed.");
            } else {
                println!("No link with id {id}.");
            }
        }
        Commands::Open { id } => match repo.baseline().iter().find(|row| row.id == id) {
            Some(row) => {
                let url = launch::open_in_browser(&row.url)?;
                println!("Opening {url}");
            }
            None => println!("No link with id {id}."),
        },
        Commands::Menu => {
            for item in build_menu(repo.baseline()).items() {
                match item {
                    MenuItem::Header(name) => println!("{name}"),
                    MenuItem::Link { title, url } => println!("  {title}  ->  {url}"),
                    MenuItem::Separator => println!(),
                    MenuItem::Placeholder(text) => println!("{text}"),
                }
            }
        }
    }

    Ok(())
}

/// Store path resolution order: `--db` flag, then the settings file, then the
/// default location in the app data directory.
fn resolve_db_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }

    let settings = Settings::load(&paths::app_data_path(SETTINGS_FILE)?);
    if let Some(custom) = settings
        .custom_db_path
        .filter(|path| !path.trim().is_empty())
    {
        return Ok(PathBuf::from(custom));
    }

    paths::app_data_path(paths::DB_FILE)
}
