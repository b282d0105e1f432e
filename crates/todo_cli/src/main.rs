//! Terminal front-end for the to-do core.
//!
//! Each invocation restores the persisted session, performs one user
//! interaction and exits, mirroring one click in the UI.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use todo_core::{init_logging, AppConfig, SqliteKeyValueStore, Task, TaskId, TodoApp};

#[derive(Parser, Debug)]
#[command(name = "todo", version, about = "Local to-do lists with per-user accounts")]
struct Cli {
    /// State database file (overrides TODO_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Create an account and log in.
    Signup { identifier: String, secret: String },
    Login { identifier: String, secret: String },
    Logout,
    /// Show the logged-in identifier.
    Whoami,
    Add { text: String },
    List,
    /// Flip a task between open and done.
    Toggle { id: TaskId },
    Delete { id: TaskId },
    /// Replace a task's text.
    Edit { id: TaskId, text: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, &log_dir.to_string_lossy())?;
    }

    let store = SqliteKeyValueStore::open(&config.db_path)?;
    let mut app = TodoApp::open_with_system_clock(store)?;

    match cli.command {
        Commands::Signup { identifier, secret } => {
            app.signup(&identifier, &secret)?;
            println!("Signed up and logged in as {identifier}");
        }
        Commands::Login { identifier, secret } => {
            app.login(&identifier, &secret)?;
            println!("Logged in as {identifier}");
            print_tasks(app.tasks());
        }
        Commands::Logout => {
            app.logout()?;
            println!("Logged out");
        }
        Commands::Whoami => match app.active_user() {
            Some(user) => println!("{user}"),
            None => println!("Not logged in"),
        },
        Commands::Add { text } => match app.add_task(&text)? {
            Some(id) => println!("Task added with ID {id}"),
            None => println!("Nothing to add"),
        },
        Commands::List => {
            if app.active_user().is_none() {
                println!("Not logged in");
            } else {
                print_tasks(app.tasks());
            }
        }
        Commands::Toggle { id } => report(app.toggle_task(id)?, id, "toggled"),
        Commands::Delete { id } => report(app.remove_task(id)?, id, "deleted"),
        Commands::Edit { id, text } => {
            let current = app
                .tasks()
                .iter()
                .find(|task| task.id == id)
                .map(|task| task.text.clone());
            match current {
                Some(current) => {
                    app.begin_edit(id, current);
                    app.update_draft(text);
                    report(app.commit_edit()?, id, "updated");
                }
                None => report(false, id, "updated"),
            }
        }
    }

    Ok(())
}

fn report(found: bool, id: TaskId, verb: &str) {
    if found {
        println!("Task {id} {verb}");
    } else {
        println!("No task with ID {id}");
    }
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks yet. Add one with `todo add <text>`.");
        return;
    }
    for task in tasks {
        let mark = if task.completed { 'x' } else { ' ' };
        println!("[{mark}] {} {}", task.id, task.text);
    }
}
