//! Daybook CLI - A multi-user, password-protected personal journal
//!
//! This is the command-line interface for Daybook. It provides a
//! user-friendly interface to the core library functionality.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io::{self, IsTerminal, Read};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use daybook_core::{Database, Entry, VERSION};
use dialoguer::Password;

const SUMMARY_WIDTH: usize = 60;

/// Daybook - A multi-user, password-protected personal journal
#[derive(Parser)]
#[command(name = "daybook")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the journal database
    #[arg(short, long, global = true, env = "DAYBOOK_DB")]
    database: Option<String>,

    /// Username to act as
    #[arg(short, long, global = true, env = "DAYBOOK_USER")]
    username: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user account
    Register {
        /// Username to register (overrides --username)
        #[arg(value_name = "USERNAME")]
        username: Option<String>,
    },

    /// Verify credentials
    Login,

    /// Add a new journal entry
    Add {
        /// Entry title
        #[arg(value_name = "TITLE")]
        title: String,

        /// Entry content (overrides stdin/editor)
        #[arg(long)]
        content: Option<String>,

        /// Disable interactive prompts
        #[arg(long)]
        no_input: bool,
    },

    /// List journal entries
    List {
        /// Only show entries containing this term
        #[arg(short, long, value_name = "TERM")]
        search: Option<String>,

        /// Limit number of results
        #[arg(long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Output format (table, plain)
        #[arg(long, value_name = "FORMAT")]
        format: Option<String>,
    },

    /// Search entries by title and content
    Search {
        /// Search term
        #[arg(value_name = "TERM")]
        term: String,

        /// Limit number of results
        #[arg(long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Output format (table, plain)
        #[arg(long, value_name = "FORMAT")]
        format: Option<String>,
    },

    /// Show a specific entry by ID
    Show {
        /// Entry ID
        #[arg(value_name = "ID")]
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit an entry's title and/or content
    Edit {
        /// Entry ID
        #[arg(value_name = "ID")]
        id: i64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New content
        #[arg(long)]
        content: Option<String>,
    },

    /// Delete an entry
    Delete {
        /// Entry ID
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Export all entries to a JSON file
    Export {
        /// Destination path (defaults to <username>_journal_<date>.json)
        #[arg(short, long, value_name = "PATH")]
        output: Option<String>,
    },

    /// Show journal activity statistics
    Stats,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Register { username }) => {
            let db = open_database(cli.database)?;
            let username = username.or(cli.username).ok_or_else(|| {
                anyhow::anyhow!("No username provided. Use --username or set DAYBOOK_USER.")
            })?;

            let password = prompt_register_password()?;
            db.credentials().register_user(&username, &password)?;

            if !cli.quiet {
                println!("Registered user {}", username);
            }
        }
        Some(Commands::Login) => {
            let db = open_database(cli.database)?;
            let (username, user_id) = authenticate(&db, cli.username)?;

            if !cli.quiet {
                println!("Logged in as {} (user {})", username, user_id);
            }
        }
        Some(Commands::Add {
            title,
            content,
            no_input,
        }) => {
            let db = open_database(cli.database)?;
            let (_, user_id) = authenticate(&db, cli.username)?;

            let content = read_entry_content(no_input, content)?;
            let entry_id = db.entries().create_entry(user_id, &title, &content)?;

            if !cli.quiet {
                println!("Added entry {}", entry_id);
            }
        }
        Some(Commands::List {
            search,
            limit,
            json,
            format,
        }) => {
            let db = open_database(cli.database)?;
            let (_, user_id) = authenticate(&db, cli.username)?;

            let mut entries = db.entries().list_entries(user_id, search.as_deref())?;
            if let Some(lim) = limit {
                entries.truncate(lim);
            }

            let format = parse_output_format(format.as_deref())?;
            if json {
                if format.is_some() {
                    return Err(anyhow::anyhow!("--format cannot be used with --json"));
                }
                let output = serde_json::to_string_pretty(&entries_json(&entries))?;
                println!("{}", output);
            } else {
                match format.unwrap_or(OutputFormat::Table) {
                    OutputFormat::Table => {
                        if entries.is_empty() {
                            if !cli.quiet {
                                println!("No entries found.");
                            }
                        } else {
                            if !cli.quiet {
                                println!("ID | UPDATED_AT | TITLE | SUMMARY");
                            }
                            for entry in entries {
                                println!(
                                    "{} | {} | {} | {}",
                                    entry.id,
                                    entry.updated_at,
                                    entry.title,
                                    summarize(&entry.content)
                                );
                            }
                        }
                    }
                    OutputFormat::Plain => {
                        for entry in entries {
                            println!("{} {} {}", entry.id, entry.updated_at, entry.title);
                        }
                    }
                }
            }
        }
        Some(Commands::Search {
            term,
            limit,
            json,
            format,
        }) => {
            let db = open_database(cli.database)?;
            let (_, user_id) = authenticate(&db, cli.username)?;

            let mut entries = db.entries().list_entries(user_id, Some(&term))?;
            if let Some(lim) = limit {
                entries.truncate(lim);
            }

            let format = parse_output_format(format.as_deref())?;
            if json {
                if format.is_some() {
                    return Err(anyhow::anyhow!("--format cannot be used with --json"));
                }
                let output = serde_json::to_string_pretty(&entries_json(&entries))?;
                println!("{}", output);
            } else {
                match format.unwrap_or(OutputFormat::Table) {
                    OutputFormat::Table => {
                        if entries.is_empty() {
                            if !cli.quiet {
                                println!("No entries found.");
                            }
                        } else {
                            if !cli.quiet {
                                println!("ID | UPDATED_AT | TITLE | SUMMARY");
                            }
                            for entry in entries {
                                println!(
                                    "{} | {} | {} | {}",
                                    entry.id,
                                    entry.updated_at,
                                    entry.title,
                                    summarize(&entry.content)
                                );
                            }
                        }
                    }
                    OutputFormat::Plain => {
                        for entry in entries {
                            println!("{} {} {}", entry.id, entry.updated_at, entry.title);
                        }
                    }
                }
            }
        }
        Some(Commands::Show { id, json }) => {
            let db = open_database(cli.database)?;
            let (_, user_id) = authenticate(&db, cli.username)?;

            let entry = db
                .entries()
                .get_entry(user_id, id)?
                .ok_or_else(|| anyhow::anyhow!("Entry {} not found", id))?;

            if json {
                let output = serde_json::to_string_pretty(&entry_json(&entry))?;
                println!("{}", output);
            } else {
                print_entry(&entry, cli.quiet);
            }
        }
        Some(Commands::Edit { id, title, content }) => {
            let db = open_database(cli.database)?;
            let (_, user_id) = authenticate(&db, cli.username)?;

            if title.is_none() && content.is_none() {
                return Err(anyhow::anyhow!(
                    "Nothing to edit. Pass --title and/or --content."
                ));
            }

            let entries = db.entries();
            let current = entries
                .get_entry(user_id, id)?
                .ok_or_else(|| anyhow::anyhow!("Entry {} not found", id))?;

            let new_title = title.unwrap_or(current.title);
            let new_content = content.unwrap_or(current.content);
            entries.update_entry(user_id, id, &new_title, &new_content)?;

            if !cli.quiet {
                println!("Updated entry {}", id);
            }
        }
        Some(Commands::Delete { id }) => {
            let db = open_database(cli.database)?;
            let (_, user_id) = authenticate(&db, cli.username)?;

            db.entries().delete_entry(user_id, id)?;

            if !cli.quiet {
                println!("Deleted entry {}", id);
            }
        }
        Some(Commands::Export { output }) => {
            let db = open_database(cli.database)?;
            let (username, user_id) = authenticate(&db, cli.username)?;

            let doc = db.entries().export_entries(user_id)?;
            let json = serde_json::to_string_pretty(&doc)?;

            let target = output.unwrap_or_else(|| {
                format!("{}_journal_{}.json", username, Utc::now().format("%Y%m%d"))
            });
            std::fs::write(&target, json)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", target, e))?;

            if !cli.quiet {
                println!("Exported {} entries to {}", doc.total_entries, target);
            }
        }
        Some(Commands::Stats) => {
            let db = open_database(cli.database)?;
            let (_, user_id) = authenticate(&db, cli.username)?;

            let stats = db.entries().stats(user_id)?;
            println!("Total entries: {}", stats.total_entries);
            println!("Today: {}", stats.entries_today);
            println!("This week: {}", stats.entries_this_week);
            match stats.last_updated {
                Some(at) => println!("Last updated: {}", at),
                None => println!("Last updated: never"),
            }
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "daybook", &mut std::io::stdout());
        }
        None => {
            println!("Daybook v{}", VERSION);
            println!("\nRun `daybook --help` for usage information.");
        }
    }

    Ok(())
}

fn open_database(path: Option<String>) -> anyhow::Result<Database> {
    let target = path.ok_or_else(|| {
        anyhow::anyhow!("No database path provided. Use --database or set DAYBOOK_DB.")
    })?;
    Ok(Database::open(std::path::Path::new(&target))?)
}

fn authenticate(db: &Database, username: Option<String>) -> anyhow::Result<(String, i64)> {
    let username = username.ok_or_else(|| {
        anyhow::anyhow!("No username provided. Use --username or set DAYBOOK_USER.")
    })?;
    let password = prompt_password()?;
    let user_id = db.credentials().authenticate(&username, &password)?;
    Ok((username, user_id))
}

fn prompt_password() -> anyhow::Result<String> {
    if let Ok(value) = std::env::var("DAYBOOK_PASSWORD") {
        if !value.trim().is_empty() {
            return Ok(value);
        }
    }
    Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

fn prompt_register_password() -> anyhow::Result<String> {
    if let Ok(value) = std::env::var("DAYBOOK_PASSWORD") {
        if !value.trim().is_empty() {
            return Ok(value);
        }
    }
    Password::new()
        .with_prompt("Choose a password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Table,
    Plain,
}

fn parse_output_format(value: Option<&str>) -> anyhow::Result<Option<OutputFormat>> {
    match value {
        None => Ok(None),
        Some("table") => Ok(Some(OutputFormat::Table)),
        Some("plain") => Ok(Some(OutputFormat::Plain)),
        Some(other) => Err(anyhow::anyhow!(
            "Unsupported format: {} (use table or plain)",
            other
        )),
    }
}

fn read_entry_content(no_input: bool, content: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = content {
        if value.trim().is_empty() {
            return Err(anyhow::anyhow!("--content cannot be empty"));
        }
        return Ok(value);
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        let trimmed = buffer.trim_end().to_string();
        if trimmed.is_empty() {
            return Err(anyhow::anyhow!("No input provided on stdin"));
        }
        return Ok(trimmed);
    }

    if no_input {
        return Err(anyhow::anyhow!("--no-input requires content from stdin"));
    }

    read_content_from_editor()
}

fn read_content_from_editor() -> anyhow::Result<String> {
    let editor = std::env::var("EDITOR").map_err(|_| {
        anyhow::anyhow!("$EDITOR is not set; use --content or pipe content via stdin")
    })?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("System time error: {}", e))?
        .as_nanos();
    let filename = format!("daybook_entry_{}_{}.md", std::process::id(), nanos);
    let path = std::env::temp_dir().join(filename);

    std::fs::write(&path, "").map_err(|e| anyhow::anyhow!("Failed to create temp file: {}", e))?;

    let status = Command::new(editor)
        .arg(&path)
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to launch editor: {}", e))?;
    if !status.success() {
        let _ = std::fs::remove_file(&path);
        return Err(anyhow::anyhow!("Editor exited with failure"));
    }

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read temp file: {}", e))?;
    let _ = std::fs::remove_file(&path);

    let trimmed = contents.trim_end().to_string();
    if trimmed.is_empty() {
        return Err(anyhow::anyhow!("Entry content is empty"));
    }

    Ok(trimmed)
}

fn summarize(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("");
    if first_line.chars().count() > SUMMARY_WIDTH {
        let truncated: String = first_line.chars().take(SUMMARY_WIDTH).collect();
        format!("{}...", truncated)
    } else {
        first_line.to_string()
    }
}

fn entry_json(entry: &Entry) -> serde_json::Value {
    serde_json::json!({
        "id": entry.id,
        "title": entry.title,
        "content": entry.content,
        "created_at": entry.created_at,
        "updated_at": entry.updated_at,
    })
}

fn entries_json(entries: &[Entry]) -> Vec<serde_json::Value> {
    entries.iter().map(entry_json).collect()
}

fn print_entry(entry: &Entry, quiet: bool) {
    if !quiet {
        println!("ID: {}", entry.id);
        println!("Title: {}", entry.title);
        println!("Created: {}", entry.created_at);
        println!("Updated: {}", entry.updated_at);
        println!();
    }
    println!("{}", entry.content);
}
