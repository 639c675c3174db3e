//! Dispatch and per-command handlers.
//!
//! - `run()`: parses arguments, sets up logging and the context, dispatches
//! - `init_context()`: builds `AppContext` from `--doc` and `--story`
//! - `handle_*()`: call the API and print the result

use super::print::{
    print_config, print_found, print_list, print_messages, print_query, print_tags,
};
use super::setup::{Cli, Commands, QueryCommands};
use clap::{CommandFactory, Parser};
use greps::api::{CmdMessage, CmdResult, ConfigAction, GrepsApi, SearchRequest};
use greps::engine::Mode;
use greps::error::{GrepsError, Result};
use greps::init::initialize;
use greps::model::{HistoryKind, Scope};
use greps::store::fs::FsQueryBackend;
use greps::text::fs::FileTextStore;
use std::io::{BufRead, Write};
use tracing_subscriber::EnvFilter;

/// Log filter, in `tracing_subscriber::EnvFilter` syntax.
const LOG_ENV: &str = "GREPS_LOG";

struct AppContext {
    api: GrepsApi<FileTextStore, FsQueryBackend>,
    scope: Scope,
    created_store: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        Cli::command().print_help().map_err(GrepsError::Io)?;
        return Ok(());
    };

    let mut ctx = init_context(&cli.doc, cli.story.as_deref(), cli.scope.into())?;
    if ctx.created_store && !matches!(command, Commands::Init) {
        print_messages(&[CmdMessage::info(format!(
            "Created query store in {}",
            ctx.api.paths().data_dir.display()
        ))]);
    }

    let outcome = match command {
        Commands::Find { pattern } => handle_find(&mut ctx, pattern),
        Commands::ReplaceAll {
            pattern,
            replacement,
        } => handle_replace_all(&mut ctx, pattern, replacement),
        Commands::Step {
            pattern,
            replacement,
        } => handle_step(&mut ctx, pattern, replacement),
        Commands::Query { action } => handle_query(&mut ctx, action),
        Commands::History { kind } => handle_history(&ctx, kind.into()),
        Commands::Normalize { text, replacement } => handle_normalize(&ctx, &text, replacement),
        Commands::Tags { replacement } => handle_tags(&ctx, replacement),
        Commands::Config { key, value } => handle_config(&ctx, key, value),
        Commands::Init => handle_init(&ctx),
    };

    match outcome {
        Err(e) if e.is_user_warning() => {
            print_messages(&[CmdMessage::warning(e.to_string())]);
            Ok(())
        }
        other => other,
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("greps=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(doc: &std::path::Path, story: Option<&str>, scope: Scope) -> Result<AppContext> {
    let ctx = initialize(doc, story)?;
    Ok(AppContext {
        api: ctx.api,
        scope,
        created_store: ctx.created_store,
    })
}

fn handle_find(ctx: &mut AppContext, pattern: String) -> Result<()> {
    let request = SearchRequest::new(ctx.scope, pattern, "");
    loop {
        let result = ctx.api.find_next(&request)?;
        if let Some(found) = &result.found {
            print_found(found);
        }
        print_messages(&result.messages);
        if result.found.is_none() {
            return Ok(());
        }
    }
}

fn handle_replace_all(ctx: &mut AppContext, pattern: String, replacement: String) -> Result<()> {
    let request = SearchRequest::new(ctx.scope, pattern, replacement);
    let result = ctx.api.replace_all(&request)?;
    print_messages(&result.messages);
    Ok(())
}

const STEP_PROMPT: &str = "[n]ext  [r]eplace  [y] replace and next  [a]ll  [q]uit";

/// The dialog loop: one command per stdin line until `q` or end of input.
fn handle_step(ctx: &mut AppContext, pattern: String, replacement: String) -> Result<()> {
    let request = SearchRequest::new(ctx.scope, pattern, replacement);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("{}", STEP_PROMPT);
    for line in stdin.lock().lines() {
        let line = line.map_err(GrepsError::Io)?;
        let result = match line.trim() {
            "n" | "" => ctx.api.find_next(&request),
            "r" => ctx.api.replace_current(&request),
            "y" => ctx.api.replace_and_find(&request),
            "a" => ctx.api.replace_all(&request),
            "q" => break,
            other => {
                print_messages(&[CmdMessage::warning(format!("Unknown key: {}", other))]);
                continue;
            }
        };
        if let Some(result) = keep_going(result)? {
            print_step(&result);
        }
        stdout.flush().map_err(GrepsError::Io)?;
    }
    Ok(())
}

/// Prints user warnings and carries on; anything else ends the loop.
fn keep_going(result: Result<CmdResult>) -> Result<Option<CmdResult>> {
    match result {
        Ok(result) => Ok(Some(result)),
        Err(e) if e.is_user_warning() => {
            print_messages(&[CmdMessage::warning(e.to_string())]);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn print_step(result: &CmdResult) {
    print_messages(&result.messages);
    if let Some(found) = &result.found {
        print_found(found);
    }
}

fn handle_query(ctx: &mut AppContext, action: QueryCommands) -> Result<()> {
    match action {
        QueryCommands::List => {
            let result = ctx.api.list_queries()?;
            print_list(&result.listed, "No saved queries.");
            print_messages(&result.messages);
        }
        QueryCommands::Show { name } => {
            let result = ctx.api.show_query(&name)?;
            if let Some(query) = &result.query {
                print_query(&name, query);
            }
            print_messages(&result.messages);
        }
        QueryCommands::Save {
            name,
            pattern,
            replacement,
        } => {
            let result = ctx.api.save_query(&name, &pattern, &replacement)?;
            print_messages(&result.messages);
        }
        QueryCommands::Delete { name } => {
            let result = ctx.api.delete_query(&name)?;
            print_messages(&result.messages);
        }
        QueryCommands::Run { name } => {
            let result = ctx.api.run_query(ctx.scope, &name)?;
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn handle_history(ctx: &AppContext, kind: HistoryKind) -> Result<()> {
    let result = ctx.api.history(kind)?;
    let empty = match kind {
        HistoryKind::FindWhat => "No recent patterns.",
        HistoryKind::ChangeTo => "No recent replacements.",
    };
    print_list(&result.listed, empty);
    print_messages(&result.messages);
    Ok(())
}

fn mode(replacement: bool) -> Mode {
    if replacement {
        Mode::Replacement
    } else {
        Mode::Pattern
    }
}

fn handle_normalize(ctx: &AppContext, text: &str, replacement: bool) -> Result<()> {
    let result = ctx.api.normalize(text, mode(replacement))?;
    if let Some(normalized) = &result.normalized {
        println!("{}", normalized);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_tags(ctx: &AppContext, replacement: bool) -> Result<()> {
    let result = ctx.api.tags(mode(replacement))?;
    print_tags(&result.tags);
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let show_all = matches!(action, ConfigAction::ShowAll);
    let result = ctx.api.config(action)?;
    if let Some(config) = result.config.as_ref().filter(|_| show_all) {
        print_config(config);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_init(ctx: &AppContext) -> Result<()> {
    // Context setup already created the store on a first run.
    if ctx.created_store {
        print_messages(&[CmdMessage::success(format!(
            "Initialized query store in {}",
            ctx.api.paths().data_dir.display()
        ))]);
        return Ok(());
    }
    let result = ctx.api.init()?;
    print_messages(&result.messages);
    Ok(())
}
