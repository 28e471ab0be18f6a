//! Sheetsieve - interactive spreadsheet filter
//!
//! Console entry point: runs the selection flow against a terminal
//! transport. Type the path of an .xlsx file to upload it, then answer
//! the numbered menus; filtered files land in the download directory.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use sheetsieve::cli::Cli;
use sheetsieve::flow::{Event, Flow};
use sheetsieve::session::{ChatId, SessionStore};
use sheetsieve::transport::console::ConsoleTransport;

/// The one conversation a terminal hosts
const LOCAL_CHAT: ChatId = ChatId(0);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    std::fs::create_dir_all(&cli.download_dir)?;
    tracing::info!(download_dir = %cli.download_dir.display(), "Starting console session");

    let transport = ConsoleTransport::new(&cli.download_dir);
    let mut flow = Flow::new(SessionStore::new(), transport);

    print_welcome();
    flow.dispatch(LOCAL_CHAT, Event::Start).await?;

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                match trimmed {
                    "/start" => flow.dispatch(LOCAL_CHAT, Event::Start).await?,
                    "/help" => print_help(),
                    "/quit" | "/exit" | "quit" | "exit" => break,
                    _ => handle_input(&mut flow, trimmed).await?,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("Bye!");
    Ok(())
}

/// Routes free-form input: a number is a menu tap, anything else is
/// treated as a file path to upload
async fn handle_input(flow: &mut Flow<ConsoleTransport>, input: &str) -> Result<()> {
    if let Ok(choice) = input.parse::<usize>() {
        match flow.transport().menu_token(choice) {
            Some(token) => flow.dispatch(LOCAL_CHAT, Event::Callback(token)).await?,
            None => println!("{}", "No such menu option right now.".red()),
        }
        return Ok(());
    }

    let path = Path::new(input);
    match std::fs::read(path) {
        Ok(bytes) => {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| input.to_string());
            flow.dispatch(LOCAL_CHAT, Event::Upload { file_name, bytes })
                .await?;
        }
        Err(e) => {
            println!("{} {}: {}", "Could not read".red(), input, e);
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "sheetsieve=debug"
    } else {
        "sheetsieve=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_welcome() {
    println!("{}", "sheetsieve".bold());
    println!("Type the path of an .xlsx file to upload it, a number to tap a menu button,");
    println!("/start to restart, /help for help, /quit to leave.");
    println!();
}

fn print_help() {
    println!("Commands:");
    println!("  <path>    upload the .xlsx file at <path>");
    println!("  <number>  tap that button on the current menu");
    println!("  /start    show the greeting again");
    println!("  /quit     exit");
}
