use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use sigform::api::{EditorSession, SaveStatus, SignatureSession, TextSession};
use sigform::config::ProfileConfig;
use sigform::editor::edit_body;
use sigform::error::{Result, SigformError};
use sigform::gateway::{FsGateway, PersistenceGateway};
use sigform::model::{AccountFilter, FixedText, Record, Signature};
use sigform::render::{PlainRenderer, Renderer};
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands};

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let profile_dir = resolve_profile_dir(&cli)?;
    let config = ProfileConfig::load(&profile_dir).unwrap_or_default();
    let gateway = FsGateway::new(profile_dir);

    if cli.texts {
        run_texts(cli, gateway, config)
    } else {
        run_signatures(cli, gateway, config)
    }
}

fn resolve_profile_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.profile_dir {
        return Ok(dir.clone());
    }
    if let Ok(dir) = std::env::var("SIGFORM_PROFILE_DIR") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let dirs = ProjectDirs::from("com", "sigform", "sigform").ok_or_else(|| {
        SigformError::Usage(
            "Could not determine a profile directory; pass --profile-dir".to_string(),
        )
    })?;
    Ok(dirs.data_dir().to_path_buf())
}

fn run_signatures(cli: Cli, gateway: FsGateway, config: ProfileConfig) -> Result<()> {
    let mut session = SignatureSession::new(gateway, PlainRenderer::new(), config.accounts);
    let view = session.load();

    match cli.command {
        None | Some(Commands::List) => {
            print!("{view}");
            Ok(())
        }
        Some(Commands::Show { position }) => handle_show(&session, position),
        Some(Commands::Path) => handle_path(&session),
        Some(Commands::Add {
            name,
            body,
            no_editor,
            account,
            regex,
            default,
        }) => {
            let body = resolve_body(body, no_editor, "")?;
            let fields = Signature::new(name, body)
                .with_account(parse_filter(account, regex))
                .with_default(default);
            session.create()?;
            let view = session.commit_edit(fields)?;
            print!("{view}");
            println!("{}", "Added signature.".green());
            save_and_report(&mut session, cli.yes)
        }
        Some(Commands::Edit {
            position,
            name,
            body,
            edit_body: open_editor,
            no_editor,
            account,
            regex,
            no_account,
            default,
        }) => {
            session.edit(position)?;
            let mut fields = current_draft(&session)?;
            let other_flags = name.is_some()
                || account.is_some()
                || regex.is_some()
                || no_account
                || default.is_some();
            if let Some(name) = name {
                fields.name = name;
            }
            if no_account {
                fields.account = AccountFilter::Any;
            } else if account.is_some() || regex.is_some() {
                fields.account = parse_filter(account, regex);
            }
            if let Some(default) = default {
                fields.is_default = default;
            }
            fields.body =
                resolve_edited_body(body, open_editor, no_editor, other_flags, fields.body)?;
            let view = session.commit_edit(fields)?;
            print!("{view}");
            println!("{}", "Updated signature.".green());
            save_and_report(&mut session, cli.yes)
        }
        Some(Commands::Remove { position }) => handle_remove(&mut session, position, cli.yes),
        Some(Commands::Up { .. }) | Some(Commands::Down { .. }) => Err(SigformError::Usage(
            "Reordering applies to the texts document; pass --texts".to_string(),
        )),
    }
}

fn run_texts(cli: Cli, gateway: FsGateway, config: ProfileConfig) -> Result<()> {
    let mut session = TextSession::new(gateway, PlainRenderer::new(), config.accounts);
    let view = session.load();

    match cli.command {
        None | Some(Commands::List) => {
            print!("{view}");
            Ok(())
        }
        Some(Commands::Show { position }) => handle_show(&session, position),
        Some(Commands::Path) => handle_path(&session),
        Some(Commands::Add {
            name,
            body,
            no_editor,
            account,
            regex,
            default,
        }) => {
            reject_signature_flags(&account, &regex, false, default)?;
            let body = resolve_body(body, no_editor, "")?;
            session.create()?;
            let view = session.commit_edit(FixedText::new(name, body))?;
            print!("{view}");
            println!("{}", "Added text.".green());
            save_and_report(&mut session, cli.yes)
        }
        Some(Commands::Edit {
            position,
            name,
            body,
            edit_body: open_editor,
            no_editor,
            account,
            regex,
            no_account,
            default,
        }) => {
            reject_signature_flags(&account, &regex, no_account, default.is_some())?;
            session.edit(position)?;
            let mut fields = current_draft(&session)?;
            let other_flags = name.is_some();
            if let Some(name) = name {
                fields.name = name;
            }
            fields.body =
                resolve_edited_body(body, open_editor, no_editor, other_flags, fields.body)?;
            let view = session.commit_edit(fields)?;
            print!("{view}");
            println!("{}", "Updated text.".green());
            save_and_report(&mut session, cli.yes)
        }
        Some(Commands::Remove { position }) => handle_remove(&mut session, position, cli.yes),
        Some(Commands::Up { position }) => {
            let (moved, view) = session.up(position)?;
            if !moved {
                println!("{}", "Already first.".dimmed());
                return Ok(());
            }
            print!("{view}");
            save_and_report(&mut session, cli.yes)
        }
        Some(Commands::Down { position }) => {
            let (moved, view) = session.down(position)?;
            if !moved {
                println!("{}", "Already last.".dimmed());
                return Ok(());
            }
            print!("{view}");
            save_and_report(&mut session, cli.yes)
        }
    }
}

fn handle_show<R, G, V>(session: &EditorSession<R, G, V>, position: usize) -> Result<()>
where
    R: Record,
    G: PersistenceGateway,
    V: Renderer<R>,
{
    let record = session
        .store()
        .get(position)
        .ok_or(SigformError::NoSuchRecord {
            position,
            len: session.store().len(),
        })?;
    let body = record.body();
    print!("{body}");
    if !body.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn handle_path<R, G, V>(session: &EditorSession<R, G, V>) -> Result<()>
where
    R: Record,
    G: PersistenceGateway,
    V: Renderer<R>,
{
    println!("{}", session.path().display());
    Ok(())
}

fn handle_remove<R, G, V>(
    session: &mut EditorSession<R, G, V>,
    position: usize,
    assume_yes: bool,
) -> Result<()>
where
    R: Record,
    G: PersistenceGateway,
    V: Renderer<R, View = String>,
{
    let (removed, view) = session.remove(position)?;
    print!("{view}");
    println!("{}", format!("Removed '{}'.", removed.name()).green());
    save_and_report(session, assume_yes)
}

fn save_and_report<R, G, V>(session: &mut EditorSession<R, G, V>, assume_yes: bool) -> Result<()>
where
    R: Record,
    G: PersistenceGateway,
    V: Renderer<R>,
{
    match session.save(|prompt| confirm(prompt, assume_yes))? {
        SaveStatus::Saved => {
            println!("{}", format!("Saved {}.", R::KIND.file_name()).green())
        }
        SaveStatus::Declined => println!("{}", "Changes not saved.".yellow()),
    }
    Ok(())
}

/// Snapshot of the open draft's working copy.
fn current_draft<R, G, V>(session: &EditorSession<R, G, V>) -> Result<R>
where
    R: Record,
    G: PersistenceGateway,
    V: Renderer<R>,
{
    session
        .store()
        .draft()
        .map(|draft| draft.record().clone())
        .ok_or(SigformError::NoOpenDraft)
}

fn parse_filter(account: Option<String>, regex: Option<String>) -> AccountFilter {
    match (account, regex) {
        (Some(name), _) => AccountFilter::Account(name),
        (None, Some(pattern)) => AccountFilter::Pattern(pattern),
        (None, None) => AccountFilter::Any,
    }
}

fn reject_signature_flags(
    account: &Option<String>,
    regex: &Option<String>,
    no_account: bool,
    default_set: bool,
) -> Result<()> {
    if account.is_some() || regex.is_some() || no_account || default_set {
        return Err(SigformError::Usage(
            "Account and default flags apply to signatures; drop --texts".to_string(),
        ));
    }
    Ok(())
}

/// Body for a new entry: the flag value, or an editor buffer unless
/// suppressed.
fn resolve_body(body: Option<String>, no_editor: bool, initial: &str) -> Result<String> {
    match body {
        Some(text) => Ok(text),
        None if no_editor => Ok(initial.to_string()),
        None => edit_body(initial),
    }
}

/// Body for an edited entry. `--body` wins; otherwise the editor opens when
/// asked for explicitly or when no other field flag was given.
fn resolve_edited_body(
    body: Option<String>,
    open_editor: bool,
    no_editor: bool,
    other_flags: bool,
    current: String,
) -> Result<String> {
    match body {
        Some(text) => Ok(text),
        None if no_editor => Ok(current),
        None if open_editor || !other_flags => edit_body(&current),
        None => Ok(current),
    }
}

fn confirm(prompt: &str, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }
    // Without a terminal there is nobody to ask; keep the file untouched.
    if !io::stdin().is_terminal() {
        return false;
    }
    eprint!("{prompt} [y/N] ");
    let _ = io::stderr().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
