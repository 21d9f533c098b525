//! Terminal host for quote of the day.
//!
//! # Responsibility
//! - Drive `qotd_core` use-cases against a vault directory on disk.
//! - Print user messages and map failures to exit status 1.

mod terminal;

use clap::{Parser, Subcommand};
use log::warn;
use qotd_core::embed::copy_snippet;
use qotd_core::presentation::{
    clipboard_failure_message, fetch_failure_message, fetch_if_absent_messages,
    fetch_success_messages, service_failure_message, BROWSE_EMPTY, BROWSE_HINT, DIALOG_COPY_HINT,
    RATINGS_SAVED, SNIPPET_COPIED,
};
use qotd_core::settings::STATE_DIR_NAME;
use qotd_core::{
    default_log_level, expand_qotd_blocks, init_logging, open_vault_service, ActiveEditor,
    DocumentStore, JsonFileSettingsStore, PluginManifest, QuoteCommand, QuoteServiceError, Rating,
    RatingInput, Settings, SettingsError, UserMessage, VaultQuoteService,
};
use std::path::{Path, PathBuf};
use terminal::{NoteEditor, TerminalClipboard};

const LOG_DIR_NAME: &str = "logs";

#[derive(Parser)]
#[command(name = "qotd", version, about = "Quote of the day for a markdown vault")]
struct Cli {
    /// Vault root directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    vault: PathBuf,

    /// Log level: trace|debug|info|warn|error (default depends on build mode)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log directory (default: <vault>/.qotd/logs)
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ensure the quotes folder and fetch today's quote if missing (silent if present)
    Startup,
    /// Fetch today's quote; `--force` fetches an alternative even if one exists
    Fetch {
        #[arg(long)]
        force: bool,
    },
    /// Show today's quote and its ratings
    Show,
    /// Rate today's quote (each score 1-5; an empty score is left unset)
    Rate {
        #[arg(long, value_name = "N")]
        inspiration: String,
        #[arg(long, value_name = "N")]
        wisdom: String,
        #[arg(long, value_name = "N")]
        style: String,
    },
    /// Append today's quote as a block quote to a vault note
    Insert {
        #[arg(long, value_name = "NOTE")]
        into: Option<String>,
    },
    /// Copy the qotd code block snippet to the clipboard
    Snippet,
    /// List saved quotes, newest first
    Browse,
    /// Print a vault note with its qotd code blocks rendered
    Render {
        #[arg(value_name = "NOTE")]
        note: String,
    },
    /// Show or update settings
    Settings {
        #[arg(long, value_name = "FOLDER")]
        folder: Option<String>,
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
    },
    /// List command ids and names, the ribbon action and the code block language
    Commands,
}

type CommandResult = Result<Vec<UserMessage>, UserMessage>;

fn main() {
    let cli = Cli::parse();
    start_logging(&cli);

    let result = run(&cli);
    match result {
        Ok(messages) => print_messages(&messages),
        Err(message) => {
            print_messages(std::slice::from_ref(&message));
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> CommandResult {
    match &cli.command {
        Commands::Startup => run_startup(&cli.vault),
        Commands::Fetch { force } => run_fetch(&cli.vault, *force),
        Commands::Show => run_show(&cli.vault),
        Commands::Rate {
            inspiration,
            wisdom,
            style,
        } => run_rate(
            &cli.vault,
            RatingInput::new(inspiration.as_str(), wisdom.as_str(), style.as_str()),
        ),
        Commands::Insert { into } => run_insert(&cli.vault, into.as_deref()),
        Commands::Snippet => run_snippet(),
        Commands::Browse => run_browse(&cli.vault),
        Commands::Render { note } => run_render(&cli.vault, note),
        Commands::Settings { folder, api_url } => {
            run_settings(&cli.vault, folder.as_deref(), api_url.as_deref())
        }
        Commands::Commands => run_commands(),
    }
}

fn start_logging(cli: &Cli) {
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let log_dir = match &cli.log_dir {
        Some(dir) => absolute(dir),
        None => absolute(&cli.vault).join(STATE_DIR_NAME).join(LOG_DIR_NAME),
    };
    if let Err(err) = init_logging(&level, &log_dir.to_string_lossy()) {
        eprintln!("qotd: logging disabled: {err}");
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn open(vault: &Path, command: QuoteCommand) -> Result<VaultQuoteService, UserMessage> {
    open_vault_service(vault).map_err(|err| {
        warn!(
            "event=cli_open_service module=cli status=error command={} error={err}",
            command.as_str()
        );
        service_failure_message(command, &err)
    })
}

fn run_startup(vault: &Path) -> CommandResult {
    let service = open(vault, QuoteCommand::FetchIfAbsent)?;
    let result = service.on_load();
    let messages = fetch_if_absent_messages(&result, true);
    match result {
        Ok(_) => Ok(messages),
        Err(err) => Err(fetch_failure_message(&err)),
    }
}

fn run_fetch(vault: &Path, force: bool) -> CommandResult {
    if force {
        let service = open(vault, QuoteCommand::FetchAlternative)?;
        return service
            .fetch_and_save()
            .map(|saved| fetch_success_messages(&saved))
            .map_err(|err| fetch_failure_message(&err));
    }
    let service = open(vault, QuoteCommand::FetchIfAbsent)?;
    let result = service.fetch_if_absent();
    let messages = fetch_if_absent_messages(&result, false);
    match result {
        Ok(_) => Ok(messages),
        Err(err) => Err(fetch_failure_message(&err)),
    }
}

fn run_show(vault: &Path) -> CommandResult {
    let service = open(vault, QuoteCommand::Rate)?;
    let form = service
        .open_rating()
        .map_err(|err| service_failure_message(QuoteCommand::Rate, &err))?;
    let score = |rating: Option<Rating>| {
        rating.map_or_else(|| "-".to_string(), |value| value.to_string())
    };
    Ok(vec![UserMessage::notice(format!(
        "\"{}\" — {}\ninspiration: {}  wisdom: {}  style: {}\n{}",
        form.quote,
        form.author,
        score(form.current.inspiration),
        score(form.current.wisdom),
        score(form.current.style),
        form.path
    ))])
}

fn run_rate(vault: &Path, input: RatingInput) -> CommandResult {
    let service = open(vault, QuoteCommand::Rate)?;
    service
        .rate_today(&input)
        .map(|_| vec![UserMessage::notice(RATINGS_SAVED)])
        .map_err(|err| service_failure_message(QuoteCommand::Rate, &err))
}

fn run_insert(vault: &Path, into: Option<&str>) -> CommandResult {
    let service = open(vault, QuoteCommand::Insert)?;
    let mut editor = into.map(|path| NoteEditor::new(service.store(), path));
    service
        .insert_into(
            editor
                .as_mut()
                .map(|editor| editor as &mut dyn ActiveEditor),
        )
        .map(|()| Vec::new())
        .map_err(|err| service_failure_message(QuoteCommand::Insert, &err))
}

fn run_snippet() -> CommandResult {
    let mut clipboard = TerminalClipboard::new(std::io::stdout());
    copy_snippet(&mut clipboard)
        .map(|()| vec![UserMessage::notice(SNIPPET_COPIED)])
        .map_err(|_| clipboard_failure_message())
}

fn run_browse(vault: &Path) -> CommandResult {
    let service = open(vault, QuoteCommand::Browse)?;
    let entries = service
        .browse()
        .map_err(|err| service_failure_message(QuoteCommand::Browse, &err))?;
    if entries.is_empty() {
        return Ok(vec![UserMessage::notice(BROWSE_EMPTY)]);
    }
    let mut lines = vec![BROWSE_HINT.to_string()];
    for entry in &entries {
        lines.push(format!("{}\n  {}\n  {}", entry.title, entry.preview(), entry.path));
    }
    Ok(vec![UserMessage::notice(lines.join("\n"))])
}

fn run_render(vault: &Path, note: &str) -> CommandResult {
    let service = open(vault, QuoteCommand::Insert)?;
    let failure = |err: QuoteServiceError| service_failure_message(QuoteCommand::Insert, &err);
    let content = service
        .store()
        .read(note)
        .map_err(|err| failure(err.into()))?;
    let block = service.render_code_block().map_err(failure)?;
    Ok(vec![UserMessage::notice(expand_qotd_blocks(
        &content,
        block.markdown(),
    ))])
}

fn run_settings(vault: &Path, folder: Option<&str>, api_url: Option<&str>) -> CommandResult {
    let store = JsonFileSettingsStore::for_vault(vault);
    let settings_failure = |err: SettingsError| {
        UserMessage::notice(format!("❌ Settings: {err}"))
    };
    let mut settings = Settings::load(&store).map_err(settings_failure)?;
    if folder.is_some() || api_url.is_some() {
        if let Some(folder) = folder {
            settings.set_quotes_folder(folder);
        }
        if let Some(api_url) = api_url {
            settings.set_api_url(api_url);
        }
        settings.save(&store).map_err(settings_failure)?;
    }
    Ok(vec![UserMessage::notice(format!(
        "Quotes folder: {}\nAPI URL: {}",
        if settings.quotes_folder.is_empty() {
            "(vault root)"
        } else {
            settings.quotes_folder.as_str()
        },
        settings.api_url
    ))])
}

fn run_commands() -> CommandResult {
    let manifest = PluginManifest::checked_builtin().map_err(|err| {
        UserMessage::notice(format!("❌ Plugin manifest is invalid: {err}"))
    })?;
    let mut lines = manifest
        .commands
        .iter()
        .map(|command| format!("{:<28} {}", command.id, command.name))
        .collect::<Vec<_>>();
    if let Some(ribbon) = &manifest.ribbon {
        lines.push(format!(
            "ribbon: [{}] {} -> {}",
            ribbon.icon, ribbon.tooltip, ribbon.command_id
        ));
    }
    if let Some(language) = &manifest.code_block_language {
        lines.push(format!("code block: ```{language}"));
    }
    Ok(vec![UserMessage::notice(lines.join("\n"))])
}

fn print_messages(messages: &[UserMessage]) {
    for message in messages {
        match message {
            UserMessage::Notice(text) => println!("{text}"),
            UserMessage::Dialog { title, body } => {
                println!("{title}\n\n{body}\n\n{DIALOG_COPY_HINT}")
            }
        }
    }
}
