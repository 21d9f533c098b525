//! FFI use-case API for an embedding UI.
//!
//! # Responsibility
//! - Expose quote use-cases to Dart via FRB, one call per host action.
//! - Turn core results into plain envelopes with ready-to-show messages.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call takes the vault directory and opens its own service.
//! - Failures are reported through `HostMessage` values, never as errors.

use log::warn;
use qotd_core::presentation::{
    fetch_failure_message, fetch_if_absent_messages, fetch_success_messages,
    service_failure_message, BROWSE_EMPTY, DIALOG_COPY_HINT, RATINGS_SAVED,
};
use qotd_core::{
    init_logging as init_logging_inner, logging_status as logging_status_inner,
    open_vault_service, EmbedBlock, FetchIfAbsent, JsonFileSettingsStore, PluginManifest,
    QuoteCommand, QuoteServiceError, Rating, RatingInput, Settings, SettingsStore, UserMessage,
    VaultQuoteService, QOTD_SNIPPET, STATUS_BAR_TEXT,
};

const MESSAGE_KIND_NOTICE: &str = "notice";
const MESSAGE_KIND_DIALOG: &str = "dialog";

/// One message the host should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMessage {
    /// `notice` (transient) or `dialog` (modal with copyable body).
    pub kind: String,
    /// Dialog title; `None` for notices.
    pub title: Option<String>,
    pub text: String,
    /// Footer under dialog bodies.
    pub hint: Option<String>,
}

impl From<UserMessage> for HostMessage {
    fn from(value: UserMessage) -> Self {
        match value {
            UserMessage::Notice(text) => Self {
                kind: MESSAGE_KIND_NOTICE.to_string(),
                title: None,
                text,
                hint: None,
            },
            UserMessage::Dialog { title, body } => Self {
                kind: MESSAGE_KIND_DIALOG.to_string(),
                title: Some(title),
                text: body,
                hint: Some(DIALOG_COPY_HINT.to_string()),
            },
        }
    }
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostResponse {
    pub ok: bool,
    /// Vault-relative note the action touched, if any.
    pub path: Option<String>,
    /// Text payload (markdown to insert), if any.
    pub text: Option<String>,
    pub messages: Vec<HostMessage>,
}

impl HostResponse {
    fn success(messages: Vec<UserMessage>) -> Self {
        Self {
            ok: true,
            path: None,
            text: None,
            messages: messages.into_iter().map(HostMessage::from).collect(),
        }
    }

    fn failure(message: UserMessage) -> Self {
        Self {
            ok: false,
            path: None,
            text: None,
            messages: vec![message.into()],
        }
    }

    fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Data for the rating modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingFormResponse {
    pub ok: bool,
    pub path: Option<String>,
    pub quote: String,
    pub author: String,
    pub inspiration: Option<u8>,
    pub wisdom: Option<u8>,
    pub style: Option<u8>,
    pub messages: Vec<HostMessage>,
}

/// One row of the browse modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseItem {
    pub path: String,
    pub title: String,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseResponse {
    pub ok: bool,
    pub items: Vec<BrowseItem>,
    pub messages: Vec<HostMessage>,
}

/// Rendered `qotd` code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResponse {
    pub ok: bool,
    pub markdown: String,
    /// Note the quote was read from; `None` when unavailable.
    pub source_path: Option<String>,
    pub messages: Vec<HostMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsResponse {
    pub ok: bool,
    pub quotes_folder: String,
    pub api_url: String,
    pub messages: Vec<HostMessage>,
}

/// Command palette entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandItem {
    pub id: String,
    pub name: String,
}

/// Ribbon button the host should add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RibbonItem {
    pub icon: String,
    pub tooltip: String,
    pub command_id: String,
    /// Palette name of the bound command.
    pub command_name: String,
}

/// Every UI surface the host registers at load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestResponse {
    pub ok: bool,
    pub id: String,
    pub version: String,
    pub commands: Vec<CommandItem>,
    pub ribbon: Option<RibbonItem>,
    pub status_bar_text: Option<String>,
    /// Fenced block language the host should hand to `render_qotd_block`.
    pub code_block_language: Option<String>,
    pub messages: Vec<HostMessage>,
}

/// Active logger configuration; empty strings when logging is off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingStatusResponse {
    pub active: bool,
    pub level: String,
    pub log_dir: String,
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Reports the running logger, for a diagnostics view.
#[flutter_rust_bridge::frb(sync)]
pub fn logging_status() -> LoggingStatusResponse {
    match logging_status_inner() {
        Some((level, dir)) => LoggingStatusResponse {
            active: true,
            level: level.to_string(),
            log_dir: dir.display().to_string(),
        },
        None => LoggingStatusResponse {
            active: false,
            level: String::new(),
            log_dir: String::new(),
        },
    }
}

/// Startup: ensures the quotes folder and fetches today's quote when missing.
///
/// Stays silent when today's note already exists.
#[flutter_rust_bridge::frb(sync)]
pub fn plugin_load(vault_dir: String) -> HostResponse {
    let service = match open_service(&vault_dir, QuoteCommand::FetchIfAbsent) {
        Ok(service) => service,
        Err(response) => return response,
    };
    let result = service.on_load();
    let messages = fetch_if_absent_messages(&result, true);
    match result {
        Ok(outcome) => HostResponse::success(messages).with_path(outcome_path(&outcome)),
        Err(_) => HostResponse {
            ok: false,
            ..HostResponse::success(messages)
        },
    }
}

/// Fetch command. `force` fetches even when today's note exists.
#[flutter_rust_bridge::frb(sync)]
pub fn run_fetch(vault_dir: String, force: bool) -> HostResponse {
    let command = if force {
        QuoteCommand::FetchAlternative
    } else {
        QuoteCommand::FetchIfAbsent
    };
    let service = match open_service(&vault_dir, command) {
        Ok(service) => service,
        Err(response) => return response,
    };

    if force {
        return match service.fetch_and_save() {
            Ok(saved) => {
                HostResponse::success(fetch_success_messages(&saved)).with_path(saved.path)
            }
            Err(err) => HostResponse::failure(fetch_failure_message(&err)),
        };
    }

    let result = service.fetch_if_absent();
    let messages = fetch_if_absent_messages(&result, false);
    match result {
        Ok(outcome) => HostResponse::success(messages).with_path(outcome_path(&outcome)),
        Err(_) => HostResponse {
            ok: false,
            ..HostResponse::success(messages)
        },
    }
}

/// Loads today's note for the rating modal.
#[flutter_rust_bridge::frb(sync)]
pub fn rating_form(vault_dir: String) -> RatingFormResponse {
    let form = open_service(&vault_dir, QuoteCommand::Rate).and_then(|service| {
        service
            .open_rating()
            .map_err(|err| failure(QuoteCommand::Rate, &err))
    });
    match form {
        Ok(form) => RatingFormResponse {
            ok: true,
            path: Some(form.path),
            quote: form.quote,
            author: form.author,
            inspiration: form.current.inspiration.map(Rating::value),
            wisdom: form.current.wisdom.map(Rating::value),
            style: form.current.style.map(Rating::value),
            messages: Vec::new(),
        },
        Err(response) => RatingFormResponse {
            ok: false,
            path: None,
            quote: String::new(),
            author: String::new(),
            inspiration: None,
            wisdom: None,
            style: None,
            messages: response.messages,
        },
    }
}

/// Saves the three scores typed into the rating modal.
///
/// The note at `path` is re-read before writing.
#[flutter_rust_bridge::frb(sync)]
pub fn save_ratings(
    vault_dir: String,
    path: String,
    inspiration: String,
    wisdom: String,
    style: String,
) -> HostResponse {
    let service = match open_service(&vault_dir, QuoteCommand::Rate) {
        Ok(service) => service,
        Err(response) => return response,
    };
    let input = RatingInput::new(inspiration, wisdom, style);
    match service.save_ratings(&path, &input) {
        Ok(_) => HostResponse::success(vec![UserMessage::notice(RATINGS_SAVED)]).with_path(path),
        Err(err) => failure(QuoteCommand::Rate, &err),
    }
}

/// Lists saved quotes, newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn browse_quotes(vault_dir: String) -> BrowseResponse {
    let entries = open_service(&vault_dir, QuoteCommand::Browse).and_then(|service| {
        service
            .browse()
            .map_err(|err| failure(QuoteCommand::Browse, &err))
    });
    match entries {
        Ok(entries) if entries.is_empty() => BrowseResponse {
            ok: true,
            items: Vec::new(),
            messages: vec![UserMessage::notice(BROWSE_EMPTY).into()],
        },
        Ok(entries) => BrowseResponse {
            ok: true,
            items: entries
                .into_iter()
                .map(|entry| BrowseItem {
                    preview: entry.preview(),
                    path: entry.path,
                    title: entry.title,
                })
                .collect(),
            messages: Vec::new(),
        },
        Err(response) => BrowseResponse {
            ok: false,
            items: Vec::new(),
            messages: response.messages,
        },
    }
}

/// Returns the markdown block the host inserts at the cursor.
///
/// Today's note is read first, so a missing note is reported even when
/// `has_active_editor` is false.
#[flutter_rust_bridge::frb(sync)]
pub fn insert_quote_markdown(vault_dir: String, has_active_editor: bool) -> HostResponse {
    let service = match open_service(&vault_dir, QuoteCommand::Insert) {
        Ok(service) => service,
        Err(response) => return response,
    };
    let markdown = match service.insert_markdown() {
        Ok(markdown) => markdown,
        Err(err) => return failure(QuoteCommand::Insert, &err),
    };
    if !has_active_editor {
        return failure(QuoteCommand::Insert, &QuoteServiceError::NoActiveEditor);
    }
    HostResponse {
        text: Some(markdown),
        ..HostResponse::success(Vec::new())
    }
}

/// Text the copy-snippet command puts on the clipboard.
#[flutter_rust_bridge::frb(sync)]
pub fn qotd_snippet() -> String {
    QOTD_SNIPPET.to_string()
}

/// Renders the `qotd` code block for today.
#[flutter_rust_bridge::frb(sync)]
pub fn render_qotd_block(vault_dir: String) -> RenderResponse {
    let block = open_service(&vault_dir, QuoteCommand::Insert).and_then(|service| {
        service
            .render_code_block()
            .map_err(|err| failure(QuoteCommand::Insert, &err))
    });
    match block {
        Ok(block) => RenderResponse {
            ok: true,
            markdown: block.markdown().to_string(),
            source_path: match block {
                EmbedBlock::Quote { source_path, .. } => Some(source_path),
                EmbedBlock::Unavailable => None,
            },
            messages: Vec::new(),
        },
        Err(response) => RenderResponse {
            ok: false,
            markdown: String::new(),
            source_path: None,
            messages: response.messages,
        },
    }
}

/// Reads the persisted settings, defaults applied.
#[flutter_rust_bridge::frb(sync)]
pub fn get_settings(vault_dir: String) -> SettingsResponse {
    let store = match settings_store(&vault_dir) {
        Ok(store) => store,
        Err(message) => return settings_failure(message),
    };
    match Settings::load(&store) {
        Ok(settings) => settings_response(settings),
        Err(err) => settings_failure(format!("❌ Settings: {err}")),
    }
}

/// Updates and persists the settings; `None` keeps a value unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn update_settings(
    vault_dir: String,
    quotes_folder: Option<String>,
    api_url: Option<String>,
) -> SettingsResponse {
    let store = match settings_store(&vault_dir) {
        Ok(store) => store,
        Err(message) => return settings_failure(message),
    };
    let mut settings = match Settings::load(&store) {
        Ok(settings) => settings,
        Err(err) => return settings_failure(format!("❌ Settings: {err}")),
    };
    if let Some(folder) = quotes_folder.as_deref() {
        settings.set_quotes_folder(folder);
    }
    if let Some(url) = api_url.as_deref() {
        settings.set_api_url(url);
    }
    match settings.save(&store) {
        Ok(()) => settings_response(settings),
        Err(err) => settings_failure(format!("❌ Settings: {err}")),
    }
}

/// Label shown in the host status bar.
#[flutter_rust_bridge::frb(sync)]
pub fn status_bar_text() -> String {
    STATUS_BAR_TEXT.to_string()
}

/// Commands the host should register, in palette order.
///
/// Empty when the manifest fails validation.
#[flutter_rust_bridge::frb(sync)]
pub fn list_commands() -> Vec<CommandItem> {
    plugin_manifest().commands
}

/// Validated plugin manifest: commands, ribbon, status bar and code block.
#[flutter_rust_bridge::frb(sync)]
pub fn plugin_manifest() -> ManifestResponse {
    let manifest = match PluginManifest::checked_builtin() {
        Ok(manifest) => manifest,
        Err(err) => {
            return ManifestResponse {
                ok: false,
                id: String::new(),
                version: String::new(),
                commands: Vec::new(),
                ribbon: None,
                status_bar_text: None,
                code_block_language: None,
                messages: vec![UserMessage::notice(format!(
                    "❌ Plugin manifest is invalid: {err}"
                ))
                .into()],
            }
        }
    };
    ManifestResponse {
        ok: true,
        ribbon: ribbon_item(&manifest),
        commands: manifest
            .commands
            .into_iter()
            .map(|command| CommandItem {
                id: command.id,
                name: command.name,
            })
            .collect(),
        id: manifest.id,
        version: manifest.version,
        status_bar_text: manifest.status_bar_text,
        code_block_language: manifest.code_block_language,
        messages: Vec::new(),
    }
}

/// Ribbon button of the validated manifest, if it declares one.
#[flutter_rust_bridge::frb(sync)]
pub fn ribbon_action() -> Option<RibbonItem> {
    plugin_manifest().ribbon
}

fn ribbon_item(manifest: &PluginManifest) -> Option<RibbonItem> {
    let ribbon = manifest.ribbon.as_ref()?;
    let command = manifest.command(&ribbon.command_id)?;
    Some(RibbonItem {
        icon: ribbon.icon.clone(),
        tooltip: ribbon.tooltip.clone(),
        command_id: command.id.clone(),
        command_name: command.name.clone(),
    })
}

fn open_service(vault_dir: &str, command: QuoteCommand) -> Result<VaultQuoteService, HostResponse> {
    let vault_dir = vault_dir.trim();
    if vault_dir.is_empty() {
        return Err(HostResponse::failure(UserMessage::notice(
            "❌ Vault directory is not set.",
        )));
    }
    open_vault_service(vault_dir).map_err(|err| {
        warn!(
            "event=ffi_open_service module=ffi status=error command={} error={err}",
            command.as_str()
        );
        failure(command, &err)
    })
}

fn failure(command: QuoteCommand, err: &QuoteServiceError) -> HostResponse {
    HostResponse::failure(service_failure_message(command, err))
}

fn outcome_path(outcome: &FetchIfAbsent) -> String {
    match outcome {
        FetchIfAbsent::Created(saved) => saved.path.clone(),
        FetchIfAbsent::AlreadyPresent(path) => path.clone(),
    }
}

fn settings_store(vault_dir: &str) -> Result<impl SettingsStore, String> {
    let vault_dir = vault_dir.trim();
    if vault_dir.is_empty() {
        return Err("❌ Vault directory is not set.".to_string());
    }
    Ok(JsonFileSettingsStore::for_vault(vault_dir))
}

fn settings_response(settings: Settings) -> SettingsResponse {
    SettingsResponse {
        ok: true,
        quotes_folder: settings.quotes_folder,
        api_url: settings.api_url,
        messages: Vec::new(),
    }
}

fn settings_failure(message: String) -> SettingsResponse {
    let defaults = Settings::default();
    SettingsResponse {
        ok: false,
        quotes_folder: defaults.quotes_folder,
        api_url: defaults.api_url,
        messages: vec![UserMessage::Notice(message).into()],
    }
}

#[cfg(test)]
mod tests {
    use super::{
        browse_quotes, init_logging, insert_quote_markdown, list_commands, logging_status,
        plugin_manifest, qotd_snippet, rating_form, render_qotd_block, ribbon_action, run_fetch,
        save_ratings, status_bar_text, update_settings, HostMessage,
    };
    use qotd_core::{format_date, Clock, SystemClock};
    use std::path::Path;
    use tempfile::TempDir;

    fn vault_with_today_note() -> (TempDir, String, String) {
        let dir = tempfile::tempdir().expect("create temp vault");
        let vault_dir = dir
            .path()
            .to_str()
            .expect("temp dir should be valid UTF-8")
            .to_string();
        let settings = update_settings(vault_dir.clone(), Some("Quotes".to_string()), None);
        assert!(settings.ok);

        let path = format!("Quotes/{}-1-keep-going.md", format_date(SystemClock.today()));
        let absolute = Path::new(&vault_dir).join(&path);
        std::fs::create_dir_all(absolute.parent().expect("note has a parent"))
            .expect("create quotes folder");
        std::fs::write(
            &absolute,
            "---\nquote: \"Keep going.\"\nauthor: \"Sam\"\ninspiration:\nwisdom:\nstyle:\n---\n",
        )
        .expect("seed today's note");
        (dir, vault_dir, path)
    }

    fn texts(messages: &[HostMessage]) -> Vec<&str> {
        messages.iter().map(|message| message.text.as_str()).collect()
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/qotd-logs".to_string()).is_empty());
    }

    #[test]
    fn static_surfaces_are_exposed() {
        assert_eq!(qotd_snippet(), "```qotd\n```");
        assert_eq!(status_bar_text(), "QOTD ready");
        let commands = list_commands();
        assert_eq!(commands.len(), 6);
        assert!(commands
            .iter()
            .any(|command| command.id == "fetch-alternative-quote"));
    }

    #[test]
    fn manifest_exposes_ribbon_and_code_block() {
        let manifest = plugin_manifest();
        assert!(manifest.ok);
        assert_eq!(manifest.id, "quote-of-the-day");
        assert_eq!(manifest.commands, list_commands());
        assert_eq!(manifest.status_bar_text.as_deref(), Some("QOTD ready"));
        assert_eq!(manifest.code_block_language.as_deref(), Some("qotd"));

        let ribbon = ribbon_action().expect("ribbon is declared");
        assert_eq!(ribbon.icon, "star");
        assert_eq!(ribbon.tooltip, "Fetch Alternative Quote");
        assert_eq!(ribbon.command_id, "fetch-alternative-quote");
        assert_eq!(ribbon.command_name, "Fetch Alternative Quote of the Day");
        assert_eq!(manifest.ribbon, Some(ribbon));
    }

    #[test]
    fn logging_status_reports_active_logger() {
        let dir = tempfile::tempdir().expect("create temp log dir");
        let log_dir = dir.path().to_str().expect("utf-8 temp path").to_string();
        assert_eq!(init_logging("debug".to_string(), log_dir), "");

        let status = logging_status();
        assert!(status.active);
        assert_eq!(status.level, "debug");
        assert_eq!(Path::new(&status.log_dir), dir.path());
    }

    #[test]
    fn blank_rating_field_is_saved_as_unset() {
        let (_dir, vault_dir, path) = vault_with_today_note();
        let response = save_ratings(
            vault_dir.clone(),
            path,
            "5".to_string(),
            String::new(),
            "3".to_string(),
        );
        assert!(response.ok);

        let form = rating_form(vault_dir);
        assert_eq!(
            (form.inspiration, form.wisdom, form.style),
            (Some(5), None, Some(3))
        );
    }

    #[test]
    fn fetch_without_force_reports_existing_note() {
        let (_dir, vault_dir, path) = vault_with_today_note();
        let response = run_fetch(vault_dir, false);
        assert!(response.ok);
        assert_eq!(response.path.as_deref(), Some(path.as_str()));
        assert_eq!(
            texts(&response.messages),
            vec!["Quote for today already exists. Use 'Fetch Alternative Quote' to get a different one."]
        );
    }

    #[test]
    fn rating_flow_round_trips_scores() {
        let (_dir, vault_dir, path) = vault_with_today_note();

        let form = rating_form(vault_dir.clone());
        assert!(form.ok);
        assert_eq!(form.quote, "Keep going.");
        assert_eq!(form.inspiration, None);

        let saved = save_ratings(
            vault_dir.clone(),
            path,
            "5".to_string(),
            "4".to_string(),
            "3".to_string(),
        );
        assert!(saved.ok);
        assert_eq!(texts(&saved.messages), vec!["Quote ratings saved!"]);

        let form = rating_form(vault_dir);
        assert_eq!(
            (form.inspiration, form.wisdom, form.style),
            (Some(5), Some(4), Some(3))
        );
    }

    #[test]
    fn invalid_ratings_are_not_saved() {
        let (_dir, vault_dir, path) = vault_with_today_note();
        let response = save_ratings(
            vault_dir.clone(),
            path,
            "5".to_string(),
            "abc".to_string(),
            "3".to_string(),
        );
        assert!(!response.ok);
        assert_eq!(rating_form(vault_dir).wisdom, None);
    }

    #[test]
    fn insert_and_render_use_todays_note() {
        let (_dir, vault_dir, path) = vault_with_today_note();

        let inserted = insert_quote_markdown(vault_dir.clone(), true);
        assert_eq!(
            inserted.text.as_deref(),
            Some("> Keep going.\n>\n> — Sam\n\n")
        );

        let no_editor = insert_quote_markdown(vault_dir.clone(), false);
        assert!(!no_editor.ok);
        assert_eq!(
            texts(&no_editor.messages),
            vec!["No active editor to insert into."]
        );

        let rendered = render_qotd_block(vault_dir.clone());
        assert_eq!(rendered.source_path.as_deref(), Some(path.as_str()));
        assert_eq!(rendered.markdown, "> Keep going.\n>\n> — Sam");

        let browse = browse_quotes(vault_dir);
        assert_eq!(browse.items.len(), 1);
        assert_eq!(browse.items[0].preview, "Keep going.… — Sam");
    }

    #[test]
    fn empty_vault_reports_missing_quote() {
        let dir = tempfile::tempdir().expect("create temp vault");
        let vault_dir = dir
            .path()
            .to_str()
            .expect("temp dir should be valid UTF-8")
            .to_string();

        let form = rating_form(vault_dir.clone());
        assert!(!form.ok);
        assert_eq!(
            texts(&form.messages),
            vec!["No quote file found for today. Please fetch it first."]
        );

        let browse = browse_quotes(vault_dir.clone());
        assert!(browse.ok);
        assert_eq!(texts(&browse.messages), vec!["No saved quotes found."]);

        let rendered = render_qotd_block(vault_dir);
        assert_eq!(rendered.source_path, None);
        assert_eq!(
            rendered.markdown,
            "No Quote of the Day available. Fetch one first."
        );
    }

    #[test]
    fn blank_vault_dir_is_rejected_without_panicking() {
        let response = run_fetch("  ".to_string(), true);
        assert!(!response.ok);
        assert_eq!(response.messages.len(), 1);
    }
}
