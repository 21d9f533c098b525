//! Quote of the day use-case service.
//!
//! # Responsibility
//! - Fetch a remote quote and persist it as a note.
//! - Locate today's note and expose rating, browsing, insertion and embed
//!   use-cases over it.
//!
//! # Invariants
//! - Every use-case returns a result value; user-facing wording lives in
//!   `presentation`.
//! - Failed fetches create no note.
//! - Rating saves re-read the note and rewrite only the rating keys.
//! - Today's note is the most recently created markdown file whose path starts
//!   with `<folder>/<YYYY-MM-DD>-`; equal timestamps fall back to the
//!   lexicographically last path.

use crate::clock::{format_date, Clock};
use crate::embed::EmbedBlock;
use crate::fetch::{parse_quote_response, FetchError, QuoteTransport, TransportError};
use crate::host::ActiveEditor;
use crate::model::quote::{Rating, RatingInput, RatingInputError, Ratings, RemoteQuote};
use crate::note::header::{render_new_note, HeaderError, QuoteNote, QuoteSummary};
use crate::note::slug::{quote_file_name, slugify, NOTE_EXTENSION};
use crate::settings::{Settings, SettingsError};
use crate::vault::{file_name, join_vault_path, DocumentStore, StoreError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Instant, SystemTime};

/// Number of quote characters shown in a browse preview.
pub const BROWSE_PREVIEW_CHARS: usize = 60;

/// Service error for non-fetch quote use-cases.
#[derive(Debug)]
pub enum QuoteServiceError {
    /// No note exists for today's date.
    NoQuoteToday,
    /// Target note has no metadata header.
    MissingHeader(String),
    /// Header could not be parsed or serialized.
    Header(HeaderError),
    /// Rating form input is invalid; nothing was written.
    InvalidRating(RatingInputError),
    /// Host has no editor to insert into.
    NoActiveEditor,
    /// Host editor rejected the insertion.
    Editor(String),
    Store(StoreError),
    Settings(SettingsError),
    Transport(TransportError),
}

impl Display for QuoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoQuoteToday => write!(f, "no quote note exists for today"),
            Self::MissingHeader(path) => write!(f, "note has no metadata header: {path}"),
            Self::Header(err) => write!(f, "{err}"),
            Self::InvalidRating(err) => write!(f, "{err}"),
            Self::NoActiveEditor => write!(f, "no active editor"),
            Self::Editor(message) => write!(f, "editor insertion failed: {message}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Settings(err) => write!(f, "{err}"),
            Self::Transport(err) => write!(f, "{err}"),
        }
    }
}

impl Error for QuoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Header(err) => Some(err),
            Self::InvalidRating(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Settings(err) => Some(err),
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for QuoteServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<HeaderError> for QuoteServiceError {
    fn from(value: HeaderError) -> Self {
        Self::Header(value)
    }
}

impl From<RatingInputError> for QuoteServiceError {
    fn from(value: RatingInputError) -> Self {
        Self::InvalidRating(value)
    }
}

impl From<SettingsError> for QuoteServiceError {
    fn from(value: SettingsError) -> Self {
        Self::Settings(value)
    }
}

impl From<TransportError> for QuoteServiceError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

/// Note written by a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedQuote {
    pub file_name: String,
    /// Vault-relative path of the new note.
    pub path: String,
    pub quote: RemoteQuote,
}

/// Outcome of a fetch that only runs when today's note is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchIfAbsent {
    Created(SavedQuote),
    /// Today's note already exists at this path; nothing was fetched.
    AlreadyPresent(String),
}

/// Data a rating form shows before the user enters scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingForm {
    pub path: String,
    pub quote: String,
    pub author: String,
    pub current: Ratings,
}

/// One saved quote in the browse list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseEntry {
    pub path: String,
    /// File name without `.md`.
    pub title: String,
    pub quote: String,
    pub author: String,
}

impl BrowseEntry {
    /// `<first 60 chars>… — <author>`.
    pub fn preview(&self) -> String {
        let head = self
            .quote
            .chars()
            .take(BROWSE_PREVIEW_CHARS)
            .collect::<String>();
        format!("{head}… — {}", self.author)
    }
}

/// Quote use-case facade over store, transport and clock.
pub struct QuoteService<S: DocumentStore, T: QuoteTransport, C: Clock> {
    store: S,
    transport: T,
    clock: C,
    settings: Settings,
}

impl<S: DocumentStore, T: QuoteTransport, C: Clock> QuoteService<S, T, C> {
    pub fn new(store: S, transport: T, clock: C, settings: Settings) -> Self {
        Self {
            store,
            transport,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Today's date as `YYYY-MM-DD`.
    pub fn today(&self) -> String {
        format_date(self.clock.today())
    }

    /// Startup sequence: ensure the folder, then fetch if today's note is missing.
    pub fn on_load(&self) -> Result<FetchIfAbsent, FetchError> {
        info!(
            "event=plugin_load module=service status=start quotes_folder={}",
            self.settings.quotes_folder
        );
        self.store.ensure_folder(&self.settings.quotes_folder)?;
        self.fetch_if_absent()
    }

    /// Returns the path of today's note, if any.
    pub fn todays_quote_path(&self) -> Result<Option<String>, StoreError> {
        let prefix = join_vault_path(&self.settings.quotes_folder, &format!("{}-", self.today()));
        let matches = self
            .store
            .list_files()?
            .into_iter()
            .filter(|path| path.starts_with(&prefix) && path.ends_with(NOTE_EXTENSION))
            .collect::<Vec<_>>();
        if matches.len() > 1 {
            warn!(
                "event=quote_locate module=service status=duplicate date={} count={}",
                self.today(),
                matches.len()
            );
        }

        let mut newest: Option<(SystemTime, String)> = None;
        for path in matches {
            let created = self.store.created_at(&path)?;
            newest = newest.max(Some((created, path)));
        }
        Ok(newest.map(|(_, path)| path))
    }

    /// Fetches only when today's note is missing.
    pub fn fetch_if_absent(&self) -> Result<FetchIfAbsent, FetchError> {
        if let Some(path) = self.todays_quote_path()? {
            info!("event=quote_fetch module=service status=skipped reason=exists path={path}");
            return Ok(FetchIfAbsent::AlreadyPresent(path));
        }
        self.fetch_and_save().map(FetchIfAbsent::Created)
    }

    /// Fetches one quote and writes it as a new note.
    pub fn fetch_and_save(&self) -> Result<SavedQuote, FetchError> {
        let started_at = Instant::now();
        info!("event=quote_fetch module=service status=start");
        match self.fetch_and_save_inner() {
            Ok(saved) => {
                info!(
                    "event=quote_fetch module=service status=ok duration_ms={} path={}",
                    started_at.elapsed().as_millis(),
                    saved.path
                );
                Ok(saved)
            }
            Err(err) => {
                error!(
                    "event=quote_fetch module=service status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn fetch_and_save_inner(&self) -> Result<SavedQuote, FetchError> {
        let date = self.today();
        let folder = &self.settings.quotes_folder;
        self.store.ensure_folder(folder)?;

        let response = self.transport.get(&self.settings.api_url)?;
        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }
        let quote = parse_quote_response(&response.body)?;

        let file_name = quote_file_name(&date, &quote.id, &slugify(&quote.text));
        let path = join_vault_path(folder, &file_name);
        self.store.create(&path, &render_new_note(&quote, &date))?;

        Ok(SavedQuote {
            file_name,
            path,
            quote,
        })
    }

    fn require_todays_path(&self) -> Result<String, QuoteServiceError> {
        self.todays_quote_path()?
            .ok_or(QuoteServiceError::NoQuoteToday)
    }

    /// Reads today's note for display in a rating form.
    pub fn open_rating(&self) -> Result<RatingForm, QuoteServiceError> {
        let path = self.require_todays_path()?;
        let content = self.store.read(&path)?;
        let summary = QuoteSummary::from_content(&content);
        let current = QuoteNote::parse(&content)
            .map(|note| note.header.ratings())
            .unwrap_or_default();
        Ok(RatingForm {
            path,
            quote: summary.quote,
            author: summary.author,
            current,
        })
    }

    /// Validates `input` and rewrites the rating keys of the note at `path`.
    ///
    /// Blank fields are written as empty values.
    /// The note is re-read here, not taken from the form, so edits made while
    /// the form was open are kept.
    pub fn save_ratings(
        &self,
        path: &str,
        input: &RatingInput,
    ) -> Result<Ratings, QuoteServiceError> {
        let ratings = input.parse()?;
        let content = self.store.read(path)?;
        let mut note = QuoteNote::parse(&content).map_err(|err| match err {
            HeaderError::MissingHeader => QuoteServiceError::MissingHeader(path.to_string()),
            other => QuoteServiceError::Header(other),
        })?;
        note.header.set_ratings(&ratings);
        self.store.modify(path, &note.render()?)?;
        info!(
            "event=quote_rate module=service status=ok path={path} inspiration={} wisdom={} style={} complete={}",
            display_rating(ratings.inspiration),
            display_rating(ratings.wisdom),
            display_rating(ratings.style),
            ratings.is_complete()
        );
        Ok(ratings)
    }

    /// Rates today's note.
    pub fn rate_today(&self, input: &RatingInput) -> Result<Ratings, QuoteServiceError> {
        let path = self.require_todays_path()?;
        self.save_ratings(&path, input)
    }

    /// Markdown block inserted into other notes: `> quote\n>\n> — author\n\n`.
    pub fn insert_markdown(&self) -> Result<String, QuoteServiceError> {
        let path = self.require_todays_path()?;
        let summary = QuoteSummary::from_content(&self.store.read(&path)?);
        Ok(format!("{}\n\n", summary.block_quote()))
    }

    /// Inserts today's quote into the host's active editor.
    pub fn insert_into(
        &self,
        editor: Option<&mut dyn ActiveEditor>,
    ) -> Result<(), QuoteServiceError> {
        let markdown = self.insert_markdown()?;
        let editor = editor.ok_or(QuoteServiceError::NoActiveEditor)?;
        editor
            .replace_selection(&markdown)
            .map_err(QuoteServiceError::Editor)?;
        info!("event=quote_insert module=service status=ok");
        Ok(())
    }

    /// Renders the `qotd` code block for today.
    pub fn render_code_block(&self) -> Result<EmbedBlock, QuoteServiceError> {
        let Some(path) = self.todays_quote_path()? else {
            return Ok(EmbedBlock::Unavailable);
        };
        let summary = QuoteSummary::from_content(&self.store.read(&path)?);
        Ok(EmbedBlock::Quote {
            markdown: summary.block_quote(),
            source_path: path,
        })
    }

    /// Lists saved quotes under the configured folder, newest file name first.
    pub fn browse(&self) -> Result<Vec<BrowseEntry>, QuoteServiceError> {
        let folder_prefix = join_vault_path(&self.settings.quotes_folder, "");
        let mut paths = self
            .store
            .list_files()?
            .into_iter()
            .filter(|path| path.starts_with(&folder_prefix) && path.ends_with(NOTE_EXTENSION))
            .collect::<Vec<_>>();
        paths.sort_by(|a, b| file_name(b).cmp(file_name(a)).then_with(|| a.cmp(b)));

        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            let summary = QuoteSummary::from_content(&self.store.read(&path)?);
            let name = file_name(&path);
            entries.push(BrowseEntry {
                title: name.strip_suffix(NOTE_EXTENSION).unwrap_or(name).to_string(),
                quote: summary.quote,
                author: summary.author,
                path,
            });
        }
        info!(
            "event=quote_browse module=service status=ok entry_count={}",
            entries.len()
        );
        Ok(entries)
    }
}

fn display_rating(rating: Option<Rating>) -> String {
    rating.map(|value| value.to_string()).unwrap_or_default()
}
