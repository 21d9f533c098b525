use chrono::NaiveDate;
use qotd_core::{
    DocumentStore, FetchError, FetchIfAbsent, FixedClock, FsVault, HttpResponse, QuoteNote,
    QuoteService, QuoteTransport, Settings, TransportError,
};
use std::cell::Cell;
use tempfile::TempDir;

const QUOTE_BODY: &str =
    r#"{"id": 42, "text": "The only way to do great work is to love what you do.", "author": "Steve Jobs"}"#;

struct ScriptedTransport {
    reply: Result<HttpResponse, TransportError>,
    calls: Cell<usize>,
}

impl ScriptedTransport {
    fn ok(body: &str) -> Self {
        Self::reply(Ok(HttpResponse::new(200, body)))
    }

    fn reply(reply: Result<HttpResponse, TransportError>) -> Self {
        Self {
            reply,
            calls: Cell::new(0),
        }
    }
}

impl QuoteTransport for ScriptedTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        assert_eq!(url, "https://quotes.test/random");
        self.calls.set(self.calls.get() + 1);
        self.reply.clone()
    }
}

fn service(
    dir: &TempDir,
    transport: ScriptedTransport,
) -> QuoteService<FsVault, ScriptedTransport, FixedClock> {
    let date = NaiveDate::from_ymd_opt(2024, 1, 5).expect("valid date");
    let settings = Settings {
        quotes_folder: "Quotes".to_string(),
        api_url: "https://quotes.test/random".to_string(),
    };
    QuoteService::new(
        FsVault::new(dir.path()),
        transport,
        FixedClock(date),
        settings,
    )
}

fn header_keys(content: &str) -> Vec<&str> {
    content
        .lines()
        .skip(1)
        .take_while(|line| *line != "---")
        .filter_map(|line| line.split_once(':').map(|(key, _)| key))
        .collect()
}

fn quote_files(dir: &TempDir) -> Vec<String> {
    FsVault::new(dir.path())
        .list_files()
        .expect("list vault files")
}

#[test]
fn fetch_writes_note_with_header_and_empty_ratings() {
    let dir = tempfile::tempdir().expect("create temp vault");
    let service = service(&dir, ScriptedTransport::ok(QUOTE_BODY));

    let saved = service.fetch_and_save().expect("fetch succeeds");
    assert_eq!(
        saved.file_name,
        "2024-01-05-42-the-only-way-to-do-great-work.md"
    );
    assert_eq!(
        saved.path,
        "Quotes/2024-01-05-42-the-only-way-to-do-great-work.md"
    );

    let content = service.store().read(&saved.path).expect("read new note");
    let note = QuoteNote::parse(&content).expect("note has a header");
    assert_eq!(
        note.header.quote(),
        "The only way to do great work is to love what you do."
    );
    assert_eq!(note.header.author(), "Steve Jobs");
    assert_eq!(note.header.date_added().as_deref(), Some("2024-01-05"));
    assert_eq!(
        header_keys(&content),
        vec!["quote", "author", "date_added", "inspiration", "wisdom", "style"]
    );
    assert!(!note.header.ratings().is_complete());
}

#[test]
fn quotes_with_yaml_special_characters_survive_the_header() {
    let dir = tempfile::tempdir().expect("create temp vault");
    let body = r#"{"_id": "a/b", "text": "Say \"no\": it's # fine", "author": "O'Neil"}"#;
    let service = service(&dir, ScriptedTransport::ok(body));

    let saved = service.fetch_and_save().expect("fetch succeeds");
    assert!(saved.file_name.starts_with("2024-01-05-a-b-say-no"));

    let content = service.store().read(&saved.path).expect("read new note");
    let note = QuoteNote::parse(&content).expect("note has a header");
    assert_eq!(note.header.quote(), "Say \"no\": it's # fine");
    assert_eq!(note.header.author(), "O'Neil");
}

#[test]
fn non_success_status_creates_no_note() {
    let dir = tempfile::tempdir().expect("create temp vault");
    let service = service(
        &dir,
        ScriptedTransport::reply(Ok(HttpResponse::new(500, "boom"))),
    );

    let err = service.fetch_and_save().expect_err("500 must fail");
    assert!(matches!(err, FetchError::Status(500)));
    assert!(quote_files(&dir).is_empty());
}

#[test]
fn invalid_json_carries_raw_body() {
    let dir = tempfile::tempdir().expect("create temp vault");
    let service = service(&dir, ScriptedTransport::ok("<html>down</html>"));

    match service.fetch_and_save() {
        Err(FetchError::InvalidJson { raw }) => assert_eq!(raw, "<html>down</html>"),
        other => panic!("expected invalid json, got {other:?}"),
    }
    assert!(quote_files(&dir).is_empty());
}

#[test]
fn unexpected_shape_carries_pretty_json() {
    let dir = tempfile::tempdir().expect("create temp vault");
    let service = service(&dir, ScriptedTransport::ok(r#"{"text": "no author", "id": 1}"#));

    match service.fetch_and_save() {
        Err(FetchError::UnexpectedShape { pretty }) => {
            assert!(pretty.contains("\"text\": \"no author\""));
            assert!(pretty.contains('\n'));
        }
        other => panic!("expected unexpected shape, got {other:?}"),
    }
    assert!(quote_files(&dir).is_empty());
}

#[test]
fn network_failure_is_classified() {
    let dir = tempfile::tempdir().expect("create temp vault");
    let service = service(
        &dir,
        ScriptedTransport::reply(Err(TransportError::network("connection refused"))),
    );

    let err = service.fetch_and_save().expect_err("network failure");
    assert_eq!(err.code(), "network");
    assert!(quote_files(&dir).is_empty());
}

#[test]
fn fetch_if_absent_skips_transport_when_today_exists() {
    let dir = tempfile::tempdir().expect("create temp vault");
    let service = service(&dir, ScriptedTransport::ok(QUOTE_BODY));

    let first = service.on_load().expect("startup fetch");
    let FetchIfAbsent::Created(saved) = first else {
        panic!("first startup must create a note");
    };

    let second = service.fetch_if_absent().expect("second fetch");
    assert_eq!(second, FetchIfAbsent::AlreadyPresent(saved.path));
    assert_eq!(quote_files(&dir).len(), 1);
}

#[test]
fn fetch_alternative_adds_second_note_for_same_day() {
    let dir = tempfile::tempdir().expect("create temp vault");
    let service = service(
        &dir,
        ScriptedTransport::ok(r#"{"id": 7, "text": "Second thoughts.", "author": "Ann"}"#),
    );
    service
        .store()
        .ensure_folder("Quotes")
        .expect("create quotes folder");
    service
        .store()
        .create("Quotes/2024-01-05-1-first.md", "---\nquote: \"First\"\n---\n")
        .expect("seed note");

    let saved = service.fetch_and_save().expect("alternative fetch");
    assert_eq!(saved.path, "Quotes/2024-01-05-7-second-thoughts.md");
    assert_eq!(
        service.todays_quote_path().expect("locate today"),
        Some("Quotes/2024-01-05-7-second-thoughts.md".to_string())
    );
}

#[test]
fn fetch_alternative_wins_even_when_its_id_sorts_lower() {
    let dir = tempfile::tempdir().expect("create temp vault");
    let service = service(
        &dir,
        ScriptedTransport::ok(r#"{"id": 100, "text": "Fresh start.", "author": "Kim"}"#),
    );
    service
        .store()
        .ensure_folder("Quotes")
        .expect("create quotes folder");
    service
        .store()
        .create(
            "Quotes/2024-01-05-42-old.md",
            "---\nquote: \"Old words.\"\nauthor: \"Lee\"\n---\n",
        )
        .expect("seed note");

    let saved = service.fetch_and_save().expect("alternative fetch");
    assert_eq!(saved.path, "Quotes/2024-01-05-100-fresh-start.md");
    assert_eq!(
        service.todays_quote_path().expect("locate today"),
        Some(saved.path)
    );
    assert_eq!(
        service.insert_markdown().expect("insert markdown"),
        "> Fresh start.\n>\n> — Kim\n\n"
    );
}

#[test]
fn refetching_identical_quote_same_day_reports_existing_file() {
    let dir = tempfile::tempdir().expect("create temp vault");
    let service = service(&dir, ScriptedTransport::ok(QUOTE_BODY));

    service.fetch_and_save().expect("first fetch");
    let err = service.fetch_and_save().expect_err("same file name");
    assert_eq!(err.code(), "store");
}
