//! End-to-end session flows against a real profile directory.

use sigform::api::{SaveStatus, SignatureSession, TextSession};
use sigform::gateway::FsGateway;
use sigform::model::{AccountFilter, FixedText, Signature};
use sigform::render::PlainRenderer;
use tempfile::TempDir;

fn setup() -> (TempDir, TextSession<FsGateway, PlainRenderer>) {
    let dir = TempDir::new().unwrap();
    let session = TextSession::new(
        FsGateway::new(dir.path()),
        PlainRenderer::new(),
        Vec::new(),
    );
    (dir, session)
}

fn signature_setup(dir: &TempDir) -> SignatureSession<FsGateway, PlainRenderer> {
    SignatureSession::new(
        FsGateway::new(dir.path()),
        PlainRenderer::new(),
        vec!["personal".to_string(), "work".to_string()],
    )
}

#[test]
fn first_run_edits_and_persists() {
    let (dir, mut session) = setup();

    let view = session.load();
    assert_eq!(view, "No texts.\n");

    session.create().unwrap();
    session
        .commit_edit(FixedText::new("Greeting", "Hello,\n"))
        .unwrap();
    session.create().unwrap();
    session
        .commit_edit(FixedText::new("Farewell", "Bye,\n"))
        .unwrap();
    assert_eq!(session.save(|_| true).unwrap(), SaveStatus::Saved);

    // A fresh session sees exactly what was saved.
    let mut reopened = TextSession::new(
        FsGateway::new(dir.path()),
        PlainRenderer::new(),
        Vec::new(),
    );
    let view = reopened.load();
    assert!(view.contains("1. Greeting"));
    assert!(view.contains("2. Farewell"));
    assert_eq!(reopened.store().get(1).unwrap().body, "Hello,\n");
}

#[test]
fn saved_file_carries_the_declaration() {
    let (dir, mut session) = setup();
    session.load();
    session.create().unwrap();
    session.commit_edit(FixedText::new("a", "x")).unwrap();
    session.save(|_| true).unwrap();

    let contents = std::fs::read_to_string(dir.path().join("texts.xml")).unwrap();
    assert!(contents.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(contents.contains("<texts>"));
}

#[test]
fn declined_save_keeps_the_old_file() {
    let (dir, mut session) = setup();
    let path = dir.path().join("texts.xml");
    std::fs::write(&path, "<texts><text name=\"keep\">me</text></texts>").unwrap();

    session.load();
    session.remove(1).unwrap();
    assert_eq!(session.save(|_| false).unwrap(), SaveStatus::Declined);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("keep"));
}

#[test]
fn reload_restores_the_persisted_document() {
    let (dir, mut session) = setup();
    std::fs::write(
        dir.path().join("texts.xml"),
        "<texts><text name=\"a\">1</text><text name=\"b\">2</text></texts>",
    )
    .unwrap();

    session.load();
    session.remove(2).unwrap();
    session.down(1).unwrap();
    assert_eq!(session.store().len(), 1);

    let view = session.reload(|_| true).unwrap();
    assert!(view.contains("1. a"));
    assert!(view.contains("2. b"));
}

#[test]
fn hand_written_document_loads() {
    let (dir, mut session) = setup();
    std::fs::write(
        dir.path().join("texts.xml"),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<texts>\n  <text name=\"Thanks\">Thank you for your mail.\n</text>\n</texts>\n",
    )
    .unwrap();

    session.load();
    assert_eq!(session.store().len(), 1);
    assert_eq!(
        session.store().get(1).unwrap().body,
        "Thank you for your mail.\n"
    );
}

#[test]
fn garbage_document_starts_empty_and_is_replaceable() {
    let (dir, mut session) = setup();
    let path = dir.path().join("texts.xml");
    std::fs::write(&path, "<texts><bogus/></texts>").unwrap();

    let view = session.load();
    assert_eq!(view, "No texts.\n");

    session.create().unwrap();
    session.commit_edit(FixedText::new("fresh", "start")).unwrap();
    session.save(|_| true).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("fresh"));
    assert!(!contents.contains("bogus"));
}

#[test]
fn signatures_round_trip_with_filters() {
    let dir = TempDir::new().unwrap();
    let mut session = signature_setup(&dir);
    session.load();

    session.create().unwrap();
    session
        .commit_edit(
            Signature::new("Work", "Regards,\nAlex\n")
                .with_account(AccountFilter::Account("work".to_string()))
                .with_default(true),
        )
        .unwrap();
    session.create().unwrap();
    session
        .commit_edit(
            Signature::new("Lists", "-- \n")
                .with_account(AccountFilter::Pattern("(news|lists)-.*".to_string())),
        )
        .unwrap();
    session.save(|_| true).unwrap();

    let mut reopened = signature_setup(&dir);
    reopened.load();
    let store = reopened.store();
    assert_eq!(
        store.get(1).unwrap().account,
        AccountFilter::Account("work".to_string())
    );
    assert!(store.get(1).unwrap().is_default);
    assert_eq!(
        store.get(2).unwrap().account,
        AccountFilter::Pattern("(news|lists)-.*".to_string())
    );

    // Query helpers work on the reloaded store.
    assert_eq!(store.default_for("work").unwrap().name, "Work");
    assert_eq!(store.matching("news-rust").len(), 1);
    assert!(store.find("lists-dev", "Lists").is_some());
}

#[test]
fn each_document_kind_keeps_its_own_file() {
    let dir = TempDir::new().unwrap();

    let mut texts = TextSession::new(
        FsGateway::new(dir.path()),
        PlainRenderer::new(),
        Vec::new(),
    );
    texts.load();
    texts.create().unwrap();
    texts.commit_edit(FixedText::new("Greeting", "Hi")).unwrap();
    texts.save(|_| true).unwrap();

    let mut signatures = signature_setup(&dir);
    signatures.load();
    signatures.create().unwrap();
    signatures
        .commit_edit(Signature::new("Work", "Regards"))
        .unwrap();
    signatures.save(|_| true).unwrap();

    assert!(dir.path().join("texts.xml").exists());
    assert!(dir.path().join("signatures.xml").exists());
    let texts_doc = std::fs::read_to_string(dir.path().join("texts.xml")).unwrap();
    assert!(!texts_doc.contains("Work"));
}
