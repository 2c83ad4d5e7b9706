use serde_json::json;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jujuchat::commands::chat::ChatSession;
use jujuchat::config::Config;
use jujuchat::providers::GroqProvider;
use jujuchat::reveal::RevealSink;
use jujuchat::storage::SnapshotStorage;
use jujuchat::store::{ConversationStore, Sender};

struct NullSink;

impl RevealSink for NullSink {
    fn emit(&mut self, _chunk: &str) {}
}

fn session_against(server: &MockServer, dir: &tempfile::TempDir) -> ChatSession {
    let mut config = Config::default();
    config.provider.groq.api_base = server.uri();
    config.chat.reveal_delay_ms = 0;

    let storage = SnapshotStorage::new_with_path(dir.path().join("snapshot.db")).unwrap();
    let provider =
        GroqProvider::new(config.provider.groq.clone(), "gsk_test".to_string()).unwrap();
    ChatSession::new(config, storage, Box::new(provider))
}

async fn mount_reply(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Submitting "Halo" to a fresh session retitles the default conversation and
/// leaves one user and one assistant message, in order
#[tokio::test]
async fn test_halo_scenario() {
    let server = MockServer::start().await;
    mount_reply(&server, "Halo juga! Ada yang bisa saya bantu?").await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_against(&server, &dir);
    let mut sink = NullSink;

    session.submit("Halo", &mut sink).await.unwrap();

    let active = session.store().active();
    assert_eq!(active.title, "Halo");
    assert_eq!(active.messages.len(), 2);
    assert_eq!(active.messages[0].sender, Sender::User);
    assert_eq!(active.messages[0].text, "Halo");
    assert_eq!(active.messages[1].sender, Sender::Assistant);
    assert_eq!(
        active.messages[1].text,
        "Halo juga! Ada yang bisa saya bantu?"
    );

    // Both turns survive a reload from the snapshot.
    let storage = SnapshotStorage::new_with_path(dir.path().join("snapshot.db")).unwrap();
    let reloaded = ConversationStore::load(&storage);
    assert_eq!(reloaded.active().messages.len(), 2);
    assert_eq!(reloaded.active().title, "Halo");
}

/// Input over the character limit is rejected with no state mutation and no
/// network call
#[tokio::test]
async fn test_over_limit_input_makes_no_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_against(&server, &dir);
    let mut sink = NullSink;

    let over_limit = "a".repeat(1001);
    let result = session.submit(&over_limit, &mut sink).await;
    assert!(result.is_err());
    assert!(session.store().active().messages.is_empty());
    assert!(session.store().active().has_placeholder_title());
}

/// Input exactly at the character limit goes through
#[tokio::test]
async fn test_input_at_limit_is_accepted() {
    let server = MockServer::start().await;
    mount_reply(&server, "that was long").await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_against(&server, &dir);
    let mut sink = NullSink;

    let at_limit = "a".repeat(1000);
    session.submit(&at_limit, &mut sink).await.unwrap();
    assert_eq!(session.store().active().messages.len(), 2);
}

/// A sixth attachment is rejected at staging time, before any network call
#[tokio::test]
async fn test_sixth_attachment_rejected_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_against(&server, &dir);

    for i in 0..5 {
        let file = dir.path().join(format!("f{}.txt", i));
        std::fs::write(&file, "x").unwrap();
        session.attach(file.to_str().unwrap()).unwrap();
    }

    let sixth = dir.path().join("f5.txt");
    std::fs::write(&sixth, "x").unwrap();
    let result = session.attach(sixth.to_str().unwrap());
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("5"));
    assert_eq!(session.staged().len(), 5);
}

/// A provider failure leaves exactly one unanswered user turn, persisted
#[tokio::test]
async fn test_provider_error_leaves_unanswered_user_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_against(&server, &dir);
    let mut sink = NullSink;

    let result = session.submit("Halo", &mut sink).await;
    assert!(result.is_err());

    let active = session.store().active();
    assert_eq!(active.messages.len(), 1);
    assert_eq!(active.messages[0].sender, Sender::User);
    assert_eq!(active.title, "Halo");

    let storage = SnapshotStorage::new_with_path(dir.path().join("snapshot.db")).unwrap();
    let reloaded = ConversationStore::load(&storage);
    assert_eq!(reloaded.active().messages.len(), 1);
}

/// The attachment appendix reaches the completion endpoint ahead of the question
#[tokio::test]
async fn test_attachment_contents_reach_the_endpoint() {
    let server = MockServer::start().await;
    mount_reply(&server, "your notes say: remember the milk").await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_against(&server, &dir);
    let mut sink = NullSink;

    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "remember the milk").unwrap();
    session.attach(file.to_str().unwrap()).unwrap();

    session
        .submit("what do my notes say?", &mut sink)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let last_turn = body["messages"]
        .as_array()
        .unwrap()
        .last()
        .unwrap()["content"]
        .as_str()
        .unwrap();
    assert!(last_turn.contains("remember the milk"));
    assert!(last_turn.contains("what do my notes say?"));
    let appendix = last_turn.find("remember the milk").unwrap();
    let question = last_turn.find("what do my notes say?").unwrap();
    assert!(appendix < question);
}
