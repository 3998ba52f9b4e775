use gemini_chat::client::session::FALLBACK_REPLY;
use gemini_chat::client::{
    ChatSession, Conversation, ConversationStore, MemoryStore, Message, RelayApi,
    RelayClientError, Submission,
};

use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct MockRelay {
    reply: Option<String>,
    calls: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl MockRelay {
    fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Default::default()
        }
    }

    fn failing() -> Self {
        Self::default()
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RelayApi for MockRelay {
    async fn generate(&self, prompt: &str, model: Option<&str>) -> Result<String, RelayClientError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), model.map(str::to_string)));
        self.reply.clone().ok_or(RelayClientError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Failed to generate content".to_string(),
        })
    }
}

fn stored(store: &MemoryStore) -> Conversation {
    serde_json::from_str(&store.raw().expect("entry should be stored")).unwrap()
}

#[tokio::test]
async fn test_prompt_and_reply_are_appended() {
    let store = MemoryStore::new();
    let relay = MockRelay::replying("hi there");
    let mut session = ChatSession::open(store.clone(), relay.clone(), Some("gemini-2.0-flash".into()));

    session.set_input("hello");
    assert_eq!(session.submit().await, Submission::Replied);

    assert_eq!(
        session.messages(),
        &[Message::user("hello"), Message::assistant("hi there")]
    );
    assert_eq!(session.input(), "");
    assert!(!session.is_loading());
    assert_eq!(
        relay.calls.lock().unwrap().clone(),
        vec![("hello".to_string(), Some("gemini-2.0-flash".to_string()))]
    );
    assert_eq!(&stored(&store), session.conversation());
}

#[tokio::test]
async fn test_relay_failure_appends_fallback() {
    let store = MemoryStore::new();
    let mut session = ChatSession::open(store.clone(), MockRelay::failing(), None);

    session.set_input("hello");
    assert_eq!(session.submit().await, Submission::Failed);

    assert_eq!(session.messages().len(), 2);
    assert_eq!(session.messages()[1], Message::assistant(FALLBACK_REPLY));
    assert_eq!(FALLBACK_REPLY, "Something went wrong.");
    assert!(!session.is_loading());
    assert_eq!(&stored(&store), session.conversation());
}

#[tokio::test]
async fn test_blank_input_is_ignored() {
    let store = MemoryStore::new();
    let relay = MockRelay::replying("unused");
    let mut session = ChatSession::open(store.clone(), relay.clone(), None);

    for input in ["", "   ", "\n\t"] {
        session.set_input(input);
        assert_eq!(session.submit().await, Submission::Ignored);
    }

    assert!(session.messages().is_empty());
    assert_eq!(relay.call_count(), 0);
    assert!(store.raw().is_none());
}

#[test]
fn test_loading_state_blocks_second_submission() {
    let store = MemoryStore::new();
    let mut session = ChatSession::open(store.clone(), MockRelay::replying("x"), None);

    session.set_input("first");
    assert_eq!(session.begin_submit().as_deref(), Some("first"));
    assert!(session.is_loading());
    // The user message is persisted before the reply arrives.
    assert_eq!(stored(&store).messages(), &[Message::user("first")]);

    session.set_input("second");
    assert_eq!(session.begin_submit(), None);
    assert_eq!(session.input(), "second");

    assert_eq!(session.complete(Ok("reply".into())), Submission::Replied);
    assert!(!session.is_loading());
    assert_eq!(stored(&store).len(), 2);
}

#[tokio::test]
async fn test_reset_clears_memory_and_storage() {
    let store = MemoryStore::new();
    let mut session = ChatSession::open(store.clone(), MockRelay::replying("hi"), None);

    session.set_input("hello");
    session.submit().await;
    assert!(store.raw().is_some());

    session.reset();

    assert!(session.messages().is_empty());
    assert!(store.raw().is_none());
    assert!(store.load().unwrap().is_empty());
}

#[tokio::test]
async fn test_history_is_restored_on_open() {
    let store = MemoryStore::new();
    {
        let mut session = ChatSession::open(store.clone(), MockRelay::replying("hi there"), None);
        session.set_input("hello");
        session.submit().await;
    }

    let session = ChatSession::open(store, MockRelay::failing(), None);
    assert_eq!(
        session.messages(),
        &[Message::user("hello"), Message::assistant("hi there")]
    );
}

#[test]
fn test_unreadable_history_starts_empty() {
    let store = MemoryStore::with_entry("{not json");
    let session = ChatSession::open(store, MockRelay::failing(), None);
    assert!(session.messages().is_empty());
}

#[tokio::test]
async fn test_storage_mirrors_memory_after_every_change() {
    let store = MemoryStore::new();
    let mut session = ChatSession::open(store.clone(), MockRelay::replying("ok"), None);

    for prompt in ["one", "two", "three"] {
        session.set_input(prompt);
        session.submit().await;
        assert_eq!(&stored(&store), session.conversation());
    }
    assert_eq!(session.messages().len(), 6);
}
