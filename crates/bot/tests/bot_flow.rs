//! End-to-end flow over an in-process channel: messages go through the
//! dispatch loop, handlers mutate the wardrobe, replies come back out.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use fitcheck_bot::{dispatch, BotHandler};
use fitcheck_core::channel::{Channel, ChannelId, ChannelMessage};
use fitcheck_core::error::{ChannelError, SuggestError};
use fitcheck_core::repository::WardrobeRepository;
use fitcheck_core::suggest::{OutfitSuggester, SuggestionRequest};
use fitcheck_store::InMemoryRepository;
use fitcheck_wardrobe::Wardrobe;
use tokio::sync::{mpsc, Mutex};

struct StubSuggester;

#[async_trait]
impl OutfitSuggester for StubSuggester {
    fn name(&self) -> &str {
        "stub"
    }
    async fn suggest(&self, request: SuggestionRequest) -> Result<String, SuggestError> {
        Ok(format!("Outfit para: {}", request.request))
    }
}

/// An in-process channel: the test injects messages and reads replies.
struct FakeChannel {
    channel_id: ChannelId,
    allowed: Vec<String>,
    incoming: Mutex<Option<mpsc::Receiver<Result<ChannelMessage, ChannelError>>>>,
    sent: Mutex<Vec<(String, String)>>,
}

impl FakeChannel {
    fn new(allowed: Vec<String>) -> (Arc<Self>, mpsc::Sender<Result<ChannelMessage, ChannelError>>) {
        let (tx, rx) = mpsc::channel(16);
        let channel = Arc::new(Self {
            channel_id: ChannelId("fake".into()),
            allowed,
            incoming: Mutex::new(Some(rx)),
            sent: Mutex::new(Vec::new()),
        });
        (channel, tx)
    }

    async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Channel for FakeChannel {
    fn name(&self) -> &str {
        "fake"
    }

    fn id(&self) -> &ChannelId {
        &self.channel_id
    }

    async fn start(
        &self,
    ) -> Result<mpsc::Receiver<Result<ChannelMessage, ChannelError>>, ChannelError> {
        self.incoming
            .lock()
            .await
            .take()
            .ok_or_else(|| ChannelError::ConnectionLost("already started".into()))
    }

    async fn send(&self, chat_id: &str, text: &str) -> Result<(), ChannelError> {
        self.sent
            .lock()
            .await
            .push((chat_id.to_string(), text.to_string()));
        Ok(())
    }

    fn is_allowed(&self, sender_id: &str) -> bool {
        self.allowed.iter().any(|u| u == "*" || u == sender_id)
    }
}

fn message(sender_id: &str, chat_id: &str, text: &str) -> Result<ChannelMessage, ChannelError> {
    Ok(ChannelMessage {
        channel_id: ChannelId("fake".into()),
        sender_id: sender_id.into(),
        sender_name: Some("Ana".into()),
        text: text.into(),
        chat_id: chat_id.into(),
    })
}

async fn build_handler() -> (Arc<BotHandler>, Arc<InMemoryRepository>) {
    let repo = Arc::new(InMemoryRepository::new());
    let categories = ["calzado", "tops", "capas"]
        .into_iter()
        .map(String::from)
        .collect();
    let wardrobe = Arc::new(Wardrobe::open(categories, repo.clone()).await.unwrap());
    let handler = Arc::new(BotHandler::new(
        wardrobe,
        Arc::new(StubSuggester),
        None,
        -6,
    ));
    (handler, repo)
}

#[tokio::test]
async fn full_conversation_through_the_dispatch_loop() {
    let (handler, repo) = build_handler().await;
    let (channel, tx) = FakeChannel::new(vec!["42".into()]);

    let loop_task = tokio::spawn(dispatch::run(handler, channel.clone()));

    tx.send(message("42", "42", "/add calzado: botas negras")).await.unwrap();
    tx.send(message("42", "42", "/dirty botas")).await.unwrap();
    tx.send(message("42", "42", "voy a un concierto")).await.unwrap();
    drop(tx); // close the channel, ending the loop

    loop_task.await.unwrap().unwrap();

    let sent = channel.sent().await;
    assert_eq!(sent.len(), 3);
    assert!(sent[0].1.contains("botas negras"));
    assert!(sent[1].1.contains("sucia"));
    assert_eq!(sent[2].1, "Outfit para: voy a un concierto");

    // The wardrobe mutations were persisted along the way.
    let state = repo.load().await.unwrap();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.history.len(), 1);
}

#[tokio::test]
async fn unauthorized_senders_get_no_reply() {
    let (handler, repo) = build_handler().await;
    let (channel, tx) = FakeChannel::new(vec!["42".into()]);

    let loop_task = tokio::spawn(dispatch::run(handler, channel.clone()));

    tx.send(message("666", "666", "/add calzado: botas robadas")).await.unwrap();
    tx.send(message("42", "42", "/closet")).await.unwrap();
    drop(tx);

    loop_task.await.unwrap().unwrap();

    let sent = channel.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "42");

    // The intruder's message had no effect.
    assert!(repo.load().await.unwrap().items.is_empty());
}

#[tokio::test]
async fn channel_errors_do_not_stop_the_loop() {
    let (handler, _) = build_handler().await;
    let (channel, tx) = FakeChannel::new(vec!["*".into()]);

    let loop_task = tokio::spawn(dispatch::run(handler, channel.clone()));

    tx.send(Err(ChannelError::ConnectionLost("blip".into()))).await.unwrap();
    tx.send(message("1", "1", "/start")).await.unwrap();
    drop(tx);

    loop_task.await.unwrap().unwrap();

    let sent = channel.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.contains("fitcheck"));
}

#[tokio::test]
async fn bulk_capture_works_across_the_loop() {
    let (handler, repo) = build_handler().await;
    let (channel, tx) = FakeChannel::new(vec!["*".into()]);

    let loop_task = tokio::spawn(dispatch::run(handler, channel.clone()));

    tx.send(message("42", "42", "/bulk")).await.unwrap();
    tx.send(message("42", "42", "calzado: botas\ntops: playera | color: negro"))
        .await
        .unwrap();
    drop(tx);

    loop_task.await.unwrap().unwrap();

    let sent = channel.sent().await;
    assert_eq!(sent.len(), 2);
    assert!(sent[1].1.contains("2 prendas agregadas"));

    let state = repo.load().await.unwrap();
    assert_eq!(state.items.len(), 2);
    let shirt = state.items.values().find(|i| i.name == "playera").unwrap();
    assert_eq!(
        shirt.details,
        BTreeMap::from([("color".to_string(), "negro".to_string())])
    );
}
