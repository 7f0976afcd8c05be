use async_trait::async_trait;
use barista_agent::{
    BaristaAgent, OrderStore, ORDER_ALREADY_PLACED, ORDER_VISUALIZATION_TOPIC,
};
use barista_types::OrderRecord;
use barista_voice::{DataPublisher, VoiceError};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Forwards every publish to a channel, stamped with the (virtual) time.
struct RecordingPublisher {
    tx: mpsc::UnboundedSender<(Instant, String, Vec<u8>)>,
}

#[async_trait]
impl DataPublisher for RecordingPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), VoiceError> {
        let _ = self.tx.send((Instant::now(), topic.to_string(), payload));
        Ok(())
    }
}

/// Counts attempts and always fails.
struct FailingPublisher {
    attempts: Arc<AtomicUsize>,
}

#[async_trait]
impl DataPublisher for FailingPublisher {
    async fn publish(&self, _topic: &str, _payload: Vec<u8>) -> Result<(), VoiceError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(VoiceError::Publish("room is gone".to_string()))
    }
}

fn fill_order(agent: &mut BaristaAgent) {
    agent.set_drink_type("latte");
    agent.set_size("medium");
    agent.set_milk("oat milk");
    agent.add_extra("vanilla syrup");
    agent.set_customer_name("Jamie");
}

fn order_files(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
        Err(_) => Vec::new(),
    }
}

#[tokio::test]
async fn complete_order_is_written_and_summarized() {
    let temp = tempfile::tempdir().unwrap();
    let orders_dir = temp.path().join("orders");
    let mut agent = BaristaAgent::new(OrderStore::new(&orders_dir));
    fill_order(&mut agent);

    let reply = agent.save_order().await.expect("save should succeed");

    for expected in ["medium", "latte", "oat milk", "vanilla syrup", "Jamie"] {
        assert!(reply.contains(expected), "{expected:?} missing from {reply:?}");
    }
    assert_eq!(
        reply,
        "Perfect! Your order has been saved successfully. Order summary: medium latte with oat milk, extras: vanilla syrup, for Jamie. Your delicious coffee will be ready shortly!"
    );
    assert!(agent.is_finalized());

    let files = order_files(&orders_dir);
    assert_eq!(files.len(), 1);
    let file_name = files[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("Jamie_"), "got {file_name}");
    assert!(file_name.ends_with(".json"), "got {file_name}");
    // Jamie_ + YYYYMMDD_HHMMSS + .json
    assert_eq!(file_name.len(), "Jamie_".len() + 15 + ".json".len());

    let contents: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
    assert_eq!(
        contents,
        json!({
            "drinkType": "latte",
            "size": "medium",
            "milk": "oat milk",
            "extras": ["vanilla syrup"],
            "name": "Jamie"
        })
    );
}

#[tokio::test]
async fn summary_says_none_without_extras() {
    let temp = tempfile::tempdir().unwrap();
    let mut agent = BaristaAgent::new(OrderStore::new(temp.path()));
    agent.set_drink_type("Espresso");
    agent.set_size("Small");
    agent.set_milk("no milk");
    agent.set_customer_name("Sam");

    let reply = agent.save_order().await.unwrap();
    assert!(reply.contains("small espresso with no milk, extras: none, for Sam."));

    let record: OrderRecord = serde_json::from_str(
        &std::fs::read_to_string(&order_files(temp.path())[0]).unwrap(),
    )
    .unwrap();
    assert!(record.extras.is_empty());
}

#[tokio::test]
async fn incomplete_orders_never_touch_the_filesystem() {
    let temp = tempfile::tempdir().unwrap();
    let orders_dir = temp.path().join("orders");
    let mut agent = BaristaAgent::new(OrderStore::new(&orders_dir));

    let reply = agent.save_order().await.unwrap();
    assert_eq!(
        reply,
        "Cannot save order yet. Still need: drink type, size, milk type, customer name"
    );

    agent.set_drink_type("mocha");
    agent.set_milk("whole milk");
    agent.add_extra("whipped cream");
    let reply = agent.save_order().await.unwrap();
    assert_eq!(reply, "Cannot save order yet. Still need: size, customer name");

    agent.set_size("gigantic");
    agent.set_customer_name("Lee");
    let reply = agent.save_order().await.unwrap();
    assert_eq!(reply, "Cannot save order yet. Still need: size");

    assert!(!orders_dir.exists(), "no directory should be created");
    assert!(!agent.is_finalized());
}

#[tokio::test]
async fn write_failure_propagates_to_caller() {
    let temp = tempfile::tempdir().unwrap();
    let blocker = temp.path().join("orders");
    std::fs::write(&blocker, "this is a file").unwrap();

    let mut agent = BaristaAgent::new(OrderStore::new(&blocker));
    fill_order(&mut agent);

    let result = agent.save_order().await;
    assert!(result.is_err(), "got {:?}", result);
    assert!(!agent.is_finalized());
}

#[tokio::test]
async fn finalized_order_is_terminal() {
    let temp = tempfile::tempdir().unwrap();
    let mut agent = BaristaAgent::new(OrderStore::new(temp.path()));
    fill_order(&mut agent);
    agent.save_order().await.unwrap();

    assert_eq!(agent.set_size("large"), ORDER_ALREADY_PLACED);
    assert_eq!(agent.add_extra("extra shot"), ORDER_ALREADY_PLACED);
    assert_eq!(agent.save_order().await.unwrap(), ORDER_ALREADY_PLACED);

    assert_eq!(agent.order().extras(), ["vanilla syrup"]);
    assert_eq!(order_files(temp.path()).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn receipt_is_published_after_the_delay() {
    let temp = tempfile::tempdir().unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut agent = BaristaAgent::new(OrderStore::new(temp.path()))
        .with_publisher(Arc::new(RecordingPublisher { tx }));
    fill_order(&mut agent);

    agent.save_order().await.unwrap();
    let returned_at = Instant::now();

    tokio::time::sleep(Duration::from_secs(17)).await;
    assert!(rx.try_recv().is_err(), "published before the delay elapsed");

    let (published_at, topic, payload) = rx.recv().await.expect("receipt should be published");
    assert!(published_at - returned_at >= Duration::from_secs(18));
    assert_eq!(topic, ORDER_VISUALIZATION_TOPIC);

    let html = String::from_utf8(payload).expect("payload should be UTF-8");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Vanilla Syrup"));
    assert!(html.contains("Jamie"));
}

#[tokio::test(start_paused = true)]
async fn custom_delay_is_honoured() {
    let temp = tempfile::tempdir().unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut agent = BaristaAgent::new(OrderStore::new(temp.path()))
        .with_publisher(Arc::new(RecordingPublisher { tx }))
        .with_publish_delay(Duration::from_secs(3));
    fill_order(&mut agent);

    agent.save_order().await.unwrap();
    let returned_at = Instant::now();

    let (published_at, _, _) = rx.recv().await.unwrap();
    let elapsed = published_at - returned_at;
    assert!(elapsed >= Duration::from_secs(3));
    assert!(elapsed < Duration::from_secs(18));
}

#[tokio::test(start_paused = true)]
async fn publish_failure_does_not_affect_confirmation() {
    let temp = tempfile::tempdir().unwrap();
    let attempts = Arc::new(AtomicUsize::new(0));
    let mut agent = BaristaAgent::new(OrderStore::new(temp.path())).with_publisher(Arc::new(
        FailingPublisher {
            attempts: Arc::clone(&attempts),
        },
    ));
    fill_order(&mut agent);

    let reply = agent.save_order().await.unwrap();
    assert!(reply.starts_with("Perfect! Your order has been saved successfully."));
    assert_eq!(attempts.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert_eq!(order_files(temp.path()).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn missing_publisher_is_tolerated() {
    let temp = tempfile::tempdir().unwrap();
    let mut agent = BaristaAgent::new(OrderStore::new(temp.path()));
    fill_order(&mut agent);

    let reply = agent.save_order().await.unwrap();
    assert!(reply.contains("Jamie"));

    // Let the background task wake up and find no channel.
    tokio::time::sleep(Duration::from_secs(20)).await;
    assert!(agent.is_finalized());
}

#[tokio::test]
async fn dispatch_drives_a_full_conversation() {
    let temp = tempfile::tempdir().unwrap();
    let mut agent = BaristaAgent::new(OrderStore::new(temp.path()));

    let calls = [
        ("set_drink_type", r#"{"drink_type": "Cappuccino"}"#),
        ("set_size", r#"{"size": "Large"}"#),
        ("set_milk", r#"{"milk_type": "soy milk"}"#),
        ("add_extra", r#"{"extra": "extra shot"}"#),
        ("add_extra", r#"{"extra": "Extra Shot"}"#),
        ("set_customer_name", r#"{"name": "Noor"}"#),
    ];
    for (name, args) in calls {
        let reply = agent.dispatch(name, args).await.unwrap();
        assert!(!reply.starts_with("ERROR"), "{name}: {reply}");
    }

    let reply = agent.dispatch("save_order", "").await.unwrap();
    assert!(reply.contains("large cappuccino with soy milk, extras: extra shot, for Noor."));
}
