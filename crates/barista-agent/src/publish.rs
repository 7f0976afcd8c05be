//! Delayed, fire-and-forget receipt publication.

use barista_voice::DataPublisher;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Topic the web frontend listens on for finished receipts.
pub const ORDER_VISUALIZATION_TOPIC: &str = "order-visualization";

/// How long to wait before publishing, so the agent finishes speaking its
/// confirmation before the receipt appears.
pub const DEFAULT_PUBLISH_DELAY: Duration = Duration::from_secs(18);

/// Spawns a detached task that publishes `document` on
/// [`ORDER_VISUALIZATION_TOPIC`] once `delay` has elapsed.
///
/// The task is never joined or cancelled. A missing publisher or a failed
/// publish is logged and otherwise ignored.
pub fn spawn_delayed_publish(
    publisher: Option<Arc<dyn DataPublisher>>,
    document: String,
    delay: Duration,
) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let Some(publisher) = publisher else {
            error!("room not available for publishing order visualization");
            return;
        };

        match publisher
            .publish(ORDER_VISUALIZATION_TOPIC, document.into_bytes())
            .await
        {
            Ok(()) => info!("published order visualization to frontend"),
            Err(e) => error!("failed to publish order visualization: {}", e),
        }
    });
}
