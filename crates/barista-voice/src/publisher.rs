//! Server-side data publishing into a LiveKit room.

use crate::error::VoiceError;
use async_trait::async_trait;
use livekit_api::services::room::{RoomClient, SendDataOptions};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;

/// Something that can push an opaque payload to the participants listening
/// on a topic.
///
/// Delivery is fire-and-forget: there is no acknowledgement beyond the
/// transport accepting the packet.
#[async_trait]
pub trait DataPublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), VoiceError>;
}

/// Publishes reliable data packets to every participant of one room through
/// the LiveKit room service.
#[derive(Clone)]
pub struct RoomDataPublisher {
    room_client: Arc<RoomClient>,
    room_name: String,
}

impl fmt::Debug for RoomDataPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomDataPublisher")
            .field("room_name", &self.room_name)
            .finish_non_exhaustive()
    }
}

impl RoomDataPublisher {
    pub fn new(room_client: Arc<RoomClient>, room_name: impl Into<String>) -> Self {
        Self {
            room_client,
            room_name: room_name.into(),
        }
    }

    pub fn room_name(&self) -> &str {
        &self.room_name
    }
}

#[async_trait]
impl DataPublisher for RoomDataPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), VoiceError> {
        info!(
            "publishing {} bytes on topic '{}' to room '{}'",
            payload.len(),
            topic,
            self.room_name
        );

        let options = SendDataOptions {
            topic: Some(topic.to_string()),
            ..Default::default()
        };

        // `send_data` holds a thread-local RNG across its await point, so its
        // future is not `Send`. Drive it to completion on a blocking thread.
        let handle = Handle::try_current()
            .map_err(|e| VoiceError::Publish(format!("no tokio runtime: {}", e)))?;
        let room_client = Arc::clone(&self.room_client);
        let room_name = self.room_name.clone();

        tokio::task::spawn_blocking(move || {
            handle.block_on(room_client.send_data(&room_name, payload, options))
        })
        .await
        .map_err(|e| VoiceError::Publish(format!("publish task failed: {}", e)))?
        .map_err(|e| VoiceError::Publish(e.to_string()))
    }
}
