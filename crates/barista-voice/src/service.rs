use crate::config::LiveKitConfig;
use crate::error::VoiceError;
use crate::publisher::RoomDataPublisher;
use livekit_api::access_token::{AccessToken, VideoGrants};
use livekit_api::services::room::RoomClient;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
pub struct VoiceService {
    config: LiveKitConfig,
    room_client: Arc<RoomClient>,
}

impl VoiceService {
    pub fn new(config: LiveKitConfig) -> Self {
        let room_client =
            RoomClient::with_api_key(&config.url, &config.api_key, &config.api_secret);
        Self {
            config,
            room_client: Arc::new(room_client),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    pub fn get_url(&self) -> &str {
        &self.config.url
    }

    /// Issues a join token that lets a participant talk in `room_name` and
    /// receive data packets published there.
    pub fn generate_join_token(
        &self,
        room_name: &str,
        participant_identity: &str,
        participant_name: &str,
    ) -> Result<String, VoiceError> {
        if !self.is_enabled() {
            return Err(VoiceError::Config("LiveKit URL is not configured".to_string()));
        }

        let token = AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_identity(participant_identity)
            .with_name(participant_name)
            .with_grants(VideoGrants {
                room_join: true,
                room: room_name.to_string(),
                can_publish: true,
                can_subscribe: true,
                can_publish_data: true,
                ..Default::default()
            })
            .with_ttl(Duration::from_secs(self.config.token_ttl_seconds));

        token.to_jwt().map_err(VoiceError::LiveKit)
    }

    /// Returns a publisher bound to `room_name`, or `None` when LiveKit is
    /// not configured.
    pub fn publisher(&self, room_name: &str) -> Option<RoomDataPublisher> {
        if !self.is_enabled() {
            return None;
        }
        Some(RoomDataPublisher::new(
            Arc::clone(&self.room_client),
            room_name,
        ))
    }
}
