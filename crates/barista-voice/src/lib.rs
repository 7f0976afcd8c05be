//! LiveKit boundary for the barista backend.
//!
//! The speech pipeline itself (STT, LLM, TTS, turn detection) runs inside
//! the LiveKit agents framework. This crate only covers what the backend
//! needs from LiveKit directly: join tokens for the browser and the voice
//! worker, and a server-side data channel used to push finished receipts
//! to the frontend on a named topic.

pub mod config;
pub mod error;
pub mod publisher;
pub mod service;

pub use config::LiveKitConfig;
pub use error::VoiceError;
pub use publisher::{DataPublisher, RoomDataPublisher};
pub use service::VoiceService;
