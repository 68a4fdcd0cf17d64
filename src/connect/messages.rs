use serde::{Deserialize, Serialize};
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::warn;

use crate::progress::ProgressStep;

/// Status envelope received as a text frame on the duplex channel.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope {
    Metadata { payload: MetadataPayload },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MetadataPayload {
    Progress(ProgressStep),
    #[serde(other)]
    Unknown,
}

/// Classified inbound traffic from the duplex channel.
#[derive(Debug)]
pub enum Inbound {
    /// Initialization progress status.
    Progress(ProgressStep),
    /// Synthesized voice payload, consumed by the playback collaborators.
    Audio(Vec<u8>),
    /// Anything this core does not interpret.
    Ignored,
}

/// Decode one wire frame. Unknown envelope types, unknown payload kinds,
/// and malformed JSON are all ignored rather than surfaced.
pub fn classify(msg: Message) -> Inbound {
    match msg {
        Message::Text(text) => match serde_json::from_str::<Envelope>(&text) {
            Ok(Envelope::Metadata {
                payload: MetadataPayload::Progress(step),
            }) => Inbound::Progress(step),
            Ok(Envelope::Metadata { .. }) => Inbound::Ignored,
            Err(e) => {
                warn!("Ignoring unparseable status message: {}", e);
                Inbound::Ignored
            }
        },
        Message::Binary(data) => Inbound::Audio(data),
        _ => Inbound::Ignored,
    }
}

/// Frames this client sends to the service.
#[derive(Debug)]
pub enum Outbound {
    /// Raw microphone audio.
    Audio(Vec<u8>),
}

impl Outbound {
    pub(crate) fn into_message(self) -> Message {
        match self {
            Outbound::Audio(data) => Message::Binary(data),
        }
    }
}
