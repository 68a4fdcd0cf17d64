use anyhow::{Context, Result};
use url::Url;

use crate::session::SessionParameters;

/// Address sentinel meaning "talk to the hosting context itself".
pub const SAME_ORIGIN: &str = "same";

const CHAT_PATH: &str = "/api/chat";

/// The runtime hosting this client. The conversation channel always
/// matches its security tier.
#[derive(Debug, Clone)]
pub struct HostContext {
    pub host: String,
    pub port: Option<u16>,
    pub secure: bool,
}

impl HostContext {
    fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }
}

/// Build the duplex-channel target for one session. Pure and
/// deterministic: the same address, context, and parameters always
/// resolve to the same URL.
pub fn resolve_target(
    raw_address: &str,
    host: &HostContext,
    params: &SessionParameters,
) -> Result<Url> {
    let scheme = if host.secure { "wss" } else { "ws" };
    let authority = if raw_address.is_empty() || raw_address == SAME_ORIGIN {
        host.authority()
    } else {
        raw_address.to_string()
    };

    let mut url = Url::parse(&format!("{scheme}://{authority}{CHAT_PATH}"))
        .with_context(|| format!("Invalid connection address: {authority}"))?;

    {
        let mut query = url.query_pairs_mut();

        if let Some(id) = &params.worker_auth_id {
            if !id.is_empty() {
                query.append_pair("worker_auth_id", id);
            }
        }
        if let Some(email) = &params.email {
            if !email.is_empty() {
                query.append_pair("email", email);
            }
        }

        query.append_pair("text_temperature", &params.text_temperature.to_string());
        query.append_pair("text_topk", &params.text_topk.to_string());
        query.append_pair("audio_temperature", &params.audio_temperature.to_string());
        query.append_pair("audio_topk", &params.audio_topk.to_string());
        query.append_pair("pad_mult", &params.pad_mult.to_string());
        query.append_pair("text_seed", &params.text_seed.to_string());
        query.append_pair("audio_seed", &params.audio_seed.to_string());
        query.append_pair(
            "repetition_penalty_context",
            &params.repetition_penalty_context.to_string(),
        );
        query.append_pair("repetition_penalty", &params.repetition_penalty.to_string());
        query.append_pair("text_prompt", &params.text_prompt);
        query.append_pair("voice_prompt", &params.voice_prompt);
    }

    Ok(url)
}
