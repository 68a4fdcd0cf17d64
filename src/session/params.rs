use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ConnectionConfig, GenerationConfig};

/// Everything a session sends to parameterize the conversation.
///
/// Immutable once drawn; in particular the two seeds are fixed for the
/// session's lifetime, and starting a new conversation draws a fresh set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionParameters {
    pub text_temperature: f64,
    pub text_topk: u32,
    pub audio_temperature: f64,
    pub audio_topk: u32,
    pub pad_mult: f64,
    pub repetition_penalty_context: u32,
    pub repetition_penalty: f64,
    pub text_prompt: String,
    pub voice_prompt: String,
    pub worker_auth_id: Option<String>,
    pub email: Option<String>,
    pub text_seed: u64,
    pub audio_seed: u64,
}

impl SessionParameters {
    /// Draw parameters for a new session, including fresh seeds.
    pub fn draw(generation: &GenerationConfig, connection: &ConnectionConfig) -> Self {
        let mut rng = rand::thread_rng();

        Self {
            text_temperature: generation.text_temperature,
            text_topk: generation.text_topk,
            audio_temperature: generation.audio_temperature,
            audio_topk: generation.audio_topk,
            pad_mult: generation.pad_mult,
            repetition_penalty_context: generation.repetition_penalty_context,
            repetition_penalty: generation.repetition_penalty,
            text_prompt: generation.text_prompt.clone(),
            voice_prompt: generation.voice_prompt.clone(),
            worker_auth_id: connection.worker_auth_id.clone(),
            email: connection.email.clone(),
            text_seed: rng.gen_range(0..1_000_000_000),
            audio_seed: rng.gen_range(0..1_000_000_000),
        }
    }
}
