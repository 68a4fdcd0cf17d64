use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub recording: RecordingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

/// Where the speech service lives and where this client itself is hosted.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    /// Service address, or "same" to talk to the hosting context's own
    /// host and port.
    #[serde(default = "default_address")]
    pub address: String,

    /// Host of the hosting context.
    pub host: String,

    /// Port of the hosting context, if not implied by the scheme.
    #[serde(default)]
    pub port: Option<u16>,

    /// Whether the hosting context is secure; the conversation channel
    /// always matches its security tier.
    #[serde(default)]
    pub secure: bool,

    /// Worker-level auth identifier, sent only when non-empty.
    #[serde(default)]
    pub worker_auth_id: Option<String>,

    /// User-level auth identifier, sent only when non-empty.
    #[serde(default)]
    pub email: Option<String>,
}

fn default_address() -> String {
    "same".to_string()
}

/// Generation knobs forwarded to the speech model.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub text_temperature: f64,
    pub text_topk: u32,
    pub audio_temperature: f64,
    pub audio_topk: u32,
    pub pad_mult: f64,
    pub repetition_penalty_context: u32,
    pub repetition_penalty: f64,
    pub text_prompt: String,
    pub voice_prompt: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            text_temperature: 0.7,
            text_topk: 25,
            audio_temperature: 0.8,
            audio_topk: 250,
            pad_mult: 1.0,
            repetition_penalty_context: 64,
            repetition_penalty: 1.0,
            text_prompt: String::new(),
            voice_prompt: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Directory where finalized capture artifacts are saved.
    pub output_dir: String,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            output_dir: "recordings".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
