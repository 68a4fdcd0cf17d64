use anyhow::Result;
use clap::Parser;
use colloquy::{resolve_target, Config, HostContext, SessionParameters};
use tracing::info;

#[derive(Parser)]
#[command(name = "colloquy", about = "Client session core for live voice conversations")]
struct Cli {
    /// Config file path (without extension)
    #[arg(long, default_value = "config/colloquy")]
    config: String,

    /// Service address override ("same" targets the hosting context itself)
    #[arg(long)]
    address: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("Colloquy v0.1.0");
    info!("Loaded config: {}", cfg.service.name);

    let host = HostContext {
        host: cfg.connection.host.clone(),
        port: cfg.connection.port,
        secure: cfg.connection.secure,
    };
    let params = SessionParameters::draw(&cfg.generation, &cfg.connection);
    let address = cli.address.unwrap_or_else(|| cfg.connection.address.clone());

    let target = resolve_target(&address, &host, &params)?;

    info!(
        "Session seeds drawn: text={} audio={}",
        params.text_seed, params.audio_seed
    );
    info!("Resolved connection target: {}", target);
    info!("Recordings will be saved to {}", cfg.recording.output_dir);

    Ok(())
}
