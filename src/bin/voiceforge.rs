//! voiceforge: text-to-speech from the command line.
//!
//! Usage:
//!   voiceforge key set <KEY>              Save the ElevenLabs API key
//!   voiceforge key check                  Validate the saved key
//!   voiceforge voices --search british    Search the voice catalog
//!   voiceforge say "Hello world"          Synthesize and save audio

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use voiceforge::catalog::{CatalogState, CategoryFilter, VoiceCatalog};
use voiceforge::config::{BackendKind, VoiceSource};
use voiceforge::credentials::{backend_from_config, CredentialStore};
use voiceforge::synthesis::{CompositeSink, ConsoleSink, TracingSink};
use voiceforge::{
    AudioPlayer, Config, ElevenLabsClient, ElevenLabsClientBuilder, ObjectUrlRegistry,
    SimulatedElement, SpeechForm, SynthesisSession,
};

#[derive(Parser)]
#[command(name = "voiceforge", version, about = "Text-to-speech with ElevenLabs")]
struct Cli {
    /// Config file (default: <config dir>/voiceforge/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where the API key is stored
    #[arg(long, global = true, value_parser = parse_backend)]
    backend: Option<BackendKind>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the API key
    #[command(subcommand)]
    Key(KeyCommand),
    /// List voices, optionally filtered
    Voices {
        /// Match against name and labels, case-insensitive
        #[arg(long, default_value = "")]
        search: String,
        /// all, male, female, neutral, other, or an accent such as british
        #[arg(long, default_value = "all")]
        category: String,
        /// Fetch voices from the provider instead of the built-in list
        #[arg(long)]
        remote: bool,
    },
    /// List accents present in the catalog
    Accents {
        #[arg(long)]
        remote: bool,
    },
    /// List synthesis models
    Models,
    /// Synthesize speech and save it
    Say(SayArgs),
}

#[derive(Subcommand)]
enum KeyCommand {
    /// Save a new key
    Set { value: String },
    /// Show the stored key, masked
    Show,
    /// Remove the stored key
    Clear,
    /// Validate the key against the provider
    Check,
}

#[derive(Args)]
struct SayArgs {
    text: String,
    #[arg(long)]
    voice: Option<String>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    stability: Option<f64>,
    #[arg(long)]
    similarity: Option<f64>,
    #[arg(long)]
    style: Option<f64>,
    #[arg(long)]
    speed: Option<f64>,
    #[arg(long)]
    no_speaker_boost: bool,
    /// Output directory (default: download dir)
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_backend(s: &str) -> Result<BackendKind, String> {
    s.parse().map_err(|e: voiceforge::Error| e.to_string())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "voiceforge=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    let registry = ObjectUrlRegistry::new();
    let client = Arc::new(
        ElevenLabsClientBuilder::from_config(&config)
            .registry(registry.clone())
            .build()?,
    );
    let mut store = CredentialStore::load(backend_from_config(&config))
        .context("reading stored API key")?;

    match cli.command {
        Command::Key(cmd) => run_key(cmd, &mut store, &client).await,
        Command::Voices {
            search,
            category,
            remote,
        } => {
            let category: CategoryFilter = category.parse()?;
            let catalog = load_catalog(&config, remote, &client, &store).await;
            if let CatalogState::Unavailable(message) = catalog.state() {
                eprintln!("{}", message);
                return Ok(());
            }
            let hits = catalog.search(&search, &category);
            if hits.is_empty() {
                println!("No voices match.");
            }
            for voice in hits {
                let labels: Vec<String> = voice.labels.values().cloned().collect();
                println!("{:<22} {:<12} {}", voice.voice_id, voice.name, labels.join(", "));
            }
            Ok(())
        }
        Command::Accents { remote } => {
            let catalog = load_catalog(&config, remote, &client, &store).await;
            for accent in catalog.unique_accents() {
                println!("{}", accent);
            }
            Ok(())
        }
        Command::Models => {
            for model in VoiceCatalog::builtin().models() {
                println!("{:<28} {}\n    {}", model.id, model.name, model.description);
            }
            Ok(())
        }
        Command::Say(args) => run_say(args, &config, &store, client, registry).await,
    }
}

async fn load_catalog(
    config: &Config,
    remote: bool,
    client: &ElevenLabsClient,
    store: &CredentialStore,
) -> VoiceCatalog {
    let source = if remote {
        VoiceSource::Remote
    } else {
        config.voice_source
    };
    VoiceCatalog::load(source, client, store.get()).await
}

async fn run_key(
    cmd: KeyCommand,
    store: &mut CredentialStore,
    client: &ElevenLabsClient,
) -> anyhow::Result<()> {
    match cmd {
        KeyCommand::Set { value } => {
            store.set(value.trim())?;
            println!("Saved API key {} ({})", store.masked(), store.backend_name());
        }
        KeyCommand::Show => println!("{}", store.masked()),
        KeyCommand::Clear => {
            store.clear()?;
            println!("API key removed");
        }
        KeyCommand::Check => {
            if !store.is_set() {
                anyhow::bail!("No API key set. Run `voiceforge key set <KEY>`.");
            }
            if client.validate_key(store.get()).await {
                println!("API key is valid");
            } else {
                anyhow::bail!("Invalid ElevenLabs API key");
            }
        }
    }
    Ok(())
}

async fn run_say(
    args: SayArgs,
    config: &Config,
    store: &CredentialStore,
    client: Arc<ElevenLabsClient>,
    registry: ObjectUrlRegistry,
) -> anyhow::Result<()> {
    let mut form = SpeechForm::new();
    form.set_text(args.text);
    if let Some(voice) = args.voice {
        form.set_voice(voice);
    }
    if let Some(model) = args.model {
        form.set_model(model);
    }
    if let Some(v) = args.stability {
        form.set_stability(v);
    }
    if let Some(v) = args.similarity {
        form.set_similarity_boost(v);
    }
    if let Some(v) = args.style {
        form.set_style(v);
    }
    form.set_speed(args.speed);
    form.set_speaker_boost(!args.no_speaker_boost);

    if let Some(over) = form.exceeded_by() {
        anyhow::bail!("Text exceeded by {} characters ({})", over, form.counter_label());
    }

    let notifier = Arc::new(
        CompositeSink::new()
            .add_sink(Arc::new(ConsoleSink::default()))
            .add_sink(Arc::new(TracingSink)),
    );
    let mut session = SynthesisSession::new(client).with_notifier(notifier);
    let audio = form.submit(&mut session, store.get()).await?;

    let mut player = AudioPlayer::new(SimulatedElement::new(registry.clone()), registry);
    player.load(Some(audio));
    let dir = args
        .out
        .unwrap_or_else(|| config.resolved_download_dir());
    let path = player.download(&dir)?;
    println!("{} ({})", path.display(), voiceforge::playback::format_time(player.duration()));

    session.reset();
    Ok(())
}
