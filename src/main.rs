use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hark=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Hark voice assistant");

    run()
}

#[cfg(all(feature = "audio-io", feature = "vosk-stt"))]
fn run() -> Result<()> {
    use hark::actions::DesktopActions;
    use hark::commands::CommandResolver;
    use hark::config::AssistantConfig;
    use hark::intent::GeminiClassifier;
    use hark::session::Listener;
    use hark::speech::VoskEngine;

    let config = AssistantConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;

    let classifier = GeminiClassifier::from_env()?;
    if !classifier.is_configured() {
        info!("GEMINI_API_KEY not set; AI command fallback is disabled");
    }

    let engine = VoskEngine::new(&config)?;
    let resolver = CommandResolver::new(Box::new(DesktopActions), Box::new(classifier));

    let (frame_tx, frame_rx) = crossbeam_channel::bounded(config.frame_queue_capacity);

    let mut capture = hark::audio::FrameCapture::new(&config)?;
    capture.start(frame_tx)?;

    info!(
        "Voice assistant running. Say '{}' to activate.",
        config.wake_aliases.first().map(String::as_str).unwrap_or("the wake word")
    );

    let listener = Listener::new(&config, engine, resolver, frame_rx);
    let handle = listener.spawn();

    // The capture stream stays alive in this scope; the listener runs until
    // the frame queue disconnects or the process is killed.
    handle
        .join()
        .map_err(|_| anyhow::anyhow!("Listener thread panicked"))?;

    Ok(())
}

#[cfg(not(all(feature = "audio-io", feature = "vosk-stt")))]
fn run() -> Result<()> {
    anyhow::bail!(
        "This build has no live listening support. \
         Rebuild with `--features audio-io,vosk-stt` and a Vosk model in models/vosk."
    )
}
