mod cli;
mod error;
mod output;
mod transport;

use crate::cli::{Cli, Command, PlayArgs, ShowArgs};
use crate::error::Result;
use crate::transport::SimulatedTransport;
use clap::Parser;
use std::fs::File;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use weave_core::auto_time::is_usable_duration;
use weave_core::{
    CoreError, FileLyricsSource, LoggingConfig, LyricsConfig, LyricsFetcher, LyricsLoader,
    LyricsSource, SyncEngine, SyncEvent, WeaveConfig,
};
use weave_lyrics_http::HttpLyricsSource;

fn main() {
    let cli = Cli::parse();

    let config = load_config(&cli);
    init_tracing(&config.logging);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(async {
        match &cli.command {
            Command::Show(args) => show(args, &cli, &config).await,
            Command::Play(args) => play(args, &cli, &config).await,
        }
    });

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

/// Load the config file, falling back to defaults when it was just created
fn load_config(cli: &Cli) -> WeaveConfig {
    let loaded = match &cli.config {
        Some(path) => WeaveConfig::load_or_create_at(path),
        None => WeaveConfig::load_or_create(),
    };

    match loaded {
        Ok(config) => config,
        Err(CoreError::ConfigNotFound { path }) => {
            eprintln!("Created a default config at {}", path.display());
            WeaveConfig::default()
        }
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    }
}

/// Initialize tracing with console output and optional file logging.
///
/// Console logs go to stderr so lyric output on stdout stays clean.
fn init_tracing(logging: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if logging.file_enabled {
        let log_path = weave_core::log_path();

        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match File::create(&log_path) {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt_layer)
                    .with(file_layer)
                    .init();

                return;
            }
            Err(e) => {
                eprintln!("Failed to create log file at {}: {e}", log_path.display());
            }
        }
    }

    // Fallback: console only
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Pick the lyric source for the configured (or overridden) asset base
fn create_source(config: &LyricsConfig, base: Option<&str>) -> Result<Arc<dyn LyricsSource>> {
    let mut config = config.clone();
    if let Some(base) = base {
        config.asset_base = base.to_string();
    }

    let source: Arc<dyn LyricsSource> = if config.is_remote() {
        Arc::new(HttpLyricsSource::with_options(
            &config.asset_base,
            Duration::from_secs(config.request_timeout_secs),
            Some(config.user_agent.as_str()),
        )?)
    } else {
        Arc::new(FileLyricsSource::new(&config.asset_base))
    };

    info!("Resolving lyrics via {} source at {}", source.name(), config.asset_base);
    Ok(source)
}

async fn show(args: &ShowArgs, cli: &Cli, config: &WeaveConfig) -> Result<()> {
    if let Some(duration) = args.duration.filter(|d| !is_usable_duration(*d)) {
        return Err(CoreError::InvalidDuration { duration }.into());
    }

    let source = create_source(&config.lyrics, cli.base.as_deref())?;
    let loader = LyricsLoader::new(source, config.lyrics.auto_time);
    let track = args.track.to_track();

    let loaded = loader.load(&track.lyrics, args.duration).await;

    if args.json {
        println!("{}", output::render_loaded_json(&track.title, &loaded)?);
    } else {
        for line in output::render_loaded(&track.title, &loaded) {
            println!("{line}");
        }
    }

    Ok(())
}

async fn play(args: &PlayArgs, cli: &Cli, config: &WeaveConfig) -> Result<()> {
    let transport = SimulatedTransport::new(
        args.duration,
        Duration::from_millis(config.playback.tick_interval_ms),
    )?
    .with_speed(args.speed)?
    .with_seek(args.seek_to);

    let source = create_source(&config.lyrics, cli.base.as_deref())?;
    let sync_engine = SyncEngine::new(config.lyrics.auto_time);
    let loader = Arc::new(LyricsLoader::new(source, config.lyrics.auto_time));

    // Create shared cancellation token for graceful shutdown
    let cancel_token = CancellationToken::new();

    let ctrlc_token = cancel_token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received Ctrl+C, shutting down gracefully...");
        ctrlc_token.cancel();
    }) {
        warn!("Failed to set Ctrl+C handler: {}", e);
    }

    let lyrics_fetcher = Arc::new(LyricsFetcher::new(
        Arc::clone(&sync_engine),
        loader,
        Some(cancel_token.clone()),
    ));
    let fetcher_handle = lyrics_fetcher.start();
    let printer_handle = tokio::spawn(print_sync_events(
        sync_engine.subscribe(),
        cancel_token.clone(),
        args.context,
    ));

    sync_engine.begin_track(args.track.to_track()).await;
    let completed = transport.run(&sync_engine, &cancel_token).await;

    // Let the printer drain the final events before shutting everything down
    if completed {
        let _ = printer_handle.await;
    }
    cancel_token.cancel();
    let _ = fetcher_handle.await;

    Ok(())
}

/// Print every lyric change until the track ends or shutdown is requested
async fn print_sync_events(
    mut rx: broadcast::Receiver<SyncEvent>,
    cancel_token: CancellationToken,
    context: usize,
) {
    loop {
        let event = tokio::select! {
            () = cancel_token.cancelled() => break,
            event = rx.recv() => event,
        };

        match event {
            Ok(SyncEvent::TrackChanged { track, .. }) => {
                println!("== {} - {} ==", track.artist, track.title);
            }
            Ok(SyncEvent::Lyrics { view, .. }) => {
                for line in output::render_view(&view, context) {
                    println!("{line}");
                }
            }
            Ok(SyncEvent::PlaybackEnded) => {
                println!("== End of track ==");
                break;
            }
            Ok(SyncEvent::Error { message }) => {
                eprintln!("Playback error: {message}");
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Display fell behind, skipped {} updates", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
