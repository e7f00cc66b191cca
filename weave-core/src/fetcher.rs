//! Background task that loads lyrics whenever the track changes.

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::loader::LyricsLoader;
use crate::playback::TrackInfo;
use crate::sync::{SyncEngine, SyncEvent};

const LOG_TARGET: &str = "weave::fetcher";

/// Loads lyrics in the background for every track the engine starts.
///
/// Results go back through [`SyncEngine::commit_lyrics`], so a load that
/// finishes after the listener moved on to another track is dropped there.
pub struct LyricsFetcher {
    sync_engine: Arc<SyncEngine>,
    loader: Arc<LyricsLoader>,
    cancel_token: CancellationToken,
}

impl LyricsFetcher {
    /// Pass a shared `cancel_token` to stop the fetcher together with the
    /// rest of the application; otherwise it gets its own.
    pub fn new(
        sync_engine: Arc<SyncEngine>,
        loader: Arc<LyricsLoader>,
        cancel_token: Option<CancellationToken>,
    ) -> Self {
        Self {
            sync_engine,
            loader,
            cancel_token: cancel_token.unwrap_or_default(),
        }
    }

    /// Token that stops the fetch loop when cancelled
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Spawn the fetch loop
    #[must_use]
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(&self) {
        info!(target: LOG_TARGET, "Watching for track changes");

        let mut rx = self.sync_engine.subscribe();

        // A track may have been loaded before we subscribed
        self.load_current().await;

        loop {
            tokio::select! {
                () = self.cancel_token.cancelled() => {
                    info!(target: LOG_TARGET, "Lyrics fetcher shutting down");
                    break;
                }
                event = rx.recv() => {
                    match event {
                        Ok(SyncEvent::TrackChanged { track, generation }) => {
                            self.spawn_load(track, generation);
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            // A track change may be among the missed events
                            debug!(target: LOG_TARGET, "Missed {} sync events", skipped);
                            self.load_current().await;
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }
        }
    }

    async fn load_current(&self) {
        if let Some((track, generation)) = self.sync_engine.current_session().await {
            self.spawn_load(track, generation);
        }
    }

    /// Load lyrics for a track without blocking the event loop.
    ///
    /// Each load runs on its own task so a slow fetch never delays the next
    /// track; the engine drops the result if the track changed meanwhile.
    fn spawn_load(&self, track: TrackInfo, generation: u64) {
        let sync_engine = Arc::clone(&self.sync_engine);
        let loader = Arc::clone(&self.loader);

        tokio::spawn(async move {
            info!(
                target: LOG_TARGET,
                "Fetching lyrics for: {} - {} (generation {})",
                track.artist,
                track.title,
                generation
            );

            let duration = sync_engine.duration().await;
            let loaded = loader.load(&track.lyrics, duration).await;

            if !sync_engine.commit_lyrics(generation, loaded).await {
                debug!(
                    target: LOG_TARGET,
                    "Lyrics for {} arrived after the track changed", track.title
                );
            }
        });
    }
}
