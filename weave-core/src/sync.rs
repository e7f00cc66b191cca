//! Sync engine tying the current track's lyrics to the playback clock.

use crate::auto_time::AutoTimer;
use crate::loader::LoadedLyrics;
use crate::playback::{PlaybackEvent, TrackInfo};
use crate::tracker::SyncState;
use crate::view::LyricsView;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

const LOG_TARGET: &str = "weave::sync";

/// Events emitted by the sync engine
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A new track was loaded into the player
    TrackChanged { track: TrackInfo, generation: u64 },
    /// What the lyrics panel shows changed (lines, active line or hint)
    Lyrics { generation: u64, view: LyricsView },
    /// Playback reached the end of the track
    PlaybackEnded,
    /// The transport reported a failure; playback controls stay usable
    Error { message: String },
}

/// Sync engine state
struct SyncEngineInner {
    /// Bumped on every track change; loads for older generations are dropped
    generation: u64,
    track: Option<TrackInfo>,
    clock: f64,
    /// `NaN` until the transport reports metadata
    duration: f64,
    state: SyncState,
}

/// Engine that keeps the lyrics of the current track in step with the clock
pub struct SyncEngine {
    inner: RwLock<SyncEngineInner>,
    auto_timer: AutoTimer,
    event_tx: broadcast::Sender<SyncEvent>,
}

impl SyncEngine {
    /// Create a new sync engine
    #[must_use]
    pub fn new(auto_timer: AutoTimer) -> Arc<Self> {
        Arc::new(Self::with_auto_timer(auto_timer))
    }

    fn with_auto_timer(auto_timer: AutoTimer) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            inner: RwLock::new(SyncEngineInner {
                generation: 0,
                track: None,
                clock: 0.0,
                duration: f64::NAN,
                state: SyncState::loading(0, String::new()),
            }),
            auto_timer,
            event_tx,
        }
    }

    /// Subscribe to sync events
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.event_tx.subscribe()
    }

    /// Start a new track session and return its generation.
    ///
    /// The previous track's lyrics are discarded, the clock resets to zero and
    /// the renderer gets a loading hint until [`SyncEngine::commit_lyrics`]
    /// is called with the returned generation.
    pub async fn begin_track(&self, track: TrackInfo) -> u64 {
        let mut inner = self.inner.write().await;

        inner.generation += 1;
        let generation = inner.generation;
        inner.clock = 0.0;
        inner.duration = f64::NAN;
        inner.state = SyncState::loading(generation, format!("Loading lyrics for: {}…", track.title));
        inner.track = Some(track.clone());

        info!(
            target: LOG_TARGET,
            "Track changed: {} - {} (generation {})", track.artist, track.title, generation
        );

        let _ = self.event_tx.send(SyncEvent::TrackChanged { track, generation });
        let _ = self.event_tx.send(SyncEvent::Lyrics {
            generation,
            view: inner.state.view(),
        });

        generation
    }

    /// Install lyrics loaded for `generation`.
    ///
    /// Returns `false` and leaves the current state alone when a newer track
    /// has been started since the load began.
    pub async fn commit_lyrics(&self, generation: u64, loaded: LoadedLyrics) -> bool {
        let mut inner = self.inner.write().await;

        if generation != inner.generation {
            debug!(
                target: LOG_TARGET,
                "Discarding lyrics for stale generation {} (current {})",
                generation,
                inner.generation
            );
            return false;
        }

        let mut state = SyncState::new(generation, loaded.sequence, loaded.message);
        // Metadata may have arrived while the load was in flight
        if state.promote(&self.auto_timer, inner.duration, inner.clock).is_none() {
            state.on_clock_tick(inner.clock);
        }

        info!(
            target: LOG_TARGET,
            "Lyrics ready: {} ({} lines, generation {})",
            state.mode(),
            state.sequence().len(),
            generation
        );

        inner.state = state;
        let _ = self.event_tx.send(SyncEvent::Lyrics {
            generation,
            view: inner.state.view(),
        });

        true
    }

    /// Route a transport notification for the current track
    pub async fn handle_playback_event(&self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::TimeUpdate(clock) | PlaybackEvent::Seeked(clock) => {
                self.on_clock(clock).await;
            }
            PlaybackEvent::LoadedMetadata { duration } => {
                self.on_loaded_metadata(duration).await;
            }
            PlaybackEvent::Ended => {
                let _ = self.event_tx.send(SyncEvent::PlaybackEnded);
            }
            PlaybackEvent::Error(message) => {
                warn!(target: LOG_TARGET, "Playback error: {}", message);
                let _ = self.event_tx.send(SyncEvent::Error { message });
            }
        }
    }

    async fn on_clock(&self, clock: f64) {
        let mut inner = self.inner.write().await;
        inner.clock = clock;

        let outcome = inner.state.on_clock_tick(clock);
        if outcome.changed {
            let _ = self.event_tx.send(SyncEvent::Lyrics {
                generation: inner.generation,
                view: inner.state.view(),
            });
        }
    }

    async fn on_loaded_metadata(&self, duration: f64) {
        let mut inner = self.inner.write().await;
        inner.duration = duration;

        let clock = inner.clock;
        if inner.state.promote(&self.auto_timer, duration, clock).is_some() {
            // The lines themselves changed, so render even if the index did not
            let _ = self.event_tx.send(SyncEvent::Lyrics {
                generation: inner.generation,
                view: inner.state.view(),
            });
        }
    }

    /// Current track together with its generation, read under one lock
    pub async fn current_session(&self) -> Option<(TrackInfo, u64)> {
        let inner = self.inner.read().await;
        inner.track.clone().map(|track| (track, inner.generation))
    }

    /// Known track duration, if the transport has reported a usable one
    pub async fn duration(&self) -> Option<f64> {
        let duration = self.inner.read().await.duration;
        crate::auto_time::is_usable_duration(duration).then_some(duration)
    }

    /// Last clock value seen for the current track
    pub async fn clock(&self) -> f64 {
        self.inner.read().await.clock
    }

    /// Copy of the current lyric state
    pub async fn sync_state(&self) -> SyncState {
        self.inner.read().await.state.clone()
    }

    /// What the renderer should currently show
    pub async fn view(&self) -> LyricsView {
        self.inner.read().await.state.view()
    }
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self::with_auto_timer(AutoTimer::default())
    }
}
