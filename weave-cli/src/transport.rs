use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use weave_core::{auto_time::is_usable_duration, format_clock, CoreError, PlaybackEvent, SyncEngine};

use crate::error::{CliError, Result};

const LOG_TARGET: &str = "weave::transport";

/// Stand-in for a media element: reports the duration, then advances the
/// clock in fixed ticks until the end of the track.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    duration: f64,
    tick: Duration,
    speed: f64,
    seek_to: Option<f64>,
}

impl SimulatedTransport {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDuration`] for a non-positive or non-finite
    /// duration, or an argument error for a zero tick.
    pub fn new(duration: f64, tick: Duration) -> Result<Self> {
        if !is_usable_duration(duration) {
            return Err(CoreError::InvalidDuration { duration }.into());
        }
        if tick.is_zero() {
            return Err(CliError::InvalidArgument {
                name: "tick_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            duration,
            tick,
            speed: 1.0,
            seek_to: None,
        })
    }

    /// # Errors
    ///
    /// Returns an argument error unless `speed` is a positive number.
    pub fn with_speed(mut self, speed: f64) -> Result<Self> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(CliError::InvalidArgument {
                name: "--speed",
                reason: format!("must be a positive number, got {speed}"),
            });
        }
        self.speed = speed;
        Ok(self)
    }

    /// Jump to `seek_to` (clamped to the track) right after metadata is reported
    #[must_use]
    pub fn with_seek(mut self, seek_to: Option<f64>) -> Self {
        self.seek_to = seek_to
            .filter(|s| s.is_finite())
            .map(|s| s.clamp(0.0, self.duration));
        self
    }

    /// Drive `engine` until the track ends or `cancel` fires.
    ///
    /// Returns `true` if the track played to the end.
    pub async fn run(&self, engine: &SyncEngine, cancel: &CancellationToken) -> bool {
        engine
            .handle_playback_event(PlaybackEvent::LoadedMetadata {
                duration: self.duration,
            })
            .await;

        let mut clock = 0.0;
        if let Some(target) = self.seek_to {
            debug!(target: LOG_TARGET, "Seeking to {}", format_clock(target));
            clock = target;
            engine.handle_playback_event(PlaybackEvent::Seeked(clock)).await;
        }

        let step = self.tick.as_secs_f64() * self.speed;
        let mut interval = tokio::time::interval(self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        interval.tick().await;

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!(target: LOG_TARGET, "Playback stopped at {}", format_clock(clock));
                    return false;
                }
                _ = interval.tick() => {}
            }

            clock = (clock + step).min(self.duration);
            engine.handle_playback_event(PlaybackEvent::TimeUpdate(clock)).await;

            if clock >= self.duration {
                info!(target: LOG_TARGET, "Reached end of track at {}", format_clock(clock));
                engine.handle_playback_event(PlaybackEvent::Ended).await;
                return true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::{
        AutoTimer, LoadedLyrics, LyricLine, LyricSequence, LyricsMode, SyncEvent, TrackInfo,
    };

    async fn engine_with_plain_lines(n: usize) -> std::sync::Arc<SyncEngine> {
        let engine = SyncEngine::new(AutoTimer::default());
        let generation = engine.begin_track(TrackInfo::new("t", "Track", "Artist")).await;
        let lines = (0..n).map(|i| LyricLine::plain(format!("L{i}"))).collect();
        engine
            .commit_lyrics(
                generation,
                LoadedLyrics {
                    sequence: LyricSequence::plain(lines),
                    message: None,
                },
            )
            .await;
        engine
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(matches!(
            SimulatedTransport::new(0.0, Duration::from_millis(250)),
            Err(CliError::Core(CoreError::InvalidDuration { .. }))
        ));
        assert!(SimulatedTransport::new(f64::NAN, Duration::from_millis(250)).is_err());
        assert!(SimulatedTransport::new(10.0, Duration::ZERO).is_err());

        let transport = SimulatedTransport::new(10.0, Duration::from_millis(250)).unwrap();
        assert!(transport.clone().with_speed(0.0).is_err());
        assert!(transport.with_speed(f64::INFINITY).is_err());
    }

    #[test]
    fn test_seek_is_clamped() {
        let transport = SimulatedTransport::new(10.0, Duration::from_secs(1))
            .unwrap()
            .with_seek(Some(42.0));
        assert_eq!(transport.seek_to, Some(10.0));

        let transport = transport.with_seek(Some(f64::NAN));
        assert_eq!(transport.seek_to, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_plays_to_end_and_auto_times() {
        let engine = engine_with_plain_lines(3).await;
        let mut rx = engine.subscribe();
        let transport = SimulatedTransport::new(10.0, Duration::from_secs(1)).unwrap();

        assert!(transport.run(&engine, &CancellationToken::new()).await);

        assert!((engine.clock().await - 10.0).abs() < f64::EPSILON);
        let state = engine.sync_state().await;
        assert_eq!(state.mode(), LyricsMode::AutoTimed);
        // Lines at 0.25, 4.75, 9.25
        assert_eq!(state.active_index(), Some(2));

        let mut ended = false;
        while let Ok(event) = rx.try_recv() {
            ended |= matches!(event, SyncEvent::PlaybackEnded);
        }
        assert!(ended);
    }

    #[tokio::test(start_paused = true)]
    async fn test_speed_shortens_playback() {
        let engine = engine_with_plain_lines(2).await;
        let transport = SimulatedTransport::new(8.0, Duration::from_secs(1))
            .unwrap()
            .with_speed(4.0)
            .unwrap();

        let started = tokio::time::Instant::now();
        assert!(transport.run(&engine, &CancellationToken::new()).await);
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_after_seek() {
        let engine = engine_with_plain_lines(3).await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let transport = SimulatedTransport::new(10.0, Duration::from_secs(1))
            .unwrap()
            .with_seek(Some(6.0));

        assert!(!transport.run(&engine, &cancel).await);
        assert!((engine.clock().await - 6.0).abs() < f64::EPSILON);
        assert_eq!(engine.sync_state().await.active_index(), Some(1));
    }
}
