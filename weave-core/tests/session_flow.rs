use std::sync::Arc;
use std::time::Duration;

use weave_core::{
    AutoTimer, LyricsFetcher, LyricsLoader, LyricsMode, LyricsView, MemoryLyricsSource,
    PlaybackEvent, SyncEngine, SyncEvent, TrackInfo,
};

fn track(id: &str) -> TrackInfo {
    TrackInfo::new(id, format!("Song {id}"), "Band")
        .with_lyrics(Some(&format!("lyrics/{id}.lrc")), Some(&format!("lyrics/{id}.txt")))
}

fn start_fetcher(
    source: MemoryLyricsSource,
) -> (Arc<SyncEngine>, tokio_util::sync::CancellationToken, tokio::task::JoinHandle<()>) {
    let engine = SyncEngine::new(AutoTimer::default());
    let loader = Arc::new(LyricsLoader::new(Arc::new(source), AutoTimer::default()));
    let fetcher = Arc::new(LyricsFetcher::new(Arc::clone(&engine), loader, None));
    let cancel = fetcher.cancel_token();
    let handle = fetcher.start();
    (engine, cancel, handle)
}

#[tokio::test(start_paused = true)]
async fn malformed_timed_file_falls_back_then_auto_times() {
    let source = MemoryLyricsSource::new()
        .with_file("lyrics/a.lrc", "[aa:bb]First line\n[1:xx]Second line\n[zz]Third line")
        .with_file("lyrics/a.txt", "unused");
    let (engine, cancel, handle) = start_fetcher(source);
    // Let the fetcher subscribe before the track starts
    tokio::time::sleep(Duration::from_millis(1)).await;

    let generation = engine.begin_track(track("a")).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = engine.sync_state().await;
    assert_eq!(state.generation(), generation);
    assert_eq!(state.mode(), LyricsMode::Plain);
    assert_eq!(state.sequence().lines()[0].text, "[aa:bb]First line");

    engine.handle_playback_event(PlaybackEvent::TimeUpdate(6.0)).await;
    assert_eq!(engine.sync_state().await.active_index(), None);

    engine
        .handle_playback_event(PlaybackEvent::LoadedMetadata { duration: 10.0 })
        .await;

    let state = engine.sync_state().await;
    assert_eq!(state.mode(), LyricsMode::AutoTimed);
    // Lines at 0.25, 4.75, 9.25
    assert_eq!(state.active_index(), Some(1));

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn plain_resource_used_when_timed_missing() {
    let source = MemoryLyricsSource::new().with_file("lyrics/b.txt", "one\n\ntwo\n");
    let (engine, cancel, handle) = start_fetcher(source);
    tokio::time::sleep(Duration::from_millis(1)).await;

    engine.begin_track(track("b")).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    match engine.view().await {
        LyricsView::Lines { lines, mode, .. } => {
            assert_eq!(mode, LyricsMode::Plain);
            assert_eq!(lines.len(), 2);
        }
        LyricsView::Empty { message } => panic!("expected lyrics, got hint {message:?}"),
    }

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn missing_lyrics_produce_hint() {
    let (engine, cancel, handle) = start_fetcher(MemoryLyricsSource::new());
    tokio::time::sleep(Duration::from_millis(1)).await;

    engine.begin_track(track("c")).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    match engine.view().await {
        LyricsView::Empty { message } => {
            assert!(message.contains("lyrics/c.lrc"));
            assert!(message.contains("lyrics/c.txt"));
        }
        LyricsView::Lines { .. } => panic!("expected the no-lyrics hint"),
    }

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn slow_load_for_previous_track_is_discarded() {
    let source = MemoryLyricsSource::new()
        .with_file("lyrics/a.lrc", "[00:01]From A")
        .with_delay("lyrics/a.lrc", Duration::from_secs(5))
        .with_file("lyrics/b.lrc", "[00:01]From B");
    let (engine, cancel, handle) = start_fetcher(source);
    tokio::time::sleep(Duration::from_millis(1)).await;

    let mut rx = engine.subscribe();
    engine.begin_track(track("a")).await;
    let generation_b = engine.begin_track(track("b")).await;

    // Long enough for the slow load of track A to finish
    tokio::time::sleep(Duration::from_secs(10)).await;

    let state = engine.sync_state().await;
    assert_eq!(state.generation(), generation_b);
    assert_eq!(state.sequence().lines()[0].text, "From B");

    // No lyrics were ever published for the superseded track
    while let Ok(event) = rx.try_recv() {
        if let SyncEvent::Lyrics {
            generation,
            view: LyricsView::Lines { lines, .. },
        } = event
        {
            assert_eq!(generation, generation_b);
            assert_eq!(lines[0].text, "From B");
        }
    }

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn loads_committed_manually_respect_generation() {
    let source = MemoryLyricsSource::new()
        .with_file("lyrics/a.lrc", "[00:01]From A")
        .with_delay("lyrics/a.lrc", Duration::from_secs(5))
        .with_file("lyrics/b.txt", "From B");
    let engine = SyncEngine::new(AutoTimer::default());
    let loader = Arc::new(LyricsLoader::new(Arc::new(source), AutoTimer::default()));

    let track_a = track("a");
    let generation_a = engine.begin_track(track_a.clone()).await;
    let pending_a = tokio::spawn({
        let engine = Arc::clone(&engine);
        let loader = Arc::clone(&loader);
        async move {
            let loaded = loader.load(&track_a.lyrics, None).await;
            engine.commit_lyrics(generation_a, loaded).await
        }
    });

    let track_b = track("b");
    let generation_b = engine.begin_track(track_b.clone()).await;
    let loaded_b = loader.load(&track_b.lyrics, None).await;
    assert!(engine.commit_lyrics(generation_b, loaded_b).await);

    assert!(!pending_a.await.unwrap());
    let state = engine.sync_state().await;
    assert_eq!(state.generation(), generation_b);
    assert_eq!(state.mode(), LyricsMode::Plain);
}
