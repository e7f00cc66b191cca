pub mod auto_time;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod loader;
pub mod lrc;
pub mod lyrics;
pub mod paths;
pub mod playback;
pub mod providers;
pub mod source;
pub mod sync;
pub mod time;
pub mod tracker;
pub mod view;

pub use auto_time::{auto_time, AutoTimer};
pub use config::{LoggingConfig, LyricsConfig, PlaybackConfig, WeaveConfig};

pub use error::CoreError;
pub use fetcher::LyricsFetcher;
pub use loader::{CandidateStep, LoadedLyrics, LyricsLoader, ResourceKind};
pub use lrc::{parse_plain, parse_timed};
pub use lyrics::{LyricLine, LyricSequence, LyricsMode};
pub use paths::{config_dir, config_path, log_path, CONFIG_DIR_NAME, CONFIG_FILE_NAME, LOG_FILE_NAME};
pub use playback::{PlaybackEvent, TrackInfo, TrackLyrics};
pub use providers::{FileLyricsSource, MemoryLyricsSource};
pub use source::LyricsSource;
pub use sync::{SyncEngine, SyncEvent};
pub use time::format_clock;
pub use tracker::{SyncState, TickOutcome};
pub use view::LyricsView;
