use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use weave_core::TrackInfo;

#[derive(Parser, Debug)]
#[command(name = "weave", version)]
#[command(about = "Synchronized lyrics for the Weave player", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/weave/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory or http(s) URL that lyric locations are resolved against
    #[arg(long, global = true, value_name = "DIR_OR_URL")]
    pub base: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a track's lyrics and print them with their times
    Show(ShowArgs),

    /// Play a track against a simulated clock, printing each active line
    Play(PlayArgs),
}

/// Lyric resources of the track, as the player's catalog would list them
#[derive(Args, Debug, Clone)]
pub struct TrackArgs {
    /// Location of the timed lyric file (.lrc)
    #[arg(value_name = "TIMED")]
    pub timed: Option<String>,

    /// Location of the plain-text lyric file
    #[arg(long, value_name = "PLAIN")]
    pub plain: Option<String>,

    #[arg(long, default_value = "Untitled")]
    pub title: String,

    #[arg(long, default_value = "Unknown artist")]
    pub artist: String,
}

impl TrackArgs {
    pub fn to_track(&self) -> TrackInfo {
        TrackInfo::new(self.title.clone(), self.title.clone(), self.artist.clone())
            .with_lyrics(self.timed.as_deref(), self.plain.as_deref())
    }
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub track: TrackArgs,

    /// Track duration in seconds, used to spread plain lyrics over the track
    #[arg(long)]
    pub duration: Option<f64>,

    /// Print the sequence as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PlayArgs {
    #[command(flatten)]
    pub track: TrackArgs,

    /// Track duration in seconds
    #[arg(long)]
    pub duration: f64,

    /// Clock speed multiplier
    #[arg(long, default_value_t = 1.0)]
    pub speed: f64,

    /// Seek to this position right after the track starts
    #[arg(long, value_name = "SECONDS")]
    pub seek_to: Option<f64>,

    /// Lines to show before and after the active one
    #[arg(long, default_value_t = 0)]
    pub context: usize,
}
