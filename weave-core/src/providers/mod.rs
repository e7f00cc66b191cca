//! Built-in lyric sources.

pub mod file;
pub mod memory;

pub use file::FileLyricsSource;
pub use memory::MemoryLyricsSource;
