pub mod credential;
pub mod media;

pub use credential::CredentialRecord;
pub use media::{HistoryEntry, MediaKind, NowPlaying, PlaybackItem};
