//! HTTP clients for the services behind the now-watching badge.
//!
//! [`trakt`] covers OAuth token handling and the playback/history endpoints of
//! the tracking provider; [`tmdb`] resolves posters and descriptive metadata
//! from the catalog. Both are reachable through the [`traits`] seams so the
//! resolvers in `nowwatching-core` can be driven by fakes.

pub mod fetch;
pub mod tmdb;
pub mod traits;
pub mod trakt;

pub use fetch::Fetched;
