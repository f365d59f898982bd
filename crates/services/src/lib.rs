//! Collaborator services around the engine.
//!
//! The core never talks to the outside world. Scores, player identity,
//! geolocation and audio output are handled here behind small traits so a
//! host can swap in remote implementations.
//!
//! - [`leaderboard`]: [`LeaderboardService`], a JSON-file board and an offline fallback wrapper
//! - [`geo`]: best-effort geolocation with an "unknown" default
//! - [`session`]: stored player id, name and cached location
//! - [`presence`]: online sessions with heartbeats and a live ranking
//! - [`audio`]: an [`AudioNotifier`](crate::core::AudioNotifier) that logs cues

pub mod audio;
pub mod error;
pub mod geo;
pub mod leaderboard;
pub mod presence;
pub mod session;

pub use bonus_tetris_core as core;
pub use bonus_tetris_types as types;

pub use audio::TracingAudio;
pub use error::ServiceError;
pub use geo::{lookup_or_unknown, FixedLocation, GeoLocation, GeoLocator, NoLocator};
pub use leaderboard::{
    default_scores_path, FallbackLeaderboard, LeaderboardService, LocalLeaderboard, PlayerRecord,
    ServiceStatus, LOCAL_CAPACITY, LOCAL_ORIGIN,
};
pub use presence::{
    top_with_me, ActivePlayer, ActiveSessions, LocalSessions, Presence, RankedPlayer,
    DISPLAY_TOP, HEARTBEAT_INTERVAL_MS, SESSION_TIMEOUT_MS,
};
pub use session::{default_player_id_path, generate_player_id, SessionContext, PLAYER_ID_FILE};
