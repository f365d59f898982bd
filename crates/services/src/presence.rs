//! Who is playing right now.
//!
//! A player registers a session when a game starts, refreshes it with a
//! heartbeat carrying the current score, and removes it on exit. Sessions
//! whose last heartbeat is older than [`SESSION_TIMEOUT_MS`] no longer count
//! as online. Times are host milliseconds passed in by the caller.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::types::Difficulty;

/// How often a running game refreshes its session.
pub const HEARTBEAT_INTERVAL_MS: u64 = 10_000;

/// A session without a heartbeat for this long is considered gone.
pub const SESSION_TIMEOUT_MS: u64 = 30_000;

/// Length of the "top players" part of the online list.
pub const DISPLAY_TOP: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePlayer {
    pub player_id: String,
    pub player_name: String,
    pub current_score: u64,
    pub difficulty: Difficulty,
    pub last_heartbeat_ms: u64,
}

/// An online player with its 1-based position by current score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPlayer {
    pub position: usize,
    pub player: ActivePlayer,
}

pub trait ActiveSessions {
    /// Register (or replace) a session. Stale sessions are dropped first.
    fn start_session(&mut self, player: ActivePlayer) -> Result<(), ServiceError>;

    /// Refresh a session with the current score. Returns false if there was
    /// no session to refresh.
    fn heartbeat(&mut self, player_id: &str, score: u64, now_ms: u64)
        -> Result<bool, ServiceError>;

    fn end_session(&mut self, player_id: &str) -> Result<(), ServiceError>;

    /// Live sessions, highest current score first.
    fn ranked_players(&mut self, now_ms: u64) -> Result<Vec<ActivePlayer>, ServiceError>;

    fn my_rank(&mut self, player_id: &str, now_ms: u64) -> Result<Option<usize>, ServiceError> {
        Ok(self
            .ranked_players(now_ms)?
            .iter()
            .position(|p| p.player_id == player_id)
            .map(|i| i + 1))
    }
}

/// The top [`DISPLAY_TOP`] players, plus `player_id` at the end when it
/// ranks below them.
pub fn top_with_me(ranked: &[ActivePlayer], player_id: &str) -> Vec<RankedPlayer> {
    let mut shown: Vec<RankedPlayer> = ranked
        .iter()
        .take(DISPLAY_TOP)
        .enumerate()
        .map(|(i, player)| RankedPlayer {
            position: i + 1,
            player: player.clone(),
        })
        .collect();
    if let Some(i) = ranked.iter().position(|p| p.player_id == player_id) {
        if i >= DISPLAY_TOP {
            shown.push(RankedPlayer {
                position: i + 1,
                player: ranked[i].clone(),
            });
        }
    }
    shown
}

/// Sessions of a single process, e.g. several local players or tests.
#[derive(Debug, Clone)]
pub struct LocalSessions {
    sessions: HashMap<String, ActivePlayer>,
    timeout_ms: u64,
}

impl Default for LocalSessions {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSessions {
    pub fn new() -> Self {
        Self::with_timeout(SESSION_TIMEOUT_MS)
    }

    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            sessions: HashMap::new(),
            timeout_ms,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn is_live(&self, player: &ActivePlayer, now_ms: u64) -> bool {
        now_ms.saturating_sub(player.last_heartbeat_ms) <= self.timeout_ms
    }

    fn cleanup(&mut self, now_ms: u64) {
        let timeout_ms = self.timeout_ms;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, p| now_ms.saturating_sub(p.last_heartbeat_ms) <= timeout_ms);
        let dropped = before - self.sessions.len();
        if dropped > 0 {
            debug!(dropped, "inactive sessions removed");
        }
    }
}

impl ActiveSessions for LocalSessions {
    fn start_session(&mut self, player: ActivePlayer) -> Result<(), ServiceError> {
        if player.player_id.is_empty() {
            return Err(ServiceError::InvalidRecord("missing player id".to_string()));
        }
        self.cleanup(player.last_heartbeat_ms);
        self.sessions.insert(player.player_id.clone(), player);
        Ok(())
    }

    fn heartbeat(
        &mut self,
        player_id: &str,
        score: u64,
        now_ms: u64,
    ) -> Result<bool, ServiceError> {
        let Some(player) = self.sessions.get_mut(player_id) else {
            return Ok(false);
        };
        player.current_score = score;
        player.last_heartbeat_ms = now_ms;
        Ok(true)
    }

    fn end_session(&mut self, player_id: &str) -> Result<(), ServiceError> {
        self.sessions.remove(player_id);
        Ok(())
    }

    fn ranked_players(&mut self, now_ms: u64) -> Result<Vec<ActivePlayer>, ServiceError> {
        let mut live: Vec<ActivePlayer> = self
            .sessions
            .values()
            .filter(|p| self.is_live(p, now_ms))
            .cloned()
            .collect();
        live.sort_by(|a, b| {
            b.current_score
                .cmp(&a.current_score)
                .then_with(|| a.player_id.cmp(&b.player_id))
        });
        Ok(live)
    }
}

/// One player's session on an [`ActiveSessions`] backend.
///
/// Backend failures are logged and swallowed; being listed online is never
/// worth interrupting a game for.
pub struct Presence<S> {
    sessions: S,
    player_id: String,
    active: bool,
    last_beat_ms: u64,
}

impl<S: ActiveSessions> Presence<S> {
    pub fn new(sessions: S, player_id: impl Into<String>) -> Self {
        Self {
            sessions,
            player_id: player_id.into(),
            active: false,
            last_beat_ms: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    /// Go online. Does nothing if already online.
    pub fn start(&mut self, name: &str, difficulty: Difficulty, score: u64, now_ms: u64) {
        if self.active {
            return;
        }
        let player = ActivePlayer {
            player_id: self.player_id.clone(),
            player_name: name.to_string(),
            current_score: score,
            difficulty,
            last_heartbeat_ms: now_ms,
        };
        match self.sessions.start_session(player) {
            Ok(()) => {
                self.active = true;
                self.last_beat_ms = now_ms;
                debug!(player_id = %self.player_id, "session started");
            }
            Err(err) => warn!(%err, "session not started"),
        }
    }

    /// Send a heartbeat once [`HEARTBEAT_INTERVAL_MS`] has passed since the last one.
    pub fn update(&mut self, score: u64, now_ms: u64) {
        if !self.active || now_ms.saturating_sub(self.last_beat_ms) < HEARTBEAT_INTERVAL_MS {
            return;
        }
        self.last_beat_ms = now_ms;
        match self.sessions.heartbeat(&self.player_id, score, now_ms) {
            Ok(true) => {}
            Ok(false) => {
                warn!(player_id = %self.player_id, "session expired");
                self.active = false;
            }
            Err(err) => warn!(%err, "heartbeat failed"),
        }
    }

    pub fn end(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Err(err) = self.sessions.end_session(&self.player_id) {
            warn!(%err, "session not ended");
        }
    }

    /// Online list for display: top players plus this player.
    pub fn board(&mut self, now_ms: u64) -> Vec<RankedPlayer> {
        match self.sessions.ranked_players(now_ms) {
            Ok(ranked) => top_with_me(&ranked, &self.player_id),
            Err(err) => {
                warn!(%err, "online players unavailable");
                Vec::new()
            }
        }
    }

    pub fn my_rank(&mut self, now_ms: u64) -> Option<usize> {
        self.sessions.my_rank(&self.player_id, now_ms).ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, score: u64, now_ms: u64) -> ActivePlayer {
        ActivePlayer {
            player_id: id.to_string(),
            player_name: id.to_uppercase(),
            current_score: score,
            difficulty: Difficulty::Medium,
            last_heartbeat_ms: now_ms,
        }
    }

    #[test]
    fn test_ranked_by_score() {
        let mut sessions = LocalSessions::new();
        sessions.start_session(player("a", 100, 0)).unwrap();
        sessions.start_session(player("b", 300, 0)).unwrap();
        sessions.start_session(player("c", 200, 0)).unwrap();

        let ids: Vec<_> = sessions
            .ranked_players(0)
            .unwrap()
            .into_iter()
            .map(|p| p.player_id)
            .collect();
        assert_eq!(ids, ["b", "c", "a"]);
        assert_eq!(sessions.my_rank("a", 0).unwrap(), Some(3));
        assert_eq!(sessions.my_rank("zz", 0).unwrap(), None);
    }

    #[test]
    fn test_stale_sessions_drop_out() {
        let mut sessions = LocalSessions::new();
        sessions.start_session(player("old", 900, 0)).unwrap();
        sessions.start_session(player("new", 10, 20_000)).unwrap();

        assert_eq!(sessions.ranked_players(30_000).unwrap().len(), 2);
        let live = sessions.ranked_players(30_001).unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].player_id, "new");

        // a new registration purges what has timed out
        sessions.start_session(player("late", 0, 40_000)).unwrap();
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn test_heartbeat_and_end() {
        let mut sessions = LocalSessions::new();
        sessions.start_session(player("a", 0, 0)).unwrap();
        assert!(sessions.heartbeat("a", 500, 25_000).unwrap());
        assert!(!sessions.heartbeat("ghost", 1, 25_000).unwrap());
        assert_eq!(sessions.ranked_players(50_000).unwrap()[0].current_score, 500);

        sessions.end_session("a").unwrap();
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_top_with_me_appends_low_rank() {
        let ranked: Vec<_> = (0..12u64)
            .map(|i| player(&format!("p{i:02}"), 1_000 - i, 0))
            .collect();

        let shown = top_with_me(&ranked, "p11");
        assert_eq!(shown.len(), DISPLAY_TOP + 1);
        assert_eq!(shown.last().map(|r| r.position), Some(12));

        let shown = top_with_me(&ranked, "p03");
        assert_eq!(shown.len(), DISPLAY_TOP);
        assert_eq!(shown[3].position, 4);
    }

    #[test]
    fn test_presence_heartbeat_interval() {
        let mut presence = Presence::new(LocalSessions::new(), "me");
        presence.update(5, 0);
        assert!(!presence.is_active());

        presence.start("Me", Difficulty::Hard, 0, 1_000);
        presence.start("Me", Difficulty::Hard, 0, 2_000);
        assert!(presence.is_active());

        presence.update(400, 10_999);
        assert_eq!(presence.board(11_000)[0].player.current_score, 0);
        presence.update(400, 11_000);
        assert_eq!(presence.board(11_000)[0].player.current_score, 400);
        assert_eq!(presence.my_rank(11_000), Some(1));

        presence.end();
        assert!(!presence.is_active());
        assert!(presence.sessions().is_empty());
        assert_eq!(presence.my_rank(11_000), None);
    }
}
