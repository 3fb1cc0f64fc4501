//! Game session context.
//!
//! Everything the input, drop, spawn and collision handlers share lives in
//! [`GameSession`]. The type only tracks state transitions; entity creation and
//! removal are done by the systems that call into it.

use std::time::Duration;

use bevy::prelude::*;

use crate::catalog::Rank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Playing,
    /// Terminal until the session is reset.
    GameOver,
}

/// The fruit currently positioned by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeldFruit {
    pub entity: Entity,
    pub rank: Rank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    pub drops: u32,
    pub merges: u32,
    pub highest_rank: Rank,
}

/// Post-drop lock window, anchored at the elapsed time of the drop frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cooldown {
    started: Duration,
    length: Duration,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct GameSession {
    held: Option<HeldFruit>,
    next: Option<Rank>,
    action_locked: bool,
    dragging: bool,
    cooldown: Option<Cooldown>,
    phase: SessionPhase,
    stats: SessionStats,
}

impl GameSession {
    pub fn held(&self) -> Option<HeldFruit> {
        self.held
    }

    /// Rank shown in the preview widget.
    pub fn next_preview(&self) -> Option<Rank> {
        self.next
    }

    pub fn is_locked(&self) -> bool {
        self.action_locked
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn accepts_input(&self) -> bool {
        !self.action_locked && self.phase == SessionPhase::Playing
    }

    /// Rank for the next held fruit: the preview if one exists, otherwise a fresh
    /// draw. A new preview is drawn afterwards in both cases.
    pub fn take_spawn_rank(&mut self, mut draw: impl FnMut() -> Rank) -> Rank {
        let rank = match self.next.take() {
            Some(r) => r,
            None => draw(),
        };
        self.next = Some(draw());
        rank
    }

    /// Seed the preview slot without spawning (startup transient).
    pub fn seed_preview(&mut self, rank: Rank) {
        if self.next.is_none() {
            self.next = Some(rank);
        }
    }

    pub fn hold(&mut self, held: HeldFruit) {
        self.held = Some(held);
    }

    /// Gesture start. Returns whether the gesture was accepted.
    pub fn press(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.dragging = true;
        true
    }

    /// Whether pointer movement should currently move the held fruit.
    pub fn can_steer(&self) -> bool {
        self.dragging && self.accepts_input() && self.held.is_some()
    }

    /// Gesture end. Returns true when the release completes a press and a drop should follow.
    pub fn release(&mut self) -> bool {
        if !self.dragging || !self.accepts_input() {
            return false;
        }
        self.dragging = false;
        self.held.is_some()
    }

    /// Abort the gesture without dropping.
    pub fn cancel(&mut self) {
        self.dragging = false;
    }

    /// Hand the held fruit over to the simulation and start the settle cooldown
    /// at `now` (elapsed clock time of the drop frame).
    pub fn drop_held(&mut self, cooldown: Duration, now: Duration) -> Option<HeldFruit> {
        if !self.accepts_input() {
            return None;
        }
        let held = self.held.take()?;
        self.action_locked = true;
        self.cooldown = Some(Cooldown {
            started: now,
            length: cooldown,
        });
        self.stats.drops += 1;
        self.stats.highest_rank = self.stats.highest_rank.max(held.rank);
        Some(held)
    }

    /// Check the cooldown against the clock. Returns true once, on the first
    /// call where at least the full cooldown has passed since the drop; the
    /// caller then spawns the next fruit and calls [`Self::unlock`].
    pub fn cooldown_finished(&mut self, now: Duration) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        let Some(cd) = self.cooldown else {
            return false;
        };
        if now.saturating_sub(cd.started) < cd.length {
            return false;
        }
        self.cooldown = None;
        true
    }

    pub fn unlock(&mut self) {
        if self.phase == SessionPhase::Playing {
            self.action_locked = false;
        }
    }

    pub fn record_merge(&mut self, into: Rank) {
        self.stats.merges += 1;
        self.stats.highest_rank = self.stats.highest_rank.max(into);
    }

    /// Enter the terminal state. Returns false if the session was already over.
    pub fn enter_game_over(&mut self) -> bool {
        if self.phase == SessionPhase::GameOver {
            return false;
        }
        self.phase = SessionPhase::GameOver;
        self.action_locked = true;
        self.dragging = false;
        self.cooldown = None;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
