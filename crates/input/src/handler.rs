//! Input repeat handler.
//!
//! Works on [`GameAction`]s so every input source (keyboard, touch buttons,
//! scripted drivers) gets the same repeat behavior. A held action fires once on
//! press, again after the initial delay of its class, then once per repeat
//! interval until released.
//!
//! Supports terminals that do not emit key release events by using a timeout:
//! if no press arrives for `key_release_timeout_ms`, held actions are dropped.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::types::{
    GameAction, SPECIAL_INITIAL_DELAY_MS, SPECIAL_REPEAT_MS, STANDARD_INITIAL_DELAY_MS,
    STANDARD_REPEAT_MS,
};

/// Repeat timing class of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionClass {
    /// Left, right and down.
    Standard,
    /// Rotate and hard drop.
    Special,
}

impl ActionClass {
    /// Class of a repeatable action; `None` for one-shot actions.
    pub fn of(action: GameAction) -> Option<Self> {
        match action {
            GameAction::MoveLeft | GameAction::MoveRight | GameAction::MoveDown => {
                Some(ActionClass::Standard)
            }
            GameAction::Rotate | GameAction::HardDrop => Some(ActionClass::Special),
            GameAction::Pause | GameAction::Restart => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatPolicy {
    pub initial_delay_ms: u32,
    pub repeat_interval_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeatConfig {
    pub standard: RepeatPolicy,
    pub special: RepeatPolicy,
    pub key_release_timeout_ms: u32,
}

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state. OS auto-repeat presses keep it alive.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            standard: RepeatPolicy {
                initial_delay_ms: STANDARD_INITIAL_DELAY_MS,
                repeat_interval_ms: STANDARD_REPEAT_MS,
            },
            special: RepeatPolicy {
                initial_delay_ms: SPECIAL_INITIAL_DELAY_MS,
                repeat_interval_ms: SPECIAL_REPEAT_MS,
            },
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }
}

impl RepeatConfig {
    pub fn policy(&self, class: ActionClass) -> RepeatPolicy {
        match class {
            ActionClass::Standard => self.standard,
            ActionClass::Special => self.special,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Held {
    action: GameAction,
    held_ms: u32,
    next_fire_ms: u32,
}

/// Held-action slots. Left/right share one slot so the newest direction wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Horizontal,
    Down,
    Special,
}

impl Slot {
    fn of(action: GameAction) -> Option<Self> {
        match action {
            GameAction::MoveLeft | GameAction::MoveRight => Some(Slot::Horizontal),
            GameAction::MoveDown => Some(Slot::Down),
            GameAction::Rotate | GameAction::HardDrop => Some(Slot::Special),
            GameAction::Pause | GameAction::Restart => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputHandler {
    config: RepeatConfig,
    horizontal: Option<Held>,
    down: Option<Held>,
    special: Option<Held>,
    idle_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(RepeatConfig::default())
    }

    pub fn with_config(config: RepeatConfig) -> Self {
        Self {
            config,
            horizontal: None,
            down: None,
            special: None,
            idle_ms: 0,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.config.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn config(&self) -> &RepeatConfig {
        &self.config
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Held> {
        match slot {
            Slot::Horizontal => &mut self.horizontal,
            Slot::Down => &mut self.down,
            Slot::Special => &mut self.special,
        }
    }

    /// Register a press. Returns the action to apply now, if any.
    ///
    /// Pressing an action that is already held (terminal auto-repeat) only
    /// keeps it alive; the handler's own schedule produces the repeats.
    pub fn press(&mut self, action: GameAction) -> Option<GameAction> {
        let (Some(slot), Some(class)) = (Slot::of(action), ActionClass::of(action)) else {
            return Some(action);
        };
        self.idle_ms = 0;

        let policy = self.config.policy(class);
        let held = self.slot_mut(slot);
        if held.is_some_and(|h| h.action == action) {
            return None;
        }
        *held = Some(Held {
            action,
            held_ms: 0,
            next_fire_ms: policy.initial_delay_ms,
        });
        Some(action)
    }

    pub fn release(&mut self, action: GameAction) {
        let Some(slot) = Slot::of(action) else {
            return;
        };
        let held = self.slot_mut(slot);
        if held.is_some_and(|h| h.action == action) {
            *held = None;
        }
    }

    pub fn is_held(&self, action: GameAction) -> bool {
        [self.horizontal, self.down, self.special]
            .iter()
            .flatten()
            .any(|h| h.action == action)
    }

    /// Advance held actions by `elapsed_ms` and collect due repeats.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<GameAction, 32> {
        let mut actions = ArrayVec::<GameAction, 32>::new();

        self.idle_ms = self.idle_ms.saturating_add(elapsed_ms);
        if self.idle_ms > self.config.key_release_timeout_ms {
            self.reset();
            return actions;
        }

        let config = self.config;
        for held in [&mut self.horizontal, &mut self.down, &mut self.special]
            .into_iter()
            .flatten()
        {
            let Some(class) = ActionClass::of(held.action) else {
                continue;
            };
            let interval = config.policy(class).repeat_interval_ms.max(1);
            held.held_ms = held.held_ms.saturating_add(elapsed_ms);
            while held.held_ms >= held.next_fire_ms {
                if actions.try_push(held.action).is_err() {
                    break;
                }
                held.next_fire_ms = held.next_fire_ms.saturating_add(interval);
            }
        }

        actions
    }

    pub fn reset(&mut self) {
        self.horizontal = None;
        self.down = None;
        self.special = None;
        self.idle_ms = 0;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
