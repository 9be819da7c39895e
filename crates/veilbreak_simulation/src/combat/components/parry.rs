//! Parry window state machine.
//!
//! One window at a time for the whole battle (it's a duel). The attack
//! schedules a window, the window opens after the telegraph delay, the
//! defender's attempt latches inside it, and the close reads the latch once.
//!
//! **Latch discipline:** the latch resets at the Scheduled → Open transition,
//! never at resolution. A press after one window closes can therefore never
//! leak into the next window.

use bevy::prelude::*;

/// Default seconds a window stays open. Per-battle constant, tuned together
/// with boss telegraph animations.
pub const PARRY_WINDOW_DURATION: f32 = 0.25;

/// Phase of the single battle-wide parry window.
#[derive(Debug, Clone, PartialEq)]
pub enum ParryWindowState {
    Idle,
    /// Window announced; opens when `open_in` runs out
    Scheduled {
        defender: Entity,
        attacker: Entity,
        open_in: f32,
        duration: f32,
    },
    /// Window live; attempts latch until `remaining` runs out
    Open {
        defender: Entity,
        attacker: Entity,
        remaining: f32,
    },
}

/// Outcome of one director tick. At most one transition happens per tick.
#[derive(Debug, Clone, PartialEq)]
pub enum ParryTick {
    /// No window, or window still counting
    Quiet,
    Opened {
        defender: Entity,
    },
    Resolved(ParryResolution),
}

/// Read-once result of a closed window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParryResolution {
    pub defender: Entity,
    pub attacker: Entity,
    pub success: bool,
}

/// Battle-scoped resource owning the parry window.
#[derive(Resource, Debug)]
pub struct ParryDirector {
    pub window_duration: f32,
    state: ParryWindowState,
    success_latch: bool,
}

impl Default for ParryDirector {
    fn default() -> Self {
        Self::new(PARRY_WINDOW_DURATION)
    }
}

impl ParryDirector {
    pub fn new(window_duration: f32) -> Self {
        Self {
            window_duration,
            state: ParryWindowState::Idle,
            success_latch: false,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == ParryWindowState::Idle
    }

    pub fn is_open_for(&self, entity: Entity) -> bool {
        matches!(self.state, ParryWindowState::Open { defender, .. } if defender == entity)
    }

    /// Announce a window that opens `open_delay` seconds from now.
    /// Refused (false) while another window is pending — attacks that
    /// overlap a live window indicate a sequencing bug upstream.
    pub fn schedule_window(&mut self, defender: Entity, attacker: Entity, open_delay: f32) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = ParryWindowState::Scheduled {
            defender,
            attacker,
            open_in: open_delay,
            duration: self.window_duration,
        };
        true
    }

    /// Defender pressed parry. Latches only inside an open window owned by
    /// this defender; any other timing is a whiff and changes nothing.
    pub fn register_attempt(&mut self, defender: Entity) -> bool {
        if self.is_open_for(defender) {
            self.success_latch = true;
            true
        } else {
            false
        }
    }

    /// Advance the window by one fixed step.
    pub fn tick(&mut self, delta: f32) -> ParryTick {
        match self.state.clone() {
            ParryWindowState::Idle => ParryTick::Quiet,
            ParryWindowState::Scheduled {
                defender,
                attacker,
                open_in,
                duration,
            } => {
                let open_in = open_in - delta;
                if open_in > 0.0 {
                    self.state = ParryWindowState::Scheduled {
                        defender,
                        attacker,
                        open_in,
                        duration,
                    };
                    return ParryTick::Quiet;
                }
                // Открытие окна — единственное место сброса защёлки
                self.success_latch = false;
                self.state = ParryWindowState::Open {
                    defender,
                    attacker,
                    remaining: duration,
                };
                ParryTick::Opened { defender }
            }
            ParryWindowState::Open {
                defender,
                attacker,
                remaining,
            } => {
                let remaining = remaining - delta;
                if remaining > 0.0 {
                    self.state = ParryWindowState::Open {
                        defender,
                        attacker,
                        remaining,
                    };
                    return ParryTick::Quiet;
                }
                self.state = ParryWindowState::Idle;
                ParryTick::Resolved(ParryResolution {
                    defender,
                    attacker,
                    success: self.success_latch,
                })
            }
        }
    }

    /// Teardown / death cleanup.
    pub fn reset(&mut self) {
        self.state = ParryWindowState::Idle;
        self.success_latch = false;
    }
}
