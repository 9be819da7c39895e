//! Quick-time event prompts.
//!
//! One prompt at a time: attack data spaces its marks wider than the prompt
//! duration, so overlap means broken data, not a playable state. A prompt
//! resolves exactly once — by matching input, mismatching input, or timeout.

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Seconds the player has to answer a prompt.
pub const QTE_PROMPT_DURATION: f32 = 0.35;

/// Face buttons a prompt can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QteButton {
    North,
    South,
    East,
    West,
}

impl QteButton {
    pub const ALL: [QteButton; 4] = [
        QteButton::North,
        QteButton::South,
        QteButton::East,
        QteButton::West,
    ];

    /// Roll the expected button from the battle RNG.
    pub fn roll(rng: &mut ChaCha8Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn label(&self) -> &'static str {
        match self {
            QteButton::North => "North",
            QteButton::South => "South",
            QteButton::East => "East",
            QteButton::West => "West",
        }
    }
}

/// A live prompt awaiting input.
#[derive(Debug, Clone, PartialEq)]
pub struct QtePrompt {
    pub performer: Entity,
    pub expected: QteButton,
    pub remaining: f32,
}

/// One-shot resolution of a prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QteOutcome {
    pub performer: Entity,
    pub success: bool,
}

/// Battle-scoped resource owning the prompt slot.
#[derive(Resource, Debug)]
pub struct QteDirector {
    pub prompt_duration: f32,
    prompt: Option<QtePrompt>,
}

impl Default for QteDirector {
    fn default() -> Self {
        Self::new(QTE_PROMPT_DURATION)
    }
}

impl QteDirector {
    pub fn new(prompt_duration: f32) -> Self {
        Self {
            prompt_duration,
            prompt: None,
        }
    }

    pub fn active_prompt(&self) -> Option<&QtePrompt> {
        self.prompt.as_ref()
    }

    /// Open a prompt for `performer`. Refused while one is already live.
    pub fn open_prompt(&mut self, performer: Entity, expected: QteButton) -> bool {
        if self.prompt.is_some() {
            return false;
        }
        self.prompt = Some(QtePrompt {
            performer,
            expected,
            remaining: self.prompt_duration,
        });
        true
    }

    /// Player pressed a button. Consumes the prompt; input with no prompt
    /// live is silently dropped (mashing between marks is legal).
    pub fn register_input(&mut self, button: QteButton) -> Option<QteOutcome> {
        let prompt = self.prompt.take()?;
        Some(QteOutcome {
            performer: prompt.performer,
            success: prompt.expected == button,
        })
    }

    /// Advance the prompt timer. Timeout resolves as failure.
    pub fn tick(&mut self, delta: f32) -> Option<QteOutcome> {
        let prompt = self.prompt.as_mut()?;
        prompt.remaining -= delta;
        if prompt.remaining > 0.0 {
            return None;
        }
        let prompt = self.prompt.take()?;
        Some(QteOutcome {
            performer: prompt.performer,
            success: false,
        })
    }

    /// Teardown / death cleanup.
    pub fn reset(&mut self) {
        self.prompt = None;
    }
}
