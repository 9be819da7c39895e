//! Battle action sequences.
//!
//! One action = one sequence component inserted on the performer for the
//! duration of a single execution, removed at the completion signal. Created
//! per invocation, never pooled. Removal is also the scoped "unsubscribe":
//! a sequence only consumes QTE/parry events while its component exists.

use bevy::prelude::*;

use crate::data::{AttackAnimationData, BossAttackData, SkillData};

/// Action-type tag. Boss parry trade intercepts Light/Heavy only;
/// skills are immune by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ActionKind {
    LightAttack,
    HeavyAttack,
    Skill,
}

impl ActionKind {
    pub fn is_interceptable(&self) -> bool {
        matches!(self, ActionKind::LightAttack | ActionKind::HeavyAttack)
    }
}

/// Why a requested action did not execute. Travels with `ActionRefused`;
/// the pipeline still reaches `ActionCompleted { performed: false }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefusalReason {
    InsufficientStamina { cost: f32, available: f32 },
    /// Performer already has a sequence in flight
    ActionInFlight,
    PerformerDead,
    TargetDead,
    /// Skill index outside the performer's action set
    UnknownSkill { index: usize },
}

// ============================================================================
// Player Attack Sequence
// ============================================================================

/// In-flight player attack, driven off the animator's normalized progress.
///
/// QTE marks fire in order as progress passes them; the hit frame applies
/// damage exactly once; progress ≥ 1.0 completes the action.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct AttackSequence {
    pub kind: ActionKind,
    pub data: AttackAnimationData,
    pub target: Entity,
    /// Index of the next QTE mark that has not fired yet
    pub next_qte_mark: usize,
    /// Successes accumulated while this sequence is alive
    pub successful_qtes: u32,
    /// Hit frame already processed (damage applies at most once)
    pub hit_done: bool,
}

impl AttackSequence {
    pub fn new(kind: ActionKind, data: AttackAnimationData, target: Entity) -> Self {
        Self {
            kind,
            data,
            target,
            next_qte_mark: 0,
            successful_qtes: 0,
            hit_done: false,
        }
    }

    /// Damage at the hit instant: base × qte_multiplier^successes.
    /// The performer's own damage multiplier is applied on top by the caller.
    pub fn hit_damage(&self) -> f32 {
        self.data.damage * self.data.qte_success_multiplier.powi(self.successful_qtes as i32)
    }
}

// ============================================================================
// Player Skill Sequence
// ============================================================================

/// In-flight player skill. Damage and self-heal were already applied at
/// execute time; the sequence only waits for the named animation state to
/// finish before signaling completion.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SkillSequence {
    pub data: SkillData,
    pub target: Entity,
}

// ============================================================================
// Boss Attack Sequence
// ============================================================================

/// Phase of an in-flight boss attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum BossAttackPhase {
    /// Parry window not yet scheduled with the director
    Schedule,
    /// Window scheduled/open; waiting for its resolution
    AwaitResolution,
    /// Outcome applied; waiting out the rest of the clip
    Recover,
}

/// In-flight boss attack (regular turn attack or parry-trade counter).
///
/// Strike order is fixed: the parry window resolves first, damage applies
/// after, keyed off that single resolution — never re-evaluated.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct BossAttackSequence {
    pub data: BossAttackData,
    pub target: Entity,
    pub phase: BossAttackPhase,
    /// Counter after a successful parry trade (no turn-counter bookkeeping)
    pub is_counter: bool,
}

impl BossAttackSequence {
    pub fn new(data: BossAttackData, target: Entity) -> Self {
        Self {
            data,
            target,
            phase: BossAttackPhase::Schedule,
            is_counter: false,
        }
    }

    pub fn counter(data: BossAttackData, target: Entity) -> Self {
        Self {
            data,
            target,
            phase: BossAttackPhase::Schedule,
            is_counter: true,
        }
    }
}

// ============================================================================
// Parry Trade
// ============================================================================

/// Boss intercepted a player attack and is winding up the counter.
/// While this component exists the boss ignores new interception chances.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ParryTradeSequence {
    pub victim: Entity,
    /// Seconds until the counter-attack launches
    pub counter_in: f32,
}

/// Marker on a performer whose in-flight attack was intercepted.
///
/// Read exactly once, at the hit frame: damage is skipped and the flag is
/// cleared. Teardown clears it too, so it can never leak into a later attack.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct CancelledByParry;
