//! Status effect components.
//!
//! Effects own slices of `CombatCapabilities`: while active they re-assert
//! their suppression every tick, on removal they restore the base value.
//! At most one instance of each kind per combatant (re-application refreshes).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::CombatCapabilities;

/// Outgoing damage multiplier while ReduceDamage is active.
pub const REDUCED_DAMAGE_MULTIPLIER: f32 = 0.5;

// ============================================================================
// Effect Kinds
// ============================================================================

/// Closed set of runtime effects. Data-level tags map into this via
/// `StatusEffectSpec::instantiate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum EffectKind {
    /// Victim cannot declare parries
    DisableParry,
    /// Victim's outgoing damage is halved
    ReduceDamage,
}

impl EffectKind {
    pub fn label(&self) -> &'static str {
        match self {
            EffectKind::DisableParry => "Parry Seal",
            EffectKind::ReduceDamage => "Withering",
        }
    }
}

/// How an effect counts down.
///
/// Turn- and action-based durations tick on orchestration events, Custom
/// ticks on simulation time. Permanent never expires (cleared on teardown).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum DurationKind {
    OneAction,
    OneTurn,
    TwoTurns,
    ThreeTurns,
    Permanent,
    Custom,
}

// ============================================================================
// Status Effect Instance
// ============================================================================

/// A live effect on a combatant.
///
/// Counters only move downward after creation; `should_expire` is the single
/// expiry predicate for every duration kind.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct StatusEffect {
    pub kind: EffectKind,
    pub duration: DurationKind,
    pub actions_left: u32,
    pub turns_left: u32,
    pub seconds_left: f32,
}

impl StatusEffect {
    /// Create an effect with its counters initialised for `duration`.
    /// For `DurationKind::Custom` use [`StatusEffect::custom`].
    pub fn new(kind: EffectKind, duration: DurationKind) -> Self {
        let (actions_left, turns_left) = match duration {
            DurationKind::OneAction => (1, 0),
            DurationKind::OneTurn => (0, 1),
            DurationKind::TwoTurns => (0, 2),
            DurationKind::ThreeTurns => (0, 3),
            DurationKind::Permanent | DurationKind::Custom => (0, 0),
        };
        Self {
            kind,
            duration,
            actions_left,
            turns_left,
            seconds_left: 0.0,
        }
    }

    /// Create a wall-clock effect lasting `seconds` of simulation time.
    pub fn custom(kind: EffectKind, seconds: f32) -> Self {
        Self {
            kind,
            duration: DurationKind::Custom,
            actions_left: 0,
            turns_left: 0,
            seconds_left: seconds,
        }
    }

    /// Expiry predicate: the counter matching this effect's duration kind
    /// has run out. Permanent effects never expire here.
    pub fn should_expire(&self) -> bool {
        match self.duration {
            DurationKind::OneAction => self.actions_left == 0,
            DurationKind::OneTurn | DurationKind::TwoTurns | DurationKind::ThreeTurns => {
                self.turns_left == 0
            }
            DurationKind::Permanent => false,
            DurationKind::Custom => self.seconds_left <= 0.0,
        }
    }

    /// Suppress the owned capability slice.
    fn on_apply(&self, caps: &mut CombatCapabilities) {
        match self.kind {
            EffectKind::DisableParry => caps.can_parry = false,
            EffectKind::ReduceDamage => caps.damage_multiplier = REDUCED_DAMAGE_MULTIPLIER,
        }
    }

    /// Re-assert the suppression. Runs every tick while active, so nothing
    /// else can flip the capability back mid-effect.
    fn on_tick(&self, caps: &mut CombatCapabilities) {
        self.on_apply(caps);
    }

    /// Restore the base capability value.
    fn on_remove(&self, caps: &mut CombatCapabilities) {
        match self.kind {
            EffectKind::DisableParry => caps.can_parry = true,
            EffectKind::ReduceDamage => caps.damage_multiplier = 1.0,
        }
    }
}

// ============================================================================
// Per-Combatant Effect Set
// ============================================================================

/// Active effects on one combatant. Required by `Combatant`, so every
/// fighter carries an (initially empty) set.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct StatusEffects {
    pub effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn has(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|effect| effect.kind == kind)
    }

    pub fn get(&self, kind: EffectKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|effect| effect.kind == kind)
    }

    /// Apply an effect, enforcing at-most-one-per-kind.
    ///
    /// Duplicate kind refreshes the existing instance: each counter becomes
    /// the max of old and new, the stored duration kind stays. Returns true
    /// when a new instance was inserted, false on refresh.
    pub fn apply(&mut self, effect: StatusEffect, caps: &mut CombatCapabilities) -> bool {
        if let Some(existing) = self
            .effects
            .iter_mut()
            .find(|existing| existing.kind == effect.kind)
        {
            existing.actions_left = existing.actions_left.max(effect.actions_left);
            existing.turns_left = existing.turns_left.max(effect.turns_left);
            existing.seconds_left = existing.seconds_left.max(effect.seconds_left);
            existing.on_apply(caps);
            return false;
        }
        effect.on_apply(caps);
        self.effects.push(effect);
        true
    }

    /// Remove one effect kind early (running its restore hook).
    pub fn remove(&mut self, kind: EffectKind, caps: &mut CombatCapabilities) -> bool {
        let Some(index) = self.effects.iter().position(|effect| effect.kind == kind) else {
            return false;
        };
        let effect = self.effects.remove(index);
        effect.on_remove(caps);
        true
    }

    /// Per-tick advance: custom timers count down, every active effect
    /// re-asserts its suppression, then expired effects are evicted.
    /// Returns the kinds that expired this tick.
    pub fn update(&mut self, delta: f32, caps: &mut CombatCapabilities) -> Vec<EffectKind> {
        for effect in &mut self.effects {
            if effect.duration == DurationKind::Custom {
                effect.seconds_left = (effect.seconds_left - delta).max(0.0);
            }
        }
        for effect in &self.effects {
            effect.on_tick(caps);
        }
        self.evict_expired(caps)
    }

    /// An action of the owner completed: OneAction counters tick down.
    pub fn on_action_completed(&mut self, caps: &mut CombatCapabilities) -> Vec<EffectKind> {
        for effect in &mut self.effects {
            if effect.duration == DurationKind::OneAction {
                effect.actions_left = effect.actions_left.saturating_sub(1);
            }
        }
        self.evict_expired(caps)
    }

    /// A battle turn ended: turn counters tick down.
    pub fn on_turn_ended(&mut self, caps: &mut CombatCapabilities) -> Vec<EffectKind> {
        for effect in &mut self.effects {
            if matches!(
                effect.duration,
                DurationKind::OneTurn | DurationKind::TwoTurns | DurationKind::ThreeTurns
            ) {
                effect.turns_left = effect.turns_left.saturating_sub(1);
            }
        }
        self.evict_expired(caps)
    }

    /// Teardown: drop everything, restore hooks included. Returns removed kinds.
    pub fn clear_all(&mut self, caps: &mut CombatCapabilities) -> Vec<EffectKind> {
        let removed: Vec<EffectKind> = self.effects.iter().map(|effect| effect.kind).collect();
        for effect in self.effects.drain(..) {
            effect.on_remove(caps);
        }
        removed
    }

    /// Eviction order: predicate → restore hook → removal.
    fn evict_expired(&mut self, caps: &mut CombatCapabilities) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        let mut index = 0;
        while index < self.effects.len() {
            if self.effects[index].should_expire() {
                let effect = self.effects.remove(index);
                effect.on_remove(caps);
                expired.push(effect.kind);
            } else {
                index += 1;
            }
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps() -> CombatCapabilities {
        CombatCapabilities::default()
    }

    #[test]
    fn test_apply_suppresses_capability() {
        let mut effects = StatusEffects::default();
        let mut caps = caps();

        let inserted = effects.apply(
            StatusEffect::new(EffectKind::DisableParry, DurationKind::OneTurn),
            &mut caps,
        );
        assert!(inserted);
        assert!(!caps.can_parry);
        assert!(effects.has(EffectKind::DisableParry));
    }

    #[test]
    fn test_duplicate_apply_refreshes_instead_of_stacking() {
        let mut effects = StatusEffects::default();
        let mut caps = caps();

        effects.apply(
            StatusEffect::new(EffectKind::DisableParry, DurationKind::OneTurn),
            &mut caps,
        );
        // Прожимаем счётчик вниз до нуля не через истечение
        effects.effects[0].turns_left = 0;

        let inserted = effects.apply(
            StatusEffect::new(EffectKind::DisableParry, DurationKind::TwoTurns),
            &mut caps,
        );
        assert!(!inserted);
        assert_eq!(effects.effects.len(), 1);
        // Счётчик освежён до max, вид длительности остался исходным
        assert_eq!(effects.effects[0].turns_left, 2);
        assert_eq!(effects.effects[0].duration, DurationKind::OneTurn);
    }

    #[test]
    fn test_should_expire_matches_duration_kind() {
        let mut action = StatusEffect::new(EffectKind::DisableParry, DurationKind::OneAction);
        assert!(!action.should_expire());
        action.actions_left = 0;
        assert!(action.should_expire());

        let mut turn = StatusEffect::new(EffectKind::DisableParry, DurationKind::TwoTurns);
        turn.turns_left = 1;
        assert!(!turn.should_expire());
        turn.turns_left = 0;
        assert!(turn.should_expire());

        let permanent = StatusEffect::new(EffectKind::ReduceDamage, DurationKind::Permanent);
        assert!(!permanent.should_expire());

        let mut custom = StatusEffect::custom(EffectKind::ReduceDamage, 1.0);
        assert!(!custom.should_expire());
        custom.seconds_left = 0.0;
        assert!(custom.should_expire());
    }

    #[test]
    fn test_update_reasserts_suppression_every_tick() {
        let mut effects = StatusEffects::default();
        let mut caps = caps();

        effects.apply(StatusEffect::custom(EffectKind::DisableParry, 1.0), &mut caps);

        // Кто-то снаружи вернул способность — эффект должен передавить
        caps.can_parry = true;
        let expired = effects.update(0.1, &mut caps);
        assert!(expired.is_empty());
        assert!(!caps.can_parry);
    }

    #[test]
    fn test_custom_duration_expires_by_time() {
        let mut effects = StatusEffects::default();
        let mut caps = caps();

        effects.apply(StatusEffect::custom(EffectKind::ReduceDamage, 0.25), &mut caps);
        assert_eq!(caps.damage_multiplier, REDUCED_DAMAGE_MULTIPLIER);

        assert!(effects.update(0.1, &mut caps).is_empty());
        assert!(effects.update(0.1, &mut caps).is_empty());
        let expired = effects.update(0.1, &mut caps);
        assert_eq!(expired, vec![EffectKind::ReduceDamage]);
        assert_eq!(caps.damage_multiplier, 1.0);
        assert!(effects.effects.is_empty());
    }

    #[test]
    fn test_turn_counter_expiry_restores_capability() {
        let mut effects = StatusEffects::default();
        let mut caps = caps();

        effects.apply(
            StatusEffect::new(EffectKind::DisableParry, DurationKind::TwoTurns),
            &mut caps,
        );

        assert!(effects.on_turn_ended(&mut caps).is_empty());
        assert!(!caps.can_parry);

        let expired = effects.on_turn_ended(&mut caps);
        assert_eq!(expired, vec![EffectKind::DisableParry]);
        assert!(caps.can_parry);
    }

    #[test]
    fn test_one_action_expires_after_single_action() {
        let mut effects = StatusEffects::default();
        let mut caps = caps();

        effects.apply(
            StatusEffect::new(EffectKind::ReduceDamage, DurationKind::OneAction),
            &mut caps,
        );

        let expired = effects.on_action_completed(&mut caps);
        assert_eq!(expired, vec![EffectKind::ReduceDamage]);
        assert_eq!(caps.damage_multiplier, 1.0);
    }

    #[test]
    fn test_clear_all_runs_restore_hooks() {
        let mut effects = StatusEffects::default();
        let mut caps = caps();

        effects.apply(
            StatusEffect::new(EffectKind::DisableParry, DurationKind::Permanent),
            &mut caps,
        );
        effects.apply(StatusEffect::custom(EffectKind::ReduceDamage, 10.0), &mut caps);
        assert!(!caps.can_parry);
        assert_eq!(caps.damage_multiplier, REDUCED_DAMAGE_MULTIPLIER);

        let removed = effects.clear_all(&mut caps);
        assert_eq!(removed.len(), 2);
        assert!(caps.can_parry);
        assert_eq!(caps.damage_multiplier, 1.0);
        assert!(effects.effects.is_empty());
    }

    #[test]
    fn test_remove_single_kind() {
        let mut effects = StatusEffects::default();
        let mut caps = caps();

        effects.apply(
            StatusEffect::new(EffectKind::DisableParry, DurationKind::OneTurn),
            &mut caps,
        );
        assert!(effects.remove(EffectKind::DisableParry, &mut caps));
        assert!(caps.can_parry);
        assert!(!effects.remove(EffectKind::DisableParry, &mut caps));
    }
}
