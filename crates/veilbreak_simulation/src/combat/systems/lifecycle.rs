//! Battle lifecycle: смерть и снос боя.

use bevy::prelude::*;

use crate::combat::{
    AttackSequence, BattleTeardown, BossAttackSequence, CancelledByParry, CharacterDied,
    DamageDealt, EffectRemoved, ParryDirector, ParryTradeSequence, QteDirector, SkillSequence,
    StatusEffects,
};
use crate::components::{Animator, Combatant, CombatCapabilities, Dead};
use crate::logger::log;

/// System: Фиксация смертей.
///
/// `CharacterDied` уходит ровно один раз на бойца; повторные летальные
/// события того же тика отбрасываются. Sequence-компоненты умершего НЕ
/// снимаются — начатые действия доигрываются, отменяет только teardown.
pub fn handle_deaths(
    mut damage_events: EventReader<DamageDealt>,
    victims: Query<Has<Dead>>,
    mut commands: Commands,
    mut died_events: EventWriter<CharacterDied>,
) {
    let mut died_this_tick: Vec<Entity> = Vec::new();

    for event in damage_events.read() {
        if !event.target_died {
            continue;
        }
        let Ok(already_dead) = victims.get(event.target) else {
            continue;
        };
        if already_dead || died_this_tick.contains(&event.target) {
            continue;
        }

        died_this_tick.push(event.target);
        commands.entity(event.target).insert(Dead);
        died_events.write(CharacterDied {
            entity: event.target,
            killer: Some(event.attacker),
        });
        log(&format!(
            "☠️ {:?} погиб (добил {:?})",
            event.target, event.attacker
        ));
    }
}

/// System: Снос боя (BattleTeardown).
///
/// Единственный примитив отмены: снимает все sequence-компоненты без
/// завершающих событий, сбрасывает директоров, глушит аниматоры и убирает
/// все статус-эффекты с восстановлением способностей.
pub fn handle_teardown(
    mut teardown_events: EventReader<BattleTeardown>,
    mut parry_director: ResMut<ParryDirector>,
    mut qte_director: ResMut<QteDirector>,
    mut combatants: Query<
        (Entity, &mut Animator, &mut StatusEffects, &mut CombatCapabilities),
        With<Combatant>,
    >,
    mut commands: Commands,
    mut removed_events: EventWriter<EffectRemoved>,
) {
    if teardown_events.is_empty() {
        return;
    }
    teardown_events.clear();

    parry_director.reset();
    qte_director.reset();

    for (entity, mut animator, mut effects, mut caps) in combatants.iter_mut() {
        commands.entity(entity).remove::<(
            AttackSequence,
            SkillSequence,
            BossAttackSequence,
            ParryTradeSequence,
            CancelledByParry,
        )>();
        animator.stop();

        for kind in effects.clear_all(&mut caps) {
            removed_events.write(EffectRemoved {
                target: entity,
                kind,
            });
        }
    }

    log("🧹 Бой снесён: действия отменены, директора и эффекты сброшены");
}
