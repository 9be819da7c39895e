//! Status effect bookkeeping: тики, ходовые границы, истечение по действию.

use bevy::prelude::*;

use crate::combat::{ActionCompleted, EffectExpired, StatusEffects, TurnEnded};
use crate::components::{Combatant, CombatCapabilities, Dead, Stamina};
use crate::logger::log;

/// System: Истечение эффектов «на одно действие».
///
/// Срабатывает только на реально исполненных действиях — отказ
/// (`performed: false`) счётчики не трогает.
pub fn apply_action_expiry(
    mut completed_events: EventReader<ActionCompleted>,
    mut combatants: Query<(&mut StatusEffects, &mut CombatCapabilities)>,
    mut expired_events: EventWriter<EffectExpired>,
) {
    for event in completed_events.read() {
        if !event.performed {
            continue;
        }
        let Ok((mut effects, mut caps)) = combatants.get_mut(event.performer) else {
            continue;
        };
        for kind in effects.on_action_completed(&mut caps) {
            expired_events.write(EffectExpired {
                target: event.performer,
                kind,
            });
            log(&format!(
                "⏳ «{}» на {:?} истёк (действие завершено)",
                kind.label(),
                event.performer
            ));
        }
    }
}

/// System: Граница хода — ходовые эффекты тикают, стамина восстанавливается.
///
/// Восстановление ровно одно на каждое событие TurnEnded, сколько бы тиков
/// ни прошло между ходами.
pub fn apply_turn_end(
    mut turn_events: EventReader<TurnEnded>,
    mut combatants: Query<
        (Entity, &mut Stamina, &mut StatusEffects, &mut CombatCapabilities),
        (With<Combatant>, Without<Dead>),
    >,
    mut expired_events: EventWriter<EffectExpired>,
) {
    for _ in turn_events.read() {
        for (entity, mut stamina, mut effects, mut caps) in combatants.iter_mut() {
            let regen = stamina.turn_regen;
            stamina.replenish(regen);

            for kind in effects.on_turn_ended(&mut caps) {
                expired_events.write(EffectExpired {
                    target: entity,
                    kind,
                });
                log(&format!(
                    "⏳ «{}» на {:?} истёк (конец хода)",
                    kind.label(),
                    entity
                ));
            }
        }
        log("🔄 Ход завершён: стамина восстановлена, ходовые эффекты тикнули");
    }
}

/// System: Посекундные таймеры эффектов и переутверждение подавлений.
///
/// Пока эффект активен, он каждый тик заново прописывает своё значение
/// в CombatCapabilities — сторонние записи в эти поля не переживают тик.
pub fn update_status_effects(
    time: Res<Time<Fixed>>,
    mut combatants: Query<(Entity, &mut StatusEffects, &mut CombatCapabilities), Without<Dead>>,
    mut expired_events: EventWriter<EffectExpired>,
) {
    let delta = time.delta_secs();

    for (entity, mut effects, mut caps) in combatants.iter_mut() {
        if effects.effects.is_empty() {
            continue;
        }
        for kind in effects.update(delta, &mut caps) {
            expired_events.write(EffectExpired {
                target: entity,
                kind,
            });
            log(&format!(
                "⏳ «{}» на {:?} истёк (таймер)",
                kind.label(),
                entity
            ));
        }
    }
}
