//! Boss turn execution and the parry trade.
//!
//! Ход босса — это BossAttackSequence-компонент на его entity; перехват
//! атаки игрока — ParryTradeSequence. Удаление компонента = конец подписки
//! соответствующей логики, ручного state-чистилища нет.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::BossAi;
use crate::combat::{
    ActionCompleted, ActionRefused, ActionStarted, AttackIntercepted, BossAttackChosen,
    BossAttackPhase, BossAttackSequence, BossTurnRequested, CancelledByParry, DamageDealt,
    EffectApplied, ParryDirector, ParryTradeSequence, ParryWindowResolved, RefusalReason,
    StatusEffects,
};
use crate::components::{Animator, Boss, CombatCapabilities, Dead, Health, Player, Posture, Stamina};
use crate::logger::{log, log_warning};
use crate::DeterministicRng;

/// Сколько устойчивости босс получает за каждое спарированное игроком попадание
pub const POSTURE_PER_PARRY: f32 = 15.0;

/// Имя клипа защитной стойки при перехвате атаки игрока
const BOSS_PARRY_CLIP: &str = "boss_parry";

/// System: Запуск хода босса (обработка BossTurnRequested).
///
/// Валидация зеркальна игроку: жив → нет действия в полёте → цель жива →
/// стамина. Любой отказ завершает ход `ActionCompleted { performed: false }`,
/// чтобы внешний оркестратор не завис.
pub fn handle_boss_turns(
    mut turn_events: EventReader<BossTurnRequested>,
    mut rng: ResMut<DeterministicRng>,
    mut bosses: Query<
        (
            Entity,
            &mut BossAi,
            &mut Stamina,
            &mut Animator,
            &Health,
            Has<BossAttackSequence>,
            Has<ParryTradeSequence>,
        ),
        With<Boss>,
    >,
    players: Query<(Entity, &Health), (With<Player>, Without<Boss>)>,
    mut commands: Commands,
    mut chosen_events: EventWriter<BossAttackChosen>,
    mut refused_events: EventWriter<ActionRefused>,
    mut completed_events: EventWriter<ActionCompleted>,
) {
    // Sequence-компонент виден только после sync point; двойной запрос
    // хода в одном тике ловим локальной отметкой.
    let mut started_this_tick: Vec<Entity> = Vec::new();

    for _ in turn_events.read() {
        for (boss, mut ai, mut stamina, mut animator, health, attacking, trading) in
            bosses.iter_mut()
        {
            if !health.is_alive() {
                refused_events.write(ActionRefused {
                    performer: boss,
                    reason: RefusalReason::PerformerDead,
                });
                completed_events.write(ActionCompleted {
                    performer: boss,
                    performed: false,
                });
                continue;
            }

            if attacking || trading || started_this_tick.contains(&boss) {
                refused_events.write(ActionRefused {
                    performer: boss,
                    reason: RefusalReason::ActionInFlight,
                });
                completed_events.write(ActionCompleted {
                    performer: boss,
                    performed: false,
                });
                log(&format!(
                    "❌ Ход босса {:?} отклонён: действие уже в полёте",
                    boss
                ));
                continue;
            }

            let Ok((target, target_health)) = players.single() else {
                log_warning("⚠️ Ход босса без игрока на сцене — пропущен");
                completed_events.write(ActionCompleted {
                    performer: boss,
                    performed: false,
                });
                continue;
            };

            if !target_health.is_alive() {
                refused_events.write(ActionRefused {
                    performer: boss,
                    reason: RefusalReason::TargetDead,
                });
                completed_events.write(ActionCompleted {
                    performer: boss,
                    performed: false,
                });
                continue;
            }

            let Some(data) = ai.choose_attack_for_turn(&mut rng.rng) else {
                completed_events.write(ActionCompleted {
                    performer: boss,
                    performed: false,
                });
                continue;
            };

            if !stamina.consume(data.stamina_cost) {
                refused_events.write(ActionRefused {
                    performer: boss,
                    reason: RefusalReason::InsufficientStamina {
                        cost: data.stamina_cost,
                        available: stamina.current,
                    },
                });
                completed_events.write(ActionCompleted {
                    performer: boss,
                    performed: false,
                });
                log(&format!(
                    "❌ Боссу {:?} не хватило стамины на «{}» ({:.0} < {:.0})",
                    boss, data.name, stamina.current, data.stamina_cost
                ));
                continue;
            }

            animator.play(data.animation.as_str(), data.animation_length);
            chosen_events.write(BossAttackChosen {
                boss,
                attack_name: data.name.clone(),
                applies_effect: data.applies_effect(),
            });
            log(&format!(
                "⚔️ Босс {:?} выбрал «{}» (эффектная: {}, окно через {:.2}s)",
                boss,
                data.name,
                data.applies_effect(),
                data.window_open_delay
            ));
            commands.entity(boss).insert(BossAttackSequence::new(data, target));
            started_this_tick.push(boss);
        }
    }
}

/// System: Перехват исходящих атак игрока (parry trade, шаг 1).
///
/// Босс реагирует на `ActionStarted` перехватываемого вида: шанс — по виду
/// атаки. Успех вешает `CancelledByParry` на жертву (урон подавится на
/// hit-кадре, клип доигрывается) и ставит боссу отложенную контратаку.
/// Занятый своей атакой, обменом или мёртвый босс не перехватывает.
pub fn boss_intercept_player_attacks(
    mut started_events: EventReader<ActionStarted>,
    mut rng: ResMut<DeterministicRng>,
    players: Query<(), With<Player>>,
    mut bosses: Query<
        (Entity, &BossAi, &Health, &mut Animator),
        (
            With<Boss>,
            Without<BossAttackSequence>,
            Without<ParryTradeSequence>,
            Without<Dead>,
        ),
    >,
    mut commands: Commands,
    mut intercepted_events: EventWriter<AttackIntercepted>,
) {
    for event in started_events.read() {
        if !event.kind.is_interceptable() {
            continue;
        }
        if players.get(event.performer).is_err() {
            continue;
        }

        for (boss, ai, health, mut animator) in bosses.iter_mut() {
            if !health.is_alive() {
                continue;
            }
            // Бросок перехвата: roll ≤ шанс, roll равномерный из [0,1).
            // Нулевой шанс не тратит RNG — поток бросков стабилен.
            let chance = ai.interception_chance(event.kind);
            if chance <= 0.0 || rng.rng.gen::<f32>() > chance {
                continue;
            }

            commands.entity(event.performer).insert(CancelledByParry);
            animator.play(BOSS_PARRY_CLIP, ai.counter_delay);
            commands.entity(boss).insert(ParryTradeSequence {
                victim: event.performer,
                counter_in: ai.counter_delay,
            });
            intercepted_events.write(AttackIntercepted {
                boss,
                victim: event.performer,
                kind: event.kind,
            });
            log(&format!(
                "🛡️ Босс {:?} перехватил {:?} игрока {:?} — контратака через {:.2}s",
                boss, event.kind, event.performer, ai.counter_delay
            ));
        }
    }
}

/// System: Отложенная контратака после перехвата (parry trade, шаг 2).
///
/// Контратака спонтанная, вне ходового пайплайна: отказ (мёртвая жертва,
/// нет стамины) просто гасит её без `ActionCompleted`.
pub fn drive_parry_trade(
    time: Res<Time<Fixed>>,
    mut bosses: Query<
        (
            Entity,
            &mut ParryTradeSequence,
            &BossAi,
            &mut Stamina,
            &mut Animator,
        ),
        With<Boss>,
    >,
    healths: Query<&Health>,
    mut commands: Commands,
) {
    let delta = time.delta_secs();

    for (boss, mut trade, ai, mut stamina, mut animator) in bosses.iter_mut() {
        trade.counter_in -= delta;
        if trade.counter_in > 0.0 {
            continue;
        }

        commands.entity(boss).remove::<ParryTradeSequence>();
        let victim = trade.victim;

        let alive = healths
            .get(victim)
            .map(|health| health.is_alive())
            .unwrap_or(false);
        if !alive {
            log(&format!(
                "❌ Контратака босса {:?} отменена: жертва {:?} мертва",
                boss, victim
            ));
            continue;
        }

        let data = ai.counter_attack.clone();
        if !stamina.consume(data.stamina_cost) {
            log(&format!(
                "❌ Контратака босса {:?} отменена: не хватило стамины ({:.0} < {:.0})",
                boss, stamina.current, data.stamina_cost
            ));
            continue;
        }

        animator.play(data.animation.as_str(), data.animation_length);
        log(&format!(
            "⚔️ Босс {:?} контратакует «{}» по {:?}",
            boss, data.name, victim
        ));
        commands.entity(boss).insert(BossAttackSequence::counter(data, victim));
    }
}

/// System: Продвижение атак босса по фазам.
///
/// Schedule → заявка окна парирования у директора; AwaitResolution → чтение
/// единственной резолюции окна: парировано — без урона и +устойчивость,
/// нет — урон и бросок на эффект; Recover → дожидаемся конца клипа.
/// Исход окна применяется ровно один раз и не пересматривается.
pub fn drive_boss_attack_sequences(
    mut resolved_events: EventReader<ParryWindowResolved>,
    mut director: ResMut<ParryDirector>,
    mut rng: ResMut<DeterministicRng>,
    mut bosses: Query<
        (
            Entity,
            &mut BossAttackSequence,
            &Animator,
            &mut Posture,
            &CombatCapabilities,
        ),
        With<Boss>,
    >,
    mut targets: Query<(&mut Health, &mut StatusEffects, &mut CombatCapabilities), Without<Boss>>,
    mut commands: Commands,
    mut damage_events: EventWriter<DamageDealt>,
    mut applied_events: EventWriter<EffectApplied>,
    mut completed_events: EventWriter<ActionCompleted>,
) {
    let resolutions: Vec<ParryWindowResolved> = resolved_events.read().copied().collect();

    for (boss, mut sequence, animator, mut posture, boss_caps) in bosses.iter_mut() {
        match sequence.phase {
            BossAttackPhase::Schedule => {
                if director.schedule_window(sequence.target, boss, sequence.data.window_open_delay)
                {
                    sequence.phase = BossAttackPhase::AwaitResolution;
                } else {
                    // Директор занят чужим окном: повторим заявку следующим тиком
                    log_warning(&format!(
                        "⚠️ Окно парирования занято — атака «{}» ждёт",
                        sequence.data.name
                    ));
                }
            }

            BossAttackPhase::AwaitResolution => {
                let Some(resolution) = resolutions
                    .iter()
                    .find(|resolution| {
                        resolution.defender == sequence.target && resolution.attacker == boss
                    })
                else {
                    continue;
                };

                if resolution.success {
                    posture.add(POSTURE_PER_PARRY);
                    log(&format!(
                        "🛡️ «{}» спарирована! Урона нет, устойчивость босса {:.0}/{:.0}",
                        sequence.data.name, posture.current, posture.max
                    ));
                } else if let Ok((mut health, mut effects, mut target_caps)) =
                    targets.get_mut(sequence.target)
                {
                    if health.is_alive() {
                        let amount = sequence.data.damage * boss_caps.damage_multiplier;
                        health.take_damage(amount);
                        let target_died = !health.is_alive();
                        damage_events.write(DamageDealt {
                            attacker: boss,
                            target: sequence.target,
                            amount,
                            target_died,
                        });
                        log(&format!(
                            "💥 «{}» попала по {:?}: урон {:.1}, HP {:.1}",
                            sequence.data.name, sequence.target, amount, health.current
                        ));

                        // Бросок эффекта: roll ≤ шанс наложения
                        if let Some(spec) = &sequence.data.effect {
                            if spec.chance > 0.0 && rng.rng.gen::<f32>() <= spec.chance {
                                if let Some(effect) = spec.instantiate() {
                                    let kind = effect.kind;
                                    let inserted = effects.apply(effect, &mut target_caps);
                                    applied_events.write(EffectApplied {
                                        target: sequence.target,
                                        kind,
                                        refreshed: !inserted,
                                    });
                                    log(&format!(
                                        "☠️ На {:?} наложен «{}»{}",
                                        sequence.target,
                                        kind.label(),
                                        if inserted { "" } else { " (освежён)" }
                                    ));
                                }
                            }
                        }
                    }
                }

                sequence.phase = BossAttackPhase::Recover;
            }

            BossAttackPhase::Recover => {
                if animator.state_finished(&sequence.data.animation) {
                    commands.entity(boss).remove::<BossAttackSequence>();
                    if !sequence.is_counter {
                        completed_events.write(ActionCompleted {
                            performer: boss,
                            performed: true,
                        });
                    }
                    log(&format!(
                        "✅ Атака босса «{}» завершена (контратака: {})",
                        sequence.data.name, sequence.is_counter
                    ));
                }
            }
        }
    }
}
