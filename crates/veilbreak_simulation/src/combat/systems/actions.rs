//! Player action pipeline: валидация намерений и жизнь запущенных действий.

use bevy::prelude::*;

use crate::combat::{
    ActionCompleted, ActionKind, ActionRefused, ActionStarted, AttackSequence, CancelledByParry,
    DamageDealt, PlayerIntent, QteButton, QteDirector, QtePromptOpened, QteResolved,
    RefusalReason, SkillSequence,
};
use crate::components::{Animator, Boss, CombatCapabilities, Health, Player, Stamina};
use crate::logger::{log, log_warning};
use crate::player::PlayerActionSet;
use crate::DeterministicRng;

/// System: Валидация намерений игрока и запуск действий.
///
/// Цепочка проверок фиксирована: жив → нет действия в полёте → данные
/// существуют → цель жива → стамина. Первый провал даёт `ActionRefused`
/// с причиной и `ActionCompleted { performed: false }` — без мутаций.
///
/// Скилл применяет урон и лечение сразу при запуске; его клип чисто
/// косметический. Атаки наносят урон позже, на hit-кадре клипа.
pub fn process_player_intents(
    mut intent_events: EventReader<PlayerIntent>,
    mut players: Query<
        (
            Entity,
            &PlayerActionSet,
            &mut Health,
            &mut Stamina,
            &mut Animator,
            &CombatCapabilities,
            Has<AttackSequence>,
            Has<SkillSequence>,
        ),
        With<Player>,
    >,
    mut bosses: Query<(Entity, &mut Health), (With<Boss>, Without<Player>)>,
    mut commands: Commands,
    mut started_events: EventWriter<ActionStarted>,
    mut refused_events: EventWriter<ActionRefused>,
    mut completed_events: EventWriter<ActionCompleted>,
    mut damage_events: EventWriter<DamageDealt>,
) {
    // Sequence-компонент появится только на следующем sync point; несколько
    // намерений в одном тике ловим локальной отметкой.
    let mut started_this_tick: Vec<Entity> = Vec::new();

    for intent in intent_events.read() {
        let (kind, skill_index) = match intent {
            PlayerIntent::LightAttack => (ActionKind::LightAttack, None),
            PlayerIntent::HeavyAttack => (ActionKind::HeavyAttack, None),
            PlayerIntent::UseSkill { index } => (ActionKind::Skill, Some(*index)),
            // Парирование и QTE-ввод обрабатывают свои системы
            PlayerIntent::Parry | PlayerIntent::Qte { .. } => continue,
        };

        for (player, action_set, mut health, mut stamina, mut animator, caps, attacking, casting) in
            players.iter_mut()
        {
            let refuse = |reason: RefusalReason,
                          refused: &mut EventWriter<ActionRefused>,
                          completed: &mut EventWriter<ActionCompleted>| {
                log(&format!(
                    "❌ Действие {:?} игрока {:?} отклонено: {:?}",
                    kind, player, reason
                ));
                refused.write(ActionRefused {
                    performer: player,
                    reason,
                });
                completed.write(ActionCompleted {
                    performer: player,
                    performed: false,
                });
            };

            if !health.is_alive() {
                refuse(
                    RefusalReason::PerformerDead,
                    &mut refused_events,
                    &mut completed_events,
                );
                continue;
            }

            if attacking || casting || started_this_tick.contains(&player) {
                refuse(
                    RefusalReason::ActionInFlight,
                    &mut refused_events,
                    &mut completed_events,
                );
                continue;
            }

            match skill_index {
                // Лёгкая/тяжёлая атака: урон уйдёт на hit-кадре
                None => {
                    // Выбор тотален: в эту ветку попадают только два
                    // атакующих вида, уронить намерение молча нельзя
                    let data = if kind == ActionKind::HeavyAttack {
                        &action_set.heavy_attack
                    } else {
                        &action_set.light_attack
                    };

                    let Ok((target, target_health)) = bosses.single_mut() else {
                        log_warning("⚠️ Действие игрока без босса на сцене — отклонено");
                        refuse(
                            RefusalReason::TargetDead,
                            &mut refused_events,
                            &mut completed_events,
                        );
                        continue;
                    };
                    if !target_health.is_alive() {
                        refuse(
                            RefusalReason::TargetDead,
                            &mut refused_events,
                            &mut completed_events,
                        );
                        continue;
                    }

                    if !stamina.consume(data.stamina_cost) {
                        refuse(
                            RefusalReason::InsufficientStamina {
                                cost: data.stamina_cost,
                                available: stamina.current,
                            },
                            &mut refused_events,
                            &mut completed_events,
                        );
                        continue;
                    }

                    animator.play(data.animation.as_str(), data.animation_length);
                    commands
                        .entity(player)
                        .insert(AttackSequence::new(kind, data.clone(), target));
                    started_events.write(ActionStarted {
                        performer: player,
                        kind,
                    });
                    started_this_tick.push(player);
                    log(&format!(
                        "⚔️ Игрок {:?} начал «{}» ({:?}, {} QTE, стамина {:.0})",
                        player,
                        data.name,
                        kind,
                        data.qte_marks.len(),
                        stamina.current
                    ));
                }

                // Скилл: урон и лечение мгновенны, клип доигрывается
                Some(index) => {
                    let Some(data) = action_set.skill(index) else {
                        refuse(
                            RefusalReason::UnknownSkill { index },
                            &mut refused_events,
                            &mut completed_events,
                        );
                        continue;
                    };

                    let Ok((target, mut target_health)) = bosses.single_mut() else {
                        log_warning("⚠️ Действие игрока без босса на сцене — отклонено");
                        refuse(
                            RefusalReason::TargetDead,
                            &mut refused_events,
                            &mut completed_events,
                        );
                        continue;
                    };
                    if !target_health.is_alive() {
                        refuse(
                            RefusalReason::TargetDead,
                            &mut refused_events,
                            &mut completed_events,
                        );
                        continue;
                    }

                    if !stamina.consume(data.stamina_cost) {
                        refuse(
                            RefusalReason::InsufficientStamina {
                                cost: data.stamina_cost,
                                available: stamina.current,
                            },
                            &mut refused_events,
                            &mut completed_events,
                        );
                        continue;
                    }

                    animator.play(data.animation.as_str(), data.animation_length);

                    let amount = data.damage * caps.damage_multiplier;
                    if amount > 0.0 {
                        target_health.take_damage(amount);
                        let target_died = !target_health.is_alive();
                        damage_events.write(DamageDealt {
                            attacker: player,
                            target,
                            amount,
                            target_died,
                        });
                        log(&format!(
                            "💥 «{}» нанёс {:.1} урона по {:?} (HP {:.1})",
                            data.name, amount, target, target_health.current
                        ));
                    }
                    if data.heals_performer {
                        health.heal(data.heal_amount);
                        log(&format!(
                            "💚 «{}» вылечил {:?} на {:.1} (HP {:.1})",
                            data.name, player, data.heal_amount, health.current
                        ));
                    }

                    commands.entity(player).insert(SkillSequence {
                        data: data.clone(),
                        target,
                    });
                    started_events.write(ActionStarted {
                        performer: player,
                        kind: ActionKind::Skill,
                    });
                    started_this_tick.push(player);
                }
            }
        }
    }
}

/// System: Продвижение атак игрока по клипу.
///
/// Порядок внутри тика фиксирован: учёт разрешённых QTE → открытие
/// подошедших QTE-меток → hit-кадр → завершение клипа. QTE, разрешённое
/// после hit-кадра, на урон уже не влияет.
pub fn drive_attack_sequences(
    mut qte_events: EventReader<QteResolved>,
    mut director: ResMut<QteDirector>,
    mut rng: ResMut<DeterministicRng>,
    mut performers: Query<
        (
            Entity,
            &mut AttackSequence,
            &Animator,
            &CombatCapabilities,
            Has<CancelledByParry>,
        ),
        With<Player>,
    >,
    mut targets: Query<&mut Health, Without<Player>>,
    mut commands: Commands,
    mut prompt_events: EventWriter<QtePromptOpened>,
    mut damage_events: EventWriter<DamageDealt>,
    mut completed_events: EventWriter<ActionCompleted>,
) {
    let outcomes: Vec<QteResolved> = qte_events.read().copied().collect();

    for (performer, mut sequence, animator, caps, cancelled) in performers.iter_mut() {
        for outcome in outcomes
            .iter()
            .filter(|outcome| outcome.performer == performer)
        {
            if outcome.success {
                sequence.successful_qtes += 1;
            }
        }

        let progress = animator.normalized_time();

        while sequence.next_qte_mark < sequence.data.qte_marks.len()
            && progress >= sequence.data.qte_marks[sequence.next_qte_mark]
        {
            let button = QteButton::roll(&mut rng.rng);
            if director.open_prompt(performer, button) {
                prompt_events.write(QtePromptOpened {
                    performer,
                    expected: button,
                });
                log(&format!(
                    "🎯 QTE #{} для {:?}: жми {}",
                    sequence.next_qte_mark + 1,
                    performer,
                    button.label()
                ));
            } else {
                // Валидация данных держит метки реже длительности промпта,
                // сюда попадаем только на кривых данных
                log_warning(&format!(
                    "⚠️ QTE-метка «{}» пропущена: слот промпта занят",
                    sequence.data.name
                ));
            }
            sequence.next_qte_mark += 1;
        }

        if !sequence.hit_done && progress >= sequence.data.hit_mark {
            sequence.hit_done = true;
            if cancelled {
                commands.entity(performer).remove::<CancelledByParry>();
                log(&format!(
                    "🛡️ Удар «{}» подавлен перехватом босса — урона нет",
                    sequence.data.name
                ));
            } else if let Ok(mut target_health) = targets.get_mut(sequence.target) {
                if target_health.is_alive() {
                    let amount = sequence.hit_damage() * caps.damage_multiplier;
                    target_health.take_damage(amount);
                    let target_died = !target_health.is_alive();
                    damage_events.write(DamageDealt {
                        attacker: performer,
                        target: sequence.target,
                        amount,
                        target_died,
                    });
                    log(&format!(
                        "💥 «{}» попала: урон {:.1} ({} успешных QTE), HP цели {:.1}",
                        sequence.data.name,
                        amount,
                        sequence.successful_qtes,
                        target_health.current
                    ));
                }
            }
        }

        if progress >= 1.0 {
            commands.entity(performer).remove::<AttackSequence>();
            completed_events.write(ActionCompleted {
                performer,
                performed: true,
            });
            log(&format!(
                "✅ Атака «{}» игрока {:?} завершена",
                sequence.data.name, performer
            ));
        }
    }
}

/// System: Завершение скиллов по концу клипа. Вся механика уже отработала
/// при запуске, здесь только сигнал пайплайну.
pub fn drive_skill_sequences(
    performers: Query<(Entity, &SkillSequence, &Animator), With<Player>>,
    mut commands: Commands,
    mut completed_events: EventWriter<ActionCompleted>,
) {
    for (performer, sequence, animator) in performers.iter() {
        if animator.state_finished(&sequence.data.animation) {
            commands.entity(performer).remove::<SkillSequence>();
            completed_events.write(ActionCompleted {
                performer,
                performed: true,
            });
            log(&format!(
                "✅ Скилл «{}» игрока {:?} завершён",
                sequence.data.name, performer
            ));
        }
    }
}
