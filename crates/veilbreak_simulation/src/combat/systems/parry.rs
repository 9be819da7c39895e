//! Parry window systems: регистрация попыток и продвижение окна.

use bevy::prelude::*;

use crate::combat::{
    ParryDirector, ParryTick, ParryWindowOpened, ParryWindowResolved, PlayerIntent,
};
use crate::components::{CombatCapabilities, Health, Player};
use crate::logger::log;

/// System: Регистрация попыток парирования (PlayerIntent::Parry).
///
/// Попытка засчитывается только внутри открытого окна; промах и нажатие
/// вне окна — тихий no-op с диагностикой, окно это не трогает. Запрет
/// парирования (эффект) и смерть гасят попытку до директора.
pub fn register_parry_attempts(
    mut intent_events: EventReader<PlayerIntent>,
    mut director: ResMut<ParryDirector>,
    players: Query<(Entity, &Health, &CombatCapabilities), With<Player>>,
) {
    for intent in intent_events.read() {
        if !matches!(intent, PlayerIntent::Parry) {
            continue;
        }

        for (player, health, caps) in players.iter() {
            if !health.is_alive() {
                continue;
            }
            if !caps.can_parry {
                log(&format!(
                    "❌ Парирование {:?} запрещено статус-эффектом",
                    player
                ));
                continue;
            }

            if director.register_attempt(player) {
                log(&format!("🛡️ Попытка парирования {:?} попала в окно", player));
            } else {
                log(&format!(
                    "❌ Попытка парирования {:?} вне окна — впустую",
                    player
                ));
            }
        }
    }
}

/// System: Продвижение окна парирования на один тик.
///
/// Директор — единственный владелец состояния окна; система только
/// транслирует его переходы в события. Разрешение окна случается ровно
/// один раз, защёлка попыток прочитана и сброшена внутри директора.
pub fn update_parry_window(
    time: Res<Time<Fixed>>,
    mut director: ResMut<ParryDirector>,
    mut opened_events: EventWriter<ParryWindowOpened>,
    mut resolved_events: EventWriter<ParryWindowResolved>,
) {
    match director.tick(time.delta_secs()) {
        ParryTick::Quiet => {}
        ParryTick::Opened { defender } => {
            opened_events.write(ParryWindowOpened { defender });
            log(&format!(
                "⏰ Окно парирования открыто для {:?} ({:.2}s)",
                defender, director.window_duration
            ));
        }
        ParryTick::Resolved(resolution) => {
            resolved_events.write(ParryWindowResolved {
                defender: resolution.defender,
                attacker: resolution.attacker,
                success: resolution.success,
            });
            if resolution.success {
                log(&format!(
                    "🛡️ Окно закрыто: {:?} спарировал атаку {:?}",
                    resolution.defender, resolution.attacker
                ));
            } else {
                log(&format!(
                    "❌ Окно закрыто: {:?} не спарировал атаку {:?}",
                    resolution.defender, resolution.attacker
                ));
            }
        }
    }
}
