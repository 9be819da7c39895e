//! Headless дуэль Veilbreak
//!
//! Запускает Bevy App без рендера и скриптует бой: игрок атакует и
//! отвечает на QTE, внешний «оркестратор» (этот main) гоняет ходы,
//! на атаках босса игрок парирует через ход. Демонстрирует событийный
//! контракт ядра — ровно так с ним говорил бы игровой слой.

use bevy::prelude::*;

use veilbreak_simulation::{
    create_headless_app, ActionCompleted, BattleTeardown, Boss, BossAttackChosen,
    BossTurnRequested, CharacterDied, DamageDealt, Health, ParryWindowOpened, Player,
    PlayerIntent, QtePromptOpened, Stamina, TurnEnded,
};

/// Снимаем накопившиеся события после тика (внешний слой читает их так же).
fn drain_events<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}

fn main() {
    let seed = 42;
    println!("Veilbreak: headless дуэль (seed: {})", seed);

    let mut app = create_headless_app(seed);
    let player = app.world_mut().spawn(Player).id();
    let boss = app.world_mut().spawn(Boss).id();

    // Smoke-check данных и витрина действий перед боем
    {
        let world = app.world();
        let action_set = world
            .get::<veilbreak_simulation::PlayerActionSet>(player)
            .cloned()
            .unwrap_or_default();
        if let Err(err) = action_set.validate() {
            println!("Кривые данные игрока: {err}");
            return;
        }
        if let Some(ai) = world.get::<veilbreak_simulation::BossAi>(boss) {
            if let Err(err) = ai.validate() {
                println!("Кривые данные босса: {err}");
                return;
            }
        }
        if let Some(stamina) = world.get::<Stamina>(player) {
            println!("Действия игрока:");
            for choice in action_set.available_actions(stamina) {
                println!(
                    "  {:?} «{}» — стамина {:.0}{}",
                    choice.kind,
                    choice.name,
                    choice.stamina_cost,
                    if choice.affordable { "" } else { " (не хватает)" }
                );
            }
        }
    }

    // Цикл действий игрока по ходам
    let player_script = [
        PlayerIntent::LightAttack,
        PlayerIntent::HeavyAttack,
        PlayerIntent::UseSkill { index: 0 },
    ];

    let mut turn = 0usize;
    let mut player_turn = true;
    let mut pending: Vec<PlayerIntent> = vec![player_script[0]];
    let mut battle_over = false;

    for tick in 0..3000 {
        for intent in pending.drain(..) {
            app.world_mut().send_event(intent);
        }
        app.update();

        // Ответ на QTE — следующим тиком, как сделал бы input-слой
        for prompt in drain_events::<QtePromptOpened>(&mut app) {
            pending.push(PlayerIntent::Qte {
                button: prompt.expected,
            });
        }

        // Парируем атаки босса через ход: чётный ход — жмём, нечётный — терпим
        for window in drain_events::<ParryWindowOpened>(&mut app) {
            if window.defender == player && turn % 2 == 0 {
                pending.push(PlayerIntent::Parry);
            }
        }

        for chosen in drain_events::<BossAttackChosen>(&mut app) {
            println!("[tick {tick}] Босс выбрал «{}»", chosen.attack_name);
        }

        for hit in drain_events::<DamageDealt>(&mut app) {
            println!(
                "[tick {tick}] Урон {:.1}: {:?} → {:?}",
                hit.amount, hit.attacker, hit.target
            );
        }

        // Завершение действия = конец половины хода, передаём ход дальше
        for done in drain_events::<ActionCompleted>(&mut app) {
            app.world_mut().send_event(TurnEnded);
            if done.performer == player {
                player_turn = false;
                app.world_mut().send_event(BossTurnRequested);
            } else {
                player_turn = true;
                turn += 1;
                pending.push(player_script[turn % player_script.len()]);
            }
        }

        for died in drain_events::<CharacterDied>(&mut app) {
            println!("[tick {tick}] ☠️ {:?} пал (добил {:?})", died.entity, died.killer);
            battle_over = true;
        }

        if battle_over {
            break;
        }
    }

    // Снос боя — единственный примитив отмены
    app.world_mut().send_event(BattleTeardown);
    app.update();

    let world = app.world();
    let player_hp = world.get::<Health>(player).map(|h| h.current).unwrap_or(0.0);
    let boss_hp = world.get::<Health>(boss).map(|h| h.current).unwrap_or(0.0);
    println!(
        "Итог: игрок {:.1} HP, босс {:.1} HP, ходов сыграно {} (ходил {})",
        player_hp,
        boss_hp,
        turn,
        if player_turn { "игрок" } else { "босс" }
    );
    println!("Дуэль завершена");
}
