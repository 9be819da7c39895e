//! Combat module: пайплайн действий, парирование, QTE, статус-эффекты.
//!
//! ECS ответственность:
//! - Game state: Health, Stamina, CombatCapabilities, StatusEffects, Posture
//! - Combat rules: тайминги по клипам, формулы урона, окно парирования
//! - Events: контракт с input-слоем, ходовым оркестратором и UI
//!
//! Ответственность внешних слоёв:
//! - рендер и настоящие анимации (здесь только логические часы Animator)
//! - очерёдность ходов: ядро исполняет BossTurnRequested/TurnEnded, но не
//!   решает, чей сейчас ход
//!
//! Вся боёвка живёт в одной FixedUpdate-цепочке: порядок систем — часть
//! контракта тика (см. CombatPlugin), межплагинных гонок нет.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use events::*;

use crate::ai;
use crate::components::animation::advance_animators;

/// Combat Plugin (однопоточная детерминированная боёвка)
///
/// Регистрирует все боевые системы в FixedUpdate (60Hz) одной цепочкой.
///
/// Порядок выполнения:
/// 1. advance_animators — логические часы клипов
/// 2. process_player_intents — валидация и запуск действий игрока
/// 3. handle_boss_turns — запуск хода босса
/// 4. boss_intercept_player_attacks — перехваты (parry trade, шаг 1)
/// 5. drive_parry_trade — отложенные контратаки (parry trade, шаг 2)
/// 6. register_parry_attempts — нажатия парирования в окно
/// 7. update_parry_window — тик окна, события open/resolve
/// 8. update_qte_prompts — QTE-ввод и таймауты
/// 9. drive_attack_sequences — метки QTE, hit-кадр, конец атаки
/// 10. drive_skill_sequences — конец клипа скилла
/// 11. drive_boss_attack_sequences — окно → урон/эффект → конец атаки босса
/// 12. apply_action_expiry — эффекты «на одно действие»
/// 13. apply_turn_end — граница хода: эффекты + стамина
/// 14. update_status_effects — посекундные таймеры, переутверждение
/// 15. handle_deaths — маркер Dead + CharacterDied
/// 16. handle_teardown — снос боя
///
/// Резолюция окна (7) читается атакой босса (11) в том же тике; QTE-исходы
/// (8) — атакой игрока (9) в том же тике.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<PlayerIntent>()
            .add_event::<BossTurnRequested>()
            .add_event::<TurnEnded>()
            .add_event::<BattleTeardown>()
            .add_event::<ActionStarted>()
            .add_event::<ActionCompleted>()
            .add_event::<ActionRefused>()
            .add_event::<DamageDealt>()
            .add_event::<CharacterDied>()
            .add_event::<ParryWindowOpened>()
            .add_event::<ParryWindowResolved>()
            .add_event::<AttackIntercepted>()
            .add_event::<QtePromptOpened>()
            .add_event::<QteResolved>()
            .add_event::<EffectApplied>()
            .add_event::<EffectExpired>()
            .add_event::<EffectRemoved>()
            .add_event::<BossAttackChosen>();

        // Директора — battle-scoped синглтоны
        app.init_resource::<ParryDirector>()
            .init_resource::<QteDirector>();

        // Регистрация систем в FixedUpdate
        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: Часы анимаций
                advance_animators,

                // Фаза 2: Запуск действий (игрок, затем босс)
                systems::process_player_intents,
                ai::handle_boss_turns,

                // Фаза 3: Parry trade
                ai::boss_intercept_player_attacks,
                ai::drive_parry_trade,

                // Фаза 4: Окно парирования и QTE
                systems::register_parry_attempts,
                systems::update_parry_window,
                systems::update_qte_prompts,

                // Фаза 5: Продвижение действий в полёте
                systems::drive_attack_sequences,
                systems::drive_skill_sequences,
                ai::drive_boss_attack_sequences,

                // Фаза 6: Статус-эффекты
                systems::apply_action_expiry,
                systems::apply_turn_end,
                systems::update_status_effects,

                // Фаза 7: Смерть и снос
                systems::handle_deaths,
                systems::handle_teardown,
            )
                .chain(), // Последовательное выполнение — порядок и есть контракт
        );
    }
}
