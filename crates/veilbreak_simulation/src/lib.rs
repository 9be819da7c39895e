//! Veilbreak Simulation Core
//!
//! Детерминированное ядро дуэльного боя на Bevy 0.16 (headless):
//! пайплайн действий с таймингами по анимационным клипам, окно парирования
//! с parry trade, QTE-подсистема, статус-эффекты и мозг босса.
//!
//! Ядро не решает, чей сейчас ход, и ничего не рендерит: input-слой шлёт
//! `PlayerIntent`, ходовой оркестратор — `BossTurnRequested`/`TurnEnded`,
//! обратно уходят события-нотификации. Вся логика — один FixedUpdate-тик
//! за другим, без потоков и без wall-clock времени.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod data;
pub mod logger;
pub mod player;

// Re-export базовых типов для удобства
pub use ai::{BossAi, POSTURE_PER_PARRY};
pub use combat::{
    ActionCompleted, ActionKind, ActionRefused, ActionStarted, AttackIntercepted, AttackSequence,
    BattleTeardown, BossAttackChosen, BossAttackSequence, BossTurnRequested, CancelledByParry,
    CharacterDied, CombatPlugin, DamageDealt, DurationKind, EffectApplied, EffectExpired,
    EffectKind, EffectRemoved, ParryDirector, ParryTradeSequence, ParryWindowOpened,
    ParryWindowResolved, PlayerIntent, QteButton, QteDirector, QtePromptOpened, QteResolved,
    RefusalReason, SkillSequence, StatusEffect, StatusEffects, TurnEnded,
};
pub use components::*;
pub use data::{
    AttackAnimationData, BossAttackData, ConfigError, EffectKindTag, SkillData, StatusEffectSpec,
};
pub use player::{ActionChoice, PlayerActionSet};

/// Главный plugin боевого ядра
pub struct BattlePlugin;

impl Plugin for BattlePlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG; init_resource не затирает seed,
            // вставленный тестом до добавления плагина
            .init_resource::<DeterministicRng>()
            .add_plugins(CombatPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless боя.
///
/// `TimeUpdateStrategy::ManualDuration(1/60s)` — каждый `app.update()`
/// продвигает ровно один fixed-тик; тесты считают тики, а не время.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )))
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(BattlePlugin);

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
