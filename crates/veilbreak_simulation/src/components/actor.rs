//! Базовые компоненты бойцов: Combatant, Health, Stamina, CombatCapabilities, Posture

use bevy::prelude::*;

/// Боец (игрок или босс) — базовый компонент для участников дуэли
///
/// Автоматически добавляет Health, Stamina, CombatCapabilities, Animator,
/// StatusEffects через Required Components.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(
    Health,
    Stamina,
    CombatCapabilities,
    crate::components::Animator,
    crate::combat::StatusEffects
)]
pub struct Combatant;

/// Маркер игрока. Подтягивает боевой набор действий по умолчанию;
/// кастомный набор просто вставляется рядом при спавне.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Combatant, crate::player::PlayerActionSet)]
pub struct Player;

/// Маркер босса. Несёт шкалу устойчивости и мозг (BossAi).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Combatant, Posture, crate::ai::BossAi)]
pub struct Boss;

/// Маркер: боец мёртв (health == 0). Ставится один раз системой смертей;
/// мёртвый босс не перехватывает, мёртвый performer получает отказ.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Здоровье бойца
///
/// Инвариант: 0.0 ≤ current ≤ max. Урон дробный (QTE-множители дают
/// значения вида 22.5), поэтому f32.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }
}

/// Выносливость — ресурс на атаки/скиллы
///
/// Инвариант: 0.0 ≤ current ≤ max
/// Восстановление: turn_regen единиц в конце каждого хода (не per-tick —
/// бой пошаговый, непрерывный реген ломал бы экономику ходов).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Stamina {
    pub current: f32,
    pub max: f32,
    pub turn_regen: f32, // units per turn
}

impl Default for Stamina {
    fn default() -> Self {
        Self::new(100.0) // Default 100 stamina
    }
}

impl Stamina {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            turn_regen: 15.0,
        }
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }

    pub fn consume(&mut self, cost: f32) -> bool {
        if self.can_afford(cost) {
            self.current -= cost;
            true
        } else {
            false
        }
    }

    pub fn replenish(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }
}

/// Боевые способности, которые статус-эффекты могут подавлять или искажать.
///
/// Эффекты владеют этими полями целиком: пока эффект активен, он
/// переутверждает своё значение каждый тик, при снятии возвращает базовое.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CombatCapabilities {
    /// Может ли боец заявлять парирование
    pub can_parry: bool,
    /// Множитель исходящего урона (1.0 = без модификаторов)
    pub damage_multiplier: f32,
}

impl Default for CombatCapabilities {
    fn default() -> Self {
        Self {
            can_parry: true,
            damage_multiplier: 1.0,
        }
    }
}

/// Шкала устойчивости босса. Растёт от успешных парирований игрока,
/// пока только копится — слом позы подключим, когда появится стаггер-фаза.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Posture {
    pub current: f32,
    pub max: f32,
}

impl Default for Posture {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Posture {
    pub fn new(max: f32) -> Self {
        Self { current: 0.0, max }
    }

    pub fn add(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }

    pub fn is_broken(&self) -> bool {
        self.current >= self.max
    }
}
