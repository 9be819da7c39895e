//! Боевые data-записи: неизменяемые таблицы, которые правит дизайнер.
//!
//! Записи клонируются в действие при его запуске — дальше действие живёт
//! своей копией, горячая правка таблиц не трогает то, что уже в полёте.
//! Все временные метки (QTE, hit) — нормализованные позиции клипа [0..1],
//! чтобы правка длины анимации не съезжала тайминги.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::{DurationKind, EffectKind, StatusEffect, QTE_PROMPT_DURATION};
use crate::logger::log_warning;

/// Ошибка валидации боевых данных. Валидация — дешёвый smoke-check на
/// старте боя, не замена редакторным инструментам.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{record}: animation length must be positive (got {value})")]
    NonPositiveLength { record: String, value: f32 },

    #[error("{record}: {field} {value} is outside the normalized 0.0..=1.0 range")]
    MarkOutOfRange {
        record: String,
        field: &'static str,
        value: f32,
    },

    #[error("{record}: qte marks must be ascending")]
    MarksNotAscending { record: String },

    #[error("{record}: qte marks closer than one prompt duration, the second prompt would be dropped")]
    MarksTooDense { record: String },

    #[error("{record}: application chance {value} is outside 0.0..=1.0")]
    ChanceOutOfRange { record: String, value: f32 },

    #[error("{record}: {field} must be non-negative (got {value})")]
    NegativeValue {
        record: String,
        field: &'static str,
        value: f32,
    },

    #[error("{record}: qte multiplier must be positive (got {value})")]
    NonPositiveMultiplier { record: String, value: f32 },

    #[error("{record}: parry window opens at {delay}s, after the {length}s animation ends")]
    WindowBeyondAnimation {
        record: String,
        delay: f32,
        length: f32,
    },

    #[error("boss attack pool is empty")]
    EmptyAttackPool,
}

// ============================================================================
// Атаки игрока
// ============================================================================

/// Запись атаки игрока: клип + тайминги QTE и момента удара.
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub struct AttackAnimationData {
    pub name: String,
    /// Имя состояния аниматора
    pub animation: String,
    pub animation_length: f32,
    pub damage: f32,
    pub stamina_cost: f32,
    /// Нормализованные позиции QTE-промптов, по возрастанию
    pub qte_marks: Vec<f32>,
    /// Нормализованная позиция, в которой урон уходит в цель
    pub hit_mark: f32,
    /// Множитель урона за каждое успешное QTE (компаундится)
    pub qte_success_multiplier: f32,
}

impl AttackAnimationData {
    /// Лёгкая атака: быстрая, дешёвая, два QTE.
    pub fn light() -> Self {
        Self {
            name: "Swift Cut".to_string(),
            animation: "atk_light".to_string(),
            animation_length: 1.2,
            damage: 10.0,
            stamina_cost: 15.0,
            qte_marks: vec![0.2, 0.5],
            hit_mark: 0.85,
            qte_success_multiplier: 1.5,
        }
    }

    /// Тяжёлая атака: медленный замах, три QTE, больший базовый урон.
    pub fn heavy() -> Self {
        Self {
            name: "Veilbreaker Arc".to_string(),
            animation: "atk_heavy".to_string(),
            animation_length: 1.8,
            damage: 22.0,
            stamina_cost: 30.0,
            qte_marks: vec![0.15, 0.4, 0.65],
            hit_mark: 0.85,
            qte_success_multiplier: 1.4,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.animation_length <= 0.0 {
            return Err(ConfigError::NonPositiveLength {
                record: self.name.clone(),
                value: self.animation_length,
            });
        }
        if self.stamina_cost < 0.0 {
            return Err(ConfigError::NegativeValue {
                record: self.name.clone(),
                field: "stamina_cost",
                value: self.stamina_cost,
            });
        }
        if self.qte_success_multiplier <= 0.0 {
            return Err(ConfigError::NonPositiveMultiplier {
                record: self.name.clone(),
                value: self.qte_success_multiplier,
            });
        }
        if !(0.0..=1.0).contains(&self.hit_mark) {
            return Err(ConfigError::MarkOutOfRange {
                record: self.name.clone(),
                field: "hit_mark",
                value: self.hit_mark,
            });
        }
        for &mark in &self.qte_marks {
            if !(0.0..=1.0).contains(&mark) {
                return Err(ConfigError::MarkOutOfRange {
                    record: self.name.clone(),
                    field: "qte_mark",
                    value: mark,
                });
            }
        }
        if self.qte_marks.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ConfigError::MarksNotAscending {
                record: self.name.clone(),
            });
        }
        // Промпты живут QTE_PROMPT_DURATION секунд; метки ближе этого
        // интервала означают, что второй промпт откроется поверх живого.
        if self
            .qte_marks
            .windows(2)
            .any(|pair| (pair[1] - pair[0]) * self.animation_length < QTE_PROMPT_DURATION)
        {
            return Err(ConfigError::MarksTooDense {
                record: self.name.clone(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Скиллы игрока
// ============================================================================

/// Запись скилла. Урон и хил применяются при запуске, клип — косметика,
/// на которую действие лишь дожидается завершения.
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub struct SkillData {
    pub name: String,
    pub animation: String,
    pub animation_length: f32,
    pub damage: f32,
    pub stamina_cost: f32,
    pub heals_performer: bool,
    pub heal_amount: f32,
}

impl SkillData {
    /// Режущий выпад с самолечением.
    pub fn mending_cut() -> Self {
        Self {
            name: "Mending Cut".to_string(),
            animation: "skill_mending_cut".to_string(),
            animation_length: 1.0,
            damage: 8.0,
            stamina_cost: 20.0,
            heals_performer: true,
            heal_amount: 5.0,
        }
    }

    /// Чистый урон без лечения.
    pub fn veil_rend() -> Self {
        Self {
            name: "Veil Rend".to_string(),
            animation: "skill_veil_rend".to_string(),
            animation_length: 1.1,
            damage: 18.0,
            stamina_cost: 25.0,
            heals_performer: false,
            heal_amount: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.animation_length <= 0.0 {
            return Err(ConfigError::NonPositiveLength {
                record: self.name.clone(),
                value: self.animation_length,
            });
        }
        if self.stamina_cost < 0.0 {
            return Err(ConfigError::NegativeValue {
                record: self.name.clone(),
                field: "stamina_cost",
                value: self.stamina_cost,
            });
        }
        if self.heal_amount < 0.0 {
            return Err(ConfigError::NegativeValue {
                record: self.name.clone(),
                field: "heal_amount",
                value: self.heal_amount,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Статус-эффекты (data-уровень)
// ============================================================================

/// Тег типа эффекта в данных. Закрытое отображение в рантайм-вариант;
/// `None` — дизайнер пометил атаку как эффектную, но не заполнил тег.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum EffectKindTag {
    #[default]
    None,
    DisableParry,
    ReduceDamage,
}

/// Описание статус-эффекта в данных атаки босса.
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub struct StatusEffectSpec {
    pub kind: EffectKindTag,
    pub duration: DurationKind,
    /// Секунды для DurationKind::Custom, иначе игнорируется
    pub custom_seconds: f32,
    /// Вероятность наложения при попадании, [0..1]
    pub chance: f32,
}

impl StatusEffectSpec {
    /// Разворачивает data-запись в рантайм-эффект. Пустой тег — диагностика
    /// и None: атака проходит без эффекта, бой не останавливается.
    pub fn instantiate(&self) -> Option<StatusEffect> {
        let kind = match self.kind {
            EffectKindTag::None => {
                log_warning(&format!(
                    "⚠️ Статус-эффект с пустым тегом (duration {:?}) — эффект не создан",
                    self.duration
                ));
                return None;
            }
            EffectKindTag::DisableParry => EffectKind::DisableParry,
            EffectKindTag::ReduceDamage => EffectKind::ReduceDamage,
        };
        Some(match self.duration {
            DurationKind::Custom => StatusEffect::custom(kind, self.custom_seconds),
            duration => StatusEffect::new(kind, duration),
        })
    }

    pub fn validate(&self, record: &str) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.chance) {
            return Err(ConfigError::ChanceOutOfRange {
                record: record.to_string(),
                value: self.chance,
            });
        }
        if self.custom_seconds < 0.0 {
            return Err(ConfigError::NegativeValue {
                record: record.to_string(),
                field: "custom_seconds",
                value: self.custom_seconds,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Атаки босса
// ============================================================================

/// Запись атаки босса. Каждая атака парируемая: окно открывается через
/// `window_open_delay` секунд после старта клипа.
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub struct BossAttackData {
    pub name: String,
    pub animation: String,
    pub animation_length: f32,
    pub damage: f32,
    pub stamina_cost: f32,
    /// Секунды от старта клипа до открытия окна парирования
    pub window_open_delay: f32,
    /// Статус-эффект при непарированном попадании
    pub effect: Option<StatusEffectSpec>,
}

impl BossAttackData {
    /// Обычная атака без эффекта.
    pub fn cleave() -> Self {
        Self {
            name: "Warden's Cleave".to_string(),
            animation: "boss_cleave".to_string(),
            animation_length: 2.0,
            damage: 14.0,
            stamina_cost: 10.0,
            window_open_delay: 0.5,
            effect: None,
        }
    }

    /// Эффектная атака: шанс запретить парирование на два хода.
    pub fn hex_of_stillness() -> Self {
        Self {
            name: "Hex of Stillness".to_string(),
            animation: "boss_hex".to_string(),
            animation_length: 2.2,
            damage: 6.0,
            stamina_cost: 12.0,
            window_open_delay: 0.6,
            effect: Some(StatusEffectSpec {
                kind: EffectKindTag::DisableParry,
                duration: DurationKind::TwoTurns,
                custom_seconds: 0.0,
                chance: 0.8,
            }),
        }
    }

    /// Эффектная атака: гарантированно режет исходящий урон цели на 6 секунд.
    pub fn withering_brand() -> Self {
        Self {
            name: "Withering Brand".to_string(),
            animation: "boss_brand".to_string(),
            animation_length: 2.4,
            damage: 8.0,
            stamina_cost: 14.0,
            window_open_delay: 0.55,
            effect: Some(StatusEffectSpec {
                kind: EffectKindTag::ReduceDamage,
                duration: DurationKind::Custom,
                custom_seconds: 6.0,
                chance: 1.0,
            }),
        }
    }

    /// Контратака после успешного «parry trade». Бесплатная и быстрая.
    pub fn counter_swipe() -> Self {
        Self {
            name: "Counter Swipe".to_string(),
            animation: "boss_counter".to_string(),
            animation_length: 1.4,
            damage: 10.0,
            stamina_cost: 0.0,
            window_open_delay: 0.35,
            effect: None,
        }
    }

    /// Атака считается «эффектной», если дизайнер прикрепил spec —
    /// даже с пустым тегом (тогда диагностика уйдёт при наложении).
    pub fn applies_effect(&self) -> bool {
        self.effect.is_some()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.animation_length <= 0.0 {
            return Err(ConfigError::NonPositiveLength {
                record: self.name.clone(),
                value: self.animation_length,
            });
        }
        if self.stamina_cost < 0.0 {
            return Err(ConfigError::NegativeValue {
                record: self.name.clone(),
                field: "stamina_cost",
                value: self.stamina_cost,
            });
        }
        if self.window_open_delay < 0.0 {
            return Err(ConfigError::NegativeValue {
                record: self.name.clone(),
                field: "window_open_delay",
                value: self.window_open_delay,
            });
        }
        if self.window_open_delay >= self.animation_length {
            return Err(ConfigError::WindowBeyondAnimation {
                record: self.name.clone(),
                delay: self.window_open_delay,
                length: self.animation_length,
            });
        }
        if let Some(effect) = &self.effect {
            effect.validate(&self.name)?;
        }
        Ok(())
    }
}
