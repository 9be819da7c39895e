//! Boss decision state: выбор атаки на ход и параметры parry trade.

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::combat::ActionKind;
use crate::data::{BossAttackData, ConfigError};
use crate::logger::log_warning;

/// Мозг босса. Владеет пулом атак и счётчиком ходов до эффектной атаки;
/// выбор — детерминированная функция от (счётчик, seeded RNG).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct BossAi {
    /// Пул атак хода. Эффектные записи (`applies_effect`) выдаются по
    /// расписанию счётчика, обычные — равномерно случайно.
    pub attack_pool: Vec<BossAttackData>,
    /// Каждые N ходов босс предпочитает эффектную атаку
    pub turns_between_effect_attacks: u32,
    /// Ходов с последней эффектной атаки
    pub turn_counter: u32,
    /// Шанс перехвата лёгкой атаки игрока, [0..1]
    pub parry_chance_light: f32,
    /// Шанс перехвата тяжёлой атаки игрока, [0..1]
    pub parry_chance_heavy: f32,
    /// Контратака после успешного перехвата
    pub counter_attack: BossAttackData,
    /// Секунды от перехвата до запуска контратаки
    pub counter_delay: f32,
}

impl Default for BossAi {
    fn default() -> Self {
        Self::veil_warden()
    }
}

impl BossAi {
    /// Страж Вуали — дуэльный босс по умолчанию.
    pub fn veil_warden() -> Self {
        Self {
            attack_pool: vec![
                BossAttackData::cleave(),
                BossAttackData::hex_of_stillness(),
                BossAttackData::withering_brand(),
            ],
            turns_between_effect_attacks: 3,
            turn_counter: 0,
            parry_chance_light: 0.35,
            parry_chance_heavy: 0.2,
            counter_attack: BossAttackData::counter_swipe(),
            counter_delay: 0.4,
        }
    }

    /// Выбор атаки на ход.
    ///
    /// Счётчик инкрементится каждый вызов; по достижении порога сбрасывается
    /// в ноль и, если в пуле есть эффектная запись, возвращается ПЕРВАЯ из
    /// них (детерминированно). Иначе — равномерно случайная обычная атака,
    /// с откатом на весь пул, если обычных нет. Пустой пул — диагностика
    /// и None, бой не останавливается.
    pub fn choose_attack_for_turn(&mut self, rng: &mut ChaCha8Rng) -> Option<BossAttackData> {
        if self.attack_pool.is_empty() {
            log_warning("⚠️ Пул атак босса пуст — ход пропущен");
            return None;
        }

        self.turn_counter += 1;
        if self.turn_counter >= self.turns_between_effect_attacks {
            self.turn_counter = 0;
            if let Some(attack) = self.attack_pool.iter().find(|attack| attack.applies_effect()) {
                return Some(attack.clone());
            }
        }

        let regular: Vec<&BossAttackData> = self
            .attack_pool
            .iter()
            .filter(|attack| !attack.applies_effect())
            .collect();
        let pick = if regular.is_empty() {
            // Пул целиком из эффектных — берём любую
            &self.attack_pool[rng.gen_range(0..self.attack_pool.len())]
        } else {
            regular[rng.gen_range(0..regular.len())]
        };
        Some(pick.clone())
    }

    /// Шанс перехвата для вида атаки игрока. Скиллы неперехватываемы.
    pub fn interception_chance(&self, kind: ActionKind) -> f32 {
        match kind {
            ActionKind::LightAttack => self.parry_chance_light,
            ActionKind::HeavyAttack => self.parry_chance_heavy,
            ActionKind::Skill => 0.0,
        }
    }

    /// Smoke-check данных босса на старте боя.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attack_pool.is_empty() {
            return Err(ConfigError::EmptyAttackPool);
        }
        for attack in &self.attack_pool {
            attack.validate()?;
        }
        self.counter_attack.validate()?;
        for (chance, field) in [
            (self.parry_chance_light, "parry_chance_light"),
            (self.parry_chance_heavy, "parry_chance_heavy"),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::ChanceOutOfRange {
                    record: field.to_string(),
                    value: chance,
                });
            }
        }
        if self.counter_delay < 0.0 {
            return Err(ConfigError::NegativeValue {
                record: "boss".to_string(),
                field: "counter_delay",
                value: self.counter_delay,
            });
        }
        Ok(())
    }
}
