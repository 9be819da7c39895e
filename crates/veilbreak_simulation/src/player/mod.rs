//! Player battle controller: набор доступных действий и их стоимости.
//!
//! Сам маркер `Player` живёт в `components::actor` рядом с `Boss`.
//! Перевод намерений в sequence-компоненты делает
//! `combat::systems::process_player_intents`; здесь только данные,
//! которыми этот перевод параметризуется, и витрина действий для UI.

use bevy::prelude::*;

use crate::combat::ActionKind;
use crate::components::Stamina;
use crate::data::{AttackAnimationData, ConfigError, SkillData};

/// Боевой набор игрока: какие атаки и скиллы ему доступны.
///
/// Данные клонируются в sequence при запуске действия — набор можно
/// менять между ходами, не трогая то, что уже в полёте.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PlayerActionSet {
    pub light_attack: AttackAnimationData,
    pub heavy_attack: AttackAnimationData,
    pub skills: Vec<SkillData>,
}

impl Default for PlayerActionSet {
    fn default() -> Self {
        Self {
            light_attack: AttackAnimationData::light(),
            heavy_attack: AttackAnimationData::heavy(),
            skills: vec![SkillData::mending_cut(), SkillData::veil_rend()],
        }
    }
}

/// Строка витрины действий: что показывает UI рядом с кнопкой.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionChoice {
    pub kind: ActionKind,
    pub name: String,
    pub stamina_cost: f32,
    /// Хватает ли стамины прямо сейчас
    pub affordable: bool,
}

impl PlayerActionSet {
    /// Данные атаки по виду — для внешнего слоя, разворачивающего выбор из
    /// витрины обратно в данные. Скилл адресуется индексом, не видом.
    pub fn attack(&self, kind: ActionKind) -> Option<&AttackAnimationData> {
        match kind {
            ActionKind::LightAttack => Some(&self.light_attack),
            ActionKind::HeavyAttack => Some(&self.heavy_attack),
            ActionKind::Skill => None,
        }
    }

    pub fn skill(&self, index: usize) -> Option<&SkillData> {
        self.skills.get(index)
    }

    /// Витрина действий с отметкой доступности (для UI-слоя).
    pub fn available_actions(&self, stamina: &Stamina) -> Vec<ActionChoice> {
        let mut choices = vec![
            ActionChoice {
                kind: ActionKind::LightAttack,
                name: self.light_attack.name.clone(),
                stamina_cost: self.light_attack.stamina_cost,
                affordable: stamina.can_afford(self.light_attack.stamina_cost),
            },
            ActionChoice {
                kind: ActionKind::HeavyAttack,
                name: self.heavy_attack.name.clone(),
                stamina_cost: self.heavy_attack.stamina_cost,
                affordable: stamina.can_afford(self.heavy_attack.stamina_cost),
            },
        ];
        for skill in &self.skills {
            choices.push(ActionChoice {
                kind: ActionKind::Skill,
                name: skill.name.clone(),
                stamina_cost: skill.stamina_cost,
                affordable: stamina.can_afford(skill.stamina_cost),
            });
        }
        choices
    }

    /// Smoke-check всех записей набора на старте боя.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.light_attack.validate()?;
        self.heavy_attack.validate()?;
        for skill in &self.skills {
            skill.validate()?;
        }
        Ok(())
    }
}
