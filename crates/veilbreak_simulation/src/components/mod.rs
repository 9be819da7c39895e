//! ECS Components для боевых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (Combatant, Health, Stamina, CombatCapabilities, Posture)
//! - animation: логические часы анимации (Animator)

pub mod actor;
pub mod animation;

// Re-exports для удобного импорта
pub use actor::*;
pub use animation::*;
