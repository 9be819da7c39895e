//! Boss AI: выбор атаки на ход, перехваты атак игрока, parry trade.
//!
//! Никакого отдельного плагина: системы босса встроены в единую
//! FixedUpdate-цепочку боевого плагина, потому что их порядок относительно
//! систем игрока и окна парирования — часть контракта тика.

pub mod boss;
pub mod systems;


pub use boss::BossAi;
pub use systems::{
    boss_intercept_player_attacks, drive_boss_attack_sequences, drive_parry_trade,
    handle_boss_turns, POSTURE_PER_PARRY,
};
