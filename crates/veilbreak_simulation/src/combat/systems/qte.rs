//! QTE prompt systems.

use bevy::prelude::*;

use crate::combat::{PlayerIntent, QteDirector, QteResolved};
use crate::logger::log;

/// System: Ввод и таймаут QTE-промптов.
///
/// Порядок фиксирован: сначала ввод игрока этого тика, потом таймаут.
/// Нажатие на последнем тике жизни промпта успевает засчитаться, ввод без
/// живого промпта молча пропадает (директор его не принимает).
pub fn update_qte_prompts(
    time: Res<Time<Fixed>>,
    mut intent_events: EventReader<PlayerIntent>,
    mut director: ResMut<QteDirector>,
    mut resolved_events: EventWriter<QteResolved>,
) {
    for intent in intent_events.read() {
        let PlayerIntent::Qte { button } = intent else {
            continue;
        };
        let Some(outcome) = director.register_input(*button) else {
            log(&format!("❌ QTE-ввод {} без промпта — пропущен", button.label()));
            continue;
        };
        if outcome.success {
            log(&format!(
                "✅ QTE: {:?} нажал {} вовремя",
                outcome.performer,
                button.label()
            ));
        } else {
            log(&format!(
                "❌ QTE: {:?} нажал {} — ожидалась другая кнопка",
                outcome.performer,
                button.label()
            ));
        }
        resolved_events.write(QteResolved {
            performer: outcome.performer,
            success: outcome.success,
        });
    }

    if let Some(outcome) = director.tick(time.delta_secs()) {
        log(&format!("⏰ QTE: {:?} не успел — таймаут", outcome.performer));
        resolved_events.write(QteResolved {
            performer: outcome.performer,
            success: outcome.success,
        });
    }
}
