//! Логические часы анимации.
//!
//! Ядро не знает про реальные клипы: оно владеет именованным таймером на
//! бойца, а слой движка снаружи зеркалит на него настоящие анимации.
//! Боевой логике разрешено ровно два вопроса: «что играет?» и
//! «какая нормализованная позиция?».

use bevy::prelude::*;

/// Текущее проигрываемое состояние анимации
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct AnimationState {
    pub name: String,
    /// Длина клипа в секундах (из data-записи действия)
    pub length: f32,
    pub elapsed: f32,
}

/// Аниматор бойца. `None` — стоит в idle.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Animator {
    pub current: Option<AnimationState>,
}

impl Animator {
    /// Запускает состояние с нуля, вытесняя предыдущее.
    pub fn play(&mut self, name: impl Into<String>, length: f32) {
        self.current = Some(AnimationState {
            name: name.into(),
            length,
            elapsed: 0.0,
        });
    }

    /// Сброс в idle (teardown, смерть).
    pub fn stop(&mut self) {
        self.current = None;
    }

    pub fn is_playing(&self, name: &str) -> bool {
        self.current.as_ref().is_some_and(|state| state.name == name)
    }

    /// Нормализованная позиция текущего состояния в [0.0, 1.0].
    ///
    /// Idle → 0.0. Вырожденный клип (length ≤ 0) считается завершённым
    /// сразу — действия на битых данных доигрываются за один тик, а не виснут.
    pub fn normalized_time(&self) -> f32 {
        match &self.current {
            None => 0.0,
            Some(state) if state.length <= 0.0 => 1.0,
            Some(state) => (state.elapsed / state.length).min(1.0),
        }
    }

    pub fn state_finished(&self, name: &str) -> bool {
        self.is_playing(name) && self.normalized_time() >= 1.0
    }
}

/// Продвигает все аниматоры на фиксированный шаг. Первая система тика:
/// всё остальное в кадре читает уже обновлённый прогресс.
pub fn advance_animators(time: Res<Time<Fixed>>, mut animators: Query<&mut Animator>) {
    let delta = time.delta_secs();
    for mut animator in animators.iter_mut() {
        if let Some(state) = animator.current.as_mut() {
            state.elapsed += delta;
        }
    }
}
