//! Боевые события — контракт между ядром и внешними слоями.
//!
//! События делятся на три группы:
//! - входящие от внешних коллабораторов: `PlayerIntent` (input-слой),
//!   `BossTurnRequested` / `TurnEnded` (оркестратор ходов), `BattleTeardown`;
//! - нотификации наружу (UI/звук/лог, fire-and-forget): `ActionRefused`,
//!   `DamageDealt`, `EffectApplied`/`EffectExpired`/`EffectRemoved`,
//!   `ParryWindowResolved`, `BossAttackChosen`, `CharacterDied`;
//! - внутренняя маршрутизация между системами одного тика: `ActionStarted`,
//!   `QteResolved`, `ParryWindowOpened`, `AttackIntercepted`.
//!
//! Подписка скоупится временем жизни sequence-компонента: система читает
//! событие только пока компонент существует, удаление компонента — это
//! гарантированная отписка. Ручных subscribe/unsubscribe нет.

use bevy::prelude::*;

use crate::combat::components::{ActionKind, EffectKind, QteButton, RefusalReason};

// ============================================================================
// Входящие: input-слой
// ============================================================================

/// Намерение игрока. Внешний input-слой шлёт их как есть, ядро валидирует.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PlayerIntent {
    /// Лёгкая атака по текущей цели
    LightAttack,
    /// Тяжёлая атака по текущей цели
    HeavyAttack,
    /// Скилл по индексу в наборе действий игрока
    UseSkill { index: usize },
    /// Попытка парирования (засчитывается только внутри открытого окна)
    Parry,
    /// Ответ на QTE-промпт
    Qte { button: QteButton },
}

// ============================================================================
// Входящие: оркестратор ходов (внешний коллаборатор)
// ============================================================================

/// Оркестратор передал ход боссу.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct BossTurnRequested;

/// Граница хода: тикают ходовые статус-эффекты, восстанавливается стамина.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct TurnEnded;

/// Конец боя: принудительная отмена всех sequence, сброс директоров,
/// снятие всех эффектов. Единственный примитив отмены.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct BattleTeardown;

// ============================================================================
// Пайплайн действий
// ============================================================================

/// Действие игрока запущено (стамина уже списана, анимация играет).
///
/// Босс слушает это событие для перехвата: Light/Heavy перехватываемы,
/// скиллы — нет.
#[derive(Event, Debug, Clone, Copy)]
pub struct ActionStarted {
    pub performer: Entity,
    pub kind: ActionKind,
}

/// Действие дошло до завершающего сигнала.
///
/// Контракт: каждое запрошенное действие ровно один раз доходит сюда,
/// включая отказы (`performed: false`) — иначе внешний пайплайн ходов
/// зависнет в ожидании.
#[derive(Event, Debug, Clone, Copy)]
pub struct ActionCompleted {
    pub performer: Entity,
    /// true — действие исполнилось; false — отказ без мутаций
    pub performed: bool,
}

/// Действие отклонено до исполнения. Дублируется `ActionCompleted
/// { performed: false }` для пайплайна; это событие — для UI-нотификации.
#[derive(Event, Debug, Clone, Copy)]
pub struct ActionRefused {
    pub performer: Entity,
    pub reason: RefusalReason,
}

/// Урон применён к цели.
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    /// Итоговый урон после всех множителей (QTE, статус-эффекты)
    pub amount: f32,
    pub target_died: bool,
}

/// Боец умер (health достиг нуля). Генерируется ровно один раз.
#[derive(Event, Debug, Clone, Copy)]
pub struct CharacterDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

// ============================================================================
// Парирование
// ============================================================================

/// Окно парирования открылось (телеграф для UI).
#[derive(Event, Debug, Clone, Copy)]
pub struct ParryWindowOpened {
    pub defender: Entity,
}

/// Окно закрылось; защёлка прочитана ровно один раз.
#[derive(Event, Debug, Clone, Copy)]
pub struct ParryWindowResolved {
    pub defender: Entity,
    pub attacker: Entity,
    pub success: bool,
}

/// Босс перехватил исходящую атаку игрока (parry trade, шаг 1).
/// Урон атаки будет подавлен на hit-кадре; после задержки босс контратакует.
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackIntercepted {
    pub boss: Entity,
    pub victim: Entity,
    pub kind: ActionKind,
}

// ============================================================================
// QTE
// ============================================================================

/// QTE-промпт открыт; UI показывает ожидаемую кнопку.
#[derive(Event, Debug, Clone, Copy)]
pub struct QtePromptOpened {
    pub performer: Entity,
    pub expected: QteButton,
}

/// QTE-промпт разрешён (ввод или таймаут).
#[derive(Event, Debug, Clone, Copy)]
pub struct QteResolved {
    pub performer: Entity,
    pub success: bool,
}

// ============================================================================
// Статус-эффекты
// ============================================================================

/// Эффект наложен (или освежён повторным наложением).
#[derive(Event, Debug, Clone, Copy)]
pub struct EffectApplied {
    pub target: Entity,
    pub kind: EffectKind,
    /// true — уже был активен, счётчики освежены вместо дубля
    pub refreshed: bool,
}

/// Эффект истёк по своему счётчику.
#[derive(Event, Debug, Clone, Copy)]
pub struct EffectExpired {
    pub target: Entity,
    pub kind: EffectKind,
}

/// Эффект снят досрочно (teardown или явное снятие).
#[derive(Event, Debug, Clone, Copy)]
pub struct EffectRemoved {
    pub target: Entity,
    pub kind: EffectKind,
}

// ============================================================================
// Босс
// ============================================================================

/// Босс выбрал атаку на свой ход (нотификация «boss chose attack X»).
#[derive(Event, Debug, Clone)]
pub struct BossAttackChosen {
    pub boss: Entity,
    pub attack_name: String,
    pub applies_effect: bool,
}
