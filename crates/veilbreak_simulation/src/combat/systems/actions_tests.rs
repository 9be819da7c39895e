//! Tests for the player action pipeline (intents → sequences → completion).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::ai::BossAi;
    use crate::combat::{
        ActionCompleted, ActionKind, ActionRefused, ActionStarted, AttackSequence, DamageDealt,
        PlayerIntent, QtePromptOpened, QteResolved, RefusalReason, SkillSequence,
    };
    use crate::components::{Boss, Health, Player, Stamina};
    use crate::create_headless_app;

    /// Дуэльная песочница: игрок + босс, перехваты атак выключены —
    /// эти тесты про пайплайн действий, не про parry trade.
    fn duel_app(seed: u64) -> (App, Entity, Entity) {
        let mut app = create_headless_app(seed);
        let player = app.world_mut().spawn(Player).id();
        let boss = app.world_mut().spawn(Boss).id();
        {
            let mut ai = app.world_mut().get_mut::<BossAi>(boss).unwrap();
            ai.parry_chance_light = 0.0;
            ai.parry_chance_heavy = 0.0;
        }
        // Прогрев: инициализация времени до первых намерений
        app.update();
        (app, player, boss)
    }

    fn drain<E: Event>(app: &mut App) -> Vec<E> {
        app.world_mut().resource_mut::<Events<E>>().drain().collect()
    }

    #[test]
    fn test_light_attack_runs_full_pipeline() {
        let (mut app, player, boss) = duel_app(42);

        app.world_mut().send_event(PlayerIntent::LightAttack);
        app.update();

        let started = drain::<ActionStarted>(&mut app);
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].performer, player);
        assert_eq!(started[0].kind, ActionKind::LightAttack);
        // Стамина списана при запуске: 100 - 15
        assert_eq!(app.world().get::<Stamina>(player).unwrap().current, 85.0);
        assert!(app.world().get::<AttackSequence>(player).is_some());

        // Доигрываем клип (1.2s), на QTE не отвечаем
        let mut prompts = Vec::new();
        let mut damage = Vec::new();
        let mut completed = Vec::new();
        for _ in 0..90 {
            app.update();
            prompts.extend(drain::<QtePromptOpened>(&mut app));
            damage.extend(drain::<DamageDealt>(&mut app));
            completed.extend(drain::<ActionCompleted>(&mut app));
        }

        assert_eq!(prompts.len(), 2);
        // Без успешных QTE урон базовый
        assert_eq!(damage.len(), 1);
        assert_eq!(damage[0].amount, 10.0);
        assert_eq!(damage[0].target, boss);
        assert!(!damage[0].target_died);
        assert_eq!(app.world().get::<Health>(boss).unwrap().current, 90.0);

        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].performer, player);
        assert!(completed[0].performed);
        assert!(app.world().get::<AttackSequence>(player).is_none());
    }

    #[test]
    fn test_qte_successes_compound_attack_damage() {
        let (mut app, player, boss) = duel_app(7);

        app.world_mut().send_event(PlayerIntent::LightAttack);

        let mut resolved = Vec::new();
        let mut damage = Vec::new();
        for _ in 0..90 {
            app.update();
            // Эхо: жмём ровно ту кнопку, которую просит промпт
            for prompt in drain::<QtePromptOpened>(&mut app) {
                assert_eq!(prompt.performer, player);
                app.world_mut().send_event(PlayerIntent::Qte {
                    button: prompt.expected,
                });
            }
            resolved.extend(drain::<QteResolved>(&mut app));
            damage.extend(drain::<DamageDealt>(&mut app));
        }

        assert_eq!(resolved.len(), 2);
        assert!(resolved.iter().all(|outcome| outcome.success));
        // 10 × 1.5² — множитель компаундится по числу успехов
        assert_eq!(damage.len(), 1);
        assert_eq!(damage[0].amount, 22.5);
        assert_eq!(app.world().get::<Health>(boss).unwrap().current, 77.5);
    }

    /// Намерение тяжёлой атаки обязано взять именно тяжёлую запись набора
    /// и дойти до completed — тихо уронить атакующее намерение нельзя.
    #[test]
    fn test_heavy_attack_uses_heavy_data() {
        let (mut app, player, boss) = duel_app(42);

        app.world_mut().send_event(PlayerIntent::HeavyAttack);
        app.update();

        let started = drain::<ActionStarted>(&mut app);
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].kind, ActionKind::HeavyAttack);
        // Списана стоимость тяжёлой атаки: 100 - 30
        assert_eq!(app.world().get::<Stamina>(player).unwrap().current, 70.0);
        let sequence = app.world().get::<AttackSequence>(player).unwrap();
        assert_eq!(sequence.data.name, "Veilbreaker Arc");
        assert_eq!(sequence.data.qte_marks.len(), 3);

        // Клип 1.8s доигрывается, базовый урон тяжёлой — 22
        let mut damage = Vec::new();
        let mut completed = Vec::new();
        for _ in 0..120 {
            app.update();
            damage.extend(drain::<DamageDealt>(&mut app));
            completed.extend(drain::<ActionCompleted>(&mut app));
        }
        assert_eq!(damage.len(), 1);
        assert_eq!(damage[0].amount, 22.0);
        assert_eq!(app.world().get::<Health>(boss).unwrap().current, 78.0);
        assert_eq!(completed.len(), 1);
        assert!(completed[0].performed);
    }

    #[test]
    fn test_attack_refused_without_stamina() {
        let (mut app, player, _boss) = duel_app(42);
        app.world_mut().get_mut::<Stamina>(player).unwrap().current = 10.0;

        app.world_mut().send_event(PlayerIntent::HeavyAttack);
        app.update();

        let refused = drain::<ActionRefused>(&mut app);
        assert_eq!(refused.len(), 1);
        assert!(matches!(
            refused[0].reason,
            RefusalReason::InsufficientStamina { cost, available }
                if cost == 30.0 && available == 10.0
        ));
        // Отказ всё равно доводит пайплайн до completed
        let completed = drain::<ActionCompleted>(&mut app);
        assert_eq!(completed.len(), 1);
        assert!(!completed[0].performed);
        // И ничего не мутирует
        assert!(drain::<ActionStarted>(&mut app).is_empty());
        assert_eq!(app.world().get::<Stamina>(player).unwrap().current, 10.0);
        assert!(app.world().get::<AttackSequence>(player).is_none());
    }

    #[test]
    fn test_intent_refused_while_action_in_flight() {
        let (mut app, player, _boss) = duel_app(42);

        app.world_mut().send_event(PlayerIntent::LightAttack);
        app.update();
        assert_eq!(drain::<ActionStarted>(&mut app).len(), 1);

        app.world_mut().send_event(PlayerIntent::LightAttack);
        app.update();

        let refused = drain::<ActionRefused>(&mut app);
        assert_eq!(refused.len(), 1);
        assert!(matches!(refused[0].reason, RefusalReason::ActionInFlight));
        // Стамина списана ровно один раз
        assert_eq!(app.world().get::<Stamina>(player).unwrap().current, 85.0);
    }

    #[test]
    fn test_two_intents_same_tick_start_only_one() {
        // Sequence-компонент появляется на sync point; второй интент того же
        // тика обязан отсечься локальной отметкой, не компонентом
        let (mut app, player, _boss) = duel_app(42);

        app.world_mut().send_event(PlayerIntent::LightAttack);
        app.world_mut().send_event(PlayerIntent::LightAttack);
        app.update();

        assert_eq!(drain::<ActionStarted>(&mut app).len(), 1);
        let refused = drain::<ActionRefused>(&mut app);
        assert_eq!(refused.len(), 1);
        assert!(matches!(refused[0].reason, RefusalReason::ActionInFlight));
        assert_eq!(app.world().get::<Stamina>(player).unwrap().current, 85.0);
    }

    #[test]
    fn test_unknown_skill_refused() {
        let (mut app, _player, _boss) = duel_app(42);

        app.world_mut().send_event(PlayerIntent::UseSkill { index: 99 });
        app.update();

        let refused = drain::<ActionRefused>(&mut app);
        assert_eq!(refused.len(), 1);
        assert!(matches!(
            refused[0].reason,
            RefusalReason::UnknownSkill { index: 99 }
        ));
        let completed = drain::<ActionCompleted>(&mut app);
        assert_eq!(completed.len(), 1);
        assert!(!completed[0].performed);
    }

    #[test]
    fn test_dead_performer_refused() {
        let (mut app, player, _boss) = duel_app(42);
        app.world_mut().get_mut::<Health>(player).unwrap().current = 0.0;

        app.world_mut().send_event(PlayerIntent::LightAttack);
        app.update();

        let refused = drain::<ActionRefused>(&mut app);
        assert_eq!(refused.len(), 1);
        assert!(matches!(refused[0].reason, RefusalReason::PerformerDead));
        assert!(drain::<ActionStarted>(&mut app).is_empty());
    }

    #[test]
    fn test_dead_target_refused() {
        let (mut app, player, boss) = duel_app(42);
        app.world_mut().get_mut::<Health>(boss).unwrap().current = 0.0;

        app.world_mut().send_event(PlayerIntent::LightAttack);
        app.update();

        let refused = drain::<ActionRefused>(&mut app);
        assert_eq!(refused.len(), 1);
        assert!(matches!(refused[0].reason, RefusalReason::TargetDead));
        // Стамина не тронута: отказ раньше списания
        assert_eq!(app.world().get::<Stamina>(player).unwrap().current, 100.0);
    }

    #[test]
    fn test_skill_applies_damage_and_heal_immediately() {
        let (mut app, player, boss) = duel_app(42);
        app.world_mut().get_mut::<Health>(player).unwrap().current = 50.0;

        // Mending Cut: 8 урона, 5 лечения, стамина 20
        app.world_mut().send_event(PlayerIntent::UseSkill { index: 0 });
        app.update();

        let damage = drain::<DamageDealt>(&mut app);
        assert_eq!(damage.len(), 1);
        assert_eq!(damage[0].amount, 8.0);
        assert_eq!(app.world().get::<Health>(boss).unwrap().current, 92.0);
        assert_eq!(app.world().get::<Health>(player).unwrap().current, 55.0);
        assert_eq!(app.world().get::<Stamina>(player).unwrap().current, 80.0);
        assert!(app.world().get::<SkillSequence>(player).is_some());

        let started = drain::<ActionStarted>(&mut app);
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].kind, ActionKind::Skill);

        // Клип (1.0s) доигрывается чисто косметически: завершение без
        // повторного урона и без QTE
        let mut completed = Vec::new();
        let mut extra_damage = Vec::new();
        let mut prompts = Vec::new();
        for _ in 0..70 {
            app.update();
            completed.extend(drain::<ActionCompleted>(&mut app));
            extra_damage.extend(drain::<DamageDealt>(&mut app));
            prompts.extend(drain::<QtePromptOpened>(&mut app));
        }
        assert_eq!(completed.len(), 1);
        assert!(completed[0].performed);
        assert!(extra_damage.is_empty());
        assert!(prompts.is_empty());
        assert!(app.world().get::<SkillSequence>(player).is_none());
    }

    #[test]
    fn test_pure_damage_skill_does_not_heal() {
        let (mut app, player, boss) = duel_app(42);
        app.world_mut().get_mut::<Health>(player).unwrap().current = 50.0;

        // Veil Rend: 18 урона, без лечения
        app.world_mut().send_event(PlayerIntent::UseSkill { index: 1 });
        app.update();

        let damage = drain::<DamageDealt>(&mut app);
        assert_eq!(damage.len(), 1);
        assert_eq!(damage[0].amount, 18.0);
        assert_eq!(app.world().get::<Health>(boss).unwrap().current, 82.0);
        assert_eq!(app.world().get::<Health>(player).unwrap().current, 50.0);
    }
}
