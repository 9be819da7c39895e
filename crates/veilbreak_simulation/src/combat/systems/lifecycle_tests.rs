//! Tests for death bookkeeping and battle teardown.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::ai::BossAi;
    use crate::combat::{
        ActionCompleted, ActionStarted, AttackSequence, BattleTeardown, BossAttackSequence,
        BossTurnRequested, CharacterDied, DamageDealt, EffectKind, EffectRemoved,
        ParryWindowOpened, PlayerIntent, QteResolved, StatusEffect, StatusEffects,
    };
    use crate::components::{Animator, Boss, CombatCapabilities, Dead, Health, Player};
    use crate::create_headless_app;

    fn duel_app(seed: u64) -> (App, Entity, Entity) {
        let mut app = create_headless_app(seed);
        let player = app.world_mut().spawn(Player).id();
        let boss = app.world_mut().spawn(Boss).id();
        {
            let mut ai = app.world_mut().get_mut::<BossAi>(boss).unwrap();
            ai.parry_chance_light = 0.0;
            ai.parry_chance_heavy = 0.0;
        }
        app.update();
        (app, player, boss)
    }

    fn drain<E: Event>(app: &mut App) -> Vec<E> {
        app.world_mut().resource_mut::<Events<E>>().drain().collect()
    }

    fn apply_effect(app: &mut App, target: Entity, effect: StatusEffect) {
        let world = app.world_mut();
        let mut caps = *world.get::<CombatCapabilities>(target).unwrap();
        world
            .get_mut::<StatusEffects>(target)
            .unwrap()
            .apply(effect, &mut caps);
        *world.get_mut::<CombatCapabilities>(target).unwrap() = caps;
    }

    #[test]
    fn test_lethal_hit_marks_dead_and_reports_killer_once() {
        let (mut app, player, boss) = duel_app(42);
        app.world_mut().get_mut::<Health>(boss).unwrap().current = 5.0;

        // Veil Rend (18 урона) убивает мгновенно
        app.world_mut().send_event(PlayerIntent::UseSkill { index: 1 });
        app.update();

        let damage = drain::<DamageDealt>(&mut app);
        assert_eq!(damage.len(), 1);
        assert!(damage[0].target_died);

        let died = drain::<CharacterDied>(&mut app);
        assert_eq!(died.len(), 1);
        assert_eq!(died[0].entity, boss);
        assert_eq!(died[0].killer, Some(player));
        assert!(app.world().get::<Dead>(boss).is_some());
        assert_eq!(app.world().get::<Health>(boss).unwrap().current, 0.0);

        // Смерть фиксируется ровно один раз
        let mut died_later = Vec::new();
        for _ in 0..10 {
            app.update();
            died_later.extend(drain::<CharacterDied>(&mut app));
        }
        assert!(died_later.is_empty());
    }

    #[test]
    fn test_in_flight_boss_attack_outlives_its_performer() {
        // Смерть не отменяет начатые действия — единственный примитив
        // отмены это teardown
        let (mut app, player, boss) = duel_app(42);
        app.world_mut().get_mut::<Health>(boss).unwrap().current = 10.0;

        app.world_mut().send_event(BossTurnRequested);
        for _ in 0..5 {
            app.update();
        }
        assert!(app.world().get::<BossAttackSequence>(boss).is_some());

        // Убиваем босса посреди его замаха
        app.world_mut().send_event(PlayerIntent::UseSkill { index: 1 });
        app.update();
        assert!(app.world().get::<Dead>(boss).is_some());
        let skill_damage = drain::<DamageDealt>(&mut app);
        assert_eq!(skill_damage.len(), 1);
        assert!(skill_damage[0].target_died);

        let mut damage = Vec::new();
        let mut completed = Vec::new();
        for _ in 0..150 {
            app.update();
            damage.extend(drain::<DamageDealt>(&mut app));
            completed.extend(drain::<ActionCompleted>(&mut app));
        }

        // Замах доигрался и попал
        assert_eq!(damage.len(), 1);
        assert_eq!(damage[0].amount, 14.0);
        assert_eq!(app.world().get::<Health>(player).unwrap().current, 86.0);
        assert!(completed
            .iter()
            .any(|completion| completion.performer == boss && completion.performed));
        assert!(app.world().get::<BossAttackSequence>(boss).is_none());
    }

    #[test]
    fn test_teardown_clears_all_battle_state() {
        let (mut app, player, boss) = duel_app(42);
        apply_effect(
            &mut app,
            player,
            StatusEffect::custom(EffectKind::DisableParry, 30.0),
        );

        // Поднимаем в воздух всё сразу: атаку игрока, атаку босса,
        // открытый QTE-промпт и запланированное окно парирования
        app.world_mut().send_event(PlayerIntent::LightAttack);
        app.world_mut().send_event(BossTurnRequested);
        for _ in 0..20 {
            app.update();
        }
        assert!(app.world().get::<AttackSequence>(player).is_some());
        assert!(app.world().get::<BossAttackSequence>(boss).is_some());

        app.world_mut().send_event(BattleTeardown);
        app.update();

        // Sequence-компоненты сняты без завершающих событий
        assert!(app.world().get::<AttackSequence>(player).is_none());
        assert!(app.world().get::<BossAttackSequence>(boss).is_none());
        assert!(drain::<ActionCompleted>(&mut app).is_empty());

        // Эффекты сняты с восстановлением способностей
        let removed = drain::<EffectRemoved>(&mut app);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].kind, EffectKind::DisableParry);
        assert!(app.world().get::<CombatCapabilities>(player).unwrap().can_parry);
        assert!(app
            .world()
            .get::<StatusEffects>(player)
            .unwrap()
            .effects
            .is_empty());

        // Аниматоры заглушены
        assert!(app.world().get::<Animator>(player).unwrap().current.is_none());
        assert!(app.world().get::<Animator>(boss).unwrap().current.is_none());

        // Директора сброшены: ни заглохших таймаутов, ни окон-призраков
        let mut ghost_qte = Vec::new();
        let mut ghost_windows = Vec::new();
        for _ in 0..40 {
            app.update();
            ghost_qte.extend(drain::<QteResolved>(&mut app));
            ghost_windows.extend(drain::<ParryWindowOpened>(&mut app));
        }
        assert!(ghost_qte.is_empty());
        assert!(ghost_windows.is_empty());

        // И бой можно начинать заново
        app.world_mut().send_event(PlayerIntent::LightAttack);
        app.update();
        assert_eq!(drain::<ActionStarted>(&mut app).len(), 1);
    }
}
