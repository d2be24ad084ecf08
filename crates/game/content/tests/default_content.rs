use combat_content::embedded;
use combat_core::{
    CombatEvent, Encounter, EncounterResult, EncounterView, PcgRng, PlayerChoice, RngOracle,
};

fn attack_first(view: &EncounterView<'_>) -> PlayerChoice {
    match view.living_enemies().next() {
        Some((id, _)) => PlayerChoice::attack(id),
        None => PlayerChoice::Defend,
    }
}

#[test]
fn spawned_rooms_fight_to_an_end() {
    let content = embedded::load().unwrap();

    for seed in 0..16u64 {
        let mut rng = PcgRng::seeded(seed);
        let room = content
            .enemies
            .spawn_room("den", &["goblin", "wolf", "cave_spider"], &mut rng)
            .unwrap();
        let player = content.spawn_player().unwrap();

        let encounter = Encounter::new(content.env(), player, room, PcgRng::seeded(rng.next_u64()));
        let (result, roster) = encounter.run(&mut attack_first);

        assert!(matches!(
            result.log().last(),
            Some(CombatEvent::EncounterEnded { .. })
        ));
        match result {
            EncounterResult::Victory { .. } => assert!(roster.all_enemies_dead()),
            EncounterResult::Defeat { .. } => assert_eq!(roster.player().hp(), 0),
            EncounterResult::Stalemate { rounds, .. } => assert_eq!(rounds, 100),
            other => panic!("unexpected result {:?}", other.kind()),
        }
    }
}

#[test]
fn boss_room_uses_fixed_rarity() {
    let content = embedded::load().unwrap();
    let mut rng = PcgRng::seeded(3);
    let room = content
        .enemies
        .spawn_room("lair", &["drake"], &mut rng)
        .unwrap();

    let drake = &room.enemies[0];
    assert_eq!(drake.name, "boss Young Drake");
    // 90 hp, 10 damage, 4 defence at the boss scale of 2.0
    assert_eq!(drake.max_hp(), 180);
    assert_eq!(drake.damage(), 20);
    assert_eq!(drake.defence(), 8);
    let profile = drake.profile.as_ref().unwrap();
    assert_eq!((profile.xp_reward, profile.gold_reward), (450, 240));
}
