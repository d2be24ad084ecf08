use combat_core::{CombatEvent, PlayerChoice, ResultKind};
use combat_runtime::{AutoPilot, RuntimeConfig, ScriptedInput, Session, write_json_lines};

fn config(seed: u64, room: &[&str]) -> RuntimeConfig {
    RuntimeConfig {
        seed: Some(seed),
        room: room.iter().map(|id| id.to_string()).collect(),
        ..RuntimeConfig::default()
    }
}

#[test]
fn same_seed_same_digest() {
    let first = Session::new(config(11, &["goblin", "cave_spider"]))
        .unwrap()
        .run(&mut AutoPilot::default())
        .unwrap();
    let second = Session::new(config(11, &["goblin", "cave_spider"]))
        .unwrap()
        .run(&mut AutoPilot::default())
        .unwrap();

    assert_eq!(first.digest, second.digest);
    assert_eq!(first.result, second.result);
    assert_eq!(first.session_id, "session_11");
}

#[test]
fn autopilot_always_finishes() {
    for seed in 0..24 {
        let report = Session::new(config(seed, &["ogre", "wolf"]))
            .unwrap()
            .run(&mut AutoPilot::default())
            .unwrap();

        assert!(matches!(
            report.result.log().last(),
            Some(CombatEvent::EncounterEnded { .. })
        ));
        assert!(matches!(
            report.kind(),
            ResultKind::Victory | ResultKind::Defeat | ResultKind::Stalemate
        ));
        assert!((0..=report.player.max_hp()).contains(&report.player.hp()));
    }
}

#[test]
fn empty_room_reports_no_enemies() {
    let report = Session::new(config(5, &[]))
        .unwrap()
        .run(&mut AutoPilot::default())
        .unwrap();
    assert_eq!(report.kind(), ResultKind::NoEnemies);
    assert!(report.enemies.is_empty());
}

#[test]
fn max_rounds_override_forces_stalemate() {
    let mut cfg = config(8, &["drake"]);
    cfg.max_rounds = Some(2);
    let session = Session::new(cfg).unwrap();
    assert_eq!(session.content().config.max_rounds, Some(2));

    let mut input = ScriptedInput::new(Vec::new(), PlayerChoice::Defend);
    let report = session.run(&mut input).unwrap();
    match report.kind() {
        ResultKind::Stalemate | ResultKind::Defeat => {}
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn unknown_template_is_an_error() {
    let err = Session::new(config(1, &["lich"]))
        .unwrap()
        .run(&mut AutoPilot::default())
        .unwrap_err();
    assert!(err.to_string().contains("lich"));
}

#[test]
fn data_dir_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = RuntimeConfig {
        data_dir: Some(dir.path().join("missing")),
        ..RuntimeConfig::default()
    };
    assert!(Session::new(cfg).is_err());
}

#[test]
fn exported_log_matches_event_count() {
    let report = Session::new(config(21, &["goblin"]))
        .unwrap()
        .run(&mut AutoPilot::default())
        .unwrap();

    let mut out = Vec::new();
    write_json_lines(report.result.log(), &mut out).unwrap();
    let lines = String::from_utf8(out).unwrap().lines().count();
    assert_eq!(lines, report.result.log().len());
}
