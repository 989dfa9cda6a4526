//! Integration test: Click -> Buy upgrades -> Collect -> Play online -> Save -> Resume offline
//!
//! This test drives the full session flow against the built-in catalog.

use atom_core::{
    default_catalog, FrenzyPhase, Game, GameEvent, ProductionConfig, RateKind, SaveData,
    SourceCategory, TowerNumber,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Helper to print a separator
fn separator(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {}", title);
    println!("{}\n", "=".repeat(60));
}

/// Helper to print both rates with their breakdown
fn print_production(game: &Game) {
    for &kind in RateKind::all() {
        let entry = game.production().entry(kind);
        println!("  {}: {}", kind.label(), entry.total);
        for line in entry.breakdown() {
            println!("    - {:?} {}: {}", line.kind, line.tag.label, line.tag.value);
        }
    }
}

fn new_game() -> Game {
    Game::new(default_catalog(), ProductionConfig::builtin())
}

fn make_test_rng() -> StdRng {
    StdRng::seed_from_u64(12345)
}

#[test]
fn test_full_session_flow() {
    let mut game = new_game();
    let mut rng = make_test_rng();

    separator("Clicking");
    for i in 0..50 {
        game.click(i as f64 * 0.2, &mut rng);
    }
    let resources = &game.state().resources;
    println!("  atoms after 50 clicks: {}", resources.atoms);
    assert_eq!(resources.manual_actions, 50);
    assert!(resources.atoms >= TowerNumber::from_f64(50.0));
    assert_eq!(resources.atoms, resources.lifetime_atoms);

    separator("Buying upgrades");
    let first_upgrade = game.catalog().upgrades[0].id.clone();
    let before = game.rate(RateKind::PerAction).max(game.rate(RateKind::PerTime));
    let outcome = game.purchase(&first_upgrade, 10.0);
    println!("  {} -> {:?}", first_upgrade, outcome);
    print_production(&game);
    let after = game.rate(RateKind::PerAction).max(game.rate(RateKind::PerTime));
    assert!(after >= before);

    separator("Collecting");
    for id in ["hydrogen", "helium", "plutonium", "oganesson"] {
        game.apply_event(
            &GameEvent::CollectibleCountChanged {
                id: id.to_string(),
                count: 2,
            },
            10.0,
        );
    }
    print_production(&game);
    let collection = game
        .production()
        .per_time
        .additions
        .iter()
        .filter(|tag| tag.category == SourceCategory::Collection)
        .count();
    assert!(collection > 0);

    separator("Online play");
    game.tick(10.0, &mut rng);
    let mut claimed = 0;
    let mut now = 10.0;
    while now < 610.0 {
        now += 1.0;
        game.tick(now, &mut rng);
        for &kind in RateKind::all() {
            if game.state().frenzy.phase(kind, now) == FrenzyPhase::Available
                && game.claim_frenzy(kind, now).is_claimed()
            {
                claimed += 1;
            }
        }
    }
    println!("  frenzy claims: {}", claimed);
    println!("  atoms: {}", game.state().resources.atoms);

    separator("Save and resume offline");
    let json = game.save(now).to_json().unwrap();
    let data = SaveData::from_json(&json).unwrap();
    let atoms_at_save = data.atoms;

    let mut resumed = new_game();
    resumed.load(&data, now);
    assert_eq!(resumed.state().upgrades, game.state().upgrades);
    assert_eq!(resumed.state().collectibles, game.state().collectibles);

    let report = resumed.resume_offline(now + 3600.0);
    println!("  credited {}s, gained {}", report.applied_secs, report.gained);
    assert_eq!(report.applied_secs, 3600.0);
    assert!(!report.capped);
    assert_eq!(resumed.state().resources.atoms, atoms_at_save + report.gained);
}

#[test]
fn test_seeded_sessions_match() {
    let play = || {
        let mut game = new_game();
        let mut rng = make_test_rng();
        game.tick(0.0, &mut rng);
        for second in 1..=300 {
            let now = second as f64;
            game.click(now, &mut rng);
            game.tick(now, &mut rng);
        }
        game.save(300.0)
    };
    assert_eq!(play(), play());
}
