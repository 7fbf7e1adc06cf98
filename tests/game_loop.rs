mod support;

use std::sync::atomic::Ordering;
use std::time::Duration;

use glam::Vec2;

use blob_arena::domain::blob::{Blob, BlobKind};
use blob_arena::interface_adapters::snapshot::BlobKindTag;
use blob_arena::use_cases::players::{Activity, PlayerDecisions};
use blob_arena::use_cases::Clock;

use support::CountingMode;

#[test]
fn join_request_spawns_one_controlled_blob() {
    let h = support::harness();
    let (mode, counters) = CountingMode::new(4.0);
    h.game.start(100.0, Box::new(mode)).unwrap();

    let pid = h.players.register("alice");
    h.players.request_join(pid);
    h.game.update();

    {
        let players = h.players.lock();
        let player = players.get(&pid).unwrap();
        assert!(!player.join, "join request must be cleared once applied");
        assert_eq!(player.blobs.len(), 1);
    }

    let blobs = h.game.blobs();
    assert_eq!(blobs.len(), 1);
    match blobs[0].kind {
        BlobKindTag::Player { owner, controlled } => {
            assert_eq!(owner, pid);
            assert!(controlled);
        }
        other => panic!("expected a player blob, got {other:?}"),
    }
    assert!(blobs[0].x.abs() <= 100.0 && blobs[0].y.abs() <= 100.0);
    assert_eq!(counters.updates.load(Ordering::Relaxed), 1);
}

#[test]
fn fragments_steer_toward_shared_centroid() {
    let h = support::harness();
    let (mode, _) = CountingMode::new(4.0);
    h.game.start(100.0, Box::new(mode)).unwrap();

    let pid = h.players.register("bob");
    let owned = BlobKind::Player {
        owner: pid,
        controlled: true,
    };
    let b1 = h.game.add_blob(Blob::new(owned, Vec2::ZERO, 10.0));
    let b2 = h.game.add_blob(Blob::new(owned, Vec2::new(2.0, 0.0), 10.0));
    {
        let mut players = h.players.lock();
        players.get_mut(&pid).unwrap().blobs.extend([b1, b2]);
    }

    // Centroid (1,0), input (10,0): both fragments aim at (11,0), capped at
    // the mode's 4.0 speed limit since |input| = 10 exceeds it.
    h.players.set_decisions(
        pid,
        PlayerDecisions {
            velocity: Vec2::new(10.0, 0.0),
            activity: Activity::None,
        },
    );
    h.game.update();

    let blobs = h.game.blobs();
    assert_eq!(blobs.len(), 2);
    for blob in &blobs {
        assert!((blob.vx - 4.0).abs() < 1e-4, "vx was {}", blob.vx);
        assert!(blob.vy.abs() < 1e-4);
    }
}

#[test]
fn slow_input_is_not_raised_to_the_speed_cap() {
    let h = support::harness();
    let (mode, _) = CountingMode::new(4.0);
    h.game.start(100.0, Box::new(mode)).unwrap();

    let pid = h.players.register("carol");
    let blob = h.game.add_blob(Blob::new(
        BlobKind::Player {
            owner: pid,
            controlled: true,
        },
        Vec2::ZERO,
        10.0,
    ));
    h.players.lock().get_mut(&pid).unwrap().blobs.push(blob);

    h.players.set_decisions(
        pid,
        PlayerDecisions {
            velocity: Vec2::new(2.0, 0.0),
            activity: Activity::None,
        },
    );
    h.game.update();

    let blobs = h.game.blobs();
    assert!((blobs[0].vx - 2.0).abs() < 1e-4);
}

#[test]
fn expired_turn_resets_before_any_other_phase() {
    let h = support::harness();
    let (mode, counters) = CountingMode::new(4.0);
    h.game.start(100.0, Box::new(mode)).unwrap();
    h.game
        .add_blob(Blob::new(BlobKind::Food, Vec2::new(1.0, 1.0), 1.0));

    h.game.update();
    assert_eq!(h.game.tick_count(), 1);

    // Default turn length is five minutes.
    h.clock.advance(Duration::from_secs(6 * 60));
    h.game.update();

    assert_eq!(h.game.tick_count(), 0, "tick counter restarts with the turn");
    assert!(h.game.blobs().is_empty(), "reset clears the collection");
    assert!(h.game.is_started());
    assert_eq!(h.game.size(), 100.0);
    assert!(h.game.turn_end_instant() > h.clock.now());
    assert_eq!(counters.finishes.load(Ordering::Relaxed), 1);
    assert_eq!(counters.starts.load(Ordering::Relaxed), 2);
    // The expired tick ran no mode update.
    assert_eq!(counters.updates.load(Ordering::Relaxed), 1);
}

#[test]
fn overlapping_food_is_consumed_through_the_full_loop() {
    let h = support::harness();
    let (mode, _) = CountingMode::new(4.0);
    h.game.start(100.0, Box::new(mode)).unwrap();

    let pid = h.players.register("dave");
    let player_blob = h.game.add_blob(Blob::new(
        BlobKind::Player {
            owner: pid,
            controlled: true,
        },
        Vec2::ZERO,
        10.0,
    ));
    h.players
        .lock()
        .get_mut(&pid)
        .unwrap()
        .blobs
        .push(player_blob);
    let food = h
        .game
        .add_blob(Blob::new(BlobKind::Food, Vec2::new(5.0, 0.0), 1.0));

    h.game.update();

    let blobs = h.game.blobs();
    assert_eq!(blobs.len(), 1);
    assert!((blobs[0].mass - 11.0).abs() < 1e-4);
    assert!(h.tracker.removed.lock().unwrap().contains(&food));
}

#[test]
fn split_halves_each_eligible_fragment() {
    let h = support::harness();
    let (mode, _) = CountingMode::new(4.0);
    h.game.start(500.0, Box::new(mode)).unwrap();

    let pid = h.players.register("eve");
    let blob = h.game.add_blob(Blob::new(
        BlobKind::Player {
            owner: pid,
            controlled: true,
        },
        Vec2::ZERO,
        100.0,
    ));
    h.players.lock().get_mut(&pid).unwrap().blobs.push(blob);

    h.players.set_decisions(
        pid,
        PlayerDecisions {
            velocity: Vec2::new(10.0, 0.0),
            activity: Activity::Split,
        },
    );
    h.game.update();

    {
        let players = h.players.lock();
        let player = players.get(&pid).unwrap();
        assert_eq!(player.blobs.len(), 2);
        assert_eq!(
            player.decisions.activity,
            Activity::None,
            "activity must not be reapplied next tick"
        );
    }
    let mut masses: Vec<f32> = h.game.blobs().iter().map(|b| b.mass).collect();
    masses.sort_by(f32::total_cmp);
    assert_eq!(masses, vec![50.0, 50.0]);
}

#[test]
fn eject_sheds_a_fixed_mass_quantum() {
    let h = support::harness();
    let (mode, _) = CountingMode::new(4.0);
    h.game.start(500.0, Box::new(mode)).unwrap();

    let pid = h.players.register("frank");
    let blob = h.game.add_blob(Blob::new(
        BlobKind::Player {
            owner: pid,
            controlled: true,
        },
        Vec2::ZERO,
        100.0,
    ));
    h.players.lock().get_mut(&pid).unwrap().blobs.push(blob);

    h.players.set_decisions(
        pid,
        PlayerDecisions {
            velocity: Vec2::new(10.0, 0.0),
            activity: Activity::Eject,
        },
    );
    h.game.update();

    let blobs = h.game.blobs();
    assert_eq!(blobs.len(), 2);
    let pellet = blobs
        .iter()
        .find(|b| matches!(b.kind, BlobKindTag::Ejected { .. }))
        .expect("an ejected pellet should exist");
    assert!((pellet.mass - 14.0).abs() < 1e-4);
    let fragment = blobs
        .iter()
        .find(|b| matches!(b.kind, BlobKindTag::Player { .. }))
        .unwrap();
    assert!((fragment.mass - 86.0).abs() < 1e-4);
}
