// Shared doubles and builders for the integration tests: a settable clock,
// a counting game mode and a tracker that records what it was told.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use blob_arena::domain::blob::BlobId;
use blob_arena::domain::mode::GameMode;
use blob_arena::domain::tuning::GameSettings;
use blob_arena::frameworks::CirclePhysics;
use blob_arena::frameworks::config::TICK_INTERVAL;
use blob_arena::use_cases::support::{Clock, SeededRandom};
use blob_arena::use_cases::tracker::StateTracker;
use blob_arena::use_cases::{Game, PlayerRepository};
use blob_arena::BlobSnapshot;

/// Manually advanced clock so turn deadlines are deterministic.
pub struct FixedClock {
    now: Mutex<Instant>,
}

impl FixedClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Instant::now()),
        })
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}

/// Mode double: counts hook invocations and caps speed at a known constant.
pub struct CountingMode {
    pub counters: Arc<ModeCounters>,
    pub max_speed: f32,
}

#[derive(Default)]
pub struct ModeCounters {
    pub starts: AtomicUsize,
    pub finishes: AtomicUsize,
    pub updates: AtomicUsize,
}

impl CountingMode {
    pub fn new(max_speed: f32) -> (Self, Arc<ModeCounters>) {
        let counters = Arc::new(ModeCounters::default());
        (
            Self {
                counters: Arc::clone(&counters),
                max_speed,
            },
            counters,
        )
    }
}

impl GameMode for CountingMode {
    fn on_start(&mut self, _game: &Game) {
        self.counters.starts.fetch_add(1, Ordering::Relaxed);
    }

    fn on_finish(&mut self, _game: &Game) {
        self.counters.finishes.fetch_add(1, Ordering::Relaxed);
    }

    fn on_update(&mut self, _game: &Game) {
        self.counters.updates.fetch_add(1, Ordering::Relaxed);
    }

    fn max_speed_for_mass(&self, _mass: f32) -> f32 {
        self.max_speed
    }
}

/// Tracker double recording resets and deregistrations.
#[derive(Default)]
pub struct RecordingTracker {
    pub resets: AtomicUsize,
    pub removed: Mutex<Vec<BlobId>>,
}

impl StateTracker for RecordingTracker {
    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }

    fn record(&self, _snapshot: BlobSnapshot) {}

    fn remove_blob(&self, id: BlobId) {
        self.removed.lock().unwrap().push(id);
    }
}

pub struct Harness {
    pub game: Arc<Game>,
    pub players: Arc<PlayerRepository>,
    pub tracker: Arc<RecordingTracker>,
    pub clock: Arc<FixedClock>,
}

/// Builds a game wired to deterministic doubles and the reference physics
/// provider. Velocity decay is disabled so steering outcomes are exact.
pub fn harness() -> Harness {
    let players = Arc::new(PlayerRepository::new());
    let tracker = Arc::new(RecordingTracker::default());
    let clock = FixedClock::new();

    let settings = GameSettings {
        velocity_decay: 1.0,
        ..GameSettings::default()
    };

    let game = Arc::new(Game::new(
        Box::new(CirclePhysics::new(TICK_INTERVAL.as_secs_f32())),
        Arc::clone(&players),
        tracker.clone() as Arc<dyn StateTracker>,
        clock.clone() as Arc<dyn Clock>,
        Box::new(SeededRandom::new(7)),
        settings,
    ));

    Harness {
        game,
        players,
        tracker,
        clock,
    }
}
