//! The authoritative game loop: blob collection ownership, turn lifecycle
//! and the per-tick state machine.
//!
//! One dedicated task drives [`Game::update`] on a fixed cadence. The blob
//! collection sits behind a single mutex; every phase that touches
//! membership takes it, and it is released across the physics step so that
//! collision-driven mutation can re-enter the locked API. Lock order, where
//! several are held: player repository, then collection, then physics.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use glam::Vec2;
use tracing::{debug, info, warn};

use crate::domain::blob::{Blob, BlobId, BlobKind, PlayerId};
use crate::domain::mode::{GameMode, NullMode};
use crate::domain::physics::{BodyId, Contact, PhysicsProvider};
use crate::domain::tuning::GameSettings;
use crate::error::GameError;
use crate::interface_adapters::snapshot::BlobSnapshot;
use crate::use_cases::players::{Activity, Player, PlayerRepository};
use crate::use_cases::support::{Clock, RandomSource};
use crate::use_cases::tracker::StateTracker;

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The live-blob collection. Guarded as a whole by one mutex on [`Game`];
/// no two tick phases ever observe it in an intermediate state.
#[derive(Default)]
struct BlobCollection {
    blobs: Vec<Blob>,
    next_id: u64,
}

impl BlobCollection {
    fn alloc_id(&mut self) -> BlobId {
        self.next_id += 1;
        BlobId(self.next_id)
    }

    fn contains(&self, id: BlobId) -> bool {
        self.index_of(id).is_some()
    }

    fn index_of(&self, id: BlobId) -> Option<usize> {
        self.blobs.iter().position(|b| b.id() == id)
    }

    fn index_of_body(&self, body: BodyId) -> Option<usize> {
        self.blobs.iter().position(|b| b.body_id() == Some(body))
    }

    fn get_mut(&mut self, id: BlobId) -> Option<&mut Blob> {
        self.blobs.iter_mut().find(|b| b.id() == id)
    }
}

/// The simulation core. Shared as `Arc<Game>` between the tick driver and
/// any external readers; all interior state is lock-protected.
pub struct Game {
    collection: Mutex<BlobCollection>,
    physics: Mutex<Box<dyn PhysicsProvider>>,
    mode: Mutex<Box<dyn GameMode>>,
    players: Arc<PlayerRepository>,
    tracker: Arc<dyn StateTracker>,
    clock: Arc<dyn Clock>,
    random: Mutex<Box<dyn RandomSource>>,
    settings: Mutex<GameSettings>,
    size: Mutex<f32>,
    turn_end: Mutex<Instant>,
    tick_count: AtomicU64,
    started: AtomicBool,
}

impl Game {
    pub fn new(
        physics: Box<dyn PhysicsProvider>,
        players: Arc<PlayerRepository>,
        tracker: Arc<dyn StateTracker>,
        clock: Arc<dyn Clock>,
        random: Box<dyn RandomSource>,
        settings: GameSettings,
    ) -> Self {
        let now = clock.now();
        Self {
            collection: Mutex::new(BlobCollection::default()),
            physics: Mutex::new(physics),
            mode: Mutex::new(Box::new(NullMode)),
            players,
            tracker,
            clock,
            random: Mutex::new(random),
            settings: Mutex::new(settings),
            size: Mutex::new(0.0),
            turn_end: Mutex::new(now),
            tick_count: AtomicU64::new(0),
            started: AtomicBool::new(false),
        }
    }

    // --- lifecycle ---------------------------------------------------------

    /// Initializes the world at the given half-extent and installs the mode.
    /// Fails while a turn is already running; `stop` first.
    pub fn start(&self, size: f32, mode: Box<dyn GameMode>) -> Result<(), GameError> {
        if self.started.load(Ordering::Acquire) {
            warn!("start requested while already running");
            return Err(GameError::AlreadyRunning);
        }

        *lock(&self.size) = size;
        lock(&self.physics).start(size);
        *lock(&self.mode) = mode;
        self.tick_count.store(0, Ordering::Relaxed);
        let turn = lock(&self.settings).turn_duration;
        *lock(&self.turn_end) = self.clock.now() + turn;
        self.started.store(true, Ordering::Release);

        self.with_mode(|mode, game| mode.on_start(game));
        info!(size, turn_secs = turn.as_secs(), "game started");
        Ok(())
    }

    /// Tears the turn down: releases tick waiters, runs the mode finish
    /// hook, empties the collection and stops the physics world. Safe to
    /// call when already stopped.
    pub fn stop(&self) {
        if !self.started.load(Ordering::Acquire) {
            return;
        }

        // Release anyone blocked on a tick boundary before the world goes
        // away.
        self.players.signal_tick_all();
        self.with_mode(|mode, game| mode.on_finish(game));

        {
            let mut collection = lock(&self.collection);
            let mut physics = lock(&self.physics);
            for blob in &mut collection.blobs {
                self.tracker.remove_blob(blob.id());
                blob.on_remove(physics.as_mut());
            }
            collection.blobs.clear();
        }
        self.players.clear_all();

        self.started.store(false, Ordering::Release);
        lock(&self.physics).stop();
        info!("game stopped");
    }

    /// Turn rollover: stop, then start again with the same size and mode.
    pub fn reset(&self) {
        let size = self.size();
        self.stop();
        let mode = std::mem::replace(&mut *lock(&self.mode), Box::new(NullMode));
        if let Err(error) = self.start(size, mode) {
            warn!(%error, "reset failed to restart");
        }
    }

    // --- collection --------------------------------------------------------

    /// Inserts a blob, creating its physics body first so physics state and
    /// membership never disagree under the lock.
    pub fn add_blob(&self, blob: Blob) -> BlobId {
        let mut collection = lock(&self.collection);
        let mut physics = lock(&self.physics);
        self.add_blob_locked(&mut collection, &mut physics, blob)
    }

    /// Removes a blob and deregisters it everywhere. Returns false when the
    /// id is not in the collection.
    pub fn remove_blob(&self, id: BlobId) -> bool {
        let mut collection = lock(&self.collection);
        let mut physics = lock(&self.physics);
        self.remove_blob_locked(&mut collection, &mut physics, id)
    }

    fn add_blob_locked(
        &self,
        collection: &mut BlobCollection,
        physics: &mut Box<dyn PhysicsProvider>,
        mut blob: Blob,
    ) -> BlobId {
        let id = collection.alloc_id();
        blob.assign_id(id);
        blob.on_create(physics.as_mut());
        collection.blobs.push(blob);
        id
    }

    fn remove_blob_locked(
        &self,
        collection: &mut BlobCollection,
        physics: &mut Box<dyn PhysicsProvider>,
        id: BlobId,
    ) -> bool {
        let Some(index) = collection.index_of(id) else {
            return false;
        };
        self.tracker.remove_blob(id);
        collection.blobs[index].on_remove(physics.as_mut());
        collection.blobs.swap_remove(index);
        true
    }

    /// Uniformly random position within world bounds.
    pub fn random_position(&self) -> Vec2 {
        let size = self.size();
        let mut random = lock(&self.random);
        Vec2::new(
            random.next_f32(-size, size),
            random.next_f32(-size, size),
        )
    }

    /// Picks a random food blob, removes it and returns its position as a
    /// spawn point; newly spawned players displace food instead of landing
    /// in arbitrary empty space. Falls back to a random in-bounds position
    /// when no food exists.
    pub fn remove_food_and_get_spawn_position(&self) -> Vec2 {
        let mut collection = lock(&self.collection);
        let food: Vec<BlobId> = collection
            .blobs
            .iter()
            .filter(|b| b.is_food())
            .map(Blob::id)
            .collect();

        if food.is_empty() {
            drop(collection);
            return self.random_position();
        }

        let pick = lock(&self.random).next_index(food.len());
        let id = food[pick];
        let position = collection
            .get_mut(id)
            .map(|b| b.position())
            .unwrap_or_default();
        let mut physics = lock(&self.physics);
        self.remove_blob_locked(&mut collection, &mut physics, id);
        position
    }

    /// Ready-only snapshot of the live blobs, for external readers.
    pub fn blobs(&self) -> Vec<BlobSnapshot> {
        let collection = lock(&self.collection);
        let physics = lock(&self.physics);
        collection
            .blobs
            .iter()
            .filter(|b| b.is_ready(physics.as_ref()))
            .map(BlobSnapshot::from)
            .collect()
    }

    // --- tick --------------------------------------------------------------

    /// Advances the world one tick. Called on a fixed external cadence.
    pub fn update(&self) {
        if !self.started.load(Ordering::Acquire) {
            return;
        }

        // Turn rollover preempts everything else this tick.
        if self.clock.now() >= self.turn_end_instant() {
            info!(tick = self.tick_count(), "turn deadline reached");
            self.reset();
            return;
        }

        self.tracker.reset();
        self.with_mode(|mode, game| mode.on_update(game));
        self.apply_player_decisions();

        // Push game-logic writes into the bodies, then step physics with the
        // collection lock released: collision handling may re-enter
        // add/remove, and holding the lock across the step would deadlock
        // against it.
        {
            let mut collection = lock(&self.collection);
            let mut physics = lock(&self.physics);
            for blob in &mut collection.blobs {
                blob.sync_with_physics(physics.as_mut(), false);
            }
        }
        let contacts = lock(&self.physics).step();
        {
            let mut collection = lock(&self.collection);
            let mut physics = lock(&self.physics);
            for blob in &mut collection.blobs {
                blob.sync_with_physics(physics.as_mut(), false);
            }
        }
        self.resolve_contacts(&contacts);

        // Per-blob behavior, then record the surviving ready blobs for the
        // diff consumers.
        {
            let settings = self.settings();
            let mut collection = lock(&self.collection);
            let physics = lock(&self.physics);
            for blob in &mut collection.blobs {
                blob.update(&settings);
                if blob.is_ready(physics.as_ref()) {
                    self.tracker.record(BlobSnapshot::from(&*blob));
                }
            }
        }

        self.tick_count.fetch_add(1, Ordering::Relaxed);
        self.players.signal_tick_all();
        for orphan in self.players.remove_unregistered_and_dead() {
            self.remove_blob(orphan);
        }
    }

    /// Dispatches the contacts reported by the physics step. Each pair gets
    /// `on_collision` both ways, first participant first; a `true` return
    /// means the callee consumed the other side, which is then removed.
    fn resolve_contacts(&self, contacts: &[Contact]) {
        if contacts.is_empty() {
            return;
        }
        let settings = self.settings();
        let mut collection = lock(&self.collection);
        let mut consumed: Vec<BlobId> = Vec::new();

        for contact in contacts {
            let Some(ai) = collection.index_of_body(contact.a) else {
                continue;
            };
            let Some(bi) = collection.index_of_body(contact.b) else {
                continue;
            };
            if ai == bi {
                continue;
            }
            let a_id = collection.blobs[ai].id();
            let b_id = collection.blobs[bi].id();
            if consumed.contains(&a_id) || consumed.contains(&b_id) {
                continue;
            }

            let (low, high) = if ai < bi { (ai, bi) } else { (bi, ai) };
            let (head, tail) = collection.blobs.split_at_mut(high);
            let (first, second) = (&mut head[low], &mut tail[0]);
            let (a, b) = if ai < bi {
                (first, second)
            } else {
                (second, first)
            };

            if a.on_collision(b, &settings) {
                consumed.push(b.id());
            } else if b.on_collision(a, &settings) {
                consumed.push(a.id());
            }
        }

        let mut physics = lock(&self.physics);
        for id in consumed {
            self.remove_blob_locked(&mut collection, &mut physics, id);
        }
    }

    /// Applies each player's pending input: join requests spawn a fresh
    /// controlled blob, steering targets the centroid of the player's blobs
    /// offset by the input, and the requested activity fires exactly once.
    fn apply_player_decisions(&self) {
        let mut players = self.players.lock();
        for (&player_id, player) in players.iter_mut() {
            if player.join {
                self.spawn_player(player_id, player);
                continue;
            }

            {
                let mut collection = lock(&self.collection);
                // Blobs eaten since last tick leave stale ownership behind.
                player.blobs.retain(|id| collection.contains(*id));
                if player.blobs.is_empty() {
                    continue;
                }

                let centroid = player
                    .blobs
                    .iter()
                    .filter_map(|id| collection.get_mut(*id).map(|b| b.position()))
                    .sum::<Vec2>()
                    / player.blobs.len() as f32;

                let input = player.decisions.velocity;
                let mode = lock(&self.mode);
                for id in &player.blobs {
                    let Some(blob) = collection.get_mut(*id) else {
                        continue;
                    };
                    if !blob.is_controlled() {
                        continue;
                    }
                    // Steer each fragment toward a point offset from the
                    // shared centroid, not at the raw input vector; split
                    // fragments then move as one body.
                    let toward = centroid + input - blob.position();
                    let Some(direction) = toward.try_normalize() else {
                        // Already at the target; leave velocity alone.
                        continue;
                    };
                    let speed = input
                        .length()
                        .min(mode.max_speed_for_mass(blob.mass()));
                    blob.set_velocity(direction * speed);
                }
            }

            match std::mem::take(&mut player.decisions.activity) {
                Activity::None => {}
                Activity::Split => self.split_player(player_id, player),
                Activity::Eject => self.eject_mass(player_id, player),
            }
        }
    }

    fn spawn_player(&self, player_id: PlayerId, player: &mut Player) {
        // Stale remnants from a previous life go first.
        for stale in std::mem::take(&mut player.blobs) {
            self.remove_blob(stale);
        }

        let position = self.remove_food_and_get_spawn_position();
        let start_mass = lock(&self.settings).player_start_mass;
        let blob = Blob::new(
            BlobKind::Player {
                owner: player_id,
                controlled: true,
            },
            position,
            start_mass,
        );
        let id = self.add_blob(blob);
        player.blobs.push(id);
        player.join = false;
        info!(
            player_id,
            player = %player.name,
            x = position.x,
            y = position.y,
            "player spawned"
        );
    }

    /// Halves every eligible controlled blob and launches the twin toward
    /// the input direction.
    fn split_player(&self, player_id: PlayerId, player: &mut Player) {
        let settings = self.settings();
        let direction = player
            .decisions
            .velocity
            .try_normalize()
            .unwrap_or(Vec2::X);

        let mut collection = lock(&self.collection);
        let mut physics = lock(&self.physics);
        let mut spawned = Vec::new();

        for id in player.blobs.clone() {
            let Some(blob) = collection.get_mut(id) else {
                continue;
            };
            if !blob.is_controlled() || blob.mass() < settings.min_split_mass {
                continue;
            }
            let half = blob.mass() / 2.0;
            blob.set_mass(half);
            let position = blob.position();

            let mut twin = Blob::new(
                BlobKind::Player {
                    owner: player_id,
                    controlled: true,
                },
                position,
                half,
            );
            twin.set_velocity(direction * settings.split_speed);
            spawned.push(self.add_blob_locked(&mut collection, &mut physics, twin));
        }

        if !spawned.is_empty() {
            debug!(player_id, fragments = spawned.len(), "player split");
            player.blobs.extend(spawned);
        }
    }

    /// Sheds a fixed mass quantum from the first eligible blob as an
    /// ejected-mass blob launched toward the input direction.
    fn eject_mass(&self, player_id: PlayerId, player: &mut Player) {
        let settings = self.settings();
        let direction = player
            .decisions
            .velocity
            .try_normalize()
            .unwrap_or(Vec2::X);

        let mut collection = lock(&self.collection);
        let mut physics = lock(&self.physics);

        for id in player.blobs.clone() {
            let Some(blob) = collection.get_mut(id) else {
                continue;
            };
            if !blob.is_controlled() || blob.mass() < settings.min_eject_mass {
                continue;
            }
            blob.set_mass(blob.mass() - settings.eject_mass);
            let origin = blob.position() + direction * blob.radius() as f32;

            let mut pellet = Blob::new(
                BlobKind::Ejected { owner: player_id },
                origin,
                settings.eject_mass,
            );
            pellet.set_velocity(direction * settings.eject_speed);
            let pellet_id = self.add_blob_locked(&mut collection, &mut physics, pellet);
            player.blobs.push(pellet_id);
            debug!(player_id, "mass ejected");
            break;
        }
    }

    fn with_mode(&self, f: impl FnOnce(&mut dyn GameMode, &Game)) {
        // The mode is borrowed out of its slot so hooks can call back into
        // the game without holding the mode lock.
        let mut mode = std::mem::replace(&mut *lock(&self.mode), Box::new(NullMode));
        f(mode.as_mut(), self);
        *lock(&self.mode) = mode;
    }

    // --- accessors ---------------------------------------------------------

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    pub fn turn_end_instant(&self) -> Instant {
        *lock(&self.turn_end)
    }

    pub fn size(&self) -> f32 {
        *lock(&self.size)
    }

    pub fn settings(&self) -> GameSettings {
        lock(&self.settings).clone()
    }

    pub fn set_settings(&self, settings: GameSettings) {
        *lock(&self.settings) = settings;
    }

    /// Adjusts the turn length used when the next turn starts.
    pub fn set_turn_minutes(&self, minutes: u64) {
        lock(&self.settings).set_turn_minutes(minutes);
    }

    pub fn players(&self) -> &PlayerRepository {
        &self.players
    }
}
