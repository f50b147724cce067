use glam::Vec3;

use crate::config::GameConfig;
use crate::controller::input::InputDispatcher;
use crate::controller::locomotion::LocomotionController;
use crate::controller::weapon::WeaponController;
use crate::model::{Arena, ArenaMover, AudioSink, Body, CameraRig, Ray};

/// Radius of the player's collision volume.
pub const BODY_RADIUS: f32 = 0.4;

/// Scaled simulation time. Stands still while paused, which also holds any
/// running reload.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameClock {
    now: f64,
}

impl GameClock {
    pub fn advance(&mut self, dt: f32, time_scale: f32) {
        self.now += (dt * time_scale) as f64;
    }

    pub fn now(&self) -> f64 {
        self.now
    }
}

/// One life of the player in the game scene: the arena plus the components
/// acting on it. Dropping the session and building a new one is a respawn.
pub struct Session {
    pub arena: Arena,
    body: Body,
    pub camera: Option<CameraRig>,
    pub locomotion: LocomotionController,
    pub weapon: WeaponController,
    clock: GameClock,
}

impl Session {
    /// Spawn the player and register its components with the input dispatcher.
    pub fn start(config: &GameConfig, arena: Arena, dispatcher: &mut InputDispatcher) -> Self {
        let body = arena.spawn_body(BODY_RADIUS, config.movement.standing_height);
        let mut camera = CameraRig::new(config.movement.eye_height);
        camera.follow(body.feet);

        let mut locomotion = LocomotionController::new(
            config.movement.clone(),
            config.look.clone(),
            config.bob.clone(),
        );
        let mut weapon = WeaponController::new(config.weapon.clone());
        locomotion.start(dispatcher);
        weapon.start(dispatcher);
        tracing::info!(spawn = ?body.feet, "session started");

        Self {
            arena,
            body,
            camera: Some(camera),
            locomotion,
            weapon,
            clock: GameClock::default(),
        }
    }

    /// Release input registrations.
    pub fn end(&mut self, dispatcher: &mut InputDispatcher) {
        self.locomotion.stop(dispatcher);
        self.weapon.stop(dispatcher);
        tracing::info!("session ended");
    }

    /// Triggers first, then look/move/bob, then deferred weapon work.
    pub fn tick(
        &mut self,
        dt: f32,
        paused: bool,
        dispatcher: &mut InputDispatcher,
        audio: &mut dyn AudioSink,
    ) {
        self.clock.advance(dt, if paused { 0.0 } else { 1.0 });
        let now = self.clock.now();
        let aim = self.aim_ray();

        let mut mover = ArenaMover::new(&self.arena, &mut self.body);
        self.locomotion.process_input(dispatcher, paused, &mut mover, audio);
        self.weapon.process_input(dispatcher, now, paused, aim, &self.arena, audio);
        self.locomotion.tick(dt, paused, &mut mover, self.camera.as_mut(), audio);
        self.weapon.update(now);
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn position(&self) -> Vec3 {
        self.body.feet
    }

    pub fn body_height(&self) -> f32 {
        self.body.height
    }

    pub fn aim_ray(&self) -> Option<Ray> {
        self.camera.as_ref().map(CameraRig::aim_ray)
    }
}
