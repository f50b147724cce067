use glam::{Vec2, Vec3};

use crate::config::{BobConfig, LookConfig, MovementConfig};
use crate::controller::input::{ActionKind, InputAction, InputDispatcher, Subscription};
use crate::model::camera::horizontal_axes;
use crate::model::{AudioEvent, AudioSink, CameraRig, PhysicalMover, Stance, StanceToggle};

/// Vertical speed held while grounded so the mover keeps ground contact.
pub const GROUNDED_VELOCITY: f32 = -2.0;
/// Planar input below this magnitude counts as standing still for bobbing.
pub const BOB_MOVE_THRESHOLD: f32 = 0.1;
/// Rate at which the camera eases back to its resting height.
pub const BOB_RETURN_RATE: f32 = 5.0;

const ACTIONS: [ActionKind; 5] = [
    ActionKind::Move,
    ActionKind::Look,
    ActionKind::Jump,
    ActionKind::Sprint,
    ActionKind::Crouch,
];

#[derive(Debug, Clone, Default)]
struct LocomotionState {
    move_input: Vec2,
    look_input: Vec2,
    stance: Stance,
    vertical_velocity: f32,
    /// Degrees, wrapped to [0, 360).
    yaw: f32,
    /// Degrees, positive looks down.
    pitch: f32,
    bob_phase: f32,
    grounded: bool,
}

/// Player movement, gravity, mouse look and camera bob.
pub struct LocomotionController {
    movement: MovementConfig,
    look: LookConfig,
    bob: BobConfig,
    state: LocomotionState,
    subscription: Option<Subscription>,
}

impl LocomotionController {
    pub fn new(movement: MovementConfig, look: LookConfig, bob: BobConfig) -> Self {
        Self {
            movement,
            look,
            bob,
            state: LocomotionState::default(),
            subscription: None,
        }
    }

    /// Begin receiving movement input.
    pub fn start(&mut self, dispatcher: &mut InputDispatcher) {
        if self.subscription.is_none() {
            self.subscription = Some(dispatcher.subscribe(&ACTIONS));
        }
    }

    /// Release the input registration. Sampled move/look values are kept.
    pub fn stop(&mut self, dispatcher: &mut InputDispatcher) {
        if let Some(sub) = self.subscription.take() {
            dispatcher.unsubscribe(sub);
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Apply everything the input source published since the last call.
    pub fn process_input(
        &mut self,
        dispatcher: &mut InputDispatcher,
        paused: bool,
        mover: &mut dyn PhysicalMover,
        audio: &mut dyn AudioSink,
    ) {
        let Some(sub) = self.subscription.as_ref() else { return };
        for action in dispatcher.drain(sub) {
            self.handle_action(action, paused, mover, audio);
        }
    }

    /// Raw move/look values always update; discrete triggers are ignored while paused.
    pub fn handle_action(
        &mut self,
        action: InputAction,
        paused: bool,
        mover: &mut dyn PhysicalMover,
        audio: &mut dyn AudioSink,
    ) {
        match action {
            InputAction::Move(v) => self.state.move_input = v,
            InputAction::Look(v) => self.state.look_input = v,
            _ if paused => tracing::trace!(?action, "ignored while paused"),
            InputAction::Jump => self.jump(audio),
            InputAction::Crouch => self.toggle_stance(StanceToggle::Crouch, mover),
            InputAction::Sprint => self.toggle_stance(StanceToggle::Sprint, mover),
            _ => {}
        }
    }

    fn jump(&mut self, audio: &mut dyn AudioSink) {
        if !self.state.grounded {
            tracing::trace!("jump ignored while airborne");
            return;
        }
        self.state.vertical_velocity = (self.movement.jump_height * -2.0 * self.movement.gravity).sqrt();
        audio.play(AudioEvent::Jump);
    }

    fn toggle_stance(&mut self, toggle: StanceToggle, mover: &mut dyn PhysicalMover) {
        let previous = self.state.stance;
        let next = previous.toggled(toggle);
        if next == previous {
            tracing::trace!(?toggle, "stance toggle ignored while crouched");
            return;
        }
        self.state.stance = next;
        let height = next.collider_height(&self.movement);
        if height != mover.height() {
            mover.set_height(height);
        }
        tracing::debug!(?previous, ?next, "stance changed");
    }

    /// Advance one simulation step: look, then move, then bob. No-op while paused.
    pub fn tick(
        &mut self,
        dt: f32,
        paused: bool,
        mover: &mut dyn PhysicalMover,
        mut camera: Option<&mut CameraRig>,
        audio: &mut dyn AudioSink,
    ) {
        if paused || !self.is_active() {
            return;
        }
        self.apply_look(camera.as_deref_mut());
        self.apply_movement(dt, mover, audio);
        if let Some(cam) = camera {
            self.apply_bob(dt, cam);
            cam.follow(mover.position());
        }
    }

    fn apply_look(&mut self, camera: Option<&mut CameraRig>) {
        let look = self.state.look_input * self.look.sensitivity;
        let limit = self.look.vertical_limit;
        self.state.yaw = (self.state.yaw + look.x).rem_euclid(360.0);
        self.state.pitch = (self.state.pitch - look.y).clamp(-limit, limit);

        if let Some(cam) = camera {
            cam.yaw = self.state.yaw;
            cam.pitch = self.state.pitch;
        }
    }

    fn apply_movement(&mut self, dt: f32, mover: &mut dyn PhysicalMover, audio: &mut dyn AudioSink) {
        let speed = self.state.stance.move_speed(&self.movement);
        let (forward, right) = horizontal_axes(self.state.yaw);
        let input = self.state.move_input;
        let mut motion = (right * input.x + forward * input.y) * speed;

        if self.state.grounded && self.state.vertical_velocity < 0.0 {
            self.state.vertical_velocity = GROUNDED_VELOCITY;
        }
        self.state.vertical_velocity += self.movement.gravity * dt;
        motion.y = self.state.vertical_velocity;

        let impact_velocity = self.state.vertical_velocity;
        let was_grounded = self.state.grounded;
        self.state.grounded = mover.submit_displacement(motion * dt);

        // Settling onto the floor at snap speed is not a landing.
        if self.state.grounded && !was_grounded && impact_velocity < GROUNDED_VELOCITY {
            audio.play(AudioEvent::Land);
        }
    }

    fn apply_bob(&mut self, dt: f32, cam: &mut CameraRig) {
        if self.state.move_input.length() < BOB_MOVE_THRESHOLD || !self.state.grounded {
            self.state.bob_phase = 0.0;
            let t = (dt * BOB_RETURN_RATE).min(1.0);
            cam.local_offset_y += (cam.resting_offset_y - cam.local_offset_y) * t;
            return;
        }

        let profile = self.state.stance.bob_profile(&self.bob);
        self.state.bob_phase += dt * profile.speed;
        cam.local_offset_y = cam.resting_offset_y + self.state.bob_phase.sin() * profile.amount;
    }

    pub fn stance(&self) -> Stance {
        self.state.stance
    }

    pub fn is_sprinting(&self) -> bool {
        self.state.stance.is_sprinting()
    }

    pub fn is_crouching(&self) -> bool {
        self.state.stance.is_crouching()
    }

    pub fn is_grounded(&self) -> bool {
        self.state.grounded
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.state.vertical_velocity
    }

    pub fn pitch(&self) -> f32 {
        self.state.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.state.yaw
    }

    pub fn bob_phase(&self) -> f32 {
        self.state.bob_phase
    }

    pub fn move_input(&self) -> Vec2 {
        self.state.move_input
    }

    pub fn look_input(&self) -> Vec2 {
        self.state.look_input
    }

    /// Horizontal velocity the current input asks for, before collision.
    pub fn desired_planar_velocity(&self) -> Vec3 {
        let (forward, right) = horizontal_axes(self.state.yaw);
        let input = self.state.move_input;
        (right * input.x + forward * input.y) * self.state.stance.move_speed(&self.movement)
    }
}
