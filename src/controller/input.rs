/// Platform-agnostic input handling: raw events in, gameplay actions out.
use std::collections::{HashSet, VecDeque};

use glam::Vec2;

/// Platform-independent input events
#[derive(Debug, Clone)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),

    /// Relative pointer motion in screen space (y grows downward).
    MouseMove { dx: f32, dy: f32 },
    MouseClick { button: MouseButton, is_down: bool },

    FocusLost,
    PointerLockChanged { locked: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// What the gameplay components consume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// Planar intent, x = strafe right, y = forward. Republished on every change.
    Move(Vec2),
    /// Look delta for the frame, y positive = up.
    Look(Vec2),
    Jump,
    Sprint,
    Crouch,
    Fire,
    Reload,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Move,
    Look,
    Jump,
    Sprint,
    Crouch,
    Fire,
    Reload,
    Pause,
}

impl InputAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            InputAction::Move(_) => ActionKind::Move,
            InputAction::Look(_) => ActionKind::Look,
            InputAction::Jump => ActionKind::Jump,
            InputAction::Sprint => ActionKind::Sprint,
            InputAction::Crouch => ActionKind::Crouch,
            InputAction::Fire => ActionKind::Fire,
            InputAction::Reload => ActionKind::Reload,
            InputAction::Pause => ActionKind::Pause,
        }
    }
}

/// Handle for a registration with the dispatcher. Not clonable, so releasing it
/// through [`InputDispatcher::unsubscribe`] ends the registration for good.
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    id: u64,
}

struct Subscriber {
    id: u64,
    kinds: HashSet<ActionKind>,
    queue: VecDeque<InputAction>,
}

/// Routes published actions to every subscriber interested in their kind.
/// Each subscriber drains its own queue during its update step.
#[derive(Default)]
pub struct InputDispatcher {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kinds: &[ActionKind]) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            kinds: kinds.iter().copied().collect(),
            queue: VecDeque::new(),
        });
        tracing::debug!(id, ?kinds, "input subscription added");
        Subscription { id }
    }

    /// Drop the registration and anything still queued for it.
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscribers.retain(|s| s.id != subscription.id);
        tracing::debug!(id = subscription.id, "input subscription released");
    }

    pub fn publish(&mut self, action: InputAction) {
        let kind = action.kind();
        for sub in self.subscribers.iter_mut().filter(|s| s.kinds.contains(&kind)) {
            sub.queue.push_back(action);
        }
    }

    pub fn drain(&mut self, subscription: &Subscription) -> Vec<InputAction> {
        self.subscribers
            .iter_mut()
            .find(|s| s.id == subscription.id)
            .map(|s| s.queue.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Key mapping configuration. Key names follow winit's `KeyCode` debug names.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
    pub jump: String,
    pub sprint: String,
    pub crouch: String,
    pub reload: String,
    pub pause: String,
    pub fire: MouseButton,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "KeyW".to_string(),
            backward: "KeyS".to_string(),
            left: "KeyA".to_string(),
            right: "KeyD".to_string(),
            jump: "Space".to_string(),
            sprint: "ShiftLeft".to_string(),
            crouch: "KeyC".to_string(),
            reload: "KeyR".to_string(),
            pause: "Escape".to_string(),
            fire: MouseButton::Left,
        }
    }
}

impl KeyBindings {
    fn trigger_for(&self, key: &str) -> Option<InputAction> {
        let bound = |name: &String| key.eq_ignore_ascii_case(name);
        if bound(&self.jump) {
            Some(InputAction::Jump)
        } else if bound(&self.sprint) {
            Some(InputAction::Sprint)
        } else if bound(&self.crouch) {
            Some(InputAction::Crouch)
        } else if bound(&self.reload) {
            Some(InputAction::Reload)
        } else if bound(&self.pause) {
            Some(InputAction::Pause)
        } else {
            None
        }
    }
}

/// Sampled device state. Turns raw events into actions on the dispatcher:
/// triggers on the press edge only, `Move` whenever the key-derived vector
/// changes, `Look` once per frame from accumulated pointer motion.
pub struct InputState {
    pub pressed_keys: HashSet<String>,
    pub look_delta: Vec2,
    pub pointer_locked: bool,
    bindings: KeyBindings,
    published_move: Vec2,
    published_look: Vec2,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            pressed_keys: HashSet::new(),
            look_delta: Vec2::ZERO,
            pointer_locked: false,
            bindings,
            published_move: Vec2::ZERO,
            published_look: Vec2::ZERO,
        }
    }

    /// Process an input event and publish whatever actions it produces
    pub fn process_event(&mut self, event: &InputEvent, dispatcher: &mut InputDispatcher) {
        match event {
            InputEvent::KeyDown(key) => {
                // Held keys auto-repeat; only the first down is a press.
                if self.pressed_keys.insert(key.clone()) {
                    if let Some(action) = self.bindings.trigger_for(key) {
                        dispatcher.publish(action);
                    }
                }
                self.publish_move(dispatcher);
            }
            InputEvent::KeyUp(key) => {
                self.pressed_keys.remove(key.as_str());
                self.publish_move(dispatcher);
            }
            InputEvent::MouseMove { dx, dy } => {
                if self.pointer_locked {
                    self.look_delta += Vec2::new(*dx, -*dy);
                }
            }
            InputEvent::MouseClick { button, is_down } => {
                if *is_down && *button == self.bindings.fire {
                    dispatcher.publish(InputAction::Fire);
                }
            }
            InputEvent::FocusLost => {
                self.clear_keys();
                self.look_delta = Vec2::ZERO;
                self.publish_move(dispatcher);
            }
            InputEvent::PointerLockChanged { locked } => {
                self.pointer_locked = *locked;
            }
        }
    }

    /// Publish the look delta gathered since the last frame. A zero delta is only
    /// published once, when motion stops.
    pub fn flush_look(&mut self, dispatcher: &mut InputDispatcher) {
        let delta = std::mem::take(&mut self.look_delta);
        if delta != Vec2::ZERO || self.published_look != Vec2::ZERO {
            dispatcher.publish(InputAction::Look(delta));
            self.published_look = delta;
        }
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.iter().any(|k| k.eq_ignore_ascii_case(key))
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }

    /// Planar move intent from the held direction keys, normalized on diagonals.
    pub fn move_vector(&self) -> Vec2 {
        let b = &self.bindings;
        let axis = |pos: &str, neg: &str| {
            (self.is_key_pressed(pos) as i32 - self.is_key_pressed(neg) as i32) as f32
        };
        let v = Vec2::new(axis(&b.right, &b.left), axis(&b.forward, &b.backward));
        if v.length_squared() > 1.0 { v.normalize() } else { v }
    }

    fn publish_move(&mut self, dispatcher: &mut InputDispatcher) {
        let v = self.move_vector();
        if v != self.published_move {
            self.published_move = v;
            dispatcher.publish(InputAction::Move(v));
        }
    }
}
