use crate::controller::input::{ActionKind, InputAction, InputDispatcher, Subscription};

/// How the OS cursor should behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    /// Hidden and grabbed; pointer motion drives the camera.
    Locked,
    /// Visible and free for clicking menus.
    Free,
}

/// Owns the pause flag for the game scene. Gameplay reads it through the
/// explicit `paused` argument of each tick.
#[derive(Default)]
pub struct PauseController {
    paused: bool,
    subscription: Option<Subscription>,
}

impl PauseController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, dispatcher: &mut InputDispatcher) {
        if self.subscription.is_none() {
            self.subscription = Some(dispatcher.subscribe(&[ActionKind::Pause]));
        }
    }

    pub fn stop(&mut self, dispatcher: &mut InputDispatcher) {
        if let Some(sub) = self.subscription.take() {
            dispatcher.unsubscribe(sub);
        }
    }

    /// Handle pause key presses queued since the last frame.
    pub fn process_input(&mut self, dispatcher: &mut InputDispatcher) {
        let Some(sub) = self.subscription.as_ref() else { return };
        let presses = dispatcher
            .drain(sub)
            .into_iter()
            .filter(|a| *a == InputAction::Pause)
            .count();
        for _ in 0..presses {
            self.toggle();
        }
    }

    pub fn toggle(&mut self) -> bool {
        self.paused = !self.paused;
        tracing::info!(paused = self.paused, "pause toggled");
        self.paused
    }

    pub fn resume(&mut self) {
        if self.paused {
            tracing::info!("resumed");
        }
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Multiplier applied to the game clock.
    pub fn time_scale(&self) -> f32 {
        if self.paused { 0.0 } else { 1.0 }
    }

    pub fn cursor_mode(&self) -> CursorMode {
        if self.paused { CursorMode::Free } else { CursorMode::Locked }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_scale_and_cursor() {
        let mut pause = PauseController::new();
        assert_eq!(pause.cursor_mode(), CursorMode::Locked);
        assert!(pause.toggle());
        assert_eq!(pause.time_scale(), 0.0);
        assert_eq!(pause.cursor_mode(), CursorMode::Free);
        pause.resume();
        assert!(!pause.is_paused());
        assert_eq!(pause.time_scale(), 1.0);
        assert_eq!(pause.cursor_mode(), CursorMode::Locked);
    }

    #[test]
    fn test_pause_key_presses_toggle() {
        let mut dispatcher = InputDispatcher::new();
        let mut pause = PauseController::new();
        pause.start(&mut dispatcher);
        dispatcher.publish(InputAction::Pause);
        pause.process_input(&mut dispatcher);
        assert!(pause.is_paused());
        dispatcher.publish(InputAction::Pause);
        dispatcher.publish(InputAction::Pause);
        pause.process_input(&mut dispatcher);
        assert!(pause.is_paused());
        pause.stop(&mut dispatcher);
        assert_eq!(dispatcher.subscriber_count(), 0);
    }
}
