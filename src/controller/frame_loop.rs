use crate::config::GameConfig;
use crate::controller::input::{InputDispatcher, InputEvent, InputState, KeyBindings};
use crate::controller::pause::{CursorMode, PauseController};
use crate::controller::session::Session;
use crate::model::{Arena, AudioEvent};

/// Longest step the simulation will take; longer frames are truncated.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Requests coming back from the menus and HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Play,
    OpenSettings,
    OpenCredits,
    QuitGame,
    Resume,
    QuitToMenu,
    QuitToDesktop,
}

pub enum SceneState {
    MainMenu,
    Game(Box<Session>),
}

/// Main game loop state and update logic
pub struct FrameLoopContext {
    pub config: GameConfig,
    pub input_state: InputState,
    pub dispatcher: InputDispatcher,
    pub pause: PauseController,
    pub scene: SceneState,
    audio_events: Vec<AudioEvent>,
    exit_requested: bool,
    pub fps: f32,
    frame_count: u32,
    fps_timer: f32,
}

impl FrameLoopContext {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            input_state: InputState::new(KeyBindings::default()),
            dispatcher: InputDispatcher::new(),
            pause: PauseController::new(),
            scene: SceneState::MainMenu,
            audio_events: Vec::new(),
            exit_requested: false,
            fps: 0.0,
            frame_count: 0,
            fps_timer: 0.0,
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        self.input_state.process_event(event, &mut self.dispatcher);
    }

    /// Advance one frame of `dt` wall-clock seconds.
    pub fn update(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        self.frame_count += 1;
        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }

        self.input_state.flush_look(&mut self.dispatcher);

        if let SceneState::Game(session) = &mut self.scene {
            self.pause.process_input(&mut self.dispatcher);
            session.tick(dt, self.pause.is_paused(), &mut self.dispatcher, &mut self.audio_events);
        }
    }

    pub fn apply(&mut self, action: UiAction) {
        tracing::debug!(?action, "ui action");
        match action {
            UiAction::Play => self.load_game(),
            UiAction::OpenSettings => tracing::info!("settings menu is not available yet"),
            UiAction::OpenCredits => tracing::info!("credits screen is not available yet"),
            UiAction::QuitGame | UiAction::QuitToDesktop => {
                tracing::info!("quitting to desktop");
                self.exit_requested = true;
            }
            UiAction::Resume => self.pause.resume(),
            UiAction::QuitToMenu => self.load_main_menu(),
        }
    }

    fn load_game(&mut self) {
        if let SceneState::Game(session) = &mut self.scene {
            session.end(&mut self.dispatcher);
        }
        let session = Session::start(&self.config, Arena::shooting_range(), &mut self.dispatcher);
        self.pause.resume();
        self.pause.start(&mut self.dispatcher);
        self.scene = SceneState::Game(Box::new(session));
        tracing::info!("game scene loaded");
    }

    fn load_main_menu(&mut self) {
        if let SceneState::Game(session) = &mut self.scene {
            session.end(&mut self.dispatcher);
        }
        self.pause.resume();
        self.pause.stop(&mut self.dispatcher);
        self.scene = SceneState::MainMenu;
        tracing::info!("main menu loaded");
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.scene {
            SceneState::Game(session) => Some(session.as_ref()),
            SceneState::MainMenu => None,
        }
    }

    pub fn cursor_mode(&self) -> CursorMode {
        match self.scene {
            SceneState::MainMenu => CursorMode::Free,
            SceneState::Game(_) => self.pause.cursor_mode(),
        }
    }

    /// Sounds requested since the last call.
    pub fn take_audio(&mut self) -> Vec<AudioEvent> {
        std::mem::take(&mut self.audio_events)
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::MouseButton;

    fn click() -> InputEvent {
        InputEvent::MouseClick { button: MouseButton::Left, is_down: true }
    }

    #[test]
    fn test_menu_to_game_and_back() {
        let mut ctx = FrameLoopContext::new(GameConfig::default());
        assert!(ctx.session().is_none());
        assert_eq!(ctx.cursor_mode(), CursorMode::Free);

        ctx.handle_event(&click());
        ctx.update(0.016);

        ctx.apply(UiAction::Play);
        assert_eq!(ctx.cursor_mode(), CursorMode::Locked);
        assert_eq!(ctx.dispatcher.subscriber_count(), 3);
        assert_eq!(ctx.session().unwrap().weapon.current_ammo(), 30);

        ctx.handle_event(&click());
        ctx.update(0.016);
        assert_eq!(ctx.session().unwrap().weapon.current_ammo(), 29);
        assert_eq!(ctx.take_audio(), vec![AudioEvent::Shoot]);

        ctx.apply(UiAction::QuitToMenu);
        assert!(ctx.session().is_none());
        assert_eq!(ctx.dispatcher.subscriber_count(), 0);
    }

    #[test]
    fn test_escape_pauses_and_blocks_fire() {
        let mut ctx = FrameLoopContext::new(GameConfig::default());
        ctx.apply(UiAction::Play);
        ctx.handle_event(&InputEvent::KeyDown("Escape".into()));
        ctx.update(0.016);
        assert!(ctx.pause.is_paused());
        assert_eq!(ctx.cursor_mode(), CursorMode::Free);

        ctx.handle_event(&click());
        ctx.update(0.016);
        assert_eq!(ctx.session().unwrap().weapon.current_ammo(), 30);

        ctx.apply(UiAction::Resume);
        ctx.handle_event(&click());
        ctx.update(0.016);
        assert_eq!(ctx.session().unwrap().weapon.current_ammo(), 29);
    }

    #[test]
    fn test_quit_to_menu_unpauses() {
        let mut ctx = FrameLoopContext::new(GameConfig::default());
        ctx.apply(UiAction::Play);
        ctx.pause.toggle();
        ctx.apply(UiAction::QuitToMenu);
        assert!(!ctx.pause.is_paused());
        ctx.apply(UiAction::Play);
        assert!(!ctx.pause.is_paused());
        assert_eq!(ctx.dispatcher.subscriber_count(), 3);
    }

    #[test]
    fn test_quit_requests_exit() {
        let mut ctx = FrameLoopContext::new(GameConfig::default());
        ctx.apply(UiAction::OpenCredits);
        assert!(!ctx.exit_requested());
        ctx.apply(UiAction::QuitGame);
        assert!(ctx.exit_requested());
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut ctx = FrameLoopContext::new(GameConfig::default());
        ctx.apply(UiAction::Play);
        ctx.update(5.0);
        let now = ctx.session().unwrap().now();
        assert!((now - MAX_FRAME_DT as f64).abs() < 1e-6);
    }
}
