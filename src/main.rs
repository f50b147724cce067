use anyhow::Context;
use std::collections::HashSet;
use std::sync::Arc;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

use slaughtering_corps::{
    config::GameConfig,
    controller::{self, CursorMode, FrameLoopContext, InputEvent},
    logging,
    ui::{self, HudSnapshot, Screen},
    view::{Backdrop, FrameRenderer, GpuContext},
};

struct App {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: FrameRenderer,

    // egui
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,

    game: FrameLoopContext,

    pressed_keys: HashSet<KeyCode>,
    applied_cursor: Option<CursorMode>,
    last_frame_time: std::time::Instant,
}

impl App {
    async fn new(window: Arc<Window>, config: GameConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create window surface")?;
        let gpu = GpuContext::new_native(&instance, surface, size.width, size.height).await?;
        let renderer = FrameRenderer::new(&gpu);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );

        Ok(Self {
            window,
            gpu,
            renderer,
            egui_state,
            egui_ctx,
            game: FrameLoopContext::new(config),
            pressed_keys: HashSet::new(),
            applied_cursor: None,
            last_frame_time: std::time::Instant::now(),
        })
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        // Menus get first pick of events while the cursor is free
        let egui_captured = self.egui_state.on_window_event(self.window.as_ref(), event).consumed;
        if egui_captured && self.game.cursor_mode() == CursorMode::Free {
            return true;
        }

        match event {
            WindowEvent::KeyboardInput { event: KeyEvent { state, physical_key, .. }, .. } => {
                if let PhysicalKey::Code(code) = physical_key {
                    match state {
                        ElementState::Pressed => {
                            // OS key repeat arrives as repeated presses
                            if self.pressed_keys.insert(*code) {
                                self.game.handle_event(&InputEvent::KeyDown(format!("{code:?}")));
                            }
                        }
                        ElementState::Released => {
                            self.pressed_keys.remove(code);
                            self.game.handle_event(&InputEvent::KeyUp(format!("{code:?}")));
                        }
                    }
                }
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => controller::MouseButton::Left,
                    MouseButton::Right => controller::MouseButton::Right,
                    MouseButton::Middle => controller::MouseButton::Middle,
                    _ => return false,
                };
                self.game.handle_event(&InputEvent::MouseClick {
                    button,
                    is_down: *state == ElementState::Pressed,
                });
                true
            }
            WindowEvent::Focused(false) => {
                self.pressed_keys.clear();
                self.game.handle_event(&InputEvent::FocusLost);
                true
            }
            _ => false,
        }
    }

    fn handle_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.game.handle_event(&InputEvent::MouseMove { dx: dx as f32, dy: dy as f32 });
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gpu.resize(new_size.width, new_size.height);
    }

    /// Grab or release the pointer whenever the game changes its cursor mode.
    fn sync_cursor(&mut self) {
        let mode = self.game.cursor_mode();
        if self.applied_cursor == Some(mode) {
            return;
        }
        let locked = match mode {
            CursorMode::Locked => {
                let grabbed = self
                    .window
                    .set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
                if let Err(e) = &grabbed {
                    tracing::warn!("cursor grab failed: {e}");
                }
                self.window.set_cursor_visible(false);
                grabbed.is_ok()
            }
            CursorMode::Free => {
                let _ = self.window.set_cursor_grab(CursorGrabMode::None);
                self.window.set_cursor_visible(true);
                false
            }
        };
        self.applied_cursor = Some(mode);
        self.game.handle_event(&InputEvent::PointerLockChanged { locked });
    }

    fn update(&mut self, dt: f32) {
        self.sync_cursor();
        self.game.update(dt);
        for sound in self.game.take_audio() {
            tracing::debug!(?sound, "play sound");
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let hud = self
            .game
            .session()
            .map(|s| HudSnapshot::capture(s, &self.game.config.hud, self.game.fps));
        let paused = self.game.pause.is_paused();
        let (screen, backdrop) = match &hud {
            Some(hud) => (
                Screen::Game { hud, paused },
                if paused { Backdrop::Paused } else { Backdrop::Game },
            ),
            None => (Screen::MainMenu, Backdrop::Menu),
        };

        let (output, actions) = ui::build_ui(&self.egui_ctx, raw_input, &screen);
        for action in actions {
            self.game.apply(action);
        }
        self.egui_state.handle_platform_output(&self.window, output.platform_output);

        self.renderer.render(
            &self.gpu,
            &self.egui_ctx,
            output.shapes,
            output.textures_delta,
            self.window.scale_factor() as f32,
            backdrop,
        )
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let config = GameConfig::from_env_or_default()?;

    let event_loop = EventLoop::new()?;
    let window_attributes = Window::default_attributes()
        .with_title("Slaughtering Corps")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    let window = Arc::new(event_loop.create_window(window_attributes)?);

    let mut app = pollster::block_on(App::new(window, config))?;

    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(physical_size) => {
                            app.resize(*physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            let now = std::time::Instant::now();
                            let dt = (now - app.last_frame_time).as_secs_f32();
                            app.last_frame_time = now;

                            app.update(dt);

                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                    let size = app.window.inner_size();
                                    app.resize(size);
                                }
                                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                                Err(e) => tracing::warn!("surface error: {e:?}"),
                            }
                            if app.game.exit_requested() {
                                elwt.exit();
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::DeviceEvent { event: DeviceEvent::MouseMotion { delta }, .. } => {
                app.handle_mouse_motion(delta.0, delta.1);
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        }
    })?;
    Ok(())
}
