use egui::{Color32, Context};
use glam::Vec3;

use crate::config::HudConfig;
use crate::controller::{Session, UiAction};
use crate::model::{RayQuery, Stance};

/// Everything the HUD shows for one frame, read from the session without mutating it.
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub ammo_text: String,
    pub crosshair_color: Color32,
    /// Fill fraction while reloading; `None` hides the bar.
    pub reload_bar: Option<f32>,
    pub debug: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugInfo {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub stance: Stance,
    pub grounded: bool,
    pub fps: f32,
}

fn rgb(c: [u8; 3]) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

impl HudSnapshot {
    pub fn capture(session: &Session, hud: &HudConfig, fps: f32) -> Self {
        let weapon = &session.weapon;
        let on_enemy = session
            .aim_ray()
            .and_then(|ray| session.arena.cast(ray.origin, ray.direction, hud.crosshair_check_range))
            .is_some_and(|hit| hit.tag == hud.enemy_tag);

        Self {
            ammo_text: format!("{} / {}", weapon.current_ammo(), weapon.max_ammo()),
            crosshair_color: if on_enemy {
                rgb(hud.enemy_crosshair_color)
            } else {
                rgb(hud.default_crosshair_color)
            },
            reload_bar: weapon
                .is_reloading()
                .then(|| weapon.reload_progress(session.now())),
            debug: DebugInfo {
                position: session.position(),
                yaw: session.locomotion.yaw(),
                pitch: session.locomotion.pitch(),
                stance: session.locomotion.stance(),
                grounded: session.locomotion.is_grounded(),
                fps,
            },
        }
    }
}

/// What to draw this frame.
pub enum Screen<'a> {
    MainMenu,
    Game { hud: &'a HudSnapshot, paused: bool },
}

/// Build the complete UI and return egui output plus any menu actions clicked.
pub fn build_ui(
    egui_ctx: &Context,
    raw_input: egui::RawInput,
    screen: &Screen,
) -> (egui::FullOutput, Vec<UiAction>) {
    let mut actions = Vec::new();
    let output = egui_ctx.run(raw_input, |ctx| {
        // egui may run more than one pass; only the last one counts.
        actions.clear();
        match screen {
            Screen::MainMenu => draw_main_menu(ctx, &mut actions),
            Screen::Game { hud, paused } => {
                draw_crosshair(ctx, hud.crosshair_color);
                draw_ammo(ctx, &hud.ammo_text);
                if let Some(progress) = hud.reload_bar {
                    draw_reload_bar(ctx, progress);
                }
                draw_debug_window(ctx, &hud.debug);
                if *paused {
                    draw_pause_menu(ctx, &mut actions);
                }
            }
        }
    });
    (output, actions)
}

fn draw_crosshair(ctx: &Context, color: Color32) {
    let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::TOP, egui::Id::new("crosshair")));
    let center = ctx.available_rect().center();
    let size = 10.0;
    let stroke = egui::Stroke::new(1.5, color);
    painter.line_segment(
        [egui::Pos2::new(center.x - size, center.y), egui::Pos2::new(center.x + size, center.y)],
        stroke,
    );
    painter.line_segment(
        [egui::Pos2::new(center.x, center.y - size), egui::Pos2::new(center.x, center.y + size)],
        stroke,
    );
}

fn draw_ammo(ctx: &Context, text: &str) {
    egui::Area::new(egui::Id::new("ammo"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(text).size(28.0).strong().color(Color32::WHITE));
        });
}

fn draw_reload_bar(ctx: &Context, progress: f32) {
    egui::Area::new(egui::Id::new("reload_bar"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -64.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("Reloading").small().color(Color32::WHITE));
            ui.add(egui::ProgressBar::new(progress).desired_width(200.0));
        });
}

fn draw_debug_window(ctx: &Context, debug: &DebugInfo) {
    egui::Window::new("Debug")
        .default_pos([8.0, 8.0])
        .default_open(false)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("FPS: {:.0}", debug.fps)).small());
            let p = debug.position;
            ui.label(egui::RichText::new(format!("Pos: x: {:.1} y: {:.1} z: {:.1}", p.x, p.y, p.z)).small());
            ui.label(egui::RichText::new(format!("Yaw: {:.1} Pitch: {:.1}", debug.yaw, debug.pitch)).small());
            ui.label(egui::RichText::new(format!("Stance: {:?} Grounded: {}", debug.stance, debug.grounded)).small());
            ui.separator();
            ui.label(egui::RichText::new("WASD - Move  Space - Jump").small());
            ui.label(egui::RichText::new("Shift - Sprint  C - Crouch").small());
            ui.label(egui::RichText::new("LMB - Fire  R - Reload  Esc - Pause").small());
        });
}

fn draw_pause_menu(ctx: &Context, actions: &mut Vec<UiAction>) {
    egui::Window::new("Paused")
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.vertical_centered_justified(|ui| {
                for (label, action) in [
                    ("Resume", UiAction::Resume),
                    ("Settings", UiAction::OpenSettings),
                    ("Quit to Menu", UiAction::QuitToMenu),
                    ("Quit to Desktop", UiAction::QuitToDesktop),
                ] {
                    if ui.button(label).clicked() {
                        actions.push(action);
                    }
                }
            });
        });
}

fn draw_main_menu(ctx: &Context, actions: &mut Vec<UiAction>) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.25);
            ui.label(egui::RichText::new("SLAUGHTERING CORPS").size(40.0).strong());
            ui.add_space(24.0);
            for (label, action) in [
                ("Play", UiAction::Play),
                ("Settings", UiAction::OpenSettings),
                ("Credits", UiAction::OpenCredits),
                ("Quit", UiAction::QuitGame),
            ] {
                let button = egui::Button::new(egui::RichText::new(label).size(20.0))
                    .min_size(egui::vec2(180.0, 36.0));
                if ui.add(button).clicked() {
                    actions.push(action);
                }
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::controller::input::{InputAction, InputDispatcher};
    use crate::model::Arena;

    fn session() -> (Session, InputDispatcher) {
        let mut dispatcher = InputDispatcher::new();
        let s = Session::start(&GameConfig::default(), Arena::shooting_range(), &mut dispatcher);
        (s, dispatcher)
    }

    #[test]
    fn test_hud_reads_ammo_and_enemy_crosshair() {
        let (s, _) = session();
        let hud = HudSnapshot::capture(&s, &HudConfig::default(), 60.0);
        assert_eq!(hud.ammo_text, "30 / 30");
        assert_eq!(hud.crosshair_color, Color32::from_rgb(255, 0, 0));
        assert_eq!(hud.reload_bar, None);
    }

    #[test]
    fn test_crosshair_default_color_off_target() {
        let (mut s, _) = session();
        if let Some(cam) = s.camera.as_mut() {
            cam.yaw = 180.0;
        }
        let hud = HudSnapshot::capture(&s, &HudConfig::default(), 60.0);
        assert_eq!(hud.crosshair_color, Color32::WHITE);
    }

    #[test]
    fn test_reload_bar_tracks_progress() {
        let (mut s, mut dispatcher) = session();
        let mut audio = Vec::new();
        dispatcher.publish(InputAction::Fire);
        s.tick(0.1, false, &mut dispatcher, &mut audio);
        dispatcher.publish(InputAction::Reload);
        s.tick(0.1, false, &mut dispatcher, &mut audio);
        for _ in 0..10 {
            s.tick(0.1, false, &mut dispatcher, &mut audio);
        }
        let hud = HudSnapshot::capture(&s, &HudConfig::default(), 60.0);
        assert_eq!(hud.ammo_text, "29 / 30");
        let bar = hud.reload_bar.unwrap();
        assert!((bar - 0.5).abs() < 1e-3, "bar at {bar}");
    }

    #[test]
    fn test_build_ui_runs_headless() {
        let (s, _) = session();
        let hud = HudSnapshot::capture(&s, &HudConfig::default(), 60.0);
        let ctx = Context::default();
        let (_, actions) = build_ui(&ctx, egui::RawInput::default(), &Screen::Game { hud: &hud, paused: true });
        assert!(actions.is_empty());
        let (_, actions) = build_ui(&ctx, egui::RawInput::default(), &Screen::MainMenu);
        assert!(actions.is_empty());
    }
}
