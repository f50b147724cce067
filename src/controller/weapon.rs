//! Hitscan weapon: fire-rate cooldown, magazine accounting and timed reload.
//!
//! Every trigger that fails a guard is a silent no-op. Times are game-clock
//! seconds, which stand still while the game is paused.

use crate::config::WeaponConfig;
use crate::controller::deferred::DeferredTasks;
use crate::controller::input::{ActionKind, InputAction, InputDispatcher, Subscription};
use crate::model::{AudioEvent, AudioSink, Ray, RayHit, RayQuery};

/// Slack for clock values that land on the cooldown boundary by accumulation.
const COOLDOWN_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeaponPhase {
    Idle,
    Reloading { started_at: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeaponTask {
    CompleteReload,
}

/// Outcome of a shot that actually left the barrel.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotReport {
    pub fired_at: f64,
    /// `None` when nothing was within range or there was no aim ray to cast.
    pub hit: Option<RayHit>,
}

pub struct WeaponController {
    config: WeaponConfig,
    current_ammo: u32,
    phase: WeaponPhase,
    next_fire_time: f64,
    tasks: DeferredTasks<WeaponTask>,
    last_shot: Option<ShotReport>,
    subscription: Option<Subscription>,
}

impl WeaponController {
    /// A weapon with a full magazine.
    pub fn new(config: WeaponConfig) -> Self {
        Self {
            current_ammo: config.max_ammo,
            config,
            phase: WeaponPhase::Idle,
            next_fire_time: 0.0,
            tasks: DeferredTasks::new(),
            last_shot: None,
            subscription: None,
        }
    }

    pub fn start(&mut self, dispatcher: &mut InputDispatcher) {
        if self.subscription.is_none() {
            self.subscription = Some(dispatcher.subscribe(&[ActionKind::Fire, ActionKind::Reload]));
        }
    }

    /// Stop listening for triggers. A reload already running still completes.
    pub fn stop(&mut self, dispatcher: &mut InputDispatcher) {
        if let Some(sub) = self.subscription.take() {
            dispatcher.unsubscribe(sub);
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn process_input(
        &mut self,
        dispatcher: &mut InputDispatcher,
        now: f64,
        paused: bool,
        aim: Option<Ray>,
        rays: &dyn RayQuery,
        audio: &mut dyn AudioSink,
    ) {
        let Some(sub) = self.subscription.as_ref() else { return };
        for action in dispatcher.drain(sub) {
            match action {
                InputAction::Fire => {
                    self.fire(now, paused, aim, rays, audio);
                }
                InputAction::Reload => {
                    self.reload(now, paused, audio);
                }
                _ => {}
            }
        }
    }

    /// Try to fire one round along `aim`.
    pub fn fire(
        &mut self,
        now: f64,
        paused: bool,
        aim: Option<Ray>,
        rays: &dyn RayQuery,
        audio: &mut dyn AudioSink,
    ) -> Option<ShotReport> {
        if paused {
            tracing::trace!("fire ignored while paused");
            return None;
        }
        if now + COOLDOWN_TOLERANCE < self.next_fire_time || self.is_reloading() {
            tracing::trace!(now, next = self.next_fire_time, "fire ignored: cooling down or reloading");
            return None;
        }
        if self.current_ammo == 0 {
            tracing::trace!("fire ignored: magazine empty");
            return None;
        }

        self.current_ammo -= 1;
        self.next_fire_time = now + self.config.fire_rate;

        let hit = aim.and_then(|ray| rays.cast(ray.origin, ray.direction, self.config.max_range));
        match &hit {
            Some(hit) => tracing::debug!(tag = %hit.tag, distance = hit.distance, "shot hit"),
            None => tracing::debug!("shot missed"),
        }
        audio.play(AudioEvent::Shoot);

        let report = ShotReport { fired_at: now, hit };
        self.last_shot = Some(report.clone());
        Some(report)
    }

    /// Begin a reload. Returns whether one was started.
    pub fn reload(&mut self, now: f64, paused: bool, audio: &mut dyn AudioSink) -> bool {
        if paused || self.is_reloading() || self.current_ammo >= self.config.max_ammo {
            tracing::trace!(paused, ammo = self.current_ammo, "reload ignored");
            return false;
        }

        self.phase = WeaponPhase::Reloading { started_at: now };
        self.tasks.schedule(now + self.config.reload_time, WeaponTask::CompleteReload);
        audio.play(AudioEvent::Reload);
        tracing::debug!(ammo = self.current_ammo, ready_at = ?self.tasks.next_due(), "reload started");
        true
    }

    /// Run deferred work that has come due.
    pub fn update(&mut self, now: f64) {
        if self.tasks.is_empty() {
            return;
        }
        for task in self.tasks.take_due(now) {
            match task {
                WeaponTask::CompleteReload => {
                    self.current_ammo = self.config.max_ammo;
                    self.phase = WeaponPhase::Idle;
                    tracing::debug!(ammo = self.current_ammo, "reload complete");
                }
            }
        }
    }

    pub fn current_ammo(&self) -> u32 {
        self.current_ammo
    }

    pub fn max_ammo(&self) -> u32 {
        self.config.max_ammo
    }

    pub fn phase(&self) -> WeaponPhase {
        self.phase
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self.phase, WeaponPhase::Reloading { .. })
    }

    /// Fraction of the running reload that has elapsed, 0 when idle.
    pub fn reload_progress(&self, now: f64) -> f32 {
        match self.phase {
            WeaponPhase::Idle => 0.0,
            WeaponPhase::Reloading { started_at } => {
                (((now - started_at) / self.config.reload_time) as f32).clamp(0.0, 1.0)
            }
        }
    }

    /// Game-clock time at which the running reload completes.
    pub fn reload_ready_at(&self) -> Option<f64> {
        self.tasks.next_due()
    }

    pub fn next_fire_time(&self) -> f64 {
        self.next_fire_time
    }

    pub fn last_shot(&self) -> Option<&ShotReport> {
        self.last_shot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    struct Target(Option<&'static str>);

    impl RayQuery for Target {
        fn cast(&self, origin: Vec3, direction: Vec3, _max: f32) -> Option<RayHit> {
            self.0.map(|tag| RayHit {
                tag: tag.to_string(),
                distance: 10.0,
                point: origin + direction * 10.0,
            })
        }
    }

    fn aim() -> Option<Ray> {
        Some(Ray { origin: Vec3::ZERO, direction: Vec3::X })
    }

    fn weapon() -> WeaponController {
        WeaponController::new(WeaponConfig::default())
    }

    #[test]
    fn test_emptying_the_magazine() {
        let mut w = weapon();
        let mut audio = Vec::new();
        let rays = Target(None);
        for i in 0..30 {
            assert!(w.fire(i as f64 * 0.2, false, aim(), &rays, &mut audio).is_some());
        }
        assert_eq!(w.current_ammo(), 0);

        let next = w.next_fire_time();
        assert!(w.fire(30.0 * 0.2, false, aim(), &rays, &mut audio).is_none());
        assert_eq!(w.current_ammo(), 0);
        assert_eq!(w.next_fire_time(), next);
        assert_eq!(audio.len(), 30);
    }

    #[test]
    fn test_shots_exactly_fire_rate_apart_all_land() {
        let mut w = weapon();
        let mut audio = Vec::new();
        let rays = Target(None);
        for i in 0..30 {
            assert!(
                w.fire(i as f64 * 0.1, false, aim(), &rays, &mut audio).is_some(),
                "shot {i} rejected"
            );
        }
        assert_eq!(w.current_ammo(), 0);
        assert!(w.fire(3.0, false, aim(), &rays, &mut audio).is_none());
    }

    #[test]
    fn test_fire_rate_cooldown() {
        let mut w = weapon();
        let mut audio = Vec::new();
        let rays = Target(None);
        assert!(w.fire(1.0, false, aim(), &rays, &mut audio).is_some());
        assert!(w.fire(1.05, false, aim(), &rays, &mut audio).is_none());
        assert_eq!(w.current_ammo(), 29);
        assert!(w.fire(1.2, false, aim(), &rays, &mut audio).is_some());
        assert_eq!(w.current_ammo(), 28);
    }

    #[test]
    fn test_fire_reports_hit_tag() {
        let mut w = weapon();
        let mut audio = Vec::new();
        let report = w.fire(0.0, false, aim(), &Target(Some("Enemy")), &mut audio).unwrap();
        assert_eq!(report.hit.as_ref().map(|h| h.tag.as_str()), Some("Enemy"));
        assert_eq!(w.last_shot(), Some(&report));
        assert_eq!(audio, vec![AudioEvent::Shoot]);
    }

    #[test]
    fn test_fire_without_aim_still_spends_round() {
        let mut w = weapon();
        let mut audio = Vec::new();
        let report = w.fire(0.0, false, None, &Target(Some("Enemy")), &mut audio).unwrap();
        assert!(report.hit.is_none());
        assert_eq!(w.current_ammo(), 29);
    }

    #[test]
    fn test_reload_timeline() {
        let mut w = weapon();
        let mut audio = Vec::new();
        let rays = Target(None);
        for i in 0..25 {
            w.fire(i as f64, false, aim(), &rays, &mut audio);
        }
        assert_eq!(w.current_ammo(), 5);
        audio.clear();

        assert!(w.reload(100.0, false, &mut audio));
        assert_eq!(audio, vec![AudioEvent::Reload]);
        assert_eq!(w.reload_ready_at(), Some(102.0));
        w.update(101.0);
        assert!(w.is_reloading());
        assert!((w.reload_progress(101.0) - 0.5).abs() < 1e-6);
        assert_eq!(w.reload_progress(101.0), w.reload_progress(101.0));

        assert!(w.fire(101.5, false, aim(), &rays, &mut audio).is_none());
        assert!(!w.reload(101.5, false, &mut audio));
        assert_eq!(audio.len(), 1);

        w.update(102.0);
        assert!(!w.is_reloading());
        assert_eq!(w.reload_ready_at(), None);
        assert_eq!(w.current_ammo(), 30);
        assert_eq!(w.reload_progress(102.0), 0.0);
    }

    #[test]
    fn test_reload_at_full_ammo_is_noop() {
        let mut w = weapon();
        let mut audio = Vec::new();
        assert!(!w.reload(0.0, false, &mut audio));
        assert_eq!(w.phase(), WeaponPhase::Idle);
        assert!(audio.is_empty());
    }

    #[test]
    fn test_paused_triggers_are_ignored() {
        let mut w = weapon();
        let mut audio = Vec::new();
        let rays = Target(None);
        assert!(w.fire(0.0, true, aim(), &rays, &mut audio).is_none());
        w.fire(0.0, false, aim(), &rays, &mut audio);
        assert!(!w.reload(1.0, true, &mut audio));
        assert_eq!(w.current_ammo(), 29);
        assert!(!w.is_reloading());
    }

    #[test]
    fn test_triggers_routed_through_dispatcher() {
        let mut dispatcher = InputDispatcher::new();
        let mut w = weapon();
        let mut audio = Vec::new();
        let rays = Target(None);
        w.start(&mut dispatcher);
        dispatcher.publish(InputAction::Fire);
        dispatcher.publish(InputAction::Reload);
        w.process_input(&mut dispatcher, 0.0, false, aim(), &rays, &mut audio);
        assert_eq!(w.current_ammo(), 29);
        assert!(w.is_reloading());

        w.stop(&mut dispatcher);
        w.update(2.0);
        assert_eq!(w.current_ammo(), 30);
        dispatcher.publish(InputAction::Fire);
        w.process_input(&mut dispatcher, 3.0, false, aim(), &rays, &mut audio);
        assert_eq!(w.current_ammo(), 30);
    }
}
