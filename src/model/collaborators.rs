//! Contracts between the gameplay core and the systems it delegates to.

use glam::Vec3;

/// Resolves requested motion against collision geometry.
pub trait PhysicalMover {
    /// Move by `displacement` (already scaled by the tick length) and report
    /// whether the body now rests on a supporting surface.
    fn submit_displacement(&mut self, displacement: Vec3) -> bool;

    /// Feet position after the last resolved move.
    fn position(&self) -> Vec3;

    fn height(&self) -> f32;

    fn set_height(&mut self, height: f32);
}

/// Nearest surface found by a ray query.
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    pub tag: String,
    pub distance: f32,
    pub point: Vec3,
}

pub trait RayQuery {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

/// One-shot sounds requested by the core. Playback belongs to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioEvent {
    Jump,
    Land,
    Shoot,
    Reload,
}

pub trait AudioSink {
    fn play(&mut self, event: AudioEvent);
}

/// Collects events for the frame so presentation can drain them.
impl AudioSink for Vec<AudioEvent> {
    fn play(&mut self, event: AudioEvent) {
        self.push(event);
    }
}
