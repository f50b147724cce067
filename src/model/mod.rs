// MODEL: Player state and the world it moves through
pub mod arena;
pub mod camera;
pub mod collaborators;
pub mod stance;

pub use arena::{Arena, ArenaMover, Body, TaggedBox};
pub use camera::{CameraRig, Ray};
pub use collaborators::{AudioEvent, AudioSink, PhysicalMover, RayHit, RayQuery};
pub use stance::{Stance, StanceToggle};
