use glam::Vec3;

/// Ray used for hitscan and crosshair checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Horizontal facing axes for a yaw in degrees: `(forward, right)`.
///
/// Yaw 0 faces +X; positive yaw turns toward +Z, which is to the right.
pub fn horizontal_axes(yaw_deg: f32) -> (Vec3, Vec3) {
    let yaw = yaw_deg.to_radians();
    let forward = Vec3::new(yaw.cos(), 0.0, yaw.sin());
    let right = forward.cross(Vec3::Y).normalize();
    (forward, right)
}

/// First-person camera mounted on the player body.
///
/// Angles are in degrees. Positive pitch looks down.
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// World-space eye position, refreshed every tick from the body position.
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Current height of the camera above the feet, including bob.
    pub local_offset_y: f32,
    /// Height the camera returns to when not bobbing.
    pub resting_offset_y: f32,
}

impl CameraRig {
    pub fn new(resting_offset_y: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, resting_offset_y, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            local_offset_y: resting_offset_y,
            resting_offset_y,
        }
    }

    pub fn forward(&self) -> Vec3 {
        let (flat, _) = horizontal_axes(self.yaw);
        let pitch = self.pitch.to_radians();
        (flat * pitch.cos() - Vec3::Y * pitch.sin()).normalize()
    }

    pub fn target(&self) -> Vec3 {
        self.eye + self.forward()
    }

    /// Place the eye relative to the feet of the body it is mounted on.
    pub fn follow(&mut self, feet: Vec3) {
        self.eye = feet + Vec3::new(0.0, self.local_offset_y, 0.0);
    }

    pub fn aim_ray(&self) -> Ray {
        Ray {
            origin: self.eye,
            direction: self.forward(),
        }
    }

    /// Vertical offset from the resting height caused by bobbing.
    pub fn bob_offset(&self) -> f32 {
        self.local_offset_y - self.resting_offset_y
    }
}
