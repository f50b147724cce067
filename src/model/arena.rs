//! Small walled test level: a ground plane plus tagged boxes.
//!
//! Stands in for the engine's collision world so the core can run and be
//! exercised without one.

use glam::Vec3;

use super::collaborators::{PhysicalMover, RayHit, RayQuery};

pub const GROUND_TAG: &str = "Ground";

/// Gap kept between the body and a surface it was pushed out of.
const SKIN: f32 = 1e-4;
/// How far below the feet a surface still counts as supporting the body.
const CONTACT_TOLERANCE: f32 = 1e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedBox {
    pub min: Vec3,
    pub max: Vec3,
    pub tag: String,
}

impl TaggedBox {
    pub fn new(center: Vec3, half_extents: Vec3, tag: &str) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
            tag: tag.to_string(),
        }
    }

    fn overlaps(&self, min: Vec3, max: Vec3) -> bool {
        min.x < self.max.x && max.x > self.min.x
            && min.y < self.max.y && max.y > self.min.y
            && min.z < self.max.z && max.z > self.min.z
    }

    /// Slab test. Returns the entry distance along `dir`.
    fn intersect(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (mut t0, mut t1) = ((lo - o) * inv, (hi - o) * inv);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

#[derive(Debug, Clone)]
pub struct Arena {
    pub ground_y: f32,
    pub boxes: Vec<TaggedBox>,
    pub spawn: Vec3,
}

impl Arena {
    pub fn new(ground_y: f32) -> Self {
        Self {
            ground_y,
            boxes: Vec::new(),
            spawn: Vec3::new(0.0, ground_y, 0.0),
        }
    }

    pub fn with_box(mut self, b: TaggedBox) -> Self {
        self.boxes.push(b);
        self
    }

    /// The shooting range loaded by the game scene.
    pub fn shooting_range() -> Self {
        let mut arena = Arena::new(0.0);
        arena.spawn = Vec3::new(0.0, 0.0, 0.0);
        // Perimeter walls
        for (center, half) in [
            (Vec3::new(30.0, 2.0, 0.0), Vec3::new(0.5, 2.0, 30.0)),
            (Vec3::new(-30.0, 2.0, 0.0), Vec3::new(0.5, 2.0, 30.0)),
            (Vec3::new(0.0, 2.0, 30.0), Vec3::new(30.0, 2.0, 0.5)),
            (Vec3::new(0.0, 2.0, -30.0), Vec3::new(30.0, 2.0, 0.5)),
        ] {
            arena.boxes.push(TaggedBox::new(center, half, "Wall"));
        }
        for (x, z) in [(8.0, -3.0), (10.0, 4.0), (-6.0, 9.0)] {
            arena.boxes.push(TaggedBox::new(Vec3::new(x, 0.5, z), Vec3::splat(0.5), "Crate"));
        }
        for (x, z) in [(20.0, 0.0), (22.0, 6.0), (18.0, -8.0)] {
            arena.boxes.push(TaggedBox::new(
                Vec3::new(x, 1.0, z),
                Vec3::new(0.4, 1.0, 0.4),
                "Enemy",
            ));
        }
        arena
    }

    /// A mover for a body standing at the arena spawn point.
    pub fn spawn_body(&self, radius: f32, height: f32) -> Body {
        Body {
            feet: self.spawn,
            radius,
            height,
        }
    }
}

impl RayQuery for Arena {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let mut best: Option<(f32, &str)> = None;
        if dir.y < 0.0 && origin.y >= self.ground_y {
            let t = (self.ground_y - origin.y) / dir.y;
            best = Some((t, GROUND_TAG));
        }
        for b in &self.boxes {
            if let Some(t) = b.intersect(origin, dir) {
                if best.map_or(true, |(bt, _)| t < bt) {
                    best = Some((t, b.tag.as_str()));
                }
            }
        }

        best.filter(|(t, _)| *t <= max_distance).map(|(t, tag)| RayHit {
            tag: tag.to_string(),
            distance: t,
            point: origin + dir * t,
        })
    }
}

/// Axis-aligned collision volume of the player, positioned by its feet.
#[derive(Debug, Clone)]
pub struct Body {
    pub feet: Vec3,
    pub radius: f32,
    pub height: f32,
}

impl Body {
    fn bounds_at(&self, feet: Vec3) -> (Vec3, Vec3) {
        (
            Vec3::new(feet.x - self.radius, feet.y, feet.z - self.radius),
            Vec3::new(feet.x + self.radius, feet.y + self.height, feet.z + self.radius),
        )
    }
}

/// Resolves body motion against an arena, one axis at a time.
pub struct ArenaMover<'a> {
    pub arena: &'a Arena,
    pub body: &'a mut Body,
}

impl<'a> ArenaMover<'a> {
    pub fn new(arena: &'a Arena, body: &'a mut Body) -> Self {
        Self { arena, body }
    }

    /// Returns true when the motion along `axis` was blocked.
    fn move_axis(&mut self, axis: usize, delta: f32) -> bool {
        if delta == 0.0 {
            return false;
        }
        let mut target = self.body.feet;
        target[axis] += delta;
        let mut blocked = false;

        if axis == 1 && target.y < self.arena.ground_y {
            target.y = self.arena.ground_y;
            blocked = true;
        }

        let (half_lo, half_hi) = match axis {
            1 => (0.0, self.body.height),
            _ => (self.body.radius, self.body.radius),
        };
        for b in &self.arena.boxes {
            let (min, max) = self.body.bounds_at(target);
            if !b.overlaps(min, max) {
                continue;
            }
            blocked = true;
            target[axis] = if delta > 0.0 {
                b.min[axis] - half_hi - SKIN
            } else {
                b.max[axis] + half_lo + SKIN
            };
        }

        self.body.feet = target;
        blocked
    }

    /// Whether the feet rest on the ground or on top of a box.
    fn is_supported(&self) -> bool {
        let feet = self.body.feet;
        if feet.y - CONTACT_TOLERANCE <= self.arena.ground_y {
            return true;
        }
        let (min, max) = self.body.bounds_at(feet - Vec3::Y * CONTACT_TOLERANCE);
        self.arena.boxes.iter().any(|b| b.overlaps(min, max))
    }
}

impl PhysicalMover for ArenaMover<'_> {
    fn submit_displacement(&mut self, displacement: Vec3) -> bool {
        let landed = if displacement.y == 0.0 {
            self.is_supported()
        } else {
            self.move_axis(1, displacement.y) && displacement.y < 0.0
        };
        self.move_axis(0, displacement.x);
        self.move_axis(2, displacement.z);
        landed
    }

    fn position(&self) -> Vec3 {
        self.body.feet
    }

    fn height(&self) -> f32 {
        self.body.height
    }

    fn set_height(&mut self, height: f32) {
        self.body.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_hits_nearest_tagged_box() {
        let arena = Arena::new(0.0)
            .with_box(TaggedBox::new(Vec3::new(10.0, 1.0, 0.0), Vec3::splat(1.0), "Enemy"))
            .with_box(TaggedBox::new(Vec3::new(5.0, 1.0, 0.0), Vec3::splat(1.0), "Crate"));
        let hit = arena.cast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 100.0).unwrap();
        assert_eq!(hit.tag, "Crate");
        assert!((hit.distance - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_respects_max_distance() {
        let arena = Arena::new(0.0)
            .with_box(TaggedBox::new(Vec3::new(10.0, 1.0, 0.0), Vec3::splat(1.0), "Enemy"));
        assert!(arena.cast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 5.0).is_none());
        assert!(arena.cast(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_X, 100.0).is_none());
    }

    #[test]
    fn test_ray_hits_ground_when_looking_down() {
        let arena = Arena::new(0.0);
        let hit = arena.cast(Vec3::new(0.0, 2.0, 0.0), Vec3::new(1.0, -1.0, 0.0), 100.0).unwrap();
        assert_eq!(hit.tag, GROUND_TAG);
        assert!((hit.point.y).abs() < 1e-5);
    }

    #[test]
    fn test_mover_lands_on_ground() {
        let arena = Arena::new(0.0);
        let mut body = Body { feet: Vec3::new(0.0, 0.5, 0.0), radius: 0.4, height: 2.0 };
        let mut mover = ArenaMover::new(&arena, &mut body);
        assert!(!mover.submit_displacement(Vec3::new(0.0, -0.2, 0.0)));
        assert!(mover.submit_displacement(Vec3::new(0.0, -1.0, 0.0)));
        assert_eq!(mover.position().y, 0.0);
    }

    #[test]
    fn test_mover_stops_at_wall_and_stands_on_crate() {
        let arena = Arena::new(0.0)
            .with_box(TaggedBox::new(Vec3::new(2.0, 0.5, 0.0), Vec3::splat(0.5), "Crate"));
        let mut body = Body { feet: Vec3::new(0.0, 0.0, 0.0), radius: 0.4, height: 2.0 };
        {
            let mut mover = ArenaMover::new(&arena, &mut body);
            for _ in 0..6 {
                mover.submit_displacement(Vec3::new(0.5, -0.01, 0.0));
            }
        }
        assert!(body.feet.x < 1.5 - 0.4 + 1e-3);

        body.feet = Vec3::new(2.0, 1.5, 0.0);
        let mut mover = ArenaMover::new(&arena, &mut body);
        assert!(mover.submit_displacement(Vec3::new(0.0, -1.0, 0.0)));
        assert!((mover.position().y - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_vertical_move_keeps_ground_contact() {
        let arena = Arena::new(0.0)
            .with_box(TaggedBox::new(Vec3::new(2.0, 0.5, 0.0), Vec3::splat(0.5), "Crate"));
        let mut body = Body { feet: Vec3::ZERO, radius: 0.4, height: 2.0 };
        {
            let mut mover = ArenaMover::new(&arena, &mut body);
            assert!(mover.submit_displacement(Vec3::new(0.0, -0.1, 0.0)));
            assert!(mover.submit_displacement(Vec3::ZERO));
        }

        body.feet = Vec3::new(2.0, 1.5, 0.0);
        let mut mover = ArenaMover::new(&arena, &mut body);
        assert!(!mover.submit_displacement(Vec3::ZERO));
        assert!(mover.submit_displacement(Vec3::new(0.0, -1.0, 0.0)));
        assert!(mover.submit_displacement(Vec3::ZERO));
    }

    #[test]
    fn test_shooting_range_has_enemies() {
        let arena = Arena::shooting_range();
        let hit = arena.cast(Vec3::new(0.0, 1.6, 0.0), Vec3::X, 100.0).unwrap();
        assert_eq!(hit.tag, "Enemy");
    }
}
