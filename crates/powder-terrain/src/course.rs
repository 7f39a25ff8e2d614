use powder_core::{BodyId, ColliderId, Isometry, Vec3};
use powder_geom::{aabb_of, sweep_sphere_vs_aabb, Aabb, Shape};

use crate::heightfield::HeightField;
use crate::probe::{GroundHit, GroundProbe, ObstacleContact, ObstacleQuery};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Category {
    /// Rideable scenery (rails, boxes, the rider's own parts).
    Solid,
    /// Trigger volume that slows the rider on contact.
    Obstacle,
}

#[derive(Copy, Clone, Debug)]
pub struct CourseCollider {
    pub id: ColliderId,
    pub shape: Shape,
    pub pose: Isometry,
    pub aabb: Aabb,
    pub owner: Option<BodyId>,
    pub category: Category,
}

/// Heightfield slope plus box colliders. Collider ids are slot indices and stay stable when
/// other colliders are removed.
#[derive(Clone, Debug, Default)]
pub struct Course {
    terrain: Option<HeightField>,
    /// World position of heightfield sample (0,0).
    terrain_origin: Vec3,
    colliders: Vec<Option<CourseCollider>>,
}

impl Course {
    pub fn new() -> Self { Self::default() }

    pub fn with_terrain(hf: HeightField, origin: Vec3) -> Self {
        Self { terrain: Some(hf), terrain_origin: origin, colliders: Vec::new() }
    }

    pub fn set_terrain(&mut self, hf: HeightField, origin: Vec3) {
        self.terrain = Some(hf);
        self.terrain_origin = origin;
    }
    #[inline] pub fn terrain(&self) -> Option<&HeightField> { self.terrain.as_ref() }
    #[inline] pub fn terrain_origin(&self) -> Vec3 { self.terrain_origin }

    pub fn add_collider(&mut self, shape: Shape, pose: Isometry, owner: Option<BodyId>, category: Category) -> ColliderId {
        let id = ColliderId(self.colliders.len() as u32);
        let aabb = aabb_of(&shape, &pose);
        self.colliders.push(Some(CourseCollider { id, shape, pose, aabb, owner, category }));
        id
    }

    /// Returns false if the collider was already gone.
    pub fn remove_collider(&mut self, id: ColliderId) -> bool {
        let Some(slot) = self.colliders.get_mut(id.0 as usize) else { return false; };
        if slot.take().is_none() { return false; }
        tracing::trace!(%id, "collider removed");
        true
    }

    pub fn collider(&self, id: ColliderId) -> Option<&CourseCollider> {
        self.colliders.get(id.0 as usize).and_then(|c| c.as_ref())
    }

    pub fn colliders(&self) -> impl Iterator<Item = &CourseCollider> + '_ {
        self.colliders.iter().filter_map(|c| c.as_ref())
    }

    pub fn obstacle_count(&self) -> usize {
        self.colliders().filter(|c| c.category == Category::Obstacle).count()
    }

    /// Terrain height and normal at world (x, z), `None` off the heightfield.
    pub fn terrain_height_normal(&self, wx: f32, wz: f32) -> Option<(f32, Vec3)> {
        let hf = self.terrain.as_ref()?;
        let lx = wx - self.terrain_origin.x;
        let lz = wz - self.terrain_origin.z;
        if !hf.contains(lx, lz) { return None; }
        let h = hf.sample_height(lx, lz) + self.terrain_origin.y;
        Some((h, hf.sample_normal(lx, lz)))
    }
}

impl GroundProbe for Course {
    fn cast_down(&self, origin: Vec3, radius: f32, max_dist: f32, out: &mut Vec<GroundHit>) {
        if let Some((h, n)) = self.terrain_height_normal(origin.x, origin.z) {
            let gap = origin.y - radius - h;
            if gap <= max_dist {
                out.push(GroundHit {
                    point: Vec3::new(origin.x, h, origin.z),
                    normal: n,
                    distance: gap.max(0.0),
                    owner: None,
                    index: 0,
                });
            }
        }

        let motion = Vec3::new(0.0, -max_dist, 0.0);
        for c in self.colliders() {
            if c.category != Category::Solid { continue; }
            if let Some((toi, n)) = sweep_sphere_vs_aabb(origin, motion, radius, &c.aabb) {
                let center = origin + motion * toi;
                out.push(GroundHit {
                    point: c.aabb.closest_point(center),
                    normal: n,
                    distance: toi * max_dist,
                    owner: c.owner,
                    index: c.id.0 as usize + 1,
                });
            }
        }
    }

    fn surface_below(&self, p: Vec3, step_up: f32, ignore: BodyId) -> Option<(f32, Vec3)> {
        let mut best = self.terrain_height_normal(p.x, p.z);
        for c in self.colliders() {
            if c.category != Category::Solid || c.owner == Some(ignore) { continue; }
            let b = &c.aabb;
            let over = p.x >= b.min.x && p.x <= b.max.x && p.z >= b.min.z && p.z <= b.max.z;
            if !over || b.max.y > p.y + step_up { continue; }
            if best.map_or(true, |(h, _)| b.max.y > h) { best = Some((b.max.y, Vec3::Y)); }
        }
        best
    }
}

impl ObstacleQuery for Course {
    fn overlapping_obstacles(&self, center: Vec3, radius: f32, out: &mut Vec<ObstacleContact>) {
        for c in self.colliders() {
            if c.category != Category::Obstacle { continue; }
            if c.aabb.overlaps_sphere(center, radius) {
                out.push(ObstacleContact { id: c.id, point: c.aabb.closest_point(center) });
            }
        }
    }
}
