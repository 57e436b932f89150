//! Static arena geometry: play rectangle, water regions, reflective
//! windows and the rooftop water tank.

use glam::DVec3;

use kekkai_behavior::steering::FieldBounds;
use kekkai_core::config::FieldLayout;
use kekkai_core::constants::*;
use kekkai_core::types::Aabb;

#[derive(Debug, Clone)]
pub struct Arena {
    pub bounds: FieldBounds,
    pub pool_x: f64,
    pub pool_z: f64,
    pub roof_y: f64,
    /// Window centers on the building's west face.
    pub reflectors: Vec<DVec3>,
    pub tank_center: DVec3,
}

impl Arena {
    pub fn new(field: &FieldLayout) -> Self {
        let face_x = BUILDING_X - BUILDING_HALF_WIDTH - 0.1;
        let mut reflectors = Vec::new();
        let mut y = WINDOW_ROW_START_Y;
        while y < field.roof_y {
            let mut z = -BUILDING_HALF_DEPTH + 5.0;
            while z < BUILDING_HALF_DEPTH {
                reflectors.push(DVec3::new(face_x, y, z));
                z += WINDOW_COLUMN_SPACING;
            }
            y += WINDOW_ROW_SPACING;
        }

        Self {
            bounds: FieldBounds::new(field.width, field.depth, field.ceiling_y),
            pool_x: field.pool_x,
            pool_z: field.pool_z,
            roof_y: field.roof_y,
            reflectors,
            tank_center: DVec3::new(
                BUILDING_X,
                field.roof_y + WATER_TANK_HEIGHT * 0.5,
                0.0,
            ),
        }
    }

    /// Pool surface, or the flooded roof while the tank is down.
    pub fn is_water_surface(&self, position: DVec3, tank_destroyed: bool) -> bool {
        let in_pool = position.y < POOL_SURFACE_HEIGHT
            && (position.x - self.pool_x).abs() < POOL_HALF_WIDTH
            && (position.z - self.pool_z).abs() < POOL_HALF_DEPTH;
        if in_pool {
            return true;
        }
        tank_destroyed
            && position.y > self.roof_y - 1.0
            && position.y < self.roof_y + 5.0
            && (position.x - BUILDING_X).abs() < BUILDING_HALF_WIDTH
            && position.z.abs() < BUILDING_HALF_DEPTH
    }

    pub fn near_reflector(&self, position: DVec3) -> bool {
        self.reflectors
            .iter()
            .any(|w| w.distance(position) < PHANTOM_REFLECT_RADIUS)
    }

    pub fn tank_bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(
            self.tank_center,
            DVec3::new(
                WATER_TANK_RADIUS,
                WATER_TANK_HEIGHT * 0.5,
                WATER_TANK_RADIUS,
            ),
        )
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(&FieldLayout::default())
    }
}
