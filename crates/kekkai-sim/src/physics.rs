//! Rigid-body physics contract.
//!
//! The simulation talks to physics only through [`PhysicsWorld`], so a real
//! engine can be plugged in by the host. [`HeadlessPhysics`] is a minimal
//! point-mass adapter used by tests and the headless binary.

use std::collections::{BTreeMap, BTreeSet};

use glam::DVec3;

use kekkai_core::constants::GRAVITY;
use kekkai_core::types::BodyHandle;

/// Collision group bits.
pub mod groups {
    pub const PLAYER: u32 = 1;
    /// Static environment shares the player bit.
    pub const ENVIRONMENT: u32 = 1;
    pub const BARRIER: u32 = 2;
    pub const ENEMY: u32 = 4;
    pub const ALL: u32 = PLAYER | BARRIER | ENEMY;
}

/// Collision group and the groups a body collides with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionFilter {
    pub group: u32,
    pub mask: u32,
}

impl CollisionFilter {
    pub fn new(group: u32, mask: u32) -> Self {
        Self { group, mask }
    }

    pub fn collides_with(&self, other: &CollisionFilter) -> bool {
        self.mask & other.group != 0 && other.mask & self.group != 0
    }
}

/// Body geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Sphere { radius: f64 },
    Box { half_extents: DVec3 },
    /// Six thin walls around a hollow box.
    Shell { half_extents: DVec3, thickness: f64 },
}

impl BodyShape {
    /// Distance from the center to the lowest point.
    pub fn bottom(&self) -> f64 {
        match self {
            BodyShape::Sphere { radius } => *radius,
            BodyShape::Box { half_extents } | BodyShape::Shell { half_extents, .. } => {
                half_extents.y
            }
        }
    }

    /// Radius of a sphere enclosing the shape.
    pub fn bounding_radius(&self) -> f64 {
        match self {
            BodyShape::Sphere { radius } => *radius,
            BodyShape::Box { half_extents } | BodyShape::Shell { half_extents, .. } => {
                half_extents.length()
            }
        }
    }
}

/// Everything needed to create a body. Zero mass creates a static body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub shape: BodyShape,
    pub mass: f64,
    pub filter: CollisionFilter,
    pub linear_damping: f64,
    pub position: DVec3,
    pub yaw: f64,
}

/// A new contact between two bodies reported by a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Relative speed along the contact normal (m/s).
    pub impact_speed: f64,
}

/// Physics operations the simulation relies on.
///
/// Every method taking a handle is a no-op (or returns a zero value) for
/// handles that were removed.
pub trait PhysicsWorld: Send {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle;
    /// Idempotent.
    fn remove_body(&mut self, handle: BodyHandle);
    fn contains(&self, handle: BodyHandle) -> bool;
    fn apply_force(&mut self, handle: BodyHandle, force: DVec3);
    fn apply_impulse(&mut self, handle: BodyHandle, impulse: DVec3);
    fn apply_torque(&mut self, handle: BodyHandle, torque: DVec3);
    fn position(&self, handle: BodyHandle) -> DVec3;
    fn velocity(&self, handle: BodyHandle) -> DVec3;
    fn set_velocity(&mut self, handle: BodyHandle, velocity: DVec3);
    fn set_angular_velocity(&mut self, handle: BodyHandle, angular_velocity: DVec3);
    fn set_position(&mut self, handle: BodyHandle, position: DVec3);
    fn set_linear_damping(&mut self, handle: BodyHandle, damping: f64);
    fn set_collision_mask(&mut self, handle: BodyHandle, mask: u32);
    /// Advance the world and report contacts that began during the step.
    fn step(&mut self, dt: f64) -> Vec<ContactEvent>;
}

#[derive(Debug, Clone)]
struct PointBody {
    desc: BodyDesc,
    position: DVec3,
    velocity: DVec3,
    angular_velocity: DVec3,
    force: DVec3,
    torque: DVec3,
}

/// Point-mass integration with gravity, damping and a ground plane at y = 0.
///
/// Only proximity contacts between the player group and the enemy group
/// are detected. Bodies never push each other apart.
#[derive(Debug, Clone)]
pub struct HeadlessPhysics {
    bodies: BTreeMap<BodyHandle, PointBody>,
    touching: BTreeSet<(BodyHandle, BodyHandle)>,
    next_handle: u64,
    gravity: f64,
}

impl Default for HeadlessPhysics {
    fn default() -> Self {
        Self {
            bodies: BTreeMap::new(),
            touching: BTreeSet::new(),
            next_handle: 1,
            gravity: GRAVITY,
        }
    }
}

impl HeadlessPhysics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gravity magnitude (m/s², pointing down).
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn angular_velocity(&self, handle: BodyHandle) -> DVec3 {
        self.bodies
            .get(&handle)
            .map(|b| b.angular_velocity)
            .unwrap_or(DVec3::ZERO)
    }

    pub fn collision_mask(&self, handle: BodyHandle) -> Option<u32> {
        self.bodies.get(&handle).map(|b| b.desc.filter.mask)
    }

    fn integrate(&mut self, dt: f64) {
        let gravity = DVec3::NEG_Y * self.gravity;
        for body in self.bodies.values_mut() {
            if body.desc.mass <= 0.0 {
                continue;
            }
            let mass = body.desc.mass;
            let radius = body.desc.shape.bounding_radius().max(0.1);
            // Torque on a grounded body rolls it along torque x up.
            let rolling = body.torque.cross(DVec3::Y) / (mass * radius);
            let accel = body.force / mass + gravity + rolling;
            body.velocity += accel * dt;
            body.velocity *= (1.0 - body.desc.linear_damping).clamp(0.0, 1.0).powf(dt);
            body.position += body.velocity * dt;

            let bottom = body.desc.shape.bottom();
            if body.position.y < bottom {
                body.position.y = bottom;
                if body.velocity.y < 0.0 {
                    body.velocity.y = 0.0;
                }
            }
            body.force = DVec3::ZERO;
            body.torque = DVec3::ZERO;
        }
    }

    fn detect_contacts(&mut self) -> Vec<ContactEvent> {
        let players: Vec<(BodyHandle, &PointBody)> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.desc.filter.group & groups::PLAYER != 0 && b.desc.mass > 0.0)
            .map(|(h, b)| (*h, b))
            .collect();
        let enemies: Vec<(BodyHandle, &PointBody)> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.desc.filter.group & groups::ENEMY != 0)
            .map(|(h, b)| (*h, b))
            .collect();

        let mut now_touching = BTreeSet::new();
        let mut contacts = Vec::new();
        for (ph, p) in &players {
            for (eh, e) in &enemies {
                if !p.desc.filter.collides_with(&e.desc.filter) {
                    continue;
                }
                let reach = p.desc.shape.bounding_radius() + e.desc.shape.bounding_radius();
                let offset = p.position - e.position;
                if offset.length() > reach {
                    continue;
                }
                let pair = (*ph, *eh);
                now_touching.insert(pair);
                if !self.touching.contains(&pair) {
                    let normal = offset.try_normalize().unwrap_or(DVec3::Y);
                    let impact_speed = (e.velocity - p.velocity).dot(normal).abs();
                    contacts.push(ContactEvent {
                        body_a: *ph,
                        body_b: *eh,
                        impact_speed,
                    });
                }
            }
        }
        self.touching = now_touching;
        contacts
    }
}

impl PhysicsWorld for HeadlessPhysics {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.insert(
            handle,
            PointBody {
                desc: *desc,
                position: desc.position,
                velocity: DVec3::ZERO,
                angular_velocity: DVec3::ZERO,
                force: DVec3::ZERO,
                torque: DVec3::ZERO,
            },
        );
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) {
        self.bodies.remove(&handle);
        self.touching.retain(|(a, b)| *a != handle && *b != handle);
    }

    fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(&handle)
    }

    fn apply_force(&mut self, handle: BodyHandle, force: DVec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.force += force;
        }
    }

    fn apply_impulse(&mut self, handle: BodyHandle, impulse: DVec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            if body.desc.mass > 0.0 {
                body.velocity += impulse / body.desc.mass;
            }
        }
    }

    fn apply_torque(&mut self, handle: BodyHandle, torque: DVec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.torque += torque;
        }
    }

    fn position(&self, handle: BodyHandle) -> DVec3 {
        self.bodies
            .get(&handle)
            .map(|b| b.position)
            .unwrap_or(DVec3::ZERO)
    }

    fn velocity(&self, handle: BodyHandle) -> DVec3 {
        self.bodies
            .get(&handle)
            .map(|b| b.velocity)
            .unwrap_or(DVec3::ZERO)
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: DVec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.velocity = velocity;
        }
    }

    fn set_angular_velocity(&mut self, handle: BodyHandle, angular_velocity: DVec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.angular_velocity = angular_velocity;
        }
    }

    fn set_position(&mut self, handle: BodyHandle, position: DVec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.position = position;
        }
    }

    fn set_linear_damping(&mut self, handle: BodyHandle, damping: f64) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.desc.linear_damping = damping;
        }
    }

    fn set_collision_mask(&mut self, handle: BodyHandle, mask: u32) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.desc.filter.mask = mask;
        }
    }

    fn step(&mut self, dt: f64) -> Vec<ContactEvent> {
        self.integrate(dt);
        self.detect_contacts()
    }
}
