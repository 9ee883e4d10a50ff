//! Minimal 3D math for pointer space: vectors and the pointer pose.
//!
//! Projection into pointer space is delegated to a `PointerTransform`,
//! so hit-testers with their own scene graph can plug in directly.

use std::ops::{Add, Mul, Sub};

/// A 3D vector in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };
    pub const FORWARD: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn normalized(self) -> Option<Vec3> {
        let len = self.length();
        if len <= f32::EPSILON {
            return None;
        }
        Some(self * (1.0 / len))
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Maps world-space points into pointer space.
///
/// Pointer space has its origin at the pointer and `+z` along the pointing
/// direction, so the local `z` of a target is its distance along the ray.
pub trait PointerTransform {
    fn inverse_transform_point(&self, world: Vec3) -> Vec3;
}

/// Rigid pointer pose: origin plus an orthonormal basis built from
/// a forward and an up hint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPose {
    pub origin: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
}

impl Default for PointerPose {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            right: Vec3::new(1.0, 0.0, 0.0),
            up: Vec3::UP,
            forward: Vec3::FORWARD,
        }
    }
}

impl PointerPose {
    /// Build a pose looking along `forward`. Returns `None` when `forward`
    /// is zero-length or parallel to `up_hint`.
    pub fn looking(origin: Vec3, forward: Vec3, up_hint: Vec3) -> Option<Self> {
        let forward = forward.normalized()?;
        let right = up_hint.cross(forward).normalized()?;
        let up = forward.cross(right);
        Some(Self {
            origin,
            right,
            up,
            forward,
        })
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }
}

impl PointerTransform for PointerPose {
    fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        let d = world - self.origin;
        Vec3::new(d.dot(self.right), d.dot(self.up), d.dot(self.forward))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pose_is_identity() {
        let pose = PointerPose::default();
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(pose.inverse_transform_point(p), p);
    }

    #[test]
    fn test_pose_local_z_is_distance_along_ray() {
        let pose = PointerPose::looking(
            Vec3::new(0.0, 1.6, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::UP,
        )
        .unwrap();
        let local = pose.inverse_transform_point(Vec3::new(5.0, 1.6, 0.0));
        assert!((local.z - 5.0).abs() < 1e-5);
        assert!(local.x.abs() < 1e-5);
        assert!(local.y.abs() < 1e-5);
    }

    #[test]
    fn test_pose_rejects_degenerate_basis() {
        assert!(PointerPose::looking(Vec3::ZERO, Vec3::ZERO, Vec3::UP).is_none());
        assert!(PointerPose::looking(Vec3::ZERO, Vec3::UP, Vec3::UP).is_none());
    }

    #[test]
    fn test_point_behind_pointer_has_negative_z() {
        let pose = PointerPose::default();
        let local = pose.inverse_transform_point(Vec3::new(0.0, 0.0, -2.0));
        assert!(local.z < 0.0);
    }
}
