//! Mathematical types shared between the L-system core and the growth engine.
//!
//! These are the canonical representations used everywhere a plant is
//! measured, rotated, or snapped onto the voxel grid.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 3D Vector - position, direction, turtle travel
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit X vector
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit Y vector
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit Z vector
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Snaps to the voxel containing this point.
    ///
    /// Voxel coordinates are `floor(component + 0.5)`, so a voxel is the
    /// unit cube centered on its integer coordinate.
    #[must_use]
    pub fn to_voxel(self) -> IVec3 {
        IVec3::new(
            (self.x + 0.5).floor() as i32,
            (self.y + 0.5).floor() as i32,
            (self.z + 0.5).floor() as i32,
        )
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Integer voxel coordinate.
///
/// Ordered lexicographically so voxel-keyed maps iterate deterministically.
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable,
    Serialize, Deserialize,
)]
pub struct IVec3 {
    /// X component
    pub x: i32,
    /// Y component
    pub y: i32,
    /// Z component
    pub z: i32,
}

impl IVec3 {
    /// Creates a new IVec3
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0, 0, 0);
}

impl std::ops::Add for IVec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for IVec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Quaternion for rotations.
///
/// Used by the turtle interpreter: every pose pushed on the branch stack is
/// a plain `Copy` of this type, never a shared reference.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quaternion {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W component
    pub w: f32,
}

impl Quaternion {
    /// Creates a new quaternion
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Identity rotation
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Rotation of `radians` about the (unit) `axis`.
    #[must_use]
    pub fn from_axis_angle(axis: Vec3, radians: f32) -> Self {
        let half = radians * 0.5;
        let s = half.sin();
        Self::new(axis.x * s, axis.y * s, axis.z * s, half.cos())
    }

    /// Hamilton product: the rotation `rhs` followed by `self`.
    #[must_use]
    pub fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }

    /// Rotates a vector by this quaternion.
    #[must_use]
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }

    /// Renormalizes to a unit quaternion.
    ///
    /// Long turtle walks accumulate float drift; call after chained
    /// rotations to keep `rotate` length-preserving.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt();
        if len <= f32::EPSILON {
            return Self::IDENTITY;
        }
        let inv = 1.0 / len;
        Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul for Quaternion {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.mul(rhs)
    }
}

/// Inclusive axis-aligned voxel region.
///
/// Used for "is this plant's bounding region loaded" checks.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Region {
    /// Minimum corner (inclusive).
    pub min: IVec3,
    /// Maximum corner (inclusive).
    pub max: IVec3,
}

impl Region {
    /// Creates a region from two inclusive corners.
    #[must_use]
    pub const fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// Smallest region containing every given voxel.
    ///
    /// Returns `None` for an empty iterator.
    #[must_use]
    pub fn enclosing<I: IntoIterator<Item = IVec3>>(voxels: I) -> Option<Self> {
        let mut iter = voxels.into_iter();
        let first = iter.next()?;
        let mut region = Self::new(first, first);
        for v in iter {
            region.min.x = region.min.x.min(v.x);
            region.min.y = region.min.y.min(v.y);
            region.min.z = region.min.z.min(v.z);
            region.max.x = region.max.x.max(v.x);
            region.max.y = region.max.y.max(v.y);
            region.max.z = region.max.z.max(v.z);
        }
        Some(region)
    }

    /// Grows the region by `margin` voxels on every side.
    #[must_use]
    pub const fn expanded(self, margin: i32) -> Self {
        Self::new(
            IVec3::new(self.min.x - margin, self.min.y - margin, self.min.z - margin),
            IVec3::new(self.max.x + margin, self.max.y + margin, self.max.z + margin),
        )
    }

    /// Translates the region by `offset`.
    #[must_use]
    pub fn translated(self, offset: IVec3) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Returns true if `voxel` lies inside the region.
    #[must_use]
    pub const fn contains(self, voxel: IVec3) -> bool {
        voxel.x >= self.min.x
            && voxel.x <= self.max.x
            && voxel.y >= self.min.y
            && voxel.y <= self.max.y
            && voxel.z >= self.min.z
            && voxel.z <= self.max.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert_eq!(sum.x, 5.0);
        assert_eq!(sum.y, 7.0);
        assert_eq!(sum.z, 9.0);

        let dot = a.dot(b);
        assert_eq!(dot, 32.0); // 1*4 + 2*5 + 3*6

        let cross = Vec3::X.cross(Vec3::Y);
        assert_eq!(cross, Vec3::Z);
    }

    #[test]
    fn test_voxel_snapping() {
        assert_eq!(Vec3::new(0.4, 0.5, -0.6).to_voxel(), IVec3::new(0, 1, -1));
        assert_eq!(Vec3::new(2.9, -0.4, 1.5).to_voxel(), IVec3::new(3, 0, 2));
    }

    #[test]
    fn test_quaternion_rotates_y_to_x() {
        // Pitching +Y down about +Z by -90 degrees lands on +X
        let q = Quaternion::from_axis_angle(Vec3::Z, -std::f32::consts::FRAC_PI_2);
        let rotated = q.rotate(Vec3::Y);
        assert!((rotated.x - 1.0).abs() < 1e-5, "got {rotated:?}");
        assert!(rotated.y.abs() < 1e-5);
        assert!(rotated.z.abs() < 1e-5);
    }

    #[test]
    fn test_quaternion_composition_matches_sequential_rotation() {
        let a = Quaternion::from_axis_angle(Vec3::X, 0.7);
        let b = Quaternion::from_axis_angle(Vec3::Y, -1.3);
        let composed = (a * b).rotate(Vec3::Z);
        let sequential = a.rotate(b.rotate(Vec3::Z));
        assert!((composed.x - sequential.x).abs() < 1e-5);
        assert!((composed.y - sequential.y).abs() < 1e-5);
        assert!((composed.z - sequential.z).abs() < 1e-5);
    }

    #[test]
    fn test_region_enclosing_and_contains() {
        let region = Region::enclosing([
            IVec3::new(0, 0, 0),
            IVec3::new(3, 7, -2),
            IVec3::new(-1, 2, 5),
        ])
        .unwrap();

        assert_eq!(region.min, IVec3::new(-1, 0, -2));
        assert_eq!(region.max, IVec3::new(3, 7, 5));
        assert!(region.contains(IVec3::new(0, 3, 0)));
        assert!(!region.contains(IVec3::new(4, 3, 0)));

        let grown = region.expanded(1);
        assert!(grown.contains(IVec3::new(4, 3, 0)));

        assert!(Region::enclosing(std::iter::empty::<IVec3>()).is_none());
    }
}
