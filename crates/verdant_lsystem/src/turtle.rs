//! Turtle pose for axiom interpretation.
//!
//! The turtle grows along its local +Y ("up") axis. Control symbols rotate
//! the pose about fixed local axes; geometry rules advance it. The pose is
//! `Copy`: the branch stack in the interpreter stores plain value
//! snapshots, so a pushed pose can never alias the live one.

use verdant_shared::{IVec3, Quaternion, Vec3};

/// Position + orientation cursor walked over an axiom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Turtle {
    /// Current position in tree-local space.
    pub position: Vec3,
    /// Current orientation. Local up is `rotation * +Y`.
    pub rotation: Quaternion,
}

impl Turtle {
    /// A turtle at the local origin, rotated `trunk_rotation` radians
    /// about world +Y so each tree faces its own way.
    #[must_use]
    pub fn new(trunk_rotation: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quaternion::from_axis_angle(Vec3::Y, trunk_rotation),
        }
    }

    /// Rotates about one of the turtle's own axes.
    ///
    /// `axis` is given in the turtle's local frame (unit X, Y or Z).
    pub fn rotate_local(&mut self, axis: Vec3, radians: f32) {
        self.rotation = (self.rotation * Quaternion::from_axis_angle(axis, radians)).normalized();
    }

    /// Moves `distance` along the local up axis.
    pub fn advance(&mut self, distance: f32) {
        self.position = self.position + self.heading() * distance;
    }

    /// The world-space direction of local up.
    #[must_use]
    pub fn heading(&self) -> Vec3 {
        self.rotation.rotate(Vec3::Y)
    }

    /// The voxel the turtle currently occupies.
    #[must_use]
    pub fn voxel(&self) -> IVec3 {
        self.position.to_voxel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrotated_turtle_climbs_y() {
        let mut turtle = Turtle::new(0.0);
        turtle.advance(3.0);
        assert_eq!(turtle.voxel(), IVec3::new(0, 3, 0));
    }

    #[test]
    fn test_pitched_turtle_leaves_the_axis() {
        let mut turtle = Turtle::new(0.0);
        // Pitch down 90 degrees about local X: up becomes +Z.
        turtle.rotate_local(Vec3::X, std::f32::consts::FRAC_PI_2);
        turtle.advance(2.0);
        assert_eq!(turtle.voxel(), IVec3::new(0, 0, 2));
    }

    #[test]
    fn test_trunk_rotation_spins_branches_not_the_trunk() {
        // With trunk rotation, straight growth still climbs +Y...
        let mut turtle = Turtle::new(std::f32::consts::FRAC_PI_2);
        turtle.advance(2.0);
        assert_eq!(turtle.voxel(), IVec3::new(0, 2, 0));

        // ...but a pitched branch comes out facing a rotated direction.
        let mut plain = Turtle::new(0.0);
        plain.rotate_local(Vec3::X, std::f32::consts::FRAC_PI_2);
        plain.advance(2.0);

        let mut spun = Turtle::new(std::f32::consts::PI);
        spun.rotate_local(Vec3::X, std::f32::consts::FRAC_PI_2);
        spun.advance(2.0);

        assert_eq!(plain.voxel(), IVec3::new(0, 0, 2));
        assert_eq!(spun.voxel(), IVec3::new(0, 0, -2));
    }

    #[test]
    fn test_pushed_pose_is_an_independent_snapshot() {
        let mut turtle = Turtle::new(0.0);
        let saved = turtle; // Copy, not a shared reference
        turtle.rotate_local(Vec3::Z, 1.0);
        turtle.advance(5.0);
        assert_eq!(saved.position, Vec3::ZERO);
        assert_eq!(saved.rotation, Quaternion::IDENTITY);
    }
}
