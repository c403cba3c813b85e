use glam::Mat4;

/// Quarter turn about the vertical axis inserted below a legacy parent.
pub fn axis_fix_in() -> Mat4 {
    Mat4::from_rotation_z(90f32.to_radians())
}

/// Quarter turn about the vertical axis appended to every matrix when rotations are fixed.
pub fn axis_fix_out() -> Mat4 {
    Mat4::from_rotation_z(-90f32.to_radians())
}

/// How a bone's local matrix relates to its parent's composed matrix.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CoordinateSpace {
    /// `parent · local`
    LegacyParentRelative,
    /// `(parent · +90Z) · local`
    LegacyRotated,
    /// `local`
    ModernAbsolute,
}

/// Shared composition rule of the rest and pose compositors.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Compositor {
    pub fix_rotations: bool,
}

impl Compositor {
    pub fn new(fix_rotations: bool) -> Self {
        Self { fix_rotations }
    }

    /// Picks the space once per bone. `parent_relative` is the caller's
    /// combined version and parent gate.
    pub fn space(&self, parent_relative: bool) -> CoordinateSpace {
        match (parent_relative, self.fix_rotations) {
            (false, _) => CoordinateSpace::ModernAbsolute,
            (true, false) => CoordinateSpace::LegacyParentRelative,
            (true, true) => CoordinateSpace::LegacyRotated,
        }
    }

    pub fn compose(&self, space: CoordinateSpace, parent: Option<Mat4>, local: Mat4) -> Mat4 {
        let composed = match (space, parent) {
            (CoordinateSpace::LegacyParentRelative, Some(parent)) => parent * local,
            (CoordinateSpace::LegacyRotated, Some(parent)) => (parent * axis_fix_in()) * local,
            _ => local,
        };
        if self.fix_rotations {
            composed * axis_fix_out()
        } else {
            composed
        }
    }

    /// Removes the trailing axis correction from a matrix produced by [`Self::compose`].
    pub fn undo_axis_fix(&self, composed: Mat4) -> Mat4 {
        if self.fix_rotations {
            composed * axis_fix_in()
        } else {
            composed
        }
    }
}
