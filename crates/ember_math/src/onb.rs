use crate::Vec3;

/// Orthonormal basis with `w` aligned to a given normal.
///
/// Directions sampled in a canonical frame (z up) are mapped into world
/// space with [`Onb::transform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onb {
    axis: [Vec3; 3],
}

impl Onb {
    /// Build a basis whose `w` axis points along `n` (need not be unit length).
    pub fn new(n: Vec3) -> Self {
        let w = n.normalize();
        // Helper axis must not be parallel to w
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { axis: [u, v, w] }
    }

    pub fn u(&self) -> Vec3 {
        self.axis[0]
    }

    pub fn v(&self) -> Vec3 {
        self.axis[1]
    }

    pub fn w(&self) -> Vec3 {
        self.axis[2]
    }

    /// Map basis coordinates to world space.
    pub fn transform(&self, local: Vec3) -> Vec3 {
        local.x * self.axis[0] + local.y * self.axis[1] + local.z * self.axis[2]
    }
}
