use crate::math::{Mat4, Vec3};

/// Static viewpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Camera {
    /// Camera on the -Z axis at `distance` from the origin, looking at it.
    pub fn orbit(distance: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -distance),
            target: Vec3::ZERO,
            up: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

/// Perspective parameters. `fov` is the vertical field of view in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        projection_matrix(self.fov, self.aspect, self.near, self.far)
    }
}

/// World-to-camera transform for a right-handed look-at basis.
///
/// An `up` parallel to the view direction gives a degenerate basis.
#[rustfmt::skip]
pub fn view_matrix(camera: &Camera) -> Mat4 {
    let z_axis = (camera.position - camera.target).normalize();
    let x_axis = camera.up.cross(z_axis).normalize();
    let y_axis = z_axis.cross(x_axis);
    let eye = camera.position;

    Mat4::from_rows([
        x_axis.x, x_axis.y, x_axis.z, -x_axis.dot(eye),
        y_axis.x, y_axis.y, y_axis.z, -y_axis.dot(eye),
        z_axis.x, z_axis.y, z_axis.z, -z_axis.dot(eye),
        0.0,      0.0,      0.0,      1.0,
    ])
}

/// Perspective projection into clip space, NDC depth in `[-1, 1]` between
/// `near` and `far`. Expects `near > 0` and `far > near`.
#[rustfmt::skip]
pub fn projection_matrix(fov: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov * 0.5).tan();
    let range_inv = 1.0 / (near - far);

    Mat4::from_rows([
        f / aspect, 0.0, 0.0,                      0.0,
        0.0,        f,   0.0,                      0.0,
        0.0,        0.0, (near + far) * range_inv, 2.0 * near * far * range_inv,
        0.0,        0.0, -1.0,                     0.0,
    ])
}
