//! Object instances and the simulation step that animates them.

use crate::math::{Mat4, Vec3};

/// Nominal tick rate the per-tick rotation defaults are expressed against.
pub const DEFAULT_TICK_RATE: f32 = 20.0;
pub const DEFAULT_DEGREES_PER_TICK_X: f32 = 0.5;
pub const DEFAULT_DEGREES_PER_TICK_Y: f32 = 1.0;
pub const DEFAULT_DEGREES_PER_TICK_Z: f32 = 0.0;

/// Gap between neighbouring cubes along X.
const OBJECT_SPACING: f32 = 3.0;
/// Rotation offset between neighbouring cubes, radians.
const OBJECT_PHASE: f32 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Object {
    pub position: Vec3,
    /// Euler angles in radians.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Object {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Model-to-world transform: `rotZ * rotY * rotX * S`, preceded by the
    /// translation under [`Placement::Positioned`].
    ///
    /// With [`Placement::Centered`] every object draws at the origin and
    /// `position` is ignored.
    pub fn world_matrix(&self, placement: Placement) -> Mat4 {
        let rotation = Mat4::from_z_rotation(self.rotation.z)
            * Mat4::from_y_rotation(self.rotation.y)
            * Mat4::from_x_rotation(self.rotation.x);
        let local = rotation * Mat4::scaling(self.scale);
        match placement {
            Placement::Centered => local,
            Placement::Positioned => Mat4::translation(self.position) * local,
        }
    }
}

impl Default for Object {
    fn default() -> Self {
        Object::at(Vec3::ZERO)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    #[default]
    Centered,
    Positioned,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub objects: Vec<Object>,
}

impl Scene {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single() -> Self {
        Self {
            objects: vec![Object::default()],
        }
    }

    /// `count` cubes in a row along X, centred on the origin, each a little
    /// further along in its rotation than the previous one.
    pub fn row(count: usize) -> Self {
        let first = -(count.saturating_sub(1) as f32) * OBJECT_SPACING / 2.0;
        let objects = (0..count)
            .map(|i| {
                let mut object = Object::at(Vec3::new(first + i as f32 * OBJECT_SPACING, 0.0, 0.0));
                let phase = i as f32 * OBJECT_PHASE;
                object.rotation = Vec3::new(phase, phase, 0.0);
                object
            })
            .collect();
        Self { objects }
    }

    /// Sets every object's uniform size multiplier.
    pub fn scaled(mut self, size: f32) -> Self {
        for object in &mut self.objects {
            object.scale = Vec3::ONE * size;
        }
        self
    }
}

/// Angular velocity applied to every object, radians per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub angular_velocity: Vec3,
}

impl Motion {
    /// Converts per-tick increments in degrees at `tick_rate` Hz to a rate.
    pub fn from_degrees_per_tick(degrees: Vec3, tick_rate: f32) -> Self {
        let radians = Vec3::new(degrees.x.to_radians(), degrees.y.to_radians(), degrees.z.to_radians());
        Self {
            angular_velocity: radians * tick_rate,
        }
    }
}

impl Default for Motion {
    fn default() -> Self {
        Motion::from_degrees_per_tick(
            Vec3::new(
                DEFAULT_DEGREES_PER_TICK_X,
                DEFAULT_DEGREES_PER_TICK_Y,
                DEFAULT_DEGREES_PER_TICK_Z,
            ),
            DEFAULT_TICK_RATE,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimState {
    /// Seconds of simulated time.
    pub time: f32,
    pub scene: Scene,
}

impl SimState {
    pub fn new(scene: Scene) -> Self {
        Self { time: 0.0, scene }
    }
}

/// Advances time by `dt` seconds and turns every object by its share of
/// the angular velocity. Z only moves when the motion asks for it.
pub fn update(mut state: SimState, dt: f32, motion: &Motion) -> SimState {
    state.time += dt;
    let step = motion.angular_velocity * dt;
    for object in &mut state.scene.objects {
        object.rotation = object.rotation + step;
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::transform_point;

    #[test]
    fn default_motion_matches_per_tick_increment() {
        let motion = Motion::default();
        let state = update(SimState::new(Scene::single()), 1.0 / DEFAULT_TICK_RATE, &motion);
        let rotation = state.scene.objects[0].rotation;
        assert!((rotation.x - 0.5f32.to_radians()).abs() < 1e-6);
        assert!((rotation.y - 1.0f32.to_radians()).abs() < 1e-6);
        assert_eq!(rotation.z, 0.0);
    }

    #[test]
    fn update_is_rate_independent() {
        let motion = Motion::default();
        let mut coarse = SimState::new(Scene::single());
        let mut fine = SimState::new(Scene::single());
        for _ in 0..10 {
            coarse = update(coarse, 0.1, &motion);
        }
        for _ in 0..100 {
            fine = update(fine, 0.01, &motion);
        }
        assert!((coarse.time - fine.time).abs() < 1e-4);
        let a = coarse.scene.objects[0].rotation;
        let b = fine.scene.objects[0].rotation;
        assert!((a - b).length() < 1e-4);
    }

    #[test]
    fn update_on_empty_scene_only_advances_time() {
        let state = update(SimState::new(Scene::empty()), 0.5, &Motion::default());
        assert_eq!(state.time, 0.5);
        assert!(state.scene.objects.is_empty());
    }

    #[test]
    fn centered_placement_ignores_position() {
        let object = Object::at(Vec3::new(10.0, 0.0, 0.0));
        let p = transform_point(&object.world_matrix(Placement::Centered), Vec3::ZERO);
        assert_eq!(p, Vec3::ZERO);
        let p = transform_point(&object.world_matrix(Placement::Positioned), Vec3::ZERO);
        assert_eq!(p, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn zero_z_spin_and_unit_size_keep_the_rotation_only_matrix() {
        let mut object = Object::default();
        object.rotation = Vec3::new(0.4, 1.1, 0.0);
        let expected = Mat4::from_y_rotation(1.1) * Mat4::from_x_rotation(0.4);
        assert_eq!(object.world_matrix(Placement::Centered), expected);
    }

    #[test]
    fn z_spin_is_applied_last() {
        let motion = Motion::from_degrees_per_tick(Vec3::new(0.0, 0.0, 4.5), 20.0);
        let state = update(SimState::new(Scene::single()), 1.0, &motion);
        let object = state.scene.objects[0];
        assert!((object.rotation.z - 90f32.to_radians()).abs() < 1e-5);
        assert_eq!((object.rotation.x, object.rotation.y), (0.0, 0.0));

        let p = transform_point(&object.world_matrix(Placement::Centered), Vec3::new(1.0, 0.0, 0.0));
        assert!((p - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn size_scales_in_both_placements() {
        let scene = Scene::row(2).scaled(2.5);
        assert!(scene.objects.iter().all(|o| o.scale == Vec3::new(2.5, 2.5, 2.5)));

        let mut object = Object::at(Vec3::new(3.0, 0.0, 0.0));
        object.scale = Vec3::ONE * 2.0;
        let corner = Vec3::ONE;
        let p = transform_point(&object.world_matrix(Placement::Centered), corner);
        assert_eq!(p, Vec3::new(2.0, 2.0, 2.0));
        let p = transform_point(&object.world_matrix(Placement::Positioned), corner);
        assert_eq!(p, Vec3::new(5.0, 2.0, 2.0));
    }

    #[test]
    fn row_is_centred_on_origin() {
        let scene = Scene::row(3);
        let xs: Vec<f32> = scene.objects.iter().map(|o| o.position.x).collect();
        assert_eq!(xs, vec![-3.0, 0.0, 3.0]);
        assert!(Scene::row(0).objects.is_empty());
        assert_eq!(Scene::row(1).objects[0].position, Vec3::ZERO);
    }
}
