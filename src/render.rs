//! Frame orchestration: transform, light, cull, shade and emit edges.

use tracing::trace;

use crate::camera::{view_matrix, Camera, Projection};
use crate::color::Palette;
use crate::math::{transform_homogeneous, transform_point, Mat4, Vec3};
use crate::mesh::Mesh;
use crate::raster::Frame;
use crate::scene::{Placement, SimState};
use crate::shade::{face_intensity, Ramp, DEFAULT_LIGHT};

pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub width: u16,
    pub height: u16,
    pub camera: Camera,
    /// Vertical field of view, radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Height of a terminal cell relative to its width.
    pub cell_aspect: f32,
    /// Direction toward the light; normalized by [`Renderer::new`].
    pub light: Vec3,
    pub ramp: Ramp,
    pub palette: Palette,
    pub placement: Placement,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            camera: Camera::orbit(5.0),
            fov: std::f32::consts::FRAC_PI_2,
            near: 0.1,
            far: 100.0,
            cell_aspect: 1.0,
            light: DEFAULT_LIGHT,
            ramp: Ramp::default(),
            palette: Palette::default(),
            placement: Placement::Centered,
        }
    }
}

impl RenderSettings {
    pub fn projection(&self) -> Projection {
        Projection {
            fov: self.fov,
            aspect: self.width as f32 / (self.height as f32 * self.cell_aspect),
            near: self.near,
            far: self.far,
        }
    }
}

/// NDC to cell coordinates; NDC up is screen down. Depth passes through.
pub fn to_screen(ndc: Vec3, width: u16, height: u16) -> Vec3 {
    Vec3::new(
        (ndc.x * 0.5 + 0.5) * width as f32,
        (-ndc.y * 0.5 + 0.5) * height as f32,
        ndc.z,
    )
}

pub struct Renderer {
    settings: RenderSettings,
    mesh: Mesh,
    view_projection: Mat4,
}

impl Renderer {
    pub fn new(mut settings: RenderSettings) -> Self {
        settings.light = settings.light.normalize();
        let view_projection = settings.projection().matrix() * view_matrix(&settings.camera);
        Self {
            settings,
            mesh: Mesh::unit_cube(),
            view_projection,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn view_projection(&self) -> &Mat4 {
        &self.view_projection
    }

    /// Changes the target grid, rebuilding the projection for the new aspect.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.settings.width = width;
        self.settings.height = height;
        self.view_projection = self.settings.projection().matrix() * view_matrix(&self.settings.camera);
    }

    /// Draws every object of `state` into a fresh frame.
    pub fn render_frame(&self, state: &SimState) -> Frame {
        let (width, height) = (self.settings.width, self.settings.height);
        let mut frame = Frame::new(width, height);
        let mut drawn = 0usize;
        let mut culled = 0usize;

        // Reused per object.
        let mut world = Vec::with_capacity(self.mesh.vertices.len());
        let mut screen = Vec::with_capacity(self.mesh.vertices.len());

        for object in &state.scene.objects {
            let model = object.world_matrix(self.settings.placement);
            let mvp = self.view_projection * model;

            world.clear();
            screen.clear();
            for vertex in &self.mesh.vertices {
                world.push(transform_point(&model, vertex.position));
                let clip = transform_homogeneous(&mvp, vertex.position);
                // behind the eye: no usable projection
                screen.push((clip[3] > 0.0).then(|| {
                    let ndc = Vec3::new(clip[0] / clip[3], clip[1] / clip[3], clip[2] / clip[3]);
                    to_screen(ndc, width, height)
                }));
            }

            for &[a, b, c] in &self.mesh.indices {
                let intensity = face_intensity(world[a], world[b], world[c], self.settings.light);
                if intensity <= 0.0 {
                    culled += 1;
                    continue;
                }
                let (Some(sa), Some(sb), Some(sc)) = (screen[a], screen[b], screen[c]) else {
                    culled += 1;
                    continue;
                };

                let intensity = intensity.min(1.0);
                let glyph = self.settings.ramp.glyph_for(intensity);
                let color = self.settings.palette.sample(intensity);

                frame.draw_line(sa, sb, glyph, color);
                frame.draw_line(sb, sc, glyph, color);
                frame.draw_line(sc, sa, glyph, color);
                drawn += 1;
            }
        }

        trace!(drawn, culled, "frame rasterized");
        frame
    }
}
