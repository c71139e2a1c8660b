//! Software 3D pipeline for the terminal: cubes are transformed through
//! model, view and projection space, lit with one directional light, and
//! their triangle edges rasterized into a depth-tested character grid.

pub mod ansi_escape_code;
pub mod camera;
pub mod color;
pub mod config;
pub mod input;
pub mod math;
pub mod mesh;
pub mod raster;
pub mod render;
pub mod scene;
pub mod shade;
pub mod term;
pub mod tick;

pub use camera::{projection_matrix, view_matrix, Camera};
pub use math::{multiply, transform_point, Mat4, Vec3};
pub use raster::{Cell, Frame, FrameBuffer};
pub use render::{RenderSettings, Renderer};
pub use scene::{update, Motion, Object, Scene, SimState};
