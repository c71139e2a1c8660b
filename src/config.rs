//! Command-line options and their validation.

use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};
use clap::Parser;

use crate::camera::Camera;
use crate::color::{gradient_names, named_color, xterm_to_rgb, Palette, Rgb};
use crate::math::Vec3;
use crate::render::RenderSettings;
use crate::scene::{
    Motion, Placement, DEFAULT_DEGREES_PER_TICK_X, DEFAULT_DEGREES_PER_TICK_Y,
    DEFAULT_DEGREES_PER_TICK_Z, DEFAULT_TICK_RATE,
};
use crate::shade::{is_single_width, Ramp, DEFAULT_RAMP};
use crate::tick::{MAX_FPS, MIN_FPS};

/// Rotating wireframe cubes, rendered in ASCII with a depth buffer.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// Frames per second
    #[arg(long, default_value_t = DEFAULT_TICK_RATE)]
    pub fps: f32,

    /// Rotation around X, degrees per tick at the configured fps
    #[arg(long, default_value_t = DEFAULT_DEGREES_PER_TICK_X, allow_hyphen_values = true)]
    pub rotation_x: f32,

    /// Rotation around Y, degrees per tick at the configured fps
    #[arg(long, default_value_t = DEFAULT_DEGREES_PER_TICK_Y, allow_hyphen_values = true)]
    pub rotation_y: f32,

    /// Rotation around Z, degrees per tick at the configured fps
    #[arg(long, default_value_t = DEFAULT_DEGREES_PER_TICK_Z, allow_hyphen_values = true)]
    pub rotation_z: f32,

    /// Cube size multiplier
    #[arg(long, default_value_t = 1.0)]
    pub size: f32,

    /// Shading characters, sparse to dense
    #[arg(long, default_value = DEFAULT_RAMP)]
    pub chars: String,

    /// Gradient name, xterm-256 code, colour name, or comma-separated #rrggbb stops
    #[arg(long, default_value = "white")]
    pub palette: String,

    /// Background: colour name, xterm-256 code or #rrggbb
    #[arg(long, default_value = "black")]
    pub bg_color: String,

    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    pub light_x: f32,

    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    pub light_y: f32,

    #[arg(long, default_value_t = -1.0, allow_hyphen_values = true)]
    pub light_z: f32,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 90.0)]
    pub fov: f32,

    /// Distance of the camera from the origin along -Z
    #[arg(long, default_value_t = 5.0)]
    pub cam_distance: f32,

    #[arg(long, default_value_t = 0.1)]
    pub near: f32,

    #[arg(long, default_value_t = 100.0)]
    pub far: f32,

    /// Number of cubes in the scene
    #[arg(long, default_value_t = 1)]
    pub cubes: usize,

    /// Apply each cube's position instead of drawing all of them at the origin
    #[arg(long)]
    pub place_objects: bool,

    /// Height of a terminal cell relative to its width
    #[arg(long, default_value_t = 2.0)]
    pub char_aspect: f32,

    /// Grid width; probed from the terminal when omitted
    #[arg(long)]
    pub width: Option<u16>,

    /// Grid height; probed from the terminal when omitted
    #[arg(long)]
    pub height: Option<u16>,

    /// Stop after this many frames
    #[arg(long)]
    pub frames: Option<u64>,

    /// Show fps and frame time in the top-left corner
    #[arg(long)]
    pub show_stats: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub fps: f32,
    pub motion: Motion,
    pub render: RenderSettings,
    pub background: Rgb,
    pub cubes: usize,
    pub size: f32,
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub frames: Option<u64>,
    pub show_stats: bool,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        ensure!(
            (MIN_FPS..=MAX_FPS).contains(&args.fps),
            "--fps must be between {MIN_FPS} and {MAX_FPS}, got {}",
            args.fps
        );
        ensure!(
            args.rotation_x.is_finite() && args.rotation_y.is_finite() && args.rotation_z.is_finite(),
            "rotation speeds must be finite"
        );
        ensure!(
            args.size.is_finite() && args.size > 0.0,
            "--size must be positive, got {}",
            args.size
        );
        let ramp = Ramp::new(&args.chars).context("--chars must not be empty")?;
        if let Some(wide) = args.chars.chars().find(|c| !is_single_width(*c)) {
            bail!("--chars must be single-column characters, got {wide:?}");
        }
        let palette = parse_palette(&args.palette)?;
        let background = parse_color(&args.bg_color).context("invalid --bg-color")?;

        let light = Vec3::new(args.light_x, args.light_y, args.light_z);
        ensure!(
            light.length().is_finite() && light.length() > 0.0,
            "light direction must be a finite, non-zero vector"
        );
        ensure!(
            args.fov > 0.0 && args.fov < 180.0,
            "--fov must be between 0 and 180 degrees, got {}",
            args.fov
        );
        ensure!(
            args.near > 0.0 && args.far > args.near && args.far.is_finite(),
            "clip planes need 0 < near < far, got near={} far={}",
            args.near,
            args.far
        );
        ensure!(
            args.cam_distance.is_finite() && args.cam_distance > 0.0,
            "--cam-distance must be positive, got {}",
            args.cam_distance
        );
        ensure!(
            args.char_aspect.is_finite() && args.char_aspect > 0.0,
            "--char-aspect must be positive, got {}",
            args.char_aspect
        );
        ensure!(args.width != Some(0), "--width must be positive");
        ensure!(args.height != Some(0), "--height must be positive");

        let render = RenderSettings {
            camera: Camera::orbit(args.cam_distance),
            fov: args.fov.to_radians(),
            near: args.near,
            far: args.far,
            cell_aspect: args.char_aspect,
            light,
            ramp,
            palette,
            placement: if args.place_objects {
                Placement::Positioned
            } else {
                Placement::Centered
            },
            ..RenderSettings::default()
        };

        Ok(Self {
            fps: args.fps,
            motion: Motion::from_degrees_per_tick(
                Vec3::new(args.rotation_x, args.rotation_y, args.rotation_z),
                args.fps,
            ),
            render,
            background,
            cubes: args.cubes,
            size: args.size,
            width: args.width,
            height: args.height,
            frames: args.frames,
            show_stats: args.show_stats,
            log_file: args.log_file,
        })
    }
}

fn parse_code(s: &str) -> Option<Result<u8>> {
    let value: i64 = s.trim().parse().ok()?;
    Some(u8::try_from(value).map_err(|_| anyhow::anyhow!("colour code {value} is outside 0-255")))
}

/// Colour name, xterm-256 code or `#rrggbb`.
pub fn parse_color(s: &str) -> Result<Rgb> {
    if let Some(code) = parse_code(s) {
        return Ok(xterm_to_rgb(code?));
    }
    if let Some(color) = named_color(s.trim()) {
        return Ok(color);
    }
    if let Some(color) = Rgb::from_hex(s.trim()) {
        return Ok(color);
    }
    bail!("unknown colour {s:?}")
}

/// Gradient name, single colour, or comma-separated `#rrggbb` stops.
pub fn parse_palette(s: &str) -> Result<Palette> {
    let s = s.trim();
    if let Some(palette) = Palette::named(s) {
        return Ok(palette);
    }
    if s.contains(',') {
        let stops = s
            .split(',')
            .map(|stop| Rgb::from_hex(stop.trim()).with_context(|| format!("bad palette stop {stop:?}")))
            .collect::<Result<Vec<_>>>()?;
        return Palette::new(stops).context("palette has no stops");
    }
    match parse_color(s) {
        Ok(color) => Ok(Palette::solid(color)),
        Err(_) => bail!(
            "unknown palette {s:?}; expected one of {}, a colour, or #rrggbb stops",
            gradient_names().collect::<Vec<_>>().join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["rs-wirecube"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::from_args(args(&[])).unwrap();
        assert_eq!(config.fps, 20.0);
        assert_eq!(config.cubes, 1);
        assert_eq!(config.render.placement, Placement::Centered);
        assert_eq!(config.render.ramp, Ramp::default());
        assert_eq!(config.background, Rgb::BLACK);
        assert!((config.render.fov - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn empty_ramp_is_rejected() {
        assert!(Config::from_args(args(&["--chars", ""])).is_err());
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert!(Config::from_args(args(&["--fps", "0"])).is_err());
        assert!(Config::from_args(args(&["--fps", "1e-20"])).is_err());
        assert!(Config::from_args(args(&["--fps", "5000"])).is_err());
        assert!(Config::from_args(args(&["--size", "0"])).is_err());
        assert!(Config::from_args(args(&["--near", "0"])).is_err());
        assert!(Config::from_args(args(&["--near", "5", "--far", "1"])).is_err());
        assert!(Config::from_args(args(&["--fov", "180"])).is_err());
        assert!(Config::from_args(args(&["--width", "0"])).is_err());
        assert!(Config::from_args(args(&["--light-x", "0", "--light-y", "0", "--light-z", "0"])).is_err());
    }

    #[test]
    fn negative_values_parse() {
        let config = Config::from_args(args(&["--rotation-x", "-2", "--light-z", "-3"])).unwrap();
        assert!(config.motion.angular_velocity.x < 0.0);
        assert_eq!(config.render.light.z, -3.0);
    }

    #[test]
    fn palette_forms() {
        assert_eq!(parse_palette("red").unwrap().stops().len(), 9);
        assert_eq!(parse_palette("196").unwrap(), Palette::solid(Rgb::new(255, 0, 0)));
        assert_eq!(parse_palette("lime").unwrap(), Palette::solid(Rgb::new(0, 255, 0)));
        assert_eq!(
            parse_palette("#000000, #ffffff").unwrap().stops(),
            &[Rgb::BLACK, Rgb::WHITE]
        );
        assert!(parse_palette("256").is_err());
        assert!(parse_palette("#000000,nope").is_err());
        assert!(parse_palette("chartreuse").is_err());
    }

    #[test]
    fn colours() {
        assert_eq!(parse_color("black").unwrap(), Rgb::BLACK);
        assert_eq!(parse_color("#102030").unwrap(), Rgb::new(16, 32, 48));
        assert_eq!(parse_color("15").unwrap(), Rgb::WHITE);
        assert!(parse_color("-1").is_err());
    }

    #[test]
    fn accepted_fps_builds_a_ticker() {
        let config = Config::from_args(args(&["--fps", "0.1"])).unwrap();
        let ticker = crate::tick::Ticker::from_fps(config.fps);
        assert!((ticker.period().as_secs_f32() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn z_spin_and_size() {
        let config = Config::from_args(args(&[])).unwrap();
        assert_eq!(config.motion.angular_velocity.z, 0.0);
        assert_eq!(config.size, 1.0);

        let config = Config::from_args(args(&["--rotation-z", "-0.3", "--size", "1.5"])).unwrap();
        assert!(config.motion.angular_velocity.z < 0.0);
        assert_eq!(config.size, 1.5);
    }

    #[test]
    fn wide_ramp_glyphs_are_rejected() {
        assert!(Config::from_args(args(&["--chars", ".:字"])).is_err());
        assert!(Config::from_args(args(&["--chars", ".:\u{1F600}"])).is_err());
        assert!(Config::from_args(args(&["--chars", " ░▒▓█"])).is_ok());
    }

    #[test]
    fn place_objects_switches_placement() {
        let config = Config::from_args(args(&["--place-objects", "--cubes", "3"])).unwrap();
        assert_eq!(config.render.placement, Placement::Positioned);
        assert_eq!(config.cubes, 3);
    }
}
