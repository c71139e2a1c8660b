//! Character framebuffer, depth buffer and the depth-tested line rasterizer.

use crate::color::Rgb;
use crate::math::Vec3;

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub color: Rgb,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        glyph: ' ',
        color: Rgb::BLACK,
    };

    pub fn is_blank(&self) -> bool {
        *self == Cell::BLANK
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::BLANK
    }
}

/// Row-major grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Writes `s` from `(x, y)` rightward, clipped at the right edge.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, color: Rgb) {
        for (glyph, cx) in s.chars().zip(x..self.width) {
            self.set(cx, y, Cell { glyph, color });
        }
    }

    /// Rows of cells, top first.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }
}

/// Nearest depth written so far per cell, `+inf` when untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    width: u16,
    height: u16,
    depths: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            depths: vec![f32::INFINITY; width as usize * height as usize],
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.depths[y as usize * self.width as usize + x as usize])
    }

    pub fn values(&self) -> &[f32] {
        &self.depths
    }
}

/// Colour and depth targets for one frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub color: FrameBuffer,
    pub depth: DepthBuffer,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            color: FrameBuffer::new(width, height),
            depth: DepthBuffer::new(width, height),
        }
    }

    pub fn width(&self) -> u16 {
        self.color.width
    }

    pub fn height(&self) -> u16 {
        self.color.height
    }

    /// Rounds `(x, y)` to a cell and writes it if `z` is strictly nearer
    /// than what the cell holds. Off-grid writes are dropped.
    pub fn draw_pixel(&mut self, x: f32, y: f32, z: f32, glyph: char, color: Rgb) {
        let (cx, cy) = (x.round(), y.round());
        // NaN fails both comparisons and is dropped too
        if !(cx >= 0.0 && cy >= 0.0 && cx < self.width() as f32 && cy < self.height() as f32) {
            return;
        }
        let index = cy as usize * self.width() as usize + cx as usize;
        if z < self.depth.depths[index] {
            self.depth.depths[index] = z;
            self.color.cells[index] = Cell { glyph, color };
        }
    }

    /// Depth-tested line from `p1` to `p2` (screen x, y plus depth z).
    ///
    /// Depth is interpolated by the distance of each stepped cell from the
    /// unrounded start point, relative to the unrounded segment length.
    /// The first cell gets exactly `p1.z` and the last exactly `p2.z`.
    /// Off-grid cells of the walk are dropped by [`Frame::draw_pixel`], so
    /// the on-grid cells are those of the full walk between the rounded
    /// endpoints. Only segments reaching more than [`WALK_MARGIN`] cells
    /// past the grid are cut down first; non-finite endpoints draw nothing.
    pub fn draw_line(&mut self, p1: Vec3, p2: Vec3, glyph: char, color: Rgb) {
        let bounds = (
            -WALK_MARGIN,
            -WALK_MARGIN,
            self.width() as f32 + WALK_MARGIN,
            self.height() as f32 + WALK_MARGIN,
        );
        let Some((t0, t1)) = clip_segment(p1, p2, bounds) else {
            return;
        };
        let a = if t0 == 0.0 { p1 } else { p1 + (p2 - p1) * t0 };
        let b = if t1 == 1.0 { p2 } else { p1 + (p2 - p1) * t1 };

        let length = ((p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2)).sqrt();
        let mut pixels = LinePixels::new(a.x, a.y, b.x, b.y).peekable();
        let mut first = true;

        while let Some((x, y)) = pixels.next() {
            let t = if first && t0 == 0.0 {
                0.0
            } else if pixels.peek().is_none() && t1 == 1.0 {
                1.0
            } else if length > 0.0 {
                let (dx, dy) = (x as f32 - p1.x, y as f32 - p1.y);
                ((dx * dx + dy * dy).sqrt() / length).min(1.0)
            } else {
                0.0
            };
            first = false;

            let z = p1.z * (1.0 - t) + p2.z * t;
            self.draw_pixel(x as f32, y as f32, z, glyph, color);
        }
    }
}

/// How far past the grid a line may reach before it is clipped instead of
/// walked in full. Near-degenerate projections land far beyond this.
pub const WALK_MARGIN: f32 = 65536.0;

/// Liang-Barsky clip of the segment's x/y against `(x_min, y_min, x_max, y_max)`.
///
/// Returns the parameter range `[t0, t1]` of the visible part.
fn clip_segment(p1: Vec3, p2: Vec3, (x_min, y_min, x_max, y_max): (f32, f32, f32, f32)) -> Option<(f32, f32)> {
    if ![p1.x, p1.y, p2.x, p2.y].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (p2.x - p1.x, p2.y - p1.y);
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;

    for (p, q) in [
        (-dx, p1.x - x_min),
        (dx, x_max - p1.x),
        (-dy, p1.y - y_min),
        (dy, y_max - p1.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }

    (t0 <= t1).then_some((t0, t1))
}

/// Bresenham walk between the rounded endpoints, inclusive of both.
#[derive(Debug, Clone)]
pub struct LinePixels {
    x: i64,
    y: i64,
    x_end: i64,
    y_end: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    err: i64,
    done: bool,
}

impl LinePixels {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let (x, y) = (x1.round() as i64, y1.round() as i64);
        let (x_end, y_end) = (x2.round() as i64, y2.round() as i64);
        let dx = (x_end - x).abs();
        let dy = -(y_end - y).abs();
        Self {
            x,
            y,
            x_end,
            y_end,
            dx,
            dy,
            sx: if x < x_end { 1 } else { -1 },
            sy: if y < y_end { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for LinePixels {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<(i64, i64)> {
        if self.done {
            return None;
        }
        let current = (self.x, self.y);
        if self.x == self.x_end && self.y == self.y_end {
            self.done = true;
            return Some(current);
        }
        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn bresenham_covers_both_endpoints() {
        let pixels: Vec<_> = LinePixels::new(0.0, 0.0, 4.0, 2.0).collect();
        assert_eq!(pixels.first(), Some(&(0, 0)));
        assert_eq!(pixels.last(), Some(&(4, 2)));
        assert_eq!(pixels.len(), 5);
    }

    #[test]
    fn bresenham_steep_and_reversed() {
        let pixels: Vec<_> = LinePixels::new(3.0, 7.0, 1.0, 0.0).collect();
        assert_eq!(pixels.len(), 8);
        assert_eq!(pixels.first(), Some(&(3, 7)));
        assert_eq!(pixels.last(), Some(&(1, 0)));
        for pair in pixels.windows(2) {
            assert!((pair[0].0 - pair[1].0).abs() <= 1);
            assert_eq!(pair[0].1 - pair[1].1, 1);
        }
    }

    #[test]
    fn degenerate_line_is_one_pixel() {
        let pixels: Vec<_> = LinePixels::new(2.2, 2.4, 1.8, 1.6).collect();
        assert_eq!(pixels, vec![(2, 2)]);
    }

    #[test]
    fn draw_pixel_rounds_and_clips() {
        let mut frame = Frame::new(4, 3);
        frame.draw_pixel(1.4, 0.6, 0.5, '#', RED);
        assert_eq!(frame.color.get(1, 1), Some(Cell { glyph: '#', color: RED }));
        assert_eq!(frame.depth.get(1, 1), Some(0.5));

        frame.draw_pixel(-0.6, 0.0, 0.1, '#', RED);
        frame.draw_pixel(4.0, 0.0, 0.1, '#', RED);
        frame.draw_pixel(0.0, 2.6, 0.1, '#', RED);
        frame.draw_pixel(f32::NAN, 0.0, 0.1, '#', RED);
        let written = frame.color.cells().iter().filter(|c| !c.is_blank()).count();
        assert_eq!(written, 1);
    }

    #[test]
    fn depth_test_is_strict() {
        let mut frame = Frame::new(2, 2);
        frame.draw_pixel(0.0, 0.0, 0.5, 'a', RED);
        frame.draw_pixel(0.0, 0.0, 0.5, 'b', RED);
        assert_eq!(frame.color.get(0, 0).map(|c| c.glyph), Some('a'));
        frame.draw_pixel(0.0, 0.0, 0.7, 'c', RED);
        assert_eq!(frame.color.get(0, 0).map(|c| c.glyph), Some('a'));
        frame.draw_pixel(0.0, 0.0, 0.2, 'd', RED);
        assert_eq!(frame.color.get(0, 0).map(|c| c.glyph), Some('d'));
        assert_eq!(frame.depth.get(0, 0), Some(0.2));
    }

    #[test]
    fn new_frame_is_blank_and_infinitely_deep() {
        let frame = Frame::new(3, 2);
        assert!(frame.color.cells().iter().all(Cell::is_blank));
        assert!(frame.depth.values().iter().all(|d| *d == f32::INFINITY));
    }

    #[test]
    fn line_endpoints_get_exact_depths() {
        let mut frame = Frame::new(20, 10);
        let p1 = Vec3::new(1.3, 2.2, 0.1);
        let p2 = Vec3::new(17.6, 8.4, 0.7);
        frame.draw_line(p1, p2, '*', RED);
        assert_eq!(frame.depth.get(1, 2), Some(0.1));
        assert_eq!(frame.depth.get(18, 8), Some(0.7));
    }

    #[test]
    fn far_off_grid_line_is_clipped_not_walked() {
        let mut frame = Frame::new(10, 10);
        frame.draw_line(Vec3::new(-1.0e6, 5.0, 0.5), Vec3::new(1.0e6, 5.0, 0.5), '-', RED);
        let row: Vec<char> = (0..10).filter_map(|x| frame.color.get(x, 5)).map(|c| c.glyph).collect();
        assert_eq!(row, vec!['-'; 10]);

        let mut frame = Frame::new(10, 10);
        frame.draw_line(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::new(3.0, 3.0, 0.0), '-', RED);
        frame.draw_line(Vec3::new(20.0, 20.0, 0.0), Vec3::new(30.0, 40.0, 0.0), '-', RED);
        assert!(frame.color.cells().iter().all(Cell::is_blank));
    }

    #[test]
    fn partly_off_grid_line_keeps_its_walk() {
        for k in 0..200 {
            let k = k as f32;
            let p1 = Vec3::new(3.3 + 0.07 * k, 4.6, 0.2);
            let p2 = Vec3::new(-37.7 - 1.3 * k, 61.2 + 0.9 * k, 0.6);
            let mut frame = Frame::new(40, 20);
            frame.draw_line(p1, p2, '*', RED);

            let mut expected: Vec<(u16, u16)> = LinePixels::new(p1.x, p1.y, p2.x, p2.y)
                .filter(|&(x, y)| (0..40).contains(&x) && (0..20).contains(&y))
                .map(|(x, y)| (x as u16, y as u16))
                .collect();
            expected.sort_unstable();
            let mut drawn: Vec<(u16, u16)> = (0..20u16)
                .flat_map(|y| (0..40u16).map(move |x| (x, y)))
                .filter(|&(x, y)| frame.color.get(x, y).is_some_and(|c| !c.is_blank()))
                .collect();
            drawn.sort_unstable();
            assert_eq!(drawn, expected, "k = {k}");
        }
    }

    #[test]
    fn put_str_clips_at_edge() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_str(2, 0, "abc", RED);
        assert_eq!(fb.get(2, 0).map(|c| c.glyph), Some('a'));
        assert_eq!(fb.get(3, 0).map(|c| c.glyph), Some('b'));
        assert_eq!(fb.rows().count(), 1);
    }
}
