//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Scene elements (projected onto one plane):
//! - activated fibers: `#`
//! - other fibers: `.`
//! - electrode box outline: `E`
//!
//! Window plots draw one value per column with `*` and the zero line with `-`.

use crate::domain::{Bounds3, Plane};
use crate::error::AppError;
use crate::plot::{Renderer, Scene};

/// Fixed-size projection of a scene onto an axis-aligned plane.
#[derive(Debug, Clone)]
pub struct AsciiProjection {
    pub plane: Plane,
    pub width: usize,
    pub height: usize,
}

impl AsciiProjection {
    pub fn new(plane: Plane, width: usize, height: usize) -> Self {
        Self {
            plane,
            width: width.max(10),
            height: height.max(5),
        }
    }
}

impl Renderer for AsciiProjection {
    type Output = String;

    fn render(&mut self, scene: &Scene<'_>) -> Result<String, AppError> {
        if scene.activated.len() != scene.fibers.len() {
            return Err(AppError::new(
                4,
                format!(
                    "Scene has {} fibers but {} activation flags.",
                    scene.fibers.len(),
                    scene.activated.len()
                ),
            ));
        }

        let (ha, va) = self.plane.axes();
        let view = scene.bounds.union(&scene.electrode);
        let (h_min, h_max) = pad_range(view.axis(ha)[0], view.axis(ha)[1], 0.02);
        let (v_min, v_max) = pad_range(view.axis(va)[0], view.axis(va)[1], 0.02);

        let mut grid = vec![vec![' '; self.width]; self.height];

        // Inactive first so activated fibers win shared cells.
        let order = scene
            .fibers
            .iter()
            .zip(scene.activated)
            .filter(|(_, on)| !**on)
            .chain(scene.fibers.iter().zip(scene.activated).filter(|(_, on)| **on));

        for (fiber, &on) in order {
            let ch = if on { '#' } else { '.' };
            let mut prev = None;
            for p in fiber {
                let x = map_x(p[ha], h_min, h_max, self.width);
                let y = map_y(p[va], v_min, v_max, self.height);
                if let Some((x0, y0)) = prev {
                    draw_line(&mut grid, x0, y0, x, y, ch);
                } else {
                    grid[y][x] = ch;
                }
                prev = Some((x, y));
            }
        }

        draw_box(&mut grid, &scene.electrode, ha, va, (h_min, h_max), (v_min, v_max));

        let (h_label, v_label) = self.plane.labels();
        let activated = scene.activated.iter().filter(|&&on| on).count();
        let mut out = String::new();
        out.push_str(&format!("{}\n", scene.title));
        out.push_str(&format!(
            "{h_label}=[{h_min:.2}, {h_max:.2}] | {v_label}=[{v_min:.2}, {v_max:.2}] | \
             activated {activated}/{}\n",
            scene.fibers.len()
        ));
        for row in grid {
            out.push_str(&row.into_iter().collect::<String>());
            out.push('\n');
        }
        Ok(out)
    }
}

/// Plot a window of values (one column per value) around a site.
pub fn render_window(values: &[f64], height: usize) -> String {
    let height = height.max(3);
    if values.is_empty() {
        return "(empty window)\n".to_string();
    }

    let mut y_min = values.iter().copied().fold(0.0_f64, f64::min);
    let mut y_max = values.iter().copied().fold(0.0_f64, f64::max);
    if !(y_max > y_min) {
        y_min -= 1.0;
        y_max += 1.0;
    }

    let width = values.len();
    let mut grid = vec![vec![' '; width]; height];
    let zero = map_y(0.0, y_min, y_max, height);
    for cell in grid[zero].iter_mut() {
        *cell = '-';
    }
    for (x, &v) in values.iter().enumerate() {
        if v.is_finite() {
            grid[map_y(v, y_min, y_max, height)][x] = '*';
        }
    }

    let mut out = format!("y=[{y_min:.4}, {y_max:.4}]\n");
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    let span = (max - min).abs();
    let pad = (span * frac).max(0.5);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_box(
    grid: &mut [Vec<char>],
    bounds: &Bounds3,
    ha: usize,
    va: usize,
    h_range: (f64, f64),
    v_range: (f64, f64),
) {
    let height = grid.len();
    let width = grid[0].len();
    let h = bounds.axis(ha);
    let v = bounds.axis(va);
    let x0 = map_x(h[0].min(h[1]), h_range.0, h_range.1, width);
    let x1 = map_x(h[0].max(h[1]), h_range.0, h_range.1, width);
    let y0 = map_y(v[0].max(v[1]), v_range.0, v_range.1, height);
    let y1 = map_y(v[0].min(v[1]), v_range.0, v_range.1, height);

    for x in x0..=x1 {
        grid[y0][x] = 'E';
        grid[y1][x] = 'E';
    }
    for row in grid.iter_mut().take(y1 + 1).skip(y0) {
        row[x0] = 'E';
        row[x1] = 'E';
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
