//! Fill masked regions from their surroundings.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AstroError;
use crate::frame::{mask_count, Mask, PixelGrid};

const DIFFUSION_MAX_ITERATIONS: usize = 500;
const DIFFUSION_TOLERANCE: f32 = 0.05;
const UNREACHED: f32 = 1.0e6;

/// Inpainting algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InpaintMethod {
    /// Fast marching from the region boundary inward (Telea).
    #[default]
    Telea,
    /// Diffusion of boundary values until the fill is harmonic.
    #[serde(rename = "ns")]
    NavierStokes,
}

impl fmt::Display for InpaintMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Telea => write!(f, "telea"),
            Self::NavierStokes => write!(f, "ns"),
        }
    }
}

impl FromStr for InpaintMethod {
    type Err = AstroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "telea" => Ok(Self::Telea),
            "ns" | "navier_stokes" => Ok(Self::NavierStokes),
            other => Err(AstroError::Processing(format!(
                "unknown inpaint method '{other}' (expected telea or ns)"
            ))),
        }
    }
}

/// Replace masked star pixels with content interpolated from their surroundings.
///
/// `radius` is the neighborhood considered for each filled pixel by the
/// fast-marching method.
pub fn remove_stars_inpaint(
    grid: &PixelGrid,
    mask: &Mask,
    method: InpaintMethod,
    radius: usize,
) -> PixelGrid {
    let masked = mask_count(mask);
    if masked == 0 {
        return grid.clone();
    }
    debug!(%method, radius, masked, "inpainting");
    let planes = grid.channels();
    let filled = match method {
        InpaintMethod::Telea => telea(&planes, mask, radius.max(1)),
        InpaintMethod::NavierStokes => diffuse(&planes, mask),
    };
    PixelGrid::from_channels(&filled)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Flag {
    Known,
    Band,
    Inside,
}

fn telea(planes: &[Array2<f32>; 3], mask: &Mask, radius: usize) -> [Array2<f32>; 3] {
    let (h, w) = mask.dim();
    let mut out = planes.clone();
    let mut flags = mask.mapv(|m| if m > 0 { Flag::Inside } else { Flag::Known });
    let mut dist = mask.mapv(|m| if m > 0 { UNREACHED } else { 0.0 });
    let mut heap: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();

    for row in 0..h {
        for col in 0..w {
            if flags[[row, col]] != Flag::Known {
                continue;
            }
            let borders_hole = neighbors4(row, col, h, w).any(|(r, c)| flags[[r, c]] == Flag::Inside);
            if borders_hole {
                flags[[row, col]] = Flag::Band;
                heap.push(Reverse((0f32.to_bits(), row * w + col)));
            }
        }
    }

    while let Some(Reverse((_, idx))) = heap.pop() {
        let (row, col) = (idx / w, idx % w);
        if flags[[row, col]] == Flag::Known {
            continue;
        }
        flags[[row, col]] = Flag::Known;

        for (nr, nc) in neighbors4(row, col, h, w) {
            if flags[[nr, nc]] != Flag::Inside {
                continue;
            }
            let t = arrival_time(&dist, &flags, nr, nc);
            dist[[nr, nc]] = t;
            for plane in out.iter_mut() {
                let value = telea_estimate(plane, &dist, &flags, nr, nc, radius);
                plane[[nr, nc]] = value;
            }
            flags[[nr, nc]] = Flag::Band;
            heap.push(Reverse((t.to_bits(), nr * w + nc)));
        }
    }

    out
}

fn neighbors4(row: usize, col: usize, h: usize, w: usize) -> impl Iterator<Item = (usize, usize)> {
    let row = row as isize;
    let col = col as isize;
    [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)]
        .into_iter()
        .map(move |(dr, dc)| (row + dr, col + dc))
        .filter(move |&(r, c)| r >= 0 && c >= 0 && r < h as isize && c < w as isize)
        .map(|(r, c)| (r as usize, c as usize))
}

/// Upwind eikonal update from the four axis neighbors.
fn arrival_time(dist: &Array2<f32>, flags: &Array2<Flag>, row: usize, col: usize) -> f32 {
    let (h, w) = dist.dim();
    let sample = |r: isize, c: isize| -> Option<f32> {
        if r < 0 || c < 0 || r >= h as isize || c >= w as isize {
            return None;
        }
        let (r, c) = (r as usize, c as usize);
        (flags[[r, c]] != Flag::Inside).then(|| dist[[r, c]])
    };
    let (r, c) = (row as isize, col as isize);
    let verticals = [sample(r - 1, c), sample(r + 1, c)];
    let horizontals = [sample(r, c - 1), sample(r, c + 1)];

    let mut best = UNREACHED;
    for v in verticals {
        for hz in horizontals {
            best = best.min(solve_eikonal(v, hz));
        }
    }
    best
}

fn solve_eikonal(a: Option<f32>, b: Option<f32>) -> f32 {
    match (a, b) {
        (Some(t1), Some(t2)) => {
            let d = t1 - t2;
            if d.abs() >= 1.0 {
                return 1.0 + t1.min(t2);
            }
            let r = (2.0 - d * d).sqrt();
            (t1 + t2 + r) * 0.5
        }
        (Some(t), None) | (None, Some(t)) => 1.0 + t,
        (None, None) => UNREACHED,
    }
}

/// Weighted average of already-filled pixels within `radius`, weighted by
/// direction along the arrival-time gradient, distance, and level-set proximity.
fn telea_estimate(
    plane: &Array2<f32>,
    dist: &Array2<f32>,
    flags: &Array2<Flag>,
    row: usize,
    col: usize,
    radius: usize,
) -> f32 {
    let (h, w) = plane.dim();
    let (grad_r, grad_c) = time_gradient(dist, flags, row, col);
    let t0 = dist[[row, col]];
    let r2 = (radius * radius) as f32;

    let mut sum = 0.0f32;
    let mut weight_sum = 0.0f32;
    let r0 = row.saturating_sub(radius);
    let r1 = (row + radius).min(h - 1);
    let c0 = col.saturating_sub(radius);
    let c1 = (col + radius).min(w - 1);
    for qr in r0..=r1 {
        for qc in c0..=c1 {
            if flags[[qr, qc]] == Flag::Inside || (qr == row && qc == col) {
                continue;
            }
            let dr = row as f32 - qr as f32;
            let dc = col as f32 - qc as f32;
            let len2 = dr * dr + dc * dc;
            if len2 > r2 {
                continue;
            }
            let len = len2.sqrt();
            let direction = ((dr * grad_r + dc * grad_c) / len).abs().max(1e-6);
            let distance = 1.0 / len2;
            let level = 1.0 / (1.0 + (dist[[qr, qc]] - t0).abs());
            let weight = direction * distance * level;
            sum += plane[[qr, qc]] * weight;
            weight_sum += weight;
        }
    }

    if weight_sum > 0.0 {
        sum / weight_sum
    } else {
        plane[[row, col]]
    }
}

fn time_gradient(dist: &Array2<f32>, flags: &Array2<Flag>, row: usize, col: usize) -> (f32, f32) {
    let (h, w) = dist.dim();
    let known = |r: usize, c: usize| flags[[r, c]] != Flag::Inside;
    let t = dist[[row, col]];

    let axis = |prev: Option<(usize, usize)>, next: Option<(usize, usize)>| -> f32 {
        match (prev.filter(|&(r, c)| known(r, c)), next.filter(|&(r, c)| known(r, c))) {
            (Some(p), Some(n)) => (dist[[n.0, n.1]] - dist[[p.0, p.1]]) * 0.5,
            (Some(p), None) => t - dist[[p.0, p.1]],
            (None, Some(n)) => dist[[n.0, n.1]] - t,
            (None, None) => 0.0,
        }
    };

    let up = row.checked_sub(1).map(|r| (r, col));
    let down = (row + 1 < h).then_some((row + 1, col));
    let left = col.checked_sub(1).map(|c| (row, c));
    let right = (col + 1 < w).then_some((row, col + 1));
    (axis(up, down), axis(left, right))
}

/// Iterative harmonic fill: masked pixels repeatedly take the mean of their
/// four neighbors until the largest update falls below tolerance.
fn diffuse(planes: &[Array2<f32>; 3], mask: &Mask) -> [Array2<f32>; 3] {
    let (h, w) = mask.dim();
    let holes: Vec<(usize, usize)> = mask
        .indexed_iter()
        .filter(|(_, m)| **m > 0)
        .map(|(idx, _)| idx)
        .collect();

    let mut out = planes.clone();
    for plane in out.iter_mut() {
        let known: Vec<f32> = plane
            .indexed_iter()
            .filter(|&((r, c), _)| mask[[r, c]] == 0)
            .map(|(_, &v)| v)
            .collect();
        let seed = if known.is_empty() {
            0.0
        } else {
            known.iter().sum::<f32>() / known.len() as f32
        };
        for &(r, c) in &holes {
            plane[[r, c]] = seed;
        }

        for _ in 0..DIFFUSION_MAX_ITERATIONS {
            let mut max_change = 0.0f32;
            for &(r, c) in &holes {
                let mut sum = 0.0f32;
                let mut n = 0.0f32;
                for (nr, nc) in neighbors4(r, c, h, w) {
                    sum += plane[[nr, nc]];
                    n += 1.0;
                }
                if n > 0.0 {
                    let next = sum / n;
                    max_change = max_change.max((next - plane[[r, c]]).abs());
                    plane[[r, c]] = next;
                }
            }
            if max_change < DIFFUSION_TOLERANCE {
                break;
            }
        }
    }
    out
}
