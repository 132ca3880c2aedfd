use crate::filters::gaussian_blur::collect_rows_as;
use crate::frame::Mask;

/// Flat structuring element stored as the offsets of its set cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuringElement {
    offsets: Vec<(isize, isize)>,
}

impl StructuringElement {
    /// Elliptical element inscribed in a `width x height` box.
    ///
    /// Row `i` spans `round(cx * sqrt(1 - dy^2 / ry^2))` cells either side of
    /// the center, so a 3x3 ellipse is a cross and a 5x5 one is a disk with
    /// single-cell top and bottom rows.
    pub fn ellipse(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let r = (height / 2) as isize;
        let c = (width / 2) as isize;
        let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

        let mut offsets = Vec::new();
        for i in 0..height as isize {
            let dy = i - r;
            let dx = if r > 0 {
                (c as f64 * (((r * r - dy * dy) as f64) * inv_r2).max(0.0).sqrt()).round() as isize
            } else {
                c
            };
            let j1 = (c - dx).max(0);
            let j2 = (c + dx + 1).min(width as isize);
            for j in j1..j2 {
                offsets.push((dy, j - c));
            }
        }
        Self { offsets }
    }

    /// Full `width x height` rectangle.
    pub fn rect(width: usize, height: usize) -> Self {
        let (r, c) = ((height / 2) as isize, (width / 2) as isize);
        let offsets = (0..height as isize)
            .flat_map(|i| (0..width as isize).map(move |j| (i - r, j - c)))
            .collect();
        Self { offsets }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn contains(&self, dy: isize, dx: isize) -> bool {
        self.offsets.contains(&(dy, dx))
    }
}

/// Binary erosion: set only where every in-bounds neighbor under the element is set.
pub fn erode(mask: &Mask, element: &StructuringElement) -> Mask {
    morph(mask, element, true)
}

/// Binary dilation: set where any in-bounds neighbor under the element is set.
pub fn dilate(mask: &Mask, element: &StructuringElement) -> Mask {
    morph(mask, element, false)
}

/// Erosion followed by dilation; removes specks smaller than the element.
pub fn open(mask: &Mask, element: &StructuringElement) -> Mask {
    dilate(&erode(mask, element), element)
}

/// Dilation followed by erosion; fills gaps smaller than the element.
pub fn close(mask: &Mask, element: &StructuringElement) -> Mask {
    erode(&dilate(mask, element), element)
}

fn morph(mask: &Mask, element: &StructuringElement, erosion: bool) -> Mask {
    let (h, w) = mask.dim();
    collect_rows_as(h, w, |row| {
        (0..w)
            .map(|col| {
                let hit = |&(dy, dx): &(isize, isize)| {
                    let nr = row as isize + dy;
                    let nc = col as isize + dx;
                    if nr < 0 || nr >= h as isize || nc < 0 || nc >= w as isize {
                        // Out-of-bounds cells never decide the result.
                        return erosion;
                    }
                    mask[[nr as usize, nc as usize]] > 0
                };
                let set = if erosion {
                    element.offsets.iter().all(hit)
                } else {
                    element.offsets.iter().any(hit)
                };
                if set {
                    255
                } else {
                    0
                }
            })
            .collect()
    })
}
