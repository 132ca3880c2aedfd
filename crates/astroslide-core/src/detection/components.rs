use ndarray::Array2;

use crate::frame::Mask;

/// Statistics for a single 8-connected component.
#[derive(Clone, Debug)]
pub struct Component {
    /// Label in first-appearance (raster) order, starting at 1.
    pub label: u32,
    /// Number of pixels in the component.
    pub area: usize,
    /// Bounding box: (min_row, max_row, min_col, max_col).
    pub bbox: (usize, usize, usize, usize),
    /// Unweighted centroid (row, col).
    pub centroid: (f64, f64),
    /// Member pixels as (row, col), in raster order.
    pub pixels: Vec<(usize, usize)>,
}

impl Component {
    /// Maximum of `data` over the component's pixels.
    pub fn peak(&self, data: &Array2<f32>) -> f32 {
        self.pixels
            .iter()
            .map(|&(r, c)| data[[r, c]])
            .fold(f32::MIN, f32::max)
    }
}

/// Label the 8-connected foreground regions of a mask.
///
/// Two-pass labeling with union-find. Components are returned in raster order
/// of their first pixel, so the output is stable for a given mask.
pub fn connected_components(mask: &Mask) -> Vec<Component> {
    let (h, w) = mask.dim();
    if h == 0 || w == 0 {
        return Vec::new();
    }

    let mut labels = Array2::<u32>::zeros((h, w));
    // Index 0 is background.
    let mut parent: Vec<u32> = vec![0];

    for row in 0..h {
        for col in 0..w {
            if mask[[row, col]] == 0 {
                continue;
            }

            let mut neighbors = [0u32; 4];
            if col > 0 {
                neighbors[0] = labels[[row, col - 1]];
            }
            if row > 0 {
                if col > 0 {
                    neighbors[1] = labels[[row - 1, col - 1]];
                }
                neighbors[2] = labels[[row - 1, col]];
                if col + 1 < w {
                    neighbors[3] = labels[[row - 1, col + 1]];
                }
            }

            let smallest = neighbors.iter().copied().filter(|&l| l > 0).min();
            match smallest {
                None => {
                    let label = parent.len() as u32;
                    parent.push(label);
                    labels[[row, col]] = label;
                }
                Some(label) => {
                    labels[[row, col]] = label;
                    for &other in neighbors.iter().filter(|&&l| l > 0 && l != label) {
                        union(&mut parent, label, other);
                    }
                }
            }
        }
    }

    for i in 1..parent.len() {
        parent[i] = find(&parent, i as u32);
    }

    // Root label -> output slot, assigned on first sight in raster order.
    let mut slot_of = vec![usize::MAX; parent.len()];
    let mut components: Vec<Component> = Vec::new();

    for row in 0..h {
        for col in 0..w {
            let lbl = labels[[row, col]];
            if lbl == 0 {
                continue;
            }
            let root = parent[lbl as usize] as usize;
            if slot_of[root] == usize::MAX {
                slot_of[root] = components.len();
                components.push(Component {
                    label: components.len() as u32 + 1,
                    area: 0,
                    bbox: (row, row, col, col),
                    centroid: (0.0, 0.0),
                    pixels: Vec::new(),
                });
            }
            let entry = &mut components[slot_of[root]];
            entry.area += 1;
            entry.bbox.0 = entry.bbox.0.min(row);
            entry.bbox.1 = entry.bbox.1.max(row);
            entry.bbox.2 = entry.bbox.2.min(col);
            entry.bbox.3 = entry.bbox.3.max(col);
            entry.pixels.push((row, col));
        }
    }

    for comp in &mut components {
        let n = comp.area as f64;
        let (sr, sc) = comp
            .pixels
            .iter()
            .fold((0.0f64, 0.0f64), |(a, b), &(r, c)| (a + r as f64, b + c as f64));
        comp.centroid = (sr / n, sc / n);
    }

    components
}

fn find(parent: &[u32], mut x: u32) -> u32 {
    while parent[x as usize] != x {
        x = parent[x as usize];
    }
    x
}

fn union(parent: &mut [u32], a: u32, b: u32) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        let (small, big) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[big as usize] = small;
    }
}
