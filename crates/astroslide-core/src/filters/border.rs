//! Border handling shared by the neighborhood filters.
//!
//! Gaussian blur, CLAHE tiles, non-local means padding and the noise
//! Laplacian all read out-of-range samples with reflect-101 (`dcb|abcd|cba`).
//! The median blur replicates edge pixels and the à trous wavelet mirrors
//! symmetrically (`dcba|abcd|dcba`).

/// Reflect an index into `[0, size)` without repeating the edge sample.
///
/// Works for any distance outside the range.
#[inline]
pub fn reflect_101(idx: isize, size: usize) -> usize {
    if size <= 1 {
        return 0;
    }
    let period = 2 * (size as isize - 1);
    let m = idx.rem_euclid(period);
    if m < size as isize {
        m as usize
    } else {
        (period - m) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_101_negative() {
        assert_eq!(reflect_101(-1, 4), 1);
        assert_eq!(reflect_101(-3, 4), 3);
        assert_eq!(reflect_101(4, 4), 2);
    }

    #[test]
    fn test_reflect_101_past_end() {
        assert_eq!(reflect_101(0, 5), 0);
        assert_eq!(reflect_101(4, 5), 4);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(9, 5), 1);
    }

    #[test]
    fn test_reflect_101_single_sample() {
        assert_eq!(reflect_101(-7, 1), 0);
        assert_eq!(reflect_101(7, 1), 0);
    }
}
