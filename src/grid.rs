// src/grid.rs
//
// Occupancy-grid primitives.
//
// An occupancy grid is an `Array2<u8>` with row 0 at the top edge of the
// robot's local window and per-cell values in [0, 255] expressing occupancy
// confidence. Everything here is elementwise over that value domain:
// intermediate math runs in f32 and results are rounded and clamped back
// to the byte range, so no operation can leave [0, 255].

use ndarray::Array2;

/// Round an f32 back into the byte value domain.
#[inline]
fn to_byte(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Translate a grid so that `dst[p] = src[p + (dy, dx)]`.
///
/// Cells whose source falls outside the grid are filled with zero: a cell
/// that scrolls into view carries no prior evidence and starts as unknown.
/// Always allocates a fresh buffer — source and destination regions overlap
/// for small shifts, so translating in place would read already-written
/// cells.
pub fn translate(src: &Array2<u8>, dx: i32, dy: i32) -> Array2<u8> {
    let (rows, cols) = src.dim();
    let mut dst = Array2::zeros(src.raw_dim());

    for ((y, x), cell) in dst.indexed_iter_mut() {
        let sy = y as i32 + dy;
        let sx = x as i32 + dx;
        if sy >= 0 && sx >= 0 && (sy as usize) < rows && (sx as usize) < cols {
            *cell = src[(sy as usize, sx as usize)];
        }
    }
    dst
}

/// 3×3 box mean with border replication.
///
/// The "neighbor consensus" signal: each output cell is the mean of the
/// 3×3 neighborhood around the input cell, with out-of-bounds neighbors
/// replaced by the nearest edge cell.
pub fn box_mean_3x3(src: &Array2<u8>) -> Array2<u8> {
    let (rows, cols) = src.dim();
    let mut out = Array2::zeros(src.raw_dim());

    for ((y, x), cell) in out.indexed_iter_mut() {
        let mut sum = 0u32;
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                let ny = (y as i32 + dy).clamp(0, rows as i32 - 1) as usize;
                let nx = (x as i32 + dx).clamp(0, cols as i32 - 1) as usize;
                sum += u32::from(src[(ny, nx)]);
            }
        }
        *cell = to_byte(sum as f32 / 9.0);
    }
    out
}

/// Elementwise `wa·a + wb·b`, rounded and clamped to the byte range.
///
/// Used for both the temporal blend (`alpha·frame + (1-alpha)·estimate`)
/// and the spatial blend (`beta·blend + (1-beta)·neighbor_mean`).
/// Shapes must match.
pub fn weighted_sum(a: &Array2<u8>, wa: f32, b: &Array2<u8>, wb: f32) -> Array2<u8> {
    debug_assert_eq!(a.dim(), b.dim());
    let mut out = Array2::zeros(a.raw_dim());

    for ((cell, &av), &bv) in out.iter_mut().zip(a.iter()).zip(b.iter()) {
        *cell = to_byte(wa * f32::from(av) + wb * f32::from(bv));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_translate_moves_content_and_zero_fills() {
        let mut src = Array2::<u8>::zeros((6, 6));
        src[(3, 3)] = 200;

        // Window moved by (+1, +2): old content lands one column left,
        // two rows up.
        let dst = translate(&src, 1, 2);
        assert_eq!(dst[(1, 2)], 200);
        assert_eq!(dst[(3, 3)], 0);

        // Cells exposed at the trailing edge carry no evidence.
        for x in 0..6 {
            assert_eq!(dst[(5, x)], 0);
            assert_eq!(dst[(4, x)], 0);
        }
        for y in 0..6 {
            assert_eq!(dst[(y, 5)], 0);
        }
    }

    #[test]
    fn test_translate_identity_for_zero_shift() {
        let src = array![[1u8, 2, 3], [4, 5, 6], [7, 8, 9]];
        assert_eq!(translate(&src, 0, 0), src);
    }

    #[test]
    fn test_box_mean_constant_field_is_fixed_point() {
        // Border replication means a uniform field stays uniform,
        // including corners.
        let src = Array2::<u8>::from_elem((5, 7), 173);
        assert_eq!(box_mean_3x3(&src), src);
    }

    #[test]
    fn test_box_mean_single_cell_spreads() {
        let mut src = Array2::<u8>::zeros((5, 5));
        src[(2, 2)] = 90;

        let mean = box_mean_3x3(&src);
        assert_eq!(mean[(2, 2)], 10); // 90 / 9
        assert_eq!(mean[(1, 1)], 10);
        assert_eq!(mean[(0, 0)], 0); // outside the 3×3 reach
    }

    #[test]
    fn test_weighted_sum_saturates_at_byte_range() {
        let a = Array2::<u8>::from_elem((2, 2), 255);
        let b = Array2::<u8>::from_elem((2, 2), 255);
        let out = weighted_sum(&a, 1.0, &b, 1.0);
        assert!(out.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_weighted_sum_blends() {
        let a = Array2::<u8>::from_elem((2, 2), 200);
        let b = Array2::<u8>::from_elem((2, 2), 100);
        let out = weighted_sum(&a, 0.5, &b, 0.5);
        assert!(out.iter().all(|&v| v == 150));
    }
}
