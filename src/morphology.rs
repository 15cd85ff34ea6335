// src/morphology.rs
//
// Binary morphology for foreground-mask cleanup.
//
// Masks are `Array2<u8>` with 0 = background and 255 = foreground. The
// cleanup applied to the raw gate output is two dilations followed by one
// erosion with an elliptical structuring element: a closing biased toward
// growth, so fragmented detections of the same obstacle merge into one
// blob while the net footprint only grows by at most one element radius.

use ndarray::Array2;

/// Offsets of an elliptical (disc) structuring element of the given radius.
///
/// Diameter is `2·radius + 1`; a cell (dy, dx) belongs to the element when
/// `dy² + dx² ≤ radius²`. Radius 0 degenerates to the single center cell,
/// which makes every operation here the identity.
pub fn elliptical_element(radius: usize) -> Vec<(i32, i32)> {
    let r = radius as i32;
    let mut offsets = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            if dy * dy + dx * dx <= r * r {
                offsets.push((dy, dx));
            }
        }
    }
    offsets
}

/// A cell is set in the output if any cell under the element is set.
/// Out-of-bounds neighbors are treated as background.
fn dilate(mask: &Array2<u8>, element: &[(i32, i32)]) -> Array2<u8> {
    let (rows, cols) = mask.dim();
    let mut out = Array2::zeros(mask.raw_dim());

    for ((y, x), cell) in out.indexed_iter_mut() {
        for &(dy, dx) in element {
            let ny = y as i32 + dy;
            let nx = x as i32 + dx;
            if ny >= 0
                && nx >= 0
                && (ny as usize) < rows
                && (nx as usize) < cols
                && mask[(ny as usize, nx as usize)] != 0
            {
                *cell = 255;
                break;
            }
        }
    }
    out
}

/// A cell stays set only if every in-bounds cell under the element is set.
/// Out-of-bounds neighbors do not veto, so blobs touching the grid edge
/// are not eaten from outside.
fn erode(mask: &Array2<u8>, element: &[(i32, i32)]) -> Array2<u8> {
    let (rows, cols) = mask.dim();
    let mut out = Array2::zeros(mask.raw_dim());

    for ((y, x), cell) in out.indexed_iter_mut() {
        let mut keep = true;
        for &(dy, dx) in element {
            let ny = y as i32 + dy;
            let nx = x as i32 + dx;
            if ny >= 0
                && nx >= 0
                && (ny as usize) < rows
                && (nx as usize) < cols
                && mask[(ny as usize, nx as usize)] == 0
            {
                keep = false;
                break;
            }
        }
        if keep {
            *cell = 255;
        }
    }
    out
}

/// Dilate twice, erode once.
pub fn cleanup(mask: &Array2<u8>, radius: usize) -> Array2<u8> {
    let element = elliptical_element(radius);
    let grown = dilate(&dilate(mask, &element), &element);
    erode(&grown, &element)
}
