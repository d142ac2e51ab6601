use ndarray::{s, Array2, ArrayView2, Axis};

/// Converts a grid of gate centers into the grid of cell corners around them.
///
/// Interior corners are midpoints between neighbouring centers and the outer
/// corners are linearly extrapolated, giving `(rows + 1, cols + 1)` points.
/// An axis of length one produces cells of zero width along it.
pub fn edges_2d(centers: ArrayView2<f64>) -> Array2<f64> {
    let along_rays = edges_along(centers, Axis(0));
    edges_along(along_rays.view(), Axis(1))
}

fn edges_along(centers: ArrayView2<f64>, axis: Axis) -> Array2<f64> {
    let n = centers.len_of(axis);
    let mut shape = centers.raw_dim();
    shape[axis.index()] = n + 1;
    let mut edges = Array2::zeros(shape);
    if n == 0 {
        return edges;
    }
    if n == 1 {
        edges.index_axis_mut(axis, 0).assign(&centers.index_axis(axis, 0));
        edges.index_axis_mut(axis, 1).assign(&centers.index_axis(axis, 0));
        return edges;
    }

    let (lower, upper) = match axis.index() {
        0 => (centers.slice(s![..-1, ..]), centers.slice(s![1.., ..])),
        _ => (centers.slice(s![.., ..-1]), centers.slice(s![.., 1..])),
    };
    let midpoints = (&lower + &upper) / 2.0;
    match axis.index() {
        0 => edges.slice_mut(s![1..-1, ..]).assign(&midpoints),
        _ => edges.slice_mut(s![.., 1..-1]).assign(&midpoints),
    }

    let first = &centers.index_axis(axis, 0) * 2.0 - &edges.index_axis(axis, 1);
    edges.index_axis_mut(axis, 0).assign(&first);
    let last = &centers.index_axis(axis, n - 1) * 2.0 - &edges.index_axis(axis, n - 1);
    edges.index_axis_mut(axis, n).assign(&last);
    edges
}
