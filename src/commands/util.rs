use ndarray::{Array2, ArrayView2, Zip};

/// Mirrors an out-of-range index back into `0..len` without repeating the
/// edge sample (`gfedcb|abcdefgh|gfedcba`).
pub(crate) fn reflect_101(index: isize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut index = index;
    while index < 0 || index > last {
        index = if index < 0 { -index } else { 2 * last - index };
    }
    index as usize
}

/// Correlates every row of `source` with `kernel`, centered at `len / 2`.
pub(crate) fn correlate_rows(source: ArrayView2<'_, f32>, kernel: &[f32]) -> Array2<f32> {
    let (rows, cols) = source.dim();
    let radius = (kernel.len() / 2) as isize;
    let mut output = Array2::<f32>::zeros((rows, cols));
    Zip::from(output.rows_mut())
        .and(source.rows())
        .par_for_each(|mut out, input| {
            for x in 0..cols {
                let mut sum = 0.0_f32;
                for (offset, weight) in kernel.iter().enumerate() {
                    let sx = reflect_101(x as isize + offset as isize - radius, cols);
                    sum += input[sx] * weight;
                }
                out[x] = sum;
            }
        });
    output
}

pub(crate) fn correlate_columns(source: ArrayView2<'_, f32>, kernel: &[f32]) -> Array2<f32> {
    correlate_rows(source.t(), kernel).reversed_axes()
}

pub(crate) fn separable(source: ArrayView2<'_, f32>, kx: &[f32], ky: &[f32]) -> Array2<f32> {
    let horizontal = correlate_rows(source, kx);
    correlate_columns(horizontal.view(), ky)
}

/// Full 1-D convolution of two short kernels.
fn poly_mul(left: &[f32], right: &[f32]) -> Vec<f32> {
    let mut out = vec![0.0_f32; left.len() + right.len() - 1];
    for (i, a) in left.iter().enumerate() {
        for (j, b) in right.iter().enumerate() {
            out[i + j] += a * b;
        }
    }
    out
}

/// Row `n` of Pascal's triangle.
pub(crate) fn binomial(n: usize) -> Vec<f32> {
    let mut row = vec![1.0_f32];
    for _ in 0..n {
        row = poly_mul(&row, &[1.0, 1.0]);
    }
    row
}

/// Sobel kernel of the given derivative `order` (0, 1 or 2) and odd
/// aperture `ksize >= 3`.
pub(crate) fn derivative_kernel(order: u32, ksize: usize) -> Vec<f32> {
    let ksize = ksize.max(3);
    match order {
        0 => binomial(ksize - 1),
        1 => poly_mul(&binomial(ksize - 3), &[-1.0, 0.0, 1.0]),
        _ => poly_mul(&binomial(ksize - 3), &[1.0, -2.0, 1.0]),
    }
}

/// Normalized 1-D Gaussian of odd length `ksize`. A non-positive `sigma` is
/// derived from the size as `0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`.
pub(crate) fn gaussian_kernel(ksize: usize, sigma: f32) -> Vec<f32> {
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let radius = (ksize / 2) as f32;
    let mut kernel = (0..ksize)
        .map(|index| {
            let distance = index as f32 - radius;
            (-(distance * distance) / (2.0 * sigma * sigma)).exp()
        })
        .collect::<Vec<_>>();
    let sum = kernel.iter().sum::<f32>().max(f32::EPSILON);
    kernel.iter_mut().for_each(|value| *value /= sum);
    kernel
}

pub(crate) fn min_max(values: impl IntoIterator<Item = f32>) -> (f32, f32) {
    let mut iter = values.into_iter();
    let first = iter.next().unwrap_or(0.0);
    iter.fold((first, first), |(min, max), value| {
        (min.min(value), max.max(value))
    })
}
