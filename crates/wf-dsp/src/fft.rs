//! In-place radix-2 complex FFT
//!
//! Iterative Cooley-Tukey over split real/imaginary slices. Length must be a
//! power of two. No window is applied internally; callers pre-window (see
//! [`hann_window`]).

use std::f64::consts::PI;

/// Forward FFT, in place
///
/// `re` and `im` must have equal power-of-two length. Twiddle factors are
/// e^(-2*pi*i*j/size), so a cosine at bin k lands its energy at bins k and
/// n-k with magnitude n/2 each.
pub fn fft_in_place(re: &mut [f64], im: &mut [f64]) {
    let n = re.len();
    assert_eq!(n, im.len(), "re/im length mismatch");
    assert!(n.is_power_of_two(), "FFT length must be a power of two");
    if n < 2 {
        return;
    }

    // Bit-reversal permutation
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            re.swap(i, j);
            im.swap(i, j);
        }
    }

    // Butterfly passes
    let mut len = 2;
    while len <= n {
        let angle = -2.0 * PI / len as f64;
        let step_re = angle.cos();
        let step_im = angle.sin();

        for start in (0..n).step_by(len) {
            let mut w_re = 1.0;
            let mut w_im = 0.0;

            for k in 0..len / 2 {
                let even_re = re[start + k];
                let even_im = im[start + k];
                let odd_re = re[start + k + len / 2];
                let odd_im = im[start + k + len / 2];

                let t_re = odd_re * w_re - odd_im * w_im;
                let t_im = odd_re * w_im + odd_im * w_re;

                re[start + k] = even_re + t_re;
                im[start + k] = even_im + t_im;
                re[start + k + len / 2] = even_re - t_re;
                im[start + k + len / 2] = even_im - t_im;

                let next_re = w_re * step_re - w_im * step_im;
                w_im = w_re * step_im + w_im * step_re;
                w_re = next_re;
            }
        }

        len <<= 1;
    }
}

/// Hann window of the given length
pub fn hann_window(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let phase = 2.0 * PI * i as f64 / len as f64;
            0.5 * (1.0 - phase.cos())
        })
        .collect()
}
