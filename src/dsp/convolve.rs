//! Linear convolution via FFT.

use rustfft::{FftPlanner, num_complex::Complex};

/// Which part of the full linear convolution to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvolveMode {
    /// Every output sample, length `n + k - 1`.
    Full,
    /// Centered on the signal, length `n`.
    Same,
    /// Only samples computed without zero padding, length `max(n, k) - min(n, k) + 1`.
    Valid,
}

impl ConvolveMode {
    /// Offset and length of the returned slice within the full convolution.
    fn window(self, signal_len: usize, kernel_len: usize) -> (usize, usize) {
        match self {
            Self::Full => (0, signal_len + kernel_len - 1),
            Self::Same => ((kernel_len - 1) / 2, signal_len),
            Self::Valid => {
                let (short, long) = if signal_len < kernel_len {
                    (signal_len, kernel_len)
                } else {
                    (kernel_len, signal_len)
                };
                (short - 1, long - short + 1)
            }
        }
    }
}

/// Convolve `signal` with `kernel` in the frequency domain.
///
/// Both inputs are zero-padded to the next power of two at or above the
/// full output length, so the cost is `O((n + k) log(n + k))` regardless of
/// kernel size. Returns an empty vector when either input is empty.
pub fn fft_convolve(signal: &[f64], kernel: &[f64], mode: ConvolveMode) -> Vec<f64> {
    if signal.is_empty() || kernel.is_empty() {
        return Vec::new();
    }

    let full_len = signal.len() + kernel.len() - 1;
    let fft_len = full_len.next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(fft_len);
    let inverse = planner.plan_fft_inverse(fft_len);

    let mut spectrum = padded(signal, fft_len);
    let mut kernel_spectrum = padded(kernel, fft_len);
    forward.process(&mut spectrum);
    forward.process(&mut kernel_spectrum);

    for (s, k) in spectrum.iter_mut().zip(&kernel_spectrum) {
        *s *= *k;
    }
    inverse.process(&mut spectrum);

    // rustfft leaves the inverse unnormalized
    #[allow(clippy::cast_precision_loss)]
    let scale = 1.0 / fft_len as f64;

    let (start, len) = mode.window(signal.len(), kernel.len());
    spectrum[start..start + len]
        .iter()
        .map(|c| c.re * scale)
        .collect()
}

fn padded(samples: &[f64], len: usize) -> Vec<Complex<f64>> {
    let mut buffer: Vec<Complex<f64>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    buffer.resize(len, Complex::new(0.0, 0.0));
    buffer
}
