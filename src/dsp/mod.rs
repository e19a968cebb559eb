//! Signal processing primitives.

mod convolve;
mod stats;

pub use convolve::{ConvolveMode, fft_convolve};
pub use stats::{mean, std_dev};
