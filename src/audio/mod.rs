pub mod decoder;
pub mod resample;

pub use resample::ResampleMode;
