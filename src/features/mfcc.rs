use anyhow::{ensure, Context, Result};
use aus::analysis;
use aus::analysis::mel::MelFilterbank;
use aus::spectrum;
use aus::WindowType;
use ndarray::{Array1, Array2, Axis};

const MIN_FREQ: f64 = 0.0;
const POWER_FLOOR: f64 = 1e-10;

/// Frame layout for the short-time analysis.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameParams {
    pub sample_rate: u32,
    pub fft_size: usize,
    pub hop_size: usize,
    pub mel_bands: usize,
    pub n_mfcc: usize,
}

/// Compute the MFCC matrix with shape `(frames, n_mfcc)`.
///
/// Waveforms shorter than one analysis window are zero-padded to a single
/// frame so any non-empty input yields at least one row.
pub(crate) fn mfcc_matrix(samples: &[f32], params: FrameParams) -> Result<Array2<f32>> {
    ensure!(!samples.is_empty(), "cannot compute MFCCs of empty audio");

    let mut audio: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
    if audio.len() < params.fft_size {
        audio.resize(params.fft_size, 0.0);
    }

    let stft = spectrum::rstft(&audio, params.fft_size, params.hop_size, WindowType::Hanning);
    let (magnitude, _) = spectrum::complex_to_polar_rstft(&stft);
    let mut power = analysis::make_power_spectrogram(&magnitude);
    for frame in power.iter_mut() {
        for bin in frame.iter_mut() {
            *bin = bin.max(POWER_FLOOR);
        }
    }

    let freqs = spectrum::rfftfreq(params.fft_size, params.sample_rate);
    let filterbank = MelFilterbank::new(
        MIN_FREQ,
        (params.sample_rate as f64) / 2.0,
        params.mel_bands,
        &freqs,
        true,
    );
    let mel = analysis::mel::make_mel_spectrogram(&power, &filterbank);
    let mfcc = analysis::mel::mfcc_spectrogram(&mel, params.n_mfcc, None);

    let matrix = array_from_vec2(&mfcc).context("MFCC frames have inconsistent widths")?;
    ensure!(
        matrix.len_of(Axis(0)) > 0,
        "audio produced no analysis frames"
    );
    ensure!(
        matrix.len_of(Axis(1)) == params.n_mfcc,
        "expected {} coefficients per frame, got {}",
        params.n_mfcc,
        matrix.len_of(Axis(1))
    );
    Ok(matrix)
}

/// Average each coefficient across time frames.
pub(crate) fn time_mean(matrix: &Array2<f32>) -> Result<Array1<f32>> {
    matrix
        .mean_axis(Axis(0))
        .context("cannot average an MFCC matrix with no frames")
}

fn array_from_vec2(data: &[Vec<f64>]) -> Result<Array2<f32>> {
    let rows = data.len();
    let cols = data.first().map_or(0, Vec::len);
    let mut flat = Vec::with_capacity(rows * cols);
    for row in data {
        ensure!(row.len() == cols, "row width {} != {}", row.len(), cols);
        flat.extend(row.iter().map(|v| *v as f32));
    }
    Ok(Array2::from_shape_vec((rows, cols), flat)?)
}
