#![allow(dead_code)]

use std::f32::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};

/// Write a 16-bit PCM tone with a little deterministic noise on top.
pub fn write_tone(path: &Path, sample_rate: u32, channels: u16, seconds: f32, frequency: f32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    let frames = (sample_rate as f32 * seconds) as usize;
    let mut state = 0x9e37_79b9_u32;
    for i in 0..frames {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let noise = (state as f32 / u32::MAX as f32) - 0.5;
        let t = i as f32 / sample_rate as f32;
        let value = 0.5 * (2.0 * PI * frequency * t).sin() + 0.05 * noise;
        let sample = (value.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(sample).unwrap();
        }
    }
    writer.finalize().unwrap();
}

/// Short mono recording at 22.05 kHz.
pub fn write_clip(path: &Path) {
    write_tone(path, 22_050, 1, 0.4, 330.0);
}

/// File with an audio extension whose bytes are not audio.
pub fn write_garbage(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"this is not a RIFF file at all").unwrap();
}

/// Valid header cut off partway through.
pub fn write_truncated(path: &Path) {
    write_clip(path);
    let bytes = fs::read(path).unwrap();
    fs::write(path, &bytes[..20]).unwrap();
}

/// Lay out `names` under `root/actor` and return their paths.
pub fn actor_files(root: &Path, actor: &str, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = root.join(actor).join(name);
            write_clip(&path);
            path
        })
        .collect()
}
