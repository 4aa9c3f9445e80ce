//! Synthetic MP3 files for tests

use crate::{
    audio_file::AudioFile,
    id3::{TagLayout, frame::write_frame, header::Header, text},
};
use std::{path::PathBuf, time::Duration};

/// An MPEG-1 Layer III frame header: 128 kbit/s, 44.1 kHz, joint stereo, no CRC
const FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];

/// 144 * 128000 / 44100, rounded down (no padding)
const FRAME_LEN: usize = 417;

/// A run of identical, silent MPEG frames
pub fn mpeg_frames(count: usize) -> Vec<u8> {
    let mut frame = vec![0; FRAME_LEN];
    frame[..4].copy_from_slice(&FRAME_HEADER);
    frame.repeat(count)
}

/// An ID3v2.3 tag with just a title, followed by some padding
pub fn id3v2_tag(title: &str) -> Vec<u8> {
    let mut frames = Vec::new();
    write_frame(&mut frames, b"TIT2", &text::encode(title), 3).unwrap();
    frames.extend_from_slice(&[0; 64]);

    let mut bytes = Header::new(3, frames.len() as u32)
        .to_bytes()
        .unwrap()
        .to_vec();
    bytes.extend(frames);
    bytes
}

/// An ID3v1 tag with just a title
pub fn id3v1_tag(title: &str) -> [u8; 128] {
    let mut bytes = [0; 128];
    bytes[..3].copy_from_slice(b"TAG");

    let title = &title.as_bytes()[..title.len().min(30)];
    bytes[3..3 + title.len()].copy_from_slice(title);
    bytes[127] = 0xFF; // No genre

    bytes
}

/// An [`AudioFile`] that doesn't exist on disk
pub fn audio_file(path: &str, title: &str, duration: Duration) -> AudioFile {
    AudioFile {
        path: PathBuf::from(path),
        size: 0,
        duration,
        title: title.to_owned(),
        layout: TagLayout::default(),
    }
}
