//! Animated GIF output for field previews

use crate::output::OutputError;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::io::Write;

/// Streams frames into an animated GIF as they are rendered.
///
/// Frames are written one at a time so long previews never hold every frame
/// in memory.
pub struct GifWriter<W: Write> {
    encoder: GifEncoder<W>,
    delay: Delay,
    frames: usize,
}

impl<W: Write> GifWriter<W> {
    /// Start a looping GIF on `sink` with `frame_ms` per frame.
    ///
    /// GIF delays are stored in centiseconds; anything under 10ms is
    /// rounded up to one centisecond.
    pub fn new(sink: W, frame_ms: u32) -> Result<Self, OutputError> {
        let mut encoder = GifEncoder::new(sink);
        encoder.set_repeat(Repeat::Infinite)?;

        let delay_cs = (frame_ms / 10).max(1);
        let delay = Delay::from_numer_denom_ms(delay_cs * 10, 1);
        Ok(Self { encoder, delay, frames: 0 })
    }

    pub fn push(&mut self, image: &RgbaImage) -> Result<(), OutputError> {
        let frame = Frame::from_parts(image.clone(), 0, 0, self.delay);
        self.encoder.encode_frame(frame)?;
        self.frames += 1;
        Ok(())
    }

    /// Frames written so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// End the animation and return the frame count.
    ///
    /// The encoder writes the GIF trailer when it is dropped and cannot report
    /// a failure there. Hand in a buffered sink and flush it after `finish` so
    /// write errors surface at the flush.
    pub fn finish(self) -> usize {
        let frames = self.frames;
        drop(self.encoder);
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::io;

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(width, height, color)
    }

    /// Sink that rejects every write.
    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn test_finish_writes_complete_gif() {
        let mut bytes = Vec::new();
        let mut writer = GifWriter::new(&mut bytes, 16).unwrap();
        writer.push(&solid(4, 4, Rgba([124, 58, 237, 255]))).unwrap();
        writer.push(&solid(4, 4, Rgba([6, 182, 212, 255]))).unwrap();
        assert_eq!(writer.finish(), 2);

        assert_eq!(&bytes[..6], b"GIF89a");
        assert_eq!(bytes.last(), Some(&0x3B), "missing GIF trailer");
        assert!(image::load_from_memory(&bytes).is_ok());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let result = GifWriter::new(BrokenSink, 16)
            .and_then(|mut writer| writer.push(&solid(2, 2, Rgba([0, 0, 0, 255]))));
        assert!(result.is_err());
    }
}
