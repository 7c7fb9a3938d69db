//! Animated-GIF video sink.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::{self, FilterType};
use image::{Delay, Frame, Rgba, RgbaImage};
use tracing::{debug, warn};

use sw_core::Tick;
use sw_sim::Snapshot;

use crate::{FrameAdapter, OutputError, OutputResult, Sink};

const DEFAULT_FRAME_DELAY_MS: u32 = 100;

/// Encodes one frame per tick into an animated GIF.
///
/// The file is created by [`new`][Self::new], before the run starts.
/// [`finish`][Sink::finish] writes the trailer; a run that produced no frames
/// still gets one blank frame so the file is a valid GIF.  Dropping the sink
/// finishes it too.
pub struct VideoSink {
    path:     PathBuf,
    encoder:  Option<GifEncoder<BufWriter<File>>>,
    adapter:  FrameAdapter,
    scale:    u32,
    delay_ms: u32,
    frames:   usize,
}

impl VideoSink {
    pub fn new(path: &Path, adapter: FrameAdapter) -> OutputResult<Self> {
        let mut encoder = GifEncoder::new(BufWriter::new(File::create(path)?));
        encoder.set_repeat(Repeat::Infinite)?;
        Ok(Self {
            path: path.to_path_buf(),
            encoder: Some(encoder),
            adapter,
            scale: 1,
            delay_ms: DEFAULT_FRAME_DELAY_MS,
            frames: 0,
        })
    }

    /// Enlarge each grid cell to `scale × scale` pixels.
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.max(1);
        self
    }

    /// Show each frame for `delay_ms`; GIF stores delays in 10 ms steps.
    pub fn with_frame_delay_ms(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    fn encode(&mut self, img: RgbaImage) -> OutputResult<()> {
        let img = if self.scale > 1 {
            imageops::resize(&img, img.width() * self.scale, img.height() * self.scale, FilterType::Nearest)
        } else {
            img
        };
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| OutputError::Shape(format!("{}: frame after finish", self.path.display())))?;
        encoder.encode_frame(Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(self.delay_ms, 1)))?;
        self.frames += 1;
        Ok(())
    }
}

impl Sink for VideoSink {
    fn accept(&mut self, tick: Tick, snapshot: &Snapshot) -> OutputResult<()> {
        let Snapshot::Grid(grid) = snapshot else {
            return Err(OutputError::Shape("video expects a grid snapshot".into()));
        };
        let img = self.adapter.render(grid)?;
        self.encode(img)?;
        debug!(path = %self.path.display(), tick = %tick, "video frame");
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.encoder.is_none() {
            return Ok(());
        }
        if self.frames == 0 {
            self.encode(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255])))?;
        }
        // The GIF trailer is written when the encoder is dropped.
        drop(self.encoder.take());
        debug!(path = %self.path.display(), frames = self.frames, "video finished");
        Ok(())
    }
}

impl Drop for VideoSink {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            warn!(path = %self.path.display(), error = %e, "failed to finish video");
        }
    }
}
