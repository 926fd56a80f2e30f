//! RGBA frames handed to the provider.
//!
//! The frame source lends an [`ImageData`] view; the session copies it into
//! one reusable [`Frame`] (the scratch buffer) whose allocation is kept
//! across submissions.

use thiserror::Error;

/// Bytes per pixel (RGBA).
pub const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame has zero area ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("expected {expected} RGBA bytes for {width}x{height}, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Borrowed RGBA pixels from the frame source.
#[derive(Debug, Clone, Copy)]
pub struct ImageData<'a> {
    pub width: u32,
    pub height: u32,
    pub rgba: &'a [u8],
}

impl<'a> ImageData<'a> {
    pub fn new(width: u32, height: u32, rgba: &'a [u8]) -> Self {
        Self {
            width,
            height,
            rgba,
        }
    }
}

/// Owned RGBA pixel buffer, overwritten on every submission.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `image` into this buffer, resizing it as needed.
    ///
    /// On error the previous contents are left untouched.
    pub fn put_image(&mut self, image: &ImageData<'_>) -> Result<(), FrameError> {
        let (width, height) = (image.width, image.height);
        if width == 0 || height == 0 {
            return Err(FrameError::Empty { width, height });
        }
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if image.rgba.len() != expected {
            return Err(FrameError::SizeMismatch {
                width,
                height,
                expected,
                actual: image.rgba.len(),
            });
        }

        self.data.clear();
        self.data.extend_from_slice(image.rgba);
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes currently reserved, kept across submissions.
    pub fn allocated(&self) -> usize {
        self.data.capacity()
    }
}
