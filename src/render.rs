//! Writing finished fields out as images.

use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb};
use tracing::info;

use crate::error::RenderError;

/// Persists a row-major RGB pixel buffer under a name.
pub trait Renderer {
    fn render(&self, name: &str, width: usize, height: usize, pixels: &[[u8; 3]]) -> Result<PathBuf, RenderError>;
}

/// Saves `<output_dir>/<name>.png`.
#[derive(Clone, Debug)]
pub struct PngRenderer {
    output_dir: PathBuf,
}

impl PngRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Renderer for PngRenderer {
    fn render(&self, name: &str, width: usize, height: usize, pixels: &[[u8; 3]]) -> Result<PathBuf, RenderError> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(RenderError::PixelCount {
                expected,
                actual: pixels.len(),
            });
        }

        std::fs::create_dir_all(&self.output_dir).map_err(|source| RenderError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let img = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
            Rgb(pixels[y as usize * width + x as usize])
        });

        let path = self.output_dir.join(format!("{}.png", name));
        img.save(&path).map_err(|source| RenderError::Save {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "saved {}x{} image", width, height);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("map_generator_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_png_renderer_writes_pixels() {
        let dir = scratch_dir("render");
        let renderer = PngRenderer::new(&dir);
        let pixels = vec![[0, 0, 0], [255, 0, 255], [10, 20, 30], [255, 255, 255], [1, 2, 3], [4, 5, 6]];
        let path = renderer.render("tiny", 3, 2, &pixels).unwrap();
        assert_eq!(path, dir.join("tiny.png"));

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(1, 0), &Rgb([255, 0, 255]));
        assert_eq!(img.get_pixel(0, 1), &Rgb([255, 255, 255]));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_png_renderer_rejects_short_buffer() {
        let renderer = PngRenderer::new(scratch_dir("short"));
        let err = renderer.render("bad", 2, 2, &[[0, 0, 0]; 3]).unwrap_err();
        assert!(matches!(err, RenderError::PixelCount { expected: 4, actual: 3 }));
    }
}
