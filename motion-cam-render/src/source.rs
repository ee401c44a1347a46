//! Image sequence frame source.

use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};

/// Decodes a directory of images, in file name order, into RGBA frames.
pub struct FrameSource {
    paths: std::vec::IntoIter<PathBuf>,
}

impl FrameSource {
    /// List all decodable images in `dir`.
    ///
    /// Files with extensions `image` does not recognise are skipped.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        let mut paths = std::fs::read_dir(dir)
            .with_context(|| format!("reading frames from {}", dir.display()))?
            .map(|e| e.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .filter(|p| p.is_file() && ImageFormat::from_path(p).is_ok())
            .collect::<Vec<_>>();

        paths.sort();

        Ok(Self {
            paths: paths.into_iter(),
        })
    }

    /// Number of frames left.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Iterator for FrameSource {
    type Item = Result<(PathBuf, RgbaImage)>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.next()?;
        let frame = image::open(&path)
            .with_context(|| format!("decoding {}", path.display()))
            .map(|img| img.to_rgba8());
        Some(frame.map(|f| (path, f)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn sorted_images_only() -> Result<()> {
        let tmp = tempdir()?;
        let dir = tmp.path();

        RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255])).save(dir.join("b.png"))?;
        RgbaImage::from_pixel(3, 2, Rgba([9, 9, 9, 255])).save(dir.join("a.png"))?;
        std::fs::write(dir.join("notes.txt"), "not a frame")?;

        let source = FrameSource::open(dir)?;
        assert_eq!(source.len(), 2);

        let frames = source.collect::<Result<Vec<_>>>()?;
        assert!(frames[0].0.ends_with("a.png"));
        assert_eq!(frames[0].1.get_pixel(0, 0).0, [9, 9, 9, 255]);
        assert_eq!(frames[1].1.dimensions(), (3, 2));
        assert_eq!(frames[1].1.as_raw().len(), 3 * 2 * 4);

        Ok(())
    }

    #[test]
    fn missing_dir() {
        assert!(FrameSource::open("/nonexistent/motion-cam/frames").is_err());
    }
}
