//! Wallpaper blending.
//!
//! `ImageBlender` alpha-composites two wallpapers at a given ratio. The
//! sources are decoded to RGBA, resampled onto the elementwise-max canvas of
//! the two, interpolated per channel, and flattened to an opaque RGB result
//! for the cache file format (no transparency is persisted).

pub mod cache;

pub use cache::{BlendCache, CacheEntry};

use std::path::Path;

use anyhow::{Context, Result, bail};
use image::imageops::FilterType;
use image::{RgbImage, RgbaImage};

use crate::logger::Log;

/// Stateless blending of two wallpaper files.
pub struct ImageBlender {
    log: Log,
}

impl ImageBlender {
    pub fn new(log: Log) -> Self {
        Self { log }
    }

    /// Blend `from` toward `to` at `ratio` (0.0 = all `from`, 1.0 = all
    /// `to`). Deterministic given identical inputs.
    ///
    /// Rejects ratios outside `[0.0, 1.0]` as an invalid argument.
    pub fn blend(&self, from: &Path, to: &Path, ratio: f32) -> Result<RgbImage> {
        if !(0.0..=1.0).contains(&ratio) {
            bail!("Blend ratio must be between 0.0 and 1.0, got {ratio}");
        }

        self.log.debug(format!(
            "Blending {} -> {} at ratio {ratio:.2}",
            from.display(),
            to.display()
        ));

        let a = image::open(from)
            .with_context(|| format!("Failed to open wallpaper {}", from.display()))?
            .to_rgba8();
        let b = image::open(to)
            .with_context(|| format!("Failed to open wallpaper {}", to.display()))?
            .to_rgba8();

        // Canvas is the larger common size; mismatched sources are resampled
        // up to it so resolutions never blend against each other.
        let width = a.width().max(b.width());
        let height = a.height().max(b.height());
        let a = self.fit_to_canvas(a, width, height, from);
        let b = self.fit_to_canvas(b, width, height, to);

        let inverse = 1.0 - ratio;
        let mut out = RgbImage::new(width, height);
        for (dst, (pa, pb)) in out.pixels_mut().zip(a.pixels().zip(b.pixels())) {
            for channel in 0..3 {
                let blended = pa.0[channel] as f32 * inverse + pb.0[channel] as f32 * ratio;
                dst.0[channel] = blended.round() as u8;
            }
        }

        Ok(out)
    }

    fn fit_to_canvas(&self, img: RgbaImage, width: u32, height: u32, source: &Path) -> RgbaImage {
        if img.width() == width && img.height() == height {
            return img;
        }
        self.log.debug(format!(
            "Resizing {} from {}x{} to {width}x{height}",
            source.display(),
            img.width(),
            img.height()
        ));
        image::imageops::resize(&img, width, height, FilterType::Lanczos3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn quiet_log() -> Log {
        let log = Log::new(false);
        log.set_enabled(false);
        log
    }

    fn write_png(dir: &Path, name: &str, pixel: [u8; 4], width: u32, height: u32) -> std::path::PathBuf {
        let img = RgbaImage::from_pixel(width, height, image::Rgba(pixel));
        let path = dir.join(name);
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn rejects_out_of_range_ratio() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_png(dir.path(), "a.png", [10, 20, 30, 255], 2, 2);
        let b = write_png(dir.path(), "b.png", [200, 100, 50, 255], 2, 2);
        let blender = ImageBlender::new(quiet_log());
        assert!(blender.blend(&a, &b, -0.01).is_err());
        assert!(blender.blend(&a, &b, 1.01).is_err());
    }

    #[test]
    fn blends_solid_colors_linearly() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_png(dir.path(), "a.png", [0, 0, 0, 255], 4, 4);
        let b = write_png(dir.path(), "b.png", [200, 100, 60, 255], 4, 4);
        let blender = ImageBlender::new(quiet_log());
        let out = blender.blend(&a, &b, 0.5).unwrap();
        let px = out.get_pixel(0, 0);
        assert_eq!(px.0, [100, 50, 30]);
    }

    #[test]
    fn mismatched_sizes_land_on_the_larger_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_png(dir.path(), "a.png", [255, 255, 255, 255], 8, 2);
        let b = write_png(dir.path(), "b.png", [0, 0, 0, 255], 4, 6);
        let blender = ImageBlender::new(quiet_log());
        let out = blender.blend(&a, &b, 0.0).unwrap();
        assert_eq!((out.width(), out.height()), (8, 6));
    }

    #[test]
    fn rejects_unreadable_source() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        let mut f = std::fs::File::create(&a).unwrap();
        f.write_all(b"not an image").unwrap();
        let b = write_png(dir.path(), "b.png", [1, 2, 3, 255], 2, 2);
        let blender = ImageBlender::new(quiet_log());
        assert!(blender.blend(&a, &b, 0.5).is_err());
    }
}
