//! Compression retry loop
//!
//! Walks the resolution ladder from large to small, re-encoding the source at
//! each target until the output satisfies the configured byte and resolution
//! constraints. Every attempt writes a fresh file and deletes the previous
//! attempt, so at most one candidate exists at a time. When the ladder runs
//! out, the last produced attempt is returned as the best achievable result.

use std::fs;
use std::path::{Path, PathBuf};

use imagepick_core::{file_util, PickError};

use crate::codec::{self, ImageKind};
use crate::exif_copy;
use crate::{ladder, resize};

/// Constraints the compressed output must satisfy
#[derive(Debug, Clone, Copy, Default)]
pub struct CompressionConstraints {
    /// Max width/height of the output
    pub max_resolution: Option<(u32, u32)>,
    /// Max byte size of the output
    pub max_file_size: Option<u64>,
}

impl CompressionConstraints {
    pub fn is_empty(&self) -> bool {
        self.max_resolution.is_none() && self.max_file_size.is_none()
    }
}

/// Ladder-search compressor
#[derive(Debug, Clone)]
pub struct Compressor {
    constraints: CompressionConstraints,
    save_dir: PathBuf,
}

impl Compressor {
    pub fn new(constraints: CompressionConstraints, save_dir: impl Into<PathBuf>) -> Self {
        Self {
            constraints,
            save_dir: save_dir.into(),
        }
    }

    pub fn constraints(&self) -> &CompressionConstraints {
        &self.constraints
    }

    /// Whether `file` violates any configured constraint. A compliant file
    /// must not be re-encoded at all.
    pub fn is_compression_required(&self, file: &Path) -> Result<bool, PickError> {
        if let Some(max_size) = self.constraints.max_file_size {
            if fs::metadata(file)?.len() > max_size {
                return Ok(true);
            }
        }
        if let Some((max_width, max_height)) = self.constraints.max_resolution {
            let (width, height) = codec::probe_dimensions(file)
                .map_err(|e| PickError::ImageProcessing(e.to_string()))?;
            return Ok(width > max_width || height > max_height);
        }
        Ok(false)
    }

    /// Bytes over the configured budget, `None` when within it or when no
    /// budget is set
    fn size_overshoot(&self, file: &Path) -> Result<Option<u64>, PickError> {
        let Some(max_size) = self.constraints.max_file_size else {
            return Ok(None);
        };
        let len = fs::metadata(file)?.len();
        Ok(len.checked_sub(max_size).filter(|diff| *diff > 0))
    }

    /// Run the ladder search on a background worker thread
    pub async fn compress(&self, source: PathBuf) -> Result<PathBuf, PickError> {
        let compressor = self.clone();
        tokio::task::spawn_blocking(move || compressor.run(&source))
            .await
            .map_err(|e| PickError::Internal(format!("compression worker failed: {}", e)))?
    }

    /// Run the ladder search on the calling thread
    pub fn run(&self, source: &Path) -> Result<PathBuf, PickError> {
        let mut best: Option<PathBuf> = None;
        let result = self.search(source, &mut best);
        if result.is_err() {
            if let Some(path) = &best {
                let _ = fs::remove_file(path);
            }
        }
        result
    }

    fn search(&self, source: &Path, best: &mut Option<PathBuf>) -> Result<PathBuf, PickError> {
        let mut attempt = 0usize;
        loop {
            let Some(output) = self.apply(source, attempt)? else {
                // Ladder exhausted: settle for the best attempt produced
                tracing::debug!(
                    attempts = attempt,
                    "resolution ladder exhausted, falling back to best attempt"
                );
                return best.take().ok_or(PickError::CompressionExhausted {
                    attempts: attempt as u32,
                });
            };

            if let Some(previous) = best.replace(output.clone()) {
                let _ = fs::remove_file(previous);
            }

            if !self.is_compression_required(&output)? {
                tracing::debug!(attempt, output = %output.display(), "compression satisfied constraints");
                return Ok(output);
            }

            attempt = ladder::next_attempt(attempt, self.size_overshoot(&output)?);
        }
    }

    /// Produce one attempt: decode, downscale to the ladder target, re-encode
    /// in the source's format and preserve its EXIF attributes. Returns `None`
    /// once the attempt index runs off the ladder.
    fn apply(&self, source: &Path, attempt: usize) -> Result<Option<PathBuf>, PickError> {
        let Some((max_width, max_height)) =
            ladder::target_for_attempt(attempt, self.constraints.max_resolution)
        else {
            return Ok(None);
        };

        let kind = ImageKind::from_path(source);
        tracing::debug!(attempt, max_width, max_height, format = ?kind, "applying compression");

        let img = codec::decode(source).map_err(|e| {
            PickError::ImageProcessing(format!("failed to decode {}: {}", source.display(), e))
        })?;
        let scaled = resize::scale_to_fit(&img, max_width, max_height);
        let data = codec::encode(&scaled, kind)
            .map_err(|e| PickError::ImageProcessing(format!("failed to encode image: {}", e)))?;

        let dest = file_util::image_file(&self.save_dir, kind.extension())?;
        fs::write(&dest, &data).map_err(|e| {
            PickError::FileCreationFailed(format!("cannot write {}: {}", dest.display(), e))
        })?;

        if let Err(e) = exif_copy::copy_exif(source, &dest) {
            tracing::warn!(error = %e, "failed to preserve EXIF data on compressed image");
        }

        Ok(Some(dest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    /// Deterministic high-frequency noise; JPEG and PNG both compress it
    /// poorly, which keeps file sizes predictable enough for budget tests.
    fn noise_image(width: u32, height: u32) -> DynamicImage {
        let mut state = 0x2545f491_u32;
        let mut img = RgbaImage::new(width, height);
        for pixel in img.pixels_mut() {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let [r, g, b, _] = state.to_le_bytes();
            *pixel = Rgba([r, g, b, 255]);
        }
        DynamicImage::ImageRgba8(img)
    }

    fn write_image(path: &Path, img: &DynamicImage) {
        let data = codec::encode(img, ImageKind::from_path(path)).unwrap();
        fs::write(path, data).unwrap();
    }

    fn count_files(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_compliant_source_needs_no_compression() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("small.jpg");
        write_image(&source, &noise_image(100, 80));

        let compressor = Compressor::new(
            CompressionConstraints {
                max_resolution: Some((1080, 1920)),
                max_file_size: Some(10 * 1024 * 1024),
            },
            dir.path(),
        );
        assert!(!compressor.is_compression_required(&source).unwrap());
    }

    #[test]
    fn test_resolution_violation_requires_compression() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("wide.jpg");
        write_image(&source, &noise_image(400, 300));

        // Within the byte budget but over the resolution limit
        let compressor = Compressor::new(
            CompressionConstraints {
                max_resolution: Some((200, 200)),
                max_file_size: Some(10 * 1024 * 1024),
            },
            dir.path(),
        );
        assert!(compressor.is_compression_required(&source).unwrap());
    }

    #[test]
    fn test_resolution_only_downscale() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");
        let source = dir.path().join("big.jpg");
        write_image(&source, &noise_image(400, 300));

        let compressor = Compressor::new(
            CompressionConstraints {
                max_resolution: Some((200, 200)),
                max_file_size: None,
            },
            &out_dir,
        );
        let output = compressor.run(&source).unwrap();

        let (width, height) = codec::probe_dimensions(&output).unwrap();
        assert!(width <= 200 && height <= 200);
        // Only the final attempt remains in the output directory
        assert_eq!(count_files(&out_dir), 1);
        // Source is untouched; the compressor does not own it
        assert!(source.exists());
    }

    #[test]
    fn test_byte_budget_is_met() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");
        let source = dir.path().join("noisy.png");
        write_image(&source, &noise_image(300, 300));

        let budget = 10 * 1024;
        let compressor = Compressor::new(
            CompressionConstraints {
                max_resolution: None,
                max_file_size: Some(budget),
            },
            &out_dir,
        );
        let output = compressor.run(&source).unwrap();

        assert!(fs::metadata(&output).unwrap().len() <= budget);
        // PNG input stays PNG
        assert_eq!(output.extension().unwrap(), "png");
        assert_eq!(count_files(&out_dir), 1);
    }

    #[test]
    fn test_unreachable_budget_falls_back_to_best_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");
        let source = dir.path().join("noisy.png");
        write_image(&source, &noise_image(300, 300));

        // No encoding of this image can reach 16 bytes; expect the smallest
        // ladder entry as the best effort
        let compressor = Compressor::new(
            CompressionConstraints {
                max_resolution: None,
                max_file_size: Some(16),
            },
            &out_dir,
        );
        let output = compressor.run(&source).unwrap();

        let (width, height) = codec::probe_dimensions(&output).unwrap();
        assert!(width <= 30 && height <= 40);
        assert!(fs::metadata(&output).unwrap().len() > 16);
        assert_eq!(count_files(&out_dir), 1);
    }

    #[test]
    fn test_attempts_never_increase_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");
        let source = dir.path().join("noisy.jpg");
        write_image(&source, &noise_image(500, 400));

        let compressor = Compressor::new(
            CompressionConstraints {
                max_resolution: None,
                max_file_size: Some(1),
            },
            &out_dir,
        );

        let mut previous_pixels = u64::MAX;
        let mut attempt = 0usize;
        while let Some(output) = compressor.apply(&source, attempt).unwrap() {
            let (width, height) = codec::probe_dimensions(&output).unwrap();
            let pixels = width as u64 * height as u64;
            assert!(pixels <= previous_pixels);
            previous_pixels = pixels;
            fs::remove_file(&output).unwrap();
            attempt += 1;
        }
        assert_eq!(attempt, ladder::RESOLUTION_LADDER.len());
    }

    #[test]
    fn test_budget_with_resolution_cap_converges() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");
        let source = dir.path().join("large.jpg");
        write_image(&source, &noise_image(1600, 1200));

        let budget = 60 * 1024;
        let compressor = Compressor::new(
            CompressionConstraints {
                max_resolution: Some((1080, 1920)),
                max_file_size: Some(budget),
            },
            &out_dir,
        );
        let output = compressor.run(&source).unwrap();

        let (width, height) = codec::probe_dimensions(&output).unwrap();
        assert!(width <= 1080 && height <= 1920);
        assert!(fs::metadata(&output).unwrap().len() <= budget);
        assert_eq!(count_files(&out_dir), 1);
    }

    #[test]
    fn test_exif_survives_compression() {
        use exif::experimental::Writer;
        use exif::{Field, In, Tag, Value};
        use std::io::{BufReader, Cursor};

        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");
        let source = dir.path().join("tagged.jpg");
        write_image(&source, &noise_image(400, 300));

        // Attach a Make attribute to the source
        let field = Field {
            tag: Tag::Make,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![b"TestCam".to_vec()]),
        };
        let mut writer = Writer::new();
        writer.push_field(&field);
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false).unwrap();
        let mut jpeg = img_parts::jpeg::Jpeg::from_bytes(fs::read(&source).unwrap().into()).unwrap();
        use img_parts::ImageEXIF;
        jpeg.set_exif(Some(buf.into_inner().into()));
        fs::write(&source, jpeg.encoder().bytes()).unwrap();

        let compressor = Compressor::new(
            CompressionConstraints {
                max_resolution: Some((200, 200)),
                max_file_size: None,
            },
            &out_dir,
        );
        let output = compressor.run(&source).unwrap();

        let file = fs::File::open(&output).unwrap();
        let exif = exif::Reader::new()
            .read_from_container(&mut BufReader::new(file))
            .unwrap();
        let make = exif.get_field(Tag::Make, In::PRIMARY).unwrap();
        assert!(make.display_value().to_string().contains("TestCam"));
    }

    #[tokio::test]
    async fn test_async_compress() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");
        let source = dir.path().join("big.jpg");
        write_image(&source, &noise_image(400, 300));

        let compressor = Compressor::new(
            CompressionConstraints {
                max_resolution: Some((100, 100)),
                max_file_size: None,
            },
            &out_dir,
        );
        let output = compressor.compress(source).await.unwrap();
        let (width, height) = codec::probe_dimensions(&output).unwrap();
        assert!(width <= 100 && height <= 100);
    }
}
