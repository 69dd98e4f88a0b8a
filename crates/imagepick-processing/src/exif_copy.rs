//! EXIF attribute copy
//!
//! Re-encoding an image drops its EXIF block, so after a successful
//! compression attempt the whitelisted attributes are carried over from the
//! source file. The whitelist covers capture parameters, GPS data and
//! orientation; derived attributes such as pixel dimensions are deliberately
//! left behind because they no longer describe the output.

use anyhow::{Context, Result};
use exif::experimental::Writer;
use exif::{In, Tag};
use img_parts::{jpeg::Jpeg, png::Png, webp::WebP, ImageEXIF};
use std::fs;
use std::io::{BufReader, Cursor};
use std::path::Path;

use crate::codec::ImageKind;

/// Attributes preserved across re-encoding
const COPIED_ATTRIBUTES: [Tag; 19] = [
    Tag::FNumber,
    Tag::ExposureTime,
    Tag::PhotographicSensitivity, // ISO speed ratings
    Tag::GPSAltitude,
    Tag::GPSAltitudeRef,
    Tag::FocalLength,
    Tag::GPSDateStamp,
    Tag::WhiteBalance,
    Tag::GPSProcessingMethod,
    Tag::GPSTimeStamp,
    Tag::DateTime,
    Tag::Flash,
    Tag::GPSLatitude,
    Tag::GPSLatitudeRef,
    Tag::GPSLongitude,
    Tag::GPSLongitudeRef,
    Tag::Make,
    Tag::Model,
    Tag::Orientation,
];

/// Copy the whitelisted EXIF attributes from `source` to `dest`.
///
/// Returns `false` when the source carries no EXIF data or none of the
/// whitelisted attributes; the destination is left untouched in that case.
pub fn copy_exif(source: &Path, dest: &Path) -> Result<bool> {
    let file = fs::File::open(source)
        .with_context(|| format!("cannot open {}", source.display()))?;
    let exif = match exif::Reader::new().read_from_container(&mut BufReader::new(file)) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(false),
        Err(e) => return Err(e).context("failed to parse EXIF data"),
    };

    let fields: Vec<&exif::Field> = exif
        .fields()
        .filter(|f| f.ifd_num == In::PRIMARY && COPIED_ATTRIBUTES.contains(&f.tag))
        .collect();
    if fields.is_empty() {
        return Ok(false);
    }

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut buf = Cursor::new(Vec::new());
    writer
        .write(&mut buf, false)
        .context("failed to serialize EXIF data")?;

    embed_exif(dest, buf.into_inner())?;
    Ok(true)
}

/// Write a raw EXIF block into the image container at `path`
fn embed_exif(path: &Path, raw: Vec<u8>) -> Result<()> {
    let data = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;

    let encoded = match ImageKind::from_path(path) {
        ImageKind::Jpeg => {
            let mut jpeg = Jpeg::from_bytes(data.into())?;
            jpeg.set_exif(Some(raw.into()));
            jpeg.encoder().bytes()
        }
        ImageKind::Png => {
            let mut png = Png::from_bytes(data.into())?;
            png.set_exif(Some(raw.into()));
            png.encoder().bytes()
        }
        ImageKind::WebP => {
            let mut webp = WebP::from_bytes(data.into())?;
            webp.set_exif(Some(raw.into()));
            webp.encoder().bytes()
        }
    };

    fs::write(path, &encoded).with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}
