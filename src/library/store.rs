//! Line format of the `.store` file.
//!
//! One image per line, fourteen comma-separated fields:
//! `path,width,height,bitLength,hexEdges,mode,blurSize,sigmaX,sigmaY,`
//! `threshold1,threshold2,binaryThreshold,joinByX,joinByY`.

use crate::edged::EdgedImage;
use crate::edges::{BlurParams, DetectionMode, DetectionSettings};
use crate::mask::EdgeMask;
use crate::util::math::height_for_width;
use crate::util::{FrameMatchError, FrameMatchResult};
use std::str::FromStr;

const FIELD_COUNT: usize = 14;

/// Whether `path` can be written as the first field of a store line.
pub(crate) fn representable(path: &str) -> bool {
    !path.is_empty() && !path.contains([',', '\n', '\r'])
}

/// Formats one image as a store line without the trailing newline.
pub(crate) fn format_line(image: &EdgedImage) -> FrameMatchResult<String> {
    let path = image
        .path()
        .to_str()
        .filter(|path| representable(path))
        .ok_or(FrameMatchError::InvalidInput(
            "store paths must be UTF-8 without commas or line breaks",
        ))?;
    let edges = image.edges();
    let s = image.settings();
    Ok(format!(
        "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
        path,
        image.width(),
        image.height(),
        edges.len(),
        edges.to_hex(),
        s.mode.code(),
        s.blur.size,
        s.blur.sigma_x,
        s.blur.sigma_y,
        s.threshold1,
        s.threshold2,
        s.binary_threshold,
        s.join_by_x,
        s.join_by_y,
    ))
}

fn parse_field<T: FromStr>(value: &str, name: &str, line: usize) -> FrameMatchResult<T> {
    value.parse().map_err(|_| FrameMatchError::StoreFormat {
        line,
        reason: format!("invalid {name} `{value}`"),
    })
}

/// Parses a store line; `line` is the 1-based line number used in errors.
pub(crate) fn parse_line(
    text: &str,
    line: usize,
    stored_width: usize,
) -> FrameMatchResult<EdgedImage> {
    let fields: Vec<&str> = text.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(FrameMatchError::StoreFormat {
            line,
            reason: format!("expected {FIELD_COUNT} fields, found {}", fields.len()),
        });
    }
    let format_err = |err: FrameMatchError| FrameMatchError::StoreFormat {
        line,
        reason: err.to_string(),
    };

    let path = fields[0];
    if path.is_empty() {
        return Err(FrameMatchError::StoreFormat {
            line,
            reason: "empty path".to_string(),
        });
    }
    let width: u32 = parse_field(fields[1], "width", line)?;
    let height: u32 = parse_field(fields[2], "height", line)?;
    let bit_len: usize = parse_field(fields[3], "bit length", line)?;
    let expected_len = stored_width.checked_mul(height_for_width(width, height, stored_width));
    if expected_len != Some(bit_len) {
        return Err(FrameMatchError::StoreFormat {
            line,
            reason: format!("bit length {bit_len} does not fit a {width}x{height} photo"),
        });
    }
    let edges = EdgeMask::from_hex(fields[4], bit_len, stored_width).map_err(format_err)?;
    let code: u8 = parse_field(fields[5], "detection mode", line)?;
    let mode = DetectionMode::from_code(code).ok_or_else(|| FrameMatchError::StoreFormat {
        line,
        reason: format!("unknown detection mode {code}"),
    })?;
    let settings = DetectionSettings {
        mode,
        blur: BlurParams {
            size: parse_field(fields[6], "blur size", line)?,
            sigma_x: parse_field(fields[7], "sigma x", line)?,
            sigma_y: parse_field(fields[8], "sigma y", line)?,
        },
        threshold1: parse_field(fields[9], "threshold 1", line)?,
        threshold2: parse_field(fields[10], "threshold 2", line)?,
        binary_threshold: parse_field(fields[11], "binary threshold", line)?,
        join_by_x: parse_field(fields[12], "join by x", line)?,
        join_by_y: parse_field(fields[13], "join by y", line)?,
    };

    EdgedImage::new(path, width, height, edges, settings).map_err(format_err)
}

/// Serialises every image, one line each.
pub(crate) fn format_store(images: &[EdgedImage]) -> FrameMatchResult<String> {
    let mut out = String::new();
    for image in images {
        out.push_str(&format_line(image)?);
        out.push('\n');
    }
    Ok(out)
}

/// Parses a whole store file. Blank lines are ignored.
pub(crate) fn parse_store(text: &str, stored_width: usize) -> FrameMatchResult<Vec<EdgedImage>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_line(line.trim_end_matches('\r'), idx + 1, stored_width))
        .collect()
}
