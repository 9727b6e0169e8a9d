//! Line format of a frame collection file.
//!
//! One frame per line, candidates as bracketed tuples joined by commas:
//! `[path,percentage,scale,originX,originY],[...]`. Floats use the shortest
//! representation that parses back to the same value.

use crate::frames::{FrameData, MatchData};
use crate::util::{FrameMatchError, FrameMatchResult};
use std::str::FromStr;

const SEPARATOR: &str = "],[";

fn format_match(data: &MatchData) -> FrameMatchResult<String> {
    let path = data
        .path
        .to_str()
        .filter(|path| !path.is_empty() && !path.contains('\n') && !path.contains(SEPARATOR))
        .ok_or(FrameMatchError::InvalidInput(
            "frame paths must be UTF-8 without line breaks",
        ))?;
    Ok(format!(
        "[{},{},{},{},{}]",
        path, data.percentage, data.scale, data.origin_x, data.origin_y
    ))
}

/// Formats one frame without the trailing newline.
pub(crate) fn format_frame(frame: &FrameData) -> FrameMatchResult<String> {
    let parts = frame
        .matches()
        .iter()
        .map(format_match)
        .collect::<FrameMatchResult<Vec<_>>>()?;
    Ok(parts.join(","))
}

fn parse_field<T: FromStr>(value: &str, name: &str, line: usize) -> FrameMatchResult<T> {
    value.parse().map_err(|_| FrameMatchError::FrameFormat {
        line,
        reason: format!("invalid {name} `{value}`"),
    })
}

fn parse_match(tuple: &str, line: usize) -> FrameMatchResult<MatchData> {
    // The path is the only field that may itself contain commas.
    let fields: Vec<&str> = tuple.rsplitn(5, ',').collect();
    if fields.len() != 5 || fields[4].is_empty() {
        return Err(FrameMatchError::FrameFormat {
            line,
            reason: format!("malformed match `{tuple}`"),
        });
    }
    Ok(MatchData {
        path: fields[4].into(),
        percentage: parse_field(fields[3], "percentage", line)?,
        scale: parse_field(fields[2], "scale", line)?,
        origin_x: parse_field(fields[1], "origin x", line)?,
        origin_y: parse_field(fields[0], "origin y", line)?,
    })
}

/// Parses one frame line; an empty line is a frame with no candidates.
pub(crate) fn parse_frame(text: &str, line: usize) -> FrameMatchResult<FrameData> {
    let text = text.trim_end_matches('\r');
    if text.is_empty() {
        return Ok(FrameData::default());
    }
    let inner = text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| FrameMatchError::FrameFormat {
            line,
            reason: "expected bracketed matches".to_string(),
        })?;
    let matches = inner
        .split(SEPARATOR)
        .map(|tuple| parse_match(tuple, line))
        .collect::<FrameMatchResult<Vec<_>>>()?;
    Ok(FrameData::from_ranked(matches))
}

pub(crate) fn format_collection(frames: &[FrameData]) -> FrameMatchResult<String> {
    let mut out = String::new();
    for frame in frames {
        out.push_str(&format_frame(frame)?);
        out.push('\n');
    }
    Ok(out)
}

pub(crate) fn parse_collection(text: &str) -> FrameMatchResult<Vec<FrameData>> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| parse_frame(line, idx + 1))
        .collect()
}
