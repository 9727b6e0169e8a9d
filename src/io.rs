//! Image decode/encode and directory listing helpers built on the `image`
//! crate.

use crate::util::{FrameMatchError, FrameMatchResult};
use image::{DynamicImage, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};

/// Decodes the image at `path`, guessing the format from its contents.
pub fn decode_image<P: AsRef<Path>>(path: P) -> FrameMatchResult<DynamicImage> {
    let path = path.as_ref();
    let reader = image::ImageReader::open(path)
        .map_err(|err| FrameMatchError::io(path, err))?
        .with_guessed_format()
        .map_err(|err| FrameMatchError::io(path, err))?;
    reader
        .decode()
        .map_err(|err| FrameMatchError::image_io(path, err))
}

/// Encodes `img` to `path`; the format follows the file extension.
pub fn encode_image<P: AsRef<Path>>(img: &RgbImage, path: P) -> FrameMatchResult<()> {
    let path = path.as_ref();
    img.save(path)
        .map_err(|err| FrameMatchError::image_io(path, err))
}

/// Whether the final component of `path` starts with a dot.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Regular files directly inside `dir`, sorted by path.
pub fn list_files<P: AsRef<Path>>(dir: P) -> FrameMatchResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(FrameMatchError::MissingDirectory(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|err| FrameMatchError::io(dir, err))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| FrameMatchError::io(dir, err))?;
        let file_type = entry
            .file_type()
            .map_err(|err| FrameMatchError::io(entry.path(), err))?;
        if file_type.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
