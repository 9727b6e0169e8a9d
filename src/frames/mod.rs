//! Ordered animation frames, each holding a ranked snapshot of candidate
//! photos.
//!
//! Which photo a frame finally uses is resolved greedily in frame order: a
//! frame takes its highest-ranked candidate not already taken by an earlier
//! frame. Earlier choices are never revisited. Resolutions and rendered
//! frames are cached by frame index and dropped on every mutation.

mod format;
mod render;

use crate::config::RenderConfig;
use crate::io::{decode_image, encode_image};
use crate::search::ImageMatch;
use crate::trace::{trace_event, trace_span};
use crate::util::{FrameMatchError, FrameMatchResult};
use image::RgbImage;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of a named collection inside its directory.
pub const FRAME_DATA_FILE: &str = ".frame-data";

/// A candidate photo and its placement, as persisted per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchData {
    pub path: PathBuf,
    pub percentage: f32,
    pub scale: f32,
    pub origin_x: i32,
    pub origin_y: i32,
}

impl MatchData {
    pub fn new(path: impl Into<PathBuf>, placement: &ImageMatch) -> Self {
        Self {
            path: path.into(),
            percentage: placement.percentage,
            scale: placement.scale,
            origin_x: placement.origin_x,
            origin_y: placement.origin_y,
        }
    }

    pub fn placement(&self) -> ImageMatch {
        ImageMatch {
            percentage: self.percentage,
            scale: self.scale,
            origin_x: self.origin_x,
            origin_y: self.origin_y,
        }
    }
}

/// Ranked candidates of one frame, best first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameData {
    matches: Vec<MatchData>,
}

impl FrameData {
    /// Keeps `matches` in the given order.
    pub fn from_ranked(matches: Vec<MatchData>) -> Self {
        Self { matches }
    }

    pub fn matches(&self) -> &[MatchData] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.matches.iter().any(|m| m.path == path)
    }
}

/// Frame sequence with lazily resolved assignments and rendered images.
#[derive(Debug, Default)]
pub struct FrameCollection {
    frames: Vec<FrameData>,
    render: RenderConfig,
    /// `None` until resolved; `Some(None)` when every candidate is taken.
    assigned: Vec<Option<Option<usize>>>,
    rendered: Vec<Option<RgbImage>>,
    photos: HashMap<PathBuf, RgbImage>,
}

impl FrameCollection {
    pub fn new(render: RenderConfig) -> Self {
        Self {
            render,
            ..Self::default()
        }
    }

    fn from_frames(frames: Vec<FrameData>, render: RenderConfig) -> Self {
        let mut collection = Self::new(render);
        collection.frames = frames;
        collection.invalidate();
        collection
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&FrameData> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameData> + '_ {
        self.frames.iter()
    }

    fn check_index(&self, index: usize) -> FrameMatchResult<()> {
        if index < self.frames.len() {
            Ok(())
        } else {
            Err(FrameMatchError::IndexOutOfBounds {
                index,
                len: self.frames.len(),
                context: "frame",
            })
        }
    }

    fn invalidate(&mut self) {
        self.assigned = vec![None; self.frames.len()];
        self.rendered = vec![None; self.frames.len()];
    }

    /// Appends a frame from a ranking of the library; candidates are kept
    /// in descending percentage order (stable for ties).
    pub fn add_frame(&mut self, mut ranked: Vec<MatchData>) {
        ranked.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
        self.frames.push(FrameData::from_ranked(ranked));
        // Later frames never influence earlier assignments.
        self.assigned.push(None);
        self.rendered.push(None);
    }

    /// Removes and returns the most recently added frame.
    pub fn pop_frame(&mut self) -> Option<FrameData> {
        let frame = self.frames.pop()?;
        self.assigned.truncate(self.frames.len());
        self.rendered.truncate(self.frames.len());
        Some(frame)
    }

    /// Every candidate of `frame`, best first.
    pub fn matches_at(&self, frame: usize) -> FrameMatchResult<&[MatchData]> {
        self.check_index(frame)?;
        Ok(self.frames[frame].matches())
    }

    /// Resolves assignments for frames `0..=frame`, reusing cached ones.
    fn resolve(&mut self, frame: usize) -> Option<usize> {
        let mut claimed: HashSet<&Path> = HashSet::new();
        for index in 0..=frame {
            let candidates = &self.frames[index].matches;
            let choice = match self.assigned[index] {
                Some(choice) => choice,
                None => {
                    let choice = candidates
                        .iter()
                        .position(|m| !claimed.contains(m.path.as_path()));
                    self.assigned[index] = Some(choice);
                    choice
                }
            };
            if let Some(choice) = choice {
                claimed.insert(candidates[choice].path.as_path());
            }
        }
        self.assigned[frame].flatten()
    }

    /// Highest-ranked candidate of `frame` whose photo is not used by an
    /// earlier frame, or `None` if all of them are.
    pub fn best_available_match(&mut self, frame: usize) -> FrameMatchResult<Option<&MatchData>> {
        self.check_index(frame)?;
        let choice = self.resolve(frame);
        Ok(choice.map(|choice| &self.frames[frame].matches[choice]))
    }

    /// Pins `frame` to `chosen` and drops that photo from every other frame.
    pub fn force_match(&mut self, frame: usize, chosen: MatchData) -> FrameMatchResult<()> {
        self.check_index(frame)?;
        for (index, other) in self.frames.iter_mut().enumerate() {
            if index != frame {
                other.matches.retain(|m| m.path != chosen.path);
            }
        }
        self.frames[frame] = FrameData::from_ranked(vec![chosen]);
        self.invalidate();
        Ok(())
    }

    /// Removes candidate `candidate` from `frame`.
    pub fn remove_match(&mut self, frame: usize, candidate: usize) -> FrameMatchResult<MatchData> {
        self.check_index(frame)?;
        let len = self.frames[frame].len();
        if candidate >= len {
            return Err(FrameMatchError::IndexOutOfBounds {
                index: candidate,
                len,
                context: "candidate",
            });
        }
        let removed = self.frames[frame].matches.remove(candidate);
        self.invalidate();
        Ok(removed)
    }

    fn photo(&mut self, path: &Path) -> FrameMatchResult<&RgbImage> {
        if !self.photos.contains_key(path) {
            let photo = decode_image(path)?.to_rgb8();
            self.photos.insert(path.to_path_buf(), photo);
        }
        self.photos
            .get(path)
            .ok_or(FrameMatchError::InvalidInput("photo cache lookup failed"))
    }

    /// Renders `frame` at the output size from its resolved candidate.
    ///
    /// A frame with no available candidate, or whose placement falls
    /// outside its photo, renders black.
    pub fn render_frame(&mut self, frame: usize) -> FrameMatchResult<&RgbImage> {
        self.check_index(frame)?;
        if self.rendered[frame].is_none() {
            let _span = trace_span!("render_frame", frame = frame).entered();
            let image = match self.resolve(frame) {
                Some(choice) => {
                    let data = self.frames[frame].matches[choice].clone();
                    let render = self.render;
                    let photo = self.photo(&data.path)?;
                    render::render_match(photo, &data, &render)
                }
                None => render::blank(&self.render),
            };
            self.rendered[frame] = Some(image);
        }
        self.rendered[frame]
            .as_ref()
            .ok_or(FrameMatchError::InvalidInput("render cache lookup failed"))
    }

    /// Renders every frame into the cache.
    pub fn preload_all(&mut self) -> FrameMatchResult<()> {
        for frame in 0..self.frames.len() {
            self.render_frame(frame)?;
        }
        Ok(())
    }

    /// Writes every rendered frame as `000.jpg`, `001.jpg`, ... into `dir`.
    pub fn write_images<P: AsRef<Path>>(&mut self, dir: P) -> FrameMatchResult<usize> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|err| FrameMatchError::io(dir, err))?;
        for frame in 0..self.frames.len() {
            let target = dir.join(format!("{frame:03}.jpg"));
            let image = self.render_frame(frame)?;
            encode_image(image, &target)?;
        }
        trace_event!("frames_written", count = self.frames.len());
        Ok(self.frames.len())
    }

    /// Writes the collection to `path`, one frame per line.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> FrameMatchResult<()> {
        if self.frames.is_empty() {
            return Err(FrameMatchError::EmptyCollection);
        }
        let path = path.as_ref();
        let text = format::format_collection(&self.frames)?;
        fs::write(path, text).map_err(|err| FrameMatchError::io(path, err))
    }

    /// Reads a collection written by [`FrameCollection::save`].
    pub fn load<P: AsRef<Path>>(path: P, render: RenderConfig) -> FrameMatchResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| FrameMatchError::io(path, err))?;
        Ok(Self::from_frames(format::parse_collection(&text)?, render))
    }

    fn named_path(root: &Path, name: &str) -> FrameMatchResult<PathBuf> {
        if name.is_empty() {
            return Err(FrameMatchError::InvalidInput("collection name must not be empty"));
        }
        Ok(root.join(name).join(FRAME_DATA_FILE))
    }

    /// Saves to `<root>/<name>/.frame-data`, creating the directory.
    pub fn save_named<P: AsRef<Path>>(&self, root: P, name: &str) -> FrameMatchResult<PathBuf> {
        let path = Self::named_path(root.as_ref(), name)?;
        if self.frames.is_empty() {
            return Err(FrameMatchError::EmptyCollection);
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|err| FrameMatchError::io(dir, err))?;
        }
        self.save(&path)?;
        Ok(path)
    }

    pub fn load_named<P: AsRef<Path>>(
        root: P,
        name: &str,
        render: RenderConfig,
    ) -> FrameMatchResult<Self> {
        let path = Self::named_path(root.as_ref(), name)?;
        Self::load(path, render)
    }
}
