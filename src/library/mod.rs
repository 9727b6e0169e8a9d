//! The photo library of one directory and its `.store` file.
//!
//! A library owns an `EdgedImage` per photo. It is loaded from the store,
//! or generated by running edge extraction over every photo in the
//! directory. Searches fan out over all images on a worker pool and
//! keep each image's latest result for ranking.

mod parallel;
mod store;

use crate::edged::EdgedImage;
use crate::edges::{DetectionSettings, ExtractWidths};
use crate::frames::MatchData;
use crate::io::{decode_image, is_hidden, list_files};
use crate::search::{ImageMatch, MatchConfig, MatchContext};
use crate::template::Template;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{FrameMatchError, FrameMatchResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

/// File name of the store inside a library directory.
pub const STORE_FILE: &str = ".store";

/// Extraction parameters used when photos are added to a library.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LibraryOptions {
    pub settings: DetectionSettings,
    pub widths: ExtractWidths,
}

/// Result of searching every image in a library.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LibraryMatch {
    pub best: ImageMatch,
    /// Index of the winning image; `None` for an empty library.
    pub image: Option<usize>,
    /// Placements attempted across all images.
    pub runs: usize,
}

/// Ordering applied by [`ImageLibrary::sort_by`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    /// Lexicographic by path.
    Path,
    /// Descending by the latest search percentage.
    MatchPercentage,
}

#[derive(Clone, Debug)]
pub struct ImageLibrary {
    dir: PathBuf,
    options: LibraryOptions,
    images: Vec<EdgedImage>,
    /// Latest search result per image, parallel to `images`.
    last_matches: Vec<ImageMatch>,
}

impl ImageLibrary {
    fn with_images(dir: &Path, options: LibraryOptions, images: Vec<EdgedImage>) -> Self {
        let last_matches = vec![ImageMatch::default(); images.len()];
        Self {
            dir: dir.to_path_buf(),
            options,
            images,
            last_matches,
        }
    }

    /// Loads `<dir>/.store` with default options.
    pub fn load<P: AsRef<Path>>(dir: P) -> FrameMatchResult<Self> {
        Self::load_with(dir, LibraryOptions::default())
    }

    pub fn load_with<P: AsRef<Path>>(dir: P, options: LibraryOptions) -> FrameMatchResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(FrameMatchError::MissingDirectory(dir.to_path_buf()));
        }
        let path = dir.join(STORE_FILE);
        let text = fs::read_to_string(&path).map_err(|err| FrameMatchError::io(&path, err))?;
        let images = store::parse_store(&text, options.widths.stored_width)?;
        trace_event!("store_loaded", images = images.len());
        Ok(Self::with_images(dir, options, images))
    }

    /// Rebuilds the library from every photo in `dir` and writes the store.
    pub fn generate<P: AsRef<Path>>(dir: P) -> FrameMatchResult<Self> {
        Self::generate_with(dir, LibraryOptions::default())
    }

    pub fn generate_with<P: AsRef<Path>>(
        dir: P,
        options: LibraryOptions,
    ) -> FrameMatchResult<Self> {
        let dir = dir.as_ref();
        let _span = trace_span!("generate_store", dir = %dir.display()).entered();
        let images = extract_all(candidate_paths(dir)?, &options);
        let library = Self::with_images(dir, options, images);
        library.save()?;
        trace_event!("store_generated", images = library.len());
        Ok(library)
    }

    /// Adds photos that appeared in the directory since the store was
    /// written, saving the store when anything was added.
    pub fn sync(&mut self) -> FrameMatchResult<usize> {
        let _span = trace_span!("sync_store", dir = %self.dir.display()).entered();
        let fresh: Vec<PathBuf> = candidate_paths(&self.dir)?
            .into_iter()
            .filter(|path| self.position(path).is_none())
            .collect();
        let added = extract_all(fresh, &self.options);
        let count = added.len();
        self.images.extend(added);
        self.last_matches.resize(self.images.len(), ImageMatch::default());
        if count > 0 {
            self.save()?;
        }
        trace_event!("store_synced", added = count);
        Ok(count)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn options(&self) -> &LibraryOptions {
        &self.options
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    /// Writes the store synchronously.
    pub fn save(&self) -> FrameMatchResult<()> {
        let path = self.store_path();
        let text = store::format_store(&self.images)?;
        fs::write(&path, text).map_err(|err| FrameMatchError::io(&path, err))?;
        trace_event!("store_saved", images = self.images.len());
        Ok(())
    }

    /// Snapshots the store and writes it on a separate thread.
    ///
    /// The caller must join the handle before exiting if the write has to
    /// complete.
    pub fn save_in_background(&self) -> FrameMatchResult<JoinHandle<FrameMatchResult<()>>> {
        let path = self.store_path();
        let text = store::format_store(&self.images)?;
        Ok(thread::spawn(move || {
            fs::write(&path, text).map_err(|err| FrameMatchError::io(&path, err))
        }))
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EdgedImage> {
        self.images.get(index)
    }

    /// Mutable access for the edit flow; the image's last match is kept.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut EdgedImage> {
        self.images.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EdgedImage> + '_ {
        self.images.iter()
    }

    pub fn position(&self, path: &Path) -> Option<usize> {
        self.images.iter().position(|image| image.path() == path)
    }

    /// Result of the latest search for the image at `index`.
    pub fn last_match(&self, index: usize) -> Option<&ImageMatch> {
        self.last_matches.get(index)
    }

    /// Searches every image for `template` and returns the overall best.
    ///
    /// Ties between images go to the lower index.
    pub fn match_to(
        &mut self,
        template: &Template,
        cfg: &MatchConfig,
        context: Option<MatchContext>,
    ) -> FrameMatchResult<LibraryMatch> {
        cfg.validate()?;
        let _span = trace_span!("library_match", images = self.images.len()).entered();
        let fan_out = parallel::match_all(&self.images, template, cfg, context)?;

        let runs = fan_out.outcomes.iter().map(|outcome| outcome.runs).sum();
        for (last, outcome) in self.last_matches.iter_mut().zip(&fan_out.outcomes) {
            *last = outcome.best;
        }
        let result = match fan_out.best {
            Some((image, best)) => LibraryMatch {
                best,
                image: Some(image),
                runs,
            },
            None => LibraryMatch {
                runs,
                ..LibraryMatch::default()
            },
        };
        trace_event!(
            "library_matched",
            workers = fan_out.workers,
            runs = result.runs,
            percentage = result.best.percentage
        );
        Ok(result)
    }

    /// Reorders the images in memory; the store is not rewritten.
    pub fn sort_by(&mut self, key: SortKey) {
        let mut order: Vec<usize> = (0..self.images.len()).collect();
        match key {
            SortKey::Path => {
                order.sort_by(|&a, &b| self.images[a].path().cmp(self.images[b].path()))
            }
            SortKey::MatchPercentage => order.sort_by(|&a, &b| {
                self.last_matches[b]
                    .percentage
                    .total_cmp(&self.last_matches[a].percentage)
            }),
        }
        let mut images: Vec<Option<EdgedImage>> = self.images.drain(..).map(Some).collect();
        self.images = order.iter().filter_map(|&idx| images[idx].take()).collect();
        self.last_matches = order.iter().map(|&idx| self.last_matches[idx]).collect();
    }

    /// Removes the image at `index` from memory only.
    pub fn erase(&mut self, index: usize) -> FrameMatchResult<EdgedImage> {
        if index >= self.images.len() {
            return Err(FrameMatchError::IndexOutOfBounds {
                index,
                len: self.images.len(),
                context: "image",
            });
        }
        self.last_matches.remove(index);
        Ok(self.images.remove(index))
    }

    /// Every image with its latest result, best first; ties keep library
    /// order.
    pub fn ranked_matches(&self) -> Vec<MatchData> {
        let mut ranked: Vec<MatchData> = self
            .images
            .iter()
            .zip(&self.last_matches)
            .map(|(image, last)| MatchData::new(image.path(), last))
            .collect();
        ranked.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
        ranked
    }
}

/// Non-hidden files of `dir` whose paths fit the store format, sorted.
fn candidate_paths(dir: &Path) -> FrameMatchResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for path in list_files(dir)? {
        if is_hidden(&path) {
            continue;
        }
        match path.to_str() {
            Some(text) if store::representable(text) => paths.push(path),
            _ => {
                trace_warn!("skipping {}: path cannot be stored", path.display());
            }
        }
    }
    Ok(paths)
}

fn extract_one(path: PathBuf, options: &LibraryOptions) -> Option<EdgedImage> {
    let source = match decode_image(&path) {
        Ok(source) => source,
        Err(err) => {
            trace_warn!("skipping {}: {}", path.display(), err);
            return None;
        }
    };
    match EdgedImage::from_source(path.clone(), &source, options.settings, options.widths) {
        Ok(image) => Some(image),
        Err(err) => {
            trace_warn!("skipping {}: {}", path.display(), err);
            None
        }
    }
}

#[cfg(feature = "rayon")]
fn extract_all(paths: Vec<PathBuf>, options: &LibraryOptions) -> Vec<EdgedImage> {
    use rayon::prelude::*;

    paths
        .into_par_iter()
        .filter_map(|path| extract_one(path, options))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn extract_all(paths: Vec<PathBuf>, options: &LibraryOptions) -> Vec<EdgedImage> {
    paths
        .into_iter()
        .filter_map(|path| extract_one(path, options))
        .collect()
}
