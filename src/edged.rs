//! A source photograph reduced to its stored edge mask.

use crate::edges::{
    apply_edits, extract_edges, DetectionMode, DetectionSettings, EdgeEdit, ExtractWidths,
};
use crate::mask::EdgeMask;
use crate::search::{search_mask, MatchConfig, MatchContext, SearchOutcome};
use crate::template::Template;
use crate::trace::trace_span;
use crate::util::{FrameMatchError, FrameMatchResult};
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// Stored edges of one photo together with the parameters that produced
/// them. `width` and `height` describe the original photo, not the mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgedImage {
    path: PathBuf,
    width: u32,
    height: u32,
    edges: EdgeMask,
    settings: DetectionSettings,
}

impl EdgedImage {
    pub fn new(
        path: impl Into<PathBuf>,
        width: u32,
        height: u32,
        edges: EdgeMask,
        settings: DetectionSettings,
    ) -> FrameMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(FrameMatchError::InvalidDimensions {
                width: width as usize,
                height: height as usize,
            });
        }
        Ok(Self {
            path: path.into(),
            width,
            height,
            edges,
            settings,
        })
    }

    /// Runs edge extraction on a decoded photo.
    pub fn from_source(
        path: impl Into<PathBuf>,
        source: &DynamicImage,
        settings: DetectionSettings,
        widths: ExtractWidths,
    ) -> FrameMatchResult<Self> {
        let edges = extract_edges(source, &settings.detection(), widths)?;
        Self::new(path, source.width(), source.height(), edges, settings)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn edges(&self) -> &EdgeMask {
        &self.edges
    }

    pub fn settings(&self) -> &DetectionSettings {
        &self.settings
    }

    /// Finds the best placement of `template` on this image's edges.
    pub fn match_to(
        &self,
        template: &Template,
        cfg: &MatchConfig,
        context: Option<MatchContext>,
    ) -> FrameMatchResult<SearchOutcome> {
        let _span = trace_span!("image_match", path = %self.path.display()).entered();
        search_mask(&self.edges, self.width, template, cfg, context)
    }

    /// Re-extracts the edges from `source` with new settings.
    ///
    /// The photo dimensions are refreshed from `source`; the path is kept.
    pub fn redetect(
        &mut self,
        source: &DynamicImage,
        settings: DetectionSettings,
        widths: ExtractWidths,
    ) -> FrameMatchResult<()> {
        let edges = extract_edges(source, &settings.detection(), widths)?;
        self.width = source.width();
        self.height = source.height();
        self.edges = edges;
        self.settings = settings;
        Ok(())
    }

    /// Draws `edits` onto the stored edges and marks them as hand-drawn.
    pub fn apply_edits(&mut self, edits: &[EdgeEdit]) -> FrameMatchResult<()> {
        apply_edits(&mut self.edges, edits)?;
        self.settings.mode = DetectionMode::Manual;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::EdgedImage;
    use crate::edges::{DetectionMode, DetectionSettings, EdgeEdit, ExtractWidths};
    use crate::mask::EdgeMask;
    use crate::util::FrameMatchError;
    use image::{DynamicImage, GrayImage, Luma};

    #[test]
    fn rejects_empty_photo_dimensions() {
        let err = EdgedImage::new(
            "a.jpg",
            0,
            10,
            EdgeMask::new(4, 4).unwrap(),
            DetectionSettings::default(),
        )
        .unwrap_err();
        assert_eq!(err, FrameMatchError::InvalidDimensions { width: 0, height: 10 });
    }

    #[test]
    fn edits_switch_to_manual_mode() {
        let mut image = EdgedImage::new(
            "a.jpg",
            40,
            40,
            EdgeMask::new(20, 20).unwrap(),
            DetectionSettings::default(),
        )
        .unwrap();
        image
            .apply_edits(&[EdgeEdit::Rectangle {
                from: (2, 2),
                to: (10, 10),
            }])
            .unwrap();
        assert_eq!(image.settings().mode, DetectionMode::Manual);
        assert!(image.edges().count_edges() > 0);
    }

    #[test]
    fn redetect_refreshes_dimensions() {
        let mut image = EdgedImage::new(
            "a.jpg",
            1,
            1,
            EdgeMask::new(20, 20).unwrap(),
            DetectionSettings::default(),
        )
        .unwrap();
        let source = DynamicImage::ImageLuma8(GrayImage::from_pixel(40, 20, Luma([0])));
        let widths = ExtractWidths {
            detection_width: 20,
            stored_width: 20,
        };
        image
            .redetect(&source, DetectionSettings::default(), widths)
            .unwrap();
        assert_eq!((image.width(), image.height()), (40, 20));
        assert_eq!(image.edges().height(), 10);
        assert_eq!(image.edges().count_edges(), 0);
    }
}
