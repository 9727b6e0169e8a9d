//! framematch assembles stop-motion frames by matching a drawn silhouette
//! against the edges of a photo library.
//!
//! Each photo is reduced once to a binary edge mask at a canonical width and
//! cached in a per-directory store. A template is searched over every mask
//! with a coarse-to-fine scale and offset schedule, in parallel across
//! images, and the ranked results are collected into frames whose final
//! photo is assigned greedily and rendered by cropping the original.

mod trace;

pub mod config;
pub mod edged;
pub mod edges;
pub mod frames;
pub mod io;
pub mod library;
pub mod mask;
pub mod search;
pub mod template;
pub mod util;

pub use config::RenderConfig;
pub use edged::EdgedImage;
pub use edges::{
    extract_edges, BlurParams, CannyParams, Detection, DetectionMode, DetectionSettings, EdgeEdit,
    ExtractWidths, ThresholdParams,
};
pub use frames::{FrameCollection, FrameData, MatchData};
pub use library::{ImageLibrary, LibraryMatch, LibraryOptions, SortKey};
pub use mask::{decode_hex, encode_hex, BitBuf, EdgeMask};
pub use search::{search_mask, ImageMatch, MatchConfig, MatchContext, SearchOutcome};
pub use template::{Template, TemplateShape, TemplateSpec};
pub use util::{FrameMatchError, FrameMatchResult};
