/// Gap filling for cells no sample landed on
mod reconstruct;
mod telea;

pub use reconstruct::fill_holes;
pub use telea::inpaint;

use crate::constants::MAX_FILL_RADIUS;
use crate::error::PipelineWarning;
use crate::heightmap::HeightMapImage;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Both strategies treat every sentinel cell as a candidate and never change
/// a written cell; the result depends only on the image and the radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GapFillMethod {
    /// Fast-marching inpainting that propagates values inward from the
    /// boundary of each empty region, averaging known cells within `radius`.
    #[default]
    Telea,
    /// Morphological hole filling: empty regions enclosed by samples are
    /// raised to the lowest level of their rim, regions touching the border
    /// stay empty. The radius only switches it on.
    Reconstruct,
}

/// Fill empty cells of `image`. A radius of 0 disables filling; radii above
/// [`MAX_FILL_RADIUS`] are treated as the maximum.
///
/// An image with no samples at all is returned unchanged together with
/// [`PipelineWarning::EmptyImage`].
pub fn fill_gaps(
    image: HeightMapImage,
    method: GapFillMethod,
    radius: u32,
) -> (HeightMapImage, Option<PipelineWarning>) {
    if radius == 0 {
        return (image, None);
    }
    let radius = radius.min(MAX_FILL_RADIUS);

    let empty = image.count_sentinel();
    if empty == 0 {
        return (image, None);
    }
    if empty == image.rows() * image.cols() {
        warn!("{}", PipelineWarning::EmptyImage);
        return (image, Some(PipelineWarning::EmptyImage));
    }

    let filled = match method {
        GapFillMethod::Telea => inpaint(&image, radius as usize),
        GapFillMethod::Reconstruct => fill_holes(&image),
    };
    debug!(
        "{:?} gap fill (radius {}): {} -> {} empty cells",
        method,
        radius,
        empty,
        filled.count_sentinel()
    );
    (filled, None)
}
