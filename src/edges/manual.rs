//! Hand-drawn edits applied to a stored edge mask.
//!
//! Coordinates are mask pixels. Rectangles span both corner points
//! inclusively; circles are centred between the two points with a radius of
//! half their distance.

use crate::mask::EdgeMask;
use crate::util::FrameMatchResult;
use image::{GrayImage, Luma};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut,
};
use imageproc::rect::Rect;

const EDGE: Luma<u8> = Luma([255]);
const BACKGROUND: Luma<u8> = Luma([0]);

/// A single drawing operation on an edge mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeEdit {
    /// Clears the filled rectangle between two corners.
    Erase { from: (i32, i32), to: (i32, i32) },
    Line { from: (i32, i32), to: (i32, i32) },
    /// Outline of the rectangle between two corners.
    Rectangle { from: (i32, i32), to: (i32, i32) },
    Circle { from: (i32, i32), to: (i32, i32) },
    /// Removes every edge.
    Clear,
}

fn corners_rect(from: (i32, i32), to: (i32, i32)) -> Rect {
    let x = from.0.min(to.0);
    let y = from.1.min(to.1);
    let width = from.0.abs_diff(to.0) + 1;
    let height = from.1.abs_diff(to.1) + 1;
    Rect::at(x, y).of_size(width, height)
}

fn draw(canvas: &mut GrayImage, edit: &EdgeEdit) {
    match *edit {
        EdgeEdit::Erase { from, to } => {
            draw_filled_rect_mut(canvas, corners_rect(from, to), BACKGROUND)
        }
        EdgeEdit::Line { from, to } => draw_line_segment_mut(
            canvas,
            (from.0 as f32, from.1 as f32),
            (to.0 as f32, to.1 as f32),
            EDGE,
        ),
        EdgeEdit::Rectangle { from, to } => {
            draw_hollow_rect_mut(canvas, corners_rect(from, to), EDGE)
        }
        EdgeEdit::Circle { from, to } => {
            let center = ((from.0 + to.0) / 2, (from.1 + to.1) / 2);
            let dx = (from.0 - to.0) as f64;
            let dy = (from.1 - to.1) as f64;
            let radius = ((dx * dx + dy * dy).sqrt() / 2.0) as i32;
            draw_hollow_circle_mut(canvas, center, radius, EDGE);
        }
        EdgeEdit::Clear => canvas.pixels_mut().for_each(|p| *p = BACKGROUND),
    }
}

/// Applies `edits` in order, replacing the contents of `mask`.
pub fn apply_edits(mask: &mut EdgeMask, edits: &[EdgeEdit]) -> FrameMatchResult<()> {
    if edits.is_empty() {
        return Ok(());
    }
    let mut canvas = mask.to_luma();
    for edit in edits {
        draw(&mut canvas, edit);
    }
    *mask = EdgeMask::from_luma(&canvas)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply_edits, EdgeEdit};
    use crate::mask::EdgeMask;

    #[test]
    fn line_then_erase() {
        let mut mask = EdgeMask::new(10, 10).unwrap();
        apply_edits(
            &mut mask,
            &[EdgeEdit::Line {
                from: (0, 5),
                to: (9, 5),
            }],
        )
        .unwrap();
        assert_eq!(mask.get(0, 5), Some(true));
        assert_eq!(mask.get(5, 5), Some(true));
        let before = mask.count_edges();

        apply_edits(
            &mut mask,
            &[EdgeEdit::Erase {
                from: (0, 0),
                to: (4, 9),
            }],
        )
        .unwrap();
        assert_eq!(mask.count_edges(), before - 5);
        assert_eq!(mask.get(4, 5), Some(false));
        assert_eq!(mask.get(5, 5), Some(true));
    }

    #[test]
    fn rectangle_outline_is_hollow() {
        let mut mask = EdgeMask::new(10, 10).unwrap();
        apply_edits(
            &mut mask,
            &[EdgeEdit::Rectangle {
                from: (7, 7),
                to: (2, 2),
            }],
        )
        .unwrap();
        assert_eq!(mask.get(2, 2), Some(true));
        assert_eq!(mask.get(7, 4), Some(true));
        assert_eq!(mask.get(4, 4), Some(false));
        assert_eq!(mask.count_edges(), 20);
    }

    #[test]
    fn clear_removes_everything() {
        let mut mask = EdgeMask::new(6, 4).unwrap();
        apply_edits(
            &mut mask,
            &[
                EdgeEdit::Circle {
                    from: (0, 0),
                    to: (4, 4),
                },
                EdgeEdit::Clear,
            ],
        )
        .unwrap();
        assert_eq!(mask.count_edges(), 0);
    }
}
