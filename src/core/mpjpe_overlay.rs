// Drawing MPJPE results and prediction/ground-truth comparisons onto RGB frames

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut, text_size,
};
use imageproc::rect::Rect;
use std::path::Path;

use crate::models::evaluation::MpjpeResult;
use crate::models::landmarks::{JointTable, LandmarkSet};

#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("Failed to read font: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid font data: {0}")]
    InvalidFont(String),
}

#[derive(Debug, Clone)]
pub struct OverlayStyle {
    pub position: (i32, i32), // Top-left of the results panel text
    pub text_scale: f32,
    pub line_spacing: i32,
    pub add_background: bool,
    pub background_alpha: f32,
    pub header_color: [u8; 3],
    pub line_color: [u8; 3],
    pub line_thickness: u32,
    pub point_radius: i32,
    pub prediction_color: [u8; 3],
    pub ground_truth_color: [u8; 3],
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            position: (30, 60),
            text_scale: 20.0,
            line_spacing: 30,
            add_background: true,
            background_alpha: 0.6,
            header_color: [0, 255, 0],
            line_color: [0, 0, 255],
            line_thickness: 2,
            point_radius: 5,
            prediction_color: [0, 255, 0],
            ground_truth_color: [255, 0, 0],
        }
    }
}

/// Minimum panel text width, matching a typical "joint: 00.00 px" line
const MIN_PANEL_TEXT_WIDTH: u32 = 200;
const SWATCH_SIZE: u32 = 10;

pub struct MpjpeOverlay {
    style: OverlayStyle,
    font: Option<FontVec>,
}

impl MpjpeOverlay {
    /// Overlay without a font: panels and color swatches, no text
    pub fn new(style: OverlayStyle) -> Self {
        Self { style, font: None }
    }

    pub fn with_font_file(style: OverlayStyle, path: &Path) -> Result<Self, OverlayError> {
        let mut overlay = Self::new(style);
        overlay.set_font(std::fs::read(path)?)?;
        Ok(overlay)
    }

    pub fn set_font(&mut self, data: Vec<u8>) -> Result<(), OverlayError> {
        let font = FontVec::try_from_vec(data).map_err(|e| OverlayError::InvalidFont(e.to_string()))?;
        self.font = Some(font);
        Ok(())
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    fn scale(&self) -> PxScale {
        PxScale::from(self.style.text_scale)
    }

    fn measure(&self, text: &str) -> (u32, u32) {
        match self.font {
            Some(ref font) => text_size(self.scale(), font, text),
            None => (
                (text.len() as f32 * self.style.text_scale * 0.5).ceil() as u32,
                self.style.text_scale.ceil() as u32,
            ),
        }
    }

    /// Draw the overall MPJPE and one line per joint colored by error level
    pub fn draw_results(&self, frame: &mut RgbImage, result: &MpjpeResult) {
        let (x, y) = self.style.position;
        let header = format!("MPJPE: {:.2} px", result.mean_error);
        let (text_w, text_h) = self.measure(&header);
        let text_h = text_h as i32;

        if self.style.add_background {
            let panel_height = text_h + result.joint_count() as i32 * self.style.line_spacing + 10;
            let panel_width = text_w.max(MIN_PANEL_TEXT_WIDTH) as i32 + 20;
            darken_region(
                frame,
                x - 5,
                y - text_h - 5,
                panel_width + 5,
                panel_height + text_h + 5,
                self.style.background_alpha,
            );
        }

        // Lines are laid out on baselines like the header at `y`
        if let Some(ref font) = self.font {
            draw_text_mut(frame, Rgb(self.style.header_color), x, y - text_h, self.scale(), font, &header);
        }

        for (i, joint_error) in result.iter().enumerate() {
            let baseline = y + (i as i32 + 1) * self.style.line_spacing;
            let color = Rgb(joint_error.level().color());

            match self.font {
                Some(ref font) => {
                    let line = format!("{}: {:.2} px", joint_error.joint, joint_error.error);
                    draw_text_mut(frame, color, x, baseline - text_h, self.scale(), font, &line);
                }
                None => {
                    let swatch = Rect::at(x, baseline - SWATCH_SIZE as i32).of_size(SWATCH_SIZE, SWATCH_SIZE);
                    draw_filled_rect_mut(frame, swatch, color);
                }
            }
        }
    }

    /// Connect each predicted joint to its ground truth and mark both ends
    pub fn draw_comparison(
        &self,
        frame: &mut RgbImage,
        prediction: &LandmarkSet,
        ground_truth: &LandmarkSet,
        joints: &JointTable,
    ) {
        let margin = self.style.point_radius.max(0) as f64 + self.style.line_thickness as f64;
        let bounds = ClipBounds::around(frame, margin);

        for joint in joints {
            let (Some(pred), Some(gt)) = (prediction.get(joint.landmark_id), ground_truth.get(joint.landmark_id))
            else {
                continue;
            };
            if !pred.is_finite() || !gt.is_finite() {
                continue;
            }

            let start = (pred.x, pred.y);
            let end = (gt.x, gt.y);

            if let Some((a, b)) = clip_segment(start, end, &bounds) {
                draw_thick_line(frame, to_point(a), to_point(b), self.style.line_thickness, Rgb(self.style.line_color));
            }
            if bounds.contains(start) {
                draw_filled_circle_mut(frame, to_point(start), self.style.point_radius, Rgb(self.style.prediction_color));
            }
            if bounds.contains(end) {
                draw_filled_circle_mut(frame, to_point(end), self.style.point_radius, Rgb(self.style.ground_truth_color));
            }
        }
    }
}

/// Drawable area: the frame grown by a margin on every side
struct ClipBounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl ClipBounds {
    fn around(frame: &RgbImage, margin: f64) -> Self {
        let (width, height) = frame.dimensions();
        Self {
            min_x: -margin,
            min_y: -margin,
            max_x: width as f64 - 1.0 + margin,
            max_y: height as f64 - 1.0 + margin,
        }
    }

    fn contains(&self, (x, y): (f64, f64)) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

/// Liang-Barsky clipping; `None` when the segment misses the bounds
fn clip_segment(start: (f64, f64), end: (f64, f64), bounds: &ClipBounds) -> Option<((f64, f64), (f64, f64))> {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

    for (p, q) in [
        (-dx, start.0 - bounds.min_x),
        (dx, bounds.max_x - start.0),
        (-dy, start.1 - bounds.min_y),
        (dy, bounds.max_y - start.1),
    ] {
        if p == 0.0 {
            // parallel to this edge
            if q < 0.0 {
                return None;
            }
            continue;
        }

        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        (start.0 + t0 * dx, start.1 + t0 * dy),
        (start.0 + t1 * dx, start.1 + t1 * dy),
    ))
}

fn to_point((x, y): (f64, f64)) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

impl Default for MpjpeOverlay {
    fn default() -> Self {
        Self::new(OverlayStyle::default())
    }
}

/// Blend a rectangle toward black with the given opacity, clipped to the frame
fn darken_region(frame: &mut RgbImage, x: i32, y: i32, width: i32, height: i32, alpha: f32) {
    let (frame_w, frame_h) = frame.dimensions();
    let x0 = x.max(0) as u32;
    let y0 = y.max(0) as u32;
    let x1 = (x + width).clamp(0, frame_w as i32) as u32;
    let y1 = (y + height).clamp(0, frame_h as i32) as u32;
    let keep = 1.0 - alpha.clamp(0.0, 1.0);

    for py in y0..y1 {
        for px in x0..x1 {
            let pixel = frame.get_pixel_mut(px, py);
            for channel in pixel.0.iter_mut() {
                *channel = (*channel as f32 * keep).round() as u8;
            }
        }
    }
}

fn draw_thick_line(frame: &mut RgbImage, start: (i32, i32), end: (i32, i32), thickness: u32, color: Rgb<u8>) {
    let thickness = thickness.max(1) as i32;
    let half = thickness / 2;

    for offset in (0..thickness).map(|t| (t - half) as f32) {
        let (sx, sy) = (start.0 as f32, start.1 as f32);
        let (ex, ey) = (end.0 as f32, end.1 as f32);
        draw_line_segment_mut(frame, (sx + offset, sy), (ex + offset, ey), color);
        draw_line_segment_mut(frame, (sx, sy + offset), (ex, ey + offset), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation::JointError;
    use crate::models::landmarks::LandmarkPosition;

    fn gray_frame() -> RgbImage {
        RgbImage::from_pixel(320, 240, Rgb([100, 100, 100]))
    }

    fn sample_result() -> MpjpeResult {
        MpjpeResult {
            mean_error: 7.5,
            per_joint: vec![
                JointError { joint: "shoulder".into(), landmark_id: 11, error: 2.0 },
                JointError { joint: "knee".into(), landmark_id: 25, error: 13.0 },
            ],
        }
    }

    #[test]
    fn test_results_panel_darkens_background() {
        let mut frame = gray_frame();
        let overlay = MpjpeOverlay::default();
        overlay.draw_results(&mut frame, &sample_result());

        // Inside the panel, away from swatches
        assert_eq!(frame.get_pixel(150, 60), &Rgb([40, 40, 40]));
        // Outside the panel
        assert_eq!(frame.get_pixel(310, 230), &Rgb([100, 100, 100]));
    }

    #[test]
    fn test_swatches_use_error_level_colors() {
        let mut frame = gray_frame();
        let overlay = MpjpeOverlay::default();
        overlay.draw_results(&mut frame, &sample_result());

        // first joint swatch sits just above baseline 60 + 30
        assert_eq!(frame.get_pixel(32, 85), &Rgb([0, 255, 0]));
        // second joint (13 px) is high error
        assert_eq!(frame.get_pixel(32, 115), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_no_background_option() {
        let mut frame = gray_frame();
        let style = OverlayStyle { add_background: false, ..OverlayStyle::default() };
        MpjpeOverlay::new(style).draw_results(&mut frame, &sample_result());
        assert_eq!(frame.get_pixel(150, 60), &Rgb([100, 100, 100]));
    }

    #[test]
    fn test_comparison_marks_both_points() {
        let mut frame = gray_frame();
        let joints = JointTable::squat();
        let mut prediction = LandmarkSet::new();
        prediction.insert(11, LandmarkPosition::new(50.0, 50.0, 0.0));
        prediction.insert(25, LandmarkPosition::new(200.0, 200.0, 0.0));
        let mut ground_truth = LandmarkSet::new();
        ground_truth.insert(11, LandmarkPosition::new(150.0, 50.0, 0.0));

        MpjpeOverlay::default().draw_comparison(&mut frame, &prediction, &ground_truth, &joints);

        assert_eq!(frame.get_pixel(50, 50), &Rgb([0, 255, 0]));
        assert_eq!(frame.get_pixel(150, 50), &Rgb([255, 0, 0]));
        assert_eq!(frame.get_pixel(100, 50), &Rgb([0, 0, 255]));
        // knee has no ground truth
        assert_eq!(frame.get_pixel(200, 200), &Rgb([100, 100, 100]));
    }

    #[test]
    fn test_points_outside_frame_are_clipped() {
        let mut frame = gray_frame();
        let mut prediction = LandmarkSet::new();
        prediction.insert(11, LandmarkPosition::new(-40.0, 10.0, 0.0));
        let mut ground_truth = LandmarkSet::new();
        ground_truth.insert(11, LandmarkPosition::new(5000.0, 9000.0, 0.0));

        MpjpeOverlay::default().draw_comparison(&mut frame, &prediction, &ground_truth, &JointTable::squat());
        assert_eq!(frame.dimensions(), (320, 240));
    }

    #[test]
    fn test_far_ground_truth_is_clipped_to_frame() {
        let mut frame = RgbImage::from_pixel(64, 48, Rgb([100, 100, 100]));
        let mut prediction = LandmarkSet::new();
        prediction.insert(11, LandmarkPosition::new(10.0, 10.0, 0.0));
        let mut ground_truth = LandmarkSet::new();
        ground_truth.insert(11, LandmarkPosition::new(1e12, 1e12, 0.0));

        MpjpeOverlay::default().draw_comparison(&mut frame, &prediction, &ground_truth, &JointTable::squat());

        assert_eq!(frame.get_pixel(10, 10), &Rgb([0, 255, 0]));
        // the connector runs along the diagonal to the frame edge
        assert_eq!(frame.get_pixel(30, 30), &Rgb([0, 0, 255]));
        assert_eq!(frame.get_pixel(47, 47), &Rgb([0, 0, 255]));
        assert_eq!(frame.get_pixel(60, 5), &Rgb([100, 100, 100]));
    }

    #[test]
    fn test_segment_missing_the_frame_draws_nothing() {
        let mut frame = RgbImage::from_pixel(64, 48, Rgb([100, 100, 100]));
        let mut prediction = LandmarkSet::new();
        prediction.insert(11, LandmarkPosition::new(-1e12, -5.0e11, 0.0));
        let mut ground_truth = LandmarkSet::new();
        ground_truth.insert(11, LandmarkPosition::new(-1e12, 1e12, 0.0));

        MpjpeOverlay::default().draw_comparison(&mut frame, &prediction, &ground_truth, &JointTable::squat());
        assert!(frame.pixels().all(|p| *p == Rgb([100, 100, 100])));
    }

    #[test]
    fn test_clip_segment_keeps_inner_segment() {
        let bounds = ClipBounds { min_x: 0.0, min_y: 0.0, max_x: 10.0, max_y: 10.0 };
        assert_eq!(clip_segment((1.0, 1.0), (4.0, 5.0), &bounds), Some(((1.0, 1.0), (4.0, 5.0))));
        assert_eq!(clip_segment((-10.0, 5.0), (30.0, 5.0), &bounds), Some(((0.0, 5.0), (10.0, 5.0))));
        assert_eq!(clip_segment((-5.0, -5.0), (-1.0, 20.0), &bounds), None);
    }

    #[test]
    fn test_fallback_measure_with_small_text_scale() {
        let style = OverlayStyle { text_scale: 1.0, ..OverlayStyle::default() };
        let overlay = MpjpeOverlay::new(style);
        let (width, height) = overlay.measure("MPJPE: 1.00 px");
        assert_eq!(width, 7);
        assert_eq!(height, 1);
    }

    #[test]
    fn test_invalid_font_is_rejected() {
        let mut overlay = MpjpeOverlay::default();
        assert!(overlay.set_font(vec![0, 1, 2, 3]).is_err());
        assert!(!overlay.has_font());
    }
}
