use serde::{Deserialize, Serialize};

use crate::optimization::SingleViewCalibration;

/// Footprint and height of the overlay box, in reference image pixels.
/// A negative height points out of the reference plane towards the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxConfig {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
    pub height: f32,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            x_min: 30.0,
            y_min: 145.0,
            x_max: 200.0,
            y_max: 200.0,
            height: -50.0,
        }
    }
}

/// Wireframe box standing on the reference plane. Built once and never
/// changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ArBox {
    lower: [glam::Vec3; 4],
    upper: [glam::Vec3; 4],
}

impl ArBox {
    pub fn from_config(box_config: &BoxConfig) -> ArBox {
        Self::init_box(
            box_config.x_min,
            box_config.y_min,
            box_config.x_max,
            box_config.y_max,
            box_config.height,
        )
    }

    pub fn init_box(x_min: f32, y_min: f32, x_max: f32, y_max: f32, height: f32) -> ArBox {
        let footprint = [
            glam::Vec2::new(x_min, y_min),
            glam::Vec2::new(x_min, y_max),
            glam::Vec2::new(x_max, y_max),
            glam::Vec2::new(x_max, y_min),
        ];
        ArBox {
            lower: footprint.map(|p| p.extend(0.0)),
            upper: footprint.map(|p| p.extend(height)),
        }
    }

    pub fn lower(&self) -> [glam::Vec3; 4] {
        self.lower
    }

    pub fn upper(&self) -> [glam::Vec3; 4] {
        self.upper
    }

    /// Lower corners followed by upper corners.
    pub fn corners(&self) -> [glam::Vec3; 8] {
        let mut out = [glam::Vec3::ZERO; 8];
        out[..4].copy_from_slice(&self.lower);
        out[4..].copy_from_slice(&self.upper);
        out
    }

    /// Projects the box into the frame. `None` if any corner falls behind
    /// the camera.
    pub fn project(&self, calibration: &SingleViewCalibration) -> Option<BoxProjection> {
        let projected = calibration.project(&self.corners());
        let mut pts = [glam::Vec2::ZERO; 8];
        for (dst, p) in pts.iter_mut().zip(projected) {
            let p = p?;
            *dst = glam::Vec2::new(p.x as f32, p.y as f32);
        }
        Some(BoxProjection {
            lower: [pts[0], pts[1], pts[2], pts[3]],
            upper: [pts[4], pts[5], pts[6], pts[7]],
        })
    }
}

pub fn create_default_book_box() -> ArBox {
    ArBox::from_config(&BoxConfig::default())
}

/// Box corners in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxProjection {
    pub lower: [glam::Vec2; 4],
    pub upper: [glam::Vec2; 4],
}

impl BoxProjection {
    /// Pixel corners rounded the way the drawing backend expects them.
    pub fn rounded(&self) -> ([(i32, i32); 4], [(i32, i32); 4]) {
        let round = |p: &glam::Vec2| (p.x.round() as i32, p.y.round() as i32);
        (self.lower.each_ref().map(round), self.upper.each_ref().map(round))
    }

    /// Vertical edges from each lower corner to the matching upper corner.
    pub fn vertical_edges(&self) -> [(glam::Vec2, glam::Vec2); 4] {
        [0, 1, 2, 3].map(|i| (self.lower[i], self.upper[i]))
    }
}
