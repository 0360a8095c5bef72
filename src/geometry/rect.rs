//! Axis-aligned rectangle with a depth value
//!
//! The rectangle lives on a plane parallel to XY at `z = depth` in a
//! right-handed coordinate system. Its four corners are:
//!
//! - Upper left:  `(left,  top,    depth)`
//! - Upper right: `(right, top,    depth)`
//! - Lower left:  `(left,  bottom, depth)`
//! - Lower right: `(right, bottom, depth)`
//!
//! In the toolkit's screen convention +Y points down the screen, so `top <
//! bottom`. A rectangle tagged with [`MIRRORED_FRAME`] uses the renderer's
//! convention where +Y points up and `top > bottom`.

use crate::{ObsGeomError, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Frame tag of a rectangle whose Y axis points up the screen
pub const MIRRORED_FRAME: &str = "OpenGL";

const LEFT: usize = 0;
const TOP: usize = 1;
const RIGHT: usize = 2;
const BOTTOM: usize = 3;
const DEPTH: usize = 4;

/// Rectangle bounds plus depth, with an optional frame tag
///
/// Index access (`rect[0]` .. `rect[4]`) and the named accessors are views
/// over the same five numbers: left, top, right, bottom, depth.
///
/// Deserialization goes through [`Rect::new`], so serialized bounds that break
/// the frame convention are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RectFields")]
pub struct Rect {
    values: [f64; 5],
    frame: Option<String>,
}

/// Serialized form of a [`Rect`], before validation
#[derive(Deserialize)]
struct RectFields {
    values: [f64; 5],
    frame: Option<String>,
}

impl TryFrom<RectFields> for Rect {
    type Error = ObsGeomError;

    fn try_from(fields: RectFields) -> Result<Self> {
        let [left, top, right, bottom, depth] = fields.values;
        Rect::new(left, top, right, bottom, depth, fields.frame.as_deref())
    }
}

impl Rect {
    /// Create a rectangle, checking the bounds against the frame convention
    pub fn new(
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
        depth: f64,
        frame: Option<&str>,
    ) -> Result<Self> {
        if !(left < right) {
            return Err(ObsGeomError::InvalidGeometry(format!(
                "right ({right}) must be greater than left ({left})"
            )));
        }

        let mirrored = frame == Some(MIRRORED_FRAME);
        if mirrored && !(top > bottom) {
            return Err(ObsGeomError::InvalidGeometry(format!(
                "top ({top}) must be greater than bottom ({bottom}) on a mirrored frame"
            )));
        }
        if !mirrored && !(top < bottom) {
            return Err(ObsGeomError::InvalidGeometry(format!(
                "bottom ({bottom}) must be greater than top ({top})"
            )));
        }

        Ok(Self {
            values: [left, top, right, bottom, depth],
            frame: frame.map(str::to_string),
        })
    }

    pub fn left(&self) -> f64 {
        self.values[LEFT]
    }

    pub fn top(&self) -> f64 {
        self.values[TOP]
    }

    pub fn right(&self) -> f64 {
        self.values[RIGHT]
    }

    pub fn bottom(&self) -> f64 {
        self.values[BOTTOM]
    }

    pub fn depth(&self) -> f64 {
        self.values[DEPTH]
    }

    pub fn set_left(&mut self, value: f64) {
        self.values[LEFT] = value;
    }

    pub fn set_top(&mut self, value: f64) {
        self.values[TOP] = value;
    }

    pub fn set_right(&mut self, value: f64) {
        self.values[RIGHT] = value;
    }

    pub fn set_bottom(&mut self, value: f64) {
        self.values[BOTTOM] = value;
    }

    pub fn set_depth(&mut self, value: f64) {
        self.values[DEPTH] = value;
    }

    /// Frame tag, if any
    pub fn frame(&self) -> Option<&str> {
        self.frame.as_deref()
    }

    /// Whether the rectangle uses the Y-up renderer convention
    pub fn is_mirrored(&self) -> bool {
        self.frame() == Some(MIRRORED_FRAME)
    }

    pub fn width(&self) -> f64 {
        (self.right() - self.left()).abs()
    }

    pub fn height(&self) -> f64 {
        (self.bottom() - self.top()).abs()
    }

    /// Height over width
    pub fn aspect(&self) -> f64 {
        self.height() / self.width()
    }

    pub fn left_vec(&self) -> Vector3<f64> {
        Vector3::new(self.left(), 0.0, self.depth())
    }

    pub fn top_vec(&self) -> Vector3<f64> {
        Vector3::new(0.0, self.top(), self.depth())
    }

    pub fn right_vec(&self) -> Vector3<f64> {
        Vector3::new(self.right(), 0.0, self.depth())
    }

    pub fn bottom_vec(&self) -> Vector3<f64> {
        Vector3::new(0.0, self.bottom(), self.depth())
    }

    pub fn center_vec(&self) -> Vector3<f64> {
        Vector3::new(
            (self.left() + self.right()) / 2.0,
            (self.top() + self.bottom()) / 2.0,
            self.depth(),
        )
    }

    /// Convert to the renderer's Y-up convention
    ///
    /// Swaps top and bottom, negates the depth and tags the result with
    /// [`MIRRORED_FRAME`].
    pub fn flip_to_mirrored_frame(&self) -> Rect {
        Rect {
            values: [
                self.left(),
                self.bottom(),
                self.right(),
                self.top(),
                -self.depth(),
            ],
            frame: Some(MIRRORED_FRAME.to_string()),
        }
    }
}

impl Index<usize> for Rect {
    type Output = f64;

    fn index(&self, n: usize) -> &f64 {
        &self.values[n]
    }
}

impl IndexMut<usize> for Rect {
    fn index_mut(&mut self, n: usize) -> &mut f64 {
        &mut self.values[n]
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect(left={},top={},right={},bottom={},depth={})",
            self.left(),
            self.top(),
            self.right(),
            self.bottom(),
            self.depth()
        )?;
        if let Some(frame) = &self.frame {
            write!(f, " on '{frame}'")?;
        }
        Ok(())
    }
}
