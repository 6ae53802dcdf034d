//! Affine transforms as found in SVG `transform` attributes.

use lyon_geom::euclid::default::{Point2D, Transform2D};
use log::trace;
use svgtypes::{TransformListParser, TransformListToken};

use crate::error::Error;
use crate::Point;

/// A 2D affine map `[[a, c, e], [b, d, f], [0, 0, 1]]`.
///
/// The six coefficients follow the SVG `matrix(a,b,c,d,e,f)` order. Values are
/// immutable, composition creates a new transform.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct AffineTransform(Transform2D<f64>);

impl AffineTransform {
    pub fn identity() -> Self {
        Self(Transform2D::identity())
    }

    /// Build a transform from the SVG `matrix(a,b,c,d,e,f)` 6-tuple.
    #[allow(clippy::many_single_char_names)]
    pub fn matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        // euclid stores row vectors, so its (m11, m12, m21, m22, m31, m32)
        // line up with SVG's column-major tuple.
        Self(Transform2D::new(a, b, c, d, e, f))
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self(Transform2D::translation(tx, ty))
    }

    /// Parse a `transform` attribute.
    ///
    /// Only `matrix(...)` and `translate(...)` are supported. A list of
    /// functions is composed left to right, an empty attribute yields the
    /// identity. Any other function (`rotate`, `scale`, `skewX`, `skewY`) is
    /// an error rather than being ignored.
    pub fn parse(attr: &str) -> Result<Self, Error> {
        trace!("AffineTransform::parse: {:?}", attr);
        let mut xform = Self::identity();
        for token in TransformListParser::from(attr) {
            let local = match token {
                Ok(TransformListToken::Matrix { a, b, c, d, e, f }) => {
                    Self::matrix(a, b, c, d, e, f)
                }
                Ok(TransformListToken::Translate { tx, ty }) => Self::translate(tx, ty),
                Ok(other) => {
                    return Err(Error::UnsupportedTransform(format!(
                        "{:?} in \"{}\"",
                        other, attr
                    )))
                }
                Err(e) => {
                    return Err(Error::UnsupportedTransform(format!(
                        "could not parse \"{}\": {}",
                        attr, e
                    )))
                }
            };
            xform = xform.compose(&local);
        }
        Ok(xform)
    }

    /// Matrix product `self × local`: apply `local` first, then `self`.
    pub fn compose(&self, local: &Self) -> Self {
        Self(local.0.then(&self.0))
    }

    pub fn apply(&self, p: Point) -> Point {
        let out = self.0.transform_point(Point2D::new(p.x, p.y));
        Point::new(out.x, out.y)
    }

    /// The `(a, b, c, d, e, f)` coefficients.
    pub fn to_array(&self) -> [f64; 6] {
        let m = &self.0;
        [m.m11, m.m12, m.m21, m.m22, m.m31, m.m32]
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}
