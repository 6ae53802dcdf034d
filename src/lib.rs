//! Convert the path outlines of an SVG file into line segments that can be
//! embedded as static level geometry.
//!
//! The group hierarchy of the document is walked depth first. Transforms of
//! nested groups and paths are accumulated, so every resulting point is
//! expressed in the coordinate frame of the root `<svg>` element. Each path
//! becomes an [`Outline`], named after the `inkscape:label` of the group it
//! lives in.
//!
//! Only straight lines are supported (`M`, `m`, `L` and `Z` path commands,
//! `matrix(...)` and `translate(...)` transforms). Anything else is reported
//! as an error instead of being skipped.
//!
//! You can optionally get serde 1 support by enabling the `serde` feature,
//! and CSV output with the `csv` feature.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

use std::convert;
use std::path::Path as FilePath;

use log::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod document;
pub mod emit;
mod error;
pub mod path;
pub mod transform;
pub mod walk;

pub use crate::document::Document;
#[cfg(feature = "csv")]
pub use crate::emit::write_csv;
pub use crate::emit::{emit, segments, Segment};
pub use crate::error::Error;
pub use crate::path::{flatten, flatten_with};
pub use crate::transform::AffineTransform;

/// A `Point` consists of an x and y coordinate.
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl convert::From<(f64, f64)> for Point {
    fn from(val: (f64, f64)) -> Self {
        Self { x: val.0, y: val.1 }
    }
}

/// The points of one `<path>` element in root coordinates, in drawing order.
#[derive(Debug, PartialEq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Outline {
    pub points: Vec<Point>,
    /// Label of the enclosing group, if it has a non-empty one.
    pub name: Option<String>,
}

/// Which outlines end up in the output, and whether segments carry names.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum ExportMode {
    /// Every outline, each segment tagged with its outline's name.
    #[default]
    Named,
    /// Only the segments of the first outline, without names.
    FirstUnnamed,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Config {
    /// Accept relative moveto (`m`) commands. If disabled they are rejected
    /// like any other unsupported command.
    pub relative_moveto: bool,
    pub mode: ExportMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            relative_moveto: true,
            mode: ExportMode::default(),
        }
    }
}

/// Parse an SVG string into a list of outlines.
pub fn parse(svg: &str, config: &Config) -> Result<Vec<Outline>, Error> {
    trace!("parse");
    let doc = Document::parse(svg)?;
    walk::walk_document(&doc, config)
}

/// Read an SVG file and convert it to the level text format.
///
/// The returned text is complete: nothing is produced if any part of the
/// document fails to convert.
pub fn convert_file<P: AsRef<FilePath>>(path: P, config: &Config) -> Result<String, Error> {
    let path = path.as_ref();
    trace!("convert_file: {}", path.display());
    let doc = Document::open(path)?;
    let outlines = walk::walk_document(&doc, config)?;
    Ok(emit(&outlines, &path.display().to_string(), config.mode))
}
