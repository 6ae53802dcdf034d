//! Loading of the `<g>` / `<path>` hierarchy of an SVG document.

use std::fs;
use std::path::Path as FilePath;
use std::str;

use log::{debug, trace};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};

use crate::error::Error;

const ID_ATTR: &[u8] = b"id";
const D_ATTR: &[u8] = b"d";
const TRANSFORM_ATTR: &[u8] = b"transform";
/// Attribute holding the human readable layer / group name.
const LABEL_ATTR: &[u8] = b"inkscape:label";

/// A `<g>` element with the children relevant for the conversion.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Group {
    pub id: Option<String>,
    pub label: Option<String>,
    pub transform: Option<String>,
    pub children: Vec<Node>,
}

/// A `<path>` element.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct PathElement {
    pub id: Option<String>,
    pub d: Option<String>,
    pub transform: Option<String>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Node {
    Group(Group),
    Path(PathElement),
}

/// The groups and paths found directly below the root `<svg>` element.
///
/// Every other element, including its whole subtree, is dropped while
/// loading.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Document {
    pub nodes: Vec<Node>,
}

/// Element currently open while reading the XML event stream.
enum Frame {
    Svg(Vec<Node>),
    Group(Group),
    Path(PathElement),
    Ignored,
}

impl Frame {
    fn accepts_children(&self) -> bool {
        matches!(self, Frame::Svg(_) | Frame::Group(_))
    }

    fn push(&mut self, node: Node) {
        match self {
            Frame::Svg(nodes) => nodes.push(node),
            Frame::Group(group) => group.children.push(node),
            Frame::Path(_) | Frame::Ignored => {}
        }
    }
}

fn attr_value(attr: &Attribute) -> Result<String, Error> {
    let value = attr
        .unescaped_value()
        .map_err(|e| Error::SvgParse(format!("Invalid attribute value: {}", e)))?;
    str::from_utf8(&value)
        .map(str::to_string)
        .map_err(|e| Error::SvgParse(format!("Attribute value is not UTF-8: {}", e)))
}

/// Read the requested attributes of an element. If an attribute occurs
/// multiple times, the first occurrence wins.
fn read_attrs<const N: usize>(
    e: &BytesStart,
    keys: [&[u8]; N],
) -> Result<[Option<String>; N], Error> {
    let mut values: [Option<String>; N] = [(); N].map(|_| None);
    let mut attrs = e.attributes();
    attrs.with_checks(false);
    for attr in attrs {
        let attr = attr.map_err(|e| Error::SvgParse(format!("Invalid attribute: {}", e)))?;
        if let Some(idx) = keys.iter().position(|key| *key == attr.key) {
            if values[idx].is_none() {
                values[idx] = Some(attr_value(&attr)?);
            }
        }
    }
    Ok(values)
}

fn read_group(e: &BytesStart) -> Result<Group, Error> {
    let [id, label, transform] = read_attrs(e, [ID_ATTR, LABEL_ATTR, TRANSFORM_ATTR])?;
    trace!("read_group: id={:?} label={:?}", id, label);
    Ok(Group {
        id,
        label,
        transform,
        children: Vec::new(),
    })
}

fn read_path(e: &BytesStart) -> Result<PathElement, Error> {
    let [id, d, transform] = read_attrs(e, [ID_ATTR, D_ATTR, TRANSFORM_ATTR])?;
    trace!("read_path: id={:?}", id);
    Ok(PathElement { id, d, transform })
}

impl Document {
    /// Read an SVG file from disk.
    pub fn open<P: AsRef<FilePath>>(path: P) -> Result<Self, Error> {
        let svg = fs::read_to_string(path)?;
        Self::parse(&svg)
    }

    /// Parse an SVG string.
    pub fn parse(svg: &str) -> Result<Self, Error> {
        trace!("Document::parse");

        let mut reader = quick_xml::Reader::from_str(svg);
        reader.trim_text(true);

        let mut nodes = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut buf = Vec::new();
        loop {
            match reader.read_event(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let frame = Self::open_frame(e, stack.last())?;
                    stack.push(frame);
                }
                Ok(Event::Empty(ref e)) => {
                    let frame = Self::open_frame(e, stack.last())?;
                    Self::close_frame(frame, &mut stack, &mut nodes);
                }
                Ok(Event::End(_)) => {
                    let frame = stack.pop().ok_or_else(|| {
                        Error::SvgParse("Closing tag without matching opening tag".into())
                    })?;
                    Self::close_frame(frame, &mut stack, &mut nodes);
                }
                Ok(Event::Eof) => {
                    trace!("Document::parse: EOF");
                    break;
                }
                Ok(_) => {}
                Err(e) => return Err(Error::SvgParse(format!("Error when parsing XML: {}", e))),
            }

            buf.clear();
        }

        if !stack.is_empty() {
            return Err(Error::SvgParse("Unexpected end of document".into()));
        }

        debug!("Document::parse: {} top-level nodes", nodes.len());
        Ok(Self { nodes })
    }

    fn open_frame(e: &BytesStart, parent: Option<&Frame>) -> Result<Frame, Error> {
        let frame = match (e.local_name(), parent) {
            (b"svg", None) => Frame::Svg(Vec::new()),
            (b"g", Some(parent)) if parent.accepts_children() => Frame::Group(read_group(e)?),
            (b"path", Some(parent)) if parent.accepts_children() => Frame::Path(read_path(e)?),
            _ => Frame::Ignored,
        };
        Ok(frame)
    }

    fn close_frame(frame: Frame, stack: &mut Vec<Frame>, nodes: &mut Vec<Node>) {
        let node = match frame {
            Frame::Svg(children) => {
                nodes.extend(children);
                return;
            }
            Frame::Group(group) => Node::Group(group),
            Frame::Path(path) => Node::Path(path),
            Frame::Ignored => return,
        };
        if let Some(parent) = stack.last_mut() {
            parent.push(node);
        }
    }
}
