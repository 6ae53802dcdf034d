//! Depth-first traversal of the document, accumulating transforms.

use log::{debug, warn};

use crate::document::{Document, Group, Node, PathElement};
use crate::error::Error;
use crate::path::flatten_with;
use crate::transform::AffineTransform;
use crate::{Config, Outline};

fn describe(tag: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("<{} id=\"{}\">", tag, id),
        None => format!("<{}>", tag),
    }
}

/// Combine the parent transform with the element's own `transform`
/// attribute, if any.
fn effective_transform(
    parent: &AffineTransform,
    attr: Option<&str>,
    tag: &str,
    id: Option<&str>,
) -> Result<AffineTransform, Error> {
    match attr {
        Some(attr) => {
            let local = AffineTransform::parse(attr).map_err(|e| e.within(describe(tag, id)))?;
            Ok(parent.compose(&local))
        }
        None => Ok(*parent),
    }
}

/// Visit `nodes` in conversion order: all groups first, then all paths,
/// each in document order.
fn walk_children(
    nodes: &[Node],
    xform: &AffineTransform,
    label: Option<&str>,
    config: &Config,
    outlines: &mut Vec<Outline>,
) -> Result<(), Error> {
    let groups = nodes.iter().filter(|node| matches!(node, Node::Group(_)));
    let paths = nodes.iter().filter(|node| matches!(node, Node::Path(_)));
    for node in groups.chain(paths) {
        walk(node, xform, label, config, outlines)?;
    }
    Ok(())
}

/// Convert one node (and its subtree) into outlines appended to `outlines`.
///
/// `label` is the label of the group directly containing `node`.
pub fn walk(
    node: &Node,
    parent: &AffineTransform,
    label: Option<&str>,
    config: &Config,
    outlines: &mut Vec<Outline>,
) -> Result<(), Error> {
    match node {
        Node::Group(Group {
            id,
            label: group_label,
            transform,
            children,
        }) => {
            debug!("walk: group {:?}", id);
            let xform = effective_transform(parent, transform.as_deref(), "g", id.as_deref())?;
            walk_children(children, &xform, group_label.as_deref(), config, outlines)
        }
        Node::Path(PathElement { id, d, transform }) => {
            let d = match d {
                Some(d) => d,
                None => {
                    warn!("walk: skipping {} without path data", describe("path", id.as_deref()));
                    return Ok(());
                }
            };
            debug!("walk: path {:?}", id);
            let xform = effective_transform(parent, transform.as_deref(), "path", id.as_deref())?;
            let points = flatten_with(d, config)
                .map_err(|e| e.within(describe("path", id.as_deref())))?
                .into_iter()
                .map(|p| xform.apply(p))
                .collect();
            outlines.push(Outline {
                points,
                name: label.filter(|l| !l.is_empty()).map(str::to_string),
            });
            Ok(())
        }
    }
}

/// Convert every path of the document into an outline in root coordinates.
pub fn walk_document(doc: &Document, config: &Config) -> Result<Vec<Outline>, Error> {
    let mut outlines = Vec::new();
    walk_children(
        &doc.nodes,
        &AffineTransform::identity(),
        None,
        config,
        &mut outlines,
    )?;
    debug!("walk_document: {} outlines", outlines.len());
    Ok(outlines)
}
