//! Conversion of outlines into line segments and the level text format.

use std::fmt::Write;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "csv")]
use crate::error::Error;
use crate::{ExportMode, Outline, Point};

/// A straight line between two consecutive points of an outline.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub name: Option<String>,
}

/// Split outlines into segments.
///
/// Outlines are open polylines: no segment connects the last point back to
/// the first one, and outlines with less than two points yield nothing.
pub fn segments(outlines: &[Outline]) -> Vec<Segment> {
    outlines
        .iter()
        .flat_map(|outline| {
            outline.points.windows(2).map(move |pair| Segment {
                from: pair[0],
                to: pair[1],
                name: outline.name.clone(),
            })
        })
        .collect()
}

fn selected(outlines: &[Outline], mode: ExportMode) -> &[Outline] {
    match mode {
        ExportMode::Named => outlines,
        ExportMode::FirstUnnamed => &outlines[..outlines.len().min(1)],
    }
}

fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render the `Level { ... }` block for the given outlines.
///
/// `source` is only used for the header comment.
pub fn emit(outlines: &[Outline], source: &str, mode: ExportMode) -> String {
    let segments = segments(selected(outlines, mode));

    let mut out = String::with_capacity(32 + segments.len() * 48);
    let _ = writeln!(out, "-- exported from {}", source);
    out.push_str("Level {\n");
    for Segment { from, to, name } in &segments {
        let _ = write!(out, "    {{ {:?}, {:?}, {:?}, {:?}", from.x, from.y, to.x, to.y);
        if mode == ExportMode::Named {
            let _ = write!(out, ", \"{}\"", escape(name.as_deref().unwrap_or("")));
        }
        out.push_str(" },\n");
    }
    out.push_str("}\n");
    out
}

/// Write the segments as CSV records, preceded by a header row.
#[cfg(feature = "csv")]
pub fn write_csv<W: std::io::Write>(
    outlines: &[Outline],
    mode: ExportMode,
    writer: W,
) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    match mode {
        ExportMode::Named => wtr.write_record(&["x0", "y0", "x1", "y1", "name"])?,
        ExportMode::FirstUnnamed => wtr.write_record(&["x0", "y0", "x1", "y1"])?,
    }
    for segment in segments(selected(outlines, mode)) {
        let mut record = vec![
            segment.from.x.to_string(),
            segment.from.y.to_string(),
            segment.to.x.to_string(),
            segment.to.y.to_string(),
        ];
        if mode == ExportMode::Named {
            record.push(segment.name.unwrap_or_default());
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline(name: Option<&str>, raw: &[(f64, f64)]) -> Outline {
        Outline {
            name: name.map(str::to_string),
            points: raw.iter().copied().map(Point::from).collect(),
        }
    }

    #[test]
    fn test_segments_open_polyline() {
        let outlines = vec![outline(Some("wall"), &[(0., 0.), (10., 0.), (10., 10.)])];
        let result = segments(&outlines);
        assert_eq!(
            result,
            vec![
                Segment {
                    from: (0., 0.).into(),
                    to: (10., 0.).into(),
                    name: Some("wall".into()),
                },
                Segment {
                    from: (10., 0.).into(),
                    to: (10., 10.).into(),
                    name: Some("wall".into()),
                },
            ]
        );
    }

    #[test]
    fn test_segments_degenerate() {
        let outlines = vec![outline(None, &[(5., 5.)]), outline(None, &[])];
        assert!(segments(&outlines).is_empty());
    }

    #[test]
    fn test_emit_named() {
        let outlines = vec![
            outline(Some("floor"), &[(0., 0.), (10., 0.5)]),
            outline(None, &[(1., 2.), (3., 4.), (5., 6.)]),
        ];
        let text = emit(&outlines, "level1.svg", ExportMode::Named);
        assert_eq!(
            text,
            "-- exported from level1.svg\n\
             Level {\n    \
             { 0.0, 0.0, 10.0, 0.5, \"floor\" },\n    \
             { 1.0, 2.0, 3.0, 4.0, \"\" },\n    \
             { 3.0, 4.0, 5.0, 6.0, \"\" },\n\
             }\n"
        );
    }

    #[test]
    fn test_emit_first_unnamed() {
        let outlines = vec![
            outline(Some("floor"), &[(0., 0.), (-2.25, 1.)]),
            outline(Some("ceiling"), &[(1., 2.), (3., 4.)]),
        ];
        let text = emit(&outlines, "level1.svg", ExportMode::FirstUnnamed);
        assert_eq!(
            text,
            "-- exported from level1.svg\nLevel {\n    { 0.0, 0.0, -2.25, 1.0 },\n}\n"
        );
    }

    #[test]
    fn test_emit_empty() {
        for &mode in &[ExportMode::Named, ExportMode::FirstUnnamed] {
            assert_eq!(emit(&[], "x.svg", mode), "-- exported from x.svg\nLevel {\n}\n");
        }
    }

    #[test]
    fn test_emit_escapes_name() {
        let outlines = vec![outline(Some(r#"say "hi" \o/"#), &[(0., 0.), (1., 1.)])];
        let text = emit(&outlines, "x.svg", ExportMode::Named);
        assert!(text.contains(r#""say \"hi\" \\o/""#), "{}", text);
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_write_csv() {
        let outlines = vec![outline(Some("a"), &[(0., 0.), (1.5, 2.), (3., 4.)])];
        let mut buf = Vec::new();
        write_csv(&outlines, ExportMode::Named, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "x0,y0,x1,y1,name\n0,0,1.5,2,a\n1.5,2,3,4,a\n"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let segment = Segment {
            from: (1., 2.).into(),
            to: (3., 4.).into(),
            name: None,
        };
        let json = serde_json::to_string(&segment).unwrap();
        let segment2: Segment = serde_json::from_str(&json).unwrap();
        assert_eq!(segment, segment2);
    }
}
