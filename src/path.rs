//! Flattening of SVG path expressions (the `d` attribute) into points.
//!
//! Only straight line moves are supported: `M`, `m` and `L`. A `Z` / `z`
//! ends the path. Every other command is recognized but rejected, so that
//! unsupported geometry never turns into plausible looking garbage.

use std::fmt;
use std::iter::Peekable;

use log::trace;

use crate::error::Error;
use crate::{Config, Point};

/// The kind of a path command, independent of absolute/relative mode.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum PathCommand {
    MoveTo,
    LineTo,
    HorizontalLineTo,
    VerticalLineTo,
    CurveTo,
    SmoothCurveTo,
    Quadratic,
    SmoothQuadratic,
    EllipticalArc,
    ClosePath,
}

/// A single command letter of a path expression.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct CommandToken {
    pub command: PathCommand,
    /// Uppercase letters are absolute, lowercase ones relative.
    pub abs: bool,
}

impl CommandToken {
    /// Classify a path token. Returns `None` if the token is not a command
    /// letter.
    pub fn parse(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let letter = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let command = match letter.to_ascii_uppercase() {
            'M' => PathCommand::MoveTo,
            'L' => PathCommand::LineTo,
            'H' => PathCommand::HorizontalLineTo,
            'V' => PathCommand::VerticalLineTo,
            'C' => PathCommand::CurveTo,
            'S' => PathCommand::SmoothCurveTo,
            'Q' => PathCommand::Quadratic,
            'T' => PathCommand::SmoothQuadratic,
            'A' => PathCommand::EllipticalArc,
            'Z' => PathCommand::ClosePath,
            _ => return None,
        };
        Some(Self {
            command,
            abs: letter.is_ascii_uppercase(),
        })
    }

    pub fn letter(self) -> char {
        let upper = match self.command {
            PathCommand::MoveTo => 'M',
            PathCommand::LineTo => 'L',
            PathCommand::HorizontalLineTo => 'H',
            PathCommand::VerticalLineTo => 'V',
            PathCommand::CurveTo => 'C',
            PathCommand::SmoothCurveTo => 'S',
            PathCommand::Quadratic => 'Q',
            PathCommand::SmoothQuadratic => 'T',
            PathCommand::EllipticalArc => 'A',
            PathCommand::ClosePath => 'Z',
        };
        if self.abs {
            upper
        } else {
            upper.to_ascii_lowercase()
        }
    }
}

impl fmt::Display for CommandToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, PartialEq, Copy, Clone)]
enum Token<'a> {
    Command(CommandToken),
    Number(&'a str),
}

impl<'a> Token<'a> {
    fn classify(token: &'a str) -> Self {
        CommandToken::parse(token).map_or(Token::Number(token), Token::Command)
    }
}

fn tokenize<'a>(expr: &'a str) -> impl Iterator<Item = Token<'a>> + 'a {
    expr.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(Token::classify)
}

fn parse_number(token: &str) -> Result<f64, Error> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::MalformedPathData(format!("invalid number \"{}\"", token))),
    }
}

/// Consume the next coordinate pair of `cmd`.
///
/// Returns `Ok(None)` once the input is exhausted or the next token is a
/// command.
fn next_pair<'a, I>(tokens: &mut Peekable<I>, cmd: CommandToken) -> Result<Option<Point>, Error>
where
    I: Iterator<Item = Token<'a>>,
{
    let x = match tokens.peek() {
        Some(&Token::Number(x)) => parse_number(x)?,
        Some(Token::Command(_)) | None => return Ok(None),
    };
    tokens.next();
    match tokens.next() {
        Some(Token::Number(y)) => Ok(Some(Point::new(x, parse_number(y)?))),
        Some(Token::Command(next)) => Err(Error::MalformedPathData(format!(
            "\"{}\" found where the y coordinate of \"{}\" was expected",
            next, cmd
        ))),
        None => Err(Error::MalformedPathData(format!(
            "path ends in the middle of a coordinate pair of \"{}\"",
            cmd
        ))),
    }
}

/// Flatten a path expression using the default [`Config`].
pub fn flatten(expr: &str) -> Result<Vec<Point>, Error> {
    flatten_with(expr, &Config::default())
}

/// Flatten a path expression into absolute, untransformed points.
pub fn flatten_with(expr: &str, config: &Config) -> Result<Vec<Point>, Error> {
    trace!("flatten: {:?}", expr);
    let mut tokens = tokenize(expr).peekable();
    let mut points = Vec::new();

    while let Some(token) = tokens.next() {
        let cmd = match token {
            Token::Command(cmd) => cmd,
            Token::Number(n) => {
                return Err(Error::MalformedPathData(format!(
                    "coordinate \"{}\" outside of a command",
                    n
                )))
            }
        };
        match (cmd.command, cmd.abs) {
            (PathCommand::MoveTo, true) | (PathCommand::LineTo, true) => {
                trace!("flatten: {}", cmd);
                while let Some(pair) = next_pair(&mut tokens, cmd)? {
                    points.push(pair);
                }
            }
            (PathCommand::MoveTo, false) if config.relative_moveto => {
                trace!("flatten: {}", cmd);
                let mut current = Point::new(0.0, 0.0);
                while let Some(delta) = next_pair(&mut tokens, cmd)? {
                    current = Point::new(current.x + delta.x, current.y + delta.y);
                    points.push(current);
                }
            }
            (PathCommand::ClosePath, _) => {
                trace!("flatten: {}, dropping the rest of the path", cmd);
                break;
            }
            _ => return Err(Error::UnsupportedCommand(cmd.to_string())),
        }
    }

    trace!("flatten: {} points", points.len());
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn test_command_token() {
        assert_eq!(
            CommandToken::parse("M"),
            Some(CommandToken {
                command: PathCommand::MoveTo,
                abs: true
            })
        );
        assert_eq!(
            CommandToken::parse("a"),
            Some(CommandToken {
                command: PathCommand::EllipticalArc,
                abs: false
            })
        );
        assert_eq!(CommandToken::parse("X"), None);
        assert_eq!(CommandToken::parse("10"), None);
        assert_eq!(CommandToken::parse("Mm"), None);
        assert_eq!(CommandToken::parse(""), None);
        for letter in "MmLlHhVvCcSsQqTtAaZz".chars() {
            let token = CommandToken::parse(&letter.to_string()).unwrap();
            assert_eq!(token.letter(), letter);
        }
    }

    #[test]
    fn test_absolute() {
        let points = flatten("M 0,0 L 10,0 L 10,10 Z").unwrap();
        assert_eq!(points, self::points(&[(0., 0.), (10., 0.), (10., 10.)]));
    }

    #[test]
    fn test_implicit_pairs() {
        let points = flatten("M 113,35 40,35 L -39,49 40,49.5").unwrap();
        assert_eq!(
            points,
            self::points(&[(113., 35.), (40., 35.), (-39., 49.), (40., 49.5)])
        );
    }

    #[test]
    fn test_space_separated() {
        let points = flatten("M 10 20\n\tL 30 40").unwrap();
        assert_eq!(points, self::points(&[(10., 20.), (30., 40.)]));
    }

    #[test]
    fn test_relative_moveto() {
        let points = flatten("m 10,10 5,5").unwrap();
        assert_eq!(points, self::points(&[(10., 10.), (15., 15.)]));
    }

    #[test]
    fn test_relative_moveto_restarts_at_origin() {
        // Every `m` starts from (0,0) instead of the previous point
        let points = flatten("M 100,100 m 1,2 1,1").unwrap();
        assert_eq!(points, self::points(&[(100., 100.), (1., 2.), (2., 3.)]));
    }

    #[test]
    fn test_relative_moveto_disabled() {
        let config = Config {
            relative_moveto: false,
            ..Config::default()
        };
        match flatten_with("m 10,10 5,5", &config) {
            Err(Error::UnsupportedCommand(token)) => assert_eq!(token, "m"),
            other => panic!("Unexpected result: {:?}", other),
        }
        assert!(flatten_with("M 10,10 5,5", &config).is_ok());
    }

    #[test]
    fn test_close_path_stops_parsing() {
        let points = flatten("M 1,1 2,2 z C this is never looked at").unwrap();
        assert_eq!(points, self::points(&[(1., 1.), (2., 2.)]));
    }

    #[test]
    fn test_revisited_point_kept() {
        let points = flatten("M 0,0 L 1,0 0,0").unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], points[2]);
    }

    #[test]
    fn test_unsupported_curve() {
        match flatten("M 0,0 C 1,1 2,2 3,3") {
            Err(Error::UnsupportedCommand(token)) => assert_eq!(token, "C"),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_relative_lineto() {
        for expr in &["M 0,0 l 1,1", "M 0,0 H 5", "M 0,0 v 5", "M 0,0 A 1 1 0 0 1 3 3"] {
            assert!(
                matches!(flatten(expr), Err(Error::UnsupportedCommand(_))),
                "{}",
                expr
            );
        }
    }

    #[test]
    fn test_malformed_number() {
        match flatten("M 0,0 L 1,abc") {
            Err(Error::MalformedPathData(msg)) => assert!(msg.contains("abc"), "{}", msg),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_glued_command_is_malformed() {
        assert!(matches!(
            flatten("M10,10 L20,20"),
            Err(Error::MalformedPathData(_))
        ));
    }

    #[test]
    fn test_odd_coordinate_count() {
        assert!(matches!(
            flatten("M 0,0 10"),
            Err(Error::MalformedPathData(_))
        ));
        assert!(matches!(
            flatten("M 0,0 10 L 1,1"),
            Err(Error::MalformedPathData(_))
        ));
    }

    #[test]
    fn test_number_before_command() {
        assert!(matches!(flatten("0,0 L 1,1"), Err(Error::MalformedPathData(_))));
    }

    #[test]
    fn test_empty() {
        assert!(flatten("").unwrap().is_empty());
        assert!(flatten("M").unwrap().is_empty());
    }

    #[test]
    fn test_non_finite_numbers() {
        for (expr, token) in &[
            ("M 1e400,0", "1e400"),
            ("M 0,0 L nan,1", "nan"),
            ("M 0,0 L 1,inf", "inf"),
            ("M -infinity,0", "-infinity"),
        ] {
            match flatten(expr) {
                Err(Error::MalformedPathData(msg)) => assert!(msg.contains(token), "{}", msg),
                other => panic!("{}: unexpected result: {:?}", expr, other),
            }
        }
    }

    #[test]
    fn test_single_point() {
        assert_eq!(flatten("M 5,5").unwrap(), points(&[(5., 5.)]));
    }
}
