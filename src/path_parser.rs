//! Parser for path data in SVG syntax.

use std::str;

use crate::error::{ErrorKind, ParseError};
use crate::path_builder::*;
use crate::point::Point;

// Token, Lexer and LexError are public for the benchmarks.

#[derive(Debug, PartialEq, Copy, Clone)]
pub enum Token {
    Number(f64),
    Flag(bool),
    Command(u8),
    Comma,
}

use crate::path_parser::Token::{Comma, Command, Flag, Number};

#[derive(Debug, PartialEq, Copy, Clone)]
pub enum LexError {
    ParseFloatError,
    UnexpectedByte(u8),
    UnexpectedEof,
}

/// Splits path data into tokens, each paired with the byte offset where it starts.
#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    flags_required: u8,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            input: input.as_bytes(),
            pos: 0,
            flags_required: 0,
        }
    }

    /// Makes the next two `0` or `1` digits come out as `Flag` tokens.
    ///
    /// Only the parser knows when an arc's flags are due; in that position
    /// "10" is two flags and not the number ten.
    pub fn require_flags(&mut self) {
        self.flags_required = 2;
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_if(&mut self, pred: impl Fn(u8) -> bool) -> bool {
        match self.peek() {
            Some(c) if pred(c) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn skip_while(&mut self, pred: impl Fn(u8) -> bool) -> bool {
        let start = self.pos;
        while self.skip_if(&pred) {}
        self.pos > start
    }

    fn skip_sign(&mut self) {
        self.skip_if(|c| c == b'-' || c == b'+');
    }

    fn number(&mut self, start: usize) -> Result<Token, LexError> {
        self.skip_sign();
        let int_digits = self.skip_while(|c| c.is_ascii_digit());
        self.skip_if(|c| c == b'.');
        let frac_digits = self.skip_while(|c| c.is_ascii_digit());

        if !int_digits && !frac_digits {
            return Err(self
                .peek()
                .map_or(LexError::UnexpectedEof, LexError::UnexpectedByte));
        }

        if self.skip_if(|c| c == b'e' || c == b'E') {
            self.skip_sign();
            self.skip_while(|c| c.is_ascii_digit());
        }

        // Only ASCII bytes were consumed, so this is valid UTF-8.
        str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| LexError::ParseFloatError)?
            .parse::<f64>()
            .map(Number)
            .map_err(|_| LexError::ParseFloatError)
    }
}

impl Iterator for Lexer<'_> {
    type Item = (usize, Result<Token, LexError>);

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_while(|c| c.is_ascii_whitespace());

        let pos = self.pos;
        let c = self.peek()?;

        let token = match c {
            b',' => {
                self.pos += 1;
                Ok(Comma)
            }

            c if c.is_ascii_alphabetic() => {
                self.pos += 1;
                Ok(Command(c))
            }

            b'0' | b'1' if self.flags_required > 0 => {
                self.flags_required -= 1;
                self.pos += 1;
                Ok(Flag(c == b'1'))
            }

            c if self.flags_required > 0 && c.is_ascii_digit() => {
                self.pos += 1;
                Err(LexError::UnexpectedByte(c))
            }

            c if c.is_ascii_digit() || matches!(c, b'-' | b'+' | b'.') => self.number(pos),

            c => {
                self.pos += 1;
                Err(LexError::UnexpectedByte(c))
            }
        };

        Some((pos, token))
    }
}

/// A command's arguments ran out before they were complete.
///
/// The parser turns this into [`ErrorKind::MissingNumbers`] for the command letter
/// whose arguments were being read.
struct MissingArgs;

/// Single-pass parser that feeds path data into a [`PathBuilder`].
///
/// The grammar is the one for SVG path data, except that any command may
/// come first (drawing starts at the origin) and numbers right after a
/// closepath start an implicit moveto.  Commas and whitespace between
/// numbers are optional, so `M-10,20-30-40` reads as `M -10 20 -30 -40`
/// and `M.1-2,3E2-4` as `M 0.1 -2 300 -4`.
pub struct PathParser<'b> {
    path_str: &'b str,
    tokens: Lexer<'b>,
    lookahead: Option<(usize, Result<Token, LexError>)>,

    builder: &'b mut PathBuilder,

    current: Point,

    /// Second control point of the last cubic, mirrored by `S`.
    cubic_reflection: Point,

    /// Control point of the last quadratic, mirrored by `T`.
    quadratic_reflection: Point,

    /// Where the last moveto went; closepath returns here.
    subpath_start: Point,
}

impl<'b> PathParser<'b> {
    pub fn new(builder: &'b mut PathBuilder, path_str: &'b str) -> PathParser<'b> {
        let mut tokens = Lexer::new(path_str);
        let lookahead = tokens.next();

        PathParser {
            path_str,
            tokens,
            lookahead,
            builder,
            current: Point::ZERO,
            cubic_reflection: Point::ZERO,
            quadratic_reflection: Point::ZERO,
            subpath_start: Point::ZERO,
        }
    }

    fn bump(&mut self) {
        self.lookahead = self.tokens.next();
    }

    /// Consumes the lookahead token if `want` accepts it; otherwise leaves
    /// the stream untouched.
    fn take<T>(&mut self, want: impl Fn(Token) -> Option<T>) -> Result<T, MissingArgs> {
        match self.lookahead {
            Some((_, Ok(token))) => {
                let value = want(token).ok_or(MissingArgs)?;
                self.bump();
                Ok(value)
            }
            _ => Err(MissingArgs),
        }
    }

    fn match_number(&mut self) -> Result<f64, MissingArgs> {
        self.take(|t| match t {
            Number(n) => Some(n),
            _ => None,
        })
    }

    fn match_flag(&mut self) -> Result<bool, MissingArgs> {
        self.eat_optional_comma();
        self.take(|t| match t {
            Flag(f) => Some(f),
            _ => None,
        })
    }

    /// Reads an arc's x-axis rotation and the two flags after it.
    fn match_number_and_flags(&mut self) -> Result<(f64, bool, bool), MissingArgs> {
        let n = self.peek_number().ok_or(MissingArgs)?;

        // The lexer has to switch to flags before it reads past the number.
        self.tokens.require_flags();
        self.bump();

        let large_arc = self.match_flag()?;
        let sweep = self.match_flag()?;

        Ok((n, large_arc, sweep))
    }

    fn match_comma(&mut self) -> bool {
        self.take(|t| (t == Comma).then_some(())).is_ok()
    }

    fn eat_optional_comma(&mut self) {
        self.match_comma();
    }

    fn match_comma_number(&mut self) -> Result<f64, MissingArgs> {
        self.eat_optional_comma();
        self.match_number()
    }

    fn peek_command(&self) -> Option<u8> {
        match self.lookahead {
            Some((_, Ok(Command(c)))) => Some(c),
            _ => None,
        }
    }

    fn peek_number(&self) -> Option<f64> {
        match self.lookahead {
            Some((_, Ok(Number(n)))) => Some(n),
            _ => None,
        }
    }

    /// Converts a byte offset in the input into a 1-based character offset.
    fn char_position(&self, byte_pos: usize) -> usize {
        self.path_str
            .get(..byte_pos)
            .map_or(byte_pos, |s| s.chars().count())
            + 1
    }

    fn error_at(&self, byte_pos: usize, kind: ErrorKind) -> ParseError {
        ParseError::new(self.char_position(byte_pos), kind)
    }

    fn unknown_command_at(&self, byte_pos: usize) -> ParseError {
        let c = self
            .path_str
            .get(byte_pos..)
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);

        self.error_at(byte_pos, ErrorKind::UnknownCommand(c))
    }

    // This is the entry point for parsing a given blob of path data.
    // All the parsing just uses various match_* methods to consume tokens
    // and retrieve the values.
    pub fn parse(&mut self) -> Result<(), ParseError> {
        match self.lookahead {
            None => return Ok(()),
            Some((pos, _)) if self.peek_command().is_none() => {
                return Err(self.error_at(pos, ErrorKind::MissingCommand));
            }
            _ => (),
        }

        while let Some((pos, token)) = self.lookahead {
            match token {
                Ok(Command(c)) => {
                    self.bump();
                    self.command(c, pos)?;
                }

                _ => return Err(self.unknown_command_at(pos)),
            }
        }

        Ok(())
    }

    fn command(&mut self, c: u8, pos: usize) -> Result<(), ParseError> {
        let absolute = c.is_ascii_uppercase();

        let (count, result) = match c.to_ascii_uppercase() {
            b'M' => (2, self.moveto_argument_sequence(absolute)),
            b'Z' => (2, self.closepath(absolute)),
            b'L' => (2, self.lineto_argument_sequence(absolute)),
            b'H' => (1, self.horizontal_lineto_argument_sequence(absolute)),
            b'V' => (1, self.vertical_lineto_argument_sequence(absolute)),
            b'C' => (6, self.curveto_argument_sequence(absolute)),
            b'S' => (4, self.smooth_curveto_argument_sequence(absolute)),
            b'Q' => (4, self.quadratic_curveto_argument_sequence(absolute)),
            b'T' => (2, self.smooth_quadratic_curveto_argument_sequence(absolute)),
            b'A' => (7, self.elliptical_arc_argument_sequence(absolute)),
            _ => return Err(self.unknown_command_at(pos)),
        };

        result.map_err(|MissingArgs| {
            self.error_at(
                pos,
                ErrorKind::MissingNumbers {
                    count,
                    command: char::from(c),
                },
            )
        })
    }

    fn coordinate_pair(&mut self) -> Result<Point, MissingArgs> {
        Ok(Point::new(self.match_number()?, self.match_comma_number()?))
    }

    /// Reads a coordinate pair, relative to the current point unless `absolute`.
    fn point(&mut self, absolute: bool) -> Result<Point, MissingArgs> {
        let p = self.coordinate_pair()?;

        if absolute {
            Ok(p)
        } else {
            Ok(p + self.current)
        }
    }

    fn set_current_point(&mut self, p: Point) {
        self.current = p;
        self.cubic_reflection = p;
        self.quadratic_reflection = p;
    }

    fn set_cubic_reflection_and_current_point(&mut self, pt2: Point, to: Point) {
        self.cubic_reflection = pt2;
        self.current = to;
        self.quadratic_reflection = to;
    }

    fn set_quadratic_reflection_and_current_point(&mut self, pt1: Point, to: Point) {
        self.quadratic_reflection = pt1;
        self.current = to;
        self.cubic_reflection = to;
    }

    fn emit_move_to(&mut self, p: Point) {
        self.set_current_point(p);
        self.subpath_start = p;

        self.builder.move_to(p.x, p.y);
    }

    fn emit_line_to(&mut self, p: Point) {
        self.set_current_point(p);

        self.builder.line_to(p.x, p.y);
    }

    fn emit_curve_to(&mut self, pt1: Point, pt2: Point, to: Point) {
        self.set_cubic_reflection_and_current_point(pt2, to);

        self.builder.curve_to(pt1.x, pt1.y, pt2.x, pt2.y, to.x, to.y);
    }

    fn emit_quadratic_curve_to(&mut self, pt1: Point, to: Point) {
        self.set_quadratic_reflection_and_current_point(pt1, to);

        self.builder.quad_to(pt1.x, pt1.y, to.x, to.y);
    }

    fn emit_arc(
        &mut self,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: LargeArc,
        sweep: Sweep,
        to: Point,
    ) {
        self.set_current_point(to);

        self.builder
            .arc_to(rx, ry, x_axis_rotation, large_arc, sweep, to.x, to.y);
    }

    fn emit_close_path(&mut self) {
        let start = self.subpath_start;
        self.set_current_point(start);

        self.builder.close_path();
    }

    fn should_break_arg_sequence(&mut self) -> bool {
        if self.match_comma() {
            // if there is a comma (indicating we should continue to loop), eat the comma
            // so we're ready at the next start of the loop to process the next token.
            false
        } else {
            // continue to process args in the sequence unless the next token is a comma
            self.peek_number().is_none()
        }
    }

    fn moveto_argument_sequence(&mut self, absolute: bool) -> Result<(), MissingArgs> {
        let p = self.point(absolute)?;
        self.emit_move_to(p);

        if self.match_comma() || self.peek_number().is_some() {
            self.lineto_argument_sequence(absolute)
        } else {
            Ok(())
        }
    }

    fn closepath(&mut self, absolute: bool) -> Result<(), MissingArgs> {
        self.emit_close_path();

        if self.peek_number().is_some() {
            self.moveto_argument_sequence(absolute)
        } else {
            Ok(())
        }
    }

    fn lineto_argument_sequence(&mut self, absolute: bool) -> Result<(), MissingArgs> {
        loop {
            let p = self.point(absolute)?;
            self.emit_line_to(p);

            if self.should_break_arg_sequence() {
                break;
            }
        }

        Ok(())
    }

    fn horizontal_lineto_argument_sequence(&mut self, absolute: bool) -> Result<(), MissingArgs> {
        loop {
            let mut x = self.match_number()?;

            if !absolute {
                x += self.current.x;
            }

            let y = self.current.y;

            self.emit_line_to(Point::new(x, y));

            if self.should_break_arg_sequence() {
                break;
            }
        }

        Ok(())
    }

    fn vertical_lineto_argument_sequence(&mut self, absolute: bool) -> Result<(), MissingArgs> {
        loop {
            let mut y = self.match_number()?;

            if !absolute {
                y += self.current.y;
            }

            let x = self.current.x;

            self.emit_line_to(Point::new(x, y));

            if self.should_break_arg_sequence() {
                break;
            }
        }

        Ok(())
    }

    fn curveto_argument_sequence(&mut self, absolute: bool) -> Result<(), MissingArgs> {
        loop {
            let pt1 = self.point(absolute)?;

            self.eat_optional_comma();
            let pt2 = self.point(absolute)?;

            self.eat_optional_comma();
            let to = self.point(absolute)?;

            self.emit_curve_to(pt1, pt2, to);

            if self.should_break_arg_sequence() {
                break;
            }
        }

        Ok(())
    }

    fn smooth_curveto_argument_sequence(&mut self, absolute: bool) -> Result<(), MissingArgs> {
        loop {
            let pt2 = self.point(absolute)?;
            self.eat_optional_comma();
            let to = self.point(absolute)?;

            let pt1 = self.current + self.current - self.cubic_reflection;

            self.emit_curve_to(pt1, pt2, to);

            if self.should_break_arg_sequence() {
                break;
            }
        }

        Ok(())
    }

    fn quadratic_curveto_argument_sequence(&mut self, absolute: bool) -> Result<(), MissingArgs> {
        loop {
            let pt1 = self.point(absolute)?;
            self.eat_optional_comma();
            let to = self.point(absolute)?;

            self.emit_quadratic_curve_to(pt1, to);

            if self.should_break_arg_sequence() {
                break;
            }
        }

        Ok(())
    }

    fn smooth_quadratic_curveto_argument_sequence(
        &mut self,
        absolute: bool,
    ) -> Result<(), MissingArgs> {
        loop {
            let to = self.point(absolute)?;

            let pt1 = self.current + self.current - self.quadratic_reflection;

            self.emit_quadratic_curve_to(pt1, to);

            if self.should_break_arg_sequence() {
                break;
            }
        }

        Ok(())
    }

    fn elliptical_arc_argument_sequence(&mut self, absolute: bool) -> Result<(), MissingArgs> {
        loop {
            let rx = self.match_number()?;
            let ry = self.match_comma_number()?;

            self.eat_optional_comma();
            let (x_axis_rotation, f1, f2) = self.match_number_and_flags()?;

            let large_arc = LargeArc(f1);
            let sweep = Sweep::from_flag(f2);

            self.eat_optional_comma();

            let to = self.point(absolute)?;

            self.emit_arc(rx, ry, x_axis_rotation, large_arc, sweep, to);

            if self.should_break_arg_sequence() {
                break;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;

    fn find_error_pos(s: &str) -> Option<usize> {
        s.find('^').map(|i| i + 1)
    }

    fn test_parser(
        path_str: &str,
        error_pos_str: &str,
        expected_commands: &[PathCommand],
        expected_error_kind: Option<ErrorKind>,
    ) {
        let result = Path::parse(path_str);

        match (find_error_pos(error_pos_str), expected_error_kind) {
            (Some(position), Some(kind)) => {
                assert_eq!(result.err(), Some(ParseError { position, kind }));
            }

            (None, None) => {
                let path = result.unwrap();
                let commands = path.iter().collect::<Vec<_>>();
                assert_eq!(expected_commands, commands.as_slice());
            }

            _ => panic!("malformed test case"),
        }
    }

    fn moveto(x: f64, y: f64) -> PathCommand {
        PathCommand::MoveTo(Point::new(x, y))
    }

    fn lineto(x: f64, y: f64) -> PathCommand {
        PathCommand::LineTo(Point::new(x, y))
    }

    fn curveto(x2: f64, y2: f64, x3: f64, y3: f64, x4: f64, y4: f64) -> PathCommand {
        PathCommand::CurveTo(CubicBezierCurve {
            pt1: Point::new(x2, y2),
            pt2: Point::new(x3, y3),
            to: Point::new(x4, y4),
        })
    }

    fn quadto(x1: f64, y1: f64, x: f64, y: f64) -> PathCommand {
        PathCommand::QuadTo(QuadraticBezierCurve {
            pt1: Point::new(x1, y1),
            to: Point::new(x, y),
        })
    }

    fn closepath() -> PathCommand {
        PathCommand::ClosePath
    }

    fn missing(count: usize, command: char) -> Option<ErrorKind> {
        Some(ErrorKind::MissingNumbers { count, command })
    }

    fn arc_flags(path_str: &str) -> Vec<(bool, bool)> {
        Path::parse(path_str)
            .unwrap()
            .iter()
            .filter_map(|cmd| match cmd {
                PathCommand::Arc(a) => Some((a.large_arc.0, a.sweep == Sweep::Positive)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn handles_empty_data() {
        test_parser("", "", &Vec::<PathCommand>::new(), None);
        test_parser("   ", "", &Vec::<PathCommand>::new(), None);
    }

    #[test]
    fn handles_numbers() {
        test_parser("M 10 20", "", &vec![moveto(10.0, 20.0)], None);

        test_parser("M -10 -20", "", &vec![moveto(-10.0, -20.0)], None);

        test_parser("M .10 0.20", "", &vec![moveto(0.10, 0.20)], None);

        test_parser("M -.10 -0.20", "", &vec![moveto(-0.10, -0.20)], None);

        test_parser("M-.10-0.20", "", &vec![moveto(-0.10, -0.20)], None);

        test_parser("M10.5.50", "", &vec![moveto(10.5, 0.50)], None);

        test_parser("M.10.20", "", &vec![moveto(0.10, 0.20)], None);

        test_parser("M .10E1 .20e-4", "", &vec![moveto(1.0, 0.000020)], None);

        test_parser("M-.10E1-.20", "", &vec![moveto(-1.0, -0.20)], None);

        test_parser("M10.10E2 -0.20e3", "", &vec![moveto(1010.0, -200.0)], None);
    }

    #[test]
    fn detects_bogus_numbers() {
        test_parser("M+", "^", &[], missing(2, 'M'));

        test_parser("M-", "^", &[], missing(2, 'M'));

        test_parser("M+x", "^", &[], missing(2, 'M'));

        test_parser("M10e", "^", &[], missing(2, 'M'));

        test_parser("M10ex", "^", &[], missing(2, 'M'));

        test_parser("M10e-", "^", &[], missing(2, 'M'));

        test_parser("M10e+x", "^", &[], missing(2, 'M'));
    }

    #[test]
    fn handles_numbers_with_comma() {
        test_parser("M 10, 20", "", &vec![moveto(10.0, 20.0)], None);

        test_parser("M -10,-20", "", &vec![moveto(-10.0, -20.0)], None);

        test_parser("M.10    ,    0.20", "", &vec![moveto(0.10, 0.20)], None);
    }

    #[test]
    fn handles_relative_moveto_with_implicit_linetos() {
        test_parser(
            "m10 20 30 40,50 60",
            "",
            &vec![moveto(10.0, 20.0), lineto(40.0, 60.0), lineto(90.0, 120.0)],
            None,
        );
    }

    #[test]
    fn handles_absolute_moveto_moveto() {
        test_parser(
            "M10 20 M 30 40",
            "",
            &vec![moveto(10.0, 20.0), moveto(30.0, 40.0)],
            None,
        );
    }

    #[test]
    fn handles_relative_moveto_lineto_lineto_abs_lineto() {
        test_parser(
            "m10 20 30 40l30,40,50 60L200,300",
            "",
            &vec![
                moveto(10.0, 20.0),
                lineto(40.0, 60.0),
                lineto(70.0, 100.0),
                lineto(120.0, 160.0),
                lineto(200.0, 300.0),
            ],
            None,
        );
    }

    #[test]
    fn handles_horizontal_and_vertical_lineto() {
        test_parser(
            "M10 20 H30 40 h10 V5 v-5",
            "",
            &vec![
                moveto(10.0, 20.0),
                lineto(30.0, 20.0),
                lineto(40.0, 20.0),
                lineto(50.0, 20.0),
                lineto(50.0, 5.0),
                lineto(50.0, 0.0),
            ],
            None,
        );
    }

    #[test]
    fn handles_curveto() {
        test_parser(
            "M10 20 C 30,40 50 60-70,80,90 100,110 120,130,140",
            "",
            &vec![
                moveto(10.0, 20.0),
                curveto(30.0, 40.0, 50.0, 60.0, -70.0, 80.0),
                curveto(90.0, 100.0, 110.0, 120.0, 130.0, 140.0),
            ],
            None,
        );

        test_parser(
            "m10 20 c 30,40 50 60-70,80,90 100,110 120,130,140",
            "",
            &vec![
                moveto(10.0, 20.0),
                curveto(40.0, 60.0, 60.0, 80.0, -60.0, 100.0),
                curveto(30.0, 200.0, 50.0, 220.0, 70.0, 240.0),
            ],
            None,
        );
    }

    #[test]
    fn handles_smooth_curveto() {
        test_parser(
            "M10 20 S 30,40 50 60-70,80,90 100",
            "",
            &vec![
                moveto(10.0, 20.0),
                curveto(10.0, 20.0, 30.0, 40.0, 50.0, 60.0),
                curveto(70.0, 80.0, -70.0, 80.0, 90.0, 100.0),
            ],
            None,
        );

        test_parser(
            "m10 20 s 30,40 50 60-70,80,90 100",
            "",
            &vec![
                moveto(10.0, 20.0),
                curveto(10.0, 20.0, 40.0, 60.0, 60.0, 80.0),
                curveto(80.0, 100.0, -10.0, 160.0, 150.0, 180.0),
            ],
            None,
        );
    }

    #[test]
    fn handles_quadratic_curveto() {
        test_parser(
            "M10 20 Q30 40 50 60,70,80-90 100",
            "",
            &vec![
                moveto(10.0, 20.0),
                quadto(30.0, 40.0, 50.0, 60.0),
                quadto(70.0, 80.0, -90.0, 100.0),
            ],
            None,
        );

        test_parser(
            "m10 20 q 30,40 50 60-70,80 90 100",
            "",
            &vec![
                moveto(10.0, 20.0),
                quadto(40.0, 60.0, 60.0, 80.0),
                quadto(-10.0, 160.0, 150.0, 180.0),
            ],
            None,
        );
    }

    #[test]
    fn handles_smooth_quadratic_curveto() {
        // with no previous quadratic curve the control point is the current point
        test_parser(
            "M10 20 T30 40",
            "",
            &vec![moveto(10.0, 20.0), lineto(30.0, 40.0)],
            None,
        );

        test_parser(
            "M10 20 Q30 40 50 60 T90 60",
            "",
            &vec![
                moveto(10.0, 20.0),
                quadto(30.0, 40.0, 50.0, 60.0),
                quadto(70.0, 80.0, 90.0, 60.0),
            ],
            None,
        );

        test_parser(
            "m10 20 q 30,40 50 60t-70,80",
            "",
            &vec![
                moveto(10.0, 20.0),
                quadto(40.0, 60.0, 60.0, 80.0),
                quadto(80.0, 100.0, -10.0, 160.0),
            ],
            None,
        );
    }

    #[test]
    fn handles_elliptical_arc() {
        // no space required between arc flags
        assert_eq!(arc_flags("M 1 2 A 1 2 3 00 6 7"), vec![(false, false)]);
        // or after...
        assert_eq!(arc_flags("M 1 2 A 1 2 3 016 7"), vec![(false, true)]);
        // commas and whitespace are optionally allowed
        assert_eq!(arc_flags("M 1 2 A 1 2 3 10,6 7"), vec![(true, false)]);
        assert_eq!(arc_flags("M 1 2 A 1 2 3 1,16, 7"), vec![(true, true)]);
        assert_eq!(arc_flags("M 1 2 A 1 2 3 1,1 6 7"), vec![(true, true)]);
        assert_eq!(arc_flags("M 1 2 A 1 2 3 1 1 6 7"), vec![(true, true)]);
        assert_eq!(arc_flags("M 1 2 A 1 2 3 1 16 7"), vec![(true, true)]);
        assert_eq!(
            arc_flags("M 1 2 a 1 2 3 1 16 7 1 2 3 0 0 1 1"),
            vec![(true, true), (false, false)]
        );
    }

    #[test]
    fn handles_close_path() {
        test_parser("M10 20 Z", "", &vec![moveto(10.0, 20.0), closepath()], None);

        test_parser(
            "m10 20 30 40 m 50 60 70 80 90 100z",
            "",
            &vec![
                moveto(10.0, 20.0),
                lineto(40.0, 60.0),
                moveto(90.0, 120.0),
                lineto(160.0, 200.0),
                lineto(250.0, 300.0),
                closepath(),
            ],
            None,
        );
    }

    #[test]
    fn numbers_after_close_path_are_a_moveto() {
        test_parser(
            "M10 20 L30 40 Z 50 60 70 80",
            "",
            &vec![
                moveto(10.0, 20.0),
                lineto(30.0, 40.0),
                closepath(),
                moveto(50.0, 60.0),
                lineto(70.0, 80.0),
            ],
            None,
        );

        test_parser(
            "m10 20 l20 20 z 5 5",
            "",
            &vec![
                moveto(10.0, 20.0),
                lineto(30.0, 40.0),
                closepath(),
                moveto(15.0, 25.0),
            ],
            None,
        );
    }

    #[test]
    fn any_command_may_come_first() {
        test_parser(
            "  L10 20",
            "",
            &vec![moveto(0.0, 0.0), lineto(10.0, 20.0)],
            None,
        );

        test_parser(
            "z L10 20",
            "",
            &vec![
                moveto(0.0, 0.0),
                closepath(),
                moveto(0.0, 0.0),
                lineto(10.0, 20.0),
            ],
            None,
        );
    }

    #[test]
    fn path_should_start_with_command() {
        test_parser("5", "^", &[], Some(ErrorKind::MissingCommand));
        test_parser("  ,M10 10", "  ^", &[], Some(ErrorKind::MissingCommand));
    }

    #[test]
    fn moveto_args() {
        test_parser("MM", "^", &[], missing(2, 'M'));
        test_parser("M", "^", &[], missing(2, 'M'));
        test_parser("M0", "^", &[], missing(2, 'M'));
        test_parser("M0,", "^", &[], missing(2, 'M'));
        test_parser("M10 10 20", "^", &[], missing(2, 'M'));
    }

    #[test]
    fn lineto_args() {
        test_parser("M10 20 L", "       ^", &[], missing(2, 'L'));
        test_parser("M10 20 L30", "       ^", &[], missing(2, 'L'));
        test_parser("M10 20 L30,40,", "       ^", &[], missing(2, 'L'));
        test_parser("M10 20 h", "       ^", &[], missing(1, 'h'));
        test_parser("M10 20 v", "       ^", &[], missing(1, 'v'));
    }

    #[test]
    fn curveto_args() {
        test_parser("M10 20 C1 2 3 4 5", "       ^", &[], missing(6, 'C'));
        test_parser("M10 20 s1 2 3", "       ^", &[], missing(4, 's'));
        test_parser("M10 20 Q1 2 3", "       ^", &[], missing(4, 'Q'));
        test_parser("M10 20 T1", "       ^", &[], missing(2, 'T'));
    }

    #[test]
    fn elliptical_arc_args() {
        test_parser("M10-20A1", "      ^", &[], missing(7, 'A'));
        test_parser("M10-20A1 2 3", "      ^", &[], missing(7, 'A'));

        // no non 0|1 chars allowed for flags
        test_parser("M10-20A1 2 3 4", "      ^", &[], missing(7, 'A'));
        test_parser("M 1 2 A 1 2 3 1.0 0.0 6 7", "      ^", &[], missing(7, 'A'));

        test_parser("M10-20A1 2 3,1,1,6,7,", "      ^", &[], missing(7, 'A'));
    }

    #[test]
    fn unknown_commands() {
        test_parser("x", "^", &[], Some(ErrorKind::UnknownCommand('x')));
        test_parser("M10 10 L20 20 k5", "              ^", &[],
                    Some(ErrorKind::UnknownCommand('k')));
        test_parser("M10 10 #", "       ^", &[], Some(ErrorKind::UnknownCommand('#')));
    }

    #[test]
    fn positions_count_characters_not_bytes() {
        // 'é' is two bytes in UTF-8
        let err = Path::parse("M0 0 é").unwrap_err();
        assert_eq!(err.position, 6);
        assert_eq!(err.kind, ErrorKind::UnknownCommand('é'));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            Path::parse("MM").unwrap_err().to_string(),
            "bad path: 2 numbers should follow command 'M' at position 1"
        );
        assert_eq!(
            Path::parse("5").unwrap_err().to_string(),
            "bad path: path should start with command"
        );
        assert_eq!(
            Path::parse("L10 0 @").unwrap_err().to_string(),
            "bad path: unknown command '@' at position 7"
        );
    }

    #[test]
    fn bugs() {
        test_parser("M.. 1,0 0,100000", "^", &[], missing(2, 'M'));
    }
}
