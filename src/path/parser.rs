use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0, satisfy},
    combinator::{eof, map, opt, value},
    error::{ParseError, context},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, preceded, separated_pair},
};
use nom_language::error::VerboseError;

use super::{Segment, Spath};

type PResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

// Accepted:
//   ""                                            the whole document
//   /metadata/name                                plain JSON pointer
//   /metadata/annotations/app.kubernetes.io~1name ~1 and ~0 escapes
//   /data/key[0]                                  '[' inside a token is literal
//   /data/~2name=x]                               ~2 encodes a leading '['
//   /spec/containers/[name=querier]/image         filter segment
//   /spec/containers/[ name = querier, image=x ]  several conditions, spaces around tokens
//   /a//b                                         empty reference token
// Rejected:
//   metadata/name                                 missing leading '/'
//   /spec/containers/[name=querier                unterminated filter
//   /spec/containers/[]                           empty filter
//   /spec/containers/[=querier]                   condition without a key
pub(super) fn parse_path(input: &str) -> PResult<'_, Spath> {
    let root = value(Spath::default(), eof);
    let pointer = map(
        preceded(char('/'), separated_list0(char('/'), segment)),
        Spath::new,
    );

    context(
        "expected a path starting with '/' or empty input",
        alt((root, pointer)),
    )
    .parse(input)
}

fn segment(input: &str) -> PResult<'_, Segment> {
    context("segment", alt((filter, field))).parse(input)
}

/// A reference token; may be empty. Ends at the next unescaped `/`.
/// A leading `[` starts a filter instead, so a literal one is written `~2`.
fn field(input: &str) -> PResult<'_, Segment> {
    let first = alt((escaped, satisfy(|c| !matches!(c, '/' | '[' | '~'))));
    let rest = many0(alt((escaped, satisfy(|c| !matches!(c, '/' | '~')))));

    context(
        "key segment",
        map(opt((first, rest)), |token| {
            Segment::Field(
                token
                    .map(|(first, rest)| std::iter::once(first).chain(rest).collect::<String>())
                    .unwrap_or_default(),
            )
        }),
    )
    .parse(input)
}

fn escaped(input: &str) -> PResult<'_, char> {
    preceded(
        char('~'),
        alt((value('~', char('0')), value('/', char('1')), value('[', char('2')))),
    )
    .parse(input)
}

fn filter(input: &str) -> PResult<'_, Segment> {
    map(
        delimited(
            padded(char('[')),
            separated_list1(padded(char(',')), condition),
            padded(char(']')),
        ),
        Segment::Filter,
    )
    .parse(input)
}

fn condition(input: &str) -> PResult<'_, (String, String)> {
    map(
        separated_pair(padded(condition_key), padded(char('=')), padded(condition_value)),
        |(key, value): (&str, &str)| (key.to_string(), value.trim().to_string()),
    )
    .parse(input)
}

fn condition_key(input: &str) -> PResult<'_, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-').parse(input)
}

/// Anything up to the next `,` or `]`, so image references fit unquoted.
fn condition_value(input: &str) -> PResult<'_, &str> {
    take_while1(|c: char| c != ',' && c != ']').parse(input)
}

fn padded<'a, O, E, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}
