//! SQL tokenizer.
//!
//! Token classes follow SQLite: quoted identifiers in `"..."`, `` `...` ``
//! and `[...]`, `'...'` strings with doubled-quote escapes, `x'..'` blobs,
//! `?NNN` / `:name` / `@name` / `$name` / `#name` variables. Malformed input
//! becomes an [`TokenKind::Illegal`] token; the parser reports it only if it
//! gets that far.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_till, take_until, take_while, take_while1},
    character::complete::{char, digit0, digit1, one_of, satisfy},
    combinator::{map, opt, recognize, rest, value},
    multi::many0_count,
    sequence::{pair, preceded, terminated, tuple},
};

use super::keywords::Keyword;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Semi,
    LParen,
    RParen,
    Comma,
    Dot,
    Plus,
    Minus,
    Star,
    Slash,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    BitAnd,
    BitOr,
    BitNot,
    LShift,
    RShift,
    Concat,
    /// `->` or `->>`
    Ptr,
    Integer,
    Float,
    String,
    Blob,
    Variable,
    Id,
    Keyword(Keyword),
    Illegal,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset into the statement text.
    pub offset: usize,
}

impl Token<'_> {
    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    pub fn is(&self, kw: Keyword) -> bool {
        self.kind == TokenKind::Keyword(kw)
    }

    /// What SQLite's look-ahead treats as an identifier: plain and quoted
    /// identifiers, strings, join keywords and fallback keywords.
    fn is_id_like(&self) -> bool {
        match self.kind {
            TokenKind::Id | TokenKind::String => true,
            TokenKind::Keyword(kw) => {
                kw.is_join_kw()
                    || kw.falls_back_to_id()
                    || matches!(kw, Keyword::Window | Keyword::Over)
            }
            _ => false,
        }
    }
}

#[derive(Clone)]
enum Lexeme {
    Skip,
    Token(TokenKind),
}

/// Split `sql` into tokens, dropping whitespace and comments. The last token
/// is always [`TokenKind::Eof`].
pub fn tokenize(sql: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut input = sql;
    while !input.is_empty() {
        let offset = sql.len() - input.len();
        let (remaining, lexeme) = match lexeme(input) {
            Ok(ok) => ok,
            Err(_) => {
                // Every alternative failed: one illegal character.
                let width = input.chars().next().map_or(1, char::len_utf8);
                (&input[width..], Lexeme::Token(TokenKind::Illegal))
            }
        };
        let text = &input[..input.len() - remaining.len()];
        if let Lexeme::Token(kind) = lexeme {
            let kind = match kind {
                TokenKind::Id => Keyword::lookup(text).map_or(TokenKind::Id, TokenKind::Keyword),
                other => other,
            };
            tokens.push(Token { kind, text, offset });
        }
        input = remaining;
    }
    tokens.push(Token {
        kind: TokenKind::Eof,
        text: "",
        offset: sql.len(),
    });
    resolve_window_keywords(&mut tokens);
    tokens
}

/// WINDOW, OVER and FILTER are keywords only in context; elsewhere they are
/// identifiers.
fn resolve_window_keywords(tokens: &mut [Token<'_>]) {
    for i in 0..tokens.len() {
        let keep = match tokens[i].kind {
            TokenKind::Keyword(Keyword::Window) => {
                tokens.get(i + 1).is_some_and(Token::is_id_like)
                    && tokens.get(i + 2).is_some_and(|t| t.is(Keyword::As))
            }
            TokenKind::Keyword(Keyword::Over) => {
                i > 0
                    && tokens[i - 1].kind == TokenKind::RParen
                    && tokens
                        .get(i + 1)
                        .is_some_and(|t| t.kind == TokenKind::LParen || t.is_id_like())
            }
            TokenKind::Keyword(Keyword::Filter) => {
                i > 0
                    && tokens[i - 1].kind == TokenKind::RParen
                    && tokens.get(i + 1).is_some_and(|t| t.kind == TokenKind::LParen)
            }
            _ => continue,
        };
        if !keep {
            tokens[i].kind = TokenKind::Id;
        }
    }
}

fn lexeme(input: &str) -> IResult<&str, Lexeme> {
    alt((
        value(Lexeme::Skip, alt((whitespace, line_comment, block_comment))),
        map(
            alt((blob, number, quoted, bracketed, variable, identifier, punctuation)),
            Lexeme::Token,
        ),
    ))(input)
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0c' | '\r')
}

fn is_id_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || !c.is_ascii()
}

fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while1(is_space)(input)
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("--"), take_till(|c| c == '\n')))(input)
}

/// An unterminated block comment runs to the end of input.
fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        tag("/*"),
        alt((recognize(pair(take_until("*/"), tag("*/"))), rest)),
    ))(input)
}

/// `'string'`, `"identifier"` or `` `identifier` ``. A doubled delimiter
/// stands for itself; an unterminated quote swallows the rest of the input.
fn quoted(input: &str) -> IResult<&str, TokenKind> {
    let (_, delim) = one_of("'\"`")(input)?;
    let kind = if delim == '\'' {
        TokenKind::String
    } else {
        TokenKind::Id
    };
    let mut chars = input.char_indices().skip(1).peekable();
    while let Some((i, c)) = chars.next() {
        if c != delim {
            continue;
        }
        if chars.next_if(|&(_, next)| next == delim).is_none() {
            return Ok((&input[i + c.len_utf8()..], kind));
        }
    }
    Ok(("", TokenKind::Illegal))
}

/// `[identifier]`
fn bracketed(input: &str) -> IResult<&str, TokenKind> {
    let (after, _) = char('[')(input)?;
    match terminated(
        take_till(|c| c == ']'),
        char::<&str, nom::error::Error<&str>>(']'),
    )(after) {
        Ok((remaining, _)) => Ok((remaining, TokenKind::Id)),
        Err(_) => value(TokenKind::Illegal, rest)(input),
    }
}

/// `x'ABCD'`: an even number of hex digits, otherwise illegal up to the
/// closing quote.
fn blob(input: &str) -> IResult<&str, TokenKind> {
    let (after, _) = pair(one_of("xX"), char('\''))(input)?;
    let (after_digits, digits) = take_while(|c: char| c.is_ascii_hexdigit())(after)?;
    if let Ok((remaining, _)) = char::<&str, nom::error::Error<&str>>('\'')(after_digits) {
        if digits.len() % 2 == 0 {
            return Ok((remaining, TokenKind::Blob));
        }
    }
    let (remaining, _) = take_till(|c| c == '\'')(after_digits)?;
    let remaining = remaining.strip_prefix('\'').unwrap_or(remaining);
    Ok((remaining, TokenKind::Illegal))
}

/// Integers (decimal or hex) and floats. Identifier characters glued to a
/// number make the whole run illegal.
fn number(input: &str) -> IResult<&str, TokenKind> {
    let hex = value(
        TokenKind::Integer,
        recognize(tuple((
            char('0'),
            one_of("xX"),
            take_while1(|c: char| c.is_ascii_hexdigit()),
        ))),
    );
    let leading_dot = value(
        TokenKind::Float,
        recognize(tuple((char('.'), digit1, opt(exponent)))),
    );
    let decimal = map(
        tuple((
            digit1,
            opt(recognize(pair(char('.'), digit0))),
            opt(exponent),
        )),
        |(_, fraction, exp): (&str, Option<&str>, Option<&str>)| {
            if fraction.is_some() || exp.is_some() {
                TokenKind::Float
            } else {
                TokenKind::Integer
            }
        },
    );
    let (remaining, kind) = alt((hex, leading_dot, decimal))(input)?;
    let (remaining, glued) = take_while(is_id_char)(remaining)?;
    if glued.is_empty() {
        Ok((remaining, kind))
    } else {
        Ok((remaining, TokenKind::Illegal))
    }
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(input)
}

fn variable(input: &str) -> IResult<&str, TokenKind> {
    alt((
        value(TokenKind::Variable, preceded(char('?'), digit0)),
        named_variable,
    ))(input)
}

/// `:name`, `@name`, `$name`, `#name`. `::` may appear inside the name. A
/// prefix with no name characters after it is illegal.
fn named_variable(input: &str) -> IResult<&str, TokenKind> {
    let (after, _) = one_of("$@:#")(input)?;
    let (remaining, name) =
        recognize(many0_count(alt((take_while1(is_id_char), tag("::")))))(after)?;
    let kind = if name.chars().any(is_id_char) {
        TokenKind::Variable
    } else {
        TokenKind::Illegal
    };
    Ok((remaining, kind))
}

fn identifier(input: &str) -> IResult<&str, TokenKind> {
    value(
        TokenKind::Id,
        recognize(pair(satisfy(is_id_start), take_while(is_id_char))),
    )(input)
}

fn punctuation(input: &str) -> IResult<&str, TokenKind> {
    alt((
        alt((
            value(TokenKind::Ptr, alt((tag("->>"), tag("->")))),
            value(TokenKind::Eq, alt((tag("=="), tag("=")))),
            value(TokenKind::Ne, alt((tag("<>"), tag("!=")))),
            value(TokenKind::Le, tag("<=")),
            value(TokenKind::LShift, tag("<<")),
            value(TokenKind::Lt, tag("<")),
            value(TokenKind::Ge, tag(">=")),
            value(TokenKind::RShift, tag(">>")),
            value(TokenKind::Gt, tag(">")),
            value(TokenKind::Concat, tag("||")),
            value(TokenKind::BitOr, tag("|")),
        )),
        alt((
            value(TokenKind::Semi, char(';')),
            value(TokenKind::LParen, char('(')),
            value(TokenKind::RParen, char(')')),
            value(TokenKind::Comma, char(',')),
            value(TokenKind::Dot, char('.')),
            value(TokenKind::Plus, char('+')),
            value(TokenKind::Minus, char('-')),
            value(TokenKind::Star, char('*')),
            value(TokenKind::Slash, char('/')),
            value(TokenKind::Rem, char('%')),
            value(TokenKind::BitAnd, char('&')),
            value(TokenKind::BitNot, char('~')),
            value(TokenKind::Illegal, char('!')),
        )),
    ))(input)
}
