// ABOUTME: Converts AISL source text into a token stream

use crate::error::AislError;
use nom::character::complete::satisfy;
use nom::combinator::recognize;
use nom::multi::many0;
use nom::sequence::preceded;
use nom::Parser;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Symbol(String),
    IntLit(i64),
    FloatLit(f64),
    DecimalLit(String),
    StringLit(String),
    BoolLit(bool),
    Eof,
}

fn is_symbol_start(c: char) -> bool {
    c.is_alphabetic() || "_-+*/<>=!?".contains(c)
}

fn is_symbol_continue(c: char) -> bool {
    c.is_alphanumeric() || "_-+*/<>=!?".contains(c)
}

fn is_number_body(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')
}

/// Recognizes a run of symbol characters via `nom` combinators.
fn symbol_run(input: &str) -> nom::IResult<&str, &str> {
    recognize(preceded(
        satisfy(is_symbol_start),
        many0(satisfy(is_symbol_continue)),
    ))
    .parse(input)
}

struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn lex_string(&mut self) -> Result<Token, AislError> {
        // opening '"' already consumed by caller
        let mut out = String::new();
        loop {
            match self.advance_char() {
                None => return Err(AislError::Lex("unterminated string".to_string())),
                Some('"') => break,
                Some('\\') => match self.advance_char() {
                    None => return Err(AislError::Lex("unterminated string".to_string())),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('\\') => out.push('\\'),
                    Some('"') => out.push('"'),
                    Some('/') => out.push('/'),
                    Some(other) => out.push(other),
                },
                Some(c) => out.push(c),
            }
        }
        Ok(Token::StringLit(out))
    }

    fn lex_number(&mut self) -> Result<Token, AislError> {
        let start = self.pos;
        if self.peek_char() == Some('-') {
            self.advance_char();
        }
        while let Some(c) = self.peek_char() {
            if is_number_body(c) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let lexeme = &self.input[start..self.pos];

        // A `d` suffix (no intervening whitespace) makes this a DecimalLit.
        if self.peek_char() == Some('d') {
            self.advance_char();
            return Ok(Token::DecimalLit(lexeme.to_string()));
        }

        if lexeme.contains('.') || lexeme.contains('e') || lexeme.contains('E') {
            let f: f64 = lexeme
                .parse()
                .map_err(|_| AislError::Lex(format!("invalid float literal: {lexeme}")))?;
            Ok(Token::FloatLit(f))
        } else {
            let i: i64 = lexeme
                .parse()
                .map_err(|_| AislError::Lex(format!("invalid int literal: {lexeme}")))?;
            Ok(Token::IntLit(i))
        }
    }

    fn lex_symbol(&mut self) -> Result<Token, AislError> {
        let (rest, matched) =
            symbol_run(self.rest()).map_err(|_| AislError::Lex("invalid symbol".to_string()))?;
        let consumed = self.rest().len() - rest.len();
        self.pos += consumed;
        match matched {
            "true" => Ok(Token::BoolLit(true)),
            "false" => Ok(Token::BoolLit(false)),
            _ => Ok(Token::Symbol(matched.to_string())),
        }
    }

    fn next_token(&mut self) -> Result<Token, AislError> {
        self.skip_whitespace();
        let Some(c) = self.peek_char() else {
            return Ok(Token::Eof);
        };
        match c {
            '(' => {
                self.advance_char();
                Ok(Token::LParen)
            }
            ')' => {
                self.advance_char();
                Ok(Token::RParen)
            }
            '[' => {
                self.advance_char();
                Ok(Token::LBracket)
            }
            ']' => {
                self.advance_char();
                Ok(Token::RBracket)
            }
            '{' => {
                self.advance_char();
                Ok(Token::LBrace)
            }
            '}' => {
                self.advance_char();
                Ok(Token::RBrace)
            }
            '"' => {
                self.advance_char();
                self.lex_string()
            }
            d if d.is_ascii_digit() => self.lex_number(),
            '-' if self.bytes.get(self.pos + 1).is_some_and(|b| b.is_ascii_digit()) => {
                self.lex_number()
            }
            s if is_symbol_start(s) => self.lex_symbol(),
            other => Err(AislError::Lex(format!("unexpected character: {other:?}"))),
        }
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, AislError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token()?;
        let is_eof = tok == Token::Eof;
        tokens.push(tok);
        if is_eof {
            break;
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_parens_and_symbol() {
        let toks = tokenize("(fn foo)").unwrap();
        assert_eq!(
            toks,
            vec![
                Token::LParen,
                Token::Symbol("fn".into()),
                Token::Symbol("foo".into()),
                Token::RParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn lexes_int_float_decimal() {
        let toks = tokenize("1 2.5 3.14d -7").unwrap();
        assert_eq!(
            toks,
            vec![
                Token::IntLit(1),
                Token::FloatLit(2.5),
                Token::DecimalLit("3.14".into()),
                Token::IntLit(-7),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn lexes_string_with_escapes() {
        let toks = tokenize(r#""a\nb\tc\"d\/e""#).unwrap();
        assert_eq!(
            toks,
            vec![Token::StringLit("a\nb\tc\"d/e".into()), Token::Eof]
        );
    }

    #[test]
    fn unterminated_string_is_lex_error() {
        let err = tokenize("\"abc").unwrap_err();
        assert!(matches!(err, AislError::Lex(_)));
    }

    #[test]
    fn lexes_bool_literals() {
        let toks = tokenize("true false").unwrap();
        assert_eq!(
            toks,
            vec![Token::BoolLit(true), Token::BoolLit(false), Token::Eof]
        );
    }

    #[test]
    fn brackets_and_braces() {
        let toks = tokenize("[1 2] {x y}").unwrap();
        assert_eq!(
            toks,
            vec![
                Token::LBracket,
                Token::IntLit(1),
                Token::IntLit(2),
                Token::RBracket,
                Token::LBrace,
                Token::Symbol("x".into()),
                Token::Symbol("y".into()),
                Token::RBrace,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn no_comment_syntax_lexes_semicolon_as_symbol() {
        let toks = tokenize(";").unwrap_err();
        assert!(matches!(toks, AislError::Lex(_)));
    }
}
