use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::{
    source::file::{File, FileSet},
    MK_TOKEN,
};

use super::tokens::{lookup, Token, TokenKind};

lazy_static! {
    static ref IDENTIFIER_PATTERN: Regex = Regex::new(r"^\p{L}[\p{L}\p{Nd}]*").unwrap();
    static ref NUMBER_PATTERN: Regex = Regex::new(r"^\p{Nd}+(\.\p{Nd}+)?").unwrap();
}

/// On-demand scanner over one source file.
///
/// The lexer holds the current rune and can peek one rune further. Every
/// newline it consumes is recorded in the [`File`] it scans, so positions of
/// everything scanned so far can be resolved while parsing is still running.
pub struct Lexer<'a> {
    source: &'a str,
    file: &'a mut File,
    ch: Option<char>,
    /// Byte offset of `ch`; equals `source.len()` once input is exhausted.
    offset: usize,
    /// Byte offset of the rune after `ch`.
    roffset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(file: &'a mut File, source: &'a str) -> Self {
        let mut lexer = Lexer {
            source,
            file,
            ch: None,
            offset: 0,
            roffset: 0,
        };
        lexer.next();
        lexer
    }

    pub fn file(&self) -> &File {
        self.file
    }

    /// Scans the next token. Once input is exhausted every call yields EOF.
    pub fn scan(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            let Some(ch) = self.ch else {
                return MK_TOKEN!(TokenKind::EOF, String::new(), self.file.eof_pos());
            };

            let start = self.offset;
            let remainder = &self.source[start..];

            if let Some(found) = IDENTIFIER_PATTERN.find(remainder) {
                let end = start + found.end();
                return self.scan_word(start, end);
            }

            if let Some(found) = NUMBER_PATTERN.find(remainder) {
                let end = start + found.end();
                self.advance_to(end);
                return self.token(TokenKind::Number, start);
            }

            if ch == '"' {
                return self.scan_string();
            }

            self.next();

            let kind = match ch {
                '(' => TokenKind::OpenParen,
                ')' => TokenKind::CloseParen,
                '{' => TokenKind::OpenCurly,
                '}' => TokenKind::CloseCurly,
                '[' => TokenKind::OpenBracket,
                ']' => TokenKind::CloseBracket,
                ',' => TokenKind::Comma,
                ';' => TokenKind::Semicolon,
                '$' => TokenKind::Dollar,
                ':' => self.switch2('=', TokenKind::Declare, TokenKind::Colon),
                '.' => self.switch2('.', TokenKind::Spread, TokenKind::Dot),
                '+' => self.switch2('=', TokenKind::PlusEquals, TokenKind::Plus),
                '-' => self.switch2('=', TokenKind::MinusEquals, TokenKind::Dash),
                '*' => self.switch2('=', TokenKind::StarEquals, TokenKind::Star),
                '/' => {
                    if self.ch == Some('/') {
                        self.skip_comment();
                        continue;
                    }
                    self.switch2('=', TokenKind::SlashEquals, TokenKind::Slash)
                }
                '%' => self.switch2('=', TokenKind::PercentEquals, TokenKind::Percent),
                '^' => TokenKind::BitXor,
                '&' => self.switch2('&', TokenKind::And, TokenKind::BitAnd),
                '|' => self.switch2('|', TokenKind::Or, TokenKind::BitOr),
                '!' => self.switch2('=', TokenKind::NotEquals, TokenKind::Not),
                '=' => self.switch2('=', TokenKind::Equals, TokenKind::Assignment),
                '>' => self.switch2('=', TokenKind::GreaterEquals, TokenKind::Greater),
                '<' => self.switch2('=', TokenKind::LessEquals, TokenKind::Less),
                '#' => TokenKind::Length,
                _ => TokenKind::Illegal,
            };

            return self.token(kind, start);
        }
    }

    fn next(&mut self) {
        match self.source[self.roffset..].chars().next() {
            Some(ch) => {
                self.offset = self.roffset;
                self.ch = Some(ch);
                if ch == '\n' {
                    self.file.add_line(self.offset);
                }
                self.roffset += ch.len_utf8();
            }
            None => {
                self.offset = self.source.len();
                self.ch = None;
            }
        }
    }

    fn advance_to(&mut self, end: usize) {
        while self.ch.is_some() && self.offset < end {
            self.next();
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        let token = MK_TOKEN!(
            kind,
            String::from(&self.source[start..self.offset]),
            self.file.pos(start)
        );
        trace!(kind = %token.kind, value = %token.value, "scanned token");
        token
    }

    /// Consumes `expected` if it is the current rune, picking the two-rune
    /// kind; otherwise the single-rune kind.
    fn switch2(&mut self, expected: char, matched: TokenKind, single: TokenKind) -> TokenKind {
        if self.ch == Some(expected) {
            self.next();
            matched
        } else {
            single
        }
    }

    fn scan_word(&mut self, start: usize, end: usize) -> Token {
        self.advance_to(end);
        let kind = lookup(&self.source[start..end]);
        self.token(kind, start)
    }

    fn scan_string(&mut self) -> Token {
        let start = self.offset;
        let mut previous = '"';
        self.next();

        while let Some(ch) = self.ch {
            self.next();
            if ch == '"' && previous != '\\' {
                break;
            }
            previous = ch;
        }

        self.token(TokenKind::String, start)
    }

    /// Skips the rest of a `//` comment, including the newline ending it.
    fn skip_comment(&mut self) {
        while let Some(ch) = self.ch {
            self.next();
            if ch == '\n' {
                break;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.ch.is_some_and(char::is_whitespace) {
            self.next();
        }
    }
}

/// Scans `source` to completion, including the trailing EOF token.
///
/// The file is registered under `file`, or `shell` when no name is given.
pub fn tokenize(source: &str, file: Option<&str>) -> Vec<Token> {
    let mut file_set = FileSet::new();
    let file = file_set.add(file.unwrap_or("shell"), source);
    let mut lexer = Lexer::new(file, source);

    let mut tokens = vec![];
    loop {
        let token = lexer.scan();
        let done = token.kind == TokenKind::EOF;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}
