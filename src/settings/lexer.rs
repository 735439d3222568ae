//! Minimal tokenizer for Python settings modules
//!
//! Only as much of the language is recognized as is needed to find
//! bracket boundaries reliably: strings and comments are consumed whole so
//! brackets inside them never count, and newlines inside brackets are not
//! reported as statement boundaries.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Name,
    Str,
    Comment,
    Open(char),
    Close(char),
    Comma,
    Op,
    /// End of a logical line (a newline or `;` outside any brackets)
    Newline,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    pub fn is_op(&self, source: &str, op: &str) -> bool {
        self.kind == TokenKind::Op && self.text(source) == op
    }
}

/// Split `source` into tokens
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(c) = self.peek() {
            let start = self.pos;
            match c {
                '\n' | ';' => {
                    self.bump();
                    if self.depth == 0 {
                        self.push(TokenKind::Newline, start);
                    }
                }
                '\\' if self.continues_line() => {
                    self.bump();
                    if self.peek() == Some('\r') {
                        self.bump();
                    }
                    self.bump();
                }
                // A byte-order mark counts as whitespace
                c if c.is_whitespace() || c == '\u{feff}' => {
                    self.bump();
                }
                '#' => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                    self.push(TokenKind::Comment, start);
                }
                '"' | '\'' => {
                    self.string(c);
                    self.push(TokenKind::Str, start);
                }
                '(' | '[' | '{' => {
                    self.bump();
                    self.depth += 1;
                    self.push(TokenKind::Open(c), start);
                }
                ')' | ']' | '}' => {
                    self.bump();
                    self.depth = self.depth.saturating_sub(1);
                    self.push(TokenKind::Close(c), start);
                }
                ',' => {
                    self.bump();
                    self.push(TokenKind::Comma, start);
                }
                '=' => {
                    self.bump();
                    if self.peek() == Some('=') {
                        self.bump();
                    }
                    self.push(TokenKind::Op, start);
                }
                c if c == '_' || c.is_alphabetic() => {
                    self.eat_while(|c| c == '_' || c.is_alphanumeric());
                    match self.peek() {
                        Some(q @ ('"' | '\'')) if is_string_prefix(&self.src[start..self.pos]) => {
                            self.string(q);
                            self.push(TokenKind::Str, start);
                        }
                        _ => self.push(TokenKind::Name, start),
                    }
                }
                c if c.is_ascii_digit() => {
                    self.eat_while(|c| c == '_' || c == '.' || c.is_alphanumeric());
                    self.push(TokenKind::Other, start);
                }
                c if "+-*/%&|^~<>!@:.".contains(c) => {
                    self.bump();
                    self.push(TokenKind::Op, start);
                }
                _ => {
                    self.bump();
                    self.push(TokenKind::Other, start);
                }
            }
        }
        self.tokens
    }

    /// Consume a string literal whose opening quote is at the cursor.
    /// Unterminated strings end at the line break (or end of input when
    /// triple-quoted).
    fn string(&mut self, quote: char) {
        let triple: String = std::iter::repeat(quote).take(3).collect();
        let is_triple = self.src[self.pos..].starts_with(&triple);
        self.pos += if is_triple { 3 } else { 1 };

        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                self.bump();
            } else if is_triple && self.src[self.pos..].starts_with(&triple) {
                self.pos += 3;
                return;
            } else if !is_triple && c == quote {
                self.bump();
                return;
            } else if !is_triple && c == '\n' {
                return;
            } else {
                self.bump();
            }
        }
    }

    fn continues_line(&self) -> bool {
        let rest = &self.src[self.pos + 1..];
        rest.starts_with('\n') || rest.starts_with("\r\n")
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token {
            kind,
            start,
            end: self.pos,
        });
    }
}

fn is_string_prefix(word: &str) -> bool {
    word.len() <= 2 && word.chars().all(|c| "rRbBfFuU".contains(c))
}
