use regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
    pub static ref TOKEN_REGEX:   Regex = Regex::new(r"//[^\n]*|\s+|[A-Za-z0-9_]+|[:;,{}\[\]]|.").unwrap();
    pub static ref WHITESPACE_RX: Regex = Regex::new(r"^(//.*|\s+)$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Colon,
    Semicolon,
    Comma,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Unknown,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind:   TokenKind,
    pub text:   String,
    /// Byte offset of the token in the source text.
    pub offset: usize,
    pub line:   usize,
    pub column: usize,
}

impl Token {
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.text == word
    }
}

fn classify(part: &str) -> TokenKind {
    match part {
        ":" => TokenKind::Colon,
        ";" => TokenKind::Semicolon,
        "," => TokenKind::Comma,
        "{" => TokenKind::LeftBrace,
        "}" => TokenKind::RightBrace,
        "[" => TokenKind::LeftBracket,
        "]" => TokenKind::RightBracket,
        _ if part.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') => TokenKind::Word,
        _ => TokenKind::Unknown,
    }
}

/// Split schema text into tokens, dropping whitespace and `//` comments.
///
/// Every character lands in some token, so this never fails: characters the
/// grammar has no use for come out as `TokenKind::Unknown` and are rejected by
/// whichever declaration contains them. The returned list always ends with an
/// `Eof` token.
pub fn tokenize_schema(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut column = 1;

    for mat in TOKEN_REGEX.find_iter(text) {
        let part = mat.as_str();

        if !WHITESPACE_RX.is_match(part) {
            tokens.push(Token {
                kind:   classify(part),
                text:   part.to_string(),
                offset: mat.start(),
                line,
                column,
            });
        }

        // Update line/column
        let newline_count = part.matches('\n').count();
        if newline_count > 0 {
            line += newline_count;
            if let Some(last_line_part) = part.split('\n').last() {
                column = last_line_part.chars().count() + 1;
            }
        } else {
            column += part.chars().count();
        }
    }

    tokens.push(Token {
        kind:   TokenKind::Eof,
        text:   String::new(),
        offset: text.len(),
        line,
        column,
    });
    tokens
}
