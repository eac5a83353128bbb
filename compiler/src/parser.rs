use tracing::trace;

use crate::{
    error::KserialError,
    tokenizer::{tokenize_schema, Token, TokenKind},
    types::{Declaration, EnumDecl, FieldDecl, IntKind, Schema, TableDecl},
    utils::fragment,
};

const NAMESPACE_KEYWORD: &str = "namespace";
const ENUM_KEYWORD:      &str = "enum";
const TABLE_KEYWORD:     &str = "table";
const TAG_LENGTH:        usize = 4;

/// Tokenize and parse a whole schema into its declaration tree.
pub fn parse_schema(text: &str) -> Result<Schema, KserialError> {
    let tokens = tokenize_schema(text);
    let declarations = Parser::new(text, &tokens).collect::<Result<Vec<_>, _>>()?;
    Ok(Schema { declarations })
}

/// Pulls declarations out of a token stream one at a time, in source order.
///
/// Between declarations the parser is permissive: statement separators, stray
/// punctuation and unrecognised words are skipped, and `namespace ... ;` is
/// skipped as a whole. Inside an `enum` or `table` declaration the grammar is
/// strict and the first mismatch ends iteration with an error.
pub struct Parser<'a> {
    text:   &'a str,
    tokens: &'a [Token],
    index:  usize,
    done:   bool,
}

/// Tokens of one separator-delimited entry inside a declaration body.
type Entry<'a> = &'a [Token];

impl<'a> Parser<'a> {
    /// `tokens` must come from `tokenize_schema(text)`.
    pub fn new(text: &'a str, tokens: &'a [Token]) -> Parser<'a> {
        Parser {
            text,
            tokens,
            index: 0,
            done: false,
        }
    }

    fn current(&self) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        // The last token is always Eof; never step past it.
        &tokens[self.index.min(tokens.len().saturating_sub(1))]
    }

    fn eat(&mut self, kind: TokenKind) -> Option<&'a Token> {
        let token = self.current();
        if token.kind == kind {
            self.index += 1;
            Some(token)
        } else {
            None
        }
    }

    fn source_of(&self, entry: Entry<'a>) -> String {
        match (entry.first(), entry.last()) {
            (Some(first), Some(last)) => self.text[first.offset..last.offset + last.text.len()].to_string(),
            _ => String::new(),
        }
    }

    fn next_declaration(&mut self) -> Result<Option<Declaration>, KserialError> {
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Eof => return Ok(None),
                TokenKind::Word => {
                    self.index += 1;
                    match token.text.as_str() {
                        NAMESPACE_KEYWORD => self.skip_statement(),
                        ENUM_KEYWORD => return self.parse_enum().map(|d| Some(Declaration::Enum(d))),
                        TABLE_KEYWORD => return self.parse_table().map(|d| Some(Declaration::Table(d))),
                        other => trace!(word = other, line = token.line, "ignoring word outside a declaration"),
                    }
                }
                _ => self.index += 1,
            }
        }
    }

    /// Skip up to and including the next `;`, or to the end of input.
    fn skip_statement(&mut self) {
        while !matches!(self.current().kind, TokenKind::Semicolon | TokenKind::Eof) {
            self.index += 1;
        }
        self.eat(TokenKind::Semicolon);
    }

    /// Collect the tokens of a `{ ... }` body and split them on `separator`.
    /// Returns `None` if the body is never closed.
    fn body(&mut self, separator: TokenKind) -> Option<Vec<Entry<'a>>> {
        let tokens: &'a [Token] = self.tokens;
        let start = self.index;
        loop {
            match self.current().kind {
                TokenKind::RightBrace => break,
                TokenKind::Eof => return None,
                _ => self.index += 1,
            }
        }
        let inner = &tokens[start..self.index];
        self.index += 1;
        Some(inner.split(|t| t.kind == separator).collect())
    }

    fn parse_enum(&mut self) -> Result<EnumDecl, KserialError> {
        let (text, start) = (self.text, self.current());
        let grammar_error = || KserialError::EnumGrammar {
            fragment: fragment(text, start.offset),
            line:     start.line,
            column:   start.column,
        };

        let name = self.eat(TokenKind::Word).ok_or_else(grammar_error)?;
        self.eat(TokenKind::Colon).ok_or_else(grammar_error)?;
        let repr = self
            .eat(TokenKind::Word)
            .and_then(|t| IntKind::from_keyword(&t.text))
            .ok_or_else(grammar_error)?;
        self.eat(TokenKind::LeftBrace).ok_or_else(grammar_error)?;
        let entries = self.body(TokenKind::Comma).ok_or_else(grammar_error)?;

        let mut values = Vec::new();
        for entry in entries {
            match entry {
                [] => continue,
                [value] if value.kind == TokenKind::Word => values.push(value.text.clone()),
                _ => {
                    return Err(KserialError::EnumValueName {
                        enum_name: name.text.clone(),
                        value:     self.source_of(entry),
                    })
                }
            }
        }

        Ok(EnumDecl {
            name:   name.text.clone(),
            line:   name.line,
            column: name.column,
            repr,
            values,
        })
    }

    fn parse_table(&mut self) -> Result<TableDecl, KserialError> {
        let (text, start) = (self.text, self.current());
        let grammar_error = || KserialError::TableGrammar {
            fragment: fragment(text, start.offset),
            line:     start.line,
            column:   start.column,
        };

        let name = self.eat(TokenKind::Word).ok_or_else(grammar_error)?;
        self.eat(TokenKind::Colon).ok_or_else(grammar_error)?;
        let tag = self
            .eat(TokenKind::Word)
            .filter(|t| t.text.len() == TAG_LENGTH)
            .ok_or_else(grammar_error)?;
        self.eat(TokenKind::LeftBrace).ok_or_else(grammar_error)?;
        let entries = self.body(TokenKind::Semicolon).ok_or_else(grammar_error)?;

        let mut fields = Vec::new();
        for entry in entries {
            if entry.is_empty() {
                continue;
            }
            let field = parse_field(entry).ok_or_else(|| KserialError::FieldGrammar {
                table: name.text.clone(),
                entry: self.source_of(entry),
            })?;
            fields.push(field);
        }

        Ok(TableDecl {
            name:   name.text.clone(),
            line:   name.line,
            column: name.column,
            tag:    tag.text.clone(),
            fields,
        })
    }
}

/// `name : type`, `name : [type]` or `name : type[]`.
fn parse_field(entry: &[Token]) -> Option<FieldDecl> {
    use TokenKind::*;

    let (name, type_name, is_array) = match entry {
        [name, colon, ty] if colon.kind == Colon => (name, ty, false),
        [name, colon, open, ty, close] if colon.kind == Colon && open.kind == LeftBracket && close.kind == RightBracket => {
            (name, ty, true)
        }
        [name, colon, ty, open, close] if colon.kind == Colon && open.kind == LeftBracket && close.kind == RightBracket => {
            (name, ty, true)
        }
        _ => return None,
    };
    if name.kind != Word || type_name.kind != Word {
        return None;
    }

    Some(FieldDecl {
        name:      name.text.clone(),
        line:      name.line,
        column:    name.column,
        type_name: type_name.text.clone(),
        is_array,
    })
}

impl<'a> Iterator for Parser<'a> {
    type Item = Result<Declaration, KserialError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_declaration() {
            Ok(Some(declaration)) => Some(Ok(declaration)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
