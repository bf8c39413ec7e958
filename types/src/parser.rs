// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Parsers for the textual forms of Move types and script arguments.
//!
//! ```text
//! T ::= bool | u8 | u16 | u32 | u64 | u128 | u256 | i8 | ... | i256 | address | signer
//!     | vector<T> | &T | T<index> | address::module::Name(<T, ...>)?
//! ```

use crate::{
    account_address::AccountAddress,
    identifier::Identifier,
    language_storage::{StructTag, TypeTag, MAX_TYPE_TAG_NESTING},
    transaction::TransactionArgument,
};
use aptos_bcs::U256;
use std::iter::Peekable;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TypeTagParseError {
    #[error("empty type string")]
    Empty,
    #[error("unrecognized token at '{0}'")]
    UnrecognizedToken(String),
    #[error("expected {expected}, got {found}")]
    UnexpectedToken { expected: String, found: String },
    #[error("primitive type '{0}' cannot take type parameters")]
    TypeParamsOnPrimitive(String),
    #[error("missing closing '>'")]
    UnclosedAngleBracket,
    #[error("unexpected '>' without matching '<'")]
    UnmatchedClosingBracket,
    #[error("unexpected trailing input: {0}")]
    TrailingTokens(String),
    #[error("invalid address '{0}'")]
    InvalidAddress(String),
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),
    #[error("invalid module id '{0}'")]
    InvalidModuleId(String),
    #[error("invalid generic type parameter '{0}'")]
    InvalidGeneric(String),
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("invalid byte string '{0}'")]
    InvalidBytes(String),
    #[error("type nesting exceeds {}", MAX_TYPE_TAG_NESTING)]
    TooDeep,
    #[error("expected a struct type, got '{0}'")]
    NotAStruct(String),
}

type Result<T, E = TypeTagParseError> = std::result::Result<T, E>;

#[derive(Clone, Eq, PartialEq, Debug)]
enum Token {
    BoolType,
    U8Type,
    U16Type,
    U32Type,
    U64Type,
    U128Type,
    U256Type,
    I8Type,
    I16Type,
    I32Type,
    I64Type,
    I128Type,
    I256Type,
    AddressType,
    SignerType,
    VectorType,
    Whitespace,
    Name(String),
    Address(String),
    U8(String),
    U16(String),
    U32(String),
    U64(String),
    U128(String),
    U256(String),
    Bytes(String),
    True,
    False,
    ColonColon,
    Amp,
    Lt,
    Gt,
    Comma,
    EOF,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Name(s) | Token::Address(s) => format!("'{}'", s),
            Token::U8(s) | Token::U16(s) | Token::U32(s) | Token::U64(s) | Token::U128(s)
            | Token::U256(s) => format!("number '{}'", s),
            Token::Bytes(s) => format!("bytes b\"{}\"", s),
            Token::ColonColon => "'::'".to_string(),
            Token::Amp => "'&'".to_string(),
            Token::Lt => "'<'".to_string(),
            Token::Gt => "'>'".to_string(),
            Token::Comma => "','".to_string(),
            Token::EOF => "end of input".to_string(),
            tok => match primitive_type(tok) {
                Some(ty) => format!("'{}'", ty),
                None => format!("{:?}", tok),
            },
        }
    }
}

fn primitive_type(tok: &Token) -> Option<TypeTag> {
    Some(match tok {
        Token::BoolType => TypeTag::Bool,
        Token::U8Type => TypeTag::U8,
        Token::U16Type => TypeTag::U16,
        Token::U32Type => TypeTag::U32,
        Token::U64Type => TypeTag::U64,
        Token::U128Type => TypeTag::U128,
        Token::U256Type => TypeTag::U256,
        Token::I8Type => TypeTag::I8,
        Token::I16Type => TypeTag::I16,
        Token::I32Type => TypeTag::I32,
        Token::I64Type => TypeTag::I64,
        Token::I128Type => TypeTag::I128,
        Token::I256Type => TypeTag::I256,
        Token::AddressType => TypeTag::Address,
        Token::SignerType => TypeTag::Signer,
        _ => return None,
    })
}

fn name_token(s: String) -> Token {
    match s.as_str() {
        "bool" => Token::BoolType,
        "u8" => Token::U8Type,
        "u16" => Token::U16Type,
        "u32" => Token::U32Type,
        "u64" => Token::U64Type,
        "u128" => Token::U128Type,
        "u256" => Token::U256Type,
        "i8" => Token::I8Type,
        "i16" => Token::I16Type,
        "i32" => Token::I32Type,
        "i64" => Token::I64Type,
        "i128" => Token::I128Type,
        "i256" => Token::I256Type,
        "address" => Token::AddressType,
        "signer" => Token::SignerType,
        "vector" => Token::VectorType,
        "true" => Token::True,
        "false" => Token::False,
        _ => Token::Name(s),
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn next_number(s: &str) -> Result<(Token, usize)> {
    let digits = s.chars().take_while(char::is_ascii_digit).count();
    let suffix_len = s[digits..].chars().take_while(|c| is_name_char(*c)).count();
    let num = s[..digits].to_string();
    let tok = match &s[digits..digits + suffix_len] {
        "" | "u64" => Token::U64(num),
        "u8" => Token::U8(num),
        "u16" => Token::U16(num),
        "u32" => Token::U32(num),
        "u128" => Token::U128(num),
        "u256" => Token::U256(num),
        _ => {
            return Err(TypeTagParseError::InvalidNumber(
                s[..digits + suffix_len].to_string(),
            ))
        }
    };
    Ok((tok, digits + suffix_len))
}

fn next_token(s: &str) -> Result<Option<(Token, usize)>> {
    let mut it = s.chars().peekable();
    let c = match it.next() {
        None => return Ok(None),
        Some(c) => c,
    };
    let unrecognized = || TypeTagParseError::UnrecognizedToken(s.to_string());
    Ok(Some(match c {
        '<' => (Token::Lt, 1),
        '>' => (Token::Gt, 1),
        ',' => (Token::Comma, 1),
        '&' => (Token::Amp, 1),
        ':' => match it.next() {
            Some(':') => (Token::ColonColon, 2),
            _ => return Err(unrecognized()),
        },
        '0' if matches!(it.peek(), Some('x') | Some('X')) => {
            let hex_len = s[2..].chars().take_while(char::is_ascii_hexdigit).count();
            if hex_len == 0 {
                return Err(unrecognized());
            }
            // Addresses never run into names: `0x1g` is not an address.
            if s[2 + hex_len..].starts_with(is_name_char) {
                return Err(TypeTagParseError::InvalidAddress(
                    s[..2 + hex_len + 1].to_string(),
                ));
            }
            let len = 2 + hex_len;
            (Token::Address(format!("0x{}", &s[2..len])), len)
        }
        c if c.is_ascii_digit() => next_number(s)?,
        'b' if it.peek() == Some(&'"') => {
            let body = &s[2..];
            let end = body.find('"').ok_or_else(unrecognized)?;
            let hex = &body[..end];
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(TypeTagParseError::InvalidBytes(hex.to_string()));
            }
            (Token::Bytes(hex.to_string()), end + 3)
        }
        c if c.is_ascii_whitespace() => {
            let len = s.chars().take_while(char::is_ascii_whitespace).count();
            (Token::Whitespace, len)
        }
        c if c.is_ascii_alphabetic() || c == '_' => {
            let len = s.chars().take_while(|c| is_name_char(*c)).count();
            (name_token(s[..len].to_string()), len)
        }
        _ => return Err(unrecognized()),
    }))
}

fn tokenize(mut s: &str) -> Result<Vec<Token>> {
    let mut v = vec![];
    while let Some((tok, n)) = next_token(s)? {
        if tok != Token::Whitespace {
            v.push(tok);
        }
        s = &s[n..];
    }
    Ok(v)
}

struct Parser<I: Iterator<Item = Token>> {
    it: Peekable<I>,
    depth: usize,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    fn new<T: IntoIterator<Item = Token, IntoIter = I>>(v: T) -> Self {
        Self {
            it: v.into_iter().peekable(),
            depth: 0,
        }
    }

    fn next(&mut self) -> Token {
        self.it.next().unwrap_or(Token::EOF)
    }

    fn peek(&mut self) -> Option<&Token> {
        self.it.peek()
    }

    fn consume(&mut self, tok: Token) -> Result<()> {
        let t = self.next();
        if t == tok {
            return Ok(());
        }
        Err(match (&tok, &t) {
            (Token::Gt, Token::EOF) => TypeTagParseError::UnclosedAngleBracket,
            (Token::EOF, Token::Gt) => TypeTagParseError::UnmatchedClosingBracket,
            (Token::EOF, _) => TypeTagParseError::TrailingTokens(t.describe()),
            _ => TypeTagParseError::UnexpectedToken {
                expected: tok.describe(),
                found: t.describe(),
            },
        })
    }

    /// A non-empty comma separated list without a trailing comma.
    fn parse_comma_list<F, R>(&mut self, parse_list_item: F, end_token: Token) -> Result<Vec<R>>
    where
        F: Fn(&mut Self) -> Result<R>,
    {
        let mut v = vec![parse_list_item(self)?];
        while self.peek() != Some(&end_token) && self.peek() != Some(&Token::EOF) {
            self.consume(Token::Comma)?;
            v.push(parse_list_item(self)?);
        }
        Ok(v)
    }

    fn nested<F, R>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self) -> Result<R>,
    {
        if self.depth >= MAX_TYPE_TAG_NESTING {
            return Err(TypeTagParseError::TooDeep);
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn parse_type_tag(&mut self) -> Result<TypeTag> {
        let tok = self.next();
        if let Some(ty) = primitive_type(&tok) {
            if self.peek() == Some(&Token::Lt) {
                return Err(TypeTagParseError::TypeParamsOnPrimitive(ty.to_string()));
            }
            return Ok(ty);
        }
        Ok(match tok {
            Token::VectorType => self.nested(|parser| {
                parser.consume(Token::Lt)?;
                let ty = parser.parse_type_tag()?;
                parser.consume(Token::Gt)?;
                Ok(TypeTag::vector(ty))
            })?,
            Token::Amp => self.nested(|parser| Ok(TypeTag::reference(parser.parse_type_tag()?)))?,
            Token::Name(name) => parse_generic(&name)?,
            Token::Address(addr) => {
                self.nested(|parser| parser.parse_struct_tag_after_address(&addr))?.into()
            }
            Token::EOF => return Err(TypeTagParseError::Empty),
            Token::Gt => return Err(TypeTagParseError::UnmatchedClosingBracket),
            tok => {
                return Err(TypeTagParseError::UnexpectedToken {
                    expected: "a type".to_string(),
                    found: tok.describe(),
                })
            }
        })
    }

    fn parse_name(&mut self) -> Result<Identifier> {
        match self.next() {
            Token::Name(name) => {
                Identifier::new(name.as_str()).map_err(|_| TypeTagParseError::InvalidIdentifier(name))
            }
            // Keywords are valid identifiers in this position, e.g. `0x1::vector::empty`.
            tok => match keyword_name(&tok) {
                Some(name) => Ok(Identifier::from_static(name)),
                None => Err(TypeTagParseError::UnexpectedToken {
                    expected: "an identifier".to_string(),
                    found: tok.describe(),
                }),
            },
        }
    }

    fn parse_struct_tag_after_address(&mut self, addr: &str) -> Result<StructTag> {
        let address = AccountAddress::from_hex_literal(addr)
            .map_err(|_| TypeTagParseError::InvalidAddress(addr.to_string()))?;
        self.consume(Token::ColonColon)?;
        let module = self.parse_name()?;
        self.consume(Token::ColonColon)?;
        let name = self.parse_name()?;
        let type_args = if self.peek() == Some(&Token::Lt) {
            self.next();
            let type_args = self.parse_comma_list(|parser| parser.parse_type_tag(), Token::Gt)?;
            self.consume(Token::Gt)?;
            type_args
        } else {
            vec![]
        };
        Ok(StructTag::new(address, module, name, type_args))
    }

    fn parse_transaction_argument(&mut self) -> Result<TransactionArgument> {
        fn number<T: std::str::FromStr>(s: String) -> Result<T> {
            s.parse().map_err(|_| TypeTagParseError::InvalidNumber(s))
        }
        Ok(match self.next() {
            Token::U8(s) => TransactionArgument::U8(number(s)?),
            Token::U16(s) => TransactionArgument::U16(number(s)?),
            Token::U32(s) => TransactionArgument::U32(number(s)?),
            Token::U64(s) => TransactionArgument::U64(number(s)?),
            Token::U128(s) => TransactionArgument::U128(number(s)?),
            Token::U256(s) => TransactionArgument::U256(number::<U256>(s)?),
            Token::True => TransactionArgument::Bool(true),
            Token::False => TransactionArgument::Bool(false),
            Token::Address(addr) => TransactionArgument::Address(
                AccountAddress::from_hex_literal(&addr)
                    .map_err(|_| TypeTagParseError::InvalidAddress(addr))?,
            ),
            Token::Bytes(s) => TransactionArgument::U8Vector(
                hex::decode(&s).map_err(|_| TypeTagParseError::InvalidBytes(s))?,
            ),
            Token::EOF => return Err(TypeTagParseError::Empty),
            tok => {
                return Err(TypeTagParseError::UnexpectedToken {
                    expected: "a transaction argument".to_string(),
                    found: tok.describe(),
                })
            }
        })
    }
}

fn keyword_name(tok: &Token) -> Option<&'static str> {
    Some(match tok {
        Token::BoolType => "bool",
        Token::U8Type => "u8",
        Token::U16Type => "u16",
        Token::U32Type => "u32",
        Token::U64Type => "u64",
        Token::U128Type => "u128",
        Token::U256Type => "u256",
        Token::I8Type => "i8",
        Token::I16Type => "i16",
        Token::I32Type => "i32",
        Token::I64Type => "i64",
        Token::I128Type => "i128",
        Token::I256Type => "i256",
        Token::AddressType => "address",
        Token::SignerType => "signer",
        Token::VectorType => "vector",
        Token::True => "true",
        Token::False => "false",
        _ => return None,
    })
}

// `T0`, `T1`, ... name the type parameters of the enclosing function.
fn parse_generic(name: &str) -> Result<TypeTag> {
    match name.strip_prefix('T') {
        Some(index) if !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) => index
            .parse()
            .map(TypeTag::Generic)
            .map_err(|_| TypeTagParseError::InvalidGeneric(name.to_string())),
        _ => Err(TypeTagParseError::UnexpectedToken {
            expected: "a type".to_string(),
            found: format!("'{}'", name),
        }),
    }
}

fn parse<F, T>(s: &str, f: F) -> Result<T>
where
    F: FnOnce(&mut Parser<std::vec::IntoIter<Token>>) -> Result<T>,
{
    let mut tokens = tokenize(s)?;
    tokens.push(Token::EOF);
    let mut parser = Parser::new(tokens);
    let res = f(&mut parser)?;
    parser.consume(Token::EOF)?;
    Ok(res)
}

pub fn parse_type_tag(s: &str) -> Result<TypeTag> {
    parse(s, |parser| parser.parse_type_tag())
}

pub fn parse_struct_tag(s: &str) -> Result<StructTag> {
    match parse_type_tag(s)? {
        TypeTag::Struct(tag) => Ok(*tag),
        other => Err(TypeTagParseError::NotAStruct(other.to_string())),
    }
}

/// Parses a comma separated list of types. Blank input yields no types.
pub fn parse_type_tags(s: &str) -> Result<Vec<TypeTag>> {
    if s.trim().is_empty() {
        return Ok(vec![]);
    }
    parse(s, |parser| {
        parser.parse_comma_list(|parser| parser.parse_type_tag(), Token::EOF)
    })
}

pub fn parse_transaction_argument(s: &str) -> Result<TransactionArgument> {
    parse(s, |parser| parser.parse_transaction_argument())
}

pub fn parse_transaction_arguments(s: &str) -> Result<Vec<TransactionArgument>> {
    if s.trim().is_empty() {
        return Ok(vec![]);
    }
    parse(s, |parser| {
        parser.parse_comma_list(|parser| parser.parse_transaction_argument(), Token::EOF)
    })
}
