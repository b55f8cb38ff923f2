//! Parsing companion symbol files.
//!
//! A symbol file is a plain-text table that maps addresses to labels, one
//! pair per line, with `;` comments:
//!
//! ```text
//! ; program symbols
//! x3000 MAIN
//! x3004 LOOP
//! x3010 DONE
//! ```
//!
//! The table annotates a memory view with the labels the assembler knew;
//! the machine itself never produces or requires one. Addresses are hex,
//! with or without the conventional leading `x`.

use std::collections::BTreeMap;

use logos::Logos;

/// A unit of information in a symbol file.
#[derive(Debug, Logos, PartialEq, Eq)]
#[logos(skip r"[ \t]+", error = SymError)]
enum Token {
    /// A bare word. The first word on a line is the address, the second is
    /// the label; they are disambiguated by position, not spelling.
    #[regex(r"[\w.]+", |lx| lx.slice().to_string())]
    Word(String),

    /// A comment, which starts with a semicolon and spans the remaining part of the line.
    #[regex(r";.*")]
    Comment,

    /// A new line
    #[regex(r"\r?\n")]
    NewLine,
}

/// Any errors raised in attempting to parse a symbol file.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum SymError {
    /// A line's address field is not a 16-bit hex value.
    InvalidAddr,
    /// A line has an address but no label.
    MissingLabel,
    /// A line has more than the two `{address} {label}` fields.
    ExtraField,
    /// A symbol was used which does not occur in a symbol file.
    #[default]
    InvalidSymbol,
}
impl std::fmt::Display for SymError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymError::InvalidAddr   => f.write_str("address is not a 16-bit hex value"),
            SymError::MissingLabel  => f.write_str("line is missing a label"),
            SymError::ExtraField    => f.write_str("line has more than an address and a label"),
            SymError::InvalidSymbol => f.write_str("unrecognized symbol"),
        }
    }
}
impl std::error::Error for SymError {}

/// A parsed symbol file: labels keyed by address.
///
/// ```
/// use lc3_solo::sym::SymbolTable;
///
/// let table = SymbolTable::parse("x3000 MAIN\nx3004 LOOP ; hot\n").unwrap();
/// assert_eq!(table.get(0x3000), Some("MAIN"));
/// assert_eq!(table.get(0x3004), Some("LOOP"));
/// assert_eq!(table.get(0x3001), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SymbolTable {
    labels: BTreeMap<u16, String>,
}

impl SymbolTable {
    /// Parses a symbol file.
    ///
    /// Blank and comment-only lines are skipped. A repeated address keeps
    /// the later label.
    pub fn parse(src: &str) -> Result<Self, SymError> {
        let mut labels = BTreeMap::new();
        let mut fields: Vec<String> = vec![];

        let mut lexer = Token::lexer(src);
        loop {
            match lexer.next().transpose()? {
                Some(Token::Word(word)) => fields.push(word),
                Some(Token::Comment) => {}
                end @ (Some(Token::NewLine) | None) => {
                    match &mut *fields {
                        [] => {}
                        [_] => return Err(SymError::MissingLabel),
                        [addr, label] => {
                            let addr = parse_addr(addr).ok_or(SymError::InvalidAddr)?;
                            labels.insert(addr, std::mem::take(label));
                        }
                        _ => return Err(SymError::ExtraField),
                    }
                    fields.clear();
                    if end.is_none() {
                        break;
                    }
                }
            }
        }

        Ok(Self { labels })
    }

    /// The label at the given address, if the file named one.
    pub fn get(&self, addr: u16) -> Option<&str> {
        self.labels.get(&addr).map(String::as_str)
    }

    /// Iterates over the `(address, label)` pairs in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &str)> {
        self.labels.iter().map(|(&addr, label)| (addr, label.as_str()))
    }

    /// The number of labeled addresses.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the table has no labels at all.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Parses an address field: hex digits, optionally after a leading `x`.
fn parse_addr(field: &str) -> Option<u16> {
    let digits = field.strip_prefix(['X', 'x']).unwrap_or(field);
    u16::from_str_radix(digits, 16).ok()
}
