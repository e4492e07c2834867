use std::io::{self, Write};

use crate::writer::{escape_pdf_string, format_real};

/// Indirect object number. Generation is always 0 for the
/// documents this crate writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjId(pub u32);

/// The subset of PDF object types (PDF 32000-1:2008 §7.3)
/// needed for form documents.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Integer(i64),
    Real(f64),
    /// Stored without the leading `/`.
    Name(String),
    /// Stored without the enclosing parens; escaped on output.
    LiteralString(String),
    Array(Vec<PdfObject>),
    /// Entries keep insertion order so output is deterministic.
    Dictionary(Vec<(String, PdfObject)>),
    Stream {
        dict: Vec<(String, PdfObject)>,
        data: Vec<u8>,
    },
    Reference(ObjId),
}

impl PdfObject {
    pub fn name(s: &str) -> Self {
        PdfObject::Name(s.to_string())
    }

    pub fn string(s: &str) -> Self {
        PdfObject::LiteralString(s.to_string())
    }

    pub fn dict(entries: Vec<(&str, PdfObject)>) -> Self {
        PdfObject::Dictionary(own_keys(entries))
    }

    pub fn stream(entries: Vec<(&str, PdfObject)>, data: Vec<u8>) -> Self {
        PdfObject::Stream {
            dict: own_keys(entries),
            data,
        }
    }

    /// Serialize this object in PDF syntax.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            PdfObject::Integer(n) => write!(out, "{}", n),
            PdfObject::Real(f) => out.write_all(format_real(*f).as_bytes()),
            PdfObject::Name(name) => write!(out, "/{}", name),
            PdfObject::LiteralString(s) => write!(out, "({})", escape_pdf_string(s)),
            PdfObject::Array(items) => {
                out.write_all(b"[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.write_all(b" ")?;
                    }
                    item.write_to(out)?;
                }
                out.write_all(b"]")
            }
            PdfObject::Dictionary(entries) => {
                write_entries(out, entries)?;
                out.write_all(b" >>")
            }
            PdfObject::Stream { dict, data } => {
                write_entries(out, dict)?;
                write!(out, " /Length {} >>\nstream\n", data.len())?;
                out.write_all(data)?;
                out.write_all(b"\nendstream")
            }
            PdfObject::Reference(id) => write!(out, "{} 0 R", id.0),
        }
    }
}

fn own_keys(entries: Vec<(&str, PdfObject)>) -> Vec<(String, PdfObject)> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn write_entries<W: Write>(out: &mut W, entries: &[(String, PdfObject)]) -> io::Result<()> {
    out.write_all(b"<<")?;
    for (key, val) in entries {
        write!(out, " /{} ", key)?;
        val.write_to(out)?;
    }
    Ok(())
}
