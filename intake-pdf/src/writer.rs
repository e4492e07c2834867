use std::io::{self, Write};

use crate::objects::{ObjId, PdfObject};

/// Low-level PDF serializer. Writes indirect objects to any
/// `Write` target and records their byte offsets for the xref table.
pub struct PdfWriter<W: Write> {
    out: Counting<W>,
    xref: Vec<(u32, u64)>,
}

/// Passes bytes through while counting them.
struct Counting<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> Write for Counting<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> PdfWriter<W> {
    pub fn new(inner: W) -> Self {
        PdfWriter {
            out: Counting { inner, written: 0 },
            xref: Vec::new(),
        }
    }

    /// PDF 1.7 header followed by a binary marker comment.
    pub fn write_header(&mut self) -> io::Result<()> {
        self.out.write_all(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n")
    }

    pub fn write_object(&mut self, id: ObjId, obj: &PdfObject) -> io::Result<()> {
        self.xref.push((id.0, self.out.written));
        write!(self.out, "{} 0 obj\n", id.0)?;
        obj.write_to(&mut self.out)?;
        self.out.write_all(b"\nendobj\n")
    }

    pub fn bytes_written(&self) -> u64 {
        self.out.written
    }

    /// Xref table, trailer, startxref and `%%EOF`. Object numbers
    /// that were never written get free entries.
    pub fn write_trailer(&mut self, root: ObjId, info: Option<ObjId>) -> io::Result<()> {
        let xref_offset = self.out.written;
        self.xref.sort_by_key(|&(num, _)| num);
        let size = self.xref.last().map(|&(num, _)| num + 1).unwrap_or(1);

        write!(self.out, "xref\n0 {}\n", size)?;
        // Every entry is exactly 20 bytes including the CRLF.
        self.out.write_all(b"0000000000 65535 f\r\n")?;
        let mut entries = self.xref.iter().peekable();
        for num in 1..size {
            match entries.peek() {
                Some(&&(n, offset)) if n == num => {
                    write!(self.out, "{:010} 00000 n\r\n", offset)?;
                    entries.next();
                }
                _ => self.out.write_all(b"0000000000 00000 f\r\n")?,
            }
        }

        write!(self.out, "trailer\n<< /Size {} /Root {} 0 R", size, root.0)?;
        if let Some(info) = info {
            write!(self.out, " /Info {} 0 R", info.0)?;
        }
        write!(self.out, " >>\nstartxref\n{}\n%%EOF\n", xref_offset)
    }

    pub fn into_inner(self) -> W {
        self.out.inner
    }
}

/// Escape a literal string for output between parens.
///
/// Standard fonts are addressed with WinAnsi codes, so Latin-1
/// characters become octal escapes and anything beyond Latin-1
/// becomes `?`. The result is always plain ASCII.
pub fn escape_pdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => out.push_str(&format!("\\{:03o}", c as u32)),
            _ => out.push('?'),
        }
    }
    out
}

/// Format a number for PDF output: integers without a decimal
/// point, everything else with at most four decimals and no
/// trailing zeros.
pub fn format_real(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        return format!("{}", v as i64);
    }
    let s = format!("{:.4}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
