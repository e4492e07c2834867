use std::collections::BTreeSet;
use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{Error, Result};
use crate::fonts::{Font, TextStyle};
use crate::graphics::Color;
use crate::images::{decode_image, DecodedImage, ImageFormat};
use crate::objects::{ObjId, PdfObject};
use crate::writer::{escape_pdf_string, format_real, PdfWriter};

const CATALOG_OBJ: ObjId = ObjId(1);
const PAGES_OBJ: ObjId = ObjId(2);
const FONT_REGULAR_OBJ: ObjId = ObjId(3);
const FONT_BOLD_OBJ: ObjId = ObjId(4);
const FIRST_FREE_OBJ: u32 = 5;

/// Handle to an image XObject written into a `PdfDocument`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub usize);

/// PDF document builder in points with a bottom-left origin.
///
/// Content streams are flushed to the writer by `end_page()`, but
/// page dictionaries are held back until `end_document()`. That
/// makes every finished page re-openable with `open_page()`: the
/// overlay becomes an extra content stream drawn on top of the
/// original. This is what lets a "Page X of Y" footer be added once
/// the total is known.
pub struct PdfDocument<W: Write> {
    writer: PdfWriter<W>,
    info: Vec<(String, String)>,
    pages: Vec<PageRecord>,
    open: Option<OpenPage>,
    images: Vec<ObjId>,
    compress: bool,
    next_obj: u32,
}

struct PageRecord {
    id: ObjId,
    width: f64,
    height: f64,
    contents: Vec<ObjId>,
    images: BTreeSet<ImageId>,
}

struct OpenPage {
    index: usize,
    ops: Vec<u8>,
}

impl<W: Write> PdfDocument<W> {
    /// Writes the header and the two shared font objects immediately.
    pub fn new(writer: W) -> io::Result<Self> {
        let mut writer = PdfWriter::new(writer);
        writer.write_header()?;
        for (id, font) in [
            (FONT_REGULAR_OBJ, Font::Helvetica),
            (FONT_BOLD_OBJ, Font::HelveticaBold),
        ] {
            let dict = PdfObject::dict(vec![
                ("Type", PdfObject::name("Font")),
                ("Subtype", PdfObject::name("Type1")),
                ("BaseFont", PdfObject::name(font.base_name())),
                ("Encoding", PdfObject::name("WinAnsiEncoding")),
            ]);
            writer.write_object(id, &dict)?;
        }

        Ok(PdfDocument {
            writer,
            info: Vec::new(),
            pages: Vec::new(),
            open: None,
            images: Vec::new(),
            compress: false,
            next_obj: FIRST_FREE_OBJ,
        })
    }

    /// Flate-compress content streams and raw image samples.
    pub fn set_compression(&mut self, enabled: bool) -> &mut Self {
        self.compress = enabled;
        self
    }

    /// Set a document info entry (e.g. "Title", "Creator").
    pub fn set_info(&mut self, key: &str, value: &str) -> &mut Self {
        self.info.push((key.to_string(), value.to_string()));
        self
    }

    /// Number of pages created so far, including an open one.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 1-based number of the page currently being drawn on.
    pub fn current_page(&self) -> Option<usize> {
        self.open.as_ref().map(|p| p.index + 1)
    }

    /// Start a new page of the given size in points. An open page
    /// is closed first.
    pub fn begin_page(&mut self, width: f64, height: f64) -> io::Result<&mut Self> {
        self.end_page()?;
        let id = self.alloc();
        self.pages.push(PageRecord {
            id,
            width,
            height,
            contents: Vec::new(),
            images: BTreeSet::new(),
        });
        self.open = Some(OpenPage {
            index: self.pages.len() - 1,
            ops: Vec::new(),
        });
        Ok(self)
    }

    /// Reopen an existing page (1-based) to draw on top of it.
    pub fn open_page(&mut self, page: usize) -> Result<&mut Self> {
        if page == 0 || page > self.pages.len() {
            return Err(Error::PageOutOfRange {
                page,
                count: self.pages.len(),
            });
        }
        self.end_page()?;
        self.open = Some(OpenPage {
            index: page - 1,
            ops: Vec::new(),
        });
        Ok(self)
    }

    /// Flush the open page's drawing as a content stream. A no-op
    /// when no page is open or nothing was drawn.
    pub fn end_page(&mut self) -> io::Result<()> {
        let Some(page) = self.open.take() else {
            return Ok(());
        };
        if page.ops.is_empty() {
            return Ok(());
        }
        let id = self.alloc();
        let stream = self.encode_stream(vec![], page.ops)?;
        self.writer.write_object(id, &stream)?;
        self.pages[page.index].contents.push(id);
        Ok(())
    }

    /// Text at baseline (x, y).
    pub fn place_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> &mut Self {
        let ops = format!(
            "q\n{} rg\nBT\n/{} {} Tf\n{} {} Td\n({}) Tj\nET\nQ\n",
            color_operands(style.color),
            style.font.resource_name(),
            format_real(style.size),
            format_real(x),
            format_real(y),
            escape_pdf_string(text),
        );
        self.push_ops(ops.as_bytes());
        self
    }

    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        self.push_ops(format!("{} rg\n", color_operands(color)).as_bytes());
        self
    }

    pub fn set_stroke_color(&mut self, color: Color) -> &mut Self {
        self.push_ops(format!("{} RG\n", color_operands(color)).as_bytes());
        self
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.push_ops(format!("{} w\n", format_real(width)).as_bytes());
        self
    }

    /// Append a rectangle path with lower-left corner (x, y).
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let ops = format!(
            "{} {} {} {} re\n",
            format_real(x),
            format_real(y),
            format_real(width),
            format_real(height),
        );
        self.push_ops(ops.as_bytes());
        self
    }

    pub fn fill(&mut self) -> &mut Self {
        self.push_ops(b"f\n");
        self
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.push_ops(b"S\n");
        self
    }

    pub fn save_state(&mut self) -> &mut Self {
        self.push_ops(b"q\n");
        self
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.push_ops(b"Q\n");
        self
    }

    /// Decode and embed an image. The XObject is written right away;
    /// the returned id can be placed on any number of pages.
    pub fn load_image_bytes(&mut self, data: &[u8]) -> Result<ImageId> {
        let image = decode_image(data)?;
        self.embed_image(&image)
    }

    pub fn embed_image(&mut self, image: &DecodedImage) -> Result<ImageId> {
        let smask = match &image.alpha {
            Some(alpha) => {
                let id = self.alloc();
                let obj = self.image_stream(image, "DeviceGray", alpha.clone(), None)?;
                self.writer.write_object(id, &obj)?;
                Some(id)
            }
            None => None,
        };
        let id = self.alloc();
        let obj = self.image_stream(image, image.color_space.pdf_name(), image.data.clone(), smask)?;
        self.writer.write_object(id, &obj)?;
        self.images.push(id);
        Ok(ImageId(self.images.len() - 1))
    }

    /// Draw an image stretched over the rectangle whose lower-left
    /// corner is (x, y).
    pub fn place_image(&mut self, image: ImageId, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let Some(page) = self.open.as_ref().map(|p| p.index) else {
            log::warn!("place_image called with no open page");
            return self;
        };
        self.pages[page].images.insert(image);
        let ops = format!(
            "q\n{} 0 0 {} {} {} cm\n/Im{} Do\nQ\n",
            format_real(width),
            format_real(height),
            format_real(x),
            format_real(y),
            image.0,
        );
        self.push_ops(ops.as_bytes());
        self
    }

    /// Write page dictionaries, the page tree, catalog, info and
    /// xref. Consumes the document and returns the inner writer.
    pub fn end_document(mut self) -> io::Result<W> {
        self.end_page()?;

        let fonts = PdfObject::dict(vec![
            (Font::Helvetica.resource_name(), PdfObject::Reference(FONT_REGULAR_OBJ)),
            (Font::HelveticaBold.resource_name(), PdfObject::Reference(FONT_BOLD_OBJ)),
        ]);
        for page in &self.pages {
            let mut resources = vec![("Font", fonts.clone())];
            if !page.images.is_empty() {
                let xobjects = page
                    .images
                    .iter()
                    .map(|img| (format!("Im{}", img.0), PdfObject::Reference(self.images[img.0])))
                    .collect();
                resources.push(("XObject", PdfObject::Dictionary(xobjects)));
            }
            let contents = match page.contents.as_slice() {
                [single] => PdfObject::Reference(*single),
                many => PdfObject::Array(many.iter().map(|&id| PdfObject::Reference(id)).collect()),
            };
            let dict = PdfObject::dict(vec![
                ("Type", PdfObject::name("Page")),
                ("Parent", PdfObject::Reference(PAGES_OBJ)),
                (
                    "MediaBox",
                    PdfObject::Array(vec![
                        PdfObject::Integer(0),
                        PdfObject::Integer(0),
                        PdfObject::Real(page.width),
                        PdfObject::Real(page.height),
                    ]),
                ),
                ("Contents", contents),
                ("Resources", PdfObject::dict(resources)),
            ]);
            self.writer.write_object(page.id, &dict)?;
        }

        let kids = self.pages.iter().map(|p| PdfObject::Reference(p.id)).collect();
        let tree = PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            ("Kids", PdfObject::Array(kids)),
            ("Count", PdfObject::Integer(self.pages.len() as i64)),
        ]);
        self.writer.write_object(PAGES_OBJ, &tree)?;

        let catalog = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(PAGES_OBJ)),
        ]);
        self.writer.write_object(CATALOG_OBJ, &catalog)?;

        let info = if self.info.is_empty() {
            None
        } else {
            let id = self.alloc();
            let entries = self
                .info
                .iter()
                .map(|(k, v)| (k.clone(), PdfObject::string(v)))
                .collect();
            self.writer.write_object(id, &PdfObject::Dictionary(entries))?;
            Some(id)
        };

        self.writer.write_trailer(CATALOG_OBJ, info)?;
        Ok(self.writer.into_inner())
    }

    fn alloc(&mut self) -> ObjId {
        let id = ObjId(self.next_obj);
        self.next_obj += 1;
        id
    }

    fn push_ops(&mut self, ops: &[u8]) {
        match self.open.as_mut() {
            Some(page) => page.ops.extend_from_slice(ops),
            None => log::warn!("drawing operation ignored: no open page"),
        }
    }

    fn encode_stream(&self, mut dict: Vec<(&str, PdfObject)>, data: Vec<u8>) -> io::Result<PdfObject> {
        if !self.compress {
            return Ok(PdfObject::stream(dict, data));
        }
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&data)?;
        dict.push(("Filter", PdfObject::name("FlateDecode")));
        Ok(PdfObject::stream(dict, encoder.finish()?))
    }

    fn image_stream(
        &self,
        image: &DecodedImage,
        color_space: &str,
        samples: Vec<u8>,
        smask: Option<ObjId>,
    ) -> io::Result<PdfObject> {
        let mut dict = vec![
            ("Type", PdfObject::name("XObject")),
            ("Subtype", PdfObject::name("Image")),
            ("Width", PdfObject::Integer(image.width as i64)),
            ("Height", PdfObject::Integer(image.height as i64)),
            ("ColorSpace", PdfObject::name(color_space)),
            ("BitsPerComponent", PdfObject::Integer(8)),
        ];
        if let Some(mask) = smask {
            dict.push(("SMask", PdfObject::Reference(mask)));
        }
        if image.format == ImageFormat::Jpeg && smask.is_none() && color_space == image.color_space.pdf_name() {
            dict.push(("Filter", PdfObject::name("DCTDecode")));
            return Ok(PdfObject::stream(dict, samples));
        }
        self.encode_stream(dict, samples)
    }
}

fn color_operands(c: Color) -> String {
    format!("{} {} {}", format_real(c.r), format_real(c.g), format_real(c.b))
}
