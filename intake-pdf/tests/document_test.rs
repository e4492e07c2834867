use intake_pdf::{Color, Error, PdfDocument, PdfSurface, Rect, Surface, TextStyle};

fn pdf_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn tiny_png() -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, 2, 2);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[90u8; 12]).unwrap();
    }
    out
}

// -------------------------------------------------------
// structure
// -------------------------------------------------------

#[test]
fn minimal_document_structure() {
    let mut doc = PdfDocument::new(Vec::new()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    doc.place_text("Hello", 72.0, 720.0, &TextStyle::regular(12.0));
    let out = pdf_text(&doc.end_document().unwrap());

    assert!(out.starts_with("%PDF-1.7"));
    assert!(out.contains("/Type /Catalog"));
    assert!(out.contains("/Type /Pages"));
    assert!(out.contains("/Count 1"));
    assert!(out.contains("/BaseFont /Helvetica"));
    assert!(out.contains("(Hello) Tj"));
    assert!(out.contains("xref"));
    assert!(out.trim_end().ends_with("%%EOF"));
}

#[test]
fn info_dictionary_is_written() {
    let mut doc = PdfDocument::new(Vec::new()).unwrap();
    doc.set_info("Title", "Employee Information Form");
    doc.begin_page(595.0, 842.0).unwrap();
    let out = pdf_text(&doc.end_document().unwrap());
    assert!(out.contains("/Title (Employee Information Form)"));
    assert!(out.contains("/Info "));
}

// -------------------------------------------------------
// open_page
// -------------------------------------------------------

#[test]
fn reopened_page_gets_a_contents_array() {
    let mut doc = PdfDocument::new(Vec::new()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    doc.place_text("Body one", 72.0, 720.0, &TextStyle::regular(10.0));
    doc.begin_page(595.0, 842.0).unwrap();
    doc.place_text("Body two", 72.0, 720.0, &TextStyle::regular(10.0));

    doc.open_page(1).unwrap();
    doc.place_text("Page 1 of 2", 450.0, 28.0, &TextStyle::regular(8.0));
    doc.open_page(2).unwrap();
    doc.place_text("Page 2 of 2", 450.0, 28.0, &TextStyle::regular(8.0));
    let out = pdf_text(&doc.end_document().unwrap());

    assert_eq!(out.matches("/Contents [").count(), 2);
    assert!(out.contains("(Body one) Tj"));
    assert!(out.contains("(Page 2 of 2) Tj"));
    assert!(out.contains("/Count 2"));
}

#[test]
fn page_without_overlay_keeps_single_reference() {
    let mut doc = PdfDocument::new(Vec::new()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    doc.place_text("Only", 72.0, 720.0, &TextStyle::regular(10.0));
    let out = pdf_text(&doc.end_document().unwrap());
    assert!(!out.contains("/Contents ["));
    assert!(out.contains("/Contents "));
}

#[test]
fn open_page_errors_report_page_count() {
    let mut doc = PdfDocument::new(Vec::new()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    match doc.open_page(3) {
        Err(Error::PageOutOfRange { page, count }) => assert_eq!((page, count), (3, 1)),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("page 3 should not open"),
    }
}

// -------------------------------------------------------
// compression
// -------------------------------------------------------

/// Raw bytes of the first Flate-filtered stream in `pdf`.
fn first_flate_stream(pdf: &[u8]) -> &[u8] {
    let find = |hay: &[u8], needle: &[u8]| hay.windows(needle.len()).position(|w| w == needle);
    let filter = find(pdf, b"/Filter /FlateDecode").unwrap();
    let rest = &pdf[filter..];
    let length_at = find(rest, b"/Length ").unwrap() + b"/Length ".len();
    let digits: String = rest[length_at..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .map(|&b| b as char)
        .collect();
    let length: usize = digits.parse().unwrap();
    let data_at = find(rest, b"stream\n").unwrap() + b"stream\n".len();
    &rest[data_at..data_at + length]
}

fn inflate(data: &[u8]) -> String {
    use std::io::Read;
    let mut text = String::new();
    flate2::read::ZlibDecoder::new(data).read_to_string(&mut text).unwrap();
    text
}

#[test]
fn compressed_content_inflates_to_operators() {
    let mut doc = PdfDocument::new(Vec::new()).unwrap();
    doc.set_compression(true);
    doc.begin_page(595.0, 842.0).unwrap();
    doc.place_text("Compressed text", 72.0, 720.0, &TextStyle::regular(10.0));
    let pdf = doc.end_document().unwrap();
    assert!(pdf_text(&pdf).contains("/Filter /FlateDecode"));

    let ops = inflate(first_flate_stream(&pdf));
    assert!(ops.contains("(Compressed text) Tj"));
}

#[test]
fn repetitive_content_shrinks_when_compressed() {
    let page_with = |compress: bool| {
        let mut doc = PdfDocument::new(Vec::new()).unwrap();
        doc.set_compression(compress);
        doc.begin_page(595.0, 842.0).unwrap();
        for i in 0..200 {
            doc.place_text("Repeated line", 72.0, 800.0 - i as f64 * 3.0, &TextStyle::regular(10.0));
        }
        doc.end_document().unwrap()
    };
    let compressed = page_with(true);
    let plain = page_with(false);
    assert!(compressed.len() * 2 < plain.len());
    assert!(!pdf_text(&compressed).contains("(Repeated line) Tj"));
    assert_eq!(inflate(first_flate_stream(&compressed)).matches("(Repeated line) Tj").count(), 200);
}

#[test]
fn uncompressed_content_is_plain() {
    let mut doc = PdfDocument::new(Vec::new()).unwrap();
    doc.set_compression(false);
    doc.begin_page(595.0, 842.0).unwrap();
    doc.place_text("Plain", 72.0, 720.0, &TextStyle::regular(10.0));
    let out = pdf_text(&doc.end_document().unwrap());
    assert!(!out.contains("/FlateDecode"));
    assert!(out.contains("(Plain) Tj"));
}

// -------------------------------------------------------
// images
// -------------------------------------------------------

#[test]
fn png_becomes_an_image_xobject() {
    let mut doc = PdfDocument::new(Vec::new()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    let id = doc.load_image_bytes(&tiny_png()).unwrap();
    doc.place_image(id, 100.0, 100.0, 50.0, 50.0);
    let out = pdf_text(&doc.end_document().unwrap());

    assert!(out.contains("/Subtype /Image"));
    assert!(out.contains("/ColorSpace /DeviceRGB"));
    assert!(out.contains("/XObject << /Im0 "));
    assert!(out.contains("50 0 0 50 100 100 cm\n/Im0 Do"));
}

#[test]
fn unsupported_image_bytes_are_an_error() {
    let mut doc = PdfDocument::new(Vec::new()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    assert!(matches!(
        doc.load_image_bytes(b"GIF89a"),
        Err(Error::Image(_))
    ));
}

// -------------------------------------------------------
// surface
// -------------------------------------------------------

#[test]
fn surface_draws_in_millimetres_from_the_top() {
    let doc = PdfDocument::new(Vec::new()).unwrap();
    let mut surface = PdfSurface::new(doc, 210.0, 297.0, 72.0 / 25.4);
    surface.add_page().unwrap();
    surface.stroke_rect(
        Rect::new(5.0, 5.0, 200.0, 287.0),
        Color::rgb8(37, 99, 235),
        1.0,
    );
    let out = pdf_text(&surface.finish().unwrap());
    assert!(out.contains("/MediaBox [0 0 595.2756 841.8898]"));
    // 5 mm = 14.1732 pt
    assert!(out.contains("14.1732 14.1732 566.9291 813.5433 re\nS"));
}
