use intake_pdf::{
    BlockKind, BreakPolicy, DisplayList, DrawRequest, Layout, LayoutConfig, Placement, Surface,
};

fn layout_with(policy: BreakPolicy) -> Layout<DisplayList> {
    let config = LayoutConfig {
        break_policy: policy,
        ..LayoutConfig::default()
    };
    Layout::new(DisplayList::new(210.0, 297.0), config).unwrap()
}

/// A value that wraps to several lines at the half width.
fn paragraph(words: usize) -> String {
    (0..words)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}

fn mixed_requests() -> Vec<DrawRequest> {
    let mut requests = Vec::new();
    for i in 0..12 {
        requests.push(DrawRequest::section(format!("Section {}", i)));
        requests.push(DrawRequest::field("Short", "value"));
        requests.push(DrawRequest::field("Long", paragraph(12 + i * 3)));
        requests.push(DrawRequest::full_field("Wide", paragraph(20 + i)));
        requests.push(DrawRequest::field("Empty", ""));
    }
    requests
}

// -------------------------------------------------------
// page-break invariant
// -------------------------------------------------------

#[test]
fn measured_blocks_never_cross_the_bottom_margin() {
    let mut layout = layout_with(BreakPolicy::Measured);
    layout.draw_all(&mixed_requests()).unwrap();
    let limit = layout.config().content_limit();
    let pages = layout.page();
    assert!(pages > 2, "expected several pages, got {}", pages);

    for p in layout.placements() {
        assert!(
            p.bottom <= limit + 1e-9,
            "{:?} '{}' on page {} ends at {}",
            p.kind,
            p.label,
            p.page,
            p.bottom
        );
        let top = if p.page == 1 { 45.0 } else { 20.0 };
        assert!(p.top >= top, "'{}' starts above the top margin", p.label);
    }
}

#[test]
fn placements_follow_document_order() {
    let mut layout = layout_with(BreakPolicy::Measured);
    layout.draw_all(&mixed_requests()).unwrap();
    for pair in layout.placements().windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.page == b.page {
            assert!(b.top >= a.bottom - 1e-9);
        } else {
            assert_eq!(b.page, a.page + 1);
            let top = if b.kind == BlockKind::Section { 25.0 } else { 20.0 };
            assert_eq!(b.top, top);
        }
    }
}

#[test]
fn break_resets_cursor_before_drawing() {
    let mut layout = layout_with(BreakPolicy::Measured);
    layout.draw_field("First", "x", false).unwrap();
    layout.skip(205.0);
    // cursor 258: a wrapped value no longer fits
    layout
        .draw_field("Second", &paragraph(14), false)
        .unwrap();

    let second = &layout.placements()[1];
    assert_eq!(second.page, 2);
    assert_eq!(second.top, 20.0);
    let page2 = layout.surface_mut().page(2).unwrap().clone();
    assert!(page2.contains_text("Second:"));
    assert!(!layout.surface_mut().page(1).unwrap().contains_text("Second:"));
}

#[test]
fn block_taller_than_a_page_starts_a_fresh_page() {
    let mut layout = layout_with(BreakPolicy::Measured);
    layout.draw_field("Intro", "x", false).unwrap();
    let huge = vec!["line"; 60].join("\n");
    layout.draw_field("Huge", &huge, false).unwrap();
    layout.draw_field("After", "x", false).unwrap();

    let p: Vec<&Placement> = layout.placements().iter().collect();
    assert_eq!((p[1].page, p[1].top), (2, 20.0));
    assert_eq!(p[1].bottom, 20.0 + 60.0 * 5.0 + 3.0);
    assert_eq!((p[2].page, p[2].top), (3, 20.0));
}

#[test]
fn threshold_policy_lets_tall_fields_run_past_the_limit() {
    let mut layout = layout_with(BreakPolicy::Threshold);
    layout.draw_all(&mixed_requests()).unwrap();
    let limit = layout.config().content_limit();
    assert!(layout.page() > 1);
    assert!(layout.placements().iter().any(|p| p.bottom > limit));
    // but nothing starts below it
    assert!(layout.placements().iter().all(|p| p.top <= limit + 5.0));
}

#[test]
fn section_breaks_before_the_band() {
    let mut layout = layout_with(BreakPolicy::Measured);
    layout.draw_field("First", "x", false).unwrap();
    layout.skip(200.0);
    // cursor 253: gap + band + trailing would end at 273
    layout.draw_section("References").unwrap();
    let section = layout.placements().last().unwrap();
    assert_eq!(section.kind, BlockKind::Section);
    assert_eq!((section.page, section.top), (2, 25.0));
}

// -------------------------------------------------------
// wrapping and placeholder
// -------------------------------------------------------

#[test]
fn wrapping_is_deterministic() {
    let layout = layout_with(BreakPolicy::Measured);
    let text = paragraph(40);
    let a = layout.wrap_value(&text, false);
    let b = layout.wrap_value(&text, false);
    assert_eq!(a, b);
    assert!(a.line_count() > 1);
    let wide = layout.wrap_value(&text, true);
    assert!(wide.line_count() < a.line_count());
}

#[test]
fn placeholder_takes_exactly_one_line() {
    let mut layout = layout_with(BreakPolicy::Measured);
    let before = layout.cursor();
    layout.draw_field("Contact", "", false).unwrap();
    assert_eq!(layout.cursor() - before, 8.0);
    assert!(layout.surface_mut().page(1).unwrap().contains_text("N/A"));
}

// -------------------------------------------------------
// decoration
// -------------------------------------------------------

#[test]
fn every_page_gets_one_footer_and_one_border() {
    let mut layout = layout_with(BreakPolicy::Measured);
    layout.draw_all(&mixed_requests()).unwrap();
    let done = layout.decorate().unwrap();
    let n = done.page_count;
    assert_eq!(done.surface.page_count(), n);

    for (i, page) in done.surface.pages().iter().enumerate() {
        let footers: Vec<&str> = page.texts().filter(|t| t.starts_with("Page ")).collect();
        assert_eq!(footers, vec![format!("Page {} of {}", i + 1, n)]);
        assert_eq!(page.strokes(), 1);
    }
}

#[test]
fn single_page_document_is_page_1_of_1() {
    let mut layout = layout_with(BreakPolicy::Measured);
    layout.draw_field("Only", "field", false).unwrap();
    let done = layout.decorate().unwrap();
    assert_eq!(done.page_count, 1);
    assert!(done.surface.page(1).unwrap().contains_text("Page 1 of 1"));
}

#[test]
fn decoration_is_drawn_after_content() {
    let mut layout = layout_with(BreakPolicy::Measured);
    layout.draw_all(&mixed_requests()).unwrap();
    let done = layout.decorate().unwrap();
    for page in done.surface.pages() {
        let footer = page
            .texts()
            .position(|t| t.starts_with("Page "))
            .unwrap();
        assert_eq!(footer, page.texts().count() - 1);
        assert!(matches!(
            page.items.last(),
            Some(intake_pdf::DisplayItem::StrokeRect { .. })
        ));
    }
}

#[test]
fn border_follows_the_surface_page_size() {
    let mut layout = Layout::new(DisplayList::new(100.0, 150.0), LayoutConfig::default()).unwrap();
    layout.draw_field("Only", "field", false).unwrap();
    let done = layout.decorate().unwrap();
    let page = done.surface.page(1).unwrap();
    assert!(matches!(
        page.items.last(),
        Some(intake_pdf::DisplayItem::StrokeRect { rect, .. })
            if *rect == intake_pdf::Rect::new(5.0, 5.0, 90.0, 140.0)
    ));
}
