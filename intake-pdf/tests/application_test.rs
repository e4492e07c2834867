use chrono::{Local, NaiveDate, TimeZone};
use intake_pdf::{
    generate, preview, submit, Application, Assets, BreakPolicy, Error, History, LayoutConfig,
    RenderOptions,
};

fn asha() -> Application {
    Application::from_json(
        r#"{
            "fullName": "Asha Patel",
            "postAppliedFor": "Teacher",
            "organization": "RACE",
            "dateOfBirth": "1995-04-02",
            "contactNo": "9998887777",
            "motherTongue": "Gujarati",
            "sex": "Female",
            "familyStatus": "Unmarried",
            "marriagePlan": "1 year",
            "hasGraduation": true,
            "graduationDegree": "B.Sc",
            "graduationUniversity": "Gujarat University",
            "graduationYear": "2016",
            "graduationPercentage": "72%",
            "schoolingMedium": "Gujarati",
            "currentJobStatus": "Fresher",
            "expectedSalary": "15000",
            "joiningTime": "Immediately",
            "preferableTimings": "Morning"
        }"#,
    )
    .unwrap()
}

fn photo() -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, 3, 4);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[180u8; 36]).unwrap();
    }
    out
}

fn submitted_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 2).unwrap()
}

// -------------------------------------------------------
// end-to-end scenario
// -------------------------------------------------------

#[test]
fn asha_patel_first_page() {
    let photo = photo();
    let assets = Assets {
        photo: Some(photo.as_slice()),
        logo: None,
    };
    let done = preview(&asha(), &assets, &LayoutConfig::default(), submitted_on()).unwrap();
    let first = done.surface.page(1).unwrap();

    assert!(first.contains_text("Personal Information"));
    for label in [
        "Full Name:",
        "Date of Birth:",
        "Contact No:",
        "Mother Tongue:",
        "Sex:",
        "Family Status:",
        "Marriage Plan:",
    ] {
        assert!(first.contains_text(label), "missing {}", label);
    }
    assert!(first.contains_text("Graduation Qualification"));
    for label in ["Degree:", "University:", "Subject:", "Year of Passing:", "Percentage:"] {
        assert!(first.contains_text(label), "missing {}", label);
    }
    assert!(first.contains_text("Gujarat University"));

    for page in done.surface.pages() {
        assert!(!page.contains_text("Academic Post-Graduation Qualification"));
        assert!(!page.contains_text("Professional Post-Graduation Qualification"));
    }
}

#[test]
fn asha_patel_last_page() {
    let done = preview(&asha(), &Assets::default(), &LayoutConfig::default(), submitted_on()).unwrap();
    let n = done.page_count;
    let last = done.surface.page(n).unwrap();

    assert!(last.contains_text(&format!("Page {} of {}", n, n)));
    assert!(last.contains_text("Declaration"));
    assert!(last.contains_text("Candidate Signature : __________________"));
    assert!(last.contains_text("Submitted on: 02 April 2025"));
    assert!(last.contains_text("15000"));
}

#[test]
fn photo_is_placed_beside_the_lead_section() {
    let photo = photo();
    let assets = Assets {
        photo: Some(photo.as_slice()),
        logo: Some(photo.as_slice()),
    };
    let done = preview(&asha(), &assets, &LayoutConfig::default(), submitted_on()).unwrap();
    let images: Vec<_> = done
        .surface
        .page(1)
        .unwrap()
        .items
        .iter()
        .filter_map(|item| match item {
            intake_pdf::DisplayItem::Image { rect, .. } => Some(*rect),
            _ => None,
        })
        .collect();
    assert_eq!(images.len(), 2);
    assert_eq!((images[0].x, images[0].y), (15.0, 8.0));
    assert_eq!(
        (images[1].x, images[1].y, images[1].width, images[1].height),
        (160.0, 45.0, 35.0, 45.0)
    );
}

#[test]
fn generated_pdf_contains_the_document() {
    let photo = photo();
    let assets = Assets {
        photo: Some(photo.as_slice()),
        logo: None,
    };
    let options = RenderOptions {
        compress: false,
        ..RenderOptions::default()
    };
    let now = Local.with_ymd_and_hms(2025, 4, 2, 10, 0, 0).unwrap();
    let doc = generate(&asha(), &assets, &options, now).unwrap();
    let out = String::from_utf8_lossy(&doc.bytes).into_owned();

    assert!(doc.file_name.starts_with("Employee_Form_Asha_Patel_"));
    assert!(doc.file_name.ends_with(".pdf"));
    assert!(out.contains("(Employee Information Form) Tj"));
    assert!(out.contains("(Personal Information) Tj"));
    assert!(out.contains("(Marriage Plan:) Tj"));
    assert!(out.contains(&format!("(Page {} of {}) Tj", doc.page_count, doc.page_count)));
    assert!(out.contains("(Submitted on: 02 April 2025) Tj"));
    assert!(out.contains("/Subtype /Image"));
    assert_eq!(
        out.matches("/Contents [").count(),
        doc.page_count,
        "every page carries a decoration overlay"
    );
}

#[test]
fn compressed_output_is_smaller() {
    let now = Local.with_ymd_and_hms(2025, 4, 2, 10, 0, 0).unwrap();
    let plain = RenderOptions {
        compress: false,
        ..RenderOptions::default()
    };
    let small = generate(&asha(), &Assets::default(), &RenderOptions::default(), now).unwrap();
    let large = generate(&asha(), &Assets::default(), &plain, now).unwrap();
    assert_eq!(small.page_count, large.page_count);
    assert!(small.bytes.len() < large.bytes.len());
}

#[test]
fn threshold_policy_still_decorates_every_page() {
    let config = LayoutConfig {
        break_policy: BreakPolicy::Threshold,
        ..LayoutConfig::default()
    };
    let done = preview(&asha(), &Assets::default(), &config, submitted_on()).unwrap();
    for (i, page) in done.surface.pages().iter().enumerate() {
        assert!(page.contains_text(&format!("Page {} of {}", i + 1, done.page_count)));
        assert_eq!(page.strokes(), 1);
    }
}

// -------------------------------------------------------
// submission
// -------------------------------------------------------

#[test]
fn submit_writes_pdf_and_history() {
    let dir = tempfile::tempdir().unwrap();
    let history = History::open(dir.path().join("history.json"));
    let photo = photo();
    let assets = Assets {
        photo: Some(photo.as_slice()),
        logo: None,
    };

    let first = submit(&asha(), &assets, &RenderOptions::default(), dir.path(), &history).unwrap();
    assert!(first.path.exists());
    assert!(std::fs::read(&first.path).unwrap().starts_with(b"%PDF-1.7"));

    let mut other = asha();
    other.full_name = "Ravi Shah".into();
    submit(&other, &assets, &RenderOptions::default(), dir.path(), &history).unwrap();

    let records = history.load().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].file_name, first.record.file_name);
    assert_eq!(records[0].data.full_name, "Asha Patel");
    assert_eq!(records[1].data.full_name, "Ravi Shah");
}

#[test]
fn submit_rejects_missing_photo_and_fields() {
    let dir = tempfile::tempdir().unwrap();
    let history = History::open(dir.path().join("history.json"));
    let mut app = asha();
    app.contact_no.clear();

    match submit(&app, &Assets::default(), &RenderOptions::default(), dir.path(), &history) {
        Err(Error::Validation(errors)) => {
            let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
            assert_eq!(fields, vec!["photo", "contactNo"]);
        }
        other => panic!("expected validation error, got {:?}", other.map(|s| s.path)),
    }
    assert!(history.load().unwrap().is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn missing_history_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let history = History::open(dir.path().join("nested").join("history.json"));
    assert!(history.load().unwrap().is_empty());
}
