//! Which sections and fields an application produces, as a fixed
//! table of rules evaluated in order.

use crate::application::{Application, Qualification, Tier};
use crate::layout::DrawRequest;

type Getter = fn(&Application) -> &str;

/// When a rule contributes to the document.
#[derive(Clone, Copy)]
enum When {
    Always,
    /// The answer is non-empty.
    Answered(Getter),
    Tier(Tier),
    If(fn(&Application) -> bool),
}

impl When {
    fn holds(self, app: &Application) -> bool {
        match self {
            When::Always => true,
            When::Answered(get) => !get(app).is_empty(),
            When::Tier(tier) => app.has_tier(tier),
            When::If(test) => test(app),
        }
    }
}

#[derive(Clone, Copy)]
enum TierField {
    Degree,
    University,
    Subject,
    Year,
    Percentage,
}

impl TierField {
    fn get(self, q: Qualification<'_>) -> &str {
        match self {
            TierField::Degree => q.degree,
            TierField::University => q.university,
            TierField::Subject => q.subject,
            TierField::Year => q.year,
            TierField::Percentage => q.percentage,
        }
    }
}

#[derive(Clone, Copy)]
enum Value {
    Text(Getter),
    Formatted(fn(&Application) -> String),
    Tier(Tier, TierField),
}

impl Value {
    fn resolve(self, app: &Application) -> String {
        match self {
            Value::Text(get) => get(app).to_string(),
            Value::Formatted(format) => format(app),
            Value::Tier(tier, field) => field.get(app.qualification(tier)).to_string(),
        }
    }
}

#[derive(Clone, Copy)]
enum Emit {
    Section(&'static str),
    Field {
        label: &'static str,
        value: Value,
        full_width: bool,
    },
}

#[derive(Clone, Copy)]
struct Rule {
    when: When,
    emit: Emit,
}

impl Rule {
    fn request(&self, app: &Application) -> DrawRequest {
        match self.emit {
            Emit::Section(title) => DrawRequest::section(title),
            Emit::Field {
                label,
                value,
                full_width,
            } => DrawRequest::Field {
                label: label.to_string(),
                value: value.resolve(app),
                full_width,
            },
        }
    }
}

const fn section(when: When, title: &'static str) -> Rule {
    Rule {
        when,
        emit: Emit::Section(title),
    }
}

const fn field(when: When, label: &'static str, value: Value) -> Rule {
    Rule {
        when,
        emit: Emit::Field {
            label,
            value,
            full_width: false,
        },
    }
}

const fn wide(when: When, label: &'static str, value: Value) -> Rule {
    Rule {
        when,
        emit: Emit::Field {
            label,
            value,
            full_width: true,
        },
    }
}

const fn tier_rules(tier: Tier) -> [Rule; 6] {
    let when = When::Tier(tier);
    [
        section(when, tier.section_title()),
        field(when, "Degree", Value::Tier(tier, TierField::Degree)),
        wide(when, "University", Value::Tier(tier, TierField::University)),
        field(when, "Subject", Value::Tier(tier, TierField::Subject)),
        field(when, "Year of Passing", Value::Tier(tier, TierField::Year)),
        field(when, "Percentage", Value::Tier(tier, TierField::Percentage)),
    ]
}

const ALWAYS: When = When::Always;

static PERSONAL: [Rule; 10] = [
    wide(ALWAYS, "Application for Post", Value::Text(|a| a.post_applied_for.as_str())),
    wide(ALWAYS, "Organization", Value::Text(|a| a.organization.as_str())),
    wide(ALWAYS, "Full Name", Value::Text(|a| a.full_name.as_str())),
    field(ALWAYS, "Date of Birth", Value::Text(|a| a.date_of_birth.as_str())),
    field(ALWAYS, "Contact No", Value::Text(|a| a.contact_no.as_str())),
    field(ALWAYS, "Mother Tongue", Value::Text(|a| a.mother_tongue.as_str())),
    wide(ALWAYS, "Social Media ID", Value::Text(|a| a.social_media_id.as_str())),
    field(ALWAYS, "Sex", Value::Text(|a| a.sex.as_str())),
    field(ALWAYS, "Family Status", Value::Text(|a| a.family_status.as_str())),
    field(
        When::If(|a| a.family_status == "Unmarried" && !a.marriage_plan.is_empty()),
        "Marriage Plan",
        Value::Text(|a| a.marriage_plan.as_str()),
    ),
];

static GRADUATION: [Rule; 6] = tier_rules(Tier::Graduation);
static POST_GRADUATION: [Rule; 6] = tier_rules(Tier::PostGraduation);
static PROFESSIONAL: [Rule; 6] = tier_rules(Tier::ProfessionalPostGraduation);

static SKILLS: [Rule; 4] = [
    section(ALWAYS, "Other Skills/Knowledge"),
    wide(
        When::Answered(|a| a.other_courses.as_str()),
        "Other Courses",
        Value::Text(|a| a.other_courses.as_str()),
    ),
    wide(
        When::If(|a| !a.computer_knowledge.is_empty()),
        "Computer Knowledge",
        Value::Formatted(|a| a.computer_knowledge.lines()),
    ),
    wide(
        When::If(|a| !a.other_skills.is_empty()),
        "Other Skills",
        Value::Formatted(|a| a.other_skills.lines()),
    ),
];

static EDUCATION: [Rule; 5] = [
    section(ALWAYS, "Educational Information"),
    field(ALWAYS, "Schooling Medium", Value::Text(|a| a.schooling_medium.as_str())),
    wide(
        When::Answered(|a| a.subject_proficiency.as_str()),
        "Subject Proficiency",
        Value::Text(|a| a.subject_proficiency.as_str()),
    ),
    field(
        When::Answered(|a| a.teaching_standard.as_str()),
        "Teaching Standard",
        Value::Text(|a| a.teaching_standard.as_str()),
    ),
    wide(
        When::Answered(|a| a.other_subjects.as_str()),
        "Other Subjects",
        Value::Text(|a| a.other_subjects.as_str()),
    ),
];

static EMPLOYMENT: [Rule; 9] = [
    section(ALWAYS, "Employment Information"),
    field(ALWAYS, "Current Job Status", Value::Text(|a| a.current_job_status.as_str())),
    wide(
        When::If(Application::is_working),
        "Current Organization",
        Value::Text(|a| a.current_organization.as_str()),
    ),
    wide(
        When::If(Application::is_working),
        "Current Job Profile",
        Value::Text(|a| a.current_job_profile.as_str()),
    ),
    field(
        When::If(|a| a.is_working() && !a.current_salary.is_empty()),
        "Current Salary",
        Value::Formatted(|a| format!("Rs. {}", a.current_salary)),
    ),
    field(
        When::If(Application::is_working),
        "P.F Deducted",
        Value::Text(|a| a.pf_deducted.as_str()),
    ),
    field(
        When::Answered(|a| a.expected_salary.as_str()),
        "Expected Salary Per Month",
        Value::Formatted(Application::expected_salary_display),
    ),
    field(ALWAYS, "Can Join From", Value::Text(Application::joining_display)),
    // custom ranges get the wide column
    wide(
        When::If(Application::has_custom_timing),
        "Preferable Timings",
        Value::Formatted(Application::timing_display),
    ),
];

static TIMING_PRESET: [Rule; 1] = [field(
    When::If(|a| !a.has_custom_timing()),
    "Preferable Timings",
    Value::Text(|a| a.preferable_timings.as_str()),
)];

static REFERENCES: [Rule; 4] = [
    section(When::If(Application::has_reference), "References"),
    wide(
        When::Answered(|a| a.reference_name.as_str()),
        "Reference Name",
        Value::Text(|a| a.reference_name.as_str()),
    ),
    wide(
        When::Answered(|a| a.reference_profession.as_str()),
        "Professional Status",
        Value::Text(|a| a.reference_profession.as_str()),
    ),
    field(
        When::Answered(|a| a.reference_contact.as_str()),
        "Contact",
        Value::Text(|a| a.reference_contact.as_str()),
    ),
];

static PLAN: [&[Rule]; 9] = [
    &PERSONAL,
    &GRADUATION,
    &POST_GRADUATION,
    &PROFESSIONAL,
    &SKILLS,
    &EDUCATION,
    &EMPLOYMENT,
    &TIMING_PRESET,
    &REFERENCES,
];

/// The draw requests for everything between the lead section and
/// the declaration, in document order.
pub fn draw_plan(app: &Application) -> Vec<DrawRequest> {
    PLAN.iter()
        .flat_map(|rules| rules.iter())
        .filter(|rule| rule.when.holds(app))
        .map(|rule| rule.request(app))
        .collect()
}
