//! The intake record and its input-boundary validation.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, FieldError, Result};
use crate::images::{detect_format, MAX_PHOTO_BYTES};

pub const COMPUTER_KNOWLEDGE_OPTIONS: [&str; 12] = [
    "MS Office (Word, Excel, PPT)",
    "Google Workspace (Drive, Sheets, Docs, Forms, Meet)",
    "Email drafting & communication",
    "PDF handling (edit, merge, compress)",
    "Data entry & report prep",
    "Typing & formatting (English/Gujarati)",
    "File management & cloud storage",
    "Attendance & timetable software",
    "Zoom / Google Meet / online tools",
    "Social media & digital tools",
    "Basic system/internet troubleshooting",
    "Printing, scanning & document sharing",
];

pub const OTHER_SKILL_OPTIONS: [&str; 8] = [
    "Drawing",
    "Art / Craft",
    "Dance",
    "Music",
    "Sports",
    "Photography",
    "Writing / Poetry",
    "Public Speaking",
];

/// A multi-select answer: a set of option labels kept in the order
/// they were first chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OptionSet(Vec<String>);

impl OptionSet {
    pub fn new() -> Self {
        OptionSet(Vec::new())
    }

    /// Returns false if the option was already chosen.
    pub fn add(&mut self, option: &str) -> bool {
        if self.contains(option) {
            return false;
        }
        self.0.push(option.to_string());
        true
    }

    /// Returns false if the option was not chosen.
    pub fn remove(&mut self, option: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|o| o != option);
        self.0.len() != before
    }

    /// Add the option if absent, remove it if present. Returns
    /// whether it is chosen afterwards.
    pub fn toggle(&mut self, option: &str) -> bool {
        if self.remove(option) {
            false
        } else {
            self.add(option)
        }
    }

    pub fn contains(&self, option: &str) -> bool {
        self.0.iter().any(|o| o == option)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// One option per line, so each starts a new row when wrapped.
    pub fn lines(&self) -> String {
        self.0.join("\n")
    }
}

impl<'a> FromIterator<&'a str> for OptionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = OptionSet::new();
        for option in iter {
            set.add(option);
        }
        set
    }
}

// Older submissions stored the selection as one comma-separated
// string, so accept both shapes. Labels may contain commas themselves.
impl<'de> Deserialize<'de> for OptionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            List(Vec<String>),
            Joined(String),
        }

        let set = match Raw::deserialize(deserializer)? {
            Raw::List(items) => items.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect(),
            Raw::Joined(text) => split_joined(&text).into_iter().collect(),
        };
        Ok(set)
    }
}

/// Split a comma-joined selection, preferring the longest known label
/// at each position so "MS Office (Word, Excel, PPT)" stays whole.
/// Unknown text falls back to splitting at the next comma.
fn split_joined(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text.trim_start();
    while !rest.is_empty() {
        let known = COMPUTER_KNOWLEDGE_OPTIONS
            .iter()
            .chain(OTHER_SKILL_OPTIONS.iter())
            .filter(|label| {
                rest.strip_prefix(**label)
                    .is_some_and(|after| after.trim_start().is_empty() || after.trim_start().starts_with(','))
            })
            .max_by_key(|label| label.len());
        let (part, after) = match known {
            Some(label) => (*label, &rest[label.len()..]),
            None => match rest.find(',') {
                Some(i) => (&rest[..i], &rest[i..]),
                None => (rest, ""),
            },
        };
        let part = part.trim();
        if !part.is_empty() {
            parts.push(part);
        }
        rest = after.trim_start();
        rest = rest.strip_prefix(',').unwrap_or(rest).trim_start();
    }
    parts
}

/// One of the three optional qualification levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Graduation,
    PostGraduation,
    ProfessionalPostGraduation,
}

impl Tier {
    pub const fn section_title(self) -> &'static str {
        match self {
            Tier::Graduation => "Graduation Qualification",
            Tier::PostGraduation => "Academic Post-Graduation Qualification",
            Tier::ProfessionalPostGraduation => "Professional Post-Graduation Qualification",
        }
    }
}

/// Borrowed view of one tier's answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Qualification<'a> {
    pub degree: &'a str,
    pub university: &'a str,
    pub subject: &'a str,
    pub year: &'a str,
    pub percentage: &'a str,
}

/// A submitted employment application. Text answers are kept as
/// entered; an empty string means "not answered".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Application {
    pub post_applied_for: String,
    pub organization: String,
    pub full_name: String,
    pub date_of_birth: String,
    pub contact_no: String,
    pub mother_tongue: String,
    pub social_media_id: String,
    pub family_status: String,
    pub marriage_plan: String,
    pub sex: String,

    pub has_graduation: bool,
    pub graduation_degree: String,
    pub graduation_university: String,
    pub graduation_subject: String,
    pub graduation_year: String,
    pub graduation_percentage: String,

    pub has_post_graduation: bool,
    pub post_graduation_degree: String,
    pub post_graduation_university: String,
    pub post_graduation_subject: String,
    pub post_graduation_year: String,
    pub post_graduation_percentage: String,

    pub has_professional_post_graduation: bool,
    pub professional_post_graduation_degree: String,
    pub professional_post_graduation_university: String,
    pub professional_post_graduation_subject: String,
    pub professional_post_graduation_year: String,
    pub professional_post_graduation_percentage: String,

    pub other_courses: String,
    pub computer_knowledge: OptionSet,
    pub other_skills: OptionSet,

    pub schooling_medium: String,
    pub subject_proficiency: String,
    pub teaching_standard: String,
    pub other_subjects: String,

    pub current_job_status: String,
    pub current_organization: String,
    pub current_job_profile: String,
    pub current_salary: String,
    pub pf_deducted: String,
    pub expected_salary: String,
    pub joining_time: String,
    pub custom_joining_date: String,
    pub preferable_timings: String,
    pub custom_timing_from: String,
    pub custom_timing_from_period: String,
    pub custom_timing_to: String,
    pub custom_timing_to_period: String,

    pub reference_name: String,
    pub reference_profession: String,
    pub reference_contact: String,
}

impl Application {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn has_tier(&self, tier: Tier) -> bool {
        match tier {
            Tier::Graduation => self.has_graduation,
            Tier::PostGraduation => self.has_post_graduation,
            Tier::ProfessionalPostGraduation => self.has_professional_post_graduation,
        }
    }

    pub fn qualification(&self, tier: Tier) -> Qualification<'_> {
        match tier {
            Tier::Graduation => Qualification {
                degree: &self.graduation_degree,
                university: &self.graduation_university,
                subject: &self.graduation_subject,
                year: &self.graduation_year,
                percentage: &self.graduation_percentage,
            },
            Tier::PostGraduation => Qualification {
                degree: &self.post_graduation_degree,
                university: &self.post_graduation_university,
                subject: &self.post_graduation_subject,
                year: &self.post_graduation_year,
                percentage: &self.post_graduation_percentage,
            },
            Tier::ProfessionalPostGraduation => Qualification {
                degree: &self.professional_post_graduation_degree,
                university: &self.professional_post_graduation_university,
                subject: &self.professional_post_graduation_subject,
                year: &self.professional_post_graduation_year,
                percentage: &self.professional_post_graduation_percentage,
            },
        }
    }

    pub fn is_working(&self) -> bool {
        self.current_job_status == "Working"
    }

    pub fn has_reference(&self) -> bool {
        [
            &self.reference_name,
            &self.reference_profession,
            &self.reference_contact,
        ]
        .iter()
        .any(|s| !s.is_empty())
    }

    /// Joining time, or the custom date when "Other" was chosen
    /// and a date given.
    pub fn joining_display(&self) -> &str {
        if self.joining_time == "Other" && !self.custom_joining_date.is_empty() {
            &self.custom_joining_date
        } else {
            &self.joining_time
        }
    }

    /// Whether the preferred hours are a custom range.
    pub fn has_custom_timing(&self) -> bool {
        self.preferable_timings == "Other"
            && !self.custom_timing_from.is_empty()
            && !self.custom_timing_to.is_empty()
    }

    /// `9 AM to 1 PM` for a custom range, else the chosen timing.
    /// Missing periods default to AM for the start and PM for the end.
    pub fn timing_display(&self) -> String {
        if !self.has_custom_timing() {
            return self.preferable_timings.clone();
        }
        format!(
            "{} {} to {} {}",
            self.custom_timing_from,
            non_empty_or(&self.custom_timing_from_period, "AM"),
            self.custom_timing_to,
            non_empty_or(&self.custom_timing_to_period, "PM"),
        )
    }

    /// Expected salary as the leading integer of the answer
    /// (`"15000 negotiable"` shows as `15000`).
    pub fn expected_salary_display(&self) -> String {
        let trimmed = self.expected_salary.trim_start();
        let (sign, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return self.expected_salary.clone();
        }
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            "0".to_string()
        } else {
            format!("{}{}", sign, digits)
        }
    }

    /// Every problem with the record, in form order.
    pub fn field_errors(&self) -> Vec<FieldError> {
        let required: [(&'static str, &str, &str); 12] = [
            ("postAppliedFor", self.post_applied_for.as_str(), "This field is required"),
            ("organization", self.organization.as_str(), "This field is required"),
            ("fullName", self.full_name.as_str(), "Full name is required"),
            ("dateOfBirth", self.date_of_birth.as_str(), "Date of birth is required"),
            ("contactNo", self.contact_no.as_str(), "Contact number is required"),
            ("motherTongue", self.mother_tongue.as_str(), "Mother tongue is required"),
            ("familyStatus", self.family_status.as_str(), "Family status is required"),
            ("sex", self.sex.as_str(), "Sex is required"),
            ("schoolingMedium", self.schooling_medium.as_str(), "Schooling medium is required"),
            ("currentJobStatus", self.current_job_status.as_str(), "Current job status is required"),
            ("joiningTime", self.joining_time.as_str(), "Joining time is required"),
            ("preferableTimings", self.preferable_timings.as_str(), "Preferable timings are required"),
        ];

        let mut errors: Vec<FieldError> = required
            .iter()
            .filter(|(_, value, _)| value.trim().is_empty())
            .map(|(field, _, message)| FieldError::new(*field, *message))
            .collect();

        unknown_options(&mut errors, "computerKnowledge", &self.computer_knowledge, &COMPUTER_KNOWLEDGE_OPTIONS);
        unknown_options(&mut errors, "otherSkills", &self.other_skills, &OTHER_SKILL_OPTIONS);
        errors
    }

    pub fn validate(&self) -> Result<()> {
        let errors = self.field_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn unknown_options(errors: &mut Vec<FieldError>, field: &'static str, chosen: &OptionSet, known: &[&str]) {
    for option in chosen.iter().filter(|o| !known.contains(o)) {
        errors.push(FieldError::new(field, format!("Unknown option \"{}\"", option)));
    }
}

/// Problems with the passport photo, if any.
pub fn photo_errors(photo: Option<&[u8]>) -> Vec<FieldError> {
    let message = match photo {
        None | Some([]) => "Passport photo is required",
        Some(bytes) if bytes.len() > MAX_PHOTO_BYTES => "File size must be less than 10MB",
        Some(bytes) if detect_format(bytes).is_none() => "Please upload an image file",
        Some(_) => return Vec::new(),
    };
    vec![FieldError::new("photo", message)]
}

/// Validate the record and photo together, reporting every problem.
pub fn validate_submission(app: &Application, photo: Option<&[u8]>) -> Result<()> {
    let mut errors = photo_errors(photo);
    errors.extend(app.field_errors());
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}
