pub mod application;
pub mod assemble;
pub mod config;
pub mod display;
pub mod document;
pub mod error;
pub mod fonts;
pub mod graphics;
pub mod history;
pub mod images;
pub mod layout;
pub mod objects;
pub mod plan;
pub mod surface;
pub mod wrap;
pub mod writer;

pub use application::{validate_submission, Application, OptionSet, Tier};
pub use assemble::{generate, preview, render, submit, Assets, GeneratedDocument, RenderOptions, Submission};
pub use config::{BreakPolicy, LayoutConfig};
pub use display::{DisplayItem, DisplayList, DisplayPage};
pub use document::{ImageId, PdfDocument};
pub use error::{Error, FieldError, Result};
pub use fonts::{Font, TextStyle};
pub use graphics::{Color, Rect};
pub use history::{History, SubmissionRecord};
pub use layout::{BlockKind, Decorated, DrawRequest, Layout, Placement, TextRow};
pub use plan::draw_plan;
pub use surface::{PdfSurface, Surface};
pub use wrap::{Measure, RenderedBlock};
