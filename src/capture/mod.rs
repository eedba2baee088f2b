//! Capture, crop, and upload pipeline
//!
//! The pipeline turns a rectangular selection of a captured viewport
//! into a share URL: selection geometry and the DPR transform live in
//! [`geometry`], the raster crop in [`crop`], the cross-context message
//! boundary in [`message`], the collaborator seams in [`page`] and
//! [`capturer`], and the sequencing in [`orchestrator`].

pub mod capturer;
pub mod crop;
pub mod geometry;
pub mod message;
pub mod orchestrator;
pub mod page;

pub use capturer::{CaptureError, FileCapturer, ViewportCapturer};
pub use crop::CropError;
pub use geometry::{DeviceRect, SelectionArea};
pub use message::Envelope;
pub use orchestrator::{CaptureOutcome, Orchestrator, PipelineError};
pub use page::{HiddenUi, PageContext, StaticPage, TabError};
