//! Wrapper around the Tesseract-OCR command-line engine.
//!
//! A [`Session`] copies or saves the input image to a temp file, runs the engine
//! with the requested output formats, and hands back the produced files, their
//! decoded contents, or a single joined string.

pub mod cli;
pub mod collect;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod image_source;
pub mod lang;
pub mod locate;
pub mod normalize;
pub mod session;
pub mod util;

pub use collect::OutputFile;
pub use config::Config;
pub use error::{Error, ErrorKind, Result, Warning};
pub use format::{DataOutput, OutputFormat, OutputRequest};
pub use image_source::{BitmapSource, ImageInput, ImageLibrary};
pub use lang::{Lang, LangToken};
pub use normalize::Record;
pub use session::{ExtractedData, Recognize, Session};
