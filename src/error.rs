//! Error type for everything at the I/O edge of the crate.
//!
//! Rendering the report and driving the diagram editor never fail; only
//! reading inputs and writing outputs do.

use std::path::PathBuf;

use thiserror::Error;

use crate::form::FormFormat;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read from stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse form as {format}: {message}")]
    FormParse { format: FormFormat, message: String },

    #[error("failed to serialize form as {format}: {message}")]
    FormSerialize { format: FormFormat, message: String },

    #[error("failed to parse diagram style: {0}")]
    StyleParse(String),

    #[error("unknown built-in style '{name}'. Available: {available}")]
    UnknownStyle { name: String, available: String },

    #[error("output file has no extension: {}", .0.display())]
    MissingExtension(PathBuf),

    #[error("unsupported output format: .{0} (use {1})")]
    UnsupportedOutput(String, &'static str),

    #[error("invalid --png-scale value: {0}")]
    InvalidScale(f32),

    #[error("failed to parse SVG: {0}")]
    Svg(String),

    #[error("failed to create pixmap")]
    Pixmap,

    #[error("failed to encode PNG: {0}")]
    PngEncode(String),

    #[error("failed to convert SVG to PDF: {0}")]
    Pdf(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
