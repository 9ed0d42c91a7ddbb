//! Core library for steel coil label processing.
//!
//! This crate provides:
//! - OCR item input (bounding boxes + text) including PaddleOCR's raw layout
//! - Geometric row/column clustering of recognized fragments
//! - Coil-ID, batch-ID and grade-code extraction with fallback rules
//! - Plain text line extraction for already-linearized OCR output

pub mod error;
pub mod models;
pub mod ocr;
pub mod steel;

pub use error::{InputError, Result, SteelqError};
pub use models::config::SteelqConfig;
pub use models::record::{CoilRecord, ExtractedLine, NO_RECORDS_FOUND};
pub use ocr::{InputItem, Point, load_items};
pub use steel::{
    CollectingSink, Diagnostic, DiagnosticSink, ExtractionConfig, ExtractionResult, NullSink, RecordExtractor,
    SteelQualityParser, TracingSink, extract_from_coordinates, extract_from_lines,
};
pub use steel::rules::{FieldKind, classify_token};
