//! External converter interface.
//!
//! The binary-document-to-markup conversion itself is an external tool
//! invoked as a black box; this module fixes its contract. Implementations
//! hand back raw converted markup plus the converter's diagnostic stream,
//! and must surface memory exhaustion as the distinct, retryable
//! [`Error::ConversionResources`](crate::Error::ConversionResources) rather
//! than a generic failure.

use crate::error::Result;

/// Options passed to a converter invocation.
#[derive(Debug, Clone, Default)]
pub struct ConverterOptions {
    /// Memory ceiling for the converter process, in bytes. `None` disables
    /// the ceiling; production configurations always set one because an
    /// unbounded converter can stall the whole worker host.
    pub max_heap_bytes: Option<u64>,
}

/// Result of a successful converter invocation.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Converted markup, not yet normalized.
    pub markup: String,
    /// The converter's diagnostic stream, kept for troubleshooting.
    pub diagnostics: String,
}

/// A binary-document-to-markup converter.
///
/// Implementations must:
/// - enforce `options.max_heap_bytes` when set;
/// - return [`Error::ConversionResources`](crate::Error::ConversionResources)
///   when the ceiling is hit (see [`diagnostics_exhausted_resources`]);
/// - return [`Error::Conversion`](crate::Error::Conversion) for any other
///   failure, with the diagnostic text as payload.
pub trait Converter {
    /// Convert a binary document to raw markup.
    fn convert(&self, document: &[u8], options: &ConverterOptions) -> Result<Conversion>;
}

/// Whether a converter diagnostic stream reports memory exhaustion.
///
/// Converters signal an out-of-memory stop in-band on their diagnostic
/// stream rather than via exit status; callers use this probe to map such a
/// run to the retryable failure.
pub fn diagnostics_exhausted_resources(diagnostics: &str) -> bool {
    diagnostics.contains("Heap exhausted")
}
