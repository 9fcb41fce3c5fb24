//! The sanitisation seam between the report reader and the scrubbing rules.
//!
//! The reader composes records and routes each entry through a [`Sanitiser`];
//! the concrete rules (and whatever lookup database they consult) live behind
//! this trait in a separate crate. [`IdentitySanitiser`] is the no-op
//! implementation, useful as a default and as a test double.

use crate::Document;

/// Opaque sanitisation failure. The reader treats any such error as fatal
/// for the remaining stream.
pub type SanitiseError = Box<dyn std::error::Error + Send + Sync>;

/// Privacy-scrubbing rules applied to report records.
///
/// Implementations must be idempotent and must not rely on entry order; the
/// reader hands over an owned candidate copy, so implementations are free to
/// mutate their argument.
pub trait Sanitiser: Send + Sync {
    /// Scrubs the header document. The default is the identity: header
    /// fields rarely need scrubbing, but the seam exists for rules that do.
    fn sanitise_header(&self, header: Document) -> Result<Document, SanitiseError> {
        Ok(header)
    }

    /// Scrubs one entry according to the rules for `test_name`.
    fn sanitise_entry(&self, test_name: &str, entry: Document)
    -> Result<Document, SanitiseError>;
}

/// Sanitiser that changes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentitySanitiser;

impl Sanitiser for IdentitySanitiser {
    fn sanitise_entry(
        &self,
        _test_name: &str,
        entry: Document,
    ) -> Result<Document, SanitiseError> {
        Ok(entry)
    }
}
