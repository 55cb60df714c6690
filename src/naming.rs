//! Filename conventions derived from member names.
//!
//! Two names come out of a member's display name:
//!
//! - the **output stem**: every character outside `[A-Za-z0-9]` replaced by
//!   `_`, so `"José da Silva"` → `"Jos__da_Silva"`. This is the card file
//!   name without extension.
//! - the **default photo filename**: the display name as typed plus `.jpg`,
//!   used when the record carries no explicit photo reference.
//!
//! ```text
//! "Ana Souza"     → Ana_Souza.pdf      photo: Ana Souza.jpg
//! "Ana Souza" + photo_ref "ana.png"    photo: ana.png
//! ```

use crate::types::MemberRecord;

/// File extension of generated card documents.
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// Extension assumed for name-derived photo filenames.
pub const DEFAULT_PHOTO_EXTENSION: &str = "jpg";

/// Replace every character outside `[A-Za-z0-9]` with `_`.
///
/// One underscore per character, so distinct names of equal length stay
/// distinct whenever they differ in an alphanumeric position.
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Output filename for a member's individual card, e.g. `Ana_Souza.pdf`.
pub fn card_filename(member: &MemberRecord) -> String {
    format!("{}.{}", sanitize_file_stem(&member.name), DOCUMENT_EXTENSION)
}

/// Photo filename for a member: the explicit reference, else `<name>.jpg`.
pub fn photo_filename(member: &MemberRecord) -> String {
    match member.photo_ref.as_deref().map(str::trim) {
        Some(r) if !r.is_empty() => r.to_string(),
        _ => format!("{}.{}", member.name, DEFAULT_PHOTO_EXTENSION),
    }
}
