//! What happens when an asset fails to load.
//!
//! A card without its template is unusable; a card without a photo is
//! still a valid card. The compositor consults this table for every failed
//! load.
//!
//! | Asset | On load failure |
//! |---|---|
//! | Front template | abort the member's render |
//! | Back template | abort the member's render |
//! | Photo | draw the placeholder, keep going |

use std::fmt;

/// Every kind of image the compositor loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    FrontTemplate,
    BackTemplate,
    Photo,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::FrontTemplate => f.write_str("front template"),
            AssetKind::BackTemplate => f.write_str("back template"),
            AssetKind::Photo => f.write_str("photo"),
        }
    }
}

/// Response to a failed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    /// Fail the render with an error naming the asset.
    Abort,
    /// Render a placeholder in the asset's place, silently.
    Placeholder,
}

/// The policy table.
pub const LOAD_FAILURE_POLICY: &[(AssetKind, FailureAction)] = &[
    (AssetKind::FrontTemplate, FailureAction::Abort),
    (AssetKind::BackTemplate, FailureAction::Abort),
    (AssetKind::Photo, FailureAction::Placeholder),
];

/// Look up the action for `kind`.
pub fn on_load_failure(kind: AssetKind) -> FailureAction {
    LOAD_FAILURE_POLICY
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, action)| *action)
        .unwrap_or(FailureAction::Abort)
}
