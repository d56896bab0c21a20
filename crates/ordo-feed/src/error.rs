//! Error types for feed encoding.

use thiserror::Error;

/// Failure to encode a feed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// A required feed property is empty.
    #[error("feed metadata is missing a {field}")]
    MissingMetadata {
        /// The empty field (`name`, `domain` or `timezone`).
        field: &'static str,
    },

    /// A feed property holds a control character.
    #[error("feed {field} contains a control character")]
    ControlCharacter {
        /// The offending property (`method`, `refresh interval` or
        /// `published TTL`).
        field: &'static str,
    },
}
