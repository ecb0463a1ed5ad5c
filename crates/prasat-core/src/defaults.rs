//! Centralized default constants for the prasat system.
//!
//! **This module is the single source of truth** for shared default
//! values. Crates reference these constants instead of defining their
//! own magic numbers.

// =============================================================================
// USERS
// =============================================================================

/// Role assigned to a user when none is supplied on create.
/// Known values: "admin" / "user".
pub const DEFAULT_ROLE: &str = "user";

// =============================================================================
// EMBEDDING VECTORS
// =============================================================================

/// Dimension of castle text and place document embeddings.
pub const TEXT_EMBED_DIMENSION: usize = 768;

/// Dimension of image embeddings.
pub const IMAGE_EMBED_DIMENSION: usize = 512;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for list operations.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Default limit for history listings (search/visit logs).
pub const DEFAULT_HISTORY_LIMIT: i64 = 100;
