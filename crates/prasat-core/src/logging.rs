//! Structured logging field name constants for prasat.
//!
//! All crates use these constants for consistent structured logging
//! fields so log aggregation tools can query by standardized names
//! across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-row iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "database", "validation"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pool", "users", "castles", "trips"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "insert", "get", "link_castle", "create_plan"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// User id being operated on.
pub const USER_ID: &str = "user_id";

/// Castle id being operated on.
pub const CASTLE_ID: &str = "castle_id";

/// Trip plan id being operated on.
pub const PLAN_ID: &str = "plan_id";

/// Route id being operated on.
pub const ROUTE_ID: &str = "route_id";

/// Document id being operated on.
pub const DOCUMENT_ID: &str = "document_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned or affected.
pub const ROW_COUNT: &str = "row_count";
