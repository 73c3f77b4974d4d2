//! ID prefixes for every persisted entity.
//!
//! IDs are generated in SQL as `{prefix}-{8 hex chars}`, e.g. `rvs-a3f8b2c1`.

pub const PREFIX_ITEM: &str = "itm";
pub const PREFIX_SESSION: &str = "rvs";
pub const PREFIX_FEEDBACK: &str = "fbk";
pub const PREFIX_COMMENT: &str = "cmt";
pub const PREFIX_AUDIT: &str = "aud";

/// Every prefix in use, for uniqueness checks in tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_ITEM,
    PREFIX_SESSION,
    PREFIX_FEEDBACK,
    PREFIX_COMMENT,
    PREFIX_AUDIT,
];
