//! Result type alias for rewrite operations

use crate::error::RewriteError;

/// Standard Result type for rewrite operations
pub type Result<T> = std::result::Result<T, RewriteError>;
