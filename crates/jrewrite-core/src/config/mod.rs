//! Configuration for jrewrite
//!
//! Settings are read from a JSON or JSONC file found by walking up from the
//! working directory:
//! - `.jrewrite.json`
//! - `.jrewrite.jsonc` (comments and trailing commas allowed)
//! - `jrewrite.json`
//!
//! ## Example Configuration
//!
//! ```jsonc
//! {
//!   "$schema": "https://jrewrite.github.io/schema/v1.json",
//!   "formatter": {
//!     "indentStyle": "spaces",
//!     "indentSize": 4,
//!     "lineWidth": 100,
//!     "braceStyle": "endOfLine"
//!   },
//!   "files": {
//!     "include": ["**/*.java"],
//!     "exclude": ["**/generated/**"]
//!   }
//! }
//! ```

mod loader;
mod rewrite_config;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use rewrite_config::{
    BraceStyle, FilesConfiguration, FormatterConfiguration, IndentStyle, RewriteConfiguration,
};
