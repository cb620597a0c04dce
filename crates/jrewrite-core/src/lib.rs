//! jrewrite core
//!
//! Source-preserving rewriting of Java sources. Changes are recorded against
//! a lossless rowan CST and turned into minimal text edits, so everything
//! outside the changed regions (comments, blank lines, odd formatting) stays
//! exactly as written.

pub mod config;
pub mod error;
pub mod format;
pub mod result;
pub mod rewrite;
pub mod script;
pub mod syntax; // Concrete Syntax Tree (lossless, Rowan-based)

// Re-export commonly used types
pub use config::{CONFIG_FILE_NAMES, ConfigLoader, FilesConfiguration, FormatterConfiguration, RewriteConfiguration};
pub use error::{ErrorKind, RewriteError};
pub use format::{CodeFormatter, DefaultFormatter, FormatOptions};
pub use result::Result;
pub use rewrite::{
    AstRewrite, ListRewrite, Node, NodeFactory, PropertyDescriptor, RewriteResult, TextEdit,
    TrackedNode,
};
pub use script::{EditScript, Operation, ScriptOutcome, apply_script};
pub use syntax::{
    JavaSyntaxKind, JavaSyntaxNode, ParseError, RoundTripValidator, ValidationResult, parse_java,
};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    init_tracing_with_filter("jrewrite=info");
}

/// Initialize tracing with a default filter; `RUST_LOG` takes precedence
pub fn init_tracing_with_filter(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
