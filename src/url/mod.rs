//! URL handling module for Folio-Bad-Urls
//!
//! This module provides the checks that need no network access: scope
//! filtering, lexical analysis of the URL text, and per-host key extraction.

mod host;
mod lexical;
mod scope;

pub use host::host_key;
pub use lexical::{LexicalFinding, UrlAnalyzer};
pub use scope::accept;
