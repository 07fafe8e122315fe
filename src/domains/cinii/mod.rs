//! CiNii domain module.
//!
//! Access to the CiNii OpenSearch article API: the HTTP client, the Atom
//! payload parser, the request/response models, and the error
//! classification that the search tool reports to callers.

mod client;
mod error;
pub mod models;
pub mod parser;

pub use client::CiniiClient;
pub use error::{CiniiError, PARSE_FAILURE_MESSAGE};
pub use models::{Article, ArticleSearchResult, SearchArticlesParams};
pub use parser::parse_search_response;
