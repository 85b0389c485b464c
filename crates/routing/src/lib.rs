//! Route inbound chat messages to personas.
//!
//! Keyword cascade (precedence):
//! 1. "flight" → flight search walkthrough
//! 2. "browse" / "website" → website walkthrough
//! 3. "amazon" / "headphone" / "product" → product search walkthrough
//! 4. otherwise → general web search

pub mod classify;
pub mod error;
pub mod extract;
pub mod resolve;

pub use {
    classify::{Intent, classify},
    error::{Error, Result},
    extract::{amazon_search_url, extract_search_term, extract_url},
    resolve::{ResolvedRoute, resolve_route},
};
