//! Web search adapters

pub mod web;

pub use web::{JinaSearch, WebSearchProvider, WebSearchResult};
