//! Search Module
//!
//! Fetches academic paper metadata from the arXiv Atom API, sorted by
//! relevance as defined by arXiv.

pub mod arxiv;

pub use arxiv::{ArxivClient, Paper, SearchError};
