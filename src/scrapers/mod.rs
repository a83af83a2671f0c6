//! Article sources.
//!
//! Each source is split in two parts:
//!
//! 1. **Fetching**: one HTTP request per article id ([`sspai`])
//! 2. **Extraction**: turning the returned page into record fields through
//!    ordered locator chains ([`selectors`])
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | sspai | [`sspai`] | HTML scraping | Sequential numeric post ids |
//!
//! Failed fetches are returned as [`FetchError`](crate::error::FetchError);
//! missing page elements are not errors and fall back to field defaults.

pub mod selectors;
pub mod sspai;
