//! Request and response bodies of the `/v1` API and page query strings.

pub mod pages;
pub mod v1;
