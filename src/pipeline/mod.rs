//! Pipeline stages between a selected file and a decoded result.
//!
//! Each submodule implements exactly one step, so each is testable alone.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ validate ──▶ encode ──▶ (remote call) ──▶ postprocess
//! (path)    (size/type)  (data URI)                   (clean text)
//! ```
//!
//! 1. [`input`]    — read a file from disk and resolve its MIME type
//! 2. [`validate`] — size and type on selection; completeness on submission
//! 3. [`encode`]   — base64 data URI, built on the blocking pool
//! 4. [`postprocess`] — strip a leading BOM and an outer fence from the
//!    model's text before strict decoding

pub mod encode;
pub mod input;
pub mod postprocess;
pub mod validate;
