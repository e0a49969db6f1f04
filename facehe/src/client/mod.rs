//! Client-side helpers: key lifecycle and im2col encode/decrypt.
//!
//! Nothing here runs on the inference server; this module exists so the
//! crate can ship a working reference client (and its tests can exercise the
//! whole encrypt -> infer -> decrypt round trip) without a second crate.

pub mod codec;
pub mod keys;
