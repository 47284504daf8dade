//! Core domain types
//!
//! This module contains the canonical job representation used by every
//! caller of the admin API. Raw backend payloads never leave the
//! normalization layer; these types are what the rest of the workspace
//! consumes.

pub mod job;
