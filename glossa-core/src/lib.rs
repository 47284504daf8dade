//! Glossa Admin Core
//!
//! Core types and normalization logic for the Glossa content platform
//! admin client.
//!
//! This crate contains:
//! - Domain types: the canonical job representation shared by all callers
//! - DTOs: request and listing objects for the admin API
//! - Normalization: the logic that collapses heterogeneous raw job
//!   payloads (mixed naming conventions, wrapper envelopes, JSON-in-JSON
//!   payload blobs) into the canonical representation

pub mod domain;
pub mod dto;
pub mod normalize;
