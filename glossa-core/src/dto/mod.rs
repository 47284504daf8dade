//! Data transfer objects for the admin API
//!
//! Request bodies the client submits and the canonical listing envelope
//! it returns. Unlike the raw responses these map from, DTOs have one
//! fixed shape.

pub mod job;
