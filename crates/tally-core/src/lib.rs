//! # tally-core
//!
//! Core types for the tally review consensus engine.
//!
//! This crate provides the foundational types shared across all tally crates:
//! - Entity structs for sessions, field feedback, comments, items, audit entries
//! - Status enums with state machine transitions
//! - Tagged field values and suggestion validation
//! - Quorum and dashboard aggregation over fetched rows
//! - ID prefix constants, error types, and the authorization seam

pub mod audit_detail;
pub mod auth;
pub mod dashboard;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod quorum;
pub mod suggestion;
pub mod value;
