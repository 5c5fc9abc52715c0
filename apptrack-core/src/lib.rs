#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

/// Core domain models for the application tracker.
///
/// This module contains the data structures that describe a submission,
/// its interview events, its outcome and compensation, and the transient
/// values (filters, predicates, company groups) that the engine derives
/// from them.
///
/// The models carry little behaviour beyond label parsing and in-memory
/// predicate evaluation; ranking, grouping and filtering live in
/// `apptrack-engine`.
pub mod models;

/// Interface traits for the application tracker.
///
/// These are the "ports" through which the engine reaches storage. An
/// adapter (such as `apptrack-sqlite`) implements them without the engine
/// knowing anything about how records are persisted.
pub mod ports;
