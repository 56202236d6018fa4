//! Job portal backend.
//!
//! Organisations post jobs under domains, job seekers browse and apply, and organisations
//! select applicants from their pools. The [`portal`] module holds the domain model, the
//! document-store ports and the HTTP router; [`config`] and [`telemetry`] carry the
//! process plumbing shared with the `job-portal-api` binary.

pub mod config;
pub mod error;
pub mod portal;
pub mod telemetry;
