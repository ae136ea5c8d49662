//! TutorLane Core - Shared domain types.
//!
//! This crate provides the lead-capture domain model used by the server:
//! - [`leads`] - Demo bookings, subject queries, and contact messages
//! - [`analytics`] - Visitor lifecycle events
//! - [`email`] - Structurally validated email addresses
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod email;
pub mod leads;

pub use analytics::{VisitorEvent, VisitorEventCreate};
pub use email::{Email, EmailError};
pub use leads::{
    ContactMessage, ContactMessageCreate, DemoBooking, DemoBookingCreate, LeadForm, SubjectQuery,
    SubjectQueryCreate, ValidationError,
};
