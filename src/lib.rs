//! Attendance time-accounting and leave-quota engine.
//!
//! This crate implements the two business-logic cores of an employee
//! attendance and leave-management system: the attendance engine (punch
//! in/out, break tracking, the 6/8/10 hour status rule, auto-logout) and the
//! leave engine (request lifecycle, multi-tier quota ledger with comp-off
//! priority, the December 31 annual reset).
//!
//! The engines are pure with respect to time and storage: a [`clock::Clock`]
//! supplies the current time, a [`store::RecordStore`] holds persistent
//! state, and a [`notify::NotificationSink`] receives best-effort
//! notifications. All three are injected at construction, making every
//! operation deterministic under test.

#![warn(missing_docs)]

pub mod attendance;
pub mod clock;
pub mod error;
pub mod leave;
pub mod models;
pub mod notify;
pub mod store;
