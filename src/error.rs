//! Error types for the attendance and leave engines.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition the engines can surface to a caller.

use thiserror::Error;

use crate::models::QuotaTier;
use crate::store::StoreError;

/// The main error type for the attendance and leave engines.
///
/// User-state conflicts (punch/break guards) and policy rejections carry the
/// exact message the caller may surface verbatim; storage failures are
/// wrapped in [`EngineError::System`] and display an opaque message, with
/// the underlying cause preserved in the error source chain for boundary
/// logging.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::AlreadyPunchedIn;
/// assert_eq!(error.to_string(), "Already punched in today");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A punch-in was attempted while today's session is still open.
    #[error("Already punched in today")]
    AlreadyPunchedIn,

    /// A punch-in was attempted after today's session was completed.
    #[error("Attendance already completed for today")]
    AlreadyCompleted,

    /// A punch-out was attempted with no punch-in record for today.
    #[error("No punch-in record found")]
    NoPunchIn,

    /// A punch-out was attempted on an already-closed session.
    #[error("Already punched out")]
    AlreadyPunchedOut,

    /// A break-start was attempted while another break is open.
    #[error("Break already in progress")]
    BreakInProgress,

    /// A break-end was attempted with no open break.
    #[error("No active break found")]
    NoActiveBreak,

    /// A required field was absent or blank.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// The requested leave range ends before it starts.
    #[error("End date cannot be before start date")]
    InvalidDateRange,

    /// The requested leave range overlaps punched-in attendance.
    #[error("Cannot request leave for dates with existing attendance")]
    AttendanceConflict,

    /// The leave category does not exist or is inactive.
    #[error("Invalid leave category")]
    InvalidCategory,

    /// No leave balance row exists for the user and category.
    #[error("No leave balance found")]
    NoBalance,

    /// An enabled quota tier cannot cover the requested days.
    #[error("Insufficient {tier} quota")]
    InsufficientQuota {
        /// The tier that fell short.
        tier: QuotaTier,
    },

    /// The referenced record does not exist.
    #[error("Record not found")]
    NotFound,

    /// The leave request has already been approved or rejected.
    #[error("Request already processed")]
    AlreadyProcessed,

    /// An underlying storage or transaction failure. The display string is
    /// intentionally opaque; the source chain carries the detail.
    #[error("System error occurred")]
    System(#[from] StoreError),
}

/// A type alias for Results that return [`EngineError`].
pub type EngineResult<T> = Result<T, EngineError>;
