//! Application services

pub mod session;

pub use session::{
    ActiveView, FailureKind, ScanFailure, ScanPhase, ScanSession, ScanTicket, SessionError,
};
