//! # Taskhub Reminder Worker
//!
//! Standalone worker that emails a daily reminder for every task due on the
//! current day and not yet done. Runs alongside the API server against the
//! same database; delivery goes through SES.

pub mod scheduler;
