//! MySQL client for the assessment engine
//!
//! Provides [`MySqlProbe`], the production implementation of
//! [`assessment_core::DatabaseProbe`] over `mysql_async`. The probe connects
//! at server level, with no default database, so that a missing schema is a
//! check failure rather than a connection failure.

pub mod convert;
pub mod probe;

pub use probe::MySqlProbe;
