//! Repository implementations.
//!
//! Only the in-memory local backend exists today. A relational backend would
//! live alongside it behind the same [`HydroRepository`] trait.
//!
//! [`HydroRepository`]: crate::db::repository::HydroRepository

#[cfg(feature = "local-repo")]
pub mod local;

#[cfg(feature = "local-repo")]
pub use local::LocalRepository;
