//! # bablic-ngx
//!
//! Translation loader and missing-key reporter for ngx-style i18n hosts.
//!
//! The loader fetches one language's table from the Bablic CDN. The
//! reporter answers every lookup miss synchronously with the key itself
//! and batches the misses back to the service after a quiet period.

pub mod endpoints;
pub mod loader;
pub mod reporter;
pub mod setup;
pub mod timer;

#[cfg(test)]
mod testing;

pub use loader::BablicTranslateLoader;
pub use reporter::{BablicMissingTranslationHandler, FlushOutcome, MissingEntry};
pub use setup::{bablic_ngx, NgxSetup};
