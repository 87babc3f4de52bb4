//! keyshift-migrate: remaps configured values off hard-deprecated keys.
//!
//! Given ordered value sources and the metadata of the version being
//! upgraded to, [`LegacyRemapper`] finds values still keyed by properties
//! deprecated at ERROR level, copies the remappable ones onto their
//! replacement keys in synthetic override sources, and records what could
//! not be handled.

pub mod analysis;
pub mod error;
pub mod remap;
pub mod source;

pub use analysis::{LegacyAnalysis, LegacyProperty, SourceAnalysis};
pub use error::SourceError;
pub use remap::{LegacyRemapper, LegacyRemapping, OverrideSource};
pub use source::{Origin, PropertySources, ValueRecord, ValueSource};
