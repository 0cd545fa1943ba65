//! Entity extractors for clinical note text.
//!
//! Seven independent, stateless extractors plus the clinical context
//! extractor and the diagnosis disambiguator. Every extractor is a pure
//! function of its input text; the engine structs only hold precompiled
//! pattern tables and are cheap to share immutably across parses.

pub mod allergies;
pub mod context;
pub mod dates;
pub mod demographics;
pub mod diagnoses;
pub mod disambiguate;
pub mod labs;
pub mod medications;
pub mod util;
pub mod vitals;

pub use allergies::AllergiesExtractor;
pub use context::ContextExtractor;
pub use dates::DatesExtractor;
pub use demographics::DemographicsExtractor;
pub use diagnoses::DiagnosesExtractor;
pub use disambiguate::disambiguate;
pub use labs::LabsExtractor;
pub use medications::MedicationsExtractor;
pub use vitals::VitalsExtractor;
