pub mod identifiers;

pub use identifiers::{ModelFingerprint, OutcomeId, Token};
