pub mod outcome;

pub use outcome::{ModelError, OutcomeModel};
