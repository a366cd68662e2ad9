//! Terminal front end for the verification wizard.

pub mod prompt;
pub mod settings;
pub mod view;

pub use prompt::ConsolePrompt;
pub use settings::{WizardConfigError, WizardSettings};
