pub mod composer;
pub mod directory;
pub mod parser;

pub use composer::{Composer, ComposerKey, SuggestionPanel};
pub use directory::MentionDirectory;
pub use parser::{build_replacement, detect_trigger, filter, Replacement, Trigger};
