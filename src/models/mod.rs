pub mod lexicon;
pub mod modernbert;

pub use lexicon::{LexiconModel, LexiconOptions};
pub use modernbert::{ModernBertSize, SentimentModernBertModel};
