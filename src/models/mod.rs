pub mod document;
pub mod item;
pub mod loaders;
pub mod pattern;

pub use document::{Document, DocumentCounts, FormattedArticle};
pub use item::{Attachment, Collection, Creator, Item, Note};
pub use loaders::{load_snapshot, save_snapshot, LibrarySnapshot};
pub use pattern::{MatchCounts, PatternSet, PatternSpec};
