pub mod item_store;
pub mod library_store;
pub mod local_library;
pub mod web_library_client;

pub use item_store::{find_collection, ItemStore};
pub use library_store::LibraryStore;
pub use local_library::LocalLibrary;
pub use web_library_client::WebLibraryClient;
