pub mod repository;
pub mod version;

pub use repository::{MavenRepository, RemoteRepository};
