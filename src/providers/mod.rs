pub mod huggingface;
pub mod model;
pub mod openlibrary;
pub mod provider;
pub mod spotify;
pub mod tmdb;

pub use huggingface::HuggingFaceClient;
pub use model::*;
pub use openlibrary::OpenLibraryClient;
pub use provider::*;
pub use spotify::SpotifyClient;
pub use tmdb::TmdbClient;
