use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ProvidersConfig;
use crate::providers::{
    BookProvider, GenerativeProvider, HuggingFaceClient, MovieProvider, MusicProvider,
    OpenLibraryClient, SpotifyClient, TmdbClient,
};

use super::books::resolve_books;
use super::fallback::generate_fallback;
use super::music::resolve_music;
use super::types::Recommendations;

const MAX_RECOMMENDATIONS: usize = 3;

/// The resolution pipeline: metadata lookup, both tiered resolvers, and at
/// most one generative fallback call per request.
pub struct Recommender {
    movies: Arc<dyn MovieProvider>,
    books: Arc<dyn BookProvider>,
    music: Arc<dyn MusicProvider>,
    textgen: Arc<dyn GenerativeProvider>,
}

impl Recommender {
    pub fn new(
        movies: Arc<dyn MovieProvider>,
        books: Arc<dyn BookProvider>,
        music: Arc<dyn MusicProvider>,
        textgen: Arc<dyn GenerativeProvider>,
    ) -> Self {
        Self {
            movies,
            books,
            music,
            textgen,
        }
    }

    pub fn from_config(config: &ProvidersConfig) -> Self {
        Self::new(
            Arc::new(TmdbClient::new(&config.tmdb)),
            Arc::new(OpenLibraryClient::new(&config.openlibrary)),
            Arc::new(SpotifyClient::new(&config.spotify)),
            Arc::new(HuggingFaceClient::new(&config.textgen)),
        )
    }

    pub async fn recommend(&self, title: &str) -> Recommendations {
        let title = title.trim();

        let record = match self.movies.lookup(title).await {
            Ok(record) => record,
            Err(e) => {
                // provider trouble and no-such-movie look the same from here
                debug!("metadata lookup failed: {}", e);
                None
            }
        };

        let (overview, genre) = match &record {
            Some(record) => {
                info!("resolved movie metadata for {}", record.title);
                (record.overview.as_str(), record.primary_genre.as_deref())
            }
            None => {
                info!("no metadata match, resolving from the raw title");
                ("", None)
            }
        };

        let mut books = resolve_books(self.books.as_ref(), overview, genre, title).await;
        let mut music = resolve_music(self.music.as_ref(), overview, title).await;

        // one generative call fills whichever lists are still empty; a list
        // that already has results is never overwritten
        if books.is_empty() || music.is_empty() {
            let generated = generate_fallback(self.textgen.as_ref(), title).await;
            if books.is_empty() {
                books = generated.books;
            }
            if music.is_empty() {
                music = generated.music;
            }
        }

        books.truncate(MAX_RECOMMENDATIONS);
        music.truncate(MAX_RECOMMENDATIONS);

        Recommendations {
            book_recommendations: books,
            music_recommendations: music,
        }
    }
}
