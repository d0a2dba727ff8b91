use tracing::debug;

use crate::providers::{MusicProvider, ProviderResult, Track};

use super::keywords;
use super::types::Tier;

const TIER_LIMIT: usize = 3;
const OVERVIEW_KEYWORDS: usize = 2;

/// Music recommendations via the two-tier chain: overview keywords, then the
/// raw movie title. Same first-hit-wins rules as the book resolver; there is
/// no genre tier for music.
pub async fn resolve_music(catalog: &dyn MusicProvider, overview: &str, title: &str) -> Vec<String> {
    match keyword_tier(catalog, overview).await {
        Tier::Hit(recs) => return recs,
        Tier::Empty => {}
        Tier::Failed(e) => debug!("music keyword tier failed: {}", e),
    }

    match title_tier(catalog, title).await {
        Tier::Hit(recs) => recs,
        Tier::Empty => Vec::new(),
        Tier::Failed(e) => {
            debug!("music title tier failed: {}", e);
            Vec::new()
        }
    }
}

async fn keyword_tier(catalog: &dyn MusicProvider, overview: &str) -> Tier {
    let keywords = keywords::extract(overview, OVERVIEW_KEYWORDS);
    if keywords.is_empty() {
        return Tier::Empty;
    }
    Tier::from_result(search_keywords(catalog, &keywords).await)
}

async fn search_keywords(
    catalog: &dyn MusicProvider,
    keywords: &[String],
) -> ProviderResult<Vec<String>> {
    let mut recs = Vec::new();
    for keyword in keywords {
        let tracks = catalog.search_tracks(keyword, TIER_LIMIT).await?;
        recs.extend(tracks.iter().map(format_track));
    }
    Ok(recs)
}

async fn title_tier(catalog: &dyn MusicProvider, title: &str) -> Tier {
    Tier::from_result(
        catalog
            .search_tracks(title, TIER_LIMIT)
            .await
            .map(|tracks| tracks.iter().map(format_track).collect()),
    )
}

fn format_track(track: &Track) -> String {
    format!(
        "{} by {}",
        track.name,
        track.artist.as_deref().unwrap_or("Unknown")
    )
}
