use tracing::debug;

use crate::providers::{BookProvider, CatalogBook, ProviderResult};

use super::keywords;
use super::types::Tier;

const TIER_LIMIT: usize = 3;
const OVERVIEW_KEYWORDS: usize = 2;

/// Book recommendations via the tiered chain: overview keywords, then the
/// genre subject, then the raw movie title. The first tier with results
/// wins; a failed tier counts as empty for that tier only.
pub async fn resolve_books(
    catalog: &dyn BookProvider,
    overview: &str,
    genre: Option<&str>,
    title: &str,
) -> Vec<String> {
    match keyword_tier(catalog, overview).await {
        Tier::Hit(recs) => return recs,
        Tier::Empty => {}
        Tier::Failed(e) => debug!("book keyword tier failed: {}", e),
    }

    if let Some(genre) = genre {
        match subject_tier(catalog, genre).await {
            Tier::Hit(recs) => return recs,
            Tier::Empty => {}
            Tier::Failed(e) => debug!("book subject tier failed: {}", e),
        }
    }

    match title_tier(catalog, title).await {
        Tier::Hit(recs) => recs,
        Tier::Empty => Vec::new(),
        Tier::Failed(e) => {
            debug!("book title tier failed: {}", e);
            Vec::new()
        }
    }
}

async fn keyword_tier(catalog: &dyn BookProvider, overview: &str) -> Tier {
    let keywords = keywords::extract(overview, OVERVIEW_KEYWORDS);
    if keywords.is_empty() {
        return Tier::Empty;
    }
    Tier::from_result(search_keywords(catalog, &keywords).await)
}

async fn search_keywords(
    catalog: &dyn BookProvider,
    keywords: &[String],
) -> ProviderResult<Vec<String>> {
    let mut recs = Vec::new();
    for keyword in keywords {
        let books = catalog.search(keyword, TIER_LIMIT).await?;
        recs.extend(books.iter().map(format_book));
    }
    Ok(recs)
}

async fn subject_tier(catalog: &dyn BookProvider, genre: &str) -> Tier {
    Tier::from_result(
        catalog
            .browse_subject(genre, TIER_LIMIT)
            .await
            .map(|works| works.iter().map(format_book).collect()),
    )
}

async fn title_tier(catalog: &dyn BookProvider, title: &str) -> Tier {
    Tier::from_result(
        catalog
            .search(title, TIER_LIMIT)
            .await
            .map(|books| books.iter().map(format_book).collect()),
    )
}

fn format_book(book: &CatalogBook) -> String {
    format!(
        "{} by {}",
        book.title,
        book.author.as_deref().unwrap_or("Unknown")
    )
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    const OVERVIEW: &str = "A hacker discovers a simulated reality";

    #[tokio::test]
    async fn test_keyword_tier_wins() {
        let catalog = StubBooks::empty()
            .on_search(
                "hacker",
                Scripted::Reply(vec![
                    book("Neuromancer", Some("William Gibson")),
                    book("Snow Crash", Some("Neal Stephenson")),
                ]),
            )
            .on_subject("878", Scripted::Reply(vec![book("Unwanted", None)]));

        let recs = resolve_books(&catalog, OVERVIEW, Some("878"), "The Matrix").await;

        assert_eq!(
            recs,
            vec![
                "Neuromancer by William Gibson",
                "Snow Crash by Neal Stephenson"
            ]
        );
        // later tiers never ran
        assert!(catalog.subject_calls().is_empty());
        assert_eq!(catalog.search_calls(), vec!["hacker", "discovers"]);
    }

    #[tokio::test]
    async fn test_missing_author_formats_as_unknown() {
        let catalog =
            StubBooks::empty().on_search("hacker", Scripted::Reply(vec![book("Anonymous", None)]));

        let recs = resolve_books(&catalog, OVERVIEW, None, "The Matrix").await;
        assert_eq!(recs, vec!["Anonymous by Unknown"]);
    }

    #[tokio::test]
    async fn test_empty_overview_skips_to_subject_tier() {
        let catalog = StubBooks::empty()
            .on_subject("28", Scripted::Reply(vec![book("Dune", Some("Frank Herbert"))]));

        let recs = resolve_books(&catalog, "", Some("28"), "The Matrix").await;

        assert_eq!(recs, vec!["Dune by Frank Herbert"]);
        // no keywords, so no catalog searches before the subject browse
        assert!(catalog.search_calls().is_empty());
        assert_eq!(catalog.subject_calls(), vec!["28"]);
    }

    #[tokio::test]
    async fn test_no_genre_falls_through_to_title_tier() {
        let catalog = StubBooks::empty()
            .on_search("The Matrix", Scripted::Reply(vec![book("Tie-in", Some("A. Writer"))]));

        let recs = resolve_books(&catalog, "", None, "The Matrix").await;

        assert_eq!(recs, vec!["Tie-in by A. Writer"]);
        assert!(catalog.subject_calls().is_empty());
        assert_eq!(catalog.search_calls(), vec!["The Matrix"]);
    }

    #[tokio::test]
    async fn test_failed_keyword_tier_falls_through() {
        let catalog = StubBooks::empty()
            .on_search("hacker", Scripted::Fail)
            .on_subject("878", Scripted::Reply(vec![book("Foundation", Some("Isaac Asimov"))]));

        let recs = resolve_books(&catalog, OVERVIEW, Some("878"), "The Matrix").await;

        assert_eq!(recs, vec!["Foundation by Isaac Asimov"]);
        assert_eq!(catalog.subject_calls(), vec!["878"]);
    }

    #[tokio::test]
    async fn test_all_tiers_empty_returns_empty() {
        let catalog = StubBooks::empty();
        let recs = resolve_books(&catalog, "", None, "Obscure Film").await;
        assert!(recs.is_empty());
        assert_eq!(catalog.search_calls(), vec!["Obscure Film"]);
    }

    #[tokio::test]
    async fn test_all_tiers_failing_returns_empty() {
        let catalog = StubBooks::empty()
            .on_search("hacker", Scripted::Fail)
            .on_search("discovers", Scripted::Fail)
            .on_subject("878", Scripted::Fail)
            .on_search("The Matrix", Scripted::Fail);

        let recs = resolve_books(&catalog, OVERVIEW, Some("878"), "The Matrix").await;
        assert!(recs.is_empty());
    }
}
