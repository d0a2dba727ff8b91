use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::server::AppState;

use super::types::*;

pub async fn home() -> Json<HomeMessage> {
    Json(HomeMessage {
        message: "Cross-domain recommendation API is running!".to_string(),
    })
}

pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> Response {
    let movie = match params.movie.as_deref().map(str::trim) {
        Some(movie) if !movie.is_empty() => movie.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::new("Please provide a movie name.")),
            )
                .into_response();
        }
    };

    let recommendations = state.recommender.recommend(&movie).await;
    Json(recommendations).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::recommend::testing::*;
    use crate::recommend::{Recommendations, Recommender};
    use crate::server::{build_router, AppState};

    struct Stubs {
        movies: Arc<StubMovies>,
        books: Arc<StubBooks>,
        music: Arc<StubMusic>,
        textgen: Arc<StubTextGen>,
    }

    fn test_app(stubs: &Stubs) -> Router {
        let recommender = Arc::new(Recommender::new(
            stubs.movies.clone(),
            stubs.books.clone(),
            stubs.music.clone(),
            stubs.textgen.clone(),
        ));
        build_router(AppState::new(Config::default(), recommender))
    }

    fn empty_stubs() -> Stubs {
        Stubs {
            movies: Arc::new(StubMovies::not_found()),
            books: Arc::new(StubBooks::empty()),
            music: Arc::new(StubMusic::empty()),
            textgen: Arc::new(StubTextGen::failing()),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_home_message() {
        let stubs = empty_stubs();
        let response = test_app(&stubs)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Cross-domain recommendation API is running!");
    }

    #[tokio::test]
    async fn test_missing_movie_param_is_client_error() {
        let stubs = empty_stubs();
        let response = test_app(&stubs)
            .oneshot(
                Request::builder()
                    .uri("/recommend")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Please provide a movie name.");

        // rejected before the pipeline: no provider saw a call
        assert!(stubs.movies.calls().is_empty());
        assert!(stubs.books.search_calls().is_empty());
        assert!(stubs.books.subject_calls().is_empty());
        assert!(stubs.music.calls().is_empty());
        assert_eq!(stubs.textgen.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_movie_param_is_client_error() {
        let stubs = empty_stubs();
        let response = test_app(&stubs)
            .oneshot(
                Request::builder()
                    .uri("/recommend?movie=%20%20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(stubs.movies.calls().is_empty());
    }

    #[tokio::test]
    async fn test_recommend_round_trip() {
        let stubs = Stubs {
            movies: Arc::new(StubMovies::not_found()),
            books: Arc::new(StubBooks::empty().on_search(
                "Blade Runner",
                Scripted::Reply(vec![book(
                    "Do Androids Dream of Electric Sheep?",
                    Some("Philip K. Dick"),
                )]),
            )),
            music: Arc::new(
                StubMusic::empty().on_search(
                    "Blade Runner",
                    Scripted::Reply(vec![track("Tears in Rain", Some("Vangelis"))]),
                ),
            ),
            textgen: Arc::new(StubTextGen::failing()),
        };

        let response = test_app(&stubs)
            .oneshot(
                Request::builder()
                    .uri("/recommend?movie=Blade%20Runner")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let result: Recommendations = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            result.book_recommendations,
            vec!["Do Androids Dream of Electric Sheep? by Philip K. Dick"]
        );
        assert_eq!(result.music_recommendations, vec!["Tears in Rain by Vangelis"]);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let stubs = empty_stubs();
        let response = test_app(&stubs)
            .oneshot(
                Request::builder()
                    .uri("/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
