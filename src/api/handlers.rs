//! HTTP request handlers and shared application state.
//!
//! Handlers validate required fields, delegate to the crawler, matcher and
//! collaborator clients, and wrap results in the `{success, data}` envelope.
//! Collaborator failures never become HTTP errors here: keyword extraction
//! degrades to an empty list and search degrades to fallback links.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::analyzer::{GeminiExtractor, KeywordExtractor};
use crate::api::errors::ApiError;
use crate::api::models::*;
use crate::config::AppConfig;
use crate::crawler::{self, PageFetch, PageFetcher};
use crate::matcher;
use crate::score;
use crate::search::SearchClient;
use crate::types::{ExternalLink, KeywordResult, SeoScore, SiteIndex, UserSettings};

/// Mutable per-deployment state behind the API: the user's settings and the
/// most recent crawl's index. Defined initial state, explicitly resettable.
#[derive(Debug, Default)]
pub struct Session {
    pub settings: UserSettings,
    pub site_index: Option<SiteIndex>,
}

/// Shared application state passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub fetcher: Arc<dyn PageFetch>,
    pub extractor: Arc<dyn KeywordExtractor>,
    pub search: Arc<SearchClient>,
    pub session: Arc<RwLock<Session>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let fetcher = PageFetcher::new(
            &config.user_agent,
            Duration::from_secs(config.fetch_timeout_secs),
        );
        let extractor = GeminiExtractor::new(&config.gemini_api_key);
        let search = SearchClient::new(
            &config.google_search_api_key,
            &config.google_search_engine_id,
        );

        Self {
            config,
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(extractor),
            search: Arc::new(search),
            session: Arc::new(RwLock::new(Session::default())),
        }
    }
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /api/scrape` — crawl a site and store the resulting page index
pub async fn scrape(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<ApiResponse<SiteIndex>>, ApiError> {
    let url = match request.url {
        Some(url) if !url.is_empty() => url,
        _ => return Err(ApiError::InvalidInput("URL is required".to_string())),
    };
    let max_pages = request.max_pages.unwrap_or(state.config.default_max_pages);

    let index = crawler::crawl(state.fetcher.as_ref(), &url, max_pages).await?;

    let mut session = state.session.write().await;
    session.site_index = Some(index.clone());

    Ok(Json(ApiResponse::ok(index)))
}

/// `POST /api/analyze` — extract keywords from article text and match them
/// against the internal page index
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<Vec<KeywordResult>>>, ApiError> {
    let text = match request.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(ApiError::InvalidInput("Text is required".to_string())),
    };

    let pages = match request.internal_pages {
        Some(pages) => pages,
        None => {
            let session = state.session.read().await;
            session
                .site_index
                .as_ref()
                .map(|index| index.pages.clone())
                .unwrap_or_default()
        }
    };

    // An unreachable or incoherent collaborator yields an empty keyword
    // list, so the request still succeeds with an empty result set
    let keywords = state.extractor.extract_keywords(&text).await;

    let phrases: Vec<String> = keywords.iter().map(|k| k.keyword.clone()).collect();
    let mut matches = matcher::match_keywords(&phrases, &pages);

    let results: Vec<KeywordResult> = keywords
        .into_iter()
        .map(|k| {
            let suggested_links = matches.remove(&k.keyword).unwrap_or_default();
            KeywordResult {
                keyword: k.keyword,
                link_type: k.link_type,
                context: k.context,
                position: k.position,
                suggested_links,
            }
        })
        .collect();

    Ok(Json(ApiResponse::ok(results)))
}

/// `POST /api/search` — external links for one keyword
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<ApiResponse<Vec<ExternalLink>>>, ApiError> {
    let keyword = match request.keyword {
        Some(keyword) if !keyword.is_empty() => keyword,
        _ => return Err(ApiError::InvalidInput("Keyword is required".to_string())),
    };

    let (preferred, blacklisted) = domain_preferences(
        &state,
        request.preferred_domains,
        request.blacklisted_domains,
    )
    .await;

    let links = state.search.search(&keyword, &preferred, &blacklisted).await;
    Ok(Json(ApiResponse::ok(links)))
}

/// `PUT /api/search` — sequential batch search over up to 10 keywords
pub async fn search_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchSearchRequest>,
) -> Result<Json<ApiResponse<HashMap<String, Vec<ExternalLink>>>>, ApiError> {
    let Some(keywords) = request.keywords else {
        return Err(ApiError::InvalidInput(
            "Keywords array is required".to_string(),
        ));
    };

    let (preferred, blacklisted) = domain_preferences(
        &state,
        request.preferred_domains,
        request.blacklisted_domains,
    )
    .await;

    let results = state
        .search
        .search_batch(&keywords, &preferred, &blacklisted)
        .await;
    Ok(Json(ApiResponse::ok(results)))
}

/// `POST /api/score` — grade a finished link set
pub async fn score(
    Json(request): Json<ScoreRequest>,
) -> Json<ApiResponse<SeoScore>> {
    let score = score::calculate_seo_score(&request.text, &request.selected_links);
    Json(ApiResponse::ok(score))
}

/// `GET /api/settings`
pub async fn get_settings(State(state): State<AppState>) -> Json<ApiResponse<UserSettings>> {
    let session = state.session.read().await;
    Json(ApiResponse::ok(session.settings.clone()))
}

/// `PUT /api/settings`
pub async fn put_settings(
    State(state): State<AppState>,
    Json(settings): Json<UserSettings>,
) -> Json<ApiResponse<UserSettings>> {
    let mut session = state.session.write().await;
    session.settings = settings;
    Json(ApiResponse::ok(session.settings.clone()))
}

/// `POST /api/reset` — restore the initial application state
pub async fn reset(State(state): State<AppState>) -> Json<ApiResponse<()>> {
    let mut session = state.session.write().await;
    *session = Session::default();
    Json(ApiResponse::empty())
}

/// Request-supplied domain lists take precedence; stored settings fill in
/// whichever list the request omitted
async fn domain_preferences(
    state: &AppState,
    preferred: Option<Vec<String>>,
    blacklisted: Option<Vec<String>>,
) -> (Vec<String>, Vec<String>) {
    if let (Some(preferred), Some(blacklisted)) = (&preferred, &blacklisted) {
        return (preferred.clone(), blacklisted.clone());
    }

    let session = state.session.read().await;
    (
        preferred.unwrap_or_else(|| session.settings.preferred_domains.clone()),
        blacklisted.unwrap_or_else(|| session.settings.blacklisted_domains.clone()),
    )
}
