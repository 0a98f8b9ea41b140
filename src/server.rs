//! HTTP layer: one stateless card route plus a health check.
//!
//! Every upstream failure is downgraded to an error card (or a JSON error
//! object) so the caller always receives a well-formed response of the
//! requested type.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use log::{error, warn};

use crate::card::{self, RenderedCard};
use crate::error::Error;
use crate::github;
use crate::png;
use crate::stats;
use crate::theme::{self, CardTheme};

/// Contribution data refreshes once a day upstream; let embeds cache for a
/// few hours.
const CACHE_CONTROL: &str = "public, max-age=14400";

const PNG_CONTENT_TYPE: &str = "image/png";

/// Shared state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub token: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(render_card))
        .route("/health", get(health_check))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputType {
    Svg,
    Png,
    Json,
}

impl OutputType {
    /// Unknown values fall back to SVG, the embeddable default.
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("png") => Self::Png,
            Some("json") => Self::Json,
            _ => Self::Svg,
        }
    }
}

async fn render_card(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let output = OutputType::parse(params.get("type").map(String::as_str));
    let theme = theme::resolve(&params).unwrap_or_else(|err| {
        warn!("{}; falling back to the default theme", err);
        theme::fallback(&params)
    });
    let today = Utc::now().date_naive();

    let result = match params.get("user") {
        None => Err(Error::InvalidArgument(
            "Missing required parameter: user".to_string(),
        )),
        Some(user) if !is_valid_username(user) => Err(Error::InvalidArgument(format!(
            "Invalid username \"{}\"",
            user
        ))),
        Some(user) => match github::fetch_contributions(&state.client, &state.token, user, today)
            .await
        {
            Ok(records) => stats::compute_stats(&records, today),
            Err(err) => Err(err),
        },
    };

    match result {
        Ok(stats) => match output {
            OutputType::Json => {
                ([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(stats)).into_response()
            }
            OutputType::Svg => svg_response(card::generate_card(&stats, &theme, today)),
            OutputType::Png => png_response(card::generate_card(&stats, &theme, today)),
        },
        Err(err) => error_response(&err, &theme, output),
    }
}

/// GitHub logins are ASCII alphanumerics and hyphens; anything else is
/// rejected before it can reach a GraphQL string literal.
fn is_valid_username(user: &str) -> bool {
    !user.is_empty()
        && user.len() <= 39
        && user.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn svg_response(card: RenderedCard) -> Response {
    (
        [
            (header::CONTENT_TYPE, card.content_type),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        card.body,
    )
        .into_response()
}

/// Rasterization failures degrade to the SVG body rather than a broken
/// image response.
fn png_response(card: RenderedCard) -> Response {
    match png::rasterize(&card.body) {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, PNG_CONTENT_TYPE),
                (header::CACHE_CONTROL, CACHE_CONTROL),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => {
            error!("PNG rasterization failed: {:#}", err);
            svg_response(card)
        }
    }
}

/// Image modes answer 200 with an error card so embeds still render; JSON
/// mode reports the failure with a matching status code.
fn error_response(err: &Error, theme: &CardTheme, output: OutputType) -> Response {
    warn!("Request failed: {}", err);
    match output {
        OutputType::Json => (
            error_status(err),
            Json(serde_json::json!({ "error": err.to_string() })),
        )
            .into_response(),
        OutputType::Svg => svg_response(card::generate_error_card(&err.to_string(), theme)),
        OutputType::Png => png_response(card::generate_error_card(&err.to_string(), theme)),
    }
}

fn error_status(err: &Error) -> StatusCode {
    match err {
        Error::InvalidArgument(_) | Error::UnknownTheme(_) => StatusCode::BAD_REQUEST,
        Error::UserNotFound(_) => StatusCode::NOT_FOUND,
        Error::EmptyDataset | Error::Fetch(_) => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_builds() {
        let state = AppState {
            client: reqwest::Client::new(),
            token: "test-token".to_string(),
        };
        let _router = create_router(state);
    }

    #[test]
    fn output_type_defaults_to_svg() {
        assert_eq!(OutputType::parse(None), OutputType::Svg);
        assert_eq!(OutputType::parse(Some("gif")), OutputType::Svg);
        assert_eq!(OutputType::parse(Some("png")), OutputType::Png);
        assert_eq!(OutputType::parse(Some("json")), OutputType::Json);
    }

    #[test]
    fn usernames_are_validated() {
        assert!(is_valid_username("octocat"));
        assert!(is_valid_username("a-b-1"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("bad\"quote"));
        assert!(!is_valid_username("space name"));
    }

    #[test]
    fn json_errors_carry_matching_status_codes() {
        let theme = theme::fallback(&HashMap::new());

        let response = error_response(
            &Error::UserNotFound("ghost".to_string()),
            &theme,
            OutputType::Json,
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = error_response(&Error::EmptyDataset, &theme, OutputType::Json);
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn svg_errors_stay_embeddable() {
        let theme = theme::fallback(&HashMap::new());
        let response = error_response(&Error::EmptyDataset, &theme, OutputType::Svg);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            card::SVG_CONTENT_TYPE
        );
    }
}
