use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use tracing::info;

use crate::analysis::analyze;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{ClanReport, Tag};
use crate::sync::SnapshotLoader;

/// `GET /api/clans/:tag/report`
///
/// Loads a fresh snapshot and returns the full report. The tag may be given
/// with or without `#`, percent-encoded or not.
pub async fn clan_report(
    State(state): State<AppState>,
    Path(raw_tag): Path<String>,
) -> Result<Json<ClanReport>, ApiError> {
    let tag = Tag::normalize(&raw_tag);
    if tag.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "'{}' is not a valid clan tag",
            raw_tag
        )));
    }

    let loader = SnapshotLoader::new(state.source.clone(), state.loader);
    let snapshot = loader.load(&tag).await?;

    let report = analyze(&snapshot, Utc::now());
    info!(
        "Served report for {} ({} members)",
        tag,
        report.members.len()
    );
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::fetch::mock::MockSource;
    use crate::models::{ClanMember, ClanProfile, PlayerProfile, Tag};
    use crate::sync::LoaderConfig;

    fn app(source: MockSource) -> axum::Router {
        let state = AppState::new(Arc::new(source), LoaderConfig::default());
        build_router(state, "*")
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn source() -> MockSource {
        let clan = ClanProfile {
            tag: "#2PQ8".to_string(),
            name: "Night Shift".to_string(),
            description: "War fame minimum 1300 every week.".to_string(),
            clan_war_trophies: 2100,
            ..Default::default()
        };
        let members = vec![
            ClanMember {
                tag: "#AAA".to_string(),
                name: "Alice".to_string(),
                trophies: 7000,
                donations: 120,
                ..Default::default()
            },
            ClanMember {
                tag: "#BBB".to_string(),
                name: "Bob".to_string(),
                trophies: 6500,
                donations: 80,
                ..Default::default()
            },
        ];

        let mut source = MockSource::new(clan, members);
        source.players.insert(
            Tag::from("AAA"),
            PlayerProfile {
                tag: "#AAA".to_string(),
                name: "Alice".to_string(),
                trophies: 7010,
            },
        );
        source
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = get_json(app(source()), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["source"], "mock");
    }

    #[tokio::test]
    async fn test_clan_report() {
        let (status, json) = get_json(app(source()), "/api/clans/%232pq8/report").await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(json["clan"]["name"], "Night Shift");
        assert_eq!(json["fame_threshold"], 1300);
        assert_eq!(json["has_active_war"], false);
        assert_eq!(json["members"].as_array().unwrap().len(), 2);
        assert_eq!(json["members"][0]["current_trophies"], 7010);
        assert_eq!(json["mvp"]["name"], "Alice");
        assert_eq!(json["awards"].as_array().unwrap().len(), 5);
        assert!(json["trophy_progression"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clan_report_without_hash() {
        let (status, _) = get_json(app(source()), "/api/clans/2PQ8/report").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_clan_report_empty_tag() {
        let (status, json) = get_json(app(source()), "/api/clans/%23%23/report").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_clan_report_upstream_failure() {
        let mut source = source();
        source.members = None;

        let (status, json) = get_json(app(source), "/api/clans/2PQ8/report").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "UPSTREAM_ERROR");
    }

    #[tokio::test]
    async fn test_clan_report_unknown_clan() {
        let mut source = source();
        source.clan = None;

        let (status, json) = get_json(app(source), "/api/clans/2PQ8/report").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }
}
