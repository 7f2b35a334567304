//! HTTP surface for program reports

pub mod error;
pub mod routes;

use crate::auth::JwtCodec;
use crate::domains::report::ProgramReportService;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub report_service: Arc<dyn ProgramReportService>,
    pub jwt: Arc<JwtCodec>,
}

impl AppState {
    pub fn new(report_service: Arc<dyn ProgramReportService>, jwt: JwtCodec) -> Self {
        Self {
            report_service,
            jwt: Arc::new(jwt),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/reports/programs", get(routes::get_program_reports))
        .route("/api/health", get(routes::health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::participant::{Gender, ProgramParticipantRepository, SqliteProgramParticipantRepository};
    use crate::domains::program::{ProgramRepository, SqliteProgramRepository};
    use crate::domains::report::ProgramReportServiceImpl;
    use crate::domains::session::{SessionRepository, SessionStatus, SqliteSessionRepository};
    use crate::errors::ServiceError;
    use crate::auth::AuthContext;
    use crate::domains::permission::UserRole;
    use crate::domains::report::ProgramReport;
    use crate::test_support::{migrated_pool, new_participant, new_program, new_session};
    use async_trait::async_trait;
    use serde_json::Value;
    use uuid::Uuid;

    const SECRET: &str = "report-test-secret";

    struct TestServer {
        base_url: String,
        jwt: JwtCodec,
        owner: Uuid,
        program_id: Uuid,
    }

    async fn spawn_app(state: AppState) -> String {
        let app = build_router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move { axum::serve(listener, app).await.expect("serve") });
        format!("http://{addr}")
    }

    async fn spawn_server() -> TestServer {
        let pool = migrated_pool().await;
        let owner = Uuid::new_v4();
        let program = SqliteProgramRepository::new(pool.clone())
            .create(&new_program("Youth club", owner, 4, 2))
            .await
            .unwrap();
        SqliteSessionRepository::new(pool.clone())
            .create(&new_session(program.id, 1, SessionStatus::Completed))
            .await
            .unwrap();
        SqliteProgramParticipantRepository::new(pool.clone())
            .create(&new_participant(program.id, 19, Gender::Male))
            .await
            .unwrap();

        let state = AppState::new(
            Arc::new(ProgramReportServiceImpl::from_pool(pool)),
            JwtCodec::new(SECRET).unwrap(),
        );
        TestServer {
            base_url: spawn_app(state).await,
            jwt: JwtCodec::new(SECRET).unwrap(),
            owner,
            program_id: program.id,
        }
    }

    impl TestServer {
        fn token(&self, user_id: Uuid, role: UserRole) -> String {
            self.jwt.generate_token(&user_id, &role).unwrap().0
        }

        async fn get(&self, query: &str, token: Option<String>) -> (u16, Value) {
            let mut request = reqwest::Client::new().get(format!("{}/api/reports/programs{}", self.base_url, query));
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }
            let response = request.send().await.expect("request");
            let status = response.status().as_u16();
            (status, response.json().await.expect("json body"))
        }
    }

    #[tokio::test]
    async fn test_owner_gets_reports() {
        let server = spawn_server().await;
        let token = server.token(server.owner, UserRole::Staff);

        let (status, body) = server.get("", Some(token)).await;

        assert_eq!(status, 200);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["program"]["id"], server.program_id.to_string());
        assert_eq!(body[0]["statistics"]["totalEnrolledParticipants"], 1);
        assert_eq!(body[0]["statistics"]["ageGroups"]["18-35"], 1);
    }

    #[tokio::test]
    async fn test_missing_or_bad_token_is_unauthorized() {
        let server = spawn_server().await;

        let (status, body) = server.get("", None).await;
        assert_eq!(status, 401);
        assert_eq!(body["error"], "Unauthorized");

        let foreign = JwtCodec::new("some-other-secret").unwrap();
        let forged = foreign.generate_token(&server.owner, &UserRole::Admin).unwrap().0;
        let (status, _) = server.get("", Some(forged)).await;
        assert_eq!(status, 401);
    }

    #[tokio::test]
    async fn test_invalid_program_id_is_bad_request() {
        let server = spawn_server().await;
        let token = server.token(server.owner, UserRole::Staff);

        let (status, body) = server.get("?programId=not-a-uuid", Some(token)).await;

        assert_eq!(status, 400);
        assert_eq!(body["error"], "Invalid programId");
    }

    #[tokio::test]
    async fn test_unreadable_query_string_checks_token_first() {
        let server = spawn_server().await;
        let repeated = format!("?programId={0}&programId={0}", server.program_id);

        let (status, body) = server.get(&repeated, None).await;
        assert_eq!(status, 401);
        assert_eq!(body["error"], "Unauthorized");

        let token = server.token(server.owner, UserRole::Staff);
        let (status, body) = server.get(&repeated, Some(token)).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Invalid programId");
    }

    #[tokio::test]
    async fn test_foreign_program_is_forbidden() {
        let server = spawn_server().await;
        let token = server.token(Uuid::new_v4(), UserRole::Manager);

        let (status, body) = server.get(&format!("?programId={}", server.program_id), Some(token)).await;

        assert_eq!(status, 403);
        assert_eq!(body["error"], "Access Denied");
    }

    #[tokio::test]
    async fn test_admin_can_read_any_program() {
        let server = spawn_server().await;
        let token = server.token(Uuid::new_v4(), UserRole::Admin);

        let (status, body) = server.get(&format!("?programId={}", server.program_id), Some(token)).await;

        assert_eq!(status, 200);
        assert_eq!(body[0]["sessions"][0]["sessionNumber"], 1);
    }

    struct FailingReports;

    #[async_trait]
    impl ProgramReportService for FailingReports {
        async fn get_program_reports(
            &self,
            _program_id: Option<Uuid>,
            _auth: &AuthContext,
        ) -> Result<Vec<ProgramReport>, ServiceError> {
            Err(ServiceError::Configuration("store unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_service_failure_is_generic_500() {
        let jwt = JwtCodec::new(SECRET).unwrap();
        let token = jwt.generate_token(&Uuid::new_v4(), &UserRole::Admin).unwrap().0;
        let base_url = spawn_app(AppState::new(Arc::new(FailingReports), jwt)).await;

        let response = reqwest::Client::new()
            .get(format!("{}/api/reports/programs", base_url))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 500);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Failed to get program reports");
    }

    #[tokio::test]
    async fn test_health() {
        let server = spawn_server().await;
        let body: Value = reqwest::get(format!("{}/api/health", server.base_url))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
    }
}
