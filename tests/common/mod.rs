#![allow(dead_code)]

use std::time::Duration;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test, web, App,
};
use mongodb::{bson::oid::ObjectId, options::ClientOptions, Client, Database};

use trip_planner_api::config::AuthConfig;
use trip_planner_api::db::mongo::ensure_indexes;
use trip_planner_api::middleware::auth::issue_token;
use trip_planner_api::routes;

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub database: Database,
    pub auth: AuthConfig,
}

impl TestApp {
    /// The client connects lazily, so tests that never reach the database run
    /// without a MongoDB server.
    pub async fn new() -> Self {
        let mongo_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let mut options = ClientOptions::parse(&mongo_uri)
            .await
            .expect("valid MongoDB URI");
        options.server_selection_timeout = Some(Duration::from_millis(500));
        let client = Client::with_options(options).expect("MongoDB client");

        Self {
            database: client.database("TravelPlanner_Test"),
            auth: AuthConfig {
                jwt_secret: TEST_SECRET.to_string(),
                token_ttl_hours: 1,
            },
        }
    }

    /// For tests that talk to MongoDB: the unique email index has to exist
    /// before any signup.
    pub async fn with_indexes() -> Self {
        let test_app = Self::new().await;
        cleanup_test_data(&test_app.database).await;
        ensure_indexes(&test_app.database)
            .await
            .expect("indexes on the test database");
        test_app
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.database.clone()))
            .app_data(web::Data::new(self.auth.clone()))
            .configure(routes::configure)
    }

    pub fn token_for(&self, user_id: ObjectId) -> String {
        issue_token(&get_test_email(), user_id, &self.auth).expect("token")
    }

    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token_for(ObjectId::new())))
    }
}

pub fn get_test_email() -> String {
    "test@example.com".to_string()
}

pub fn get_test_password() -> String {
    "testpassword123".to_string()
}

pub async fn cleanup_test_data(database: &Database) {
    let _ = database.drop().await;
}

/// Sends a request and returns status plus JSON body. Middleware rejections
/// come back as service errors, so they are rendered the way the server would.
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, serde_json::Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let bytes = test::read_body(resp).await;
            (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let bytes = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
        }
    }
}
