use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use qz_api::{ApiConfig, ApiState, config::Environment, router};
use serde::Deserialize;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Test state builder for creating an ApiState over an in-memory database
pub struct TestStateBuilder {
    config: ApiConfig,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            config: ApiConfig {
                database_url: "sqlite::memory:".to_string(),
                env: Environment::Development,
                max_db_connections: 1,
                question_retry_delay_ms: 0,
                enable_metrics: false,
                ..ApiConfig::default()
            },
        }
    }

    /// Build the state with a migrated database
    pub async fn build(self) -> anyhow::Result<ApiState> {
        let pool =
            qz_db::create_pool(&self.config.database_url, self.config.max_db_connections).await?;
        qz_db::ensure_db_and_migrate(&self.config.database_url, &pool).await?;

        Ok(ApiState::new(self.config, pool, None))
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the full application router with a fresh state
pub async fn app() -> (TestClient, ApiState) {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to build test state");
    let client = TestClient::new(router::router().with_state(state.clone()));
    (client, state)
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
            headers,
        }
    }

    /// Send a GET request
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with no body
    pub async fn post(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with JSON body
    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a DELETE request
    pub async fn delete(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Create a free-text question and return its id
    pub async fn create_question(&self, subject: &str, text: &str, answer: &str) -> String {
        let response = self
            .post_json(
                "/v1/questions",
                &json!({
                    "text": text,
                    "correct_answer": answer,
                    "subject": subject,
                }),
            )
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["id"]
            .as_str()
            .expect("Question id should be a string")
            .to_string()
    }

    /// Start a session and return its id
    pub async fn start_session(&self, learner_id: &str, subject: Option<&str>) -> String {
        let response = self
            .post_json(
                &format!("/v1/learners/{learner_id}/sessions"),
                &json!({ "subject": subject }),
            )
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["id"]
            .as_str()
            .expect("Session id should be a string")
            .to_string()
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: axum::http::HeaderMap,
}

impl TestResponse {
    /// Get response body as string
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    /// Parse response body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }

    /// Assert an error response with the given status and error code
    pub fn assert_error(&self, expected: StatusCode, code: &str) {
        self.assert_status(expected);
        assert_eq!(self.json::<Value>()["code"], code, "Body: {}", self.text());
    }
}
