use crate::common::{self, TestClient};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

async fn answer(client: &TestClient, session_id: &str, question_id: &str, text: &str) -> Value {
    let response = client
        .post_json(
            &format!("/v1/sessions/{session_id}/responses"),
            &json!({ "question_id": question_id, "answer": text, "latency_ms": 1500 }),
        )
        .await;
    response.assert_status(StatusCode::OK);
    response.json()
}

#[tokio::test]
async fn test_new_learner_gets_fresh_question_then_nothing_due() {
    let (client, _) = common::app().await;
    let question_id = client
        .create_question("economia", "Cosa misura il PIL?", "Il valore della produzione")
        .await;
    let learner = Uuid::new_v4().to_string();
    let session_id = client.start_session(&learner, None).await;

    let response = client.get(&format!("/v1/sessions/{session_id}/next")).await;
    response.assert_status(StatusCode::OK);
    let next: Value = response.json();
    assert_eq!(next["fresh"], true);
    assert_eq!(next["state"], Value::Null);
    assert_eq!(next["question"]["id"], question_id.as_str());
    assert!(next["question"].get("correct_answer").is_none());

    let outcome = answer(&client, &session_id, &question_id, "il valore della PRODUZIONE").await;
    assert_eq!(outcome["correct"], true);
    assert_eq!(outcome["recovered"], false);
    assert_eq!(outcome["level_change"], "unchanged");
    assert_eq!(outcome["state"]["level"], "beginner");
    assert_eq!(outcome["state"]["consecutive_correct"], 1);
    let next_review_at = outcome["state"]["next_review_at"].as_i64().unwrap();
    assert!(next_review_at > Utc::now().timestamp_millis());

    // The only question is now scheduled in the future
    client
        .get(&format!("/v1/sessions/{session_id}/next"))
        .await
        .assert_error(StatusCode::NOT_FOUND, "no_question_due");
}

#[tokio::test]
async fn test_no_questions_at_all() {
    let (client, _) = common::app().await;
    let session_id = client
        .start_session(&Uuid::new_v4().to_string(), Some("marketing"))
        .await;

    client
        .get(&format!("/v1/sessions/{session_id}/next"))
        .await
        .assert_error(StatusCode::NOT_FOUND, "no_question_due");
}

#[tokio::test]
async fn test_incorrect_answer_reports_correct_answer() {
    let (client, _) = common::app().await;
    let question_id = client
        .create_question("diritto", "Chi promulga le leggi?", "Il Presidente della Repubblica")
        .await;
    let session_id = client
        .start_session(&Uuid::new_v4().to_string(), Some("diritto"))
        .await;

    let outcome = answer(&client, &session_id, &question_id, "il parlamento").await;
    assert_eq!(outcome["correct"], false);
    assert_eq!(outcome["correct_answer"], "Il Presidente della Repubblica");
    assert_eq!(outcome["state"]["encoding_strength"], 0.25);
    assert_eq!(outcome["state"]["current_interval_days"], 1.0);

    let session: Value = client
        .get(&format!("/v1/sessions/{session_id}"))
        .await
        .json();
    assert_eq!(session["summary"]["answered"], 1);
    assert_eq!(session["summary"]["correct"], 0);
    assert_eq!(session["pool_size"], 1);
}

#[tokio::test]
async fn test_one_open_session_per_learner_and_persistence() {
    let (client, _) = common::app().await;
    let question_id = client
        .create_question("informatica", "Struttura LIFO?", "Stack")
        .await;
    let learner = Uuid::new_v4().to_string();

    let first = client.start_session(&learner, None).await;
    answer(&client, &first, &question_id, "stack").await;

    client
        .post_json(&format!("/v1/learners/{learner}/sessions"), &json!({}))
        .await
        .assert_error(StatusCode::CONFLICT, "conflict");

    // Another learner is unaffected
    let other = client.start_session(&Uuid::new_v4().to_string(), None).await;
    let other_session: Value = client.get(&format!("/v1/sessions/{other}")).await.json();
    assert_eq!(other_session["pool_size"], 0);

    client
        .post(&format!("/v1/sessions/{first}/end"))
        .await
        .assert_status(StatusCode::OK);

    let second = client.start_session(&learner, None).await;
    let session: Value = client.get(&format!("/v1/sessions/{second}")).await.json();
    assert_eq!(session["status"], "active");
    assert_eq!(session["pool_size"], 1);
    assert_eq!(session["due_count"], 0);
}

#[tokio::test]
async fn test_unreadable_stored_state_does_not_block_study() {
    let (client, state) = common::app().await;
    let question_id = client
        .create_question("finanza", "Cos'è il rendimento?", "Il guadagno sull'investimento")
        .await;
    let learner = Uuid::new_v4();

    // Timestamp outside the representable range
    sqlx::query(
        r#"
            INSERT INTO review_states (
                learner_id, question_id, subject, encoding_strength,
                current_interval_days, next_review_at, level, consecutive_correct, updated_at
            )
            VALUES (?1, ?2, 'finanza', 0.5, 3.0, ?3, 'advanced', 4, 0)
        "#,
    )
    .bind(learner)
    .bind(Uuid::parse_str(&question_id).unwrap())
    .bind(i64::MAX)
    .execute(&state.pool)
    .await
    .unwrap();

    let session_id = client.start_session(&learner.to_string(), None).await;
    let session: Value = client.get(&format!("/v1/sessions/{session_id}")).await.json();
    assert_eq!(session["status"], "active");
    assert_eq!(session["pool_size"], 0);

    let next: Value = client
        .get(&format!("/v1/sessions/{session_id}/next"))
        .await
        .json();
    assert_eq!(next["fresh"], true);
    assert_eq!(next["question"]["id"], question_id.as_str());

    let outcome = answer(&client, &session_id, &question_id, "il guadagno sull'investimento").await;
    assert_eq!(outcome["correct"], true);
    assert_eq!(outcome["state"]["level"], "beginner");
    assert_eq!(outcome["state"]["consecutive_correct"], 1);
}

#[tokio::test]
async fn test_pause_resume_and_end_twice() {
    let (client, _) = common::app().await;
    client.create_question("finanza", "Cos'è il ROI?", "Ritorno sull'investimento").await;
    let session_id = client.start_session(&Uuid::new_v4().to_string(), None).await;

    let paused: Value = client
        .post(&format!("/v1/sessions/{session_id}/pause"))
        .await
        .json();
    assert_eq!(paused["status"], "paused");

    client
        .get(&format!("/v1/sessions/{session_id}/next"))
        .await
        .assert_error(StatusCode::CONFLICT, "session_not_active");
    client
        .post(&format!("/v1/sessions/{session_id}/pause"))
        .await
        .assert_error(StatusCode::CONFLICT, "invalid_transition");

    let resumed: Value = client
        .post(&format!("/v1/sessions/{session_id}/resume"))
        .await
        .json();
    assert_eq!(resumed["status"], "active");

    let first = client.post(&format!("/v1/sessions/{session_id}/end")).await;
    first.assert_status(StatusCode::OK);
    let second = client.post(&format!("/v1/sessions/{session_id}/end")).await;
    second.assert_status(StatusCode::OK);
    assert_eq!(first.json::<Value>(), second.json::<Value>());
    assert_eq!(second.json::<Value>()["status"], "completed");

    client
        .get(&format!("/v1/sessions/{session_id}/next"))
        .await
        .assert_error(StatusCode::CONFLICT, "session_closed");
    client
        .post(&format!("/v1/sessions/{session_id}/resume"))
        .await
        .assert_error(StatusCode::CONFLICT, "session_closed");
}

#[tokio::test]
async fn test_archive_question() {
    let (client, _) = common::app().await;
    let question_id = client
        .create_question("matematica", "Derivata di x^2?", "2x")
        .await;
    let session_id = client.start_session(&Uuid::new_v4().to_string(), None).await;
    answer(&client, &session_id, &question_id, "2x").await;

    let uri = format!("/v1/sessions/{session_id}/questions/{question_id}");
    client.delete(&uri).await.assert_status(StatusCode::NO_CONTENT);
    client
        .delete(&uri)
        .await
        .assert_error(StatusCode::NOT_FOUND, "not_found");

    // Archived material is new again
    let next: Value = client
        .get(&format!("/v1/sessions/{session_id}/next"))
        .await
        .json();
    assert_eq!(next["fresh"], true);
}

#[tokio::test]
async fn test_unknown_session_question_and_subject() {
    let (client, _) = common::app().await;

    client
        .get(&format!("/v1/sessions/{}/next", Uuid::new_v4()))
        .await
        .assert_error(StatusCode::NOT_FOUND, "not_found");

    client
        .post_json(
            &format!("/v1/learners/{}/sessions", Uuid::new_v4()),
            &json!({ "subject": "astrologia" }),
        )
        .await
        .assert_error(StatusCode::BAD_REQUEST, "validation_error");

    let session_id = client.start_session(&Uuid::new_v4().to_string(), None).await;
    client
        .post_json(
            &format!("/v1/sessions/{session_id}/responses"),
            &json!({ "question_id": Uuid::new_v4(), "answer": "x" }),
        )
        .await
        .assert_error(StatusCode::SERVICE_UNAVAILABLE, "question_unavailable");
}

#[tokio::test]
async fn test_reaper_ends_idle_sessions_then_drops_them() {
    let (client, state) = common::app().await;
    let session_id = client.start_session(&Uuid::new_v4().to_string(), None).await;
    let idle_timeout = state.config.session_idle_timeout();

    let report = state.sessions.reap(Utc::now(), idle_timeout).await;
    assert_eq!(report.ended, 0);

    let later = Utc::now() + idle_timeout + Duration::minutes(1);
    let report = state.sessions.reap(later, idle_timeout).await;
    assert_eq!(report.ended, 1);

    let session: Value = client.get(&format!("/v1/sessions/{session_id}")).await.json();
    assert_eq!(session["status"], "completed");

    let report = state.sessions.reap(later, idle_timeout).await;
    assert_eq!(report.dropped, 1);
    assert!(state.sessions.is_empty().await);
    client
        .get(&format!("/v1/sessions/{session_id}"))
        .await
        .assert_error(StatusCode::NOT_FOUND, "not_found");
}
