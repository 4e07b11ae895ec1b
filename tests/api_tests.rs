//! API integration tests
//!
//! Drive the full router through axum-test. Provider keys point at env vars
//! that are never set, so real-agent requests fall back to mock agents.

use agent_hub::cli::output::Output;
use agent_hub::cli::simulate::{self, SimulateOptions};
use agent_hub::types::{RunState, RunStatus};
use agent_hub::utils::toml_config::{HubConfig, ProviderConfig};
use agent_hub::{build_router, AppState};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::time::Duration;

// ============= Helpers =============

const QUESTION: &str = "What are the implications of quantum computing?";

fn test_config(admin_env: &str) -> HubConfig {
    let mut config = HubConfig::default();
    for (name, provider) in config.providers.iter_mut() {
        let unset = format!("AGENT_HUB_TEST_UNSET_{}_KEY", name.to_uppercase());
        match provider {
            ProviderConfig::OpenAI { api_key_env, .. }
            | ProviderConfig::Anthropic { api_key_env, .. } => *api_key_env = unset,
        }
    }
    config.auth.admin_password_env = admin_env.to_string();
    config
}

fn create_test_server() -> TestServer {
    create_server_with(test_config("AGENT_HUB_TEST_UNSET_ADMIN"))
}

fn create_server_with(config: HubConfig) -> TestServer {
    let app = build_router(AppState::new(config));
    TestServer::new(app).expect("Failed to create test server")
}

async fn create_question(server: &TestServer, text: &str) -> String {
    let response = server
        .post("/question")
        .form(&[("question_text", text)])
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["question_id"].as_str().unwrap().to_string()
}

/// Poll the status endpoint until the run finishes, checking progress never drops.
async fn wait_for_completion(server: &TestServer, question_id: &str) -> Value {
    let mut last_progress = 0;
    for _ in 0..200 {
        let response = server
            .get(&format!("/api/real-agents/status/{}", question_id))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        let progress = body["progress"].as_u64().unwrap();
        assert!(progress >= last_progress, "progress went backwards");
        last_progress = progress;

        match body["status"].as_str().unwrap() {
            "complete" => return body,
            "failed" => panic!("run failed: {}", body),
            _ => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    panic!("run did not complete");
}

fn submission(agent_id: &str, stage: &str, payload: Value) -> Value {
    json!({
        "agent_id": agent_id,
        "agent_name": "External Agent",
        "stage": stage,
        "payload": payload
    })
}

fn response_payload(confidence: f64) -> Value {
    json!({
        "content": "Quantum computers threaten RSA.",
        "confidence": confidence,
        "reasoning": "Shor's algorithm"
    })
}

// ============= Health & UI =============

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/api/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_html_views_are_served() {
    let server = create_test_server();

    let home = server.get("/").await;
    home.assert_status_ok();
    assert!(home.text().contains("<title>Multi-Agent Hub</title>"));

    let real = server.get("/real-agents").await;
    real.assert_status_ok();
    assert!(real.text().contains("Real AI Agents"));

    let script = server.get("/static/common.js").await;
    script.assert_status_ok();
    assert!(script
        .header("content-type")
        .to_str()
        .unwrap()
        .contains("javascript"));

    server.get("/static/nope.js").await.assert_status_not_found();
}

#[tokio::test]
async fn test_openapi_document() {
    let server = create_test_server();
    let response = server.get("/api/openapi.json").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["paths"]["/submit/{question_id}"].is_object());
    assert!(body["paths"]["/api/real-agents/run"].is_object());
}

// ============= Questions =============

#[tokio::test]
async fn test_create_question_resolves_context() {
    let server = create_test_server();
    let question_id = create_question(&server, QUESTION).await;

    let response = server.get(&format!("/context/{}", question_id)).await;
    response.assert_status_ok();
    let context: Value = response.json();
    assert_eq!(context["question_id"], question_id.as_str());
    assert_eq!(context["question_text"], QUESTION);
    assert_eq!(context["responses"], json!({}));
    assert_eq!(context["critiques"], json!({}));

    let questions: Value = server.get("/questions").await.json();
    assert_eq!(questions[&question_id]["text"], QUESTION);
}

#[tokio::test]
async fn test_create_question_from_query_param() {
    let server = create_test_server();
    let response = server
        .post("/question")
        .add_query_param("question_text", "Is Rust fast?")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["question_id"].is_string());
}

#[tokio::test]
async fn test_blank_question_rejected() {
    let server = create_test_server();

    let response = server
        .post("/question")
        .form(&[("question_text", "   ")])
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].is_string());

    server.post("/question").await.assert_status_bad_request();
}

#[tokio::test]
async fn test_delete_question() {
    let server = create_test_server();
    let question_id = create_question(&server, QUESTION).await;

    server
        .delete(&format!("/question/{}", question_id))
        .await
        .assert_status_ok();

    let questions: Value = server.get("/questions").await.json();
    assert!(questions.get(&question_id).is_none());
    server
        .get(&format!("/context/{}", question_id))
        .await
        .assert_status_not_found();
    server
        .delete(&format!("/question/{}", question_id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_unknown_question_is_not_found() {
    let server = create_test_server();
    server.get("/context/does-not-exist").await.assert_status_not_found();
    server
        .get("/api/real-agents/status/does-not-exist")
        .await
        .assert_status_not_found();
    server
        .post("/question/does-not-exist/simulate")
        .await
        .assert_status_not_found();
}

// ============= Runs =============

#[tokio::test]
async fn test_simulate_fills_every_stage() {
    let server = create_test_server();
    let question_id = create_question(&server, QUESTION).await;

    let response = server
        .post(&format!("/question/{}/simulate", question_id))
        .await;
    response.assert_status(StatusCode::ACCEPTED);

    let status = wait_for_completion(&server, &question_id).await;
    assert_eq!(status["progress"], 100);

    let context: Value = server.get(&format!("/context/{}", question_id)).await.json();
    for stage in ["responses", "research", "conclusions"] {
        let entries = context[stage].as_object().unwrap();
        assert_eq!(entries.len(), 3, "{}", stage);
        assert!(entries.contains_key("agent-gpt"));
    }
    for (author, targets) in context["critiques"].as_object().unwrap() {
        let targets = targets.as_object().unwrap();
        assert_eq!(targets.len(), 2);
        assert!(!targets.contains_key(author));
    }
    for response in context["responses"].as_object().unwrap().values() {
        let confidence = response["confidence"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&confidence));
    }
}

#[tokio::test]
async fn test_simulate_rejects_run_in_progress() {
    let state = AppState::new(test_config("AGENT_HUB_TEST_UNSET_ADMIN"));
    let server = TestServer::new(build_router(state.clone())).unwrap();
    let question_id = create_question(&server, QUESTION).await;
    state
        .store
        .start_run(&question_id, RunStatus::new(vec!["agent-external".into()], false))
        .unwrap();

    let response = server
        .post(&format!("/question/{}/simulate", question_id))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("already in progress"));

    let run = state.store.run_status(&question_id).unwrap();
    assert_eq!(run.state, RunState::Pending);
    assert_eq!(run.agents, vec!["agent-external".to_string()]);

    // Once the run is over the question can be simulated again
    state.store.finish_run(&question_id).unwrap();
    server
        .post(&format!("/question/{}/simulate", question_id))
        .await
        .assert_status(StatusCode::ACCEPTED);
    let status = wait_for_completion(&server, &question_id).await;
    assert_eq!(status["progress"], 100);
}

#[tokio::test]
async fn test_real_agent_run_falls_back_to_mocks() {
    let server = create_test_server();

    let agents: Value = server.get("/api/agents").await.json();
    let agents = agents.as_array().unwrap();
    assert_eq!(agents.len(), 3);
    assert!(agents.iter().all(|a| a["kind"] == "mock"));

    let response = server
        .post("/api/real-agents/run")
        .json(&json!({ "question": QUESTION, "use_real_agents": true }))
        .await;
    response.assert_status(StatusCode::ACCEPTED);
    let body: Value = response.json();
    assert_eq!(body["status"], "processing");
    let question_id = body["question_id"].as_str().unwrap().to_string();

    let status = wait_for_completion(&server, &question_id).await;
    assert_eq!(status["question_text"], QUESTION);

    let context: Value = server.get(&format!("/context/{}", question_id)).await.json();
    assert_eq!(context["conclusions"].as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_run_requires_question() {
    let server = create_test_server();
    server
        .post("/api/real-agents/run")
        .json(&json!({ "question": "  " }))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_status_without_run_is_derived_from_context() {
    let server = create_test_server();
    let question_id = create_question(&server, QUESTION).await;

    let status: Value = server
        .get(&format!("/api/real-agents/status/{}", question_id))
        .await
        .json();
    assert_eq!(status["status"], "pending");
    assert_eq!(status["progress"], 0);

    server
        .post(&format!("/submit/{}", question_id))
        .json(&submission("external-1", "response", response_payload(0.8)))
        .await
        .assert_status_ok();

    let status: Value = server
        .get(&format!("/api/real-agents/status/{}", question_id))
        .await
        .json();
    assert_eq!(status["status"], "responses_ready");
    assert_eq!(status["progress"], 25);
}

// ============= Submissions =============

#[tokio::test]
async fn test_submit_without_key_when_optional() {
    let server = create_test_server();
    let question_id = create_question(&server, QUESTION).await;

    server
        .post(&format!("/submit/{}", question_id))
        .json(&submission("external-1", "response", response_payload(0.8)))
        .await
        .assert_status_ok();
    server
        .post(&format!("/submit/{}", question_id))
        .json(&submission(
            "external-1",
            "critique",
            json!({
                "target_agent": "agent-gpt",
                "critique": "Overstates the timeline.",
                "agreement_level": 0.4,
                "key_points": ["timeline"]
            }),
        ))
        .await
        .assert_status_ok();

    let context: Value = server.get(&format!("/context/{}", question_id)).await.json();
    assert_eq!(context["responses"]["external-1"]["agent_name"], "External Agent");
    assert_eq!(
        context["critiques"]["external-1"]["agent-gpt"]["agreement_level"],
        0.4
    );
}

#[tokio::test]
async fn test_submit_rejects_bad_input() {
    let server = create_test_server();
    let question_id = create_question(&server, QUESTION).await;

    server
        .post(&format!("/submit/{}", question_id))
        .json(&submission("external-1", "opinion", response_payload(0.8)))
        .await
        .assert_status_bad_request();
    server
        .post(&format!("/submit/{}", question_id))
        .json(&submission("external-1", "response", response_payload(1.5)))
        .await
        .assert_status_bad_request();
    server
        .post(&format!("/submit/{}", question_id))
        .json(&submission("external-1", "response", json!({ "confidence": 0.5 })))
        .await
        .assert_status_bad_request();
    server
        .post("/submit/missing")
        .json(&submission("external-1", "response", response_payload(0.8)))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_required_api_key_flow() {
    let admin_env = "AGENT_HUB_TEST_ADMIN_PASSWORD_REQUIRED";
    std::env::set_var(admin_env, "s3cret");
    let mut config = test_config(admin_env);
    config.auth.require_api_key = true;
    let server = create_server_with(config);
    let question_id = create_question(&server, QUESTION).await;

    server
        .post(&format!("/submit/{}", question_id))
        .json(&submission("external-1", "response", response_payload(0.8)))
        .await
        .assert_status_unauthorized();

    let created: Value = server
        .post("/api/keys")
        .json(&json!({
            "agent_id": "external-1",
            "agent_name": "External Agent",
            "admin_password": "s3cret"
        }))
        .await
        .json();
    let key = created["key"].as_str().unwrap().to_string();
    assert_eq!(created["agent_id"], "external-1");
    assert!(key.starts_with(created["key_prefix"].as_str().unwrap()));

    let api_key = HeaderName::from_static("x-api-key");
    server
        .post(&format!("/submit/{}", question_id))
        .add_header(api_key.clone(), HeaderValue::from_str(&key).unwrap())
        .json(&submission("external-1", "response", response_payload(0.8)))
        .await
        .assert_status_ok();

    // A valid key cannot speak for a different agent.
    server
        .post(&format!("/submit/{}", question_id))
        .add_header(api_key.clone(), HeaderValue::from_str(&key).unwrap())
        .json(&submission("external-2", "response", response_payload(0.8)))
        .await
        .assert_status_unauthorized();

    server
        .post(&format!("/submit/{}", question_id))
        .add_header(api_key, HeaderValue::from_static("not-a-real-key"))
        .json(&submission("external-1", "response", response_payload(0.8)))
        .await
        .assert_status_unauthorized();
}

// ============= Key Management =============

#[tokio::test]
async fn test_key_management_lifecycle() {
    let admin_env = "AGENT_HUB_TEST_ADMIN_PASSWORD_LIFECYCLE";
    std::env::set_var(admin_env, "letmein");
    let server = create_server_with(test_config(admin_env));

    server
        .post("/api/keys")
        .json(&json!({
            "agent_id": "external-1",
            "agent_name": "External Agent",
            "admin_password": "wrong"
        }))
        .await
        .assert_status_unauthorized();

    let created: Value = server
        .post("/api/keys")
        .json(&json!({
            "agent_id": "external-1",
            "agent_name": "External Agent",
            "description": "nightly runner",
            "admin_password": "letmein"
        }))
        .await
        .json();
    let key_id = created["id"].as_str().unwrap().to_string();

    let listed: Value = server
        .get("/api/keys")
        .add_query_param("admin_password", "letmein")
        .await
        .json();
    let keys = listed["api_keys"].as_array().unwrap();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].get("key").is_none());
    assert_eq!(keys[0]["description"], "nightly runner");

    server
        .delete(&format!("/api/keys/{}", key_id))
        .add_query_param("admin_password", "letmein")
        .await
        .assert_status_ok();

    let listed: Value = server
        .get("/api/keys")
        .add_query_param("admin_password", "letmein")
        .await
        .json();
    assert_eq!(listed["api_keys"][0]["is_active"], false);

    server
        .delete("/api/keys/unknown")
        .add_query_param("admin_password", "letmein")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_key_management_disabled_without_password() {
    let server = create_test_server();
    server
        .get("/api/keys")
        .add_query_param("admin_password", "anything")
        .await
        .assert_status_unauthorized();
}

// ============= Simulate CLI =============

#[tokio::test]
async fn test_simulate_command_against_live_server() {
    let config = test_config("AGENT_HUB_TEST_UNSET_ADMIN");
    let app = build_router(AppState::new(config.clone()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let options = SimulateOptions {
        base_url: format!("http://{}", addr),
        question: QUESTION.to_string(),
        api_key: None,
    };
    let context = simulate::run(config, options, &Output::no_color())
        .await
        .unwrap();

    assert_eq!(context.question_text, QUESTION);
    assert_eq!(context.responses.len(), 3);
    assert_eq!(context.critiques.values().map(|t| t.len()).sum::<usize>(), 6);
    assert_eq!(context.research.len(), 3);
    assert_eq!(context.conclusions.len(), 3);
    assert_eq!(context.derived_status(), ("complete", 100));
}
