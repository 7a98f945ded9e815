//! End-to-end coverage of the six seed conversation scenarios: a session is
//! driven through `Planner::run_session` with a sequenced mock LLM provider
//! and a `wiremock`-backed fixture engine, exercising the real tool-use loop
//! and the real `EngineClient` HTTP surface rather than stubbing the planner
//! internals directly.

use hestia_core::{Planner, PlannerConfig, PromptCatalog, UserInput};
use hestia_llm::gateway::Gateway;
use hestia_llm::{MockStep, SequencedMockProvider};
use hestia_tools::{register_builtins, CodeSearchProvider, CodeSearchResult, EngineClient, Error as ToolsError, ToolRegistry};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// A search provider that never finds anything similar, without erroring.
struct EmptySearchProvider;

#[async_trait::async_trait]
impl CodeSearchProvider for EmptySearchProvider {
    async fn search_similar(&self, _query: &str, _top_k: usize) -> hestia_tools::Result<Vec<CodeSearchResult>> {
        Ok(Vec::new())
    }
}

/// A search provider standing in for an embedding model that isn't ready
/// yet: every call fails, and `gatherContext` is expected to degrade to an
/// empty `similarCode` list rather than propagate the error.
struct UnavailableSearchProvider;

#[async_trait::async_trait]
impl CodeSearchProvider for UnavailableSearchProvider {
    async fn search_similar(&self, _query: &str, _top_k: usize) -> hestia_tools::Result<Vec<CodeSearchResult>> {
        Err(ToolsError::Execution("embedding model not ready".to_string()))
    }
}

/// Replays one JSON body per request, in call order. Used for `/validate`,
/// where a scenario needs a different outcome on each attempt.
struct SequencedJsonResponder {
    bodies: std::sync::Mutex<std::collections::VecDeque<serde_json::Value>>,
}

impl SequencedJsonResponder {
    fn new(bodies: Vec<serde_json::Value>) -> Self {
        Self {
            bodies: std::sync::Mutex::new(bodies.into()),
        }
    }
}

impl Respond for SequencedJsonResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let body = self
            .bodies
            .lock()
            .expect("sequenced responder queue poisoned")
            .pop_front()
            .expect("sequenced responder queue exhausted; queue more bodies than the scenario needs");
        ResponseTemplate::new(200).set_body_json(body)
    }
}

async fn mount_topics(server: &MockServer, topics: Vec<&str>) {
    Mock::given(method("GET"))
        .and(path("/topics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(topics))
        .mount(server)
        .await;
}

async fn mount_empty_library(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/library"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(server)
        .await;
}

async fn mount_validate(server: &MockServer, outcomes: Vec<serde_json::Value>) {
    Mock::given(method("POST"))
        .and(path("/validate"))
        .respond_with(SequencedJsonResponder::new(outcomes))
        .mount(server)
        .await;
}

fn planner_with(
    server: &MockServer,
    steps: Vec<MockStep>,
    search: Arc<dyn CodeSearchProvider>,
) -> Planner {
    planner_with_config(server, steps, search, PlannerConfig::default())
}

fn planner_with_config(
    server: &MockServer,
    steps: Vec<MockStep>,
    search: Arc<dyn CodeSearchProvider>,
    config: PlannerConfig,
) -> Planner {
    let provider = Arc::new(SequencedMockProvider::new(steps));
    let gateway = Arc::new(Gateway::new(provider));
    let prompts = Arc::new(PromptCatalog::new());
    let engine = Arc::new(EngineClient::new(server.uri()));

    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry, Arc::clone(&engine), Arc::clone(&search));
    let tools = Arc::new(registry);

    Planner::new(gateway, prompts, engine, search, tools, config)
}

fn input(message: &str) -> UserInput {
    UserInput::new(message, Vec::new()).unwrap()
}

fn intent(kind: &str, description: &str) -> MockStep {
    MockStep::Text(
        json!({
            "type": kind,
            "description": description,
            "confidence": 0.9,
            "entities": {}
        })
        .to_string(),
    )
}

fn requirements(suggested_name: &str) -> MockStep {
    MockStep::Text(
        json!({
            "description": "Turn on the kitchen light at sunset",
            "triggers": ["sunset"],
            "actions": ["turn on kitchen_light"],
            "suggestedName": suggested_name,
            "needsSchedule": false
        })
        .to_string(),
    )
}

fn generated_code(filename: &str) -> MockStep {
    MockStep::Text(
        json!({
            "files": [{
                "code": "on_message('zigbee2mqtt/kitchen_light', lambda payload: set_state('kitchen_light_on', True))",
                "filename": filename,
                "kind": "automation"
            }],
            "summary": "Turns on the kitchen light at sunset"
        })
        .to_string(),
    )
}

fn no_extraction() -> MockStep {
    MockStep::Text(
        json!({
            "files": [],
            "summary": "",
            "extractionPerformed": false
        })
        .to_string(),
    )
}

fn fix_attempt(filename: &str) -> MockStep {
    MockStep::Text(
        json!({
            "files": [{
                "code": "on_message('zigbee2mqtt/kitchen_light', lambda payload: set_state('kitchen_light_on', true))",
                "filename": filename,
                "kind": "automation"
            }],
            "summary": "Fixed the boolean literal"
        })
        .to_string(),
    )
}

fn valid_outcome() -> serde_json::Value {
    json!({"valid": true})
}

fn invalid_outcome() -> serde_json::Value {
    json!({"valid": false, "errors": ["E"]})
}

/// (1) Pure question: no automation is proposed, the answer is grounded in
/// the real `getAllTopics` tool call through the real tool-use loop.
#[tokio::test]
async fn pure_question_answers_via_get_all_topics_tool() {
    let server = MockServer::start().await;
    mount_topics(&server, vec!["zigbee2mqtt/kitchen_light", "zigbee2mqtt/motion_sensor"]).await;
    mount_empty_library(&server).await;

    let steps = vec![
        intent("question", "asking what the kitchen light topic is called"),
        MockStep::ToolCall {
            name: "getAllTopics".to_string(),
            arguments: "{}".to_string(),
        },
        MockStep::ToolTerminal(
            "The kitchen light is reachable at zigbee2mqtt/kitchen_light.".to_string(),
        ),
    ];
    let planner = planner_with(&server, steps, Arc::new(EmptySearchProvider));

    let response = planner.run_session(input("what's the kitchen light's topic?")).await.unwrap();

    assert!(response.message.contains("kitchen_light"));
    assert!(response.code_proposal.is_none());
}

/// (2) First-try success: one validate call, no fix, attempt 1.
#[tokio::test]
async fn first_try_automation_succeeds() {
    let server = MockServer::start().await;
    mount_topics(&server, vec!["zigbee2mqtt/kitchen_light"]).await;
    mount_empty_library(&server).await;
    mount_validate(&server, vec![valid_outcome()]).await;

    let steps = vec![
        intent("automation_request", "turn on the kitchen light at sunset"),
        requirements("kitchen_light_at_sunset"),
        generated_code("kitchen_light_at_sunset.py"),
        no_extraction(),
    ];
    let planner = planner_with(&server, steps, Arc::new(EmptySearchProvider));

    let response = planner
        .run_session(input("turn on the kitchen light at sunset"))
        .await
        .unwrap();

    let proposal = response.code_proposal.expect("expected a code proposal");
    assert_eq!(proposal.files.len(), 1);
}

/// (3) Validate fails once, `fixInvalidCode` repairs it, second validate
/// succeeds: exactly 2 validate calls and 1 fix.
#[tokio::test]
async fn validate_fix_validate_recovers() {
    let server = MockServer::start().await;
    mount_topics(&server, vec!["zigbee2mqtt/kitchen_light"]).await;
    mount_empty_library(&server).await;
    mount_validate(&server, vec![invalid_outcome(), valid_outcome()]).await;

    let steps = vec![
        intent("automation_request", "turn on the kitchen light at sunset"),
        requirements("kitchen_light_at_sunset"),
        generated_code("kitchen_light_at_sunset.py"),
        no_extraction(),
        fix_attempt("kitchen_light_at_sunset.py"),
    ];
    let planner = planner_with(&server, steps, Arc::new(EmptySearchProvider));

    let response = planner
        .run_session(input("turn on the kitchen light at sunset"))
        .await
        .unwrap();

    let proposal = response.code_proposal.expect("expected a code proposal after one fix");
    assert_eq!(proposal.files.len(), 1);

    let validate_requests = server.received_requests().await.unwrap();
    let validate_count = validate_requests.iter().filter(|r| r.url.path() == "/validate").count();
    assert_eq!(validate_count, 2);
}

/// (4) Every fix attempt still fails validation: the session degrades to a
/// failure response rather than looping forever or propagating an error.
#[tokio::test]
async fn max_fix_attempts_exhausted_degrades_to_failure() {
    let server = MockServer::start().await;
    mount_topics(&server, vec!["zigbee2mqtt/kitchen_light"]).await;
    mount_empty_library(&server).await;
    mount_validate(
        &server,
        vec![invalid_outcome(), invalid_outcome(), invalid_outcome()],
    )
    .await;

    let steps = vec![
        intent("automation_request", "turn on the kitchen light at sunset"),
        requirements("kitchen_light_at_sunset"),
        generated_code("kitchen_light_at_sunset.py"),
        no_extraction(),
        fix_attempt("kitchen_light_at_sunset.py"),
        fix_attempt("kitchen_light_at_sunset.py"),
    ];
    let config = PlannerConfig {
        max_fix_attempts: 3,
        ..PlannerConfig::default()
    };
    let planner = planner_with_config(&server, steps, Arc::new(EmptySearchProvider), config);

    let response = planner
        .run_session(input("turn on the kitchen light at sunset"))
        .await
        .unwrap();

    assert!(response.code_proposal.is_none());
    assert!(response.message.contains("3 attempts"));
    assert!(response.message.contains('E'));
}

/// (5) Library extraction co-proposes a library module alongside the
/// automation that uses it.
#[tokio::test]
async fn library_extraction_proposes_two_files() {
    let server = MockServer::start().await;
    mount_topics(&server, vec!["zigbee2mqtt/kitchen_light"]).await;
    mount_empty_library(&server).await;
    mount_validate(&server, vec![valid_outcome(), valid_outcome()]).await;

    let steps = vec![
        intent("automation_request", "turn on the kitchen light at sunset"),
        requirements("kitchen_light_at_sunset"),
        generated_code("kitchen_light_at_sunset.py"),
        MockStep::Text(
            json!({
                "files": [
                    {
                        "code": "def kitchen_light_on(): set_state('kitchen_light_on', True)",
                        "filename": "kitchen_lib.py",
                        "kind": "library"
                    },
                    {
                        "code": "from kitchen_lib import kitchen_light_on\non_message('zigbee2mqtt/kitchen_light', lambda payload: kitchen_light_on())",
                        "filename": "kitchen_light_at_sunset.py",
                        "kind": "automation"
                    }
                ],
                "summary": "Extracted a reusable kitchen light helper",
                "extractionPerformed": true,
                "extractionSummary": "Pulled the state write into kitchen_lib.py"
            })
            .to_string(),
        ),
    ];
    let planner = planner_with(&server, steps, Arc::new(EmptySearchProvider));

    let response = planner
        .run_session(input("turn on the kitchen light at sunset"))
        .await
        .unwrap();

    let proposal = response.code_proposal.expect("expected a code proposal");
    assert_eq!(proposal.files.len(), 2);
}

/// (6) The embedding index isn't ready: `gatherContext` degrades
/// `similarCode` to an empty list instead of failing the session.
#[tokio::test]
async fn degraded_embedding_path_still_plans_successfully() {
    let server = MockServer::start().await;
    mount_topics(&server, vec!["zigbee2mqtt/kitchen_light"]).await;
    mount_empty_library(&server).await;
    mount_validate(&server, vec![valid_outcome()]).await;

    let steps = vec![
        intent("automation_request", "turn on the kitchen light at sunset"),
        requirements("kitchen_light_at_sunset"),
        generated_code("kitchen_light_at_sunset.py"),
        no_extraction(),
    ];
    let planner = planner_with(&server, steps, Arc::new(UnavailableSearchProvider));

    let response = planner
        .run_session(input("turn on the kitchen light at sunset"))
        .await
        .unwrap();

    assert!(response.code_proposal.is_some());
}
