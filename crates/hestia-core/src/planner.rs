//! Planner (GOAP) - selects and runs actions against a session blackboard
//! until a goal action succeeds.
//!
//! Action ordering is enforced by the type chain on the blackboard
//! (`GeneratedCode` → `ExtractedCode` → `ValidatedCode`), not by tracking a
//! separate state machine — see [`crate::types`] and [`crate::blackboard`].

use crate::blackboard::Blackboard;
use crate::error::{Error, Result};
use crate::prompts::PromptCatalog;
use crate::tool_bridge::ToolRegistryExecutor;
use crate::types::{
    AutomationRequirements, CodeProposal, ConversationalAnswer, ExtractedCode, FileProposal,
    FinalResponse, GatheredContext, GeneratedCode, HistoryTurn, IntentType, ParsedIntent, UserInput,
    ValidatedCode, ValidationFailure,
};
use hestia_llm::gateway::{Gateway, GatewayOptions, StructuredTarget};
use hestia_tools::{CodeKind, CodeSearchProvider, EngineClient, ToolRegistry};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Priority order when more than one non-goal action is eligible. The
/// retry loop (`fixInvalidCode`, `validateCode`) always drains before any
/// branch change.
const NON_GOAL_PRIORITY: &[&str] = &[
    "fixInvalidCode",
    "validateCode",
    "extractToLibrary",
    "generateCode",
    "gatherContext",
    "extractRequirements",
    "parseIntent",
    "answerQuestion",
];

/// Goal actions, in the order used to break ties when more than one is
/// eligible at once (can happen when a `ValidatedCode` is both valid and at
/// the attempt ceiling: success takes precedence over failure framing).
const GOAL_PRIORITY: &[&str] = &["respondWithAutomation", "respondWithFailure", "respondConversationally"];

/// Runtime tunables, named after the configuration keys in the external
/// interface contract.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Retry bound in the validate/fix loop.
    pub max_fix_attempts: u32,
    /// Fan-out cap in `gatherContext`.
    pub max_concurrency: usize,
    /// Fast/cheap model id used for classification calls.
    pub classification_llm: String,
    /// High-quality model id used for generation calls.
    pub generation_llm: String,
    /// Timeout for the `gatherContext` fan-out.
    pub context_gathering_timeout: Duration,
    /// Temperature for generation/fix/extraction calls.
    pub generation_temperature: f32,
    /// Temperature for conversational calls.
    pub conversation_temperature: f32,
    /// How many of `similarCode`'s results to request.
    pub similar_code_top_k: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_fix_attempts: 3,
            max_concurrency: 4,
            classification_llm: "classification-default".to_string(),
            generation_llm: "generation-default".to_string(),
            context_gathering_timeout: Duration::from_secs(30),
            generation_temperature: 0.3,
            conversation_temperature: 0.7,
            similar_code_top_k: 5,
        }
    }
}

/// Everything the planner needs to run one session: the LLM gateway, the
/// prompt catalog, the external engine adapter, the code search provider,
/// and the tool registry exposed to the LLM during `answerQuestion`.
pub struct Planner {
    gateway: Arc<Gateway>,
    prompts: Arc<PromptCatalog>,
    engine: Arc<EngineClient>,
    search: Arc<dyn CodeSearchProvider>,
    tools: Arc<ToolRegistry>,
    config: PlannerConfig,
}

impl Planner {
    /// Build a planner from its collaborators.
    #[must_use]
    pub fn new(
        gateway: Arc<Gateway>,
        prompts: Arc<PromptCatalog>,
        engine: Arc<EngineClient>,
        search: Arc<dyn CodeSearchProvider>,
        tools: Arc<ToolRegistry>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            gateway,
            prompts,
            engine,
            search,
            tools,
            config,
        }
    }

    /// Run the planner to termination against a fresh blackboard seeded
    /// with `input`.
    #[instrument(skip(self, input))]
    pub async fn run_session(&self, input: UserInput) -> Result<FinalResponse> {
        let mut bb = Blackboard::new();
        bb.add(input);
        let mut ran: std::collections::HashSet<&'static str> = std::collections::HashSet::new();

        loop {
            match self.step(&mut bb, &mut ran).await {
                Ok(Some(response)) => return Ok(response),
                Ok(None) => continue,
                Err(Error::NoPlanApplicable) => {
                    warn!("no applicable plan action; falling back to failure response");
                    return Ok(FinalResponse::message_only(
                        "Sorry, I couldn't figure out how to handle that (unreachable plan state).",
                    ));
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// Run one selection/execution step. Returns `Some(response)` once a
    /// goal action has completed.
    #[instrument(skip(self, bb, ran))]
    async fn step(
        &self,
        bb: &mut Blackboard,
        ran: &mut std::collections::HashSet<&'static str>,
    ) -> Result<Option<FinalResponse>> {
        if let Some(goal) = self.select_goal(bb) {
            debug!(action = goal, "running goal action");
            let response = self.run_goal(goal, bb)?;
            return Ok(Some(response));
        }

        let Some(action) = self.select_non_goal(bb, ran) else {
            return Err(Error::NoPlanApplicable);
        };

        let start = Instant::now();
        info!(action, "running action");
        let outcome = self.run_non_goal(action, bb).await;
        match outcome {
            Ok(()) => {
                ran.insert(action);
                debug!(action, elapsed_ms = start.elapsed().as_millis() as u64, "action succeeded");
                Ok(None)
            }
            Err(err) => {
                warn!(action, error = %err, "action failed; skipping and replanning");
                ran.insert(action);
                Ok(None)
            }
        }
    }

    fn select_goal(&self, bb: &Blackboard) -> Option<&'static str> {
        GOAL_PRIORITY.iter().copied().find(|&name| self.goal_eligible(name, bb))
    }

    fn goal_eligible(&self, name: &str, bb: &Blackboard) -> bool {
        match name {
            "respondWithAutomation" => code_is_valid(bb, self.config.max_fix_attempts) && is_automation_request(bb),
            "respondWithFailure" => max_retries_exhausted(bb, self.config.max_fix_attempts) && is_automation_request(bb),
            "respondConversationally" => is_question_or_chat(bb) && bb.has_type::<ConversationalAnswer>(),
            _ => false,
        }
    }

    fn select_non_goal(
        &self,
        bb: &Blackboard,
        ran: &std::collections::HashSet<&'static str>,
    ) -> Option<&'static str> {
        NON_GOAL_PRIORITY
            .iter()
            .copied()
            .find(|&name| self.non_goal_eligible(name, bb, ran))
    }

    fn non_goal_eligible(
        &self,
        name: &str,
        bb: &Blackboard,
        ran: &std::collections::HashSet<&'static str>,
    ) -> bool {
        let already_ran = ran.contains(name);
        match name {
            "parseIntent" => !already_ran && bb.has_type::<UserInput>(),
            "extractRequirements" => !already_ran && bb.has_type::<UserInput>() && bb.has_type::<ParsedIntent>(),
            "gatherContext" => !already_ran && bb.has_type::<AutomationRequirements>(),
            "generateCode" => {
                !already_ran
                    && bb.has_type::<UserInput>()
                    && bb.has_type::<AutomationRequirements>()
                    && bb.has_type::<GatheredContext>()
            }
            "extractToLibrary" => !already_ran && bb.has_type::<GeneratedCode>(),
            "validateCode" => bb.count_of_type::<ExtractedCode>() > bb.count_of_type::<ValidatedCode>(),
            "fixInvalidCode" => {
                code_is_invalid(bb) && can_still_retry(bb, self.config.max_fix_attempts)
            }
            "answerQuestion" => {
                !already_ran && is_question_or_chat(bb) && bb.has_type::<UserInput>() && bb.has_type::<ParsedIntent>()
            }
            _ => false,
        }
    }

    fn run_goal(&self, name: &str, bb: &Blackboard) -> Result<FinalResponse> {
        match name {
            "respondWithAutomation" => {
                let validated = latest(bb.all_of_type::<ValidatedCode>())
                    .ok_or_else(|| Error::Internal("goal eligible without ValidatedCode".to_string()))?;
                Ok(FinalResponse::with_proposal(
                    validated.summary.clone(),
                    CodeProposal {
                        summary: validated.summary.clone(),
                        files: validated.files.clone(),
                    },
                ))
            }
            "respondWithFailure" => {
                let validated = latest(bb.all_of_type::<ValidatedCode>())
                    .ok_or_else(|| Error::Internal("goal eligible without ValidatedCode".to_string()))?;
                let failures = bb.all_of_type::<ValidationFailure>();
                let errors: Vec<&str> = failures
                    .iter()
                    .flat_map(|f| f.errors.iter().map(String::as_str))
                    .collect();
                let message = format!(
                    "I couldn't produce a working automation after {} attempts. Last errors: {}",
                    validated.attempt,
                    errors.join("; ")
                );
                Ok(FinalResponse::message_only(message))
            }
            "respondConversationally" => {
                let answer = bb
                    .first_of_type::<ConversationalAnswer>()
                    .ok_or_else(|| Error::Internal("goal eligible without ConversationalAnswer".to_string()))?;
                Ok(FinalResponse::message_only(answer.answer.clone()))
            }
            other => Err(Error::Internal(format!("unknown goal action: {other}"))),
        }
    }

    #[instrument(skip(self, bb))]
    async fn run_non_goal(&self, name: &str, bb: &mut Blackboard) -> Result<()> {
        match name {
            "parseIntent" => self.do_parse_intent(bb).await,
            "extractRequirements" => self.do_extract_requirements(bb).await,
            "gatherContext" => self.do_gather_context(bb).await,
            "generateCode" => self.do_generate_code(bb).await,
            "extractToLibrary" => self.do_extract_to_library(bb).await,
            "validateCode" => self.do_validate_code(bb).await,
            "fixInvalidCode" => self.do_fix_invalid_code(bb).await,
            "answerQuestion" => self.do_answer_question(bb).await,
            other => Err(Error::Internal(format!("unknown action: {other}"))),
        }
    }

    async fn do_parse_intent(&self, bb: &mut Blackboard) -> Result<()> {
        let input = bb
            .first_of_type::<UserInput>()
            .expect("parseIntent eligible implies UserInput present");

        let vars = HashMap::from([
            ("user_message".to_string(), input.message.clone()),
            ("conversation_history".to_string(), render_history(&input.history)),
        ]);
        let prompt = self.prompts.render("intent_classification", &vars)?;

        #[derive(Deserialize)]
        struct RawIntent {
            #[serde(rename = "type")]
            intent_type: String,
            description: String,
            confidence: f32,
            #[serde(default)]
            entities: HashMap<String, String>,
        }

        let messages = vec![hestia_llm::Message::user(&prompt)];
        let mut options = GatewayOptions::generation(self.config.classification_llm.clone())
            .with_structured_target(StructuredTarget::Json)
            .with_timeout_class(hestia_llm::TimeoutClass::Classification);
        options.temperature = self.config.generation_temperature;
        let raw: RawIntent = self.gateway.invoke_structured(messages, &options, None).await?;

        let intent_type = match raw.intent_type.as_str() {
            "automation_request" => IntentType::AutomationRequest,
            "question" => IntentType::Question,
            "chat" => IntentType::Chat,
            _ => IntentType::Unknown,
        };

        bb.add(ParsedIntent {
            intent_type,
            description: raw.description,
            confidence: raw.confidence.clamp(0.0, 1.0),
            entities: raw.entities,
        });
        Ok(())
    }

    async fn do_extract_requirements(&self, bb: &mut Blackboard) -> Result<()> {
        let intent = bb
            .first_of_type::<ParsedIntent>()
            .expect("extractRequirements eligible implies ParsedIntent present");

        if !intent.is_automation_request() {
            return Ok(());
        }

        let input = bb.first_of_type::<UserInput>().expect("UserInput present").clone();
        let description = intent.description.clone();

        let vars = HashMap::from([
            ("user_message".to_string(), input.message.clone()),
            ("intent_description".to_string(), description),
        ]);
        let prompt = self.prompts.render("requirements_extraction", &vars)?;

        #[derive(Deserialize)]
        struct RawRequirements {
            description: String,
            triggers: Vec<String>,
            actions: Vec<String>,
            #[serde(default)]
            conditions: Option<Vec<String>>,
            #[serde(rename = "suggestedName")]
            suggested_name: String,
            #[serde(rename = "needsSchedule")]
            needs_schedule: bool,
            #[serde(default)]
            schedule: Option<String>,
            #[serde(default, rename = "globalStateWrites")]
            global_state_writes: Option<Vec<String>>,
        }

        let messages = vec![hestia_llm::Message::user(&prompt)];
        let mut options = GatewayOptions::generation(self.config.generation_llm.clone())
            .with_structured_target(StructuredTarget::Json);
        options.temperature = self.config.generation_temperature;
        let raw: RawRequirements = self.gateway.invoke_structured(messages, &options, None).await?;

        let requirements = AutomationRequirements {
            description: raw.description,
            triggers: raw.triggers,
            actions: raw.actions,
            conditions: raw.conditions,
            suggested_name: raw.suggested_name,
            needs_schedule: raw.needs_schedule,
            schedule: raw.schedule,
            global_state_writes: raw.global_state_writes,
        }
        .validate()?;

        bb.add(requirements);
        Ok(())
    }

    async fn do_gather_context(&self, bb: &mut Blackboard) -> Result<()> {
        let requirements = bb
            .first_of_type::<AutomationRequirements>()
            .expect("gatherContext eligible implies AutomationRequirements present");

        let description = requirements.description.clone();
        let triggers = requirements.triggers.clone();
        let top_k = self.config.similar_code_top_k;

        debug!(
            fan_out = 3,
            max_concurrency = self.config.max_concurrency,
            "gatherContext fanning out"
        );

        let engine = Arc::clone(&self.engine);
        let search = Arc::clone(&self.search);

        let topics_fut = {
            let engine = Arc::clone(&engine);
            async move { engine.get_all_topics().await }
        };
        let libraries_fut = {
            let engine = Arc::clone(&engine);
            async move { engine.get_library_modules().await }
        };
        let similar_fut = async move { search.search_similar(&description, top_k).await.unwrap_or_default() };

        let joined = tokio::time::timeout(
            self.config.context_gathering_timeout,
            futures::future::join3(topics_fut, libraries_fut, similar_fut),
        )
        .await;

        let (available_topics, available_libraries, similar_code) = match joined {
            Ok(results) => results,
            Err(_) => {
                warn!("gatherContext timed out; proceeding with empty context");
                (Vec::new(), Vec::new(), Vec::new())
            }
        };

        let relevant_topics: Vec<String> = available_topics
            .iter()
            .filter(|topic| {
                triggers
                    .iter()
                    .any(|trigger| topic.to_lowercase().contains(&trigger.to_lowercase()))
            })
            .cloned()
            .collect();

        bb.add(GatheredContext {
            available_topics,
            relevant_topics,
            similar_code,
            available_libraries,
        });
        Ok(())
    }

    async fn do_generate_code(&self, bb: &mut Blackboard) -> Result<()> {
        let requirements = bb
            .first_of_type::<AutomationRequirements>()
            .expect("generateCode eligible implies AutomationRequirements present");
        let requirements = serde_json::to_string(requirements).unwrap_or_default();
        let context = bb
            .first_of_type::<GatheredContext>()
            .expect("generateCode eligible implies GatheredContext present");

        let vars = HashMap::from([
            ("requirements".to_string(), requirements),
            ("relevant_topics".to_string(), context.relevant_topics.join(", ")),
            (
                "available_libraries".to_string(),
                serde_json::to_string(&context.available_libraries).unwrap_or_default(),
            ),
            (
                "similar_code".to_string(),
                serde_json::to_string(&context.similar_code).unwrap_or_default(),
            ),
        ]);
        let prompt = self.prompts.render("code_generation", &vars)?;

        let (files, summary) = self.request_code(&prompt).await?;
        bb.add(GeneratedCode::new(files, summary, 1)?);
        Ok(())
    }

    async fn do_extract_to_library(&self, bb: &mut Blackboard) -> Result<()> {
        let generated = bb
            .first_of_type::<GeneratedCode>()
            .expect("extractToLibrary eligible implies GeneratedCode present")
            .clone();

        let vars = HashMap::from([(
            "generated_code".to_string(),
            serde_json::to_string(&generated).unwrap_or_default(),
        )]);
        let prompt = self.prompts.render("library_extraction", &vars)?;

        #[derive(Deserialize)]
        struct RawExtraction {
            files: Vec<RawFile>,
            summary: String,
            #[serde(rename = "extractionPerformed")]
            extraction_performed: bool,
            #[serde(default, rename = "extractionSummary")]
            extraction_summary: Option<String>,
        }

        let messages = vec![hestia_llm::Message::user(&prompt)];
        let mut options = GatewayOptions::generation(self.config.generation_llm.clone())
            .with_structured_target(StructuredTarget::Json);
        options.temperature = self.config.generation_temperature;
        let raw: RawExtraction = match self.gateway.invoke_structured(messages, &options, None).await {
            Ok(raw) => raw,
            Err(_) => {
                bb.add(ExtractedCode::unchanged(generated));
                return Ok(());
            }
        };

        if !raw.extraction_performed {
            bb.add(ExtractedCode::unchanged(generated));
            return Ok(());
        }

        let files = raw
            .files
            .into_iter()
            .map(RawFile::into_proposal)
            .collect::<Result<Vec<_>>>()?;

        bb.add(ExtractedCode::extracted(
            generated.attempt,
            files,
            raw.summary,
            raw.extraction_summary.unwrap_or_default(),
        ));
        Ok(())
    }

    async fn do_validate_code(&self, bb: &mut Blackboard) -> Result<()> {
        let extracted = latest(bb.all_of_type::<ExtractedCode>())
            .expect("validateCode eligible implies an unvalidated ExtractedCode present")
            .clone();

        let mut failures = Vec::new();
        for file in &extracted.files {
            let outcome = self.engine.validate(&file.code, file.kind).await;
            if !outcome.valid {
                failures.push(ValidationFailure {
                    file: file.clone(),
                    errors: if outcome.errors.is_empty() {
                        vec!["validation failed with no detail".to_string()]
                    } else {
                        outcome.errors
                    },
                });
            }
        }

        for failure in failures {
            bb.add(failure);
        }
        bb.add(ValidatedCode::from_extracted(&extracted));
        Ok(())
    }

    async fn do_fix_invalid_code(&self, bb: &mut Blackboard) -> Result<()> {
        let extracted = latest(bb.all_of_type::<ExtractedCode>())
            .expect("fixInvalidCode eligible implies an ExtractedCode present")
            .clone();
        let failures: Vec<ValidationFailure> = bb.all_of_type::<ValidationFailure>().into_iter().cloned().collect();

        let vars = HashMap::from([
            (
                "validation_failures".to_string(),
                serde_json::to_string(&failures).unwrap_or_default(),
            ),
            (
                "original_files".to_string(),
                serde_json::to_string(&extracted.files).unwrap_or_default(),
            ),
        ]);
        let prompt = self.prompts.render("code_fix", &vars)?;

        let (files, summary) = self.request_code(&prompt).await?;

        bb.remove_all_of_type::<ValidationFailure>();
        bb.add(extracted.next_attempt(files, summary));
        Ok(())
    }

    async fn do_answer_question(&self, bb: &mut Blackboard) -> Result<()> {
        let input = bb
            .first_of_type::<UserInput>()
            .expect("answerQuestion eligible implies UserInput present");

        let vars = HashMap::from([
            ("user_message".to_string(), input.message.clone()),
            ("conversation_history".to_string(), render_history(&input.history)),
        ]);
        let prompt = self.prompts.render("conversational_answer", &vars)?;

        let messages = vec![hestia_llm::Message::user(&prompt)];
        let executor = ToolRegistryExecutor::new(Arc::clone(&self.tools));
        let mut options = GatewayOptions::conversational(self.config.classification_llm.clone())
            .with_tools(self.tools.to_llm_tools());
        options.temperature = self.config.conversation_temperature;
        let response = self.gateway.invoke(messages, &options, Some(&executor)).await?;

        bb.add(ConversationalAnswer {
            answer: response.content,
        });
        Ok(())
    }

    /// Shared structured-extraction call for any action that asks the LLM
    /// for `{files, summary}` (generation and fix both shape this way).
    async fn request_code(&self, prompt: &str) -> Result<(Vec<FileProposal>, String)> {
        #[derive(Deserialize)]
        struct RawCode {
            files: Vec<RawFile>,
            summary: String,
        }

        let messages = vec![hestia_llm::Message::user(prompt)];
        let mut options = GatewayOptions::generation(self.config.generation_llm.clone())
            .with_structured_target(StructuredTarget::Json);
        options.temperature = self.config.generation_temperature;
        let raw: RawCode = self.gateway.invoke_structured(messages, &options, None).await?;

        let files = raw
            .files
            .into_iter()
            .map(RawFile::into_proposal)
            .collect::<Result<Vec<_>>>()?;
        Ok((files, raw.summary))
    }
}

#[derive(Deserialize)]
struct RawFile {
    code: String,
    filename: String,
    kind: String,
}

impl RawFile {
    fn into_proposal(self) -> Result<FileProposal> {
        let kind = match self.kind.as_str() {
            "automation" => CodeKind::Automation,
            "library" => CodeKind::Library,
            other => return Err(Error::Planning(format!("unknown file kind: {other}"))),
        };
        FileProposal::new(self.code, self.filename, kind)
    }
}

fn render_history(history: &[HistoryTurn]) -> String {
    history
        .iter()
        .map(|turn| format!("{:?}: {}", turn.role, turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

fn latest<T>(mut facts: Vec<&T>) -> Option<&T> {
    facts.pop()
}

fn is_automation_request(bb: &Blackboard) -> bool {
    bb.first_of_type::<ParsedIntent>().map(ParsedIntent::is_automation_request).unwrap_or(false)
}

fn is_question_or_chat(bb: &Blackboard) -> bool {
    bb.first_of_type::<ParsedIntent>()
        .map(|intent| !intent.is_automation_request())
        .unwrap_or(false)
}

fn code_is_invalid(bb: &Blackboard) -> bool {
    bb.count_of_type::<ValidationFailure>() > 0
}

fn code_is_valid(bb: &Blackboard, _max_fix_attempts: u32) -> bool {
    latest(bb.all_of_type::<ValidatedCode>()).is_some() && !code_is_invalid(bb)
}

fn can_still_retry(bb: &Blackboard, max_fix_attempts: u32) -> bool {
    latest(bb.all_of_type::<ValidatedCode>())
        .map(|v| v.attempt < max_fix_attempts)
        .unwrap_or(false)
}

fn max_retries_exhausted(bb: &Blackboard, max_fix_attempts: u32) -> bool {
    latest(bb.all_of_type::<ValidatedCode>())
        .map(|v| v.attempt >= max_fix_attempts)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HistoryRole;

    #[test]
    fn test_render_history_empty() {
        assert_eq!(render_history(&[]), "");
    }

    #[test]
    fn test_render_history_formats_turns() {
        let history = vec![HistoryTurn {
            role: HistoryRole::User,
            content: "hi".to_string(),
        }];
        assert!(render_history(&history).contains("hi"));
    }

    #[test]
    fn test_conditions_on_empty_blackboard() {
        let bb = Blackboard::new();
        assert!(!is_automation_request(&bb));
        assert!(!is_question_or_chat(&bb));
        assert!(!code_is_valid(&bb, 3));
        assert!(!code_is_invalid(&bb));
        assert!(!can_still_retry(&bb, 3));
        assert!(!max_retries_exhausted(&bb, 3));
    }

    #[test]
    fn test_latest_returns_last_inserted() {
        let mut bb = Blackboard::new();
        bb.add(ValidatedCode {
            files: vec![],
            summary: "first".to_string(),
            attempt: 1,
        });
        bb.add(ValidatedCode {
            files: vec![],
            summary: "second".to_string(),
            attempt: 2,
        });
        let found = latest(bb.all_of_type::<ValidatedCode>()).unwrap();
        assert_eq!(found.summary, "second");
    }

    #[test]
    fn test_retry_conditions_respect_attempt_counter() {
        let mut bb = Blackboard::new();
        bb.add(ValidatedCode {
            files: vec![],
            summary: "x".to_string(),
            attempt: 3,
        });
        assert!(max_retries_exhausted(&bb, 3));
        assert!(!can_still_retry(&bb, 3));
    }
}
