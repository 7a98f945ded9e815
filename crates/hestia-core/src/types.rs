//! Blackboard fact types for one planning session.
//!
//! One distinct type per pipeline stage, by design: the planner selects
//! actions by which fact types are present on the blackboard, not by
//! inspecting action names or a shared mutable "state" struct. See
//! [`crate::planner`] for how these are threaded through the action graph.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single turn of prior conversation, supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryTurn {
    /// Who said it.
    pub role: HistoryRole,
    /// What they said; must be non-empty.
    pub content: String,
}

/// Speaker of a [`HistoryTurn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    /// The end user.
    User,
    /// The assistant.
    Assistant,
}

/// The message that seeds a planning session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInput {
    /// The user's message; must be non-empty.
    pub message: String,
    /// Prior turns, oldest first.
    pub history: Vec<HistoryTurn>,
}

impl UserInput {
    /// Build a `UserInput`, rejecting an empty message.
    pub fn new(message: impl Into<String>, history: Vec<HistoryTurn>) -> Result<Self> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(Error::Planning("user message must not be empty".to_string()));
        }
        Ok(Self { message, history })
    }
}

/// What kind of request the user made, as classified by `parseIntent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    /// The user wants an automation written.
    AutomationRequest,
    /// The user is asking a question about the smart-home.
    Question,
    /// General chat, no automation or question intent.
    Chat,
    /// Could not be classified.
    Unknown,
}

/// Output of `parseIntent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedIntent {
    /// The classified intent.
    #[serde(rename = "type")]
    pub intent_type: IntentType,
    /// Free-text restatement of what the user wants.
    pub description: String,
    /// Classifier confidence, clamped to `[0, 1]`.
    pub confidence: f32,
    /// Named entities extracted from the message.
    #[serde(default)]
    pub entities: std::collections::HashMap<String, String>,
}

impl ParsedIntent {
    /// Whether this intent should follow the automation-generation branch.
    #[must_use]
    pub fn is_automation_request(&self) -> bool {
        self.intent_type == IntentType::AutomationRequest
    }
}

/// Output of `extractRequirements`, only produced for automation requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationRequirements {
    /// Restated description of the automation.
    pub description: String,
    /// Trigger conditions in natural language.
    pub triggers: Vec<String>,
    /// Actions to take; must be non-empty.
    pub actions: Vec<String>,
    /// Additional guard conditions.
    #[serde(default)]
    pub conditions: Option<Vec<String>>,
    /// Proposed automation file name.
    pub suggested_name: String,
    /// Whether this automation runs on a schedule rather than a trigger.
    pub needs_schedule: bool,
    /// Cron-like schedule expression, if `needs_schedule`.
    #[serde(default)]
    pub schedule: Option<String>,
    /// Global-state keys this automation writes, if any.
    #[serde(default)]
    pub global_state_writes: Option<Vec<String>>,
}

impl AutomationRequirements {
    /// Validate the `triggers non-empty OR needs_schedule` invariant.
    pub fn validate(self) -> Result<Self> {
        if self.actions.is_empty() {
            return Err(Error::Planning(
                "automation requirements must include at least one action".to_string(),
            ));
        }
        if self.triggers.is_empty() && !self.needs_schedule {
            return Err(Error::Planning(
                "automation requirements need a trigger or a schedule".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Output of `gatherContext`: everything fetched to inform code generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatheredContext {
    /// Every topic known to the engine.
    pub available_topics: Vec<String>,
    /// Topics filtered to ones matching the requirements' triggers.
    pub relevant_topics: Vec<String>,
    /// Semantically similar previously written code.
    pub similar_code: Vec<hestia_tools::CodeSearchResult>,
    /// Library modules available for reuse.
    pub available_libraries: Vec<hestia_tools::LibraryModule>,
}

/// A file the assistant proposes to deploy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProposal {
    /// File contents; must be non-empty.
    pub code: String,
    /// File name; must be non-empty.
    pub filename: String,
    /// Whether this is a standalone automation or a shared library module.
    pub kind: hestia_tools::CodeKind,
}

impl FileProposal {
    /// Build a proposal, rejecting empty code or filename.
    pub fn new(code: impl Into<String>, filename: impl Into<String>, kind: hestia_tools::CodeKind) -> Result<Self> {
        let code = code.into();
        let filename = filename.into();
        if code.trim().is_empty() {
            return Err(Error::Planning("generated file has empty code".to_string()));
        }
        if filename.trim().is_empty() {
            return Err(Error::Planning("generated file has empty filename".to_string()));
        }
        Ok(Self { code, filename, kind })
    }
}

/// Output of `generateCode`: the LLM's first draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedCode {
    /// Proposed files; must be non-empty.
    pub files: Vec<FileProposal>,
    /// Human-readable summary of what was generated.
    pub summary: String,
    /// Which validate/fix attempt produced this (starts at 1).
    pub attempt: u32,
}

impl GeneratedCode {
    /// Build generated code, rejecting an empty file list.
    pub fn new(files: Vec<FileProposal>, summary: impl Into<String>, attempt: u32) -> Result<Self> {
        if files.is_empty() {
            return Err(Error::Planning("generated code has no files".to_string()));
        }
        Ok(Self {
            files,
            summary: summary.into(),
            attempt,
        })
    }
}

/// Output of `extractToLibrary`. Only constructible from [`GeneratedCode`]:
/// this ordering is the mechanism that keeps the planner from validating
/// code that was never offered an extraction pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedCode {
    /// Files after any library extraction.
    pub files: Vec<FileProposal>,
    /// Summary, possibly rewritten to mention the extracted module.
    pub summary: String,
    /// Attempt counter carried over from the source `GeneratedCode`.
    pub attempt: u32,
    /// Whether the LLM actually extracted a library module.
    pub extraction_performed: bool,
    /// What was extracted, if anything.
    pub extraction_summary: Option<String>,
}

impl ExtractedCode {
    /// Wrap a `GeneratedCode` unchanged, marking extraction as skipped.
    #[must_use]
    pub fn unchanged(source: GeneratedCode) -> Self {
        Self {
            files: source.files,
            summary: source.summary,
            attempt: source.attempt,
            extraction_performed: false,
            extraction_summary: None,
        }
    }

    /// Wrap a `GeneratedCode` with the library extraction actually performed.
    #[must_use]
    pub fn extracted(source_attempt: u32, files: Vec<FileProposal>, summary: String, extraction_summary: String) -> Self {
        Self {
            files,
            summary,
            attempt: source_attempt,
            extraction_performed: true,
            extraction_summary: Some(extraction_summary),
        }
    }

    /// Build the next-attempt `ExtractedCode` produced by `fixInvalidCode`.
    #[must_use]
    pub fn next_attempt(mut self, files: Vec<FileProposal>, summary: String) -> Self {
        self.files = files;
        self.summary = summary;
        self.attempt += 1;
        self
    }
}

/// Output of `validateCode`. Only constructible from [`ExtractedCode`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedCode {
    /// Files as validated (identical to the `ExtractedCode` they came from).
    pub files: Vec<FileProposal>,
    /// Summary carried over.
    pub summary: String,
    /// Which attempt this is.
    pub attempt: u32,
}

impl ValidatedCode {
    /// Construct from the `ExtractedCode` that was validated.
    #[must_use]
    pub fn from_extracted(source: &ExtractedCode) -> Self {
        Self {
            files: source.files.clone(),
            summary: source.summary.clone(),
            attempt: source.attempt,
        }
    }
}

/// One file's validation errors for the current attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// The file that failed.
    pub file: FileProposal,
    /// Non-empty list of error messages.
    pub errors: Vec<String>,
}

/// Output of `answerQuestion`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationalAnswer {
    /// Non-empty answer text.
    pub answer: String,
}

/// A deployable code proposal, as surfaced in a [`FinalResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeProposal {
    /// Summary of what's being proposed.
    pub summary: String,
    /// The files to deploy.
    pub files: Vec<FileProposal>,
}

/// The terminal output of a planning session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalResponse {
    /// User-facing message; always non-empty.
    pub message: String,
    /// Present only on a successful automation proposal.
    #[serde(default)]
    pub code_proposal: Option<CodeProposal>,
}

impl FinalResponse {
    /// A conversational or failure response carrying no code proposal.
    #[must_use]
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code_proposal: None,
        }
    }

    /// A successful automation proposal.
    #[must_use]
    pub fn with_proposal(message: impl Into<String>, proposal: CodeProposal) -> Self {
        Self {
            message: message.into(),
            code_proposal: Some(proposal),
        }
    }
}
