//! Per-session analysis state and chat history

use crate::error::{AssistantError, Result};
use crate::processing::AnalysisOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    You,
    Assistant,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::You => write!(f, "You"),
            Speaker::Assistant => write!(f, "Assistant"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub message: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub analysis: Option<AnalysisOutcome>,
    pub chat_history: Vec<ChatTurn>,
}

impl Session {
    fn new(id: SessionId) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            analysis: None,
            chat_history: Vec::new(),
        }
    }

    /// Active analysis, or `NoAnalysis` when none has completed yet
    pub fn require_analysis(&self) -> Result<&AnalysisOutcome> {
        self.analysis
            .as_ref()
            .ok_or_else(|| AssistantError::NoAnalysis(self.id.to_string()))
    }

    /// Append one question and its answer
    pub fn record_exchange(&mut self, question: &str, answer: &str) {
        let at = Utc::now();
        self.chat_history.push(ChatTurn {
            speaker: Speaker::You,
            message: question.to_string(),
            at,
        });
        self.chat_history.push(ChatTurn {
            speaker: Speaker::Assistant,
            message: answer.to_string(),
            at,
        });
    }
}

/// Sessions for the lifetime of the process
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<SessionId, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> SessionId {
        let id = SessionId::new();
        self.sessions.insert(id, Session::new(id));
        id
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    /// Store a successful analysis, replacing any previous one. The chat
    /// history is kept. An unknown id starts a new session under that id.
    pub fn record_analysis(&mut self, id: SessionId, outcome: AnalysisOutcome) -> &Session {
        let session = self
            .sessions
            .entry(id)
            .or_insert_with(|| Session::new(id));
        session.analysis = Some(outcome);
        session
    }

    /// Analysis a chat question would be answered against
    pub fn analysis_for(&self, id: &SessionId) -> Result<&AnalysisOutcome> {
        match self.sessions.get(id) {
            Some(session) => session.require_analysis(),
            None => Err(AssistantError::NoAnalysis(id.to_string())),
        }
    }

    pub fn record_exchange(&mut self, id: &SessionId, question: &str, answer: &str) -> Result<()> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| AssistantError::NoAnalysis(id.to_string()))?;
        session.require_analysis()?;
        session.record_exchange(question, answer);
        Ok(())
    }

    pub fn history(&self, id: &SessionId) -> &[ChatTurn] {
        self.sessions
            .get(id)
            .map(|s| s.chat_history.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
