//! The conversation controller.
//!
//! Owns the transcript of the active session and orchestrates the
//! backend capabilities: sending a question for translation, executing
//! generated SQL, switching sessions, and probing backend health. All
//! state lives behind an async lock so a UI layer can share one
//! controller across tasks.

use crate::welcome::welcome_message;
use chatbi_core::capability::{
    DatabaseConnection, DatabaseMetadata, ExecutionCapability, ExecutionRequest, HealthCapability,
    SessionHintStore, TranslateRequest, TranslationCapability,
};
use chatbi_core::normalize::normalize_batch;
use chatbi_core::viz::{infer_selection, revalidate, VisualizationSelection};
use chatbi_core::{AccessGate, ChatBiError, Message, Result, Session, SessionRegistry, TabularResult};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Message shown when translation fails.
const TRANSLATION_FAILURE_TEXT: &str =
    "Sorry, something went wrong while processing your request. Please try again later.";

/// Callback invoked with a human-readable description of a transient
/// failure (translation or execution errors that do not block access).
pub type TransientErrorCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Outcome of the most recent backend health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// A probe is in flight.
    Checking,
    /// The backend answered its health endpoint.
    Healthy,
    /// The probe failed.
    Error(String),
}

/// The backend capabilities the controller composes.
///
/// In production every field is the same [`HttpBackend`] behind a
/// different trait, plus the file-backed hint store; tests substitute
/// doubles per capability.
///
/// [`HttpBackend`]: https://docs.rs/chatbi-interaction
#[derive(Clone)]
pub struct ConversationCapabilities {
    pub registry: Arc<dyn SessionRegistry>,
    pub translator: Arc<dyn TranslationCapability>,
    pub executor: Arc<dyn ExecutionCapability>,
    pub metadata: Arc<dyn DatabaseMetadata>,
    pub health: Arc<dyn HealthCapability>,
    pub hints: Arc<dyn SessionHintStore>,
}

struct ControllerState {
    active_session_id: Option<String>,
    transcript: Vec<Message>,
    sending: bool,
    /// Number of SQL executions in flight.
    executing: u32,
    health: HealthStatus,
    selected_connection_id: Option<String>,
    /// True when no backend session backs the transcript (full startup
    /// fallback). The transcript then holds only the local greeting.
    ephemeral: bool,
}

/// Orchestrates one conversation against the ChatBI backend.
pub struct ConversationController {
    caps: ConversationCapabilities,
    gate: AccessGate,
    state: Arc<RwLock<ControllerState>>,
    on_transient_error: Arc<RwLock<Option<TransientErrorCallback>>>,
}

impl ConversationController {
    pub fn new(caps: ConversationCapabilities, gate: AccessGate) -> Self {
        Self {
            caps,
            gate,
            state: Arc::new(RwLock::new(ControllerState {
                active_session_id: None,
                transcript: Vec::new(),
                sending: false,
                executing: 0,
                health: HealthStatus::Checking,
                selected_connection_id: None,
                ephemeral: false,
            })),
            on_transient_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Registers a callback for transient failures (toast-style
    /// notifications). Replaces any previous callback.
    pub async fn set_on_transient_error(&self, callback: TransientErrorCallback) {
        *self.on_transient_error.write().await = Some(callback);
    }

    async fn notify_transient(&self, message: String) {
        tracing::warn!(target: "conversation", "{message}");
        if let Some(callback) = self.on_transient_error.read().await.as_ref() {
            callback(message);
        }
    }

    /// The access gate shared with the backend.
    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    // --- startup ---

    /// Brings the controller to a usable state.
    ///
    /// Resolution order: the remembered session hint, then the most
    /// recently updated session, then a freshly created session. When
    /// every step fails the controller enters an ephemeral state whose
    /// transcript holds only the local greeting, so the UI always has
    /// something to render.
    pub async fn initialize(&self) {
        self.select_default_connection().await;

        if let Some(hinted) = self.caps.hints.get_remembered_session().await {
            match self.caps.registry.list_sessions().await {
                Ok(sessions) if sessions.iter().any(|s| s.id == hinted) => {
                    if self.select_session(&hinted).await.is_ok() {
                        return;
                    }
                }
                Ok(_) => {
                    tracing::info!(
                        target: "conversation",
                        session_id = %hinted,
                        "remembered session no longer exists"
                    );
                }
                Err(e) => {
                    tracing::warn!(target: "conversation", "failed to resolve remembered session: {e}");
                }
            }
        }

        match self.caps.registry.list_sessions().await {
            Ok(sessions) => {
                if let Some(most_recent) = sessions.first() {
                    if self.select_session(&most_recent.id).await.is_ok() {
                        return;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(target: "conversation", "failed to list sessions: {e}");
            }
        }

        match self.new_session().await {
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(target: "conversation", "failed to create startup session: {e}");
                let greeting = welcome_message(&self.known_table_names().await);
                let mut state = self.state.write().await;
                state.active_session_id = None;
                state.transcript = vec![greeting];
                state.ephemeral = true;
            }
        }
    }

    /// Picks the first active database connection, or the first listed.
    async fn select_default_connection(&self) {
        match self.caps.metadata.list_connections().await {
            Ok(connections) => {
                let chosen = connections
                    .iter()
                    .find(|c| c.is_active)
                    .or_else(|| connections.first())
                    .map(|c| c.id.clone());
                self.state.write().await.selected_connection_id = chosen;
            }
            Err(e) => {
                tracing::warn!(target: "conversation", "failed to list database connections: {e}");
            }
        }
    }

    /// Table names for the selected connection, used for welcome
    /// suggestions. Best effort: failures yield an empty list.
    async fn known_table_names(&self) -> Vec<String> {
        let connection_id = self.state.read().await.selected_connection_id.clone();
        let Some(connection_id) = connection_id else {
            return Vec::new();
        };
        match self.caps.metadata.list_tables(&connection_id).await {
            Ok(tables) => tables.into_iter().map(|t| t.table_name).collect(),
            Err(e) => {
                tracing::debug!(target: "conversation", "failed to list tables: {e}");
                Vec::new()
            }
        }
    }

    // --- sending ---

    /// Sends a user question for translation.
    ///
    /// Appends the user message optimistically, calls the translation
    /// capability, and appends the assistant reply with its diagnostic
    /// bundle. When the reply carries SQL, execution starts in the
    /// background against the reply's message id. Returns the id of the
    /// appended assistant message.
    ///
    /// # Errors
    ///
    /// Rejects blank input and overlapping sends with a validation
    /// error. Translation failures are surfaced after a failure reply
    /// has been appended to the transcript.
    pub async fn send_user_message(self: &Arc<Self>, text: &str) -> Result<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChatBiError::validation("message text is empty"));
        }

        let (session_id, connection_id) = {
            let mut state = self.state.write().await;
            if state.sending {
                return Err(ChatBiError::validation("a message is already being sent"));
            }
            state.sending = true;
            state.transcript.push(Message::user(trimmed));
            (
                state.active_session_id.clone(),
                state.selected_connection_id.clone(),
            )
        };

        let request = TranslateRequest {
            text: trimmed.to_string(),
            session_id,
            database_connection_id: connection_id,
        };

        match self.caps.translator.translate(&request).await {
            Ok(response) => {
                let mut reply = Message::assistant(response.response_text.clone());
                reply.semantic_sql = response.semantic_sql.clone();
                reply.sql_query = response.sql_query.clone();
                let debug = reply.debug_info_mut();
                debug.request = serde_json::to_value(&request).ok();
                debug.response = serde_json::to_value(&response).ok();
                debug.model_debug = response.model_debug.clone();
                let reply_id = reply.id.clone();

                {
                    let mut state = self.state.write().await;
                    state.transcript.push(reply);
                    state.sending = false;
                }

                if let Some(sql) = response.sql_query {
                    let controller = Arc::clone(self);
                    let target_id = reply_id.clone();
                    tokio::spawn(async move {
                        let _ = controller.execute_query(&sql, &target_id).await;
                    });
                }

                Ok(reply_id)
            }
            Err(e) => {
                {
                    let mut state = self.state.write().await;
                    state.transcript.push(Message::assistant(TRANSLATION_FAILURE_TEXT));
                    state.sending = false;
                }
                self.notify_transient(format!("Failed to send message: {e}")).await;
                Err(e)
            }
        }
    }

    // --- execution ---

    /// Runs SQL and attaches the result to the transcript message with
    /// the given id.
    ///
    /// Overlapping executions are allowed; whichever completes last
    /// determines the attached result. A result whose target message is
    /// no longer in the transcript (the user switched sessions) is
    /// dropped with a warning rather than attached to the wrong turn.
    pub async fn execute_query(&self, sql: &str, target_message_id: &str) -> Result<TabularResult> {
        let (session_id, connection_id) = {
            let mut state = self.state.write().await;
            state.executing += 1;
            (
                state.active_session_id.clone(),
                state.selected_connection_id.clone(),
            )
        };

        let request = ExecutionRequest {
            sql: sql.to_string(),
            session_id,
            database_connection_id: connection_id,
        };

        let outcome = self.caps.executor.execute(&request).await;

        let mut state = self.state.write().await;
        state.executing = state.executing.saturating_sub(1);
        match outcome {
            Ok(result) => {
                match state
                    .transcript
                    .iter_mut()
                    .find(|m| m.id == target_message_id)
                {
                    Some(message) => {
                        message.execution_result = Some(result.clone());
                        message.debug_info_mut().sql_execution =
                            serde_json::to_value(&result).ok();
                    }
                    None => {
                        tracing::warn!(
                            target: "conversation",
                            message_id = %target_message_id,
                            "dropping execution result for a message no longer in the transcript"
                        );
                    }
                }
                Ok(result)
            }
            Err(e) => {
                drop(state);
                self.notify_transient(format!("SQL execution failed: {e}")).await;
                Err(e)
            }
        }
    }

    // --- session management ---

    /// Creates a backend session and makes it active.
    pub async fn new_session(&self) -> Result<Session> {
        let session = self.caps.registry.create_session(Some("New conversation")).await?;
        let greeting = welcome_message(&self.known_table_names().await);
        {
            let mut state = self.state.write().await;
            state.active_session_id = Some(session.id.clone());
            state.transcript = vec![greeting];
            state.ephemeral = false;
        }
        self.remember(&session.id).await;
        Ok(session)
    }

    /// Loads a session's transcript and makes it active.
    ///
    /// Persisted records are normalized into messages; records that
    /// arrived without an id get a fresh one so the UI can key on it.
    /// The transcript is prefixed with a locally synthesized greeting.
    pub async fn select_session(&self, session_id: &str) -> Result<()> {
        let records = self.caps.registry.session_messages(session_id).await?;
        let mut messages = normalize_batch(&records);
        for message in &mut messages {
            if message.id.is_empty() {
                message.id = uuid::Uuid::new_v4().to_string();
            }
        }

        let mut transcript = vec![welcome_message(&self.known_table_names().await)];
        transcript.extend(messages);

        {
            let mut state = self.state.write().await;
            state.active_session_id = Some(session_id.to_string());
            state.transcript = transcript;
            state.ephemeral = false;
        }
        self.remember(session_id).await;
        Ok(())
    }

    async fn remember(&self, session_id: &str) {
        if let Err(e) = self.caps.hints.set_remembered_session(session_id).await {
            tracing::warn!(target: "conversation", "failed to remember session: {e}");
        }
    }

    /// Lists sessions from the backend, most recently updated first.
    pub async fn list_sessions(&self) -> Result<Vec<Session>> {
        self.caps.registry.list_sessions().await
    }

    /// Renames a session.
    pub async fn rename_session(&self, session_id: &str, title: &str) -> Result<Session> {
        self.caps.registry.rename_session(session_id, title).await
    }

    /// Deletes a session. Deleting the active session replaces it with
    /// a fresh one so the controller never points at a dead session.
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.caps.registry.delete_session(session_id).await?;

        let was_active = self.state.read().await.active_session_id.as_deref() == Some(session_id);
        if was_active {
            if let Err(e) = self.caps.hints.clear_remembered_session().await {
                tracing::warn!(target: "conversation", "failed to clear session hint: {e}");
            }
            self.replace_active_session().await;
        }
        Ok(())
    }

    /// Discards the active conversation and starts a fresh one.
    pub async fn clear_conversation(&self) {
        let active = self.state.read().await.active_session_id.clone();
        if let Some(session_id) = active {
            if let Err(e) = self.caps.registry.delete_session(&session_id).await {
                tracing::warn!(target: "conversation", "failed to delete session: {e}");
            }
        }
        self.replace_active_session().await;
    }

    /// Creates a replacement session, falling back to the ephemeral
    /// greeting-only state when the backend refuses.
    async fn replace_active_session(&self) {
        if let Err(e) = self.new_session().await {
            tracing::warn!(target: "conversation", "failed to create replacement session: {e}");
            let greeting = welcome_message(&self.known_table_names().await);
            let mut state = self.state.write().await;
            state.active_session_id = None;
            state.transcript = vec![greeting];
            state.ephemeral = true;
        }
    }

    // --- health and access ---

    /// Probes backend health and records the outcome.
    pub async fn check_health(&self) -> HealthStatus {
        self.state.write().await.health = HealthStatus::Checking;
        let status = match self.caps.health.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Error(e.to_string()),
        };
        self.state.write().await.health = status.clone();
        status
    }

    /// Reopens the access gate and re-probes the backend. A request
    /// that still fails authorization will re-block the gate.
    pub async fn retry_access(&self) -> HealthStatus {
        self.gate.clear();
        self.check_health().await
    }

    // --- visualization ---

    /// Resolves the visualization selection for a message's result.
    ///
    /// A current selection is revalidated against the (possibly
    /// refreshed) result so valid user choices survive; otherwise a
    /// fresh selection is inferred. `None` when the message has no
    /// non-empty result.
    pub async fn visualization_for(
        &self,
        message_id: &str,
        current: Option<&VisualizationSelection>,
    ) -> Option<VisualizationSelection> {
        let state = self.state.read().await;
        let result = state
            .transcript
            .iter()
            .find(|m| m.id == message_id)?
            .execution_result
            .as_ref()?;
        match current {
            Some(selection) => revalidate(selection, result),
            None => infer_selection(result),
        }
    }

    // --- accessors ---

    /// Snapshot of the transcript.
    pub async fn transcript(&self) -> Vec<Message> {
        self.state.read().await.transcript.clone()
    }

    pub async fn active_session_id(&self) -> Option<String> {
        self.state.read().await.active_session_id.clone()
    }

    /// True when a translation round-trip is in flight.
    pub async fn is_sending(&self) -> bool {
        self.state.read().await.sending
    }

    /// True when at least one SQL execution is in flight.
    pub async fn is_executing(&self) -> bool {
        self.state.read().await.executing > 0
    }

    pub async fn health_status(&self) -> HealthStatus {
        self.state.read().await.health.clone()
    }

    pub async fn selected_connection_id(&self) -> Option<String> {
        self.state.read().await.selected_connection_id.clone()
    }

    /// Switches the target database connection for subsequent turns.
    pub async fn set_selected_connection(&self, connection_id: Option<String>) {
        self.state.write().await.selected_connection_id = connection_id;
    }

    /// Available database connections.
    pub async fn list_connections(&self) -> Result<Vec<DatabaseConnection>> {
        self.caps.metadata.list_connections().await
    }

    /// True when no backend session backs the transcript.
    pub async fn is_ephemeral(&self) -> bool {
        self.state.read().await.ephemeral
    }
}
