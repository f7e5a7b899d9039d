// Session JSON API Layer
// 호스트 UI 와 세션 컨트롤러를 문자열 JSON 으로 연결

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::config::SessionConfig;
use crate::engine::outcome::{prize_catalog, PrizeEntry};
use crate::engine::random::RandomSource;
use crate::engine::scheduler::Scheduler;
use crate::error::{ApiError, ContractViolation};
use crate::session::{CommandOutcome, LiveSession, SessionController, SessionSnapshot};

// ========== Request/Response Structures ==========

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SessionCommand {
    AddName { name: String },
    AddBulk { text: String },
    RemoveName { name: String },
    Start,
    Reset,
    RemoveWinner,
    /// Deliver due timers without issuing a command
    Pump,
    Snapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCommandResponse {
    pub success: bool,
    pub outcome: Option<CommandOutcome>,
    /// Transitions applied by the pump that followed the command
    pub transitions: usize,
    pub snapshot: Option<SessionSnapshot>,
    pub error: Option<String>,
}

impl SessionCommandResponse {
    fn failure(error: ApiError, snapshot: Option<SessionSnapshot>) -> Self {
        Self {
            success: false,
            outcome: None,
            transitions: 0,
            snapshot,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrizeCatalogResponse {
    pub success: bool,
    pub prizes: Vec<PrizeEntry>,
}

const SERIALIZATION_FAILED: &str = r#"{"success":false,"error":"Serialization failed"}"#;

// ========== Global State Management ==========

static SESSION: Lazy<Mutex<LiveSession>> =
    Lazy::new(|| Mutex::new(LiveSession::live(SessionConfig::default())));

// ========== Command Dispatch ==========

/// Run one command against `session`, then deliver any due timers.
pub fn apply_command<R: RandomSource, S: Scheduler>(
    session: &mut SessionController<R, S>,
    command: &SessionCommand,
) -> Result<(CommandOutcome, usize), ContractViolation> {
    let outcome = match command {
        SessionCommand::AddName { name } => session.add_name(name),
        SessionCommand::AddBulk { text } => session.add_bulk(text),
        SessionCommand::RemoveName { name } => session.remove_name(name),
        SessionCommand::Start => session.start()?,
        SessionCommand::Reset => session.reset(),
        SessionCommand::RemoveWinner => session.remove_winner(),
        SessionCommand::Pump | SessionCommand::Snapshot => CommandOutcome::Applied,
    };
    let transitions = session.pump()?;
    Ok((outcome, transitions))
}

/// Parse `request_json`, apply it to `session`, and serialize the response.
pub fn handle_command_json<R: RandomSource, S: Scheduler>(
    session: &mut SessionController<R, S>,
    request_json: &str,
) -> String {
    let response = match serde_json::from_str::<SessionCommand>(request_json) {
        Err(e) => SessionCommandResponse::failure(ApiError::from(e), None),
        Ok(command) => match apply_command(session, &command) {
            Ok((outcome, transitions)) => SessionCommandResponse {
                success: true,
                outcome: Some(outcome),
                transitions,
                snapshot: Some(session.snapshot().clone()),
                error: None,
            },
            Err(err) => {
                SessionCommandResponse::failure(err.into(), Some(session.snapshot().clone()))
            }
        },
    };

    serde_json::to_string(&response).unwrap_or_else(|_| SERIALIZATION_FAILED.to_string())
}

// ========== Public API Functions ==========

/// Command against the process-wide session
pub fn session_command_json(request_json: &str) -> String {
    let mut session = SESSION.lock().expect("SESSION lock poisoned");
    handle_command_json(&mut *session, request_json)
}

/// Current snapshot of the process-wide session, after delivering due timers
pub fn session_snapshot_json() -> String {
    session_command_json(r#"{"command":"snapshot"}"#)
}

/// Deliver due timers on the process-wide session.
pub fn session_pump_json() -> String {
    session_command_json(r#"{"command":"pump"}"#)
}

/// Replace the process-wide session. Empty input uses the default config.
pub fn reset_session_json(config_json: &str) -> String {
    let config = if config_json.trim().is_empty() {
        Ok(SessionConfig::default())
    } else {
        SessionConfig::from_json(config_json)
    };

    let response = match config {
        Ok(config) => {
            let mut session = SESSION.lock().expect("SESSION lock poisoned");
            *session = LiveSession::live(config);
            log::info!("session replaced");
            SessionCommandResponse {
                success: true,
                outcome: Some(CommandOutcome::Applied),
                transitions: 0,
                snapshot: Some(session.snapshot().clone()),
                error: None,
            }
        }
        Err(e) => SessionCommandResponse::failure(e.into(), None),
    };

    serde_json::to_string(&response).unwrap_or_else(|_| SERIALIZATION_FAILED.to_string())
}

pub fn prize_catalog_json() -> String {
    let response = PrizeCatalogResponse { success: true, prizes: prize_catalog() };
    serde_json::to_string(&response).unwrap_or_else(|_| SERIALIZATION_FAILED.to_string())
}
