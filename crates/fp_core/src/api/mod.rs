pub mod session_json;

pub use session_json::{
    apply_command, handle_command_json, prize_catalog_json, reset_session_json,
    session_command_json, session_pump_json, session_snapshot_json, PrizeCatalogResponse,
    SessionCommand, SessionCommandResponse,
};
