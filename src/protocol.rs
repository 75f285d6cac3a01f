//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::dashboard::DashboardStats;
use crate::domain::Answer;
use crate::session::{AnswerOutcome, QuizSnapshot};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    /// Current quiz state.
    Quiz,
    Answer {
        status: Answer,
        #[serde(default, rename = "wordId")]
        word_id: Option<String>,
    },
    Reset,
    Dashboard,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Quiz {
        quiz: QuizSnapshot,
    },
    Answered {
        outcome: AnswerOutcome,
        quiz: QuizSnapshot,
    },
    Dashboard {
        stats: DashboardStats,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    pub status: Answer,
    /// When set, the answer only applies if this is still the current word.
    #[serde(default, rename = "wordId")]
    pub word_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnswerOut {
    pub outcome: AnswerOutcome,
    pub quiz: QuizSnapshot,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub storage: &'static str,
}
