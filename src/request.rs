//! JSON request/response boundary around [`Calculator::calculate`].
//!
//! A request body is `{"data": "<expression>"}` and the response is
//! `{"result": "<string>"}`. Bodies that cannot be parsed produce the same
//! `ERROR` result as an invalid expression.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculator::{Calculator, ERROR};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CalcRequest {
    /// The expression to evaluate.
    pub data: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CalcResponse {
    pub result: String,
}

impl CalcResponse {
    pub fn error() -> Self {
        Self {
            result: ERROR.to_string(),
        }
    }
}

/// Answer a parsed request.
pub fn respond(calculator: &Calculator, request: &CalcRequest) -> CalcResponse {
    CalcResponse {
        result: calculator.calculate(&request.data),
    }
}

/// Parse a JSON request body, evaluate it and serialize the response.
pub fn handle_request(calculator: &Calculator, body: &str) -> String {
    let response = match serde_json::from_str::<CalcRequest>(body) {
        Ok(request) => respond(calculator, &request),
        Err(e) => {
            debug!(error = %e, "malformed request body");
            CalcResponse::error()
        }
    };

    serde_json::to_string(&response).unwrap_or_else(|e| {
        warn!(error = %e, "failed to serialize response");
        format!(r#"{{"result":"{ERROR}"}}"#)
    })
}
