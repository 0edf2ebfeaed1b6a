//! Line-delimited JSON protocol between a host agent and the gateway
//!
//! One request object per input line, one response object per output line.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use steering_power::{PowerRegistry, SteeringError};
use thiserror::Error;

/// A request from the host
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    ListPowers,
    Activate { power: String },
    ReadSteering { power: String, steering_file: String },
    Categories { power: String },
    Rules { power: String, category: String },
    Describe { power: String, rule: String },
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    fn success(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    fn failure(err: &ProtocolError) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(ErrorBody {
                kind: err.kind(),
                message: err.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Bad request: {0}")]
    BadRequest(serde_json::Error),

    #[error(transparent)]
    Steering(#[from] SteeringError),

    #[error("Failed to encode result: {0}")]
    Encode(serde_json::Error),
}

impl ProtocolError {
    pub fn kind(&self) -> &'static str {
        match self {
            ProtocolError::BadRequest(_) => "bad_request",
            ProtocolError::Steering(e) => e.kind(),
            ProtocolError::Encode(_) => "internal",
        }
    }
}

#[derive(Debug, Serialize)]
struct PowerInfo<'a> {
    name: &'a str,
    display_name: &'a str,
    description: &'a str,
    rules: usize,
    integrity_warnings: usize,
}

/// Handle one raw input line
pub fn handle_line(registry: &PowerRegistry, line: &str) -> Response {
    let outcome = serde_json::from_str::<Request>(line)
        .map_err(ProtocolError::BadRequest)
        .and_then(|request| dispatch(registry, &request));

    match outcome {
        Ok(result) => Response::success(result),
        Err(e) => Response::failure(&e),
    }
}

/// Execute a parsed request against the registry
pub fn dispatch(registry: &PowerRegistry, request: &Request) -> Result<Value, ProtocolError> {
    let encode = |value: Result<Value, serde_json::Error>| value.map_err(ProtocolError::Encode);

    match request {
        Request::ListPowers => {
            let powers: Vec<PowerInfo<'_>> = registry
                .powers()
                .into_iter()
                .map(|power| PowerInfo {
                    name: power.name(),
                    display_name: power.manifest().title(),
                    description: &power.manifest().description,
                    rules: power.catalog().len(),
                    integrity_warnings: power.integrity().warnings.len(),
                })
                .collect();
            encode(serde_json::to_value(powers))
        }
        Request::Activate { power } => encode(serde_json::to_value(registry.activate(power)?)),
        Request::ReadSteering {
            power,
            steering_file,
        } => {
            let text = registry.read_steering(power, steering_file)?;
            Ok(Value::String(text.to_string()))
        }
        Request::Categories { power } => {
            let categories = registry.power(power)?.catalog().categories_by_priority();
            encode(serde_json::to_value(categories))
        }
        Request::Rules { power, category } => {
            let rules = registry.power(power)?.rules(category)?;
            encode(serde_json::to_value(rules))
        }
        Request::Describe { power, rule } => {
            let descriptor = registry.power(power)?.describe(rule)?;
            encode(serde_json::to_value(descriptor))
        }
    }
}
