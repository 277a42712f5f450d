use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use room_planner_core::Plan;

const TRANSFER_DOMAIN: &str = "plan";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded plan payload.
pub(crate) const TRANSFER_HEADER: &str = "plan:v1";
/// Delimiter used to separate the prefix and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes the plan into a single-line string suitable for clipboard transfer.
pub(crate) fn encode(plan: &Plan) -> Result<String, PlanTransferError> {
    let json = serde_json::to_vec(plan).map_err(PlanTransferError::InvalidPayload)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!("{TRANSFER_HEADER}{FIELD_DELIMITER}{encoded}"))
}

/// Decodes a plan from its transfer string representation.
pub(crate) fn decode(value: &str) -> Result<Plan, PlanTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlanTransferError::EmptyPayload);
    }

    let (domain, rest) = trimmed
        .split_once(FIELD_DELIMITER)
        .ok_or(PlanTransferError::MissingVersion)?;
    let (version, payload) = rest
        .split_once(FIELD_DELIMITER)
        .ok_or(PlanTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(PlanTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(PlanTransferError::UnsupportedVersion(version.to_owned()));
    }

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(PlanTransferError::InvalidEncoding)?;
    serde_json::from_slice(&bytes).map_err(PlanTransferError::InvalidPayload)
}

/// Errors that can occur while encoding or decoding plan transfer strings.
#[derive(Debug)]
pub(crate) enum PlanTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The encoded plan did not contain a version segment.
    MissingVersion,
    /// The encoded plan did not include the payload segment.
    MissingPayload,
    /// The encoded plan used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded plan used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for PlanTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "transfer string was empty"),
            Self::MissingVersion => write!(f, "plan string is missing the version"),
            Self::MissingPayload => write!(f, "plan string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "plan prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "plan version '{version}' is not supported")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode plan payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not process plan payload: {error}")
            }
        }
    }
}

impl Error for PlanTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}
