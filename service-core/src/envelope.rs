//! Uniform JSON envelope returned by every endpoint.
//!
//! Success bodies look like `{"success":true,"data":...}` and failures like
//! `{"success":false,"message":"..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{DeserializeOwned, Error as _},
    ser::SerializeStruct,
};

/// Response body: either a payload or a human-readable failure message.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success(T),
    Failure(String),
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    /// Payload of a successful envelope.
    pub fn data(&self) -> Option<&T> {
        match self {
            Envelope::Success(data) => Some(data),
            Envelope::Failure(_) => None,
        }
    }

    /// Message of a failed envelope.
    pub fn message(&self) -> Option<&str> {
        match self {
            Envelope::Success(_) => None,
            Envelope::Failure(message) => Some(message),
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut body = serializer.serialize_struct("Envelope", 2)?;
        match self {
            Envelope::Success(data) => {
                body.serialize_field("success", &true)?;
                body.serialize_field("data", data)?;
            }
            Envelope::Failure(message) => {
                body.serialize_field("success", &false)?;
                body.serialize_field("message", message)?;
            }
        }
        body.end()
    }
}

#[derive(Deserialize)]
struct WireEnvelope<T> {
    success: bool,
    message: Option<String>,
    data: Option<T>,
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Envelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireEnvelope::<T>::deserialize(deserializer)?;
        if wire.success {
            wire.data
                .map(Envelope::Success)
                .ok_or_else(|| D::Error::missing_field("data"))
        } else {
            Ok(Envelope::Failure(wire.message.unwrap_or_default()))
        }
    }
}

/// An envelope paired with the HTTP status it is sent with.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    envelope: Envelope<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            envelope: Envelope::Success(data),
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            envelope: Envelope::Success(data),
        }
    }

    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            envelope: Envelope::Failure(message.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}
