#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    BadRequest,
    InternalServerError,
    // Auth
    Unauthenticated,
    Unauthorized,
    // Argument preparation
    ArgumentError,
    NotFound,
    ValidationError,
    // Raised by user resolution logic
    ResolverError,
}

impl ErrorCode {
    /// Whether the error message can be shown as is to the client. Internal errors are
    /// replaced by a generic message.
    pub fn is_client_facing(self) -> bool {
        !matches!(self, ErrorCode::InternalServerError)
    }
}
