use crate::Error;
use serde::Serialize;
use warp::reply::{Json, Response};
use warp::Reply;

#[derive(Serialize, Debug)]
pub struct ErrorResponse<'a> {
    pub error: &'a Error,
}

impl ErrorResponse<'_> {
    pub fn from(error: &Error) -> ErrorResponse {
        ErrorResponse { error }
    }

    pub fn into_response(self) -> Response {
        let status_code = self.error.status_code();
        warp::reply::with_status(Json::from(self), status_code).into_response()
    }
}

impl From<ErrorResponse<'_>> for Json {
    fn from(response: ErrorResponse<'_>) -> Json {
        warp::reply::json(&response)
    }
}

#[derive(Serialize, Debug)]
pub struct RootResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
    pub bot_ready: bool,
}

#[derive(Serialize, Debug)]
pub struct CommandResponse {
    pub message: String,
}
