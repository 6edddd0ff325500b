use derive_more::{Display, Error};
use log::error;
use ntex::{http, web};
use serde_json::json;

#[derive(Debug, Display, Error)]
pub enum UserError {
    UrlNotFound,
    Unauthorized,
    InvalidPayload(#[error(not(source))] String),
}

impl web::error::WebResponseError for UserError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        error!("{:#?}", self);

        let msg_details = match self {
            UserError::UrlNotFound => "resource not found".to_string(),
            UserError::Unauthorized => "unauthorized".to_string(),
            UserError::InvalidPayload(msg) => format!("invalid webhook payload: {msg}"),
        };

        web::HttpResponse::build(self.status_code()).json(&json!({ "error": msg_details }))
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            UserError::UrlNotFound => http::StatusCode::NOT_FOUND,
            UserError::Unauthorized => http::StatusCode::UNAUTHORIZED,
            UserError::InvalidPayload(_) => http::StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Display, Error)]
pub enum ServerError {
    MissingConfiguration(#[error(not(source))] String),
}

impl ServerError {
    fn get_error_message(&self) -> String {
        match self {
            ServerError::MissingConfiguration(msg) => format!("[MissingConfiguration] {msg}"),
        }
    }
}

impl web::error::WebResponseError for ServerError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        error!("{}", self.get_error_message());

        web::HttpResponse::build(self.status_code())
            .json(&json!({ "error": "internal server error" }))
    }

    fn status_code(&self) -> http::StatusCode {
        http::StatusCode::INTERNAL_SERVER_ERROR
    }
}
