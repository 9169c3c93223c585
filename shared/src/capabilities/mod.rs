//! Effects the core asks the shell to perform.
//!
//! We use Crux's built-in Render and Http capabilities directly; the
//! multipart encoding and response classification live in [`http`] so they
//! stay testable without a shell.

mod http;

pub use self::http::{
    server_message, HttpError, MultipartForm, Part, SubmitOutcome, ValidatedUrl,
    MAX_REQUEST_BODY_SIZE, MAX_URL_LENGTH,
};

pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub render: Render<Event>,
}
