#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod capabilities;
pub mod catalog;
pub mod config;
pub mod event;
pub mod i18n;
pub mod mapper;
pub mod model;
pub mod submission;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use catalog::Catalog;
pub use config::AppConfig;
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use i18n::Notice;
pub use mapper::ValueMapper;
pub use model::{AdForm, Field, Language, Model, PickedImage, TextField};

use crate::capabilities::HttpError;
use crate::config::ConfigError;
use crate::model::ValidationError;
use crate::submission::SubmissionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Timeout,
    Authentication,
    Authorization,
    Validation,
    PayloadTooLarge,
    RateLimited,
    Server,
    PermissionDenied,
    InvalidConfig,
    Internal,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Authentication => "AUTH_ERROR",
            Self::Authorization => "FORBIDDEN",
            Self::Validation => "VALIDATION_ERROR",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::RateLimited => "RATE_LIMITED",
            Self::Server => "SERVER_ERROR",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::InvalidConfig => "INVALID_CONFIG",
            Self::Internal => "INTERNAL_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Network | Self::Timeout | Self::RateLimited | Self::Server => {
                ErrorSeverity::Transient
            }

            Self::InvalidConfig | Self::Internal => ErrorSeverity::Fatal,

            Self::Authentication
            | Self::Authorization
            | Self::Validation
            | Self::PayloadTooLarge
            | Self::PermissionDenied
            | Self::Unknown => ErrorSeverity::Permanent,
        }
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Network | Self::Timeout | Self::RateLimited | Self::Server
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable() && !matches!(self.severity, ErrorSeverity::Fatal)
    }

    #[must_use]
    pub fn user_facing_message(&self, language: Language) -> String {
        i18n::error_message(self.kind, language).to_string()
    }

    /// Classifies a non-2xx response from the listings endpoint.
    #[must_use]
    pub fn from_http_status(status: u16, server_message: Option<String>) -> Self {
        let kind = match status {
            400 | 422 => ErrorKind::Validation,
            401 => ErrorKind::Authentication,
            403 => ErrorKind::Authorization,
            404 | 405 => ErrorKind::InvalidConfig,
            408 => ErrorKind::Timeout,
            413 => ErrorKind::PayloadTooLarge,
            429 => ErrorKind::RateLimited,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        };

        let message = server_message.unwrap_or_else(|| format!("HTTP error: {status}"));

        Self::new(kind, message).with_context("http_status", status.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::new(ErrorKind::Validation, e.to_string())
    }
}

impl From<HttpError> for AppError {
    fn from(e: HttpError) -> Self {
        let kind = match &e {
            HttpError::InvalidUrl { .. } => ErrorKind::InvalidConfig,
            HttpError::BodyTooLarge { .. } => ErrorKind::PayloadTooLarge,
            HttpError::SerializationError { .. } => ErrorKind::Internal,
            HttpError::Transport { .. } => ErrorKind::Network,
        };
        AppError::new(kind, e.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::new(ErrorKind::InvalidConfig, e.to_string())
    }
}

impl From<SubmissionError> for AppError {
    fn from(e: SubmissionError) -> Self {
        match e {
            SubmissionError::Validation(e) => e.into(),
            SubmissionError::Http(e) => e.into(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn default_duration_ms(self) -> u64 {
        match self {
            Self::Info => 3000,
            Self::Success => 2000,
            Self::Warning => 4000,
            Self::Error => 5000,
        }
    }
}

/// A toast is stored as a [`Notice`] and rendered in whatever language is
/// active when the view is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastMessage {
    pub notice: Notice,
    pub kind: ToastKind,
    pub duration_ms: u64,
}

impl ToastMessage {
    #[must_use]
    pub fn new(notice: Notice, kind: ToastKind) -> Self {
        Self {
            notice,
            kind,
            duration_ms: kind.default_duration_ms(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserFacingError {
    pub message: String,
    pub is_transient: bool,
    pub is_retryable: bool,
    pub error_code: String,
}

impl UserFacingError {
    fn new(e: &AppError, language: Language) -> Self {
        Self {
            message: e.user_facing_message(language),
            is_transient: e.severity == ErrorSeverity::Transient,
            is_retryable: e.is_retryable(),
            error_code: e.code().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToastView {
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
}

impl ToastView {
    fn new(t: &ToastMessage, language: Language) -> Self {
        Self {
            message: t.notice.text(language),
            kind: t.kind,
            duration_ms: t.duration_ms,
        }
    }
}

/// One categorical row of the form.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldView {
    pub field: Field,
    pub label: String,
    pub display_value: String,
    pub is_enabled: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextFieldView {
    pub field: TextField,
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionView {
    pub label: String,
    pub is_selected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickerView {
    pub field: Field,
    pub title: String,
    pub is_multi_select: bool,
    pub options: Vec<OptionView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageView {
    pub uri: String,
    pub file_name: String,
    pub size_bytes: usize,
}

impl From<&PickedImage> for ImageView {
    fn from(image: &PickedImage) -> Self {
        Self {
            uri: image.uri.clone(),
            file_name: image.file_name.clone(),
            size_bytes: image.size_bytes(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub language: String,
    pub is_rtl: bool,
    pub fields: Vec<FieldView>,
    pub text_fields: Vec<TextFieldView>,
    pub selected_features: Vec<String>,
    pub images: Vec<ImageView>,
    pub max_images: usize,
    pub picker: Option<PickerView>,
    pub is_submitting: bool,
    pub can_submit: bool,
    pub submit_label: String,
    pub toast: Option<ToastView>,
    pub error: Option<UserFacingError>,
}

pub mod app {
    use super::*;
    use std::sync::Arc;

    use secrecy::ExposeSecret;
    use tracing::{debug, info, warn};

    use crate::capabilities::{MultipartForm, SubmitOutcome};
    use crate::submission::ListingSubmission;

    const TEXT_FIELDS: [TextField; 4] = [
        TextField::Price,
        TextField::Year,
        TextField::Kilometer,
        TextField::Description,
    ];

    pub struct App {
        catalog: Arc<Catalog>,
    }

    impl Default for App {
        fn default() -> Self {
            Self::with_catalog(Arc::new(Catalog::builtin().clone()))
        }
    }

    impl App {
        #[must_use]
        pub fn with_catalog(catalog: Arc<Catalog>) -> Self {
            Self { catalog }
        }

        #[must_use]
        pub fn catalog(&self) -> &Catalog {
            &self.catalog
        }

        fn mapper(&self) -> ValueMapper<'_> {
            ValueMapper::new(&self.catalog)
        }

        fn configure(model: &mut Model, config: AppConfig) {
            match config.validated() {
                Ok(config) => {
                    debug!(
                        api = %config.api_base_url,
                        max_images = config.max_images,
                        "configuration applied"
                    );
                    if !model.language_chosen {
                        model.language = config.default_language;
                    }
                    model.config = config;
                }
                Err(e) => {
                    warn!(error = %e, "rejected configuration, keeping previous");
                    model.set_error(e.into());
                }
            }
        }

        fn select_option(&self, model: &mut Model, field: Field, display_value: &str) {
            let canonical =
                self.mapper()
                    .resolve_to_canonical(field, display_value, model.language, &model.form);
            model.form.set_value(field, canonical);
            if !field.is_multi_select() {
                model.active_picker = None;
            }
        }

        fn add_images(model: &mut Model, images: Vec<PickedImage>) {
            let max_bytes = model.config.max_image_bytes;
            let (accepted, rejected): (Vec<_>, Vec<_>) = images
                .into_iter()
                .partition(|image| image.size_bytes() <= max_bytes);

            if let Some(first) = rejected.first() {
                warn!(
                    rejected = rejected.len(),
                    max_bytes,
                    "images over size limit were not attached"
                );
                model.show_toast(ToastMessage::new(
                    Notice::ImageRejected {
                        file_name: first.file_name.clone(),
                        max_bytes,
                    },
                    ToastKind::Warning,
                ));
            }

            let max = model.config.max_images;
            let dropped = model.form.add_images(accepted, max);
            if dropped > 0 {
                warn!(dropped, max, "image limit reached");
                model.show_toast(ToastMessage::new(
                    Notice::ImagesDropped {
                        count: dropped,
                        max,
                    },
                    ToastKind::Warning,
                ));
            }
        }

        fn submit(model: &mut Model, caps: &Capabilities) {
            if model.is_submitting {
                debug!("submission already in flight, ignoring");
                return;
            }

            let submission = match ListingSubmission::from_form(&model.form, &model.config) {
                Ok(submission) => submission,
                Err(SubmissionError::Validation(error)) => {
                    debug!(%error, "form is not ready to submit");
                    model.show_toast(ToastMessage::new(
                        Notice::ValidationFailed { error },
                        ToastKind::Warning,
                    ));
                    return;
                }
                Err(e) => {
                    Self::fail_before_send(model, e.into());
                    return;
                }
            };

            let url = match model.config.listings_url() {
                Ok(url) => url,
                Err(e) => {
                    Self::fail_before_send(model, e.into());
                    return;
                }
            };

            let image_count = submission.image_count();
            let multipart = submission.into_multipart(MultipartForm::new());
            let body = match multipart.encode() {
                Ok(body) => body,
                Err(e) => {
                    Self::fail_before_send(model, e.into());
                    return;
                }
            };

            info!(
                host = url.host(),
                images = image_count,
                bytes = body.len(),
                "submitting listing"
            );

            let mut request = caps
                .http
                .post(url.as_str())
                .header("Content-Type", multipart.content_type());
            if let Some(token) = &model.session.token {
                request = request.header(
                    "Authorization",
                    format!("Bearer {}", token.expose_secret()),
                );
            }

            model.is_submitting = true;
            model.active_picker = None;
            model.clear_error();

            request
                .body_bytes(body)
                .send(|result| Event::SubmitCompleted(Box::new(SubmitOutcome::from_http(result))));
        }

        fn fail_before_send(model: &mut Model, error: AppError) {
            warn!(code = error.code(), message = %error.message, "could not build submission");
            model.show_toast(ToastMessage::new(
                Notice::SubmissionFailed { kind: error.kind },
                ToastKind::Error,
            ));
            model.set_error(error);
        }

        fn complete_submission(model: &mut Model, outcome: SubmitOutcome) {
            model.is_submitting = false;

            let error = match outcome {
                SubmitOutcome::Accepted { status, listing_id } => {
                    info!(status, listing_id = ?listing_id, "listing published");
                    model.form.reset();
                    model.active_picker = None;
                    model.last_listing_id = listing_id;
                    model.clear_error();
                    model.show_toast(ToastMessage::new(
                        Notice::ListingPublished,
                        ToastKind::Success,
                    ));
                    return;
                }
                SubmitOutcome::Rejected { status, message } => {
                    AppError::from_http_status(status, message)
                }
                SubmitOutcome::Failed { error } => AppError::from(error),
            };

            warn!(code = error.code(), message = %error.message, "listing submission failed");
            model.show_toast(ToastMessage::new(
                Notice::SubmissionFailed { kind: error.kind },
                ToastKind::Error,
            ));
            model.set_error(error);
        }

        fn field_rows(&self, model: &Model) -> Vec<FieldView> {
            let mapper = self.mapper();
            Field::ALL
                .into_iter()
                .filter(|field| !field.is_multi_select())
                .map(|field| {
                    let canonical = model.form.value(field).unwrap_or_default();
                    FieldView {
                        field,
                        label: i18n::field_label(field, model.language).to_string(),
                        display_value: mapper.resolve_to_display(
                            field,
                            canonical,
                            model.language,
                            &model.form,
                        ),
                        is_enabled: field != Field::Model || !model.form.make.is_empty(),
                    }
                })
                .collect()
        }

        fn picker_view(&self, model: &Model, field: Field) -> PickerView {
            let mapper = self.mapper();
            let current = model.form.value(field).unwrap_or_default();
            let options = mapper
                .picker_options(field, model.language, &model.form)
                .into_iter()
                .map(|label| {
                    let canonical =
                        mapper.resolve_to_canonical(field, label, model.language, &model.form);
                    let is_selected = if field.is_multi_select() {
                        model.form.is_feature_selected(&canonical)
                    } else {
                        !current.is_empty() && canonical == current
                    };
                    OptionView {
                        label: label.to_string(),
                        is_selected,
                    }
                })
                .collect();

            PickerView {
                field,
                title: i18n::field_label(field, model.language).to_string(),
                is_multi_select: field.is_multi_select(),
                options,
            }
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            debug!(
                event = event.name(),
                user_initiated = event.is_user_initiated(),
                "handling event"
            );

            match event {
                Event::Configure(config) => Self::configure(model, *config),

                Event::LanguageChanged { language } => {
                    model.language = language;
                    model.language_chosen = true;
                }

                Event::SessionChanged { token } => {
                    model.session.token = token.map(event::SessionToken::into_secret);
                }

                Event::PickerOpened { field } => {
                    if field == Field::Model && model.form.make.is_empty() {
                        model.show_toast(ToastMessage::new(
                            Notice::SelectMakeFirst,
                            ToastKind::Error,
                        ));
                    } else {
                        model.active_picker = Some(field);
                    }
                }

                Event::PickerClosed => {
                    model.active_picker = None;
                }

                Event::OptionSelected {
                    field,
                    display_value,
                } => self.select_option(model, field, &display_value),

                Event::TextChanged { field, value } => {
                    model.form.set_text(field, &value);
                }

                Event::ImagesPicked(images) => Self::add_images(model, images),

                Event::ImageRemoved { index } => {
                    if model.form.remove_image(index).is_none() {
                        debug!(index, "no image at index");
                    }
                }

                Event::MediaPermissionDenied => {
                    warn!("media library permission denied");
                    model.show_toast(ToastMessage::new(
                        Notice::MediaPermissionDenied,
                        ToastKind::Warning,
                    ));
                }

                Event::SubmitRequested => Self::submit(model, caps),

                Event::SubmitCompleted(outcome) => Self::complete_submission(model, *outcome),

                Event::ResetForm => {
                    model.form.reset();
                    model.active_picker = None;
                }

                Event::DismissToast => model.clear_toast(),

                Event::DismissError => model.clear_error(),
            }

            caps.render.render();
        }

        fn view(&self, model: &Model) -> ViewModel {
            let language = model.language;

            let text_fields = TEXT_FIELDS
                .into_iter()
                .map(|field| TextFieldView {
                    field,
                    label: i18n::text_field_label(field, language).to_string(),
                    value: model.form.text(field).to_string(),
                })
                .collect();

            ViewModel {
                language: language.code().to_string(),
                is_rtl: language.is_rtl(),
                fields: self.field_rows(model),
                text_fields,
                selected_features: self
                    .mapper()
                    .selected_features_for_display(&model.form, language),
                images: model.form.images.iter().map(ImageView::from).collect(),
                max_images: model.config.max_images,
                picker: model.active_picker.map(|field| self.picker_view(model, field)),
                is_submitting: model.is_submitting,
                can_submit: !model.is_submitting && model.form.validate(&model.config).is_ok(),
                submit_label: i18n::submit_label(language, model.is_submitting).to_string(),
                toast: model
                    .active_toast
                    .as_ref()
                    .map(|t| ToastView::new(t, language)),
                error: model
                    .active_error
                    .as_ref()
                    .map(|e| UserFacingError::new(e, language)),
            }
        }
    }
}
