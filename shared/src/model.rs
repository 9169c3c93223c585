use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::capabilities::MAX_REQUEST_BODY_SIZE;
use crate::config::AppConfig;
use crate::{AppError, ToastMessage};

pub const MIN_MODEL_YEAR: u32 = 1950;
pub const MAX_MODEL_YEAR: u32 = 2100;
pub const MAX_PRICE_USD: f64 = 100_000_000.0;
pub const MAX_KILOMETER: u64 = 5_000_000;
pub const MAX_PRICE_CHARS: usize = 12;
pub const MAX_YEAR_CHARS: usize = 4;
pub const MAX_KILOMETER_CHARS: usize = 7;
/// Total image bytes a listing may carry, leaving room for the text parts
/// and multipart headers under the request body cap.
pub const MAX_TOTAL_IMAGE_BYTES: usize = MAX_REQUEST_BODY_SIZE - 1024 * 1024;

/// Display language of the UI. Canonical values are always English.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

impl Language {
    pub const ALL: [Self; 2] = [Self::English, Self::Arabic];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Arabic => "ar",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let lower = code.trim().to_ascii_lowercase();
        // Accept region-qualified tags such as "ar-LB" or "en_US".
        match lower.split(['-', '_']).next() {
            Some("en") => Some(Self::English),
            Some("ar") => Some(Self::Arabic),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::English)
    }

    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Arabic)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Categorical fields of the place-ad form.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Make,
    Model,
    EngineSize,
    Location,
    Transmission,
    FuelType,
    ExteriorColor,
    InteriorColor,
    Feature,
}

impl Field {
    pub const ALL: [Self; 9] = [
        Self::Make,
        Self::Model,
        Self::EngineSize,
        Self::Location,
        Self::Transmission,
        Self::FuelType,
        Self::ExteriorColor,
        Self::InteriorColor,
        Self::Feature,
    ];

    /// Multipart field name sent to the listings endpoint.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Make => "make",
            Self::Model => "model",
            Self::EngineSize => "engineSize",
            Self::Location => "location",
            Self::Transmission => "transmission",
            Self::FuelType => "fuelType",
            Self::ExteriorColor => "exteriorColor",
            Self::InteriorColor => "interiorColor",
            Self::Feature => "selectedFeatures",
        }
    }

    #[must_use]
    pub const fn is_multi_select(self) -> bool {
        matches!(self, Self::Feature)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Free-text inputs. These bypass the value mapper entirely.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Price,
    Year,
    Kilometer,
    Description,
}

impl TextField {
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Price => "priceUSD",
            Self::Year => "year",
            Self::Kilometer => "kilometer",
            Self::Description => "description",
        }
    }

    fn sanitize(self, raw: &str) -> String {
        match self {
            Self::Price => {
                let mut seen_dot = false;
                raw.chars()
                    .map(normalize_digit)
                    .filter(|c| {
                        if *c == '.' && !seen_dot {
                            seen_dot = true;
                            return true;
                        }
                        c.is_ascii_digit()
                    })
                    .take(MAX_PRICE_CHARS)
                    .collect()
            }
            Self::Year => digits_only(raw, MAX_YEAR_CHARS),
            Self::Kilometer => digits_only(raw, MAX_KILOMETER_CHARS),
            Self::Description => raw.to_string(),
        }
    }
}

fn digits_only(raw: &str, max: usize) -> String {
    raw.chars()
        .map(normalize_digit)
        .filter(char::is_ascii_digit)
        .take(max)
        .collect()
}

/// Arabic-Indic and Persian digits map to ASCII; the Arabic decimal
/// separator maps to `.`.
fn normalize_digit(c: char) -> char {
    let base = match c {
        '\u{0660}'..='\u{0669}' => 0x0660,
        '\u{06F0}'..='\u{06F9}' => 0x06F0,
        '\u{066B}' => return '.',
        _ => return c,
    };
    char::from_digit(u32::from(c) - base, 10).unwrap_or(c)
}

/// Local image chosen through the media picker. Bytes are kept only for the
/// lifetime of the form session.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PickedImage {
    pub uri: String,
    pub file_name: String,
    pub mime_type: String,
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
}

impl PickedImage {
    pub fn new(
        uri: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            uri: uri.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

// Raw bytes are noise in logs.
impl fmt::Debug for PickedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickedImage")
            .field("uri", &self.uri)
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.data.len())
            .finish()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid number in {field}: {value}")]
    InvalidNumber { field: String, value: String },

    #[error("price must be greater than zero and at most {max}")]
    PriceOutOfRange { max: u64 },

    #[error("year {year} outside {min}..={max}")]
    YearOutOfRange { year: u32, min: u32, max: u32 },

    #[error("kilometer {value} exceeds {max}")]
    KilometerOutOfRange { value: u64, max: u64 },

    #[error("description too long ({len} > {max})")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("at least one image is required")]
    NoImages,

    #[error("too many images ({count} > {max})")]
    TooManyImages { count: usize, max: usize },

    #[error("images too large in total ({total} bytes > {max})")]
    ImagesTooLarge { total: usize, max: usize },
}

/// Canonical (English) state of one place-ad session.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AdForm {
    pub make: String,
    pub model: String,
    pub engine_size: String,
    pub location: String,
    pub transmission: String,
    pub fuel_type: String,
    pub exterior_color: String,
    pub interior_color: String,
    /// Insertion-ordered, no duplicates.
    pub selected_features: Vec<String>,
    pub price_usd: String,
    pub year: String,
    pub kilometer: String,
    pub description: String,
    pub images: Vec<PickedImage>,
}

impl AdForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored canonical value of a single-value field. `None` for features.
    #[must_use]
    pub fn value(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Make => &self.make,
            Field::Model => &self.model,
            Field::EngineSize => &self.engine_size,
            Field::Location => &self.location,
            Field::Transmission => &self.transmission,
            Field::FuelType => &self.fuel_type,
            Field::ExteriorColor => &self.exterior_color,
            Field::InteriorColor => &self.interior_color,
            Field::Feature => return None,
        };
        Some(value.as_str())
    }

    /// Stores a canonical value. Setting the make always clears the model;
    /// setting a feature toggles its membership.
    pub fn set_value(&mut self, field: Field, canonical: String) {
        match field {
            Field::Make => {
                self.make = canonical;
                self.model.clear();
            }
            Field::Model => self.model = canonical,
            Field::EngineSize => self.engine_size = canonical,
            Field::Location => self.location = canonical,
            Field::Transmission => self.transmission = canonical,
            Field::FuelType => self.fuel_type = canonical,
            Field::ExteriorColor => self.exterior_color = canonical,
            Field::InteriorColor => self.interior_color = canonical,
            Field::Feature => {
                self.toggle_feature(canonical);
            }
        }
    }

    /// Returns `true` when the feature is selected after the toggle.
    pub fn toggle_feature(&mut self, canonical: String) -> bool {
        if let Some(pos) = self.selected_features.iter().position(|f| *f == canonical) {
            self.selected_features.remove(pos);
            false
        } else {
            self.selected_features.push(canonical);
            true
        }
    }

    #[must_use]
    pub fn is_feature_selected(&self, canonical: &str) -> bool {
        self.selected_features.iter().any(|f| f == canonical)
    }

    #[must_use]
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Price => &self.price_usd,
            TextField::Year => &self.year,
            TextField::Kilometer => &self.kilometer,
            TextField::Description => &self.description,
        }
    }

    pub fn set_text(&mut self, field: TextField, raw: &str) {
        let value = field.sanitize(raw);
        match field {
            TextField::Price => self.price_usd = value,
            TextField::Year => self.year = value,
            TextField::Kilometer => self.kilometer = value,
            TextField::Description => self.description = value,
        }
    }

    /// Appends images until `max` is reached; returns how many were dropped.
    pub fn add_images(&mut self, images: impl IntoIterator<Item = PickedImage>, max: usize) -> usize {
        let mut dropped = 0;
        for image in images {
            if self.images.len() < max {
                self.images.push(image);
            } else {
                dropped += 1;
            }
        }
        dropped
    }

    pub fn remove_image(&mut self, index: usize) -> Option<PickedImage> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn total_image_bytes(&self) -> usize {
        self.images.iter().map(PickedImage::size_bytes).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self, config: &AppConfig) -> Result<(), ValidationError> {
        for field in [
            Field::Make,
            Field::Model,
            Field::EngineSize,
            Field::Location,
            Field::Transmission,
            Field::FuelType,
        ] {
            if self.value(field).map_or(true, |v| v.trim().is_empty()) {
                return Err(ValidationError::MissingField(field.wire_name().into()));
            }
        }

        let price = parse_required::<f64>(TextField::Price, &self.price_usd)?;
        if !price.is_finite() || price <= 0.0 || price > MAX_PRICE_USD {
            return Err(ValidationError::PriceOutOfRange {
                // MAX_PRICE_USD is an exact integer.
                max: MAX_PRICE_USD as u64,
            });
        }

        let year = parse_required::<u32>(TextField::Year, &self.year)?;
        if !(MIN_MODEL_YEAR..=MAX_MODEL_YEAR).contains(&year) {
            return Err(ValidationError::YearOutOfRange {
                year,
                min: MIN_MODEL_YEAR,
                max: MAX_MODEL_YEAR,
            });
        }

        let kilometer = parse_required::<u64>(TextField::Kilometer, &self.kilometer)?;
        if kilometer > MAX_KILOMETER {
            return Err(ValidationError::KilometerOutOfRange {
                value: kilometer,
                max: MAX_KILOMETER,
            });
        }

        let len = self.description.chars().count();
        if len > config.max_description_len {
            return Err(ValidationError::DescriptionTooLong {
                len,
                max: config.max_description_len,
            });
        }

        if self.images.is_empty() {
            return Err(ValidationError::NoImages);
        }
        if self.images.len() > config.max_images {
            return Err(ValidationError::TooManyImages {
                count: self.images.len(),
                max: config.max_images,
            });
        }
        let total = self.total_image_bytes();
        if total > MAX_TOTAL_IMAGE_BYTES {
            return Err(ValidationError::ImagesTooLarge {
                total,
                max: MAX_TOTAL_IMAGE_BYTES,
            });
        }

        Ok(())
    }
}

fn parse_required<T: std::str::FromStr>(field: TextField, raw: &str) -> Result<T, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field.wire_name().into()));
    }
    trimmed.parse().map_err(|_| ValidationError::InvalidNumber {
        field: field.wire_name().into(),
        value: trimmed.into(),
    })
}

/// Runtime-only secrets: never serialized.
#[derive(Default)]
pub struct Session {
    pub token: Option<secrecy::SecretString>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token_present", &self.token.is_some())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct Model {
    pub config: AppConfig,
    pub language: Language,
    /// Set once the user picks a language; configured defaults no longer apply.
    pub language_chosen: bool,
    pub form: AdForm,
    pub active_picker: Option<Field>,
    pub is_submitting: bool,
    pub session: Session,
    pub last_listing_id: Option<String>,

    // Generic UI state
    pub active_error: Option<AppError>,
    pub active_toast: Option<ToastMessage>,
}

impl Model {
    pub fn set_error(&mut self, error: AppError) {
        self.active_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }

    pub fn show_toast(&mut self, toast: ToastMessage) {
        self.active_toast = Some(toast);
    }

    pub fn clear_toast(&mut self) {
        self.active_toast = None;
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> PickedImage {
        PickedImage::new(format!("file:///tmp/{name}"), name, "image/jpeg", vec![0xFF, 0xD8])
    }

    fn complete_form() -> AdForm {
        let mut form = AdForm::new();
        form.set_value(Field::Make, "Toyota".into());
        form.set_value(Field::Model, "Camry".into());
        form.set_value(Field::EngineSize, "4 Cylinders".into());
        form.set_value(Field::Location, "Beirut".into());
        form.set_value(Field::Transmission, "Automatic".into());
        form.set_value(Field::FuelType, "Gasoline".into());
        form.set_text(TextField::Price, "15000");
        form.set_text(TextField::Year, "2018");
        form.set_text(TextField::Kilometer, "85000");
        form.add_images([image("a.jpg")], 10);
        form
    }

    #[test]
    fn language_codes() {
        assert_eq!(Language::from_code("ar"), Some(Language::Arabic));
        assert_eq!(Language::from_code("ar-LB"), Some(Language::Arabic));
        assert_eq!(Language::from_code("EN_us"), Some(Language::English));
        assert_eq!(Language::from_code("fr"), None);
        assert!(Language::Arabic.is_rtl());
        assert!(Language::English.is_default());
    }

    #[test]
    fn language_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Language::Arabic).unwrap(), "\"ar\"");
    }

    #[test]
    fn switching_make_clears_model() {
        let mut form = AdForm::new();
        form.set_value(Field::Make, "Toyota".into());
        form.set_value(Field::Model, "Camry".into());

        form.set_value(Field::Make, "Nissan".into());

        assert_eq!(form.make, "Nissan");
        assert!(form.model.is_empty());
    }

    #[test]
    fn double_toggle_restores_features() {
        let mut form = AdForm::new();
        form.toggle_feature("ABS".into());
        let before = form.selected_features.clone();

        assert!(form.toggle_feature("Bluetooth".into()));
        assert!(!form.toggle_feature("Bluetooth".into()));

        assert_eq!(form.selected_features, before);
    }

    #[test]
    fn feature_set_has_no_duplicates() {
        let mut form = AdForm::new();
        form.set_value(Field::Feature, "ABS".into());
        form.set_value(Field::Feature, "Sunroof".into());
        form.set_value(Field::Feature, "ABS".into());
        assert_eq!(form.selected_features, vec!["Sunroof".to_string()]);
    }

    #[test]
    fn feature_has_no_single_value() {
        assert_eq!(AdForm::new().value(Field::Feature), None);
    }

    #[test]
    fn numeric_text_is_sanitized() {
        let mut form = AdForm::new();
        form.set_text(TextField::Price, "$12,500.50.3");
        form.set_text(TextField::Year, "20a19x");
        form.set_text(TextField::Kilometer, "120 000 km");
        form.set_text(TextField::Description, "  clean title ");

        assert_eq!(form.price_usd, "12500.503");
        assert_eq!(form.year, "2019");
        assert_eq!(form.kilometer, "120000");
        assert_eq!(form.description, "  clean title ");
    }

    #[test]
    fn arabic_digits_are_normalized() {
        let mut form = AdForm::new();
        form.set_text(TextField::Year, "٢٠١٩");
        form.set_text(TextField::Kilometer, "۴۵۰۰۰ كم");
        form.set_text(TextField::Price, "١٢٥٠٠٫٥");

        assert_eq!(form.year, "2019");
        assert_eq!(form.kilometer, "45000");
        assert_eq!(form.price_usd, "12500.5");
    }

    #[test]
    fn images_over_total_byte_budget_fail_validation() {
        let mut form = complete_form();
        form.images.clear();
        let nine_mib = 9 * 1024 * 1024;
        form.add_images(
            (0..6).map(|i| {
                PickedImage::new(
                    format!("file:///{i}"),
                    format!("{i}.jpg"),
                    "image/jpeg",
                    vec![0; nine_mib],
                )
            }),
            10,
        );

        assert_eq!(
            form.validate(&AppConfig::default()),
            Err(ValidationError::ImagesTooLarge {
                total: 6 * nine_mib,
                max: MAX_TOTAL_IMAGE_BYTES,
            })
        );

        form.remove_image(0);
        assert!(form.validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn images_capped_at_max() {
        let mut form = AdForm::new();
        let dropped = form.add_images([image("a"), image("b"), image("c")], 2);
        assert_eq!(dropped, 1);
        assert_eq!(form.images.len(), 2);
    }

    #[test]
    fn remove_image_out_of_range_is_none() {
        let mut form = AdForm::new();
        form.add_images([image("a")], 5);
        assert!(form.remove_image(3).is_none());
        assert!(form.remove_image(0).is_some());
        assert!(form.images.is_empty());
    }

    #[test]
    fn reset_empties_form() {
        let mut form = complete_form();
        assert!(!form.is_empty());
        form.reset();
        assert!(form.is_empty());
    }

    #[test]
    fn complete_form_validates() {
        assert_eq!(complete_form().validate(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn missing_model_is_reported() {
        let mut form = complete_form();
        form.set_value(Field::Make, "Nissan".into());
        assert_eq!(
            form.validate(&AppConfig::default()),
            Err(ValidationError::MissingField("model".into()))
        );
    }

    #[test]
    fn zero_price_rejected() {
        let mut form = complete_form();
        form.set_text(TextField::Price, "0");
        assert!(matches!(
            form.validate(&AppConfig::default()),
            Err(ValidationError::PriceOutOfRange { .. })
        ));
    }

    #[test]
    fn lone_dot_price_is_invalid_number() {
        let mut form = complete_form();
        form.set_text(TextField::Price, ".");
        assert!(matches!(
            form.validate(&AppConfig::default()),
            Err(ValidationError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn year_range_enforced() {
        let mut form = complete_form();
        form.set_text(TextField::Year, "1890");
        assert!(matches!(
            form.validate(&AppConfig::default()),
            Err(ValidationError::YearOutOfRange { year: 1890, .. })
        ));
    }

    #[test]
    fn images_required() {
        let mut form = complete_form();
        form.images.clear();
        assert_eq!(form.validate(&AppConfig::default()), Err(ValidationError::NoImages));
    }

    #[test]
    fn description_limit_counts_chars() {
        let config = AppConfig {
            max_description_len: 3,
            ..AppConfig::default()
        };
        let mut form = complete_form();
        form.set_text(TextField::Description, "سيا");
        assert_eq!(form.validate(&config), Ok(()));
        form.set_text(TextField::Description, "سيار");
        assert!(matches!(
            form.validate(&config),
            Err(ValidationError::DescriptionTooLong { len: 4, max: 3 })
        ));
    }

    #[test]
    fn picked_image_debug_hides_bytes() {
        let debug = format!("{:?}", image("a.jpg"));
        assert!(debug.contains("size_bytes: 2"));
        assert!(!debug.contains("255"));
    }

    #[test]
    fn session_debug_hides_token() {
        let session = Session {
            token: Some(secrecy::SecretString::new("tok-123".into())),
        };
        let debug = format!("{session:?}");
        assert!(!debug.contains("tok-123"));
    }
}
