//! Packaging a validated form into the listings multipart payload.

use crate::capabilities::{HttpError, MultipartForm};
use crate::config::AppConfig;
use crate::model::{AdForm, Field, TextField, ValidationError};

pub const IMAGES_FIELD: &str = "images";

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Http(#[from] HttpError),
}

/// Text fields of a listing in wire order, plus the images to attach.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSubmission {
    fields: Vec<(&'static str, String)>,
    images: Vec<crate::model::PickedImage>,
}

impl ListingSubmission {
    pub fn from_form(form: &AdForm, config: &AppConfig) -> Result<Self, SubmissionError> {
        form.validate(config)?;

        let features = serde_json::to_string(&form.selected_features).map_err(|e| {
            HttpError::SerializationError {
                message: e.to_string(),
            }
        })?;

        let text = |f: TextField| (f.wire_name(), form.text(f).trim().to_string());
        let single = |f: Field| (f.wire_name(), form.value(f).unwrap_or_default().to_string());

        let fields = vec![
            single(Field::Make),
            single(Field::Model),
            text(TextField::Price),
            text(TextField::Year),
            text(TextField::Kilometer),
            single(Field::EngineSize),
            single(Field::Location),
            single(Field::Transmission),
            single(Field::FuelType),
            single(Field::ExteriorColor),
            single(Field::InteriorColor),
            (Field::Feature.wire_name(), features),
            (TextField::Description.wire_name(), form.description.clone()),
        ];

        Ok(Self {
            fields,
            images: form.images.clone(),
        })
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn into_multipart(self, form: MultipartForm) -> MultipartForm {
        let form = self
            .fields
            .into_iter()
            .fold(form, |form, (name, value)| form.text(name, value));
        self.images.into_iter().fold(form, |form, image| {
            form.file(IMAGES_FIELD, image.file_name, image.mime_type, image.data)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PickedImage;

    fn filled_form() -> AdForm {
        let mut form = AdForm::new();
        form.set_value(Field::Make, "Toyota".into());
        form.set_value(Field::Model, "Camry".into());
        form.set_value(Field::EngineSize, "4 Cylinders".into());
        form.set_value(Field::Location, "Beirut".into());
        form.set_value(Field::Transmission, "Automatic".into());
        form.set_value(Field::FuelType, "Hybrid".into());
        form.set_value(Field::ExteriorColor, "White".into());
        form.set_text(TextField::Price, "21500");
        form.set_text(TextField::Year, "2020");
        form.set_text(TextField::Kilometer, "40000");
        form.set_text(TextField::Description, "Single owner");
        form.add_images(
            [
                PickedImage::new("file:///1", "front.jpg", "image/jpeg", vec![1]),
                PickedImage::new("file:///2", "back.png", "image/png", vec![2, 2]),
            ],
            10,
        );
        form
    }

    #[test]
    fn selected_features_are_json_text() {
        let mut form = filled_form();
        form.toggle_feature("Bluetooth".into());
        form.toggle_feature("ABS".into());

        let submission = ListingSubmission::from_form(&form, &AppConfig::default()).unwrap();

        assert_eq!(submission.field("selectedFeatures"), Some(r#"["Bluetooth","ABS"]"#));
    }

    #[test]
    fn no_features_is_empty_array() {
        let submission = ListingSubmission::from_form(&filled_form(), &AppConfig::default()).unwrap();
        assert_eq!(submission.field("selectedFeatures"), Some("[]"));
    }

    #[test]
    fn fields_follow_wire_order() {
        let submission = ListingSubmission::from_form(&filled_form(), &AppConfig::default()).unwrap();
        let names: Vec<&str> = submission.fields().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "make",
                "model",
                "priceUSD",
                "year",
                "kilometer",
                "engineSize",
                "location",
                "transmission",
                "fuelType",
                "exteriorColor",
                "interiorColor",
                "selectedFeatures",
                "description",
            ]
        );
        assert_eq!(submission.field("interiorColor"), Some(""));
        assert_eq!(submission.field("priceUSD"), Some("21500"));
    }

    #[test]
    fn images_repeat_field_name() {
        let submission = ListingSubmission::from_form(&filled_form(), &AppConfig::default()).unwrap();
        assert_eq!(submission.image_count(), 2);

        let multipart = submission.into_multipart(MultipartForm::with_boundary("b"));

        assert_eq!(multipart.file_count(IMAGES_FIELD), 2);
        assert_eq!(multipart.text_value("make"), Some("Toyota"));
        assert_eq!(multipart.parts().len(), 13 + 2);
    }

    #[test]
    fn invalid_form_is_not_packaged() {
        let mut form = filled_form();
        form.set_text(TextField::Year, "");
        let err = ListingSubmission::from_form(&form, &AppConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            SubmissionError::Validation(ValidationError::MissingField(ref f)) if f == "year"
        ));
    }
}
