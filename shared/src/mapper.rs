//! Bidirectional resolution between display strings and canonical values.
//!
//! A miss never fails: the input comes back unchanged so the UI never shows
//! an empty value for a non-empty selection. Misses are logged so catalog
//! drift shows up in diagnostics.

use tracing::warn;

use crate::catalog::Catalog;
use crate::model::{AdForm, Field, Language};

#[derive(Debug, Clone, Copy)]
pub struct ValueMapper<'a> {
    catalog: &'a Catalog,
}

impl<'a> ValueMapper<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Display string chosen by the user -> canonical English value.
    ///
    /// Model lookups are scoped to the make already stored in `form`.
    #[must_use]
    pub fn resolve_to_canonical(
        &self,
        field: Field,
        display: &str,
        language: Language,
        form: &AdForm,
    ) -> String {
        if language.is_default() || display.is_empty() {
            return display.to_string();
        }

        let resolved = match field {
            Field::Make => self.catalog.make_by_ar(display).map(|m| m.en.as_str()),
            Field::Model => self
                .catalog
                .make_by_en(&form.make)
                .and_then(|m| m.models.find_by_ar(display))
                .map(|e| e.en.as_str()),
            Field::EngineSize
            | Field::Location
            | Field::Transmission
            | Field::FuelType
            | Field::ExteriorColor
            | Field::InteriorColor
            | Field::Feature => self
                .catalog
                .table(field)
                .and_then(|t| t.find_by_ar(display))
                .map(|e| e.en.as_str()),
        };

        match resolved {
            Some(canonical) => canonical.to_string(),
            None => {
                let value = display;
                warn!(
                    %field,
                    %language,
                    value,
                    make = form.make.as_str(),
                    "display value not in catalog, keeping it as canonical"
                );
                display.to_string()
            }
        }
    }

    /// Canonical value from form state -> string to render.
    #[must_use]
    pub fn resolve_to_display(
        &self,
        field: Field,
        canonical: &str,
        language: Language,
        form: &AdForm,
    ) -> String {
        if language.is_default() || canonical.is_empty() {
            return canonical.to_string();
        }

        let resolved = match field {
            Field::Make => self
                .catalog
                .make_by_en(canonical)
                .map(|m| m.display(language)),
            Field::Model => self
                .catalog
                .make_by_en(&form.make)
                .and_then(|m| m.models.find_by_en(canonical))
                .map(|e| e.display(language)),
            Field::EngineSize
            | Field::Location
            | Field::Transmission
            | Field::FuelType
            | Field::ExteriorColor
            | Field::InteriorColor
            | Field::Feature => self
                .catalog
                .table(field)
                .and_then(|t| t.find_by_en(canonical))
                .map(|e| e.display(language)),
        };

        match resolved {
            Some(display) => display.to_string(),
            None => {
                warn!(
                    %field,
                    %language,
                    value = canonical,
                    make = form.make.as_str(),
                    "canonical value not in catalog, rendering it as is"
                );
                canonical.to_string()
            }
        }
    }

    /// Resolves every display string to canonical form, in order.
    #[must_use]
    pub fn resolve_all_to_canonical<'s>(
        &self,
        field: Field,
        displays: impl IntoIterator<Item = &'s str>,
        language: Language,
        form: &AdForm,
    ) -> Vec<String> {
        displays
            .into_iter()
            .map(|d| self.resolve_to_canonical(field, d, language, form))
            .collect()
    }

    /// Selected features rendered in `language`, in selection order.
    #[must_use]
    pub fn selected_features_for_display(&self, form: &AdForm, language: Language) -> Vec<String> {
        form.selected_features
            .iter()
            .map(|f| self.resolve_to_display(Field::Feature, f, language, form))
            .collect()
    }

    /// Toggles the feature shown as `display`. Returns `true` when it is
    /// selected afterwards.
    pub fn toggle_feature(&self, form: &mut AdForm, display: &str, language: Language) -> bool {
        let canonical = self.resolve_to_canonical(Field::Feature, display, language, form);
        form.toggle_feature(canonical)
    }

    /// Options for the picker of `field` in `language`. The model picker is
    /// scoped to the selected make.
    #[must_use]
    pub fn picker_options(&self, field: Field, language: Language, form: &AdForm) -> Vec<&'a str> {
        match field {
            Field::Model => self.catalog.models_for_make(&form.make, language),
            _ => self.catalog.list_display_options(field, language),
        }
    }
}
