//! Bilingual option catalog.
//!
//! Every categorical field of the place-ad form has a table of
//! `{ key, en, ar }` entries. `en` is the canonical value stored in form
//! state and sent to the server; `ar` is what an Arabic-speaking user sees.
//! Makes carry their own model table so that model lookups never depend on
//! re-translating English keys at runtime.
//!
//! The catalog is immutable once built. It is either the builtin table set
//! ([`Catalog::builtin`]) or loaded once from JSON and validated.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

use crate::model::{Field, Language};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("table '{table}' is empty")]
    EmptyTable { table: String },

    #[error("table '{table}' has an entry with an empty value (key '{key}')")]
    EmptyValue { table: String, key: String },

    #[error("table '{table}' has duplicate key '{value}'")]
    DuplicateKey { table: String, value: String },

    #[error("table '{table}' has duplicate canonical value '{value}'")]
    DuplicateCanonical { table: String, value: String },

    #[error("table '{table}' has duplicate display value '{value}'")]
    DuplicateDisplay { table: String, value: String },
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e.to_string())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OptionEntry {
    pub key: String,
    pub en: String,
    pub ar: String,
}

impl OptionEntry {
    pub fn new(key: impl Into<String>, en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            en: en.into(),
            ar: ar.into(),
        }
    }

    #[must_use]
    pub fn display(&self, language: Language) -> &str {
        match language {
            Language::English => &self.en,
            Language::Arabic => &self.ar,
        }
    }
}

/// One table of options, in declaration order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct OptionCatalog {
    entries: Vec<OptionEntry>,
}

impl OptionCatalog {
    #[must_use]
    pub fn new(entries: Vec<OptionEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[OptionEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn display_options(&self, language: Language) -> Vec<&str> {
        self.entries.iter().map(|e| e.display(language)).collect()
    }

    #[must_use]
    pub fn find_by_en(&self, en: &str) -> Option<&OptionEntry> {
        self.entries.iter().find(|e| e.en == en)
    }

    #[must_use]
    pub fn find_by_ar(&self, ar: &str) -> Option<&OptionEntry> {
        self.entries.iter().find(|e| e.ar == ar)
    }

    fn validate(&self, table: &str) -> Result<(), CatalogError> {
        validate_entries(table, self.entries.iter().map(|e| (&e.key, &e.en, &e.ar)))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MakeEntry {
    pub key: String,
    pub en: String,
    pub ar: String,
    pub models: OptionCatalog,
}

impl MakeEntry {
    #[must_use]
    pub fn display(&self, language: Language) -> &str {
        match language {
            Language::English => &self.en,
            Language::Arabic => &self.ar,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    pub makes: Vec<MakeEntry>,
    pub cylinders: OptionCatalog,
    pub locations: OptionCatalog,
    pub transmissions: OptionCatalog,
    pub fuel_types: OptionCatalog,
    /// Shared by exterior and interior color.
    pub colors: OptionCatalog,
    pub features: OptionCatalog,
}

static BUILTIN: LazyLock<Catalog> = LazyLock::new(builtin_catalog);

impl Catalog {
    /// The catalog compiled into the binary.
    #[must_use]
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that no table is empty and that keys, canonical values and
    /// display values are unique per table (models: per make).
    pub fn validate(&self) -> Result<(), CatalogError> {
        validate_entries("makes", self.makes.iter().map(|m| (&m.key, &m.en, &m.ar)))?;
        for make in &self.makes {
            make.models.validate(&format!("models.{}", make.key))?;
        }
        self.cylinders.validate("cylinders")?;
        self.locations.validate("locations")?;
        self.transmissions.validate("transmissions")?;
        self.fuel_types.validate("fuel_types")?;
        self.colors.validate("colors")?;
        self.features.validate("features")?;
        Ok(())
    }

    /// Table backing a flat field. Makes and models are nested and have none.
    #[must_use]
    pub fn table(&self, field: Field) -> Option<&OptionCatalog> {
        match field {
            Field::Make | Field::Model => None,
            Field::EngineSize => Some(&self.cylinders),
            Field::Location => Some(&self.locations),
            Field::Transmission => Some(&self.transmissions),
            Field::FuelType => Some(&self.fuel_types),
            Field::ExteriorColor | Field::InteriorColor => Some(&self.colors),
            Field::Feature => Some(&self.features),
        }
    }

    #[must_use]
    pub fn make_by_en(&self, en: &str) -> Option<&MakeEntry> {
        self.makes.iter().find(|m| m.en == en)
    }

    #[must_use]
    pub fn make_by_ar(&self, ar: &str) -> Option<&MakeEntry> {
        self.makes.iter().find(|m| m.ar == ar)
    }

    /// All display strings of a field in declaration order. Models are
    /// flattened across makes; pickers use [`Catalog::models_for_make`].
    #[must_use]
    pub fn list_display_options(&self, field: Field, language: Language) -> Vec<&str> {
        match field {
            Field::Make => self.makes.iter().map(|m| m.display(language)).collect(),
            Field::Model => self
                .makes
                .iter()
                .flat_map(|m| m.models.iter().map(move |e| e.display(language)))
                .collect(),
            _ => self
                .table(field)
                .map(|t| t.display_options(language))
                .unwrap_or_default(),
        }
    }

    /// Model display strings for a canonical make; empty for unknown makes.
    #[must_use]
    pub fn models_for_make(&self, make: &str, language: Language) -> Vec<&str> {
        self.make_by_en(make)
            .map(|m| m.models.display_options(language))
            .unwrap_or_default()
    }
}

fn validate_entries<'a>(
    table: &str,
    entries: impl Iterator<Item = (&'a String, &'a String, &'a String)>,
) -> Result<(), CatalogError> {
    let mut keys = HashSet::new();
    let mut canonical = HashSet::new();
    let mut display = HashSet::new();

    for (key, en, ar) in entries {
        if key.trim().is_empty() || en.trim().is_empty() || ar.trim().is_empty() {
            return Err(CatalogError::EmptyValue {
                table: table.into(),
                key: key.clone(),
            });
        }
        if !keys.insert(key.as_str()) {
            return Err(CatalogError::DuplicateKey {
                table: table.into(),
                value: key.clone(),
            });
        }
        if !canonical.insert(en.as_str()) {
            return Err(CatalogError::DuplicateCanonical {
                table: table.into(),
                value: en.clone(),
            });
        }
        if !display.insert(ar.as_str()) {
            return Err(CatalogError::DuplicateDisplay {
                table: table.into(),
                value: ar.clone(),
            });
        }
    }

    if keys.is_empty() {
        return Err(CatalogError::EmptyTable {
            table: table.into(),
        });
    }
    Ok(())
}

// ============================================================================
// Builtin tables
// ============================================================================

type Row = (&'static str, &'static str, &'static str);

const MAKES: &[(Row, &[Row])] = &[
    (
        ("toyota", "Toyota", "تويوتا"),
        &[
            ("camry", "Camry", "كامري"),
            ("corolla", "Corolla", "كورولا"),
            ("land_cruiser", "Land Cruiser", "لاند كروزر"),
            ("prado", "Prado", "برادو"),
            ("hilux", "Hilux", "هايلكس"),
            ("rav4", "RAV4", "راف 4"),
            ("yaris", "Yaris", "يارس"),
        ],
    ),
    (
        ("nissan", "Nissan", "نيسان"),
        &[
            ("patrol", "Patrol", "باترول"),
            ("altima", "Altima", "ألتيما"),
            ("sunny", "Sunny", "صني"),
            ("x_trail", "X-Trail", "إكس تريل"),
            ("pathfinder", "Pathfinder", "باثفايندر"),
        ],
    ),
    (
        ("hyundai", "Hyundai", "هيونداي"),
        &[
            ("elantra", "Elantra", "إلنترا"),
            ("sonata", "Sonata", "سوناتا"),
            ("tucson", "Tucson", "توسان"),
            ("santa_fe", "Santa Fe", "سانتا في"),
            ("accent", "Accent", "أكسنت"),
        ],
    ),
    (
        ("kia", "Kia", "كيا"),
        &[
            ("cerato", "Cerato", "سيراتو"),
            ("sportage", "Sportage", "سبورتاج"),
            ("sorento", "Sorento", "سورينتو"),
            ("picanto", "Picanto", "بيكانتو"),
            ("rio", "Rio", "ريو"),
        ],
    ),
    (
        ("mercedes_benz", "Mercedes-Benz", "مرسيدس بنز"),
        &[
            ("c_class", "C-Class", "الفئة C"),
            ("e_class", "E-Class", "الفئة E"),
            ("s_class", "S-Class", "الفئة S"),
            ("g_class", "G-Class", "الفئة G"),
            ("gle", "GLE", "جي إل إي"),
        ],
    ),
    (
        ("bmw", "BMW", "بي إم دبليو"),
        &[
            ("series_3", "3 Series", "الفئة الثالثة"),
            ("series_5", "5 Series", "الفئة الخامسة"),
            ("series_7", "7 Series", "الفئة السابعة"),
            ("x5", "X5", "إكس 5"),
            ("x6", "X6", "إكس 6"),
        ],
    ),
    (
        ("chevrolet", "Chevrolet", "شيفروليه"),
        &[
            ("tahoe", "Tahoe", "تاهو"),
            ("malibu", "Malibu", "ماليبو"),
            ("camaro", "Camaro", "كامارو"),
            ("silverado", "Silverado", "سيلفرادو"),
        ],
    ),
    (
        ("ford", "Ford", "فورد"),
        &[
            ("mustang", "Mustang", "موستانج"),
            ("explorer", "Explorer", "إكسبلورر"),
            ("f_150", "F-150", "إف-150"),
            ("focus", "Focus", "فوكس"),
        ],
    ),
    (
        ("honda", "Honda", "هوندا"),
        &[
            ("civic", "Civic", "سيفيك"),
            ("accord", "Accord", "أكورد"),
            ("cr_v", "CR-V", "سي آر في"),
        ],
    ),
    (
        ("volkswagen", "Volkswagen", "فولكس فاجن"),
        &[
            ("golf", "Golf", "غولف"),
            ("passat", "Passat", "باسات"),
            ("tiguan", "Tiguan", "تيغوان"),
        ],
    ),
];

const CYLINDERS: &[Row] = &[
    ("cyl_3", "3 Cylinders", "3 سلندر"),
    ("cyl_4", "4 Cylinders", "4 سلندر"),
    ("cyl_5", "5 Cylinders", "5 سلندر"),
    ("cyl_6", "6 Cylinders", "6 سلندر"),
    ("cyl_8", "8 Cylinders", "8 سلندر"),
    ("cyl_10", "10 Cylinders", "10 سلندر"),
    ("cyl_12", "12 Cylinders", "12 سلندر"),
    ("electric", "Electric Motor", "محرك كهربائي"),
];

const LOCATIONS: &[Row] = &[
    ("beirut", "Beirut", "بيروت"),
    ("mount_lebanon", "Mount Lebanon", "جبل لبنان"),
    ("tripoli", "Tripoli", "طرابلس"),
    ("sidon", "Sidon", "صيدا"),
    ("tyre", "Tyre", "صور"),
    ("zahle", "Zahle", "زحلة"),
    ("jounieh", "Jounieh", "جونية"),
    ("byblos", "Byblos", "جبيل"),
    ("baalbek", "Baalbek", "بعلبك"),
    ("nabatieh", "Nabatieh", "النبطية"),
];

const TRANSMISSIONS: &[Row] = &[
    ("automatic", "Automatic", "أوتوماتيك"),
    ("manual", "Manual", "يدوي"),
];

const FUEL_TYPES: &[Row] = &[
    ("gasoline", "Gasoline", "بنزين"),
    ("diesel", "Diesel", "ديزل"),
    ("hybrid", "Hybrid", "هايبرد"),
    ("electric", "Electric", "كهربائي"),
];

const COLORS: &[Row] = &[
    ("white", "White", "أبيض"),
    ("black", "Black", "أسود"),
    ("silver", "Silver", "فضي"),
    ("gray", "Gray", "رمادي"),
    ("red", "Red", "أحمر"),
    ("blue", "Blue", "أزرق"),
    ("green", "Green", "أخضر"),
    ("beige", "Beige", "بيج"),
    ("brown", "Brown", "بني"),
    ("gold", "Gold", "ذهبي"),
    ("yellow", "Yellow", "أصفر"),
    ("orange", "Orange", "برتقالي"),
];

const FEATURES: &[Row] = &[
    ("bluetooth", "Bluetooth", "بلوتوث"),
    ("abs", "ABS", "نظام منع انغلاق المكابح"),
    ("sunroof", "Sunroof", "فتحة سقف"),
    ("navigation", "Navigation System", "نظام ملاحة"),
    ("rear_camera", "Rear Camera", "كاميرا خلفية"),
    ("leather_seats", "Leather Seats", "مقاعد جلد"),
    ("cruise_control", "Cruise Control", "مثبت سرعة"),
    ("parking_sensors", "Parking Sensors", "حساسات ركن"),
    ("keyless_entry", "Keyless Entry", "دخول بدون مفتاح"),
    ("heated_seats", "Heated Seats", "مقاعد مدفأة"),
    ("alloy_wheels", "Alloy Wheels", "جنوط ألمنيوم"),
    ("airbags", "Airbags", "وسائد هوائية"),
];

fn table(rows: &[Row]) -> OptionCatalog {
    OptionCatalog::new(
        rows.iter()
            .map(|&(key, en, ar)| OptionEntry::new(key, en, ar))
            .collect(),
    )
}

fn builtin_catalog() -> Catalog {
    Catalog {
        makes: MAKES
            .iter()
            .map(|&((key, en, ar), models)| MakeEntry {
                key: key.into(),
                en: en.into(),
                ar: ar.into(),
                models: table(models),
            })
            .collect(),
        cylinders: table(CYLINDERS),
        locations: table(LOCATIONS),
        transmissions: table(TRANSMISSIONS),
        fuel_types: table(FUEL_TYPES),
        colors: table(COLORS),
        features: table(FEATURES),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn tiny_catalog_json() -> String {
        let row = |k: &str, en: &str, ar: &str| serde_json::json!({"key": k, "en": en, "ar": ar});
        serde_json::json!({
            "makes": [{
                "key": "toyota", "en": "Toyota", "ar": "تويوتا",
                "models": [row("camry", "Camry", "كامري")]
            }],
            "cylinders": [row("cyl_4", "4 Cylinders", "4 سلندر")],
            "locations": [row("beirut", "Beirut", "بيروت")],
            "transmissions": [row("manual", "Manual", "يدوي")],
            "fuel_types": [row("diesel", "Diesel", "ديزل")],
            "colors": [row("red", "Red", "أحمر")],
            "features": [row("abs", "ABS", "نظام منع انغلاق المكابح")]
        })
        .to_string()
    }

    #[test]
    fn builtin_is_valid() {
        Catalog::builtin().validate().unwrap();
    }

    #[test]
    fn list_display_options_keeps_declaration_order() {
        let catalog = Catalog::builtin();
        let en = catalog.list_display_options(Field::Transmission, Language::English);
        let ar = catalog.list_display_options(Field::Transmission, Language::Arabic);
        assert_eq!(en, vec!["Automatic", "Manual"]);
        assert_eq!(ar, vec!["أوتوماتيك", "يدوي"]);
    }

    #[test]
    fn make_options_start_with_toyota() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.list_display_options(Field::Make, Language::Arabic)[0], "تويوتا");
        assert_eq!(catalog.list_display_options(Field::Make, Language::English)[0], "Toyota");
    }

    #[test]
    fn model_options_are_flattened_across_makes() {
        let catalog = Catalog::builtin();
        let total: usize = catalog.makes.iter().map(|m| m.models.len()).sum();
        assert_eq!(catalog.list_display_options(Field::Model, Language::English).len(), total);
    }

    #[test]
    fn colors_shared_by_both_color_fields() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.list_display_options(Field::ExteriorColor, Language::Arabic),
            catalog.list_display_options(Field::InteriorColor, Language::Arabic)
        );
    }

    #[test]
    fn models_for_unknown_make_is_empty() {
        assert!(Catalog::builtin()
            .models_for_make("Lada", Language::English)
            .is_empty());
    }

    #[test]
    fn models_for_make_in_arabic() {
        let models = Catalog::builtin().models_for_make("Toyota", Language::Arabic);
        assert_eq!(models.first(), Some(&"كامري"));
    }

    #[test]
    fn from_json_accepts_valid_catalog() {
        let catalog = Catalog::from_json(&tiny_catalog_json()).unwrap();
        assert_eq!(catalog.makes.len(), 1);
        assert_eq!(catalog.features.find_by_en("ABS").map(|e| e.key.as_str()), Some("abs"));
    }

    #[test]
    fn builtin_json_round_trip() {
        let json = Catalog::builtin().to_json().unwrap();
        assert_eq!(&Catalog::from_json(&json).unwrap(), Catalog::builtin());
    }

    #[test]
    fn duplicate_display_value_rejected() {
        let mut catalog = Catalog::builtin().clone();
        catalog
            .colors
            .entries
            .push(OptionEntry::new("off_white", "Off White", "أبيض"));
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::DuplicateDisplay { .. })
        ));
    }

    #[test]
    fn duplicate_canonical_value_rejected() {
        let mut catalog = Catalog::builtin().clone();
        catalog
            .fuel_types
            .entries
            .push(OptionEntry::new("petrol", "Gasoline", "وقود"));
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::DuplicateCanonical { .. })
        ));
    }

    #[test]
    fn duplicate_model_within_make_rejected() {
        let mut catalog = Catalog::builtin().clone();
        catalog.makes[0]
            .models
            .entries
            .push(OptionEntry::new("camry_2", "Camry Hybrid", "كامري"));
        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("models.toyota"));
    }

    #[test]
    fn empty_value_rejected() {
        let mut catalog = Catalog::builtin().clone();
        catalog.transmissions.entries[0].ar = "  ".into();
        assert!(matches!(catalog.validate(), Err(CatalogError::EmptyValue { .. })));
    }

    #[test]
    fn empty_table_rejected() {
        let mut catalog = Catalog::builtin().clone();
        catalog.features = OptionCatalog::default();
        assert!(matches!(catalog.validate(), Err(CatalogError::EmptyTable { .. })));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            Catalog::from_json("{\"makes\": 3}"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn load_from_path_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(tiny_catalog_json().as_bytes()).unwrap();

        let catalog = Catalog::load_from_path(file.path()).unwrap();

        assert_eq!(catalog.locations.display_options(Language::Arabic), vec!["بيروت"]);
    }

    #[test]
    fn load_from_missing_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Catalog::load_from_path(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
