//! UI strings for the place-ad screen in both supported languages.
//!
//! Option values are not here; they live in the catalog.

use serde::{Deserialize, Serialize};

use crate::model::{Field, Language, TextField, ValidationError};
use crate::ErrorKind;

#[must_use]
pub fn field_label(field: Field, language: Language) -> &'static str {
    match (field, language) {
        (Field::Make, Language::English) => "Make",
        (Field::Make, Language::Arabic) => "الماركة",
        (Field::Model, Language::English) => "Model",
        (Field::Model, Language::Arabic) => "الموديل",
        (Field::EngineSize, Language::English) => "Engine Size",
        (Field::EngineSize, Language::Arabic) => "حجم المحرك",
        (Field::Location, Language::English) => "Location",
        (Field::Location, Language::Arabic) => "الموقع",
        (Field::Transmission, Language::English) => "Transmission",
        (Field::Transmission, Language::Arabic) => "ناقل الحركة",
        (Field::FuelType, Language::English) => "Fuel Type",
        (Field::FuelType, Language::Arabic) => "نوع الوقود",
        (Field::ExteriorColor, Language::English) => "Exterior Color",
        (Field::ExteriorColor, Language::Arabic) => "اللون الخارجي",
        (Field::InteriorColor, Language::English) => "Interior Color",
        (Field::InteriorColor, Language::Arabic) => "اللون الداخلي",
        (Field::Feature, Language::English) => "Features",
        (Field::Feature, Language::Arabic) => "المميزات",
    }
}

#[must_use]
pub fn text_field_label(field: TextField, language: Language) -> &'static str {
    match (field, language) {
        (TextField::Price, Language::English) => "Price (USD)",
        (TextField::Price, Language::Arabic) => "السعر (دولار)",
        (TextField::Year, Language::English) => "Year",
        (TextField::Year, Language::Arabic) => "السنة",
        (TextField::Kilometer, Language::English) => "Kilometers",
        (TextField::Kilometer, Language::Arabic) => "عدد الكيلومترات",
        (TextField::Description, Language::English) => "Description",
        (TextField::Description, Language::Arabic) => "الوصف",
    }
}

/// Label for a multipart field name, used when echoing validation errors.
#[must_use]
pub fn wire_name_label(wire_name: &str, language: Language) -> String {
    if let Some(field) = Field::ALL.into_iter().find(|f| f.wire_name() == wire_name) {
        return field_label(field, language).to_string();
    }
    [
        TextField::Price,
        TextField::Year,
        TextField::Kilometer,
        TextField::Description,
    ]
    .into_iter()
    .find(|f| f.wire_name() == wire_name)
    .map_or_else(|| wire_name.to_string(), |f| text_field_label(f, language).to_string())
}

#[must_use]
pub fn submit_label(language: Language, is_submitting: bool) -> &'static str {
    match (language, is_submitting) {
        (Language::English, false) => "Place Ad",
        (Language::English, true) => "Publishing...",
        (Language::Arabic, false) => "نشر الإعلان",
        (Language::Arabic, true) => "جارٍ النشر...",
    }
}

#[must_use]
pub fn validation_message(error: &ValidationError, language: Language) -> String {
    let ar = language == Language::Arabic;
    match error {
        ValidationError::MissingField(name) => {
            let label = wire_name_label(name, language);
            if ar {
                format!("يرجى إدخال {label}")
            } else {
                format!("Please fill in {label}")
            }
        }
        ValidationError::InvalidNumber { field, .. } => {
            let label = wire_name_label(field, language);
            if ar {
                format!("قيمة غير صالحة في {label}")
            } else {
                format!("{label} must be a number")
            }
        }
        ValidationError::PriceOutOfRange { .. } => {
            if ar {
                "يرجى إدخال سعر صالح".into()
            } else {
                "Please enter a valid price".into()
            }
        }
        ValidationError::YearOutOfRange { min, max, .. } => {
            if ar {
                format!("يجب أن تكون السنة بين {min} و {max}")
            } else {
                format!("Year must be between {min} and {max}")
            }
        }
        ValidationError::KilometerOutOfRange { .. } => {
            if ar {
                "عدد الكيلومترات غير صالح".into()
            } else {
                "Please enter a valid mileage".into()
            }
        }
        ValidationError::DescriptionTooLong { max, .. } => {
            if ar {
                format!("الوصف طويل جداً (الحد الأقصى {max} حرف)")
            } else {
                format!("Description is too long (max {max} characters)")
            }
        }
        ValidationError::NoImages => {
            if ar {
                "يرجى إضافة صورة واحدة على الأقل".into()
            } else {
                "Please add at least one photo".into()
            }
        }
        ValidationError::TooManyImages { max, .. } => {
            if ar {
                format!("يمكنك إضافة {max} صور كحد أقصى")
            } else {
                format!("You can add up to {max} photos")
            }
        }
        ValidationError::ImagesTooLarge { max, .. } => {
            let mb = max / (1024 * 1024);
            if ar {
                format!("حجم الصور الإجمالي يتجاوز {mb} ميغابايت. يرجى حذف بعض الصور")
            } else {
                format!("Photos exceed {mb} MB in total. Please remove some")
            }
        }
    }
}

#[must_use]
pub fn error_message(kind: ErrorKind, language: Language) -> &'static str {
    match (kind, language) {
        (ErrorKind::Network, Language::English) => {
            "Unable to connect. Please check your internet connection and try again."
        }
        (ErrorKind::Network, Language::Arabic) => "تعذر الاتصال. يرجى التحقق من الإنترنت والمحاولة مجدداً.",
        (ErrorKind::Timeout, Language::English) => "The request timed out. Please try again.",
        (ErrorKind::Timeout, Language::Arabic) => "انتهت مهلة الطلب. يرجى المحاولة مجدداً.",
        (ErrorKind::Authentication, Language::English) => "Your session has expired. Please sign in again.",
        (ErrorKind::Authentication, Language::Arabic) => "انتهت الجلسة. يرجى تسجيل الدخول مجدداً.",
        (ErrorKind::Authorization, Language::English) => "You don't have permission to post this ad.",
        (ErrorKind::Authorization, Language::Arabic) => "ليس لديك صلاحية لنشر هذا الإعلان.",
        (ErrorKind::Validation, Language::English) => "Some details are missing or invalid.",
        (ErrorKind::Validation, Language::Arabic) => "بعض المعلومات ناقصة أو غير صالحة.",
        (ErrorKind::PayloadTooLarge, Language::English) => "The photos are too large. Please remove some and try again.",
        (ErrorKind::PayloadTooLarge, Language::Arabic) => "حجم الصور كبير جداً. يرجى حذف بعضها والمحاولة مجدداً.",
        (ErrorKind::RateLimited, Language::English) => "Too many requests. Please wait a moment and try again.",
        (ErrorKind::RateLimited, Language::Arabic) => "طلبات كثيرة. يرجى الانتظار قليلاً والمحاولة مجدداً.",
        (ErrorKind::Server, Language::English) => "The server could not publish your ad. Please try again later.",
        (ErrorKind::Server, Language::Arabic) => "تعذر على الخادم نشر إعلانك. يرجى المحاولة لاحقاً.",
        (ErrorKind::PermissionDenied, Language::English) => {
            "Photo access is required. Please enable it in Settings."
        }
        (ErrorKind::PermissionDenied, Language::Arabic) => "يلزم السماح بالوصول إلى الصور. يرجى تفعيله من الإعدادات.",
        (ErrorKind::InvalidConfig, Language::English) => "The app is misconfigured. Please update the app.",
        (ErrorKind::InvalidConfig, Language::Arabic) => "إعدادات التطبيق غير صحيحة. يرجى تحديث التطبيق.",
        (ErrorKind::Internal | ErrorKind::Unknown, Language::English) => {
            "An unexpected error occurred. Please try again."
        }
        (ErrorKind::Internal | ErrorKind::Unknown, Language::Arabic) => "حدث خطأ غير متوقع. يرجى المحاولة مجدداً.",
    }
}

/// Something the user should be told about in a toast.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    ListingPublished,
    SubmissionFailed { kind: ErrorKind },
    ValidationFailed { error: ValidationError },
    MediaPermissionDenied,
    ImagesDropped { count: usize, max: usize },
    ImageRejected { file_name: String, max_bytes: usize },
    SelectMakeFirst,
}

impl Notice {
    #[must_use]
    pub fn text(&self, language: Language) -> String {
        let ar = language == Language::Arabic;
        match self {
            Notice::ListingPublished => {
                if ar {
                    "تم نشر إعلانك بنجاح".into()
                } else {
                    "Your ad has been published".into()
                }
            }
            Notice::SubmissionFailed { kind } => error_message(*kind, language).into(),
            Notice::ValidationFailed { error } => validation_message(error, language),
            Notice::MediaPermissionDenied => error_message(ErrorKind::PermissionDenied, language).into(),
            Notice::ImagesDropped { count, max } => {
                if ar {
                    format!("تم تجاهل {count} صورة. الحد الأقصى {max} صور")
                } else {
                    format!("{count} photo(s) skipped. You can add up to {max} photos")
                }
            }
            Notice::ImageRejected {
                file_name,
                max_bytes,
            } => {
                let mb = max_bytes / (1024 * 1024);
                if ar {
                    format!("الصورة {file_name} كبيرة جداً (الحد الأقصى {mb} ميغابايت)")
                } else {
                    format!("{file_name} is too large (max {mb} MB)")
                }
            }
            Notice::SelectMakeFirst => {
                if ar {
                    "يرجى اختيار الماركة أولاً".into()
                } else {
                    "Please choose a make first".into()
                }
            }
        }
    }
}
