use std::fmt;
use std::str::FromStr;

use crate::model::{ParameterLocation, PropertyType};

/// Supported output locales. Fixed once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Ru,
    En,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLocale(String);

impl fmt::Display for UnknownLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown locale: {} (expected ru or en)", self.0)
    }
}

impl std::error::Error for UnknownLocale {}

impl FromStr for Locale {
    type Err = UnknownLocale;

    /// Accepts a BCP-47-ish tag; only the primary subtag is significant,
    /// so `ru-RU` and `en_US` work.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .split(['-', '_'])
            .next()
            .unwrap_or(s)
            .to_ascii_lowercase();
        match primary.as_str() {
            "ru" => Ok(Locale::Ru),
            "en" => Ok(Locale::En),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

/// Localized strings for table headers, section labels, and the default
/// string-example placeholder.
#[derive(Debug)]
pub struct Messages {
    pub parameters_header: &'static str,
    pub request_header: &'static str,
    pub response_header: &'static str,
    pub request_example_header: &'static str,
    pub response_example_header: &'static str,
    pub th_type: &'static str,
    pub th_name: &'static str,
    pub th_description: &'static str,
    pub th_required: &'static str,
    pub loc_query: &'static str,
    pub loc_path: &'static str,
    pub loc_header: &'static str,
    pub loc_cookie: &'static str,
    pub ty_string: &'static str,
    pub ty_integer: &'static str,
    pub ty_number: &'static str,
    pub ty_boolean: &'static str,
    pub ty_object: &'static str,
    /// Pattern for array types; `{}` is replaced with the item label.
    pub ty_array_of: &'static str,
    pub default_string_example: &'static str,
}

static RU: Messages = Messages {
    parameters_header: "Параметры запроса",
    request_header: "Запрос",
    response_header: "Ответ",
    request_example_header: "Пример запроса",
    response_example_header: "Пример ответа",
    th_type: "Тип",
    th_name: "Название",
    th_description: "Описание",
    th_required: "Обязательный",
    loc_query: "запрос",
    loc_path: "путь",
    loc_header: "заголовок",
    loc_cookie: "cookie",
    ty_string: "строка",
    ty_integer: "число",
    ty_number: "число",
    ty_boolean: "логический",
    ty_object: "объект",
    ty_array_of: "массив {}",
    default_string_example: "пример строки",
};

static EN: Messages = Messages {
    parameters_header: "Request parameters",
    request_header: "Request",
    response_header: "Response",
    request_example_header: "Request example",
    response_example_header: "Response example",
    th_type: "Type",
    th_name: "Name",
    th_description: "Description",
    th_required: "Required",
    loc_query: "query",
    loc_path: "path",
    loc_header: "header",
    loc_cookie: "cookie",
    ty_string: "string",
    ty_integer: "integer",
    ty_number: "number",
    ty_boolean: "boolean",
    ty_object: "object",
    ty_array_of: "array of {}",
    default_string_example: "example string",
};

impl Messages {
    pub fn for_locale(locale: Locale) -> &'static Messages {
        match locale {
            Locale::Ru => &RU,
            Locale::En => &EN,
        }
    }

    pub fn parameter_location(&self, location: ParameterLocation) -> &'static str {
        match location {
            ParameterLocation::Query => self.loc_query,
            ParameterLocation::Path => self.loc_path,
            ParameterLocation::Header => self.loc_header,
            ParameterLocation::Cookie => self.loc_cookie,
        }
    }

    /// Localized label for a property type; array types embed the item
    /// label into the `ty_array_of` pattern.
    pub fn property_type(&self, type_name: PropertyType, item_label: Option<&str>) -> String {
        match type_name {
            PropertyType::String => self.ty_string.to_string(),
            PropertyType::Integer => self.ty_integer.to_string(),
            PropertyType::Number => self.ty_number.to_string(),
            PropertyType::Boolean => self.ty_boolean.to_string(),
            PropertyType::Object => self.ty_object.to_string(),
            PropertyType::Array => self
                .ty_array_of
                .replacen("{}", item_label.unwrap_or(self.ty_object), 1),
        }
    }
}
