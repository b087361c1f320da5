//! Validation of event payloads.
//!
//! A payload passes three stages, each producing [`Violation`]s:
//!
//! 1. binding: the body must be a JSON object with only known properties
//!    (see [`binding_violations`])
//! 2. field rules: required fields, non-blank texts, non-negative numbers
//! 3. business rules: price and date ordering, checked only when the
//!    earlier stages found nothing
//!
//! Violations are collected, never fail-fast.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::{Hal, Links};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_path_to_error::Segment;
use std::error::Error;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::EventDraft;

/// `objectName` of every payload violation.
pub const OBJECT_NAME: &str = "eventDto";

/// Payload properties in declaration order, used to order violations.
const FIELDS: [&str; 10] = [
    "name",
    "description",
    "beginEnrollmentDateTime",
    "closeEnrollmentDateTime",
    "beginEventDateTime",
    "endEventDateTime",
    "location",
    "basePrice",
    "maxPrice",
    "limitOfEnrollment",
];

/// Create and update payload.
///
/// Every property is optional at the type level so that missing fields
/// surface as `required` violations. `id`, `eventStatus`, `free` and
/// `offline` are server-owned and rejected as unknown properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventDto {
    #[validate(
        required(code = "required", message = "must not be null"),
        custom(function = "not_blank")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[validate(
        required(code = "required", message = "must not be null"),
        custom(function = "not_blank")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[validate(required(code = "required", message = "must not be null"))]
    #[serde(
        default,
        deserialize_with = "local_date_time::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, example = "2023-11-16T00:00:00")]
    pub begin_enrollment_date_time: Option<NaiveDateTime>,

    #[validate(required(code = "required", message = "must not be null"))]
    #[serde(
        default,
        deserialize_with = "local_date_time::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, example = "2023-11-16T23:59:00")]
    pub close_enrollment_date_time: Option<NaiveDateTime>,

    #[validate(required(code = "required", message = "must not be null"))]
    #[serde(
        default,
        deserialize_with = "local_date_time::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, example = "2023-11-17T23:59:00")]
    pub begin_event_date_time: Option<NaiveDateTime>,

    #[validate(required(code = "required", message = "must not be null"))]
    #[serde(
        default,
        deserialize_with = "local_date_time::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, example = "2023-11-18T23:59:00")]
    pub end_event_date_time: Option<NaiveDateTime>,

    /// Blank or `no location` marks an online event
    #[validate(required(code = "required", message = "must not be null"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[validate(
        required(code = "required", message = "must not be null"),
        range(min = 0, code = "min", message = "must be greater than or equal to 0")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_price: Option<i32>,

    /// Zero means no upper bound
    #[validate(
        required(code = "required", message = "must not be null"),
        range(min = 0, code = "min", message = "must be greater than or equal to 0")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<i32>,

    #[validate(
        required(code = "required", message = "must not be null"),
        range(min = 0, code = "min", message = "must be greater than or equal to 0")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_of_enrollment: Option<i32>,
}

impl EventDto {
    /// `None` while any field is missing.
    fn into_draft(self) -> Option<EventDraft> {
        Some(EventDraft {
            name: self.name?,
            description: self.description?,
            begin_enrollment_date_time: self.begin_enrollment_date_time?,
            close_enrollment_date_time: self.close_enrollment_date_time?,
            begin_event_date_time: self.begin_event_date_time?,
            end_event_date_time: self.end_event_date_time?,
            location: self.location?,
            base_price: self.base_price?,
            max_price: self.max_price?,
            limit_of_enrollment: self.limit_of_enrollment?,
        })
    }
}

impl From<EventDraft> for EventDto {
    fn from(draft: EventDraft) -> Self {
        Self {
            name: Some(draft.name),
            description: Some(draft.description),
            begin_enrollment_date_time: Some(draft.begin_enrollment_date_time),
            close_enrollment_date_time: Some(draft.close_enrollment_date_time),
            begin_event_date_time: Some(draft.begin_event_date_time),
            end_event_date_time: Some(draft.end_event_date_time),
            location: Some(draft.location),
            base_price: Some(draft.base_price),
            max_price: Some(draft.max_price),
            limit_of_enrollment: Some(draft.limit_of_enrollment),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("notBlank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// ISO-8601 local date-times, seconds optional.
mod local_date_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, de};

    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| {
                parse(&raw)
                    .ok_or_else(|| de::Error::custom(format!("invalid local date-time `{}`", raw)))
            })
            .transpose()
    }
}

/// One validation failure. Object errors have no `field`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub object_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: String,
    pub default_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub rejected_value: Option<Value>,
}

impl Violation {
    pub fn field(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
        rejected_value: Option<Value>,
    ) -> Self {
        Self {
            object_name: OBJECT_NAME.to_string(),
            field: Some(field.into()),
            code: code.into(),
            default_message: message.into(),
            rejected_value,
        }
    }

    pub fn object(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            object_name: OBJECT_NAME.to_string(),
            field: None,
            code: code.into(),
            default_message: message.into(),
            rejected_value: None,
        }
    }

    /// Page parameters that do not parse, e.g. `page=abc`.
    pub fn invalid_page_query(message: impl Into<String>) -> Self {
        Self {
            object_name: "pageRequest".to_string(),
            field: None,
            code: "invalidFormat".to_string(),
            default_message: message.into(),
            rejected_value: None,
        }
    }

    pub fn invalid_sort(sort: &str) -> Self {
        Self {
            object_name: "pageRequest".to_string(),
            field: Some("sort".to_string()),
            code: "invalidSort".to_string(),
            default_message: "unknown sort property or direction".to_string(),
            rejected_value: Some(Value::String(sort.to_string())),
        }
    }
}

/// 400 body: the violations plus a link back to the API root.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Rejection {
    pub errors: Vec<Violation>,
    #[serde(rename = "_links")]
    #[schema(value_type = Object)]
    pub links: Links,
}

impl Rejection {
    pub fn new(errors: Vec<Violation>, links: Links) -> Self {
        Self { errors, links }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Hal(self)).into_response()
    }
}

/// `basePrice` to `basePrice`, `base_price` to `basePrice`.
fn json_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn field_violations(errors: &ValidationErrors) -> Vec<Violation> {
    let mut violations: Vec<(usize, Violation)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(key, list)| {
            let field = json_name(key.as_ref());
            let rank = FIELDS
                .iter()
                .position(|f| *f == field)
                .unwrap_or(FIELDS.len());
            list.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                let rejected = error.params.get("value").filter(|v| !v.is_null()).cloned();
                (
                    rank,
                    Violation::field(field.clone(), error.code.to_string(), message, rejected),
                )
            })
        })
        .collect();

    violations.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.code.cmp(&b.1.code)));
    violations.into_iter().map(|(_, v)| v).collect()
}

/// Cross-field rules on a complete payload.
pub fn business_violations(draft: &EventDraft) -> Vec<Violation> {
    let mut violations = Vec::new();

    if draft.max_price > 0 && draft.base_price > draft.max_price {
        violations.push(Violation::object(
            "wrongPrices",
            "basePrice must not exceed maxPrice",
        ));
    }

    if draft.end_event_date_time < draft.begin_event_date_time
        || draft.begin_event_date_time < draft.close_enrollment_date_time
        || draft.close_enrollment_date_time < draft.begin_enrollment_date_time
    {
        violations.push(Violation::object(
            "wrongDates",
            "event dates are out of order",
        ));
    }

    violations
}

/// Field rules, then business rules. Pure; `Ok` carries the complete draft.
pub fn validate_event(dto: EventDto) -> Result<EventDraft, Vec<Violation>> {
    if let Err(errors) = dto.validate() {
        return Err(field_violations(&errors));
    }

    let draft = dto.into_draft().ok_or_else(|| {
        vec![Violation::object(
            "required",
            "all event properties must be present",
        )]
    })?;

    let violations = business_violations(&draft);
    if violations.is_empty() {
        Ok(draft)
    } else {
        Err(violations)
    }
}

/// Deserialization failure with the path of the offending property.
type PathError = serde_path_to_error::Error<serde_json::Error>;

/// Maps a JSON extractor rejection to binding violations.
pub fn binding_violations(rejection: &JsonRejection) -> Vec<Violation> {
    let violation = match rejection {
        JsonRejection::MissingJsonContentType(_) => Violation::object(
            "unsupportedMediaType",
            "Content-Type must be application/json",
        ),
        JsonRejection::JsonDataError(e) => match path_error(e) {
            Some(err) => data_violation(err),
            None => Violation::object("invalidFormat", e.body_text()),
        },
        JsonRejection::JsonSyntaxError(_) => {
            Violation::object("invalidFormat", "request body is not valid JSON")
        }
        other => Violation::object("invalidFormat", other.body_text()),
    };
    vec![violation]
}

/// First error in the source chain that carries a property path.
fn path_error<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a PathError> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(found) = err.downcast_ref::<PathError>() {
            return Some(found);
        }
        current = err.source();
    }
    None
}

/// Classifies a data error by its path: a property outside the payload is
/// unknown, anything else has the wrong shape.
fn data_violation(err: &PathError) -> Violation {
    let property = err.path().iter().find_map(|segment| match segment {
        Segment::Map { key } => Some(key.as_str()),
        _ => None,
    });

    match property {
        Some(key) if !FIELDS.contains(&key) => {
            Violation::field(key, "unknownField", "unknown or read-only property", None)
        }
        Some(key) => Violation::field(key, "invalidFormat", err.inner().to_string(), None),
        None => Violation::object("invalidFormat", err.inner().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "name": "Spring",
            "description": "REST API Development with Spring",
            "beginEnrollmentDateTime": "2023-11-16T00:00:00",
            "closeEnrollmentDateTime": "2023-11-16T23:59:00",
            "beginEventDateTime": "2023-11-17T23:59:00",
            "endEventDateTime": "2023-11-18T23:59:00",
            "basePrice": 100,
            "maxPrice": 200,
            "limitOfEnrollment": 100,
            "location": "Kim's House"
        })
    }

    fn dto(value: Value) -> EventDto {
        serde_json::from_value(value).unwrap()
    }

    fn codes(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(|v| v.code.as_str()).collect()
    }

    #[test]
    fn test_valid_payload_passes() {
        let draft = validate_event(dto(valid())).unwrap();
        assert_eq!(draft.name, "Spring");
        assert_eq!(draft.max_price, 200);
    }

    #[test]
    fn test_minutes_only_date_times_accepted() {
        let mut value = valid();
        value["beginEnrollmentDateTime"] = json!("2023-11-16T00:00");
        assert!(validate_event(dto(value)).is_ok());
    }

    #[test]
    fn test_empty_payload_reports_every_field() {
        let violations = validate_event(EventDto::default()).unwrap_err();

        assert_eq!(violations.len(), FIELDS.len());
        assert!(violations.iter().all(|v| v.code == "required"));
        let fields: Vec<_> = violations
            .iter()
            .map(|v| v.field.clone().unwrap())
            .collect();
        assert_eq!(fields, FIELDS.to_vec());
        assert!(violations.iter().all(|v| v.object_name == "eventDto"));
    }

    #[test]
    fn test_blank_and_negative_fields() {
        let mut value = valid();
        value["name"] = json!("  ");
        value["basePrice"] = json!(-1);

        let violations = validate_event(dto(value)).unwrap_err();
        assert_eq!(codes(&violations), vec!["notBlank", "min"]);
        assert_eq!(violations[1].field.as_deref(), Some("basePrice"));
        assert_eq!(violations[1].rejected_value, Some(json!(-1)));
    }

    #[test]
    fn test_wrong_prices() {
        let mut value = valid();
        value["basePrice"] = json!(100000);
        value["maxPrice"] = json!(10000);

        let violations = validate_event(dto(value)).unwrap_err();
        assert_eq!(codes(&violations), vec!["wrongPrices"]);
        assert!(violations[0].field.is_none());
    }

    #[test]
    fn test_unlimited_max_price_allows_any_base() {
        let mut value = valid();
        value["basePrice"] = json!(100000);
        value["maxPrice"] = json!(0);
        assert!(validate_event(dto(value)).is_ok());
    }

    #[test]
    fn test_wrong_dates_reported_once() {
        let mut value = valid();
        value["beginEventDateTime"] = json!("2023-11-12T23:59:00");
        value["endEventDateTime"] = json!("2023-11-11T23:59:00");

        let violations = validate_event(dto(value)).unwrap_err();
        assert_eq!(codes(&violations), vec!["wrongDates"]);
    }

    #[test]
    fn test_business_rules_skipped_when_fields_invalid() {
        let mut value = valid();
        value["basePrice"] = json!(100000);
        value["maxPrice"] = json!(10000);
        value["name"] = json!("");

        let violations = validate_event(dto(value)).unwrap_err();
        assert_eq!(codes(&violations), vec!["notBlank"]);
    }

    #[test]
    fn test_server_owned_properties_rejected() {
        for property in ["id", "eventStatus", "free", "offline"] {
            let mut value = valid();
            value[property] = json!(true);
            let err = serde_json::from_value::<EventDto>(value).unwrap_err();
            assert!(err.to_string().contains(property), "{}", err);
        }
    }

    fn bind(value: Value) -> Vec<Violation> {
        let bytes = serde_json::to_vec(&value).unwrap();
        let rejection = axum::Json::<EventDto>::from_bytes(&bytes).unwrap_err();
        binding_violations(&rejection)
    }

    #[test]
    fn test_binding_unknown_property() {
        let mut value = valid();
        value["free"] = json!(true);

        let violations = bind(value);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, "unknownField");
        assert_eq!(violations[0].field.as_deref(), Some("free"));
    }

    #[test]
    fn test_binding_wrong_type_names_the_property() {
        let mut value = valid();
        value["basePrice"] = json!("x");

        let violations = bind(value);
        assert_eq!(violations[0].code, "invalidFormat");
        assert_eq!(violations[0].field.as_deref(), Some("basePrice"));
        assert!(violations[0].default_message.contains("invalid type"));

        let mut value = valid();
        value["beginEventDateTime"] = json!("next tuesday");
        assert_eq!(bind(value)[0].field.as_deref(), Some("beginEventDateTime"));
    }

    #[test]
    fn test_binding_non_object_body() {
        let violations = bind(json!([1, 2, 3]));
        assert_eq!(violations[0].code, "invalidFormat");
        assert!(violations[0].field.is_none());
    }

    #[test]
    fn test_binding_syntax_error() {
        let rejection = axum::Json::<EventDto>::from_bytes(b"{\"name\": ").unwrap_err();
        let violations = binding_violations(&rejection);
        assert_eq!(violations[0].code, "invalidFormat");
        assert!(violations[0].field.is_none());
    }

    #[test]
    fn test_path_error_found_directly() {
        let json = r#"{"maxPrice": -1.5}"#;
        let err = serde_path_to_error::deserialize::<_, EventDto>(
            &mut serde_json::Deserializer::from_str(json),
        )
        .unwrap_err();

        assert!(path_error(&err).is_some());
        let violation = data_violation(&err);
        assert_eq!(violation.field.as_deref(), Some("maxPrice"));
        assert_eq!(violation.code, "invalidFormat");
    }

    #[test]
    fn test_json_name() {
        assert_eq!(json_name("limit_of_enrollment"), "limitOfEnrollment");
        assert_eq!(json_name("basePrice"), "basePrice");
    }
}
