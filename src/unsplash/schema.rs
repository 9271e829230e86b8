//! Field table and typed readers for the photo listing payload.

use std::fmt;

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// A key of the photo payload.
///
/// [`Field::wire_name`] is the single place where the names used on the wire
/// are spelled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Width,
    Height,
    CreatedAt,
    Description,
    LikedByUser,
    Urls,
    Thumb,
    Full,
}

impl Field {
    pub const fn wire_name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Width => "width",
            Field::Height => "height",
            Field::CreatedAt => "created_at",
            Field::Description => "description",
            Field::LikedByUser => "liked_by_user",
            Field::Urls => "urls",
            Field::Thumb => "thumb",
            Field::Full => "full",
        }
    }

    /// The object this field is nested in, if it is not a top-level key.
    pub const fn parent(self) -> Option<Field> {
        match self {
            Field::Thumb | Field::Full => Some(Field::Urls),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = self.parent() {
            write!(f, "{}.", parent)?;
        }

        f.write_str(self.wire_name())
    }
}

/// Shape of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl Kind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(n) if n.is_f64() => Kind::Float,
            Value::Number(_) => Kind::Integer,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::Integer => "integer",
            Kind::Float => "floating point number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    Missing,
    WrongType { expected: Kind, found: Kind },
    OutOfRange(Number),
    Empty,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Missing => f.write_str("key is missing"),
            Problem::WrongType { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            Problem::OutOfRange(n) => write!(f, "{} is not a valid dimension", n),
            Problem::Empty => f.write_str("must not be empty"),
        }
    }
}

/// A photo payload that does not match the expected schema.
///
/// `field` is `None` when the payload itself is not an object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid `{}`: {}", .field.map_or_else(|| "photo".to_owned(), |f| f.to_string()), .problem)]
pub struct SchemaViolation {
    field: Option<Field>,
    problem: Problem,
}

impl SchemaViolation {
    pub fn new(field: Option<Field>, problem: Problem) -> Self {
        Self { field, problem }
    }

    pub fn field(&self) -> Option<Field> {
        self.field
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    fn wrong_type(field: Option<Field>, expected: Kind, found: &Value) -> Self {
        Self::new(
            field,
            Problem::WrongType {
                expected,
                found: Kind::of(found),
            },
        )
    }
}

/// Borrowed view over one JSON object, reading keys through [`Field`].
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(field: Option<Field>, value: &'a Value) -> Result<Self, SchemaViolation> {
        match value {
            Value::Object(map) => Ok(Self { map }),

            other => Err(SchemaViolation::wrong_type(field, Kind::Object, other)),
        }
    }

    fn required(&self, field: Field) -> Result<&'a Value, SchemaViolation> {
        self.map
            .get(field.wire_name())
            .ok_or(SchemaViolation::new(Some(field), Problem::Missing))
    }

    pub fn string(&self, field: Field) -> Result<String, SchemaViolation> {
        match self.required(field)? {
            Value::String(s) => Ok(s.clone()),

            other => Err(SchemaViolation::wrong_type(Some(field), Kind::String, other)),
        }
    }

    pub fn non_empty_string(&self, field: Field) -> Result<String, SchemaViolation> {
        let s = self.string(field)?;
        if s.is_empty() {
            return Err(SchemaViolation::new(Some(field), Problem::Empty));
        }

        Ok(s)
    }

    /// Absent and `null` both read as `None`.
    pub fn optional_string(&self, field: Field) -> Result<Option<String>, SchemaViolation> {
        match self.map.get(field.wire_name()) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),

            Some(other) => Err(SchemaViolation::wrong_type(Some(field), Kind::String, other)),
        }
    }

    pub fn dimension(&self, field: Field) -> Result<u32, SchemaViolation> {
        match self.required(field)? {
            Value::Number(n) if !n.is_f64() => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| SchemaViolation::new(Some(field), Problem::OutOfRange(n.clone()))),

            other => Err(SchemaViolation::wrong_type(Some(field), Kind::Integer, other)),
        }
    }

    pub fn bool(&self, field: Field) -> Result<bool, SchemaViolation> {
        match self.required(field)? {
            Value::Bool(b) => Ok(*b),

            other => Err(SchemaViolation::wrong_type(Some(field), Kind::Bool, other)),
        }
    }

    pub fn object(&self, field: Field) -> Result<Fields<'a>, SchemaViolation> {
        Fields::new(Some(field), self.required(field)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn nested_fields_display_their_path() {
        assert_eq!(Field::Thumb.to_string(), "urls.thumb");
        assert_eq!(Field::LikedByUser.to_string(), "liked_by_user");
    }

    #[test]
    fn kind_distinguishes_integers_from_floats() {
        assert_eq!(Kind::of(&json!(3)), Kind::Integer);
        assert_eq!(Kind::of(&json!(-3)), Kind::Integer);
        assert_eq!(Kind::of(&json!(3.5)), Kind::Float);
    }

    #[test]
    fn violation_message_names_field_and_shapes() {
        let value = json!({ "width": "wide" });
        let fields = Fields::new(None, &value).unwrap();
        let err = fields.dimension(Field::Width).unwrap_err();

        assert_eq!(
            err.to_string(),
            "invalid `width`: expected integer, found string"
        );
    }

    #[test]
    fn root_violation_is_reported_as_photo() {
        let err = Fields::new(None, &json!([1, 2])).err().unwrap();

        assert_eq!(err.field(), None);
        assert_eq!(err.to_string(), "invalid `photo`: expected object, found array");
    }

    #[test]
    fn dimension_rejects_negative_and_oversized_values() {
        let value = json!({ "width": -1, "height": 5_000_000_000u64 });
        let fields = Fields::new(None, &value).unwrap();

        assert!(matches!(
            fields.dimension(Field::Width).unwrap_err().problem(),
            Problem::OutOfRange(_)
        ));
        assert!(matches!(
            fields.dimension(Field::Height).unwrap_err().problem(),
            Problem::OutOfRange(_)
        ));
    }
}
