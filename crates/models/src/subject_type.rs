use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use strum::{AsRefStr, EnumIter, EnumProperty, EnumString, IntoEnumIterator};

#[cfg(feature = "database")]
use sea_orm::Value;

/// The curriculum category a subject belongs to
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    AsRefStr,
    EnumProperty,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubjectType {
    #[strum(props(label = "Básica"))]
    Basica,
    #[strum(props(label = "Profesional"))]
    Profesional,
    #[strum(props(label = "Optativa"))]
    Optativa,
    #[strum(props(label = "Formación General Universitaria"))]
    FormacionGeneral,
    #[strum(props(label = "Libre Elección"))]
    LibreEleccion,
}

impl SubjectType {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    /// Human readable name shown in forms and listings
    pub fn label(&self) -> &'static str {
        self.get_str("label").unwrap_or_default()
    }

    pub fn all() -> Vec<SubjectType> {
        SubjectType::iter().collect()
    }
}

impl Display for SubjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::ValueType for SubjectType {
    fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            Value::String(Some(s)) => s.parse().map_err(|_| sea_orm::sea_query::ValueTypeErr),
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "SubjectType".to_string()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::String
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        sea_orm::sea_query::ColumnType::Text
    }
}

#[cfg(feature = "database")]
impl From<SubjectType> for Value {
    fn from(subject_type: SubjectType) -> Self {
        Value::String(Some(Box::new(subject_type.as_str().to_owned())))
    }
}

#[cfg(feature = "database")]
impl sea_orm::TryGetable for SubjectType {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let val: String = res.try_get_by(index)?;

        val.parse().map_err(|_| {
            sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(format!(
                "Unknown subject type: {val}"
            )))
        })
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::Nullable for SubjectType {
    fn null() -> Value {
        Value::String(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_known_types() {
        assert_eq!(SubjectType::from_str("basica"), Ok(SubjectType::Basica));
        assert_eq!(
            SubjectType::from_str("formacion_general"),
            Ok(SubjectType::FormacionGeneral)
        );
        assert!(SubjectType::from_str("Basica").is_err());
        assert!(SubjectType::from_str("laboratorio").is_err());
    }

    #[test]
    fn test_serde_matches_strum() {
        for subject_type in SubjectType::all() {
            let json = serde_json::to_string(&subject_type).unwrap();
            assert_eq!(json, format!("\"{}\"", subject_type.as_str()));
        }
    }

    #[test]
    fn test_every_type_has_a_label() {
        assert!(SubjectType::all().iter().all(|t| !t.label().is_empty()));
        assert_eq!(SubjectType::LibreEleccion.label(), "Libre Elección");
    }
}
