use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[cfg(feature = "database")]
use sea_orm::Value;

/// Authorization role attached to every profile
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::ValueType for Role {
    fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            Value::String(Some(s)) => s.parse().map_err(|_| sea_orm::sea_query::ValueTypeErr),
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "Role".to_string()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::String
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        sea_orm::sea_query::ColumnType::Text
    }
}

#[cfg(feature = "database")]
impl From<Role> for Value {
    fn from(role: Role) -> Self {
        Value::String(Some(Box::new(role.as_str().to_owned())))
    }
}

#[cfg(feature = "database")]
impl sea_orm::TryGetable for Role {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let val: String = res.try_get_by(index)?;

        val.parse().map_err(|_| {
            sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(format!("Unknown role: {val}")))
        })
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::Nullable for Role {
    fn null() -> Value {
        Value::String(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trips_through_strings() {
        assert_eq!(Role::from_str("admin"), Ok(Role::Admin));
        assert_eq!(Role::from_str("user"), Ok(Role::User));
        assert!(Role::from_str("moderator").is_err());
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn test_default_role_is_not_admin() {
        assert!(!Role::default().is_admin());
    }
}
