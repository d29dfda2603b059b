//! Table models.

use crate::error::DbResult;
use crate::row::{FromRow, RowExt};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// A row of the `account` table.
///
/// Serializes with API field names (`displayName`); `email` is `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub pk: i64,
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
}

/// Storage column names an [`Account`] is read from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AccountColumns {
    pub pk: &'static str,
    pub id: &'static str,
    pub display_name: &'static str,
    pub email: &'static str,
}

impl AccountColumns {
    /// `SELECT pk, id, display_name, email`
    pub const PLAIN: Self = Self {
        pk: "pk",
        id: "id",
        display_name: "display_name",
        email: "email",
    };

    /// `SELECT account.pk AS account_pk, ...`
    pub const PREFIXED: Self = Self {
        pk: "account_pk",
        id: "account_id",
        display_name: "account_display_name",
        email: "account_email",
    };
}

impl Account {
    pub(crate) fn from_row_columns(row: &Row, cols: &AccountColumns) -> DbResult<Self> {
        Ok(Self {
            pk: row.try_get_column(cols.pk)?,
            id: row.try_get_column(cols.id)?,
            display_name: row.try_get_column(cols.display_name)?,
            email: row.try_get_column(cols.email)?,
        })
    }
}

impl FromRow for Account {
    fn from_row(row: &Row) -> DbResult<Self> {
        Self::from_row_columns(row, &AccountColumns::PLAIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_api_field_names() {
        let account = Account {
            pk: 7,
            id: "acct-7".to_string(),
            display_name: "Ada".to_string(),
            email: Some("ada@example.com".to_string()),
        };

        assert_eq!(
            serde_json::to_value(&account).unwrap(),
            json!({
                "pk": 7,
                "id": "acct-7",
                "displayName": "Ada",
                "email": "ada@example.com",
            })
        );
    }

    #[test]
    fn missing_email_is_null_not_empty() {
        let account = Account {
            pk: 1,
            id: "a".to_string(),
            display_name: "A".to_string(),
            email: None,
        };

        let value = serde_json::to_value(&account).unwrap();
        assert!(value["email"].is_null());

        let back: Account = serde_json::from_value(value).unwrap();
        assert_eq!(back.email, None);
    }

    #[test]
    fn prefixed_columns_map_one_to_one() {
        let plain = AccountColumns::PLAIN;
        let prefixed = AccountColumns::PREFIXED;
        for (p, q) in [
            (plain.pk, prefixed.pk),
            (plain.id, prefixed.id),
            (plain.display_name, prefixed.display_name),
            (plain.email, prefixed.email),
        ] {
            assert_eq!(format!("account_{p}"), q);
        }
    }
}
