//! Statements from `sql/queries/account.sql`.

use crate::catalog::{NamedQuery, QueryKind};
use crate::client::GenericClient;
use crate::error::DbResult;
use crate::models::{Account, AccountColumns};
use crate::result::{ExecResult, ResultSet};
use crate::row::FromRow;
use crate::sql::sql;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tokio_postgres::Row;

pub const GET_ACCOUNT: &str = "-- name: GetAccount :one
SELECT pk, id, display_name, email FROM account WHERE id = $1";

pub const LIST_ACCOUNTS: &str = "-- name: ListAccounts :many
SELECT account.pk AS account_pk, account.id AS account_id, account.display_name AS account_display_name, account.email AS account_email FROM account";

pub const CREATE_ACCOUNT: &str = "-- name: CreateAccount :exec
INSERT INTO account (id, display_name, email)
VALUES ($1, $2, $3)";

pub const UPDATE_ACCOUNT_DISPLAY_NAME: &str = "-- name: UpdateAccountDisplayName :one
UPDATE account
SET display_name = $1
WHERE id = $2
RETURNING pk, id, display_name, email";

/// `GetAccounts` as written, with a single-placeholder `IN` group.
pub const GET_ACCOUNTS: &str = "-- name: GetAccounts :many
SELECT pk, id, display_name, email FROM account WHERE id IN ($1)";

/// [`GET_ACCOUNTS`] up to its `IN` group; the group is appended per call.
const GET_ACCOUNTS_HEAD: &str = "-- name: GetAccounts :many
SELECT pk, id, display_name, email FROM account WHERE id IN (";

pub const CATALOG: &[NamedQuery] = &[
    NamedQuery::embedded("GetAccount", QueryKind::One, GET_ACCOUNT),
    NamedQuery::embedded("ListAccounts", QueryKind::Many, LIST_ACCOUNTS),
    NamedQuery::embedded("CreateAccount", QueryKind::Exec, CREATE_ACCOUNT),
    NamedQuery::embedded(
        "UpdateAccountDisplayName",
        QueryKind::One,
        UPDATE_ACCOUNT_DISPLAY_NAME,
    ),
    NamedQuery::embedded("GetAccounts", QueryKind::Many, GET_ACCOUNTS),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAccountParams {
    pub account_id: String,
}

pub type GetAccountRow = Account;

/// Look up one account by its external id. A missing id is `Ok(None)`.
pub async fn get_account(
    conn: &impl GenericClient,
    params: &GetAccountParams,
) -> DbResult<Option<GetAccountRow>> {
    let row = conn
        .query_opt_tagged("GetAccount", GET_ACCOUNT, &[&params.account_id])
        .await?;
    row.as_ref().map(GetAccountRow::from_row).transpose()
}

/// A `ListAccounts` row: the whole account, read from `account_`-prefixed columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAccountsRow {
    pub account: Account,
}

impl FromRow for ListAccountsRow {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            account: Account::from_row_columns(row, &AccountColumns::PREFIXED)?,
        })
    }
}

/// Every account, in whatever order the table yields them.
pub async fn list_accounts(conn: &impl GenericClient) -> DbResult<ResultSet<ListAccountsRow>> {
    let start = Instant::now();
    let rows = conn.query_tagged("ListAccounts", LIST_ACCOUNTS, &[]).await?;
    let results = rows
        .iter()
        .map(ListAccountsRow::from_row)
        .collect::<DbResult<Vec<_>>>()?;
    Ok(ResultSet::new(results, start.elapsed()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountParams {
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
}

/// Insert an account. A duplicate `id` comes back as the server's unique violation
/// (see [`DbError::is_unique_violation`](crate::DbError::is_unique_violation)).
pub async fn create_account(
    conn: &impl GenericClient,
    params: &CreateAccountParams,
) -> DbResult<ExecResult> {
    let start = Instant::now();
    let changes = conn
        .execute_tagged(
            "CreateAccount",
            CREATE_ACCOUNT,
            &[&params.id, &params.display_name, &params.email],
        )
        .await?;
    Ok(ExecResult::new(changes, start.elapsed()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountDisplayNameParams {
    pub display_name: String,
    pub id: String,
}

pub type UpdateAccountDisplayNameRow = Account;

/// Rename an account and return the updated row, or `None` when no row has `id`.
pub async fn update_account_display_name(
    conn: &impl GenericClient,
    params: &UpdateAccountDisplayNameParams,
) -> DbResult<Option<UpdateAccountDisplayNameRow>> {
    let row = conn
        .query_opt_tagged(
            "UpdateAccountDisplayName",
            UPDATE_ACCOUNT_DISPLAY_NAME,
            &[&params.display_name, &params.id],
        )
        .await?;
    row.as_ref()
        .map(UpdateAccountDisplayNameRow::from_row)
        .transpose()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAccountsParams {
    pub ids: Vec<String>,
}

pub type GetAccountsRow = Account;

/// Fetch the accounts whose id is in `params.ids`, in one statement.
///
/// The `IN` group gets one placeholder per id, bound in input order. An empty `ids` is
/// rejected with [`DbError::EmptyParamList`](crate::DbError::EmptyParamList) before
/// anything is sent.
pub async fn get_accounts(
    conn: &impl GenericClient,
    params: &GetAccountsParams,
) -> DbResult<ResultSet<GetAccountsRow>> {
    let mut q = sql(GET_ACCOUNTS_HEAD).tagged("GetAccounts");
    q.try_push_bind_list("ids", params.ids.iter().cloned())?
        .push(")");

    let start = Instant::now();
    let results = q.fetch_all_as::<GetAccountsRow>(conn).await?;
    Ok(ResultSet::new(results, start.elapsed()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_annotated_sql;
    use crate::error::DbError;
    use crate::sql::highest_placeholder;
    use crate::test_support::RecordingClient;

    const SOURCE: &str = include_str!("../../sql/queries/account.sql");

    fn ids(raw: &[&str]) -> GetAccountsParams {
        GetAccountsParams {
            ids: raw.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn catalog_matches_source_file() {
        let parsed = parse_annotated_sql(SOURCE).unwrap();
        assert_eq!(parsed.len(), CATALOG.len());

        for (source, embedded) in parsed.iter().zip(CATALOG) {
            assert_eq!(source.name, embedded.name);
            assert_eq!(source.kind, embedded.kind);
            assert_eq!(source.body(), embedded.body(), "{} drifted", embedded.name);
            assert!(embedded.sql.starts_with(&embedded.header()));
        }
    }

    #[test]
    fn catalog_names_match_functions() {
        let names: Vec<String> = CATALOG.iter().map(NamedQuery::fn_name).collect();
        assert_eq!(
            names,
            [
                "get_account",
                "list_accounts",
                "create_account",
                "update_account_display_name",
                "get_accounts",
            ]
        );
    }

    #[test]
    fn get_accounts_head_is_template_prefix() {
        assert_eq!(format!("{GET_ACCOUNTS_HEAD}$1)"), GET_ACCOUNTS);
    }

    #[test]
    fn params_use_api_field_names() {
        let params = CreateAccountParams {
            id: "a".to_string(),
            display_name: "Ada".to_string(),
            email: None,
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({ "id": "a", "displayName": "Ada", "email": null })
        );

        let lookup: GetAccountParams =
            serde_json::from_value(serde_json::json!({ "accountId": "a" })).unwrap();
        assert_eq!(lookup.account_id, "a");
    }

    #[tokio::test]
    async fn get_account_missing_is_none() {
        let client = RecordingClient::new();
        let params = GetAccountParams {
            account_id: "missing-id".to_string(),
        };

        assert_eq!(get_account(&client, &params).await.unwrap(), None);

        let call = client.single_call();
        assert_eq!(call.tag.as_deref(), Some("GetAccount"));
        assert_eq!(call.sql, GET_ACCOUNT);
        assert_eq!(call.params, vec!["\"missing-id\""]);
    }

    #[tokio::test]
    async fn list_accounts_empty_is_ok() {
        let client = RecordingClient::new();
        let set = list_accounts(&client).await.unwrap();

        assert!(set.is_empty());
        assert_eq!(set.meta.rows_read, 0);
        let call = client.single_call();
        assert_eq!(call.tag.as_deref(), Some("ListAccounts"));
        assert_eq!(call.sql, LIST_ACCOUNTS);
        assert!(call.params.is_empty());
    }

    #[tokio::test]
    async fn create_account_binds_in_column_order() {
        let client = RecordingClient::with_affected(1);
        let params = CreateAccountParams {
            id: "acct-1".to_string(),
            display_name: "Ada".to_string(),
            email: None,
        };

        let result = create_account(&client, &params).await.unwrap();
        assert_eq!(result.changes(), 1);
        assert_eq!(result.meta.rows_read, 0);

        let call = client.single_call();
        assert_eq!(call.tag.as_deref(), Some("CreateAccount"));
        assert_eq!(call.sql, CREATE_ACCOUNT);
        assert_eq!(call.params, vec!["\"acct-1\"", "\"Ada\"", "None"]);
    }

    #[tokio::test]
    async fn create_account_passes_errors_through() {
        let client = RecordingClient::failing("connection refused");
        let params = CreateAccountParams {
            id: "acct-1".to_string(),
            display_name: "Ada".to_string(),
            email: Some("ada@example.com".to_string()),
        };

        let err = create_account(&client, &params).await.unwrap_err();
        assert!(matches!(err, DbError::Other(ref m) if m == "connection refused"));
        assert_eq!(
            client.single_call().params[2],
            "Some(\"ada@example.com\")"
        );
    }

    #[tokio::test]
    async fn update_binds_display_name_then_id() {
        let client = RecordingClient::new();
        let params = UpdateAccountDisplayNameParams {
            display_name: "Grace".to_string(),
            id: "missing".to_string(),
        };

        assert_eq!(
            update_account_display_name(&client, &params).await.unwrap(),
            None
        );

        let call = client.single_call();
        assert_eq!(call.tag.as_deref(), Some("UpdateAccountDisplayName"));
        assert_eq!(call.sql, UPDATE_ACCOUNT_DISPLAY_NAME);
        assert_eq!(call.params, vec!["\"Grace\"", "\"missing\""]);
    }

    #[tokio::test]
    async fn get_accounts_single_id_renders_template() {
        let client = RecordingClient::new();
        get_accounts(&client, &ids(&["a"])).await.unwrap();

        let call = client.single_call();
        assert_eq!(call.sql, GET_ACCOUNTS);
        assert_eq!(call.params, vec!["\"a\""]);
    }

    #[tokio::test]
    async fn get_accounts_expands_in_group() {
        let client = RecordingClient::new();
        let set = get_accounts(&client, &ids(&["a", "b", "c"])).await.unwrap();
        assert!(set.is_empty());

        let call = client.single_call();
        assert_eq!(call.tag.as_deref(), Some("GetAccounts"));
        assert_eq!(
            call.sql,
            "-- name: GetAccounts :many\n\
             SELECT pk, id, display_name, email FROM account WHERE id IN ($1, $2, $3)"
        );
        assert_eq!(call.params, vec!["\"a\"", "\"b\"", "\"c\""]);
    }

    #[tokio::test]
    async fn get_accounts_placeholders_match_ids() {
        for n in 1..=20usize {
            let client = RecordingClient::new();
            let raw: Vec<String> = (0..n).map(|i| format!("id-{}", n - i)).collect();
            let params = GetAccountsParams { ids: raw.clone() };

            get_accounts(&client, &params).await.unwrap();

            let call = client.single_call();
            assert_eq!(highest_placeholder(&call.sql), n);
            assert_eq!(call.sql.matches('$').count(), n);
            let expected: Vec<String> = raw.iter().map(|s| format!("{s:?}")).collect();
            assert_eq!(call.params, expected);
        }
    }

    #[tokio::test]
    async fn get_accounts_rejects_empty_ids_without_sending() {
        let client = RecordingClient::new();
        let err = get_accounts(&client, &ids(&[])).await.unwrap_err();

        assert!(matches!(err, DbError::EmptyParamList { param: "ids" }));
        assert!(err.is_caller_error());
        assert!(client.calls().is_empty());
    }
}
