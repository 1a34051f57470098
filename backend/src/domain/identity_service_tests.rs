//! Tests for the identity and nickname service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockSheetRangeClient, SheetClientError};

fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
    cells
        .iter()
        .map(|row| row.iter().map(|cell| (*cell).to_owned()).collect())
        .collect()
}

#[fixture]
fn table() -> SheetTable {
    SheetTable::new("users-doc", "Users", 0)
}

fn service(sheets: MockSheetRangeClient, table: SheetTable) -> IdentityService {
    IdentityService::new(Arc::new(sheets), table)
}

fn email(raw: &str) -> Email {
    Email::new(raw).expect("valid email")
}

fn user(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}

fn seeded(snapshot: Vec<Vec<String>>) -> MockSheetRangeClient {
    let mut sheets = MockSheetRangeClient::new();
    sheets
        .expect_read()
        .withf(|range| range.a1() == "Users!A:D")
        .returning(move |_| Ok(snapshot.clone()));
    sheets
}

#[rstest]
#[tokio::test]
async fn known_email_returns_stored_id(table: SheetTable) {
    let mut sheets = seeded(rows(&[&["a@example.com", "", "AbCd1234", "Aki"]]));
    sheets.expect_append().never();
    sheets.expect_update().never();

    let id = service(sheets, table)
        .get_or_create_user(&email("a@example.com"))
        .await
        .expect("lookup");
    assert_eq!(id.as_ref(), "AbCd1234");
}

#[rstest]
#[tokio::test]
async fn unknown_email_appends_a_new_row(table: SheetTable) {
    let mut sheets = seeded(rows(&[&["other@example.com", "", "Zz", ""]]));
    sheets
        .expect_append()
        .withf(|range, row| {
            range.a1() == "Users!A:D"
                && row.len() == 4
                && row[0] == "new@example.com"
                && row[1].is_empty()
                && row[2].len() == crate::domain::USER_ID_LEN
                && row[3].is_empty()
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let id = service(sheets, table)
        .get_or_create_user(&email("new@example.com"))
        .await
        .expect("creation");
    assert_eq!(id.as_ref().len(), crate::domain::USER_ID_LEN);
}

#[rstest]
#[tokio::test]
async fn email_row_without_id_is_repaired_in_place(table: SheetTable) {
    let mut sheets = seeded(rows(&[
        &["x@example.com", "", "X1", ""],
        &["a@example.com"],
    ]));
    sheets.expect_append().never();
    sheets
        .expect_update()
        .withf(|range, row| {
            range.a1() == "Users!A2:D2" && row[0] == "a@example.com" && !row[2].is_empty()
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    service(sheets, table)
        .get_or_create_user(&email("a@example.com"))
        .await
        .expect("repair");
}

#[rstest]
#[tokio::test]
async fn store_outage_is_unavailable(table: SheetTable) {
    let mut sheets = MockSheetRangeClient::new();
    sheets
        .expect_read()
        .return_once(|_| Err(SheetClientError::transport("connection reset")));

    let err = service(sheets, table)
        .get_or_create_user(&email("a@example.com"))
        .await
        .expect_err("outage");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case("U404", "user not found")]
#[case("U2", "nickname not set")]
#[tokio::test]
async fn check_nickname_reports_missing_values(
    table: SheetTable,
    #[case] user_id: &str,
    #[case] message: &str,
) {
    let sheets = seeded(rows(&[&["a@example.com", "", "U1", "Aki"], &["b@example.com", "", "U2"]]));

    let err = service(sheets, table)
        .check_nickname(&user(user_id))
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), message);
}

#[rstest]
#[tokio::test]
async fn check_nickname_returns_stored_value(table: SheetTable) {
    let sheets = seeded(rows(&[&["a@example.com", "", "U1", "Aki"]]));
    let nickname = service(sheets, table)
        .check_nickname(&user("U1"))
        .await
        .expect("nickname");
    assert_eq!(nickname.as_ref(), "Aki");
}

#[rstest]
#[tokio::test]
async fn update_nickname_rewrites_only_the_nickname_cell(table: SheetTable) {
    let mut sheets = seeded(rows(&[
        &["a@example.com", "", "U1", "Aki"],
        &["b@example.com", "legacy", "U2", "Old"],
    ]));
    sheets
        .expect_update()
        .withf(|range, row| {
            range.a1() == "Users!A2:D2"
                && row == &vec![
                    "b@example.com".to_owned(),
                    "legacy".to_owned(),
                    "U2".to_owned(),
                    "Ben".to_owned(),
                ]
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    service(sheets, table)
        .update_nickname(&user("U2"), &Nickname::new("Ben").expect("nickname"))
        .await
        .expect("update");
}

#[rstest]
#[tokio::test]
async fn update_nickname_for_unknown_user_is_not_found(table: SheetTable) {
    let mut sheets = seeded(Vec::new());
    sheets.expect_update().never();

    let err = service(sheets, table)
        .update_nickname(&user("U9"), &Nickname::new("Ben").expect("nickname"))
        .await
        .expect_err("unknown");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn nicknames_skip_unknown_and_unnamed_users(table: SheetTable) {
    let sheets = seeded(rows(&[
        &["a@example.com", "", "U1", "Aki"],
        &["b@example.com", "", "U2", ""],
        &["c@example.com", "", "U3", "Cy"],
    ]));
    let emails = vec![
        email("c@example.com"),
        email("b@example.com"),
        email("missing@example.com"),
        email("a@example.com"),
        email("c@example.com"),
    ];

    let entries = service(sheets, table)
        .nicknames_for(&emails)
        .await
        .expect("directory");
    let pairs: Vec<(&str, &str)> = entries
        .iter()
        .map(|entry| (entry.nickname.as_ref(), entry.user_id.as_ref()))
        .collect();
    assert_eq!(pairs, vec![("Cy", "U3"), ("Aki", "U1")]);
}

#[rstest]
#[tokio::test]
async fn legacy_ids_from_older_deployments_are_returned_as_stored(table: SheetTable) {
    let mut sheets = seeded(rows(&[&["a@b.c", "", "abc.def", "Aki"]]));
    sheets.expect_append().never();
    sheets.expect_update().never();
    let service = service(sheets, table);

    let id = service
        .get_or_create_user(&email("a@b.c"))
        .await
        .expect("legacy id loads");
    assert_eq!(id.as_ref(), "abc.def");

    let entries = service
        .nicknames_for(&[email("a@b.c")])
        .await
        .expect("directory");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].user_id.as_ref(), "abc.def");
}
