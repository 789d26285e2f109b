//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use budgethub_core::{db::Database, models::ExpenseFilter};
use chrono::Datelike;

use crate::commands::{self, truncate};

fn setup_test_db() -> Database {
    let db = Database::in_memory().unwrap();
    commands::cmd_users_add(&db, "alice", "alice@example.com", "secret123").unwrap();
    db
}

fn alice_id(db: &Database) -> i64 {
    db.get_user_by_username("alice").unwrap().unwrap().id
}

// ========== User Command Tests ==========

#[test]
fn test_cmd_users_add_and_list() {
    let db = setup_test_db();
    assert!(commands::cmd_users_list(&db).is_ok());

    let user = db.get_user_by_username("alice").unwrap().unwrap();
    assert_eq!(user.email, "alice@example.com");
    assert_ne!(user.password_hash, "secret123");
}

#[test]
fn test_cmd_users_add_rejects_duplicates_and_short_passwords() {
    let db = setup_test_db();
    assert!(commands::cmd_users_add(&db, "alice", "other@example.com", "secret123").is_err());
    assert!(commands::cmd_users_add(&db, "bobby", "bob@example.com", "abc").is_err());
    assert_eq!(db.list_users().unwrap().len(), 1);
}

#[test]
fn test_resolve_password_prefers_flag() {
    assert_eq!(
        commands::resolve_password(Some("from-flag".into())).unwrap(),
        "from-flag"
    );
}

#[test]
fn test_find_user_missing() {
    let db = setup_test_db();
    let err = commands::find_user(&db, "nobody").unwrap_err();
    assert!(err.to_string().contains("User 'nobody' not found"));
}

// ========== Expense Command Tests ==========

#[test]
fn test_cmd_expenses_add_auto_categorizes() {
    let db = setup_test_db();
    commands::cmd_expenses_add(&db, "alice", "Starbucks Coffee", 5.25, None, Some("2024-03-01"))
        .unwrap();
    commands::cmd_expenses_add(&db, "alice", "Gift", 30.0, Some("Shopping"), None).unwrap();

    let expenses = db
        .list_expenses(alice_id(&db), &ExpenseFilter::default())
        .unwrap();
    assert_eq!(expenses.len(), 2);

    let coffee = expenses.iter().find(|e| e.description == "Starbucks Coffee").unwrap();
    assert_eq!(coffee.category, "Food");

    let gift = expenses.iter().find(|e| e.description == "Gift").unwrap();
    assert_eq!(gift.category, "Shopping");
    assert_eq!(gift.date, chrono::Local::now().date_naive());
}

#[test]
fn test_cmd_expenses_add_logs_categorization() {
    use std::sync::{Arc, Mutex};

    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let db = setup_test_db();
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || Capture(writer.clone()))
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        commands::cmd_expenses_add(&db, "alice", "Uber ride", 14.0, None, Some("2024-03-01"))
            .unwrap();
    });

    let logs = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
    assert!(logs.contains("Categorized 'Uber ride' as Transport"));
}

#[test]
fn test_cmd_expenses_add_validation() {
    let db = setup_test_db();
    assert!(commands::cmd_expenses_add(&db, "alice", "Refund", -5.0, Some("Other"), None).is_err());
    assert!(
        commands::cmd_expenses_add(&db, "alice", "Lunch", 5.0, Some("Food"), Some("03/01")).is_err()
    );
    assert!(commands::cmd_expenses_add(&db, "nobody", "Lunch", 5.0, None, None).is_err());
}

#[test]
fn test_cmd_expenses_list_and_delete() {
    let db = setup_test_db();
    commands::cmd_expenses_add(&db, "alice", "Lunch", 12.0, Some("Food"), Some("2024-03-01"))
        .unwrap();
    let id = db
        .list_expenses(alice_id(&db), &ExpenseFilter::default())
        .unwrap()[0]
        .id;

    let filter =
        commands::build_filter(None, Some("Food".into()), Some("2024-03-01"), None, "amount_desc", 20)
            .unwrap();
    assert!(commands::cmd_expenses_list(&db, "alice", &filter).is_ok());

    commands::cmd_users_add(&db, "bobby", "bob@example.com", "secret123").unwrap();
    assert!(commands::cmd_expenses_delete(&db, "bobby", id).is_err());

    commands::cmd_expenses_delete(&db, "alice", id).unwrap();
    assert!(db.get_expense(id).unwrap().is_none());
}

#[test]
fn test_build_filter_rejects_bad_input() {
    assert!(commands::build_filter(None, None, None, None, "newest", 20).is_err());
    assert!(commands::build_filter(None, None, Some("yesterday"), None, "date_desc", 20).is_err());
}

// ========== Budget Command Tests ==========

#[test]
fn test_cmd_budgets_set_twice_keeps_one_row() {
    let db = setup_test_db();
    commands::cmd_budgets_set(&db, "alice", "Food", 100.0, Some(4), Some(2024)).unwrap();
    commands::cmd_budgets_set(&db, "alice", "Food", 150.0, Some(4), Some(2024)).unwrap();

    let budgets = db.list_budgets(alice_id(&db), 4, 2024).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].amount, 150.0);

    assert!(commands::cmd_budgets_list(&db, "alice", Some(4), Some(2024)).is_ok());
}

#[test]
fn test_cmd_budgets_set_defaults_to_current_month() {
    let db = setup_test_db();
    commands::cmd_budgets_set(&db, "alice", "Travel", 500.0, None, None).unwrap();

    let today = chrono::Local::now().date_naive();
    let budgets = db
        .list_budgets(alice_id(&db), today.month(), today.year())
        .unwrap();
    assert_eq!(budgets.len(), 1);
}

#[test]
fn test_resolve_month_rejects_invalid() {
    assert!(commands::resolve_month(Some(0), None).is_err());
    assert!(commands::resolve_month(Some(13), Some(2024)).is_err());
    assert_eq!(commands::resolve_month(Some(2), Some(2023)).unwrap(), (2, 2023));
}

// ========== Dashboard Command Tests ==========

#[test]
fn test_cmd_dashboard() {
    let db = setup_test_db();
    assert!(commands::cmd_dashboard(&db, "alice", false).is_ok());

    commands::cmd_expenses_add(&db, "alice", "Groceries", 80.0, Some("Food"), None).unwrap();
    commands::cmd_budgets_set(&db, "alice", "Food", 90.0, None, None).unwrap();
    assert!(commands::cmd_dashboard(&db, "alice", false).is_ok());
    assert!(commands::cmd_dashboard(&db, "alice", true).is_ok());
    assert!(commands::cmd_dashboard(&db, "nobody", false).is_err());
}

// ========== Import/Export Command Tests ==========

#[test]
fn test_cmd_import_and_export() {
    let db = setup_test_db();
    let dir = tempfile::tempdir().unwrap();

    let input = dir.path().join("march.csv");
    std::fs::write(
        &input,
        "Description,Amount,Category,Date\n\
         Uber ride downtown,18.40,,2024-03-02\n\
         Electric bill,\"$1,020.00\",Utilities,03/05/2024\n\
         Nothing here,,,2024-03-06\n",
    )
    .unwrap();

    commands::cmd_import(&db, "alice", &input).unwrap();

    let expenses = db
        .list_expenses(alice_id(&db), &ExpenseFilter::default())
        .unwrap();
    assert_eq!(expenses.len(), 2);
    assert!(expenses
        .iter()
        .any(|e| e.category == "Transport" && e.amount == 18.4));
    assert!(expenses.iter().any(|e| e.amount == 1020.0));

    let output = dir.path().join("out.csv");
    commands::cmd_export(&db, "alice", Some(&output)).unwrap();
    let csv = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Description,Amount,Category,Date");
    assert_eq!(lines.len(), 3);
    // Newest first
    assert!(lines[1].starts_with("Electric bill"));
}

#[test]
fn test_cmd_import_missing_file() {
    let db = setup_test_db();
    let dir = tempfile::tempdir().unwrap();
    assert!(commands::cmd_import(&db, "alice", &dir.path().join("missing.csv")).is_err());
}

#[test]
fn test_cmd_categorize() {
    assert!(commands::cmd_categorize("Netflix subscription", 15.99).is_ok());
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a much longer description", 10), "a much ...");
    assert_eq!(truncate("café au lait", 6), "caf...");
}

#[test]
fn test_open_db_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cli.db");
    // DATABASE_URL would redirect the open; only assert when it is unset
    if std::env::var("DATABASE_URL").is_err() {
        let db = commands::open_db(&path).unwrap();
        assert_eq!(db.path(), path.to_str().unwrap());
        assert!(path.exists());
    }
}
