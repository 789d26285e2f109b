//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Ledger;
    use crate::error::Error;
    use chrono::NaiveDate;
    use rusqlite::params;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn setup() -> (Database, i64) {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("alice", "alice@example.com", "hash").unwrap();
        (db, user.id)
    }

    fn add(db: &Database, owner: i64, description: &str, amount: f64, category: &str, date: NaiveDate) -> Expense {
        db.insert_expense(
            owner,
            &NewExpense {
                description: description.to_string(),
                amount,
                category: category.to_string(),
                date,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.list_users().unwrap().is_empty());
    }

    #[test]
    fn test_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('budgets') WHERE name IN ('id', 'owner_id', 'category', 'amount', 'month', 'year', 'created_at', 'updated_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 8, "budgets table should have 8 expected columns");

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('expenses') WHERE name IN ('id', 'owner_id', 'description', 'amount', 'category', 'date', 'created_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 7, "expenses table should have 7 expected columns");
    }

    #[test]
    fn test_path_from_url() {
        assert_eq!(path_from_url("sqlite:///budget.db"), "budget.db");
        assert_eq!(path_from_url("sqlite://data/budget.db"), "data/budget.db");
        assert_eq!(path_from_url("sqlite:budget.db"), "budget.db");
        assert_eq!(path_from_url("/var/lib/budget.db"), "/var/lib/budget.db");
    }

    #[test]
    fn test_user_lookup() {
        let (db, id) = setup();

        let user = db.get_user(id).unwrap().unwrap();
        assert_eq!(user.username, "alice");
        assert!(db.get_user_by_username("alice").unwrap().is_some());
        assert!(db.get_user_by_email("ALICE@example.com").unwrap().is_some());
        assert!(db.get_user(id + 100).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_user_conflicts() {
        let (db, _) = setup();
        assert!(matches!(
            db.create_user("alice", "other@example.com", "hash"),
            Err(Error::Conflict(_))
        ));
        assert!(matches!(
            db.create_user("alice2", "alice@example.com", "hash"),
            Err(Error::Conflict(_))
        ));
    }

    #[test]
    fn test_expense_crud() {
        let (db, owner) = setup();

        let expense = add(&db, owner, "  Groceries  ", 45.5, "Food", d(2024, 3, 2));
        assert!(expense.id > 0);
        assert_eq!(expense.description, "Groceries");
        assert_eq!(expense.date, d(2024, 3, 2));

        let updated = db
            .update_expense(
                owner,
                expense.id,
                &NewExpense {
                    description: "Weekly groceries".into(),
                    amount: 50.0,
                    category: "Food".into(),
                    date: d(2024, 3, 3),
                },
            )
            .unwrap();
        assert_eq!(updated.amount, 50.0);
        assert_eq!(updated.date, d(2024, 3, 3));

        db.delete_expense(owner, expense.id).unwrap();
        assert!(db.get_expense(expense.id).unwrap().is_none());
        assert!(matches!(
            db.delete_expense(owner, expense.id),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_expense_rejects_invalid() {
        let (db, owner) = setup();
        let result = db.insert_expense(
            owner,
            &NewExpense {
                description: "Nothing".into(),
                amount: 0.0,
                category: "Other".into(),
                date: d(2024, 3, 2),
            },
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_expense_ownership() {
        let (db, alice) = setup();
        let bob = db.create_user("bob", "bob@example.com", "hash").unwrap().id;
        let expense = add(&db, alice, "Lunch", 12.0, "Food", d(2024, 3, 2));

        assert!(matches!(
            db.get_owned_expense(bob, expense.id),
            Err(Error::Forbidden(_))
        ));
        assert!(matches!(
            db.delete_expense(bob, expense.id),
            Err(Error::Forbidden(_))
        ));
        let replacement = NewExpense {
            description: "Hijacked".into(),
            amount: 1.0,
            category: "Other".into(),
            date: d(2024, 3, 2),
        };
        assert!(matches!(
            db.update_expense(bob, expense.id, &replacement),
            Err(Error::Forbidden(_))
        ));

        // Untouched
        assert_eq!(db.get_owned_expense(alice, expense.id).unwrap().description, "Lunch");
        assert!(db.list_expenses(bob, &ExpenseFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_list_expenses_filters_and_sort() {
        let (db, owner) = setup();
        add(&db, owner, "Starbucks coffee", 5.0, "Food", d(2024, 1, 10));
        add(&db, owner, "Uber", 25.0, "Transport", d(2024, 1, 20));
        add(&db, owner, "Coffee beans", 15.0, "Food", d(2024, 2, 5));
        add(&db, owner, "Rent", 1000.0, "Rent", d(2024, 2, 1));

        let all = db.list_expenses(owner, &ExpenseFilter::default()).unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].date, d(2024, 2, 5));

        let coffee = db
            .list_expenses(
                owner,
                &ExpenseFilter {
                    search: Some("coffee".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(coffee.len(), 2);

        let january = db
            .list_expenses(
                owner,
                &ExpenseFilter {
                    date_from: Some(d(2024, 1, 1)),
                    date_to: Some(d(2024, 1, 31)),
                    sort: ExpenseSort::AmountDesc,
                    ..Default::default()
                },
            )
            .unwrap();
        let amounts: Vec<f64> = january.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![25.0, 5.0]);

        let food = db
            .list_expenses(
                owner,
                &ExpenseFilter {
                    category: Some("Food".into()),
                    sort: ExpenseSort::DateAsc,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(food[0].description, "Starbucks coffee");

        let limited = db
            .list_expenses(
                owner,
                &ExpenseFilter {
                    limit: Some(1),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(limited.len(), 1);

        assert_eq!(
            db.expense_categories(owner).unwrap(),
            vec!["Food", "Rent", "Transport"]
        );
    }

    #[test]
    fn test_budget_upsert_single_row() {
        let (db, owner) = setup();

        let first = db.upsert_budget(owner, "Food", 300.0, 3, 2024).unwrap();
        assert!(first.is_created());

        let second = db.upsert_budget(owner, "Food", 450.0, 3, 2024).unwrap();
        assert!(!second.is_created());
        assert_eq!(second.budget().id, first.budget().id);
        assert_eq!(second.budget().amount, 450.0);

        let conn = db.conn().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM budgets WHERE owner_id = ? AND category = 'Food'",
                params![owner],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);

        // A different month is a different key
        assert!(db
            .upsert_budget(owner, "Food", 300.0, 4, 2024)
            .unwrap()
            .is_created());
        assert_eq!(db.list_budgets(owner, 3, 2024).unwrap().len(), 1);
    }

    #[test]
    fn test_budget_validation() {
        let (db, owner) = setup();
        assert!(db.upsert_budget(owner, "Food", 0.0, 3, 2024).is_err());
        assert!(db.upsert_budget(owner, "Food", 10.0, 13, 2024).is_err());
        assert!(db.upsert_budget(owner, " ", 10.0, 3, 2024).is_err());
    }

    #[test]
    fn test_delete_budget_ownership() {
        let (db, alice) = setup();
        let bob = db.create_user("bob", "bob@example.com", "hash").unwrap().id;
        let budget = db
            .upsert_budget(alice, "Food", 100.0, 3, 2024)
            .unwrap()
            .into_budget();

        assert!(matches!(
            db.delete_budget(bob, budget.id),
            Err(Error::Forbidden(_))
        ));
        db.delete_budget(alice, budget.id).unwrap();
        assert!(matches!(
            db.delete_budget(alice, budget.id),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_ledger_sums() {
        let (db, owner) = setup();
        let other = db.create_user("bob", "bob@example.com", "hash").unwrap().id;
        add(&db, owner, "Groceries", 40.0, "Food", d(2024, 2, 29));
        add(&db, owner, "Taxi", 10.0, "Transport", d(2024, 3, 1));
        add(&db, owner, "Pizza", 20.0, "Food", d(2024, 3, 31));
        add(&db, other, "Not mine", 500.0, "Food", d(2024, 3, 15));

        assert_eq!(db.month_total(owner, None, 3, 2024).unwrap(), 30.0);
        assert_eq!(db.month_total(owner, Some("Food"), 3, 2024).unwrap(), 20.0);
        assert_eq!(db.month_total(owner, None, 2, 2024).unwrap(), 40.0);
        assert_eq!(db.month_total(owner, None, 4, 2024).unwrap(), 0.0);

        // Inclusive bounds
        assert_eq!(
            db.sum_expenses(owner, None, d(2024, 2, 29), d(2024, 3, 1))
                .unwrap(),
            50.0
        );
        assert_eq!(
            db.sum_expenses(owner, Some("Transport"), d(2024, 1, 1), d(2024, 12, 31))
                .unwrap(),
            10.0
        );

        let march = db.month_category_totals(owner, 3, 2024).unwrap();
        assert_eq!(march.len(), 2);
        assert_eq!(march[0].category, "Food");

        let totals = db.category_totals(owner).unwrap();
        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    category: "Food".into(),
                    total: 60.0
                },
                CategoryTotal {
                    category: "Transport".into(),
                    total: 10.0
                },
            ]
        );

        let recent = db.recent_expenses(owner, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].description, "Pizza");
    }

    #[test]
    fn test_import_expenses_atomic() {
        let (db, owner) = setup();
        let good = NewExpense {
            description: "Coffee".into(),
            amount: 3.0,
            category: "Food".into(),
            date: d(2024, 3, 1),
        };
        let bad = NewExpense {
            amount: -1.0,
            ..good.clone()
        };

        assert!(db.import_expenses(owner, &[good.clone(), bad]).is_err());
        assert!(db.list_expenses(owner, &ExpenseFilter::default()).unwrap().is_empty());

        assert_eq!(db.import_expenses(owner, &[good.clone(), good]).unwrap(), 2);
    }

    #[test]
    fn test_delete_user_cascades() {
        let (db, owner) = setup();
        add(&db, owner, "Lunch", 12.0, "Food", d(2024, 3, 2));
        db.upsert_budget(owner, "Food", 100.0, 3, 2024).unwrap();

        assert!(db.delete_user(owner).unwrap());

        let conn = db.conn().unwrap();
        let expenses: i64 = conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))
            .unwrap();
        let budgets: i64 = conn
            .query_row("SELECT COUNT(*) FROM budgets", [], |row| row.get(0))
            .unwrap();
        assert_eq!(expenses, 0);
        assert_eq!(budgets, 0);
    }

    #[test]
    fn test_malformed_stored_date_reads_as_epoch() {
        let (db, owner) = setup();
        let conn = db.conn().unwrap();
        conn.execute(
            "INSERT INTO expenses (owner_id, description, amount, category, date)
             VALUES (?, 'Legacy row', 12.0, 'Other', 'not-a-date')",
            params![owner],
        )
        .unwrap();
        let id = conn.last_insert_rowid();
        drop(conn);

        let expense = db.get_expense(id).unwrap().unwrap();
        assert_eq!(expense.description, "Legacy row");
        assert_eq!(expense.date, NaiveDate::default());
        assert_eq!(db.list_expenses(owner, &ExpenseFilter::default()).unwrap().len(), 1);
    }
}
