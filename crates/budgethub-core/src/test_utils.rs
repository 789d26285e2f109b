//! In-memory ledger for exercising analytics without a database

use chrono::{Datelike, NaiveDate, Utc};

use crate::analytics::Ledger;
use crate::error::Result;
use crate::models::{Budget, CategoryTotal, Expense};

/// A [`Ledger`] backed by plain vectors
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    pub expenses: Vec<Expense>,
    pub budgets: Vec<Budget>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an expense for `owner_id`
    pub fn expense(
        mut self,
        owner_id: i64,
        description: &str,
        amount: f64,
        category: &str,
        date: NaiveDate,
    ) -> Self {
        let id = self.expenses.len() as i64 + 1;
        self.expenses.push(Expense {
            id,
            owner_id,
            description: description.to_string(),
            amount,
            category: category.to_string(),
            date,
            created_at: Utc::now(),
        });
        self
    }

    /// Set a budget for `owner_id`
    pub fn budget(
        mut self,
        owner_id: i64,
        category: &str,
        amount: f64,
        month: u32,
        year: i32,
    ) -> Self {
        let id = self.budgets.len() as i64 + 1;
        self.budgets.push(Budget {
            id,
            owner_id,
            category: category.to_string(),
            amount,
            month,
            year,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        self
    }

    fn owned<'a>(
        &'a self,
        owner_id: i64,
        category: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Expense> + 'a {
        self.expenses
            .iter()
            .filter(move |e| e.owner_id == owner_id)
            .filter(move |e| category.map_or(true, |c| e.category == c))
    }

    fn group(expenses: impl Iterator<Item = (String, f64)>) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> = Vec::new();
        for (category, amount) in expenses {
            match totals.iter_mut().find(|t| t.category == category) {
                Some(t) => t.total += amount,
                None => totals.push(CategoryTotal {
                    category,
                    total: amount,
                }),
            }
        }
        totals
    }
}

impl Ledger for MemoryLedger {
    fn sum_expenses(
        &self,
        owner_id: i64,
        category: Option<&str>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<f64> {
        Ok(self
            .owned(owner_id, category)
            .filter(|e| e.date >= from && e.date <= to)
            .map(|e| e.amount)
            .sum())
    }

    fn month_total(
        &self,
        owner_id: i64,
        category: Option<&str>,
        month: u32,
        year: i32,
    ) -> Result<f64> {
        Ok(self
            .owned(owner_id, category)
            .filter(|e| e.date.month() == month && e.date.year() == year)
            .map(|e| e.amount)
            .sum())
    }

    fn month_category_totals(
        &self,
        owner_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<CategoryTotal>> {
        Ok(Self::group(
            self.owned(owner_id, None)
                .filter(|e| e.date.month() == month && e.date.year() == year)
                .map(|e| (e.category.clone(), e.amount)),
        ))
    }

    fn category_totals(&self, owner_id: i64) -> Result<Vec<CategoryTotal>> {
        let mut totals = Self::group(
            self.owned(owner_id, None)
                .map(|e| (e.category.clone(), e.amount)),
        );
        totals.sort_by(|a, b| b.total.total_cmp(&a.total));
        Ok(totals)
    }

    fn budget_for(
        &self,
        owner_id: i64,
        category: &str,
        month: u32,
        year: i32,
    ) -> Result<Option<Budget>> {
        Ok(self
            .budgets
            .iter()
            .find(|b| {
                b.owner_id == owner_id
                    && b.category == category
                    && b.month == month
                    && b.year == year
            })
            .cloned())
    }

    fn budgets_for_month(&self, owner_id: i64, month: u32, year: i32) -> Result<Vec<Budget>> {
        Ok(self
            .budgets
            .iter()
            .filter(|b| b.owner_id == owner_id && b.month == month && b.year == year)
            .cloned()
            .collect())
    }

    fn recent_expenses(&self, owner_id: i64, limit: usize) -> Result<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self.owned(owner_id, None).cloned().collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        expenses.truncate(limit);
        Ok(expenses)
    }
}
