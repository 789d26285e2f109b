//! Expense query builder for constructing dynamic SQL
//!
//! Every query is scoped to one owner; the optional filters narrow it further.

use crate::models::ExpenseFilter;

/// Builder for an owner-scoped expense query
pub struct ExpenseQuery<'query> {
    owner_id: i64,
    filter: &'query ExpenseFilter,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword (always has the owner condition)
    pub where_clause: String,
    /// ORDER BY clause including "ORDER BY" keyword
    pub order_clause: &'static str,
    /// LIMIT clause, empty when unbounded
    pub limit_clause: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl FilterResult {
    /// Borrow the parameters in the form rusqlite expects
    pub fn param_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

impl<'query> ExpenseQuery<'query> {
    pub fn new(owner_id: i64, filter: &'query ExpenseFilter) -> Self {
        Self { owner_id, filter }
    }

    /// Build the filter components
    pub fn build(self) -> FilterResult {
        let mut conditions = vec!["owner_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(self.owner_id)];

        if let Some(search) = self.filter.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                conditions.push("description LIKE ?".to_string());
                params.push(Box::new(format!("%{}%", search)));
            }
        }

        if let Some(category) = self.filter.category.as_deref().map(str::trim) {
            if !category.is_empty() {
                conditions.push("category = ?".to_string());
                params.push(Box::new(category.to_string()));
            }
        }

        if let Some(from) = self.filter.date_from {
            conditions.push("date >= ?".to_string());
            params.push(Box::new(from.to_string()));
        }

        if let Some(to) = self.filter.date_to {
            conditions.push("date <= ?".to_string());
            params.push(Box::new(to.to_string()));
        }

        let limit_clause = match self.filter.limit {
            Some(limit) if limit > 0 => format!("LIMIT {}", limit),
            _ => String::new(),
        };

        FilterResult {
            where_clause: format!("WHERE {}", conditions.join(" AND ")),
            order_clause: self.filter.sort.order_clause(),
            limit_clause,
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseSort;
    use chrono::NaiveDate;

    #[test]
    fn test_owner_only() {
        let filter = ExpenseFilter::default();
        let result = ExpenseQuery::new(4, &filter).build();
        assert_eq!(result.where_clause, "WHERE owner_id = ?");
        assert_eq!(result.params.len(), 1);
        assert!(result.order_clause.contains("date DESC"));
        assert!(result.limit_clause.is_empty());
    }

    #[test]
    fn test_all_filters() {
        let filter = ExpenseFilter {
            search: Some("coffee".into()),
            category: Some("Food".into()),
            date_from: NaiveDate::from_ymd_opt(2024, 1, 1),
            date_to: NaiveDate::from_ymd_opt(2024, 1, 31),
            sort: ExpenseSort::AmountAsc,
            limit: Some(5),
        };
        let result = ExpenseQuery::new(1, &filter).build();
        assert_eq!(
            result.where_clause,
            "WHERE owner_id = ? AND description LIKE ? AND category = ? AND date >= ? AND date <= ?"
        );
        assert_eq!(result.params.len(), 5);
        assert!(result.order_clause.starts_with("ORDER BY amount ASC"));
        assert_eq!(result.limit_clause, "LIMIT 5");
    }

    #[test]
    fn test_blank_filters_ignored() {
        let filter = ExpenseFilter {
            search: Some("   ".into()),
            category: Some(String::new()),
            ..Default::default()
        };
        let result = ExpenseQuery::new(1, &filter).build();
        assert_eq!(result.where_clause, "WHERE owner_id = ?");
    }
}
