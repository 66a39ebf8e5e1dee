//! Materialized query results.

use neo4rs::Row;

/// Every record one query produced, in server order.
#[derive(Debug, Default)]
pub struct QueryResult {
    rows: Vec<Row>,
}

impl QueryResult {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl IntoIterator for QueryResult {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = QueryResult::default();
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
        assert!(result.rows().is_empty());
        assert_eq!(result.into_rows().len(), 0);
    }

    #[test]
    fn test_iterators_on_empty_result() {
        let result = QueryResult::default();
        assert_eq!((&result).into_iter().count(), 0);
        assert_eq!(result.iter().count(), 0);
        assert_eq!(result.into_iter().count(), 0);
    }
}
