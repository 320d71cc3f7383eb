use crate::core::error::{StoreError, TableName};

/// A row that can live in a [`Table`].
pub trait Record: Clone {
    const TABLE: TableName;

    /// Numeric columns usable by [`Table::aggregate`].
    type Metric: Copy;

    fn key(&self) -> &str;
    fn metric(&self, metric: Self::Metric) -> f64;

    /// Table-wide constraint checked before `self` is written. `others` is
    /// every row already in the table except the one being replaced.
    fn admit<'a>(&self, others: impl Iterator<Item = &'a Self>) -> Result<(), StoreError>
    where
        Self: 'a,
    {
        let _ = others;
        Ok(())
    }
}

/// Conjunctive row predicate used by [`Table::list`].
pub trait RowFilter<R> {
    fn matches(&self, row: &R) -> bool;
}

/// The empty filter: every row matches.
impl<R> RowFilter<R> for () {
    fn matches(&self, _row: &R) -> bool {
        true
    }
}

/// Set-membership test for an optional enum filter. `None` does not filter,
/// `Some(&[])` matches nothing.
pub(crate) fn member_of<T: PartialEq>(allowed: Option<&[T]>, value: &T) -> bool {
    allowed.is_none_or(|set| set.contains(value))
}

/// Minimum-threshold test for an optional numeric filter (inclusive).
pub(crate) fn at_least<T: PartialOrd>(minimum: Option<T>, value: T) -> bool {
    minimum.is_none_or(|min| value >= min)
}

/// Ordered rows with a unique string key.
#[derive(Debug, Clone)]
pub struct Table<R> {
    rows: Vec<R>,
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R: Record> Table<R> {
    /// Build a table, rejecting duplicate or blank keys in `rows`.
    pub fn from_rows(rows: impl IntoIterator<Item = R>) -> Result<Self, StoreError> {
        let mut table = Table::default();
        for row in rows {
            table.append(row)?;
        }
        Ok(table)
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&R> {
        self.rows.iter().find(|row| row.key() == key)
    }

    pub fn list(&self, filter: &impl RowFilter<R>) -> Vec<R> {
        self.rows
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect()
    }

    /// Apply `edit` to the row keyed `key` and return the new row. The table
    /// is left untouched if the edited row is not admitted.
    pub fn update(&mut self, key: &str, edit: impl FnOnce(&mut R)) -> Result<R, StoreError> {
        let index = self
            .rows
            .iter()
            .position(|row| row.key() == key)
            .ok_or_else(|| StoreError::not_found(R::TABLE, key))?;
        let mut row = self.rows[index].clone();
        edit(&mut row);
        row.admit(
            self.rows
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, other)| other),
        )?;
        self.rows[index] = row.clone();
        Ok(row)
    }

    pub fn append(&mut self, row: R) -> Result<R, StoreError> {
        let key = row.key();
        if key.trim().is_empty() {
            return Err(StoreError::invalid("key", format!("{} key must not be blank", R::TABLE)));
        }
        if self.get(key).is_some() {
            return Err(StoreError::DuplicateKey {
                table: R::TABLE,
                key: key.to_string(),
            });
        }
        row.admit(self.rows.iter())?;
        self.rows.push(row.clone());
        Ok(row)
    }

    /// `Σ metric`, or `Σ metric * weight` when a weight column is given.
    pub fn aggregate(&self, metric: R::Metric, weight: Option<R::Metric>) -> f64 {
        self.rows
            .iter()
            .map(|row| match weight {
                Some(weight) => row.metric(metric) * row.metric(weight),
                None => row.metric(metric),
            })
            .sum()
    }
}
