use std::cmp::Ordering;

use super::Resource;

/// A bound query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Int(i64),
    Text(String),
    Bool(bool),
}

impl FilterValue {
    /// Orders two values of the same type; mixed types do not compare.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Op {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => " = ",
            Self::Ne => " <> ",
            Self::Lt => " < ",
            Self::Le => " <= ",
            Self::Gt => " > ",
            Self::Ge => " >= ",
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
        }
    }
}

/// `column <op> $n`. Columns are compile-time constants exported by each
/// resource module, so user input only ever reaches the value side.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: &'static str,
    pub op: Op,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => " ASC",
            Self::Desc => " DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub direction: Direction,
}

/// Structured WHERE / ORDER BY / LIMIT with bound parameters.
///
/// Predicates are ANDed.
///
/// ```rust
/// use blogkit::repository::{Direction, Filter, article_columns};
///
/// let filter = Filter::new()
///     .eq(article_columns::CATEGORY_ID, 3)
///     .order_by(article_columns::ID, Direction::Desc)
///     .limit(20);
/// assert_eq!(filter.predicates().len(), 1);
/// assert_eq!(filter.limit_value(), Some(20));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
    order: Option<OrderBy>,
    limit: Option<i64>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn eq(self, column: &'static str, value: impl Into<FilterValue>) -> Self {
        self.with(column, Op::Eq, value)
    }

    #[must_use]
    pub fn with(mut self, column: &'static str, op: Op, value: impl Into<FilterValue>) -> Self {
        self.predicates.push(Predicate {
            column,
            op,
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: &'static str, direction: Direction) -> Self {
        self.order = Some(OrderBy { column, direction });
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn order(&self) -> Option<OrderBy> {
        self.order
    }

    pub fn limit_value(&self) -> Option<i64> {
        self.limit
    }

    /// Evaluates the predicates against an in-memory row. NULL never matches.
    pub fn matches<R: Resource>(&self, row: &R) -> bool {
        self.predicates.iter().all(|p| {
            row.field(p.column)
                .and_then(|v| v.compare(&p.value))
                .is_some_and(|ordering| p.op.holds(ordering))
        })
    }

    /// Filters, orders and truncates rows the way the SQL rendering would.
    pub fn apply<R: Resource>(&self, rows: impl IntoIterator<Item = R>) -> Vec<R> {
        let mut out: Vec<R> = rows.into_iter().filter(|r| self.matches(r)).collect();

        if let Some(order) = self.order {
            out.sort_by(|a, b| {
                let ordering = match (a.field(order.column), b.field(order.column)) {
                    (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                match order.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            out.truncate(usize::try_from(limit).unwrap_or(0));
        }

        out
    }
}
