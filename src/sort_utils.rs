use std::cmp::Ordering;

use serde::Serialize;

/// Sort direction for table columns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Desc,
    Asc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Apply this direction to an ascending comparison result.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Trait for column enums. Each sortable table defines its own column enum
/// implementing this trait.
pub trait SortableColumn: Sized + Default + Clone + Copy + PartialEq {
    /// Parse column name from query string parameter.
    fn from_str(s: &str) -> Option<Self>;

    /// Convert column to query string parameter value.
    fn as_str(&self) -> &'static str;

    /// Every column of the table, in header order.
    fn all() -> &'static [Self];

    /// Direction applied when a different column gets selected. Tables disagree
    /// on this, so each one configures its own.
    fn default_direction() -> SortDirection {
        SortDirection::Desc
    }
}

/// A single cell value as seen by the comparator.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

impl<'a> From<&'a str> for SortValue<'a> {
    fn from(s: &'a str) -> Self {
        SortValue::Text(s)
    }
}

impl<'a> From<Option<&'a str>> for SortValue<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map_or(SortValue::Missing, SortValue::Text)
    }
}

impl From<f64> for SortValue<'_> {
    fn from(n: f64) -> Self {
        SortValue::Number(n)
    }
}

impl From<Option<f64>> for SortValue<'_> {
    fn from(n: Option<f64>) -> Self {
        n.map_or(SortValue::Missing, SortValue::Number)
    }
}

impl From<i64> for SortValue<'_> {
    fn from(n: i64) -> Self {
        SortValue::Number(n as f64)
    }
}

/// Rows that expose a comparable value per column.
pub trait SortableRow<C: SortableColumn> {
    fn sort_value(&self, column: &C) -> SortValue<'_>;
}

/// Ascending comparison: text against text is locale-aware, numbers compare
/// numerically, anything else counts as equal.
pub fn compare_values(a: &SortValue<'_>, b: &SortValue<'_>) -> Ordering {
    match (a, b) {
        (SortValue::Text(a), SortValue::Text(b)) => locale_compare(a, b),
        (SortValue::Number(a), SortValue::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

/// Case-insensitive first, so "apple" sorts next to "Apple" rather than after "Zebra".
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    // lowercase before uppercase on ties
    folded.then_with(|| b.cmp(a))
}

/// Sort rows in place. Equal keys keep their relative order.
///
/// `compare_values` is not a total order (a missing value equals everything),
/// which `slice::sort_by` is allowed to panic on, so this is a plain stable
/// insertion sort. Tables are small.
pub fn sort_rows<C, R>(rows: &mut [R], sort: &TableSort<C>)
where
    C: SortableColumn,
    R: SortableRow<C>,
{
    let out_of_order = |a: &R, b: &R| {
        let ordering = compare_values(&a.sort_value(&sort.column), &b.sort_value(&sort.column));
        sort.direction.apply(ordering) == Ordering::Greater
    };

    for i in 1..rows.len() {
        let mut j = i;
        while j > 0 && out_of_order(&rows[j - 1], &rows[j]) {
            rows.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Trait for filter params that support sorting (similar to DateFilterable).
pub trait Sortable {
    fn sort_by(&self) -> Option<&String>;
    fn sort_dir(&self) -> Option<&String>;

    /// Resolve sort parameters into a TableSort config.
    fn resolve_sort<C: SortableColumn>(&self) -> TableSort<C> {
        let column = self
            .sort_by()
            .and_then(|s| C::from_str(s))
            .unwrap_or_default();

        let direction = self
            .sort_dir()
            .and_then(|s| SortDirection::parse(s))
            .unwrap_or_else(C::default_direction);

        TableSort { column, direction }
    }
}

/// Active sort state of one table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSort<C: SortableColumn> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C: SortableColumn> TableSort<C> {
    /// Check if this column is currently being sorted.
    pub fn is_active(&self, col: &C) -> bool {
        &self.column == col
    }

    /// Get the direction to use when clicking a column header.
    /// If already sorted by this column, toggle direction; otherwise use the table default.
    pub fn next_direction_for(&self, col: &C) -> SortDirection {
        if self.is_active(col) {
            self.direction.toggle()
        } else {
            C::default_direction()
        }
    }

    /// State after clicking the header of `col`.
    pub fn select(&self, col: C) -> Self {
        Self {
            direction: self.next_direction_for(&col),
            column: col,
        }
    }

    /// Get sort indicator for a column header ("▲", "▼", or "").
    pub fn indicator(&self, col: &C) -> &'static str {
        if self.is_active(col) {
            match self.direction {
                SortDirection::Asc => "▲",
                SortDirection::Desc => "▼",
            }
        } else {
            ""
        }
    }

    /// Generate query string for current sort state.
    pub fn query_string(&self) -> String {
        format!("sort={}&dir={}", self.column.as_str(), self.direction.as_str())
    }

    /// Query string a click on the header of `col` leads to.
    pub fn query_string_for(&self, col: &C) -> String {
        self.select(*col).query_string()
    }
}

impl<C: SortableColumn> Default for TableSort<C> {
    fn default() -> Self {
        Self {
            column: C::default(),
            direction: C::default_direction(),
        }
    }
}

/// One column header: its arrow and the query a click on it requests.
#[derive(Debug, Clone, Serialize)]
pub struct SortHeader {
    pub column: &'static str,
    pub indicator: &'static str,
    pub query: String,
}

/// Serializable view of a table's sort state for JSON responses.
#[derive(Debug, Clone, Serialize)]
pub struct SortState {
    pub column: &'static str,
    pub direction: SortDirection,
    pub headers: Vec<SortHeader>,
}

impl<C: SortableColumn + 'static> From<&TableSort<C>> for SortState {
    fn from(sort: &TableSort<C>) -> Self {
        Self {
            column: sort.column.as_str(),
            direction: sort.direction,
            headers: C::all()
                .iter()
                .map(|col| SortHeader {
                    column: col.as_str(),
                    indicator: sort.indicator(col),
                    query: sort.query_string_for(col),
                })
                .collect(),
        }
    }
}
