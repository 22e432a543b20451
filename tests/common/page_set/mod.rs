//! An in-memory queryable page collection, for exercising the pipeline
//! without a database.

use fetchcrate::{Direction, FilterValue, Predicate, Queryable, ResourceProvider};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: i64,
    pub name: String,
    pub priority: i64,
}

impl Page {
    pub fn new(id: i64, name: &str, priority: i64) -> Self {
        Self {
            id,
            name: name.to_string(),
            priority,
        }
    }
}

#[derive(Debug, Clone)]
enum Field {
    Int(i64),
    Text(String),
}

impl Field {
    fn of(page: &Page, attribute: &str) -> Self {
        match attribute {
            "id" => Self::Int(page.id),
            "priority" => Self::Int(page.priority),
            "name" => Self::Text(page.name.clone()),
            other => panic!("page has no attribute {other}"),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => unreachable!("mismatched field kinds"),
        }
    }

    fn compare_raw(&self, raw: &str) -> Option<Ordering> {
        match self {
            Self::Int(a) => raw.trim().parse::<i64>().ok().map(|b| a.cmp(&b)),
            Self::Text(a) => Some(a.as_str().cmp(raw)),
        }
    }

    fn equals_raw(&self, raw: &str) -> bool {
        self.compare_raw(raw) == Some(Ordering::Equal)
    }
}

/// Rows plus the sort keys accumulated so far; each new key is a
/// lower-priority tiebreaker, matching how a SQL backend stacks `ORDER BY`.
#[derive(Debug, Clone)]
pub struct PageSet {
    rows: Vec<Page>,
    sort_keys: Vec<(String, Direction)>,
}

impl PageSet {
    pub fn new(rows: Vec<Page>) -> Self {
        Self {
            rows,
            sort_keys: Vec::new(),
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.rows.iter().map(|p| p.name.clone()).collect()
    }

    pub fn rows(&self) -> &[Page] {
        &self.rows
    }

    fn matches(page: &Page, attribute: &str, predicate: Predicate, value: &FilterValue) -> bool {
        let field = Field::of(page, attribute);
        match predicate {
            Predicate::Eq => value.scalar().is_some_and(|v| field.equals_raw(v)),
            Predicate::Neq => value.scalar().is_some_and(|v| !field.equals_raw(v)),
            Predicate::In => value.values().iter().any(|v| field.equals_raw(v)),
            Predicate::NotIn => !value.values().iter().any(|v| field.equals_raw(v)),
            Predicate::Cont => match (&field, value.scalar()) {
                (Field::Text(text), Some(needle)) => {
                    text.to_lowercase().contains(&needle.to_lowercase())
                }
                _ => false,
            },
            Predicate::Lt => value
                .scalar()
                .and_then(|v| field.compare_raw(v))
                .is_some_and(Ordering::is_lt),
            Predicate::Lte => value
                .scalar()
                .and_then(|v| field.compare_raw(v))
                .is_some_and(Ordering::is_le),
            Predicate::Gt => value
                .scalar()
                .and_then(|v| field.compare_raw(v))
                .is_some_and(Ordering::is_gt),
            Predicate::Gte => value
                .scalar()
                .and_then(|v| field.compare_raw(v))
                .is_some_and(Ordering::is_ge),
        }
    }

    fn resort(&mut self) {
        let keys = self.sort_keys.clone();
        self.rows.sort_by(|a, b| {
            for (attribute, direction) in &keys {
                let ordering = Field::of(a, attribute).compare(&Field::of(b, attribute));
                let ordering = match direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }
}

impl Queryable for PageSet {
    fn apply_filter(mut self, attribute: &str, predicate: Predicate, value: &FilterValue) -> Self {
        self.rows
            .retain(|page| Self::matches(page, attribute, predicate, value));
        self
    }

    fn apply_sort(mut self, attribute: &str, direction: Direction) -> Self {
        self.sort_keys.push((attribute.to_string(), direction));
        self.resort();
        self
    }
}

/// Provider over a fixed set of pages.
pub struct PageStore {
    pages: Vec<Page>,
}

impl PageStore {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// Three pages named `"Page #0"` through `"Page #2"`, priorities 2, 1, 0.
    pub fn seeded() -> Self {
        Self::new(
            (0..3)
                .map(|n| Page::new(n, &format!("Page #{n}"), 2 - n))
                .collect(),
        )
    }
}

impl ResourceProvider for PageStore {
    type Collection = PageSet;

    fn all(&self) -> PageSet {
        PageSet::new(self.pages.clone())
    }
}
