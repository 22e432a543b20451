//! [`Queryable`] over Sea-ORM selects.
//!
//! Conditions are built against dynamically named columns, so the adapter
//! works for any entity without per-entity glue. Values arrive as query
//! strings; equality sniffs UUIDs and ordering comparisons parse integers,
//! then floats, before falling back to text comparison.

use crate::definition::Predicate;
use crate::models::FilterValue;
use crate::parameter::Direction;
use crate::queryable::{Queryable, ResourceProvider};
use sea_orm::sea_query::{Alias, Expr, Func, IntoColumnRef, LikeExpr, Order, SimpleExpr};
use sea_orm::{EntityTrait, QueryFilter, QueryOrder, Select, Value};
use uuid::Uuid;

impl From<Direction> for Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => Self::Asc,
            Direction::Desc => Self::Desc,
        }
    }
}

/// A raw string as the narrowest Sea-ORM value it parses as.
fn scalar_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(uuid) = Uuid::parse_str(trimmed) {
        return uuid.into();
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return int.into();
    }
    if let Ok(float) = trimmed.parse::<f64>() {
        return float.into();
    }
    trimmed.into()
}

/// `LIKE` wildcards in user input match literally, not as patterns.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn condition(attribute: &str, predicate: Predicate, value: &FilterValue) -> SimpleExpr {
    let column = Expr::col(Alias::new(attribute));
    match predicate {
        Predicate::Eq => column.eq(scalar_value(value.scalar().unwrap_or_default())),
        Predicate::Neq => column.ne(scalar_value(value.scalar().unwrap_or_default())),
        Predicate::Lt => column.lt(scalar_value(value.scalar().unwrap_or_default())),
        Predicate::Lte => column.lte(scalar_value(value.scalar().unwrap_or_default())),
        Predicate::Gt => column.gt(scalar_value(value.scalar().unwrap_or_default())),
        Predicate::Gte => column.gte(scalar_value(value.scalar().unwrap_or_default())),
        Predicate::In => column.is_in(value.values().into_iter().map(scalar_value)),
        Predicate::NotIn => column.is_not_in(value.values().into_iter().map(scalar_value)),
        Predicate::Cont => {
            // Case-insensitive containment
            let needle = escape_like(value.scalar().unwrap_or_default().trim())
                .to_uppercase();
            SimpleExpr::FunctionCall(Func::upper(Expr::col(Alias::new(attribute))))
                .like(LikeExpr::new(format!("%{needle}%")).escape('\\'))
        }
    }
}

impl<E: EntityTrait> Queryable for Select<E> {
    fn apply_filter(self, attribute: &str, predicate: Predicate, value: &FilterValue) -> Self {
        self.filter(condition(attribute, predicate, value))
    }

    fn apply_sort(self, attribute: &str, direction: Direction) -> Self {
        self.order_by(
            SimpleExpr::Column(Alias::new(attribute).into_column_ref()),
            direction.into(),
        )
    }
}

/// Provider over a whole entity: every call starts from `E::find()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityProvider<E: EntityTrait> {
    entity: std::marker::PhantomData<E>,
}

impl<E: EntityTrait> EntityProvider<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entity: std::marker::PhantomData,
        }
    }
}

impl<E: EntityTrait> ResourceProvider for EntityProvider<E> {
    type Collection = Select<E>;

    fn all(&self) -> Self::Collection {
        E::find()
    }
}
