//! Turns entities into JSON records.
//!
//! Nested relations are only expanded when their dotted path is listed in the
//! [`Relations`] passed in. Nothing expands on its own, which is what keeps a
//! restaurant pizza's pizza from pulling its restaurant pizzas back in.

use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::DbError;
use crate::models::{Pizza, Restaurant, RestaurantPizza};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};

pub(crate) type Record = Map<String, Value>;

/// `GET /restaurants/{id}`: associations, each with its pizza.
pub(crate) const RESTAURANT_DETAIL: &[&str] = &["restaurant_pizzas", "restaurant_pizzas.pizza"];

/// `POST /restaurant_pizzas`: both parents, unexpanded.
pub(crate) const RESTAURANT_PIZZA_CREATED: &[&str] = &["pizza", "restaurant"];

/// Dotted relation paths to include, e.g. `restaurant_pizzas.pizza`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Relations(Vec<String>);

impl Relations {
    pub(crate) fn none() -> Self {
        Relations::default()
    }

    pub(crate) fn from_paths(paths: &[&str]) -> Self {
        Relations(paths.iter().map(|p| p.to_string()).collect())
    }

    /// True when `relation` or anything beneath it was asked for.
    pub(crate) fn includes(&self, relation: &str) -> bool {
        self.0.iter().any(|path| {
            path == relation
                || path
                    .strip_prefix(relation)
                    .map_or(false, |rest| rest.starts_with('.'))
        })
    }

    /// The paths below `relation`, relative to it.
    pub(crate) fn descend(&self, relation: &str) -> Relations {
        Relations(
            self.0
                .iter()
                .filter_map(|path| path.strip_prefix(relation)?.strip_prefix('.'))
                .map(str::to_string)
                .collect(),
        )
    }
}

pub(crate) trait ToRecord {
    fn to_record(&self, conn: &SqliteConnection, relations: &Relations)
        -> Result<Record, DbError>;
}

fn scalar_record<T: Serialize>(entity: &T) -> Result<Record, DbError> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        other => Err(format!("expected an object, serialized to {}", other).into()),
    }
}

/// Adds `restaurant_pizzas` to `record` when asked for, loading the rows with `load`.
fn expand_restaurant_pizzas<F>(
    record: &mut Record,
    conn: &SqliteConnection,
    relations: &Relations,
    load: F,
) -> Result<(), DbError>
where
    F: FnOnce(&SqliteConnection) -> QueryResult<Vec<RestaurantPizza>>,
{
    if !relations.includes("restaurant_pizzas") {
        return Ok(());
    }
    let nested = relations.descend("restaurant_pizzas");
    let rows = load(conn)?
        .iter()
        .map(|row| row.to_record(conn, &nested).map(Value::Object))
        .collect::<Result<Vec<_>, _>>()?;
    record.insert("restaurant_pizzas".to_string(), Value::Array(rows));
    Ok(())
}

impl ToRecord for Restaurant {
    fn to_record(
        &self,
        conn: &SqliteConnection,
        relations: &Relations,
    ) -> Result<Record, DbError> {
        let mut record = scalar_record(self)?;
        expand_restaurant_pizzas(&mut record, conn, relations, |conn| {
            RestaurantPizza::belonging_to(self)
                .order(restaurant_pizzas::id.asc())
                .load(conn)
        })?;
        Ok(record)
    }
}

impl ToRecord for Pizza {
    fn to_record(
        &self,
        conn: &SqliteConnection,
        relations: &Relations,
    ) -> Result<Record, DbError> {
        let mut record = scalar_record(self)?;
        expand_restaurant_pizzas(&mut record, conn, relations, |conn| {
            RestaurantPizza::belonging_to(self)
                .order(restaurant_pizzas::id.asc())
                .load(conn)
        })?;
        Ok(record)
    }
}

impl ToRecord for RestaurantPizza {
    fn to_record(
        &self,
        conn: &SqliteConnection,
        relations: &Relations,
    ) -> Result<Record, DbError> {
        let mut record = scalar_record(self)?;
        if relations.includes("pizza") {
            let pizza = pizzas::table.find(self.pizza_id).first::<Pizza>(conn)?;
            let nested = pizza.to_record(conn, &relations.descend("pizza"))?;
            record.insert("pizza".to_string(), Value::Object(nested));
        }
        if relations.includes("restaurant") {
            let restaurant = restaurants::table
                .find(self.restaurant_id)
                .first::<Restaurant>(conn)?;
            let nested = restaurant.to_record(conn, &relations.descend("restaurant"))?;
            record.insert("restaurant".to_string(), Value::Object(nested));
        }
        Ok(record)
    }
}
