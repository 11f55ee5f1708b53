//! Fixtures shared by the unit and handler tests.

use diesel::prelude::*;

use crate::db::{in_memory_pool, DbPool};
use crate::models::{Pizza, Restaurant, RestaurantPizza};
use crate::query::last_inserted_id;
use crate::schema::{pizzas, restaurant_pizzas, restaurants};

#[derive(Insertable)]
#[table_name = "restaurants"]
struct NewRestaurant<'a> {
    name: &'a str,
    address: Option<&'a str>,
}

#[derive(Insertable)]
#[table_name = "pizzas"]
struct NewPizza<'a> {
    name: &'a str,
    ingredients: Option<&'a str>,
}

#[derive(Insertable)]
#[table_name = "restaurant_pizzas"]
struct RawRestaurantPizza {
    price: i32,
    restaurant_id: i32,
    pizza_id: i32,
}

pub(crate) fn test_pool() -> DbPool {
    in_memory_pool()
}

pub(crate) fn insert_restaurant(
    conn: &SqliteConnection,
    name: &str,
    address: Option<&str>,
) -> Restaurant {
    diesel::insert_into(restaurants::table)
        .values(&NewRestaurant { name, address })
        .execute(conn)
        .unwrap();
    let id = last_inserted_id(conn).unwrap();
    restaurants::table.find(id).first(conn).unwrap()
}

pub(crate) fn insert_pizza(conn: &SqliteConnection, name: &str, ingredients: Option<&str>) -> Pizza {
    diesel::insert_into(pizzas::table)
        .values(&NewPizza { name, ingredients })
        .execute(conn)
        .unwrap();
    let id = last_inserted_id(conn).unwrap();
    pizzas::table.find(id).first(conn).unwrap()
}

/// Inserts directly, skipping validation.
pub(crate) fn insert_restaurant_pizza(
    conn: &SqliteConnection,
    price: i32,
    restaurant_id: i32,
    pizza_id: i32,
) -> RestaurantPizza {
    diesel::insert_into(restaurant_pizzas::table)
        .values(&RawRestaurantPizza {
            price,
            restaurant_id,
            pizza_id,
        })
        .execute(conn)
        .unwrap();
    let id = last_inserted_id(conn).unwrap();
    restaurant_pizzas::table.find(id).first(conn).unwrap()
}
