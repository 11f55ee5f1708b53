use crate::error::{CreateError, DbError, ValidationError};
use crate::models::{NewRestaurantPizza, NewRestaurantPizzaRequest, Pizza, Restaurant, RestaurantPizza};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use diesel::dsl::exists;
use diesel::prelude::*;

no_arg_sql_function!(
    last_insert_rowid,
    diesel::sql_types::Integer,
    "Id of the row most recently inserted on this connection"
);

pub(crate) fn last_inserted_id(conn: &SqliteConnection) -> QueryResult<i32> {
    diesel::select(last_insert_rowid).get_result(conn)
}

pub(crate) fn find_all_restaurants(conn: &SqliteConnection) -> Result<Vec<Restaurant>, DbError> {
    Ok(restaurants::table
        .order(restaurants::id.asc())
        .load::<Restaurant>(conn)?)
}

pub(crate) fn find_restaurant(
    restaurant_id: i32,
    conn: &SqliteConnection,
) -> Result<Option<Restaurant>, DbError> {
    Ok(restaurants::table
        .find(restaurant_id)
        .first::<Restaurant>(conn)
        .optional()?)
}

/// Deletes the restaurant and every restaurant pizza pointing at it.
/// Returns `false` when there was no such restaurant.
pub(crate) fn delete_restaurant(restaurant_id: i32, conn: &SqliteConnection) -> Result<bool, DbError> {
    let deleted = conn.transaction::<_, diesel::result::Error, _>(|| {
        diesel::delete(
            restaurant_pizzas::table.filter(restaurant_pizzas::restaurant_id.eq(restaurant_id)),
        )
        .execute(conn)?;
        diesel::delete(restaurants::table.find(restaurant_id)).execute(conn)
    })?;
    Ok(deleted > 0)
}

pub(crate) fn find_all_pizzas(conn: &SqliteConnection) -> Result<Vec<Pizza>, DbError> {
    Ok(pizzas::table.order(pizzas::id.asc()).load::<Pizza>(conn)?)
}

/// Validates and stores a new restaurant pizza. Nothing is written unless
/// the price is in range and both the restaurant and the pizza exist.
pub(crate) fn create_restaurant_pizza(
    request: NewRestaurantPizzaRequest,
    conn: &SqliteConnection,
) -> Result<RestaurantPizza, CreateError> {
    conn.transaction::<_, CreateError, _>(|| {
        let new = NewRestaurantPizza::validated(request)?;

        let restaurant_exists: bool =
            diesel::select(exists(restaurants::table.find(new.restaurant_id))).get_result(conn)?;
        if !restaurant_exists {
            return Err(ValidationError::UnknownRestaurant(new.restaurant_id).into());
        }
        let pizza_exists: bool =
            diesel::select(exists(pizzas::table.find(new.pizza_id))).get_result(conn)?;
        if !pizza_exists {
            return Err(ValidationError::UnknownPizza(new.pizza_id).into());
        }

        diesel::insert_into(restaurant_pizzas::table)
            .values(&new)
            .execute(conn)?;
        let id = last_inserted_id(conn)?;
        Ok(restaurant_pizzas::table
            .find(id)
            .first::<RestaurantPizza>(conn)?)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_pizza, insert_restaurant, insert_restaurant_pizza, test_pool};

    fn count_restaurant_pizzas(conn: &SqliteConnection) -> i64 {
        restaurant_pizzas::table.count().get_result(conn).unwrap()
    }

    #[test]
    fn listings_come_back_in_id_order() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let a = insert_restaurant(&conn, "A", None);
        let b = insert_restaurant(&conn, "B", Some("somewhere"));
        insert_pizza(&conn, "Emma", None);

        assert_eq!(find_all_restaurants(&conn).unwrap(), vec![a, b]);
        assert_eq!(find_all_pizzas(&conn).unwrap().len(), 1);
    }

    #[test]
    fn find_missing_restaurant_is_none() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        assert_eq!(find_restaurant(42, &conn).unwrap(), None);
    }

    #[test]
    fn delete_cascades_to_restaurant_pizzas() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let kept = insert_restaurant(&conn, "Kept", None);
        let gone = insert_restaurant(&conn, "Gone", None);
        let pizza = insert_pizza(&conn, "Emma", None);
        insert_restaurant_pizza(&conn, 10, kept.id, pizza.id);
        insert_restaurant_pizza(&conn, 11, gone.id, pizza.id);
        insert_restaurant_pizza(&conn, 12, gone.id, pizza.id);

        assert!(delete_restaurant(gone.id, &conn).unwrap());
        assert_eq!(find_restaurant(gone.id, &conn).unwrap(), None);
        assert_eq!(count_restaurant_pizzas(&conn), 1);

        assert!(!delete_restaurant(gone.id, &conn).unwrap());
        assert_eq!(find_restaurant(kept.id, &conn).unwrap(), Some(kept));
    }

    #[test]
    fn create_returns_the_stored_row() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let restaurant = insert_restaurant(&conn, "A", None);
        let pizza = insert_pizza(&conn, "Emma", None);
        let request = NewRestaurantPizzaRequest {
            price: 15,
            pizza_id: pizza.id,
            restaurant_id: restaurant.id,
        };

        let first = create_restaurant_pizza(request, &conn).unwrap();
        let second = create_restaurant_pizza(request, &conn).unwrap();
        assert_eq!(first.price, 15);
        assert_eq!(first.pizza_id, pizza.id);
        assert_eq!(first.restaurant_id, restaurant.id);
        assert_ne!(first.id, second.id);
        assert_eq!(count_restaurant_pizzas(&conn), 2);
    }

    #[test]
    fn create_rejects_without_writing() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let restaurant = insert_restaurant(&conn, "A", None);
        let pizza = insert_pizza(&conn, "Emma", None);

        let cases = [
            (0, pizza.id, restaurant.id, ValidationError::PriceOutOfRange(0)),
            (31, pizza.id, restaurant.id, ValidationError::PriceOutOfRange(31)),
            (5, pizza.id, 999, ValidationError::UnknownRestaurant(999)),
            (5, 999, restaurant.id, ValidationError::UnknownPizza(999)),
        ];
        for (price, pizza_id, restaurant_id, expected) in cases {
            let request = NewRestaurantPizzaRequest {
                price,
                pizza_id,
                restaurant_id,
            };
            match create_restaurant_pizza(request, &conn) {
                Err(CreateError::Validation(err)) => assert_eq!(err, expected),
                other => panic!("expected {:?}, got {:?}", expected, other),
            }
        }
        assert_eq!(count_restaurant_pizzas(&conn), 0);
    }
}
