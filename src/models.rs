use std::ops::RangeInclusive;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

use crate::error::ValidationError;
use crate::schema::{pizzas, restaurant_pizzas, restaurants};

/// Prices a restaurant may charge for a pizza, in whole currency units.
pub(crate) const PRICE_RANGE: RangeInclusive<i32> = 1..=30;

#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Identifiable)]
#[table_name = "restaurants"]
pub(crate) struct Restaurant {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Identifiable)]
#[table_name = "pizzas"]
pub(crate) struct Pizza {
    pub id: i32,
    pub name: String,
    pub ingredients: Option<String>,
}

/// "This restaurant sells this pizza at this price."
#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Identifiable, Associations)]
#[belongs_to(Restaurant)]
#[belongs_to(Pizza)]
#[table_name = "restaurant_pizzas"]
pub(crate) struct RestaurantPizza {
    pub id: i32,
    pub price: i32,
    pub restaurant_id: i32,
    pub pizza_id: i32,
}

/// Body of `POST /restaurant_pizzas`. Every field is required.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub(crate) struct NewRestaurantPizzaRequest {
    #[serde(deserialize_with = "whole_number")]
    pub price: i32,
    pub pizza_id: i32,
    pub restaurant_id: i32,
}

/// Accepts `15` and `15.0` alike; fractional or out-of-range numbers are refused.
fn whole_number<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    let whole = match (number.as_i64(), number.as_f64()) {
        (Some(n), _) => Some(n),
        (None, Some(f)) if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => Some(f as i64),
        _ => None,
    };
    whole
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("{} is not a whole number", number)))
}

#[derive(Debug, Clone, Copy, Insertable)]
#[table_name = "restaurant_pizzas"]
pub(crate) struct NewRestaurantPizza {
    pub price: i32,
    pub restaurant_id: i32,
    pub pizza_id: i32,
}

impl NewRestaurantPizza {
    /// Checks the price range. Foreign keys are checked against storage by
    /// `query::create_restaurant_pizza`.
    pub(crate) fn validated(request: NewRestaurantPizzaRequest) -> Result<Self, ValidationError> {
        if !PRICE_RANGE.contains(&request.price) {
            return Err(ValidationError::PriceOutOfRange(request.price));
        }
        Ok(NewRestaurantPizza {
            price: request.price,
            restaurant_id: request.restaurant_id,
            pizza_id: request.pizza_id,
        })
    }
}
