table! {
    pizzas (id) {
        id -> Integer,
        name -> Text,
        ingredients -> Nullable<Text>,
    }
}

table! {
    restaurant_pizzas (id) {
        id -> Integer,
        price -> Integer,
        restaurant_id -> Integer,
        pizza_id -> Integer,
    }
}

table! {
    restaurants (id) {
        id -> Integer,
        name -> Text,
        address -> Nullable<Text>,
    }
}

joinable!(restaurant_pizzas -> pizzas (pizza_id));
joinable!(restaurant_pizzas -> restaurants (restaurant_id));

allow_tables_to_appear_in_same_query!(pizzas, restaurant_pizzas, restaurants,);
