use actix_web::http::header::ContentType;
use actix_web::{delete, get, post, web, HttpResponse};

use crate::db::DbPool;
use crate::error::{ApiError, DbError};
use crate::models::NewRestaurantPizzaRequest;
use crate::query;
use crate::serialize::{Relations, ToRecord, RESTAURANT_DETAIL, RESTAURANT_PIZZA_CREATED};

pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(index)
        .service(list_restaurants)
        .service(get_restaurant)
        .service(delete_restaurant)
        .service(list_pizzas)
        .service(create_restaurant_pizza);
}

/// Undecodable bodies get the same answer as any other rejected restaurant pizza.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("rejected request body: {}", err);
        ApiError::Validation.into()
    })
}

/// Ids that cannot be parsed name no restaurant.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        log::debug!("rejected restaurant id: {}", err);
        ApiError::RestaurantNotFound.into()
    })
}

#[get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body("<h1>Pizza Restaurant API </h1>")
}

#[get("/restaurants")]
async fn list_restaurants(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let restaurants = web::block(move || -> Result<_, DbError> {
        let conn = pool.get()?;
        query::find_all_restaurants(&conn)?
            .iter()
            .map(|restaurant| restaurant.to_record(&conn, &Relations::none()))
            .collect::<Result<Vec<_>, _>>()
    })
    .await??;
    Ok(HttpResponse::Ok().json(restaurants))
}

#[get("/restaurants/{id}")]
async fn get_restaurant(
    restaurant_id: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let restaurant_id = restaurant_id.into_inner();
    let restaurant = web::block(move || -> Result<_, DbError> {
        let conn = pool.get()?;
        query::find_restaurant(restaurant_id, &conn)?
            .map(|restaurant| {
                restaurant.to_record(&conn, &Relations::from_paths(RESTAURANT_DETAIL))
            })
            .transpose()
    })
    .await??
    .ok_or(ApiError::RestaurantNotFound)?;
    Ok(HttpResponse::Ok().json(restaurant))
}

#[delete("/restaurants/{id}")]
async fn delete_restaurant(
    restaurant_id: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let restaurant_id = restaurant_id.into_inner();
    let deleted = web::block(move || -> Result<_, DbError> {
        let conn = pool.get()?;
        query::delete_restaurant(restaurant_id, &conn)
    })
    .await??;
    if !deleted {
        return Err(ApiError::RestaurantNotFound);
    }
    log::info!("deleted restaurant {}", restaurant_id);
    Ok(HttpResponse::NoContent().finish())
}

#[get("/pizzas")]
async fn list_pizzas(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let pizzas = web::block(move || -> Result<_, DbError> {
        let conn = pool.get()?;
        query::find_all_pizzas(&conn)?
            .iter()
            .map(|pizza| pizza.to_record(&conn, &Relations::none()))
            .collect::<Result<Vec<_>, _>>()
    })
    .await??;
    Ok(HttpResponse::Ok().json(pizzas))
}

#[post("/restaurant_pizzas")]
async fn create_restaurant_pizza(
    request: web::Json<NewRestaurantPizzaRequest>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let created = web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        let row = query::create_restaurant_pizza(request, &conn).map_err(|err| {
            log::debug!("restaurant pizza rejected: {}", err);
            ApiError::from(err)
        })?;
        log::info!(
            "restaurant {} now sells pizza {} at {}",
            row.restaurant_id,
            row.pizza_id,
            row.price
        );
        Ok(row.to_record(&conn, &Relations::from_paths(RESTAURANT_PIZZA_CREATED))?)
    })
    .await??;
    Ok(HttpResponse::Created().json(created))
}
