#[macro_use]
extern crate diesel;
#[cfg(test)]
#[macro_use]
extern crate diesel_migrations;

use std::io;

use actix_web::{middleware, web, App, HttpServer};

mod config;
mod db;
mod error;
mod models;
mod query;
mod routes;
mod schema;
mod serialize;
#[cfg(test)]
mod test_support;

use crate::config::Config;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    // the schema is expected to be in place already (`diesel migration run`)
    let pool = db::init_pool(&config.database_url, config.pool_max_size)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;

    log::info!("using database at {}", config.database_url);
    log::info!("starting HTTP server at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
