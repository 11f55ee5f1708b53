use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, PoolError};
use diesel::SqliteConnection;

pub(crate) type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// SQLite leaves foreign keys off unless every connection asks for them.
#[derive(Debug, Clone, Copy)]
struct EnforceForeignKeys;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for EnforceForeignKeys {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON;")
            .map_err(r2d2::Error::QueryError)
    }
}

pub(crate) fn init_pool(database_url: &str, max_size: u32) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    r2d2::Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(EnforceForeignKeys))
        .build(manager)
}

#[cfg(test)]
embed_migrations!();

/// A pool over a single in-memory database with the schema applied.
/// One connection only: every `:memory:` connection is its own database.
#[cfg(test)]
pub(crate) fn in_memory_pool() -> DbPool {
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connection_customizer(Box::new(EnforceForeignKeys))
        .build(ConnectionManager::<SqliteConnection>::new(":memory:"))
        .expect("in-memory pool");
    {
        let conn = pool.get().expect("in-memory connection");
        embedded_migrations::run(&*conn).expect("migrations apply");
    }
    pool
}
