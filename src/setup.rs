use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use dotenv::dotenv;
use log::info;
use std::env;

use crate::models::role;
use crate::models::user;
use crate::models::user::NewUser;

embed_migrations!();

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

pub fn setup_dotenv() {
    dotenv().ok();
}

pub fn establish_connection() -> SqliteConnection {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let connection = SqliteConnection::establish(&database_url)
        .expect(&format!("Error connecting to {}", database_url));
    connection
        .execute("PRAGMA foreign_keys = ON")
        .expect("Couldn't enable foreign keys");
    connection
}

#[derive(Debug)]
struct ForeignKeyPragma;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ForeignKeyPragma {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        connection
            .execute("PRAGMA foreign_keys = ON")
            .map(|_| ())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn build_pool() -> DbPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    Pool::builder()
        .connection_customizer(Box::new(ForeignKeyPragma))
        .build(ConnectionManager::new(database_url))
        .expect("Couldn't build connection pool")
}

pub fn run_migrations(
    connection: &SqliteConnection,
) -> Result<(), diesel_migrations::RunMigrationsError> {
    embedded_migrations::run(connection)
}

pub fn setup_roles(connection: &SqliteConnection) {
    for name in &role::BUILTIN_ROLES {
        if role::get_role_by_name(connection, name).is_err() {
            info!("Inserting role {}...", name);
            role::insert_role(connection, name).expect("Error saving new role");
        }
    }
}

pub fn setup_admin(connection: &SqliteConnection) {
    let admin_username = "admin";
    let admin_password = "admin";

    match user::get_user_by_username(connection, admin_username) {
        Ok(_) => {
            info!(
                "Admin already created. Is using default password? {}",
                user::check_matching_password(connection, admin_username, admin_password)
                    .expect("Couldn't check match password")
            );
        }
        Err(_) => {
            info!("Inserting admin...");
            let admin_role = role::get_role_by_name(connection, role::ADMIN)
                .expect("Roles should be seeded before the admin user");
            user::insert_new_user(
                connection,
                NewUser {
                    role_id: admin_role.id,
                    username: admin_username,
                    email: "admin@localhost",
                    password: admin_password,
                    wallet_address: None,
                    first_name: "Admin",
                    last_name: "User",
                },
            )
            .expect("Error saving new user");
        }
    }
}

#[cfg(test)]
pub fn test_connection() -> SqliteConnection {
    let connection = SqliteConnection::establish(":memory:").expect("in-memory database");
    connection
        .execute("PRAGMA foreign_keys = ON")
        .expect("foreign keys pragma");
    embedded_migrations::run(&connection).expect("migrations should apply");
    connection
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_is_idempotent() {
        let connection = test_connection();
        env::set_var("SECRET_HASH_KEY", "test-secret-salt");

        setup_roles(&connection);
        setup_roles(&connection);
        assert_eq!(
            role::get_roles(&connection).unwrap().len(),
            role::BUILTIN_ROLES.len()
        );

        setup_admin(&connection);
        setup_admin(&connection);
        let admin = user::get_user_by_username(&connection, "admin").unwrap();
        assert!(user::check_matching_password(&connection, "admin", "admin").unwrap());
        let admin_role = role::get_role_by_name(&connection, role::ADMIN).unwrap();
        assert_eq!(admin.role_id, admin_role.id);
    }

    #[test]
    fn migrations_enforce_foreign_keys() {
        let connection = test_connection();
        let result = connection.execute(
            "INSERT INTO team (hackathon_id, name, created_at)
             VALUES (999, 'orphan', '2024-03-01 09:00:00')",
        );
        assert!(result.is_err());
    }
}
