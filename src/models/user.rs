use chrono::prelude::*;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::Serialize;
use std::env;
use thiserror::Error;

use crate::models::role;
use crate::schema::role as role_schema;
use crate::schema::user as user_column;
use crate::schema::user;
use crate::schema::user::dsl::user as user_table;

#[derive(Queryable)]
struct UserWithHashedPassword {
    pub id: i32,
    pub role_id: i32,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub wallet_address: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Queryable, Serialize)]
pub struct User {
    pub id: i32,
    pub role_id: i32,
    pub username: String,
    pub email: String,
    pub wallet_address: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

const USER_COLUMNS: (
    user_column::id,
    user_column::role_id,
    user_column::username,
    user_column::email,
    user_column::wallet_address,
    user_column::first_name,
    user_column::last_name,
    user_column::created_at,
    user_column::updated_at,
) = (
    user_column::id,
    user_column::role_id,
    user_column::username,
    user_column::email,
    user_column::wallet_address,
    user_column::first_name,
    user_column::last_name,
    user_column::created_at,
    user_column::updated_at,
);

#[derive(Insertable)]
#[table_name = "user"]
struct DatabaseNewUser<'a> {
    pub role_id: i32,
    pub username: &'a str,
    pub email: &'a str,
    pub hashed_password: &'a str,
    pub wallet_address: Option<&'a str>,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub created_at: NaiveDateTime,
}

pub struct NewUser<'a> {
    pub role_id: i32,
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub wallet_address: Option<&'a str>,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

pub fn get_user(connection: &SqliteConnection, id: i32) -> QueryResult<User> {
    user_table
        .select(USER_COLUMNS)
        .filter(user_column::id.eq(id))
        .first(connection)
}

pub fn get_user_by_username(connection: &SqliteConnection, username: &str) -> QueryResult<User> {
    Ok(user_table
        .select(USER_COLUMNS)
        .filter(user_column::username.eq(username))
        .first::<User>(connection)?)
}

pub fn get_users(connection: &SqliteConnection) -> QueryResult<Vec<User>> {
    user_table.select(USER_COLUMNS).load::<User>(connection)
}

#[derive(Error, Debug)]
pub enum UserHashingError {
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error(transparent)]
    Hash(#[from] argon2::Error),
}

pub fn check_matching_password(
    connection: &SqliteConnection,
    username: &str,
    password: &str,
) -> Result<bool, UserHashingError> {
    let user = user_table
        .filter(user_column::username.eq(username))
        .first::<UserWithHashedPassword>(connection)?;
    Ok(argon2::verify_encoded(
        &user.hashed_password,
        password.as_bytes(),
    )?)
}

pub fn insert_new_user(
    connection: &SqliteConnection,
    new_user: NewUser,
) -> Result<User, UserHashingError> {
    let NewUser {
        role_id,
        username,
        email,
        password,
        wallet_address,
        first_name,
        last_name,
    } = new_user;

    let config = argon2::Config::default();
    let hashed_password = argon2::hash_encoded(
        password.as_bytes(),
        env::var("SECRET_HASH_KEY")
            .expect("SECRET_HASH_KEY must be set")
            .as_bytes(),
        &config,
    )?;

    diesel::insert_into(user_table)
        .values(DatabaseNewUser {
            role_id,
            username,
            email,
            hashed_password: &hashed_password,
            wallet_address,
            first_name,
            last_name,
            created_at: Utc::now().naive_utc(),
        })
        .execute(connection)?;

    Ok(get_user_by_username(connection, username)?)
}

pub fn is_judge(connection: &SqliteConnection, user_id: i32) -> QueryResult<bool> {
    let role_name: String = user_table
        .inner_join(role_schema::table)
        .filter(user_column::id.eq(user_id))
        .select(role_schema::name)
        .first(connection)?;
    Ok(role_name == role::JUDGE)
}
