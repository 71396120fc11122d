use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::Serialize;
use thiserror::Error;

use crate::schema::role;
use crate::schema::user;

pub const ADMIN: &str = "admin";
pub const ORGANIZER: &str = "organizer";
pub const PARTICIPANT: &str = "participant";
pub const JUDGE: &str = "judge";

pub const BUILTIN_ROLES: [&str; 4] = [ADMIN, ORGANIZER, PARTICIPANT, JUDGE];

#[derive(Queryable, Serialize)]
pub struct Role {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[table_name = "role"]
struct NewRole<'a> {
    pub name: &'a str,
}

pub fn insert_role(connection: &SqliteConnection, name: &str) -> QueryResult<Role> {
    diesel::insert_into(role::table)
        .values(NewRole { name })
        .execute(connection)?;
    get_role_by_name(connection, name)
}

pub fn get_role_by_name(connection: &SqliteConnection, name: &str) -> QueryResult<Role> {
    role::table.filter(role::name.eq(name)).first(connection)
}

pub fn get_roles(connection: &SqliteConnection) -> QueryResult<Vec<Role>> {
    role::table.load(connection)
}

#[derive(Error, Debug)]
pub enum DeleteRoleError {
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error("role {0} is still assigned to {1} user(s)")]
    InUse(i32, i64),
}

pub fn delete_role(connection: &SqliteConnection, id: i32) -> Result<(), DeleteRoleError> {
    let assigned: i64 = user::table
        .filter(user::role_id.eq(id))
        .count()
        .get_result(connection)?;
    if assigned > 0 {
        return Err(DeleteRoleError::InUse(id, assigned));
    }
    diesel::delete(role::table.filter(role::id.eq(id))).execute(connection)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{insert_new_user, NewUser};
    use crate::setup::test_connection;

    #[test]
    fn roles_are_unique_by_name() {
        let connection = test_connection();
        insert_role(&connection, JUDGE).unwrap();
        assert!(insert_role(&connection, JUDGE).is_err());
    }

    #[test]
    fn delete_is_rejected_while_users_hold_the_role() {
        let connection = test_connection();
        std::env::set_var("SECRET_HASH_KEY", "test-secret-salt");
        let judge_role = insert_role(&connection, JUDGE).unwrap();
        insert_new_user(
            &connection,
            NewUser {
                role_id: judge_role.id,
                username: "ada",
                email: "ada@example.com",
                password: "hunter2",
                wallet_address: None,
                first_name: "Ada",
                last_name: "Lovelace",
            },
        )
        .unwrap();

        match delete_role(&connection, judge_role.id) {
            Err(DeleteRoleError::InUse(id, count)) => {
                assert_eq!(id, judge_role.id);
                assert_eq!(count, 1);
            }
            _ => panic!("expected InUse"),
        }
    }

    #[test]
    fn unreferenced_role_can_be_deleted() {
        let connection = test_connection();
        let role = insert_role(&connection, "mentor").unwrap();
        delete_role(&connection, role.id).unwrap();
        assert!(get_role_by_name(&connection, "mentor").is_err());
    }
}
