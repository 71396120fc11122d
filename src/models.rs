use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

pub mod hackathon;
pub mod judging;
pub mod role;
pub mod sponsor;
pub mod submission;
pub mod team;
pub mod user;

no_arg_sql_function!(last_insert_rowid, diesel::sql_types::Integer);

pub(crate) fn last_insert_id(connection: &SqliteConnection) -> QueryResult<i32> {
    diesel::select(last_insert_rowid).first(connection)
}
