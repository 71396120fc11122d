use diesel::insert_into;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::Serialize;
use thiserror::Error;

use crate::schema::hackathon_sponsor;
use crate::schema::sponsor;

#[derive(Queryable, Serialize)]
pub struct Sponsor {
    pub id: i32,
    pub name: String,
    pub contact_email: String,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
}

#[derive(Insertable)]
#[table_name = "sponsor"]
pub struct NewSponsor {
    pub name: String,
    pub contact_email: String,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
}

pub fn insert_sponsor(
    connection: &SqliteConnection,
    new_sponsor: NewSponsor,
) -> QueryResult<Sponsor> {
    insert_into(sponsor::table)
        .values(new_sponsor)
        .execute(connection)?;
    let id = super::last_insert_id(connection)?;
    sponsor::table.find(id).first(connection)
}

pub fn get_sponsor(connection: &SqliteConnection, id: i32) -> QueryResult<Sponsor> {
    sponsor::table.find(id).first(connection)
}

pub fn get_sponsor_by_name(connection: &SqliteConnection, name: &str) -> QueryResult<Sponsor> {
    sponsor::table.filter(sponsor::name.eq(name)).first(connection)
}

pub fn get_sponsors(connection: &SqliteConnection) -> QueryResult<Vec<Sponsor>> {
    sponsor::table.order_by(sponsor::name.asc()).load(connection)
}

#[derive(Error, Debug)]
pub enum DeleteSponsorError {
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error("sponsor {0} is still attached to a hackathon")]
    InUse(i32),
}

pub fn delete_sponsor(connection: &SqliteConnection, id: i32) -> Result<(), DeleteSponsorError> {
    let sponsorships: i64 = hackathon_sponsor::table
        .filter(hackathon_sponsor::sponsor_id.eq(id))
        .count()
        .get_result(connection)?;
    if sponsorships > 0 {
        return Err(DeleteSponsorError::InUse(id));
    }
    diesel::delete(sponsor::table.find(id)).execute(connection)?;
    Ok(())
}
