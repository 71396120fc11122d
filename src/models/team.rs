use chrono::prelude::*;
use diesel::insert_into;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::Serialize;
use thiserror::Error;

use crate::schema::submission;
use crate::schema::team;
use crate::schema::team_member;

#[derive(Queryable, Serialize)]
pub struct Team {
    pub id: i32,
    pub hackathon_id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "team"]
pub struct NewTeam {
    pub hackathon_id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
}

pub fn insert_team(connection: &SqliteConnection, new_team: NewTeam) -> QueryResult<Team> {
    insert_into(team::table)
        .values(new_team)
        .execute(connection)?;
    let id = super::last_insert_id(connection)?;
    team::table.find(id).first(connection)
}

pub fn get_team(connection: &SqliteConnection, id: i32) -> QueryResult<Team> {
    team::table.find(id).first(connection)
}

pub fn get_teams_by_hackathon(
    connection: &SqliteConnection,
    hackathon_id: i32,
) -> QueryResult<Vec<Team>> {
    team::table
        .filter(team::hackathon_id.eq(hackathon_id))
        .load(connection)
}

#[derive(Error, Debug)]
pub enum DeleteTeamError {
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error("team {0} still has members or submissions")]
    InUse(i32),
}

pub fn delete_team(connection: &SqliteConnection, id: i32) -> Result<(), DeleteTeamError> {
    let members: i64 = team_member::table
        .filter(team_member::team_id.eq(id))
        .count()
        .get_result(connection)?;
    let submissions: i64 = submission::table
        .filter(submission::team_id.eq(id))
        .count()
        .get_result(connection)?;
    if members + submissions > 0 {
        return Err(DeleteTeamError::InUse(id));
    }
    diesel::delete(team::table.find(id)).execute(connection)?;
    Ok(())
}

#[derive(Queryable, Serialize)]
pub struct TeamMember {
    pub user_id: i32,
    pub team_id: i32,
    pub role_in_team: String,
    pub joined_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "team_member"]
pub struct NewTeamMember {
    pub user_id: i32,
    pub team_id: i32,
    pub role_in_team: String,
    pub joined_at: NaiveDateTime,
}

#[derive(Error, Debug)]
pub enum MembershipError {
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error("user {user_id} is already a member of team {team_id}")]
    AlreadyInTeam { user_id: i32, team_id: i32 },
}

pub fn add_team_member(
    connection: &SqliteConnection,
    new_member: NewTeamMember,
) -> Result<TeamMember, MembershipError> {
    let existing: i64 = team_member::table
        .find((new_member.user_id, new_member.team_id))
        .count()
        .get_result(connection)?;
    if existing > 0 {
        return Err(MembershipError::AlreadyInTeam {
            user_id: new_member.user_id,
            team_id: new_member.team_id,
        });
    }
    let key = (new_member.user_id, new_member.team_id);
    insert_into(team_member::table)
        .values(new_member)
        .execute(connection)?;
    Ok(team_member::table.find(key).first(connection)?)
}

pub fn get_team_members(
    connection: &SqliteConnection,
    team_id: i32,
) -> QueryResult<Vec<TeamMember>> {
    team_member::table
        .filter(team_member::team_id.eq(team_id))
        .order_by(team_member::joined_at.asc())
        .load(connection)
}

pub fn get_memberships_for_user(
    connection: &SqliteConnection,
    user_id: i32,
) -> QueryResult<Vec<TeamMember>> {
    team_member::table
        .filter(team_member::user_id.eq(user_id))
        .load(connection)
}

pub fn remove_team_member(
    connection: &SqliteConnection,
    user_id: i32,
    team_id: i32,
) -> QueryResult<()> {
    diesel::delete(team_member::table.find((user_id, team_id))).execute(connection)?;
    Ok(())
}
