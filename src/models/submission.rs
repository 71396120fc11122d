use chrono::prelude::*;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::schema::score;
use crate::schema::submission as submission_column;
use crate::schema::submission;
use crate::schema::submission::dsl::submission as submission_table;
use crate::schema::team;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmissionStatus {
    Draft,
    Submitted,
    UnderReview,
    Judged,
    Disqualified,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Draft => "draft",
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::UnderReview => "under_review",
            SubmissionStatus::Judged => "judged",
            SubmissionStatus::Disqualified => "disqualified",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("unknown submission status: {0}")]
pub struct ParseSubmissionStatusError(String);

impl FromStr for SubmissionStatus {
    type Err = ParseSubmissionStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(SubmissionStatus::Draft),
            "submitted" => Ok(SubmissionStatus::Submitted),
            "under_review" => Ok(SubmissionStatus::UnderReview),
            "judged" => Ok(SubmissionStatus::Judged),
            "disqualified" => Ok(SubmissionStatus::Disqualified),
            other => Err(ParseSubmissionStatusError(other.into())),
        }
    }
}

#[derive(Queryable, Serialize)]
pub struct Submission {
    pub id: i32,
    pub team_id: i32,
    pub hackathon_id: i32,
    pub name: String,
    pub description: String,
    pub link: String,
    pub submitted_at: NaiveDateTime,
    pub status: String,
}

#[derive(Insertable)]
#[table_name = "submission"]
struct DatabaseNewSubmission<'a> {
    pub team_id: i32,
    pub hackathon_id: i32,
    pub name: &'a str,
    pub description: &'a str,
    pub link: &'a str,
    pub submitted_at: NaiveDateTime,
    pub status: &'a str,
}

pub struct NewSubmission {
    pub team_id: i32,
    pub name: String,
    pub description: String,
    pub link: String,
    pub submitted_at: NaiveDateTime,
}

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error("team {0} does not exist")]
    UnknownTeam(i32),
}

// hackathon_id mirrors the team's hackathon and is never caller-settable
pub fn insert_submission(
    connection: &SqliteConnection,
    new_submission: NewSubmission,
) -> Result<Submission, SubmissionError> {
    let team: crate::models::team::Team = team::table
        .find(new_submission.team_id)
        .first(connection)
        .optional()?
        .ok_or(SubmissionError::UnknownTeam(new_submission.team_id))?;

    diesel::insert_into(submission_table)
        .values(DatabaseNewSubmission {
            team_id: team.id,
            hackathon_id: team.hackathon_id,
            name: &new_submission.name,
            description: &new_submission.description,
            link: &new_submission.link,
            submitted_at: new_submission.submitted_at,
            status: SubmissionStatus::Draft.as_str(),
        })
        .execute(connection)?;

    let id = super::last_insert_id(connection)?;
    Ok(submission_table.find(id).first(connection)?)
}

pub fn update_status(
    connection: &SqliteConnection,
    id: i32,
    status: SubmissionStatus,
) -> QueryResult<()> {
    diesel::update(submission_table.find(id))
        .set(submission_column::status.eq(status.as_str()))
        .execute(connection)?;
    Ok(())
}

pub fn get_submission(connection: &SqliteConnection, id: i32) -> QueryResult<Submission> {
    submission_table.find(id).first(connection)
}

pub fn get_submissions(connection: &SqliteConnection) -> QueryResult<Vec<Submission>> {
    submission_table
        .order_by(submission_column::submitted_at.desc())
        .load::<Submission>(connection)
}

pub fn get_submissions_by_hackathon(
    connection: &SqliteConnection,
    hackathon_id: i32,
) -> QueryResult<Vec<Submission>> {
    submission_table
        .filter(submission_column::hackathon_id.eq(hackathon_id))
        .order_by(submission_column::submitted_at.desc())
        .load(connection)
}

pub fn get_submissions_by_team(
    connection: &SqliteConnection,
    team_id: i32,
) -> QueryResult<Vec<Submission>> {
    submission_table
        .filter(submission_column::team_id.eq(team_id))
        .order_by(submission_column::submitted_at.desc())
        .load(connection)
}

#[derive(Error, Debug)]
pub enum DeleteSubmissionError {
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error("submission {0} has already been scored")]
    InUse(i32),
}

pub fn delete_submission(
    connection: &SqliteConnection,
    id: i32,
) -> Result<(), DeleteSubmissionError> {
    let scores: i64 = score::table
        .filter(score::submission_id.eq(id))
        .count()
        .get_result(connection)?;
    if scores > 0 {
        return Err(DeleteSubmissionError::InUse(id));
    }
    diesel::delete(submission_table.find(id)).execute(connection)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hackathon::{insert_hackathon, NewHackathon};
    use crate::models::team::{insert_team, NewTeam};
    use crate::setup::test_connection;

    fn seed_team(connection: &SqliteConnection, title: &str) -> (i32, i32) {
        let hackathon = insert_hackathon(
            connection,
            NewHackathon {
                title: title.into(),
                description: "48h of hacking".into(),
                start_date: NaiveDate::from_ymd(2024, 3, 1).and_hms(9, 0, 0),
                end_date: NaiveDate::from_ymd(2024, 3, 3).and_hms(18, 0, 0),
                location: "Oslo".into(),
                created_at: Utc::now().naive_utc(),
            },
        )
        .unwrap();
        let team = insert_team(
            connection,
            NewTeam {
                hackathon_id: hackathon.id,
                name: "Segfault Club".into(),
                created_at: Utc::now().naive_utc(),
            },
        )
        .unwrap();
        (hackathon.id, team.id)
    }

    fn new_submission(team_id: i32) -> NewSubmission {
        NewSubmission {
            team_id,
            name: "ChainChat".into(),
            description: "p2p chat".into(),
            link: "https://example.com/chainchat".into(),
            submitted_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn hackathon_id_is_derived_from_the_team() {
        let connection = test_connection();
        let (_decoy, _) = seed_team(&connection, "ETHOslo");
        let (hackathon_id, team_id) = seed_team(&connection, "ETHBergen");

        let submission = insert_submission(&connection, new_submission(team_id)).unwrap();
        assert_eq!(submission.hackathon_id, hackathon_id);
        assert_eq!(submission.status, "draft");
    }

    #[test]
    fn unknown_team_is_rejected() {
        let connection = test_connection();
        match insert_submission(&connection, new_submission(4242)) {
            Err(SubmissionError::UnknownTeam(4242)) => {}
            _ => panic!("expected UnknownTeam"),
        }
    }

    #[test]
    fn status_updates_are_persisted() {
        let connection = test_connection();
        let (_, team_id) = seed_team(&connection, "ETHOslo");
        let submission = insert_submission(&connection, new_submission(team_id)).unwrap();

        update_status(&connection, submission.id, SubmissionStatus::UnderReview).unwrap();
        let fetched = get_submission(&connection, submission.id).unwrap();
        assert_eq!(
            fetched.status.parse::<SubmissionStatus>().unwrap(),
            SubmissionStatus::UnderReview
        );
    }

    #[test]
    fn listing_by_hackathon_only_returns_its_submissions() {
        let connection = test_connection();
        let (first_hackathon, first_team) = seed_team(&connection, "ETHOslo");
        let (_, second_team) = seed_team(&connection, "ETHBergen");

        insert_submission(&connection, new_submission(first_team)).unwrap();
        insert_submission(&connection, new_submission(second_team)).unwrap();

        let submissions = get_submissions_by_hackathon(&connection, first_hackathon).unwrap();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].team_id, first_team);
        assert_eq!(get_submissions(&connection).unwrap().len(), 2);
    }
}
