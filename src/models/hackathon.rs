use chrono::prelude::*;
use diesel::insert_into;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::schema::hackathon;
use crate::schema::hackathon_sponsor;
use crate::schema::submission;
use crate::schema::team;

#[derive(Queryable, Serialize)]
pub struct Hackathon {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub location: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[table_name = "hackathon"]
pub struct NewHackathon {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub location: String,
    pub created_at: NaiveDateTime,
}

#[derive(Error, Debug)]
pub enum HackathonError {
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error("start date {start} is after end date {end}")]
    DateRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

pub fn insert_hackathon(
    connection: &SqliteConnection,
    new_hackathon: NewHackathon,
) -> Result<Hackathon, HackathonError> {
    if new_hackathon.start_date > new_hackathon.end_date {
        return Err(HackathonError::DateRange {
            start: new_hackathon.start_date,
            end: new_hackathon.end_date,
        });
    }
    insert_into(hackathon::table)
        .values(new_hackathon)
        .execute(connection)?;
    let id = super::last_insert_id(connection)?;
    Ok(hackathon::table.find(id).first(connection)?)
}

pub fn get_hackathons(connection: &SqliteConnection) -> QueryResult<Vec<Hackathon>> {
    hackathon::table
        .order_by(hackathon::start_date.desc())
        .load(connection)
}

pub fn get_hackathon(connection: &SqliteConnection, id: i32) -> QueryResult<Hackathon> {
    hackathon::table.find(id).first(connection)
}

pub fn update_hackathon_dates(
    connection: &SqliteConnection,
    id: i32,
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
) -> Result<Hackathon, HackathonError> {
    if start_date > end_date {
        return Err(HackathonError::DateRange {
            start: start_date,
            end: end_date,
        });
    }
    diesel::update(hackathon::table.find(id))
        .set((
            hackathon::start_date.eq(start_date),
            hackathon::end_date.eq(end_date),
            hackathon::updated_at.eq(Some(Utc::now().naive_utc())),
        ))
        .execute(connection)?;
    Ok(get_hackathon(connection, id)?)
}

#[derive(Error, Debug)]
pub enum DeleteHackathonError {
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error("hackathon {0} still has dependent teams, submissions or sponsorships")]
    InUse(i32),
}

pub fn delete_hackathon(connection: &SqliteConnection, id: i32) -> Result<(), DeleteHackathonError> {
    let teams: i64 = team::table
        .filter(team::hackathon_id.eq(id))
        .count()
        .get_result(connection)?;
    let submissions: i64 = submission::table
        .filter(submission::hackathon_id.eq(id))
        .count()
        .get_result(connection)?;
    let sponsorships: i64 = hackathon_sponsor::table
        .filter(hackathon_sponsor::hackathon_id.eq(id))
        .count()
        .get_result(connection)?;
    if teams + submissions + sponsorships > 0 {
        return Err(DeleteHackathonError::InUse(id));
    }
    diesel::delete(hackathon::table.find(id)).execute(connection)?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SponsorshipLevel {
    Platinum,
    Gold,
    Silver,
    Bronze,
}

impl SponsorshipLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SponsorshipLevel::Platinum => "platinum",
            SponsorshipLevel::Gold => "gold",
            SponsorshipLevel::Silver => "silver",
            SponsorshipLevel::Bronze => "bronze",
        }
    }
}

impl fmt::Display for SponsorshipLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("unknown sponsorship level: {0}")]
pub struct ParseSponsorshipLevelError(String);

impl FromStr for SponsorshipLevel {
    type Err = ParseSponsorshipLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "platinum" => Ok(SponsorshipLevel::Platinum),
            "gold" => Ok(SponsorshipLevel::Gold),
            "silver" => Ok(SponsorshipLevel::Silver),
            "bronze" => Ok(SponsorshipLevel::Bronze),
            other => Err(ParseSponsorshipLevelError(other.into())),
        }
    }
}

#[derive(Queryable, Serialize)]
pub struct HackathonSponsor {
    pub hackathon_id: i32,
    pub sponsor_id: i32,
    pub sponsorship_level: String,
}

#[derive(Insertable)]
#[table_name = "hackathon_sponsor"]
struct NewHackathonSponsor<'a> {
    pub hackathon_id: i32,
    pub sponsor_id: i32,
    pub sponsorship_level: &'a str,
}

#[derive(Error, Debug)]
pub enum SponsorshipError {
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error("sponsor {sponsor_id} already sponsors hackathon {hackathon_id}")]
    AlreadySponsoring { hackathon_id: i32, sponsor_id: i32 },
}

pub fn add_sponsor(
    connection: &SqliteConnection,
    hackathon_id: i32,
    sponsor_id: i32,
    level: SponsorshipLevel,
) -> Result<HackathonSponsor, SponsorshipError> {
    let existing: i64 = hackathon_sponsor::table
        .find((hackathon_id, sponsor_id))
        .count()
        .get_result(connection)?;
    if existing > 0 {
        return Err(SponsorshipError::AlreadySponsoring {
            hackathon_id,
            sponsor_id,
        });
    }
    insert_into(hackathon_sponsor::table)
        .values(NewHackathonSponsor {
            hackathon_id,
            sponsor_id,
            sponsorship_level: level.as_str(),
        })
        .execute(connection)?;
    Ok(hackathon_sponsor::table
        .find((hackathon_id, sponsor_id))
        .first(connection)?)
}

pub fn get_sponsorships(
    connection: &SqliteConnection,
    hackathon_id: i32,
) -> QueryResult<Vec<HackathonSponsor>> {
    hackathon_sponsor::table
        .filter(hackathon_sponsor::hackathon_id.eq(hackathon_id))
        .load(connection)
}

pub fn remove_sponsor(
    connection: &SqliteConnection,
    hackathon_id: i32,
    sponsor_id: i32,
) -> QueryResult<()> {
    diesel::delete(hackathon_sponsor::table.find((hackathon_id, sponsor_id)))
        .execute(connection)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sponsor::{insert_sponsor, NewSponsor};
    use crate::models::team;
    use crate::setup::test_connection;

    fn march(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd(2024, 3, day).and_hms(9, 0, 0)
    }

    fn new_hackathon(start: NaiveDateTime, end: NaiveDateTime) -> NewHackathon {
        NewHackathon {
            title: "ETHOslo".into(),
            description: "48h of hacking".into(),
            start_date: start,
            end_date: end,
            location: "Oslo".into(),
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn start_after_end_is_rejected() {
        let connection = test_connection();
        match insert_hackathon(&connection, new_hackathon(march(5), march(3))) {
            Err(HackathonError::DateRange { .. }) => {}
            _ => panic!("expected DateRange error"),
        }
    }

    #[test]
    fn date_update_is_validated_too() {
        let connection = test_connection();
        let hackathon = insert_hackathon(&connection, new_hackathon(march(1), march(3))).unwrap();
        assert!(update_hackathon_dates(&connection, hackathon.id, march(4), march(2)).is_err());

        let updated = update_hackathon_dates(&connection, hackathon.id, march(2), march(4)).unwrap();
        assert_eq!(updated.start_date, march(2));
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn duplicate_sponsorship_is_rejected() {
        let connection = test_connection();
        let hackathon = insert_hackathon(&connection, new_hackathon(march(1), march(3))).unwrap();
        let sponsor = insert_sponsor(
            &connection,
            NewSponsor {
                name: "Globex".into(),
                contact_email: "events@globex.example".into(),
                phone: None,
                logo_url: None,
                website_url: None,
            },
        )
        .unwrap();

        let sponsorship =
            add_sponsor(&connection, hackathon.id, sponsor.id, SponsorshipLevel::Gold).unwrap();
        assert_eq!(sponsorship.sponsorship_level, "gold");

        match add_sponsor(&connection, hackathon.id, sponsor.id, SponsorshipLevel::Bronze) {
            Err(SponsorshipError::AlreadySponsoring { .. }) => {}
            _ => panic!("expected AlreadySponsoring"),
        }
    }

    #[test]
    fn delete_is_rejected_while_teams_exist() {
        let connection = test_connection();
        let hackathon = insert_hackathon(&connection, new_hackathon(march(1), march(3))).unwrap();
        team::insert_team(
            &connection,
            team::NewTeam {
                hackathon_id: hackathon.id,
                name: "Segfault Club".into(),
                created_at: Utc::now().naive_utc(),
            },
        )
        .unwrap();

        match delete_hackathon(&connection, hackathon.id) {
            Err(DeleteHackathonError::InUse(id)) => assert_eq!(id, hackathon.id),
            _ => panic!("expected InUse"),
        }
    }

    #[test]
    fn empty_hackathon_can_be_deleted() {
        let connection = test_connection();
        let hackathon = insert_hackathon(&connection, new_hackathon(march(1), march(3))).unwrap();
        delete_hackathon(&connection, hackathon.id).unwrap();
        assert!(get_hackathon(&connection, hackathon.id).is_err());
    }

    #[test]
    fn sponsorship_levels_round_trip_as_text() {
        assert_eq!(
            "platinum".parse::<SponsorshipLevel>().unwrap(),
            SponsorshipLevel::Platinum
        );
        assert!("diamond".parse::<SponsorshipLevel>().is_err());
    }
}
