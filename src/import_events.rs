use chrono::prelude::*;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::io::Read;

use crate::models::hackathon::{self, NewHackathon, SponsorshipLevel};
use crate::models::sponsor::{self, NewSponsor, Sponsor};
use crate::models::submission::{self, NewSubmission, SubmissionStatus};
use crate::models::team::{self, NewTeam};

mod error {
    use crate::models::hackathon::{HackathonError, ParseSponsorshipLevelError, SponsorshipError};
    use crate::models::submission::SubmissionError;
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum ImportEventsError {
        #[error(transparent)]
        Decode(#[from] serde_json::Error),
        #[error(transparent)]
        Database(#[from] diesel::result::Error),
        #[error(transparent)]
        Hackathon(#[from] HackathonError),
        #[error(transparent)]
        Sponsorship(#[from] SponsorshipError),
        #[error(transparent)]
        Submission(#[from] SubmissionError),
        #[error(transparent)]
        Level(#[from] ParseSponsorshipLevelError),
    }
}

pub use error::ImportEventsError;

mod records {
    use chrono::NaiveDateTime;
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Export {
        pub events: Vec<Event>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Event {
        pub title: String,
        pub description: String,
        pub start_date: NaiveDateTime,
        pub end_date: NaiveDateTime,
        pub location: String,
        #[serde(default)]
        pub sponsors: Vec<Sponsor>,
        #[serde(default)]
        pub projects: Vec<Project>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Sponsor {
        pub name: String,
        pub contact_email: String,
        pub website_url: Option<String>,
        pub level: String,
    }

    #[derive(Deserialize, Debug)]
    pub struct Project {
        pub name: String,
        pub team_name: String,
        pub description: String,
        pub link: String,
        pub submitted_at: NaiveDateTime,
    }
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub hackathons: usize,
    pub sponsorships: usize,
    pub submissions: usize,
}

pub fn import_events<R: Read>(
    connection: &SqliteConnection,
    reader: R,
) -> Result<ImportSummary, ImportEventsError> {
    let export: records::Export = serde_json::from_reader(reader)?;
    connection.transaction(|| {
        let mut summary = ImportSummary::default();

        for event in export.events {
            let hackathon_row = hackathon::insert_hackathon(
                connection,
                NewHackathon {
                    title: event.title,
                    description: event.description,
                    start_date: event.start_date,
                    end_date: event.end_date,
                    location: event.location,
                    created_at: Utc::now().naive_utc(),
                },
            )?;
            summary.hackathons += 1;

            for record in event.sponsors {
                let level: SponsorshipLevel = record.level.parse()?;
                let sponsor_row = find_or_insert_sponsor(connection, record)?;
                hackathon::add_sponsor(connection, hackathon_row.id, sponsor_row.id, level)?;
                summary.sponsorships += 1;
            }

            for project in event.projects {
                let team_row = team::insert_team(
                    connection,
                    NewTeam {
                        hackathon_id: hackathon_row.id,
                        name: project.team_name,
                        created_at: Utc::now().naive_utc(),
                    },
                )?;
                let submission_row = submission::insert_submission(
                    connection,
                    NewSubmission {
                        team_id: team_row.id,
                        name: project.name,
                        description: project.description,
                        link: project.link,
                        submitted_at: project.submitted_at,
                    },
                )?;
                submission::update_status(
                    connection,
                    submission_row.id,
                    SubmissionStatus::Submitted,
                )?;
                summary.submissions += 1;
            }
        }

        Ok(summary)
    })
}

// Sponsors recur across events, matched by name
fn find_or_insert_sponsor(
    connection: &SqliteConnection,
    record: records::Sponsor,
) -> Result<Sponsor, ImportEventsError> {
    if let Some(existing) = sponsor::get_sponsor_by_name(connection, &record.name).optional()? {
        return Ok(existing);
    }
    Ok(sponsor::insert_sponsor(
        connection,
        NewSponsor {
            name: record.name,
            contact_email: record.contact_email,
            phone: None,
            logo_url: None,
            website_url: record.website_url,
        },
    )?)
}
