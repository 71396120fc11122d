use chrono::prelude::*;
use diesel::insert_into;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::Serialize;
use thiserror::Error;

use crate::models::user;
use crate::schema::judging_criteria;
use crate::schema::score;

#[derive(Queryable, Serialize)]
pub struct JudgingCriteria {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub weight: f64,
    pub max_score: f64,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[table_name = "judging_criteria"]
struct DatabaseNewCriteria<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub weight: f64,
    pub max_score: f64,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
}

pub struct NewJudgingCriteria {
    pub name: String,
    pub description: String,
    pub weight: f64,
    pub max_score: f64,
    pub created_by: i32,
}

#[derive(Error, Debug)]
pub enum JudgingError {
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error("user {0} does not hold the judge role")]
    NotAJudge(i32),
    #[error("weight must be positive, got {0}")]
    InvalidWeight(f64),
    #[error("max score must be positive, got {0}")]
    InvalidMaxScore(f64),
    #[error("judge {judge_id} already scored submission {submission_id} on criteria {criteria_id}")]
    DuplicateScore {
        judge_id: i32,
        submission_id: i32,
        criteria_id: i32,
    },
    #[error("score {value} is outside 0..={max} for criteria {criteria_id}")]
    ScoreOutOfRange {
        value: f64,
        max: f64,
        criteria_id: i32,
    },
}

pub fn insert_criteria(
    connection: &SqliteConnection,
    new_criteria: NewJudgingCriteria,
) -> Result<JudgingCriteria, JudgingError> {
    if new_criteria.weight <= 0.0 {
        return Err(JudgingError::InvalidWeight(new_criteria.weight));
    }
    if new_criteria.max_score <= 0.0 {
        return Err(JudgingError::InvalidMaxScore(new_criteria.max_score));
    }
    if !user::is_judge(connection, new_criteria.created_by)? {
        return Err(JudgingError::NotAJudge(new_criteria.created_by));
    }
    insert_into(judging_criteria::table)
        .values(DatabaseNewCriteria {
            name: &new_criteria.name,
            description: &new_criteria.description,
            weight: new_criteria.weight,
            max_score: new_criteria.max_score,
            created_by: new_criteria.created_by,
            created_at: Utc::now().naive_utc(),
        })
        .execute(connection)?;
    let id = super::last_insert_id(connection)?;
    Ok(judging_criteria::table.find(id).first(connection)?)
}

pub fn get_criteria(connection: &SqliteConnection) -> QueryResult<Vec<JudgingCriteria>> {
    judging_criteria::table.load(connection)
}

pub fn get_criteria_by_id(connection: &SqliteConnection, id: i32) -> QueryResult<JudgingCriteria> {
    judging_criteria::table.find(id).first(connection)
}

pub struct CriteriaUpdate {
    pub name: String,
    pub description: String,
    pub weight: f64,
    pub max_score: f64,
}

pub fn update_criteria(
    connection: &SqliteConnection,
    id: i32,
    update: CriteriaUpdate,
) -> Result<JudgingCriteria, JudgingError> {
    if update.weight <= 0.0 {
        return Err(JudgingError::InvalidWeight(update.weight));
    }
    if update.max_score <= 0.0 {
        return Err(JudgingError::InvalidMaxScore(update.max_score));
    }
    diesel::update(judging_criteria::table.find(id))
        .set((
            judging_criteria::name.eq(update.name),
            judging_criteria::description.eq(update.description),
            judging_criteria::weight.eq(update.weight),
            judging_criteria::max_score.eq(update.max_score),
            judging_criteria::updated_at.eq(Some(Utc::now().naive_utc())),
        ))
        .execute(connection)?;
    Ok(get_criteria_by_id(connection, id)?)
}

#[derive(Error, Debug)]
pub enum DeleteCriteriaError {
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error("criteria {0} has already been used for scoring")]
    InUse(i32),
}

pub fn delete_criteria(connection: &SqliteConnection, id: i32) -> Result<(), DeleteCriteriaError> {
    let scores: i64 = score::table
        .filter(score::criteria_id.eq(id))
        .count()
        .get_result(connection)?;
    if scores > 0 {
        return Err(DeleteCriteriaError::InUse(id));
    }
    diesel::delete(judging_criteria::table.find(id)).execute(connection)?;
    Ok(())
}

#[derive(Queryable, Serialize)]
pub struct Score {
    pub id: i32,
    pub judge_id: i32,
    pub submission_id: i32,
    pub criteria_id: i32,
    pub score_value: f64,
    pub comments: Option<String>,
}

#[derive(Insertable)]
#[table_name = "score"]
pub struct NewScore {
    pub judge_id: i32,
    pub submission_id: i32,
    pub criteria_id: i32,
    pub score_value: f64,
    pub comments: Option<String>,
}

pub fn insert_score(
    connection: &SqliteConnection,
    new_score: NewScore,
) -> Result<Score, JudgingError> {
    if !user::is_judge(connection, new_score.judge_id)? {
        return Err(JudgingError::NotAJudge(new_score.judge_id));
    }
    let criteria = get_criteria_by_id(connection, new_score.criteria_id)?;
    if new_score.score_value < 0.0 || new_score.score_value > criteria.max_score {
        return Err(JudgingError::ScoreOutOfRange {
            value: new_score.score_value,
            max: criteria.max_score,
            criteria_id: criteria.id,
        });
    }
    let existing: i64 = score::table
        .filter(score::judge_id.eq(new_score.judge_id))
        .filter(score::submission_id.eq(new_score.submission_id))
        .filter(score::criteria_id.eq(new_score.criteria_id))
        .count()
        .get_result(connection)?;
    if existing > 0 {
        return Err(JudgingError::DuplicateScore {
            judge_id: new_score.judge_id,
            submission_id: new_score.submission_id,
            criteria_id: new_score.criteria_id,
        });
    }
    insert_into(score::table)
        .values(new_score)
        .execute(connection)?;
    let id = super::last_insert_id(connection)?;
    Ok(score::table.find(id).first(connection)?)
}

pub fn get_scores_by_submission(
    connection: &SqliteConnection,
    submission_id: i32,
) -> QueryResult<Vec<Score>> {
    score::table
        .filter(score::submission_id.eq(submission_id))
        .load(connection)
}

pub fn weighted_total(
    connection: &SqliteConnection,
    submission_id: i32,
) -> QueryResult<Option<f64>> {
    let rows: Vec<(f64, f64)> = score::table
        .inner_join(judging_criteria::table)
        .filter(score::submission_id.eq(submission_id))
        .select((score::score_value, judging_criteria::weight))
        .load(connection)?;
    if rows.is_empty() {
        return Ok(None);
    }
    let total_weight: f64 = rows.iter().map(|(_, weight)| weight).sum();
    let weighted_sum: f64 = rows.iter().map(|(value, weight)| value * weight).sum();
    Ok(Some(weighted_sum / total_weight))
}
