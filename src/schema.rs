table! {
    role (id) {
        id -> Integer,
        name -> Text,
    }
}

table! {
    user (id) {
        id -> Integer,
        role_id -> Integer,
        username -> Text,
        email -> Text,
        hashed_password -> Text,
        wallet_address -> Nullable<Text>,
        first_name -> Text,
        last_name -> Text,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

table! {
    hackathon (id) {
        id -> Integer,
        title -> Text,
        description -> Text,
        start_date -> Timestamp,
        end_date -> Timestamp,
        location -> Text,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

table! {
    team (id) {
        id -> Integer,
        hackathon_id -> Integer,
        name -> Text,
        created_at -> Timestamp,
    }
}

table! {
    team_member (user_id, team_id) {
        user_id -> Integer,
        team_id -> Integer,
        role_in_team -> Text,
        joined_at -> Timestamp,
    }
}

table! {
    submission (id) {
        id -> Integer,
        team_id -> Integer,
        hackathon_id -> Integer,
        name -> Text,
        description -> Text,
        link -> Text,
        submitted_at -> Timestamp,
        status -> Text,
    }
}

table! {
    judging_criteria (id) {
        id -> Integer,
        name -> Text,
        description -> Text,
        weight -> Double,
        max_score -> Double,
        created_by -> Integer,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

table! {
    score (id) {
        id -> Integer,
        judge_id -> Integer,
        submission_id -> Integer,
        criteria_id -> Integer,
        score_value -> Double,
        comments -> Nullable<Text>,
    }
}

table! {
    sponsor (id) {
        id -> Integer,
        name -> Text,
        contact_email -> Text,
        phone -> Nullable<Text>,
        logo_url -> Nullable<Text>,
        website_url -> Nullable<Text>,
    }
}

table! {
    hackathon_sponsor (hackathon_id, sponsor_id) {
        hackathon_id -> Integer,
        sponsor_id -> Integer,
        sponsorship_level -> Text,
    }
}

joinable!(user -> role (role_id));
joinable!(team -> hackathon (hackathon_id));
joinable!(team_member -> user (user_id));
joinable!(team_member -> team (team_id));
joinable!(submission -> team (team_id));
joinable!(submission -> hackathon (hackathon_id));
joinable!(judging_criteria -> user (created_by));
joinable!(score -> user (judge_id));
joinable!(score -> submission (submission_id));
joinable!(score -> judging_criteria (criteria_id));
joinable!(hackathon_sponsor -> hackathon (hackathon_id));
joinable!(hackathon_sponsor -> sponsor (sponsor_id));

allow_tables_to_appear_in_same_query!(
    role,
    user,
    hackathon,
    team,
    team_member,
    submission,
    judging_criteria,
    score,
    sponsor,
    hackathon_sponsor,
);
