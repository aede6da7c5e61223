//! CSV writers for the social-profile and decomposed-heat tables.

use std::path::Path;

use starheat_core::table::write_table;
use starheat_core::TableError;
use starheat_heat::DecomposedRow;
use starheat_social::SocialProfile;

const SOCIAL_COLUMNS: [&str; 11] = [
    "entity",
    "page_title",
    "instagram_handle",
    "twitter_handle",
    "tiktok_handle",
    "youtube_url",
    "facebook_url",
    "instagram_followers",
    "twitter_followers",
    "tiktok_followers",
    "youtube_subscribers",
];

const HEAT_COLUMNS: [&str; 6] = [
    "entity",
    "date",
    "signal",
    "ratio",
    "performance_heat",
    "black_red_heat",
];

pub(crate) fn write_social_table(
    path: &Path,
    profiles: &[SocialProfile],
) -> Result<(), TableError> {
    let records: Vec<Vec<String>> = profiles.iter().map(social_record).collect();
    write_table(path, &SOCIAL_COLUMNS, &records)
}

fn social_record(profile: &SocialProfile) -> Vec<String> {
    let opt = |value: &Option<String>| value.clone().unwrap_or_default();
    vec![
        profile.entity.clone(),
        opt(&profile.page_title),
        opt(&profile.instagram_handle),
        opt(&profile.twitter_handle),
        opt(&profile.tiktok_handle),
        opt(&profile.youtube_url),
        opt(&profile.facebook_url),
        profile.instagram_followers.to_string(),
        profile.twitter_followers.to_string(),
        profile.tiktok_followers.to_string(),
        profile.youtube_subscribers.to_string(),
    ]
}

pub(crate) fn write_heat_table(path: &Path, rows: &[DecomposedRow]) -> Result<(), TableError> {
    let records: Vec<Vec<String>> = rows.iter().map(heat_record).collect();
    write_table(path, &HEAT_COLUMNS, &records)
}

fn heat_record(row: &DecomposedRow) -> Vec<String> {
    vec![
        row.entity.clone(),
        row.date.format("%Y-%m-%d").to_string(),
        format!("{}", row.signal),
        format!("{}", row.ratio),
        format!("{}", row.performance_heat),
        format!("{}", row.black_red_heat),
    ]
}
