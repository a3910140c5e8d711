// Request and response shapes for the ghost detection endpoints

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::{number_or_text, validate_latitude, validate_longitude};

/// Location given in the query string
#[derive(Debug, Deserialize, Validate)]
pub struct LocationQuery {
    #[validate(required(message = "Invalid latitude"), custom = "validate_latitude")]
    pub latitude: Option<String>,
    #[validate(required(message = "Invalid longitude"), custom = "validate_longitude")]
    pub longitude: Option<String>,
}

/// Location given in the request body, as numbers or numeric strings
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DetectRequest {
    #[serde(default, deserialize_with = "number_or_text")]
    #[validate(required(message = "Invalid latitude"), custom = "validate_latitude")]
    #[schema(value_type = f64)]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "number_or_text")]
    #[validate(required(message = "Invalid longitude"), custom = "validate_longitude")]
    #[schema(value_type = f64)]
    pub longitude: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GhostInfoQuery {
    #[serde(default)]
    #[validate(length(min = 1, message = "Ghost type required"))]
    pub ghost_type: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SpiritGuideRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Question required"))]
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GhostDetection {
    pub ghost_detected: bool,
    pub ghost_type: String,
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HumanDetection {
    pub human_detected: bool,
    pub human_age: u32,
    pub human_identity: String,
    pub spook_level: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GhostSighting {
    pub ghost_type: String,
    pub location: String,
    pub time: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HumanSighting {
    pub human_name: String,
    pub location: String,
    pub time: String,
}

/// Sightings depend on who is looking
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SightingsResponse {
    Ghosts { sightings: Vec<GhostSighting> },
    Humans { human_sightings: Vec<HumanSighting> },
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GhostInfo {
    pub ghost_type: String,
    pub favorite_food: String,
    pub favorite_time_of_night: String,
    pub typical_age: String,
    pub origin: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HunterSummary {
    pub username: String,
    pub sightings_count: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<HunterSummary>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpiritGuideAnswer {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpookLevel {
    pub spook_level: u8,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpookyName {
    pub spooky_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Haunt {
    pub location: String,
    pub scares_given: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FavoriteHaunts {
    pub favorite_haunts: Vec<Haunt>,
}
