// HTTP handlers for the ghost detection endpoints
//
// Every payload here is fixed; these handlers only ever run after the
// authentication and role middleware have admitted the request.

use axum::Json;
use tracing::debug;

use crate::auth::models::{AuthenticatedPrincipal, Role};
use crate::error::ApiError;
use crate::ghost::models::*;
use crate::validation::{ValidJson, ValidQuery};

fn text(s: &str) -> String {
    s.to_string()
}

/// POST /detect (human)
#[utoipa::path(
    post,
    path = "/detect",
    request_body = DetectRequest,
    responses(
        (status = 200, description = "Detection result", body = GhostDetection),
        (status = 400, description = "Invalid location"),
        (status = 401, description = "Access token required"),
        (status = 403, description = "Invalid token or wrong role")
    ),
    security(("bearer_auth" = [])),
    tag = "ghosts"
)]
pub async fn detect_ghost(
    principal: AuthenticatedPrincipal,
    ValidJson(request): ValidJson<DetectRequest>,
) -> Result<Json<GhostDetection>, ApiError> {
    debug!(
        "Ghost detection by {} at ({:?}, {:?})",
        principal.username, request.latitude, request.longitude
    );

    Ok(Json(GhostDetection {
        ghost_detected: true,
        ghost_type: text("Poltergeist"),
        bounding_box: BoundingBox {
            x: 120,
            y: 80,
            width: 200,
            height: 200,
        },
    }))
}

/// POST /ghost/detect (ghost)
pub async fn detect_human(principal: AuthenticatedPrincipal) -> Json<HumanDetection> {
    debug!("Human detection by {}", principal.username);

    Json(HumanDetection {
        human_detected: true,
        human_age: 29,
        human_identity: text("John Doe"),
        spook_level: text("Terrified"),
    })
}

/// GET /sightings (human); ghosts would see humans instead
pub async fn sightings(
    principal: AuthenticatedPrincipal,
    ValidQuery(_location): ValidQuery<LocationQuery>,
) -> Result<Json<SightingsResponse>, ApiError> {
    let response = match principal.role {
        Role::Human => SightingsResponse::Ghosts {
            sightings: vec![
                GhostSighting {
                    ghost_type: text("Banshee"),
                    location: text("13 Haunted Lane"),
                    time: text("02:00 AM"),
                },
                GhostSighting {
                    ghost_type: text("Wraith"),
                    location: text("Old Cemetery"),
                    time: text("03:15 AM"),
                },
            ],
        },
        Role::Ghost => SightingsResponse::Humans {
            human_sightings: vec![
                HumanSighting {
                    human_name: text("Jane Smith"),
                    location: text("Haunted Mansion"),
                    time: text("10:00 PM"),
                },
                HumanSighting {
                    human_name: text("Bob the Builder"),
                    location: text("Spooky Forest"),
                    time: text("11:45 PM"),
                },
            ],
        },
    };

    Ok(Json(response))
}

/// GET /ghost-info (human)
pub async fn ghost_info(
    ValidQuery(query): ValidQuery<GhostInfoQuery>,
) -> Result<Json<GhostInfo>, ApiError> {
    let info = if query.ghost_type.eq_ignore_ascii_case("poltergeist") {
        GhostInfo {
            ghost_type: text("Poltergeist"),
            favorite_food: text("Cold pizza"),
            favorite_time_of_night: text("2:00 AM"),
            typical_age: text("300 years"),
            origin: text("Medieval Europe"),
            description: text("A mischievous spirit known for moving objects and causing trouble."),
        }
    } else {
        GhostInfo {
            ghost_type: query.ghost_type,
            favorite_food: text("Unknown"),
            favorite_time_of_night: text("Unknown"),
            typical_age: text("Unknown"),
            origin: text("Unknown"),
            description: text("No information available for this ghost type."),
        }
    };

    Ok(Json(info))
}

/// GET /users (human)
pub async fn list_hunters() -> Json<UsersResponse> {
    Json(UsersResponse {
        users: vec![
            HunterSummary {
                username: text("GhostHunter22"),
                sightings_count: 5,
            },
            HunterSummary {
                username: text("SpookySeeker"),
                sightings_count: 12,
            },
        ],
    })
}

/// POST /spirit-guide (human)
pub async fn spirit_guide(
    ValidJson(_request): ValidJson<SpiritGuideRequest>,
) -> Result<Json<SpiritGuideAnswer>, ApiError> {
    Ok(Json(SpiritGuideAnswer {
        answer: text("That’s a bad idea... trust me."),
    }))
}

/// GET /spook-level (human, ghost)
pub async fn spook_level(
    ValidQuery(_location): ValidQuery<LocationQuery>,
) -> Result<Json<SpookLevel>, ApiError> {
    Ok(Json(SpookLevel {
        spook_level: 9,
        description: text("Extremely haunted. Watch your back!"),
    }))
}

/// GET /ghost/spooky-name (ghost)
pub async fn spooky_name() -> Json<SpookyName> {
    Json(SpookyName {
        spooky_name: text("The Shadow Whisperer"),
    })
}

/// GET /ghost/favorite-haunts (ghost)
pub async fn favorite_haunts() -> Json<FavoriteHaunts> {
    Json(FavoriteHaunts {
        favorite_haunts: vec![
            Haunt {
                location: text("Old Lighthouse"),
                scares_given: 15,
            },
            Haunt {
                location: text("Abandoned Hospital"),
                scares_given: 20,
            },
        ],
    })
}
