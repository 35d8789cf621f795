//! Artist DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Artist, ArtistDraft};

#[derive(Debug, Serialize, ToSchema)]
pub struct ArtistDto {
    pub id: i32,
    pub name: String,
    pub genre: Option<String>,
    pub bio_short: Option<String>,
    pub links: Option<String>,
}

impl From<Artist> for ArtistDto {
    fn from(a: Artist) -> Self {
        Self {
            id: a.id,
            name: a.name,
            genre: a.genre,
            bio_short: a.bio_short,
            links: a.links,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateArtistRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 100))]
    pub genre: Option<String>,
    #[validate(length(max = 1000))]
    pub bio_short: Option<String>,
    pub links: Option<String>,
}

/// Omitted fields keep their stored value.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateArtistRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub genre: Option<String>,
    #[validate(length(max = 1000))]
    pub bio_short: Option<String>,
    pub links: Option<String>,
}

impl From<CreateArtistRequest> for ArtistDraft {
    fn from(r: CreateArtistRequest) -> Self {
        Self {
            name: Some(r.name),
            genre: r.genre,
            bio_short: r.bio_short,
            links: r.links,
        }
    }
}

impl From<UpdateArtistRequest> for ArtistDraft {
    fn from(r: UpdateArtistRequest) -> Self {
        Self {
            name: r.name,
            genre: r.genre,
            bio_short: r.bio_short,
            links: r.links,
        }
    }
}
