//! Artist catalog

use std::sync::Arc;

use tracing::info;

use crate::domain::{Artist, ArtistDraft, ConcertFilter, DomainError, DomainResult, RepositoryProvider};

pub struct ArtistService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ArtistService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list(&self) -> DomainResult<Vec<Artist>> {
        self.repos.artists().find_all().await
    }

    pub async fn get(&self, id: i32) -> DomainResult<Artist> {
        self.repos
            .artists()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Artist", "id", id))
    }

    pub async fn create(&self, draft: ArtistDraft) -> DomainResult<Artist> {
        let name = required_name(draft.name.as_deref())?;
        self.ensure_name_free(&name, None).await?;

        let artist = self
            .repos
            .artists()
            .create(Artist {
                id: 0,
                name,
                genre: draft.genre,
                bio_short: draft.bio_short,
                links: draft.links,
            })
            .await?;
        info!(artist_id = artist.id, name = %artist.name, "Artist created");
        Ok(artist)
    }

    pub async fn update(&self, id: i32, mut draft: ArtistDraft) -> DomainResult<Artist> {
        let mut artist = self.get(id).await?;
        if let Some(name) = draft.name.take() {
            let name = required_name(Some(&name))?;
            self.ensure_name_free(&name, Some(id)).await?;
            draft.name = Some(name);
        }
        draft.apply_to(&mut artist);
        self.repos.artists().update(artist).await
    }

    /// Refused while concerts still reference the artist.
    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        self.get(id).await?;
        let booked = self
            .repos
            .concerts()
            .find_details(&ConcertFilter::default())
            .await?
            .iter()
            .any(|d| d.concert.artist_id == id);
        if booked {
            return Err(DomainError::Conflict(format!(
                "artist {id} is scheduled in at least one concert"
            )));
        }
        self.repos.artists().delete(id).await?;
        info!(artist_id = id, "Artist deleted");
        Ok(())
    }

    async fn ensure_name_free(&self, name: &str, except: Option<i32>) -> DomainResult<()> {
        match self.repos.artists().find_by_name(name).await? {
            Some(existing) if Some(existing.id) != except => Err(DomainError::Conflict(format!(
                "artist '{name}' already exists"
            ))),
            _ => Ok(()),
        }
    }
}

pub(crate) fn required_name(raw: Option<&str>) -> DomainResult<String> {
    match raw.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(DomainError::Validation("name is required".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryStore;

    fn draft(name: &str) -> ArtistDraft {
        ArtistDraft {
            name: Some(name.into()),
            genre: Some("rock".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn names_are_unique() {
        let service = ArtistService::new(Arc::new(InMemoryStore::new()));
        service.create(draft("Nova")).await.unwrap();

        let err = service.create(draft(" Nova ")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_keeps_missing_fields() {
        let service = ArtistService::new(Arc::new(InMemoryStore::new()));
        let a = service.create(draft("Nova")).await.unwrap();

        let updated = service
            .update(
                a.id,
                ArtistDraft {
                    bio_short: Some("Synth duo".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Nova");
        assert_eq!(updated.genre.as_deref(), Some("rock"));
        assert_eq!(updated.bio_short.as_deref(), Some("Synth duo"));
    }

    #[tokio::test]
    async fn blank_name_is_invalid() {
        let service = ArtistService::new(Arc::new(InMemoryStore::new()));
        let err = service.create(draft("  ")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let service = ArtistService::new(Arc::new(InMemoryStore::new()));
        let err = service.delete(3).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
