//! Artist domain entity

/// Performing artist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub id: i32,
    /// Unique display name
    pub name: String,
    pub genre: Option<String>,
    pub bio_short: Option<String>,
    pub links: Option<String>,
}

/// Artist fields for create; on update `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistDraft {
    pub name: Option<String>,
    pub genre: Option<String>,
    pub bio_short: Option<String>,
    pub links: Option<String>,
}

impl ArtistDraft {
    pub fn apply_to(self, artist: &mut Artist) {
        if let Some(name) = self.name {
            artist.name = name;
        }
        if self.genre.is_some() {
            artist.genre = self.genre;
        }
        if self.bio_short.is_some() {
            artist.bio_short = self.bio_short;
        }
        if self.links.is_some() {
            artist.links = self.links;
        }
    }
}
