use serde::Deserialize;

/// Subset of `GET /{tv|movie}/{id}` used for enrichment.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct CatalogDetails {
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Movie runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
}

impl CatalogDetails {
    /// First `n` genre names, skipping blanks.
    pub fn genre_names(&self, n: usize) -> Vec<&str> {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .filter(|name| !name.is_empty())
            .take(n)
            .collect()
    }
}
