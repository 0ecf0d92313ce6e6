//! Catalog domain types.
//!
//! Values are built once by the decoders in [`super::decode`] and handed to
//! the caller; they expose read accessors only.

/// A movie reference: id plus cover image, optionally with full detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    id: u64,
    cover_url: String,
    title: Option<String>,
    desc: Option<String>,
    cast: Option<String>,
}

impl Movie {
    /// Creates a listing entry (id and cover only).
    pub(crate) const fn listing(id: u64, cover_url: String) -> Self {
        Self {
            id,
            cover_url,
            title: None,
            desc: None,
            cast: None,
        }
    }

    /// Creates a fully described movie.
    pub(crate) const fn detailed(
        id: u64,
        cover_url: String,
        title: String,
        desc: String,
        cast: String,
    ) -> Self {
        Self {
            id,
            cover_url,
            title: Some(title),
            desc: Some(desc),
            cast: Some(cast),
        }
    }

    /// Movie id.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Cover image URL.
    #[must_use]
    pub fn cover_url(&self) -> &str {
        &self.cover_url
    }

    /// Title (detail only).
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Synopsis (detail only).
    #[must_use]
    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    /// Cast line (detail only).
    #[must_use]
    pub fn cast(&self) -> Option<&str> {
        self.cast.as_deref()
    }
}

/// A named, ordered group of movies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    title: String,
    movies: Vec<Movie>,
}

impl Category {
    pub(crate) const fn new(title: String, movies: Vec<Movie>) -> Self {
        Self { title, movies }
    }

    /// Category title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Movies in display order.
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }
}

/// Full metadata for one movie plus its similar titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDetail {
    movie: Movie,
    similars: Vec<Movie>,
}

impl MovieDetail {
    pub(crate) const fn new(movie: Movie, similars: Vec<Movie>) -> Self {
        Self { movie, similars }
    }

    /// The described movie (title, desc and cast are always set).
    #[must_use]
    pub const fn movie(&self) -> &Movie {
        &self.movie
    }

    /// Similar movies in payload order.
    #[must_use]
    pub fn similars(&self) -> &[Movie] {
        &self.similars
    }
}
