//! Strict JSON decoders (and matching encoders) for catalog payloads.

use super::types::{Category, Movie, MovieDetail};
use super::wire::{
    CategoryItem, CategoryListResponse, ErrorResponse, MovieDetailResponse, MovieItem,
};

/// Catalog payload decoding error.
#[derive(Debug)]
pub enum DecodeError {
    /// Body is not JSON, or a required field is missing or mistyped.
    Json(serde_json::Error),
    /// A field is present but violates a value invariant.
    Invalid {
        /// JSON field name.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "invalid JSON payload: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Rejects an empty string for `field`.
fn non_empty(value: String, field: &'static str) -> Result<String, DecodeError> {
    if value.is_empty() {
        return Err(DecodeError::Invalid {
            field,
            reason: "must not be empty",
        });
    }
    Ok(value)
}

fn to_movie(item: MovieItem) -> Result<Movie, DecodeError> {
    Ok(Movie::listing(item.id, non_empty(item.cover_url, "cover_url")?))
}

fn to_movies(items: Vec<MovieItem>) -> Result<Vec<Movie>, DecodeError> {
    items.into_iter().map(to_movie).collect()
}

/// Decodes a category listing payload.
///
/// Expects `{"category": [{"title": .., "movie": [{"id": .., "cover_url": ..}]}]}`.
/// Category and movie order follow the payload.
///
/// # Errors
///
/// Returns [`DecodeError`] if the body is not JSON, a required field is
/// missing or mistyped, or a title / cover URL is empty. No partial list is
/// ever returned.
pub fn decode_categories(body: &str) -> Result<Vec<Category>, DecodeError> {
    let response: CategoryListResponse = serde_json::from_str(body)?;
    response
        .category
        .into_iter()
        .map(|item| -> Result<Category, DecodeError> {
            let title = non_empty(item.title, "title")?;
            Ok(Category::new(title, to_movies(item.movie)?))
        })
        .collect()
}

/// Decodes a movie detail payload.
///
/// Expects `{"id", "title", "desc", "cast", "cover_url", "movie": [..]}`,
/// where `movie` holds the similar titles.
///
/// # Errors
///
/// Same conditions as [`decode_categories`].
pub fn decode_movie_detail(body: &str) -> Result<MovieDetail, DecodeError> {
    let response: MovieDetailResponse = serde_json::from_str(body)?;
    let movie = Movie::detailed(
        response.id,
        non_empty(response.cover_url, "cover_url")?,
        response.title,
        response.desc,
        response.cast,
    );
    Ok(MovieDetail::new(movie, to_movies(response.movie)?))
}

/// Extracts `message` from an HTTP 400 error body (`{"message": ..}`).
///
/// # Errors
///
/// Returns [`DecodeError::Json`] if the body has no string `message`.
pub fn decode_error_message(body: &str) -> Result<String, DecodeError> {
    let response: ErrorResponse = serde_json::from_str(body)?;
    Ok(response.message)
}

fn movie_item(movie: &Movie) -> MovieItem {
    MovieItem {
        id: movie.id(),
        cover_url: String::from(movie.cover_url()),
    }
}

/// Encodes categories back into the listing payload shape.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn encode_categories(categories: &[Category]) -> Result<String, serde_json::Error> {
    let response = CategoryListResponse {
        category: categories
            .iter()
            .map(|c| CategoryItem {
                title: String::from(c.title()),
                movie: c.movies().iter().map(movie_item).collect(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&response)
}

/// Encodes a movie detail back into the detail payload shape.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn encode_movie_detail(detail: &MovieDetail) -> Result<String, serde_json::Error> {
    let movie = detail.movie();
    let response = MovieDetailResponse {
        id: movie.id(),
        title: String::from(movie.title().unwrap_or_default()),
        desc: String::from(movie.desc().unwrap_or_default()),
        cast: String::from(movie.cast().unwrap_or_default()),
        cover_url: String::from(movie.cover_url()),
        movie: detail.similars().iter().map(movie_item).collect(),
    };
    serde_json::to_string_pretty(&response)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_decode_categories_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/catalog/home.json");

        // Act
        let categories = decode_categories(json).unwrap();

        // Assert
        assert_eq!(categories.len(), 3);
        assert_eq!(categories[0].title(), "Trending");
        assert_eq!(categories[0].movies().len(), 4);
        assert_eq!(categories[0].movies()[0].id(), 1);
        assert_eq!(
            categories[0].movies()[0].cover_url(),
            "https://cdn.example.com/covers/1.jpg"
        );
        assert!(categories[0].movies()[0].title().is_none());
        assert_eq!(categories[2].title(), "Documentaries");
        assert!(categories[2].movies().is_empty());
    }

    #[test]
    fn test_decode_categories_preserves_order() {
        // Arrange
        let json = r#"{"category":[
            {"title":"B","movie":[{"id":9,"cover_url":"c9"},{"id":3,"cover_url":"c3"}]},
            {"title":"A","movie":[{"id":5,"cover_url":"c5"}]}
        ]}"#;

        // Act
        let categories = decode_categories(json).unwrap();

        // Assert
        let titles: Vec<&str> = categories.iter().map(Category::title).collect();
        assert_eq!(titles, ["B", "A"]);
        let ids: Vec<u64> = categories[0].movies().iter().map(Movie::id).collect();
        assert_eq!(ids, [9, 3]);
    }

    #[test]
    fn test_decode_categories_empty_list() {
        // Arrange & Act
        let categories = decode_categories(r#"{"category":[]}"#).unwrap();

        // Assert
        assert!(categories.is_empty());
    }

    #[test]
    fn test_decode_categories_missing_title_fails() {
        // Arrange
        let json = r#"{"category":[
            {"title":"Ok","movie":[]},
            {"movie":[{"id":1,"cover_url":"c1"}]}
        ]}"#;

        // Act
        let result = decode_categories(json);

        // Assert
        let err = result.unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_decode_categories_missing_root_fails() {
        // Arrange & Act
        let result = decode_categories(r#"{"categories":[]}"#);

        // Assert
        assert!(result.unwrap_err().to_string().contains("category"));
    }

    #[test]
    fn test_decode_categories_missing_cover_url_fails() {
        // Arrange
        let json = r#"{"category":[{"title":"T","movie":[{"id":1}]}]}"#;

        // Act & Assert
        assert!(decode_categories(json).is_err());
    }

    #[test]
    fn test_decode_categories_negative_id_fails() {
        // Arrange
        let json = r#"{"category":[{"title":"T","movie":[{"id":-4,"cover_url":"c"}]}]}"#;

        // Act & Assert
        assert!(matches!(
            decode_categories(json),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_decode_categories_string_id_fails() {
        // Arrange
        let json = r#"{"category":[{"title":"T","movie":[{"id":"4","cover_url":"c"}]}]}"#;

        // Act & Assert
        assert!(decode_categories(json).is_err());
    }

    #[test]
    fn test_decode_categories_empty_title_fails() {
        // Arrange
        let json = r#"{"category":[{"title":"","movie":[]}]}"#;

        // Act
        let err = decode_categories(json).unwrap_err();

        // Assert
        assert!(matches!(
            err,
            DecodeError::Invalid {
                field: "title",
                ..
            }
        ));
        assert_eq!(err.to_string(), "invalid `title`: must not be empty");
    }

    #[test]
    fn test_decode_categories_empty_cover_url_fails() {
        // Arrange
        let json = r#"{"category":[{"title":"T","movie":[{"id":1,"cover_url":""}]}]}"#;

        // Act & Assert
        assert!(matches!(
            decode_categories(json),
            Err(DecodeError::Invalid {
                field: "cover_url",
                ..
            })
        ));
    }

    #[test]
    fn test_decode_categories_not_json_fails() {
        // Arrange & Act
        let err = decode_categories("<html>502 Bad Gateway</html>").unwrap_err();

        // Assert
        assert!(err.to_string().starts_with("invalid JSON payload"));
    }

    #[test]
    fn test_decode_movie_detail_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/catalog/movie_3.json");

        // Act
        let detail = decode_movie_detail(json).unwrap();

        // Assert
        let movie = detail.movie();
        assert_eq!(movie.id(), 3);
        assert_eq!(movie.title(), Some("The Long Night"));
        assert!(movie.desc().unwrap().starts_with("A lighthouse keeper"));
        assert_eq!(movie.cast(), Some("Ana Lima, Bruno Souza"));
        assert_eq!(movie.cover_url(), "https://cdn.example.com/covers/3.jpg");
        let ids: Vec<u64> = detail.similars().iter().map(Movie::id).collect();
        assert_eq!(ids, [7, 2, 11]);
        assert!(detail.similars()[0].title().is_none());
    }

    #[test]
    fn test_decode_movie_detail_missing_cast_fails() {
        // Arrange
        let json = r#"{"id":1,"title":"t","desc":"d","cover_url":"c","movie":[]}"#;

        // Act
        let err = decode_movie_detail(json).unwrap_err();

        // Assert
        assert!(err.to_string().contains("cast"));
    }

    #[test]
    fn test_decode_movie_detail_missing_similars_fails() {
        // Arrange
        let json = r#"{"id":1,"title":"t","desc":"d","cast":"c","cover_url":"c"}"#;

        // Act & Assert
        assert!(decode_movie_detail(json).is_err());
    }

    #[test]
    fn test_decode_movie_detail_bad_similar_fails() {
        // Arrange
        let json = r#"{"id":1,"title":"t","desc":"d","cast":"c","cover_url":"c",
            "movie":[{"id":2,"cover_url":"c2"},{"cover_url":"c3"}]}"#;

        // Act & Assert
        assert!(decode_movie_detail(json).is_err());
    }

    #[test]
    fn test_decode_error_message() {
        // Arrange & Act
        let message = decode_error_message(r#"{"message":"not found"}"#).unwrap();

        // Assert
        assert_eq!(message, "not found");
    }

    #[test]
    fn test_decode_error_message_without_field_fails() {
        // Arrange & Act & Assert
        assert!(decode_error_message(r#"{"error":"x"}"#).is_err());
        assert!(decode_error_message("").is_err());
    }

    #[test]
    fn test_categories_reencode_preserves_structure() {
        // Arrange
        let json = include_str!("../../../../fixtures/catalog/home.json");
        let original = decode_categories(json).unwrap();

        // Act
        let encoded = encode_categories(&original).unwrap();
        let decoded = decode_categories(&encoded).unwrap();

        // Assert
        assert_eq!(decoded.len(), original.len());
        for (a, b) in decoded.iter().zip(&original) {
            assert_eq!(a.title(), b.title());
            assert_eq!(a.movies().len(), b.movies().len());
        }
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_movie_detail_similars_roundtrip() {
        // Arrange
        let json = include_str!("../../../../fixtures/catalog/movie_3.json");
        let original = decode_movie_detail(json).unwrap();

        // Act
        let encoded = encode_movie_detail(&original).unwrap();
        let decoded = decode_movie_detail(&encoded).unwrap();

        // Assert
        let pairs = |d: &MovieDetail| -> Vec<(u64, String)> {
            d.similars()
                .iter()
                .map(|m| (m.id(), String::from(m.cover_url())))
                .collect()
        };
        assert_eq!(pairs(&decoded), pairs(&original));
        assert_eq!(decoded, original);
    }
}
