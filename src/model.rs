use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
}

/// Identity of the current user, fetched once per page load.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

/// What the current session is allowed to do, derived once from the role
/// and passed explicitly into rendering and action handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    pub manage_movies: bool,
}

impl Permissions {
    pub fn none() -> Self {
        Permissions {
            manage_movies: false,
        }
    }
}

impl From<Role> for Permissions {
    fn from(role: Role) -> Self {
        Permissions {
            manage_movies: role == Role::Admin,
        }
    }
}

impl Session {
    pub fn permissions(&self) -> Permissions {
        Permissions::from(self.role)
    }
}

/// A movie as the backend returns it. Only the id is guaranteed; the other
/// columns are nullable and render blank when absent.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Write payload for POST /movies and PUT /movies/{id}. The backend expects
/// camelCase keys on writes (`releaseYear`) even though it returns
/// snake_case on reads.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieForm {
    pub title: String,
    pub director: String,
    pub release_year: i32,
    pub genre: String,
    pub rating: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Release year must be a whole number")]
    BadReleaseYear,
    #[error("Rating must be a number")]
    BadRating,
}

/// Movie fields as they come out of a form, all strings. Numeric fields are
/// coerced when the form is submitted, not while the user is typing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieInput {
    pub title: String,
    pub director: String,
    pub release_year: String,
    pub genre: String,
    pub rating: String,
}

impl MovieInput {
    pub fn to_form(&self) -> Result<MovieForm, InputError> {
        let release_year = self
            .release_year
            .trim()
            .parse::<i32>()
            .map_err(|_| InputError::BadReleaseYear)?;
        let rating = self
            .rating
            .trim()
            .parse::<f64>()
            .map_err(|_| InputError::BadRating)?;
        Ok(MovieForm {
            title: self.title.clone(),
            director: self.director.clone(),
            release_year,
            genre: self.genre.clone(),
            rating,
        })
    }
}

/// Transient editable copy of one movie, alive only while the edit dialog
/// is open.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub id: u64,
    pub input: MovieInput,
}

impl Draft {
    pub fn from_movie(movie: &Movie) -> Self {
        Draft {
            id: movie.id,
            input: MovieInput {
                title: movie.title.clone(),
                director: movie.director.clone().unwrap_or_default(),
                release_year: movie
                    .release_year
                    .map(|y| y.to_string())
                    .unwrap_or_default(),
                genre: movie.genre.clone().unwrap_or_default(),
                rating: movie.rating.map(|r| r.to_string()).unwrap_or_default(),
            },
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Serialize, Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Token {
    pub token: String,
}
