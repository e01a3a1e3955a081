use crate::model::*;
use actix_web::client::{Client, ClientRequest};
use actix_web::http::{header, HeaderMap, StatusCode};
use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a failed request should be surfaced, per the backend's conventions:
/// redirects and non-JSON bodies mean the session is gone, 403 means the
/// role lacks authority, any other non-2xx carries an `error` field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Not logged in")]
    Unauthenticated,
    #[error("You do not have permission to perform this action")]
    PermissionDenied,
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Transport(String),
}

/// Everything the pages need from the backend. The HTTP implementation is
/// [`Api`]; tests substitute an in-memory fake.
#[async_trait(?Send)]
pub trait MovieService {
    async fn user_info(&self) -> Result<Session, ApiError>;
    async fn movies(&self) -> Result<Vec<Movie>, ApiError>;
    async fn movie(&self, id: u64) -> Result<Movie, ApiError>;
    async fn add_movie(&self, movie: &MovieForm) -> Result<(), ApiError>;
    async fn update_movie(&self, id: u64, movie: &MovieForm) -> Result<(), ApiError>;
    async fn delete_movie(&self, id: u64) -> Result<(), ApiError>;
    async fn register(&self, registration: &Registration) -> Result<(), ApiError>;
    async fn login(&self, credentials: &Credentials) -> Result<Token, ApiError>;
}

/// REST gateway over the `/api` backend. The session credential is an
/// ambient cookie, so requests carry no explicit authentication.
pub struct Api {
    client: Client,
    base: String,
}

impl Api {
    pub fn new<S: Into<String>>(base: S) -> Self {
        Api {
            client: Client::default(),
            base: base.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let mut response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(transport)?;
        let bytes = response.body().await.map_err(transport)?;
        decode(response.status(), content_type(response.headers()), &bytes)
    }

    async fn send_json<T, B>(&self, request: ClientRequest, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let mut response = request.send_json(body).await.map_err(transport)?;
        let bytes = response.body().await.map_err(transport)?;
        decode(response.status(), content_type(response.headers()), &bytes)
    }
}

#[async_trait(?Send)]
impl MovieService for Api {
    async fn user_info(&self) -> Result<Session, ApiError> {
        self.get_json("/user-info").await
    }

    async fn movies(&self) -> Result<Vec<Movie>, ApiError> {
        let mut response = self
            .client
            .get(self.url("/movies"))
            .send()
            .await
            .map_err(transport)?;
        let bytes = response.body().await.map_err(transport)?;
        decode_movies(response.status(), content_type(response.headers()), &bytes)
    }

    async fn movie(&self, id: u64) -> Result<Movie, ApiError> {
        self.get_json(&format!("/movies/{}", id)).await
    }

    async fn add_movie(&self, movie: &MovieForm) -> Result<(), ApiError> {
        let request = self.client.post(self.url("/movies"));
        let ack: Ack = self.send_json(request, movie).await?;
        ack.log("add movie");
        Ok(())
    }

    async fn update_movie(&self, id: u64, movie: &MovieForm) -> Result<(), ApiError> {
        let request = self.client.put(self.url(&format!("/movies/{}", id)));
        let ack: Ack = self.send_json(request, movie).await?;
        ack.log("update movie");
        Ok(())
    }

    async fn delete_movie(&self, id: u64) -> Result<(), ApiError> {
        let mut response = self
            .client
            .delete(self.url(&format!("/movies/{}", id)))
            .send()
            .await
            .map_err(transport)?;
        let bytes = response.body().await.map_err(transport)?;
        let ack: Ack = decode(response.status(), content_type(response.headers()), &bytes)?;
        ack.log("delete movie");
        Ok(())
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let request = self.client.post(self.url("/register"));
        let ack: Ack = self.send_json(request, registration).await?;
        ack.log("register");
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<Token, ApiError> {
        let request = self.client.post(self.url("/login"));
        self.send_json(request, credentials).await
    }
}

fn transport<E: std::fmt::Display>(err: E) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct Ack {
    #[serde(default)]
    message: Option<String>,
}

impl Ack {
    fn log(&self, action: &str) {
        if let Some(message) = &self.message {
            debug!("{}: {}", action, message);
        }
    }
}

/// `GET /movies` has returned both `{"movies": [...]}` and a bare array
/// depending on the backend version; anything else that is still JSON is
/// treated as an empty collection.
#[derive(Deserialize)]
#[serde(untagged)]
enum MovieListBody {
    Wrapped {
        #[serde(default)]
        movies: Vec<Movie>,
    },
    Bare(Vec<Movie>),
    Other(serde_json::Value),
}

/// Maps a response onto the error taxonomy and parses the expected JSON
/// body. Kept free of I/O so the mapping is testable on raw parts.
pub(crate) fn decode<T: DeserializeOwned>(
    status: StatusCode,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<T, ApiError> {
    check_status(status, body)?;
    let is_json = content_type.map_or(false, |ct| ct.contains("application/json"));
    if !is_json {
        // An HTML body where JSON was expected is the login page.
        return Err(ApiError::Unauthenticated);
    }
    serde_json::from_slice(body).map_err(|err| {
        debug!("unparseable response body: {}", err);
        ApiError::Unauthenticated
    })
}

pub(crate) fn decode_movies(
    status: StatusCode,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<Vec<Movie>, ApiError> {
    Ok(match decode(status, content_type, body)? {
        MovieListBody::Wrapped { movies } => movies,
        MovieListBody::Bare(movies) => movies,
        MovieListBody::Other(value) => {
            debug!("movie list response is not a collection: {}", value);
            Vec::new()
        }
    })
}

fn check_status(status: StatusCode, body: &[u8]) -> Result<(), ApiError> {
    if status.is_redirection() {
        return Err(ApiError::Unauthenticated);
    }
    if status == StatusCode::FORBIDDEN {
        return Err(ApiError::PermissionDenied);
    }
    if !status.is_success() {
        return match serde_json::from_slice::<ErrorBody>(body) {
            Ok(rejection) => Err(ApiError::Rejected(rejection.error)),
            Err(_) => Err(ApiError::Transport(format!(
                "unexpected status {}",
                status
            ))),
        };
    }
    Ok(())
}
