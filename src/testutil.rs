//! In-memory stand-ins for the REST gateway and the page, shared by the
//! controller and form tests.

use crate::api::{ApiError, MovieService};
use crate::controller::View;
use crate::model::*;
use async_trait::async_trait;
use std::cell::RefCell;

/// Canned [`MovieService`] that records every call it receives.
pub struct FakeService {
    pub calls: RefCell<Vec<String>>,
    pub session: Result<Session, ApiError>,
    pub movies: Result<Vec<Movie>, ApiError>,
    pub movie: Option<Movie>,
    pub add: Result<(), ApiError>,
    pub update: Result<(), ApiError>,
    pub delete: Result<(), ApiError>,
    pub register: Result<(), ApiError>,
    pub login: Result<Token, ApiError>,
    pub adds: RefCell<Vec<MovieForm>>,
    pub updates: RefCell<Vec<(u64, MovieForm)>>,
    pub registrations: RefCell<Vec<Registration>>,
}

impl FakeService {
    pub fn with_session(session: Session, movies: Vec<Movie>) -> Self {
        FakeService {
            calls: RefCell::new(Vec::new()),
            session: Ok(session),
            movies: Ok(movies),
            movie: None,
            add: Ok(()),
            update: Ok(()),
            delete: Ok(()),
            register: Ok(()),
            login: Ok(Token {
                token: "tok-1".to_owned(),
            }),
            adds: RefCell::new(Vec::new()),
            updates: RefCell::new(Vec::new()),
            registrations: RefCell::new(Vec::new()),
        }
    }

    pub fn admin(movies: Vec<Movie>) -> Self {
        Self::with_session(
            Session {
                username: "alice".to_owned(),
                role: Role::Admin,
            },
            movies,
        )
    }

    pub fn client(movies: Vec<Movie>) -> Self {
        Self::with_session(
            Session {
                username: "bob".to_owned(),
                role: Role::Client,
            },
            movies,
        )
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

#[async_trait(?Send)]
impl MovieService for FakeService {
    async fn user_info(&self) -> Result<Session, ApiError> {
        self.record("user_info".to_owned());
        self.session.clone()
    }

    async fn movies(&self) -> Result<Vec<Movie>, ApiError> {
        self.record("movies".to_owned());
        self.movies.clone()
    }

    async fn movie(&self, id: u64) -> Result<Movie, ApiError> {
        self.record(format!("movie {}", id));
        match &self.movie {
            Some(movie) => Ok(movie.clone()),
            None => Err(ApiError::Rejected("Movie not found".to_owned())),
        }
    }

    async fn add_movie(&self, movie: &MovieForm) -> Result<(), ApiError> {
        self.record("add".to_owned());
        self.adds.borrow_mut().push(movie.clone());
        self.add.clone()
    }

    async fn update_movie(&self, id: u64, movie: &MovieForm) -> Result<(), ApiError> {
        self.record(format!("update {}", id));
        self.updates.borrow_mut().push((id, movie.clone()));
        self.update.clone()
    }

    async fn delete_movie(&self, id: u64) -> Result<(), ApiError> {
        self.record(format!("delete {}", id));
        self.delete.clone()
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        self.record("register".to_owned());
        self.registrations.borrow_mut().push(registration.clone());
        self.register.clone()
    }

    async fn login(&self, _credentials: &Credentials) -> Result<Token, ApiError> {
        self.record("login".to_owned());
        self.login.clone()
    }
}

/// Records the side effects a page performs on its view.
#[derive(Default)]
pub struct FakeView {
    pub user: Option<(String, Role)>,
    pub admin_controls: bool,
    pub rows: Option<String>,
    pub removed: Vec<u64>,
    pub notices: Vec<String>,
    pub confirms: Vec<String>,
    pub confirm_answer: bool,
    pub location: Option<String>,
    pub token: Option<String>,
}

impl View for FakeView {
    fn set_user(&mut self, username: &str, role: Role) {
        self.user = Some((username.to_owned(), role));
    }

    fn show_admin_controls(&mut self) {
        self.admin_controls = true;
    }

    fn replace_rows(&mut self, html: &str) {
        self.rows = Some(html.to_owned());
    }

    fn remove_row(&mut self, id: u64) {
        self.removed.push(id);
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_owned());
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.confirms.push(question.to_owned());
        self.confirm_answer
    }

    fn navigate(&mut self, location: &str) {
        self.location = Some(location.to_owned());
    }

    fn store_token(&mut self, token: &str) {
        self.token = Some(token.to_owned());
    }
}
