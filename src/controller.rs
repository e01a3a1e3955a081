use crate::api::{ApiError, MovieService};
use crate::model::{Draft, Movie, MovieInput, Permissions, Role, Session};
use crate::render::Renderer;
use log::debug;

pub const LOGIN_PATH: &str = "/login";

/// The page being driven: table body, notifications, confirmation prompt,
/// navigation. The browser DOM in production, a recording fake in tests,
/// a terminal in the demo binary.
pub trait View {
    fn set_user(&mut self, username: &str, role: Role);
    fn show_admin_controls(&mut self);
    fn replace_rows(&mut self, html: &str);
    fn remove_row(&mut self, id: u64);
    fn notify(&mut self, message: &str);
    fn confirm(&mut self, question: &str) -> bool;
    fn navigate(&mut self, location: &str);
    fn store_token(&mut self, token: &str);
}

/// The edit dialog is either closed or holds the draft of exactly one movie.
#[derive(Debug, Clone, PartialEq)]
pub enum EditState {
    Closed,
    Open(Draft),
}

/// Controller for the movie list page. Owns the session, a projection of
/// the server's movie collection (refreshed after every load and edit),
/// and the edit dialog state.
pub struct ListPage<S, V> {
    service: S,
    renderer: Renderer,
    view: V,
    session: Option<Session>,
    permissions: Permissions,
    movies: Vec<Movie>,
    edit: EditState,
    busy: bool,
}

impl<S: MovieService, V: View> ListPage<S, V> {
    pub fn new(service: S, renderer: Renderer, view: V) -> Self {
        ListPage {
            service,
            renderer,
            view,
            session: None,
            permissions: Permissions::none(),
            movies: Vec::new(),
            edit: EditState::Closed,
            busy: false,
        }
    }

    /// Fields of the open draft, for the dialog to write into.
    pub fn draft_mut(&mut self) -> Option<&mut MovieInput> {
        match &mut self.edit {
            EditState::Open(draft) => Some(&mut draft.input),
            EditState::Closed => None,
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The whole list page as markup, once a session is established.
    pub fn render_page(&self) -> Option<tera::Result<String>> {
        let session = self.session.as_ref()?;
        Some(self.renderer.page(
            &session.username,
            session.role,
            &self.movies,
            self.permissions,
        ))
    }

    /// Page load: identify the user, reveal admin controls where allowed,
    /// then populate the table. Any failure to identify means the session
    /// is gone and the user belongs on the login page.
    pub async fn load(&mut self) {
        let session = match self.service.user_info().await {
            Ok(session) => session,
            Err(err) => {
                debug!("user info unavailable: {}", err);
                self.view.navigate(LOGIN_PATH);
                return;
            }
        };
        self.view.set_user(&session.username, session.role);
        self.permissions = session.permissions();
        if self.permissions.manage_movies {
            self.view.show_admin_controls();
        }
        self.session = Some(session);
        self.reload_movies().await;
    }

    /// Replaces the table contents with the server's current collection.
    /// No incremental diffing; the list is small and full replacement is
    /// what keeps the view honest.
    pub async fn reload_movies(&mut self) {
        match self.service.movies().await {
            Ok(movies) => {
                match self.renderer.rows(&movies, self.permissions) {
                    Ok(html) => self.view.replace_rows(&html),
                    Err(err) => {
                        debug!("render failed: {}", err);
                        self.view.notify("Error loading movies: render failed");
                        return;
                    }
                }
                self.movies = movies;
            }
            Err(ApiError::Unauthenticated) => self.view.navigate(LOGIN_PATH),
            Err(err) => self
                .view
                .notify(&format!("Error loading movies: {}", err)),
        }
    }

    /// Opens the edit dialog with a draft of the clicked row. Rows not in
    /// the cached projection (a stale table) are fetched individually.
    pub async fn open_edit(&mut self, id: u64) {
        let cached = self
            .movies
            .iter()
            .find(|movie| movie.id == id)
            .map(Draft::from_movie);
        let draft = match cached {
            Some(draft) => draft,
            None => match self.service.movie(id).await {
                Ok(movie) => Draft::from_movie(&movie),
                Err(ApiError::Unauthenticated) => {
                    self.view.navigate(LOGIN_PATH);
                    return;
                }
                Err(err) => {
                    self.view.notify(&format!("Error loading movie: {}", err));
                    return;
                }
            },
        };
        self.edit = EditState::Open(draft);
    }

    /// Closes the dialog and discards the draft. Issues no request.
    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Closed;
    }

    /// Submits the open draft. The dialog closes only on success; coercion
    /// failures, permission denials and server rejections leave it open
    /// with the draft intact.
    pub async fn submit_edit(&mut self) {
        if self.busy {
            return;
        }
        let draft = match &self.edit {
            EditState::Open(draft) => draft.clone(),
            EditState::Closed => return,
        };
        let form = match draft.input.to_form() {
            Ok(form) => form,
            Err(err) => {
                self.view.notify(&err.to_string());
                return;
            }
        };
        self.busy = true;
        match self.service.update_movie(draft.id, &form).await {
            Ok(()) => {
                self.edit = EditState::Closed;
                self.reload_movies().await;
                self.view.notify("Movie updated successfully!");
            }
            Err(ApiError::Unauthenticated) => self.view.navigate(LOGIN_PATH),
            Err(err @ ApiError::PermissionDenied) => self.view.notify(&err.to_string()),
            Err(err) => self
                .view
                .notify(&format!("Error updating movie: {}", err)),
        }
        self.busy = false;
    }

    /// Deletes one movie after a confirmation prompt. On success only the
    /// affected row is removed; the rest of the table is left as rendered.
    pub async fn delete(&mut self, id: u64) {
        if self.busy {
            return;
        }
        if !self
            .view
            .confirm("Are you sure you want to delete this movie?")
        {
            return;
        }
        self.busy = true;
        match self.service.delete_movie(id).await {
            Ok(()) => {
                self.movies.retain(|movie| movie.id != id);
                self.view.remove_row(id);
                self.view.notify("Movie deleted successfully!");
            }
            Err(ApiError::Unauthenticated) => self.view.navigate(LOGIN_PATH),
            Err(err @ ApiError::PermissionDenied) => self.view.notify(&err.to_string()),
            Err(err) => self
                .view
                .notify(&format!("Error deleting movie: {}", err)),
        }
        self.busy = false;
    }
}
