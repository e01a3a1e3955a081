use crate::api::{ApiError, MovieService};
use crate::controller::{View, LOGIN_PATH};
use crate::model::{Credentials, MovieInput, Registration, Role};

const HOME_PATH: &str = "/";

/// Registration form: the password check happens before any request, and
/// new accounts always start as clients.
pub struct RegisterPage<S, V> {
    service: S,
    view: V,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl<S: MovieService, V: View> RegisterPage<S, V> {
    pub fn new(service: S, view: V) -> Self {
        RegisterPage { service, view }
    }

    pub async fn submit(&mut self, input: RegisterInput) {
        if input.password != input.confirm_password {
            self.view.notify("Passwords don't match!");
            return;
        }
        let registration = Registration {
            username: input.username,
            email: input.email,
            password: input.password,
            role: Role::Client,
        };
        match self.service.register(&registration).await {
            Ok(()) => {
                self.view.notify("Registration successful! Please login.");
                self.view.navigate(LOGIN_PATH);
            }
            Err(ApiError::Rejected(message)) => self.view.notify(&message),
            Err(_) => self.view.notify("Registration failed"),
        }
    }
}

/// Login form. The bearer token is cached by the view on success; the
/// session cookie is what the list and edit flows actually rely on.
pub struct LoginPage<S, V> {
    service: S,
    view: V,
}

impl<S: MovieService, V: View> LoginPage<S, V> {
    pub fn new(service: S, view: V) -> Self {
        LoginPage { service, view }
    }

    pub async fn submit(&mut self, credentials: Credentials) {
        match self.service.login(&credentials).await {
            Ok(token) => {
                self.view.store_token(&token.token);
                self.view.navigate(HOME_PATH);
            }
            Err(ApiError::Rejected(message)) => self.view.notify(&message),
            Err(_) => self.view.notify("Login failed"),
        }
    }
}

/// Add-movie form, with the same numeric coercion as the edit draft.
pub struct AddMoviePage<S, V> {
    service: S,
    view: V,
}

impl<S: MovieService, V: View> AddMoviePage<S, V> {
    pub fn new(service: S, view: V) -> Self {
        AddMoviePage { service, view }
    }

    pub async fn submit(&mut self, input: MovieInput) {
        let form = match input.to_form() {
            Ok(form) => form,
            Err(err) => {
                self.view.notify(&err.to_string());
                return;
            }
        };
        match self.service.add_movie(&form).await {
            Ok(()) => {
                self.view.notify("Movie added successfully!");
                self.view.navigate(HOME_PATH);
            }
            Err(ApiError::Unauthenticated) => self.view.navigate(LOGIN_PATH),
            Err(err @ ApiError::PermissionDenied) => self.view.notify(&err.to_string()),
            Err(err) => self.view.notify(&format!("Error adding movie: {}", err)),
        }
    }
}
