mod api;
mod controller;
mod forms;
mod model;
mod render;
#[cfg(test)]
mod testutil;

use api::Api;
use controller::{ListPage, View};
use forms::{AddMoviePage, LoginPage, RegisterInput, RegisterPage};
use log::info;
use model::{Credentials, MovieInput, Role};
use render::Renderer;
use std::io::{self, Write};

/// Terminal-backed view, enough to drive the pages outside a browser.
struct TermView;

impl View for TermView {
    fn set_user(&mut self, username: &str, role: Role) {
        let role = match role {
            Role::Admin => "admin",
            Role::Client => "client",
        };
        println!("Logged in as {} ({})", username, role);
    }

    fn show_admin_controls(&mut self) {
        println!("(admin controls enabled)");
    }

    fn replace_rows(&mut self, html: &str) {
        info!("table updated ({} bytes)", html.len());
    }

    fn remove_row(&mut self, id: u64) {
        info!("row {} removed", id);
    }

    fn notify(&mut self, message: &str) {
        println!("{}", message);
    }

    fn confirm(&mut self, question: &str) -> bool {
        print!("{} [y/N] ", question);
        let _ = io::stdout().flush();
        // Blocking read on the runtime thread; the demo drives a single
        // page and has nothing else in flight while it waits.
        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }

    fn navigate(&mut self, location: &str) {
        println!("-> {}", location);
    }

    fn store_token(&mut self, token: &str) {
        info!("token cached ({} chars)", token.len());
    }
}

fn to_io<E: std::fmt::Display>(err: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_owned())
}

fn print_page(page: &ListPage<Api, TermView>) -> io::Result<()> {
    if let Some(html) = page.render_page() {
        println!("{}", html.map_err(to_io)?);
    }
    Ok(())
}

async fn register(base: &str) -> io::Result<()> {
    let input = RegisterInput {
        username: prompt("username")?,
        email: prompt("email")?,
        password: prompt("password")?,
        confirm_password: prompt("confirm password")?,
    };
    let mut page = RegisterPage::new(Api::new(base), TermView);
    page.submit(input).await;
    Ok(())
}

async fn login(base: &str) -> io::Result<()> {
    let credentials = Credentials {
        username: prompt("username")?,
        password: prompt("password")?,
    };
    let mut page = LoginPage::new(Api::new(base), TermView);
    page.submit(credentials).await;
    Ok(())
}

async fn add_movie(base: &str) -> io::Result<()> {
    let input = MovieInput {
        title: prompt("title")?,
        director: prompt("director")?,
        release_year: prompt("release year")?,
        genre: prompt("genre")?,
        rating: prompt("rating")?,
    };
    let mut page = AddMoviePage::new(Api::new(base), TermView);
    page.submit(input).await;
    Ok(())
}

async fn run_commands(base: &str, page: &mut ListPage<Api, TermView>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let mut words = line.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("list"), _, _) => {
                page.reload_movies().await;
                print_page(page)?;
                println!("{} movies", page.movies().len());
            }
            (Some("add"), _, _) => {
                add_movie(base).await?;
                page.reload_movies().await;
            }
            (Some("delete"), Some(id), _) => match id.parse() {
                Ok(id) => page.delete(id).await,
                Err(_) => println!("usage: delete <id>"),
            },
            (Some("rate"), Some(id), Some(rating)) => match id.parse() {
                Ok(id) => {
                    page.open_edit(id).await;
                    match page.draft_mut() {
                        Some(input) => {
                            input.rating = rating.to_owned();
                            page.submit_edit().await;
                        }
                        None => page.cancel_edit(),
                    }
                }
                Err(_) => println!("usage: rate <id> <rating>"),
            },
            (Some("quit"), _, _) | (Some("q"), _, _) => return Ok(()),
            (None, _, _) => {}
            _ => println!("commands: list, add, rate <id> <rating>, delete <id>, quit"),
        }
    }
}

async fn browse(base: &str) -> io::Result<()> {
    let renderer = Renderer::new().map_err(to_io)?;
    let mut page = ListPage::new(Api::new(base), renderer, TermView);
    page.load().await;

    let manage = match page.session() {
        Some(session) => session.permissions().manage_movies,
        None => return Ok(()),
    };
    print_page(&page)?;
    if manage {
        run_commands(base, &mut page).await?;
    }
    Ok(())
}

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "cinelist=debug");
    }
    env_logger::init();

    let base = std::env::var("CINELIST_API")
        .unwrap_or_else(|_| "http://localhost:5000/api".to_owned());
    info!("using API base {}", base);

    match std::env::args().nth(1).as_deref() {
        Some("register") => register(&base).await,
        Some("login") => login(&base).await,
        Some(other) => {
            eprintln!("unknown command '{}'; expected register or login", other);
            Ok(())
        }
        None => browse(&base).await,
    }
}
