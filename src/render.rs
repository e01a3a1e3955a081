use crate::model::{Movie, Permissions, Role};
use serde::Serialize;

/// Renders the movie table from templates. All user-supplied text goes
/// through tera's autoescaping, so titles like `<b>` come out as `&lt;b&gt;`.
pub struct Renderer {
    tera: tera::Tera,
}

/// One table row's worth of display strings. Absent numeric columns render
/// as empty cells.
#[derive(Serialize)]
struct Row {
    id: u64,
    title: String,
    director: String,
    release_year: String,
    genre: String,
    rating: String,
}

impl From<&Movie> for Row {
    fn from(movie: &Movie) -> Self {
        Row {
            id: movie.id,
            title: movie.title.clone(),
            director: movie.director.clone().unwrap_or_default(),
            release_year: movie
                .release_year
                .map(|y| y.to_string())
                .unwrap_or_default(),
            genre: movie.genre.clone().unwrap_or_default(),
            rating: movie.rating.map(|r| r.to_string()).unwrap_or_default(),
        }
    }
}

impl Renderer {
    pub fn new() -> tera::Result<Self> {
        let tera = tera::Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*"))?;
        Ok(Renderer { tera })
    }

    /// Markup for the table body: one `<tr>` per movie, in the order given.
    /// Edit/Delete buttons appear iff the permissions allow managing movies.
    pub fn rows(&self, movies: &[Movie], permissions: Permissions) -> tera::Result<String> {
        let rows = movies.iter().map(Row::from).collect::<Vec<_>>();
        let mut ctx = tera::Context::new();
        ctx.insert("movies", &rows);
        ctx.insert("manage", &permissions.manage_movies);
        self.tera.render("rows.html", &ctx)
    }

    /// The whole list page, for output outside a browser.
    pub fn page(
        &self,
        username: &str,
        role: Role,
        movies: &[Movie],
        permissions: Permissions,
    ) -> tera::Result<String> {
        let rows = self.rows(movies, permissions)?;
        let mut ctx = tera::Context::new();
        ctx.insert("username", username);
        ctx.insert("role", &role);
        ctx.insert("manage", &permissions.manage_movies);
        ctx.insert("rows", &rows);
        self.tera.render("index.html", &ctx)
    }
}
