//! HTML templates.
//!
//! Templates are compiled into the binary and registered once at start-up.
//! Auto-escaping is on for every `.html` template; rendered content is marked
//! with `|safe` where it is inserted.

use minijinja::Environment;
use serde::Serialize;

/// Template sources, by name.
const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("guides-list.html", include_str!("../templates/guides-list.html")),
    ("guide.html", include_str!("../templates/guide.html")),
    ("not-found.html", include_str!("../templates/not-found.html")),
];

/// Template environment.
pub(crate) struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Compile all templates.
    pub(crate) fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Render a template with `ctx`.
    pub(crate) fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}
