use handlebars::{handlebars_helper, no_escape, Handlebars};

use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn write_string_to_file(filename: &str, content: &str) -> std::io::Result<()> {
    let path = Path::new(filename);
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Escape a value for use inside a Markdown table cell
pub fn markdown_cell(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace(['\r', '\n'], " ")
}

/// Handlebars registry for plain-text reports: no HTML escaping
pub fn get_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(no_escape);

    handlebars_helper!(mdcell: |s: String| markdown_cell(&s));
    handlebars.register_helper("mdcell", Box::new(mdcell));

    handlebars
}
