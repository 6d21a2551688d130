use anyhow::Result;
use serde::Serialize;

use crate::nav::page::Page;
use crate::nav::route::Route;

/// A rendered page as emitted by `--json`.
#[derive(Debug, Serialize)]
pub struct PageEnvelope<'a> {
    pub path: String,
    /// Set when the requested path was unknown and login was shown instead.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub redirected: bool,
    pub title: &'a str,
    #[serde(flatten)]
    pub page: &'a Page<'a>,
    pub links: Vec<String>,
}

impl<'a> PageEnvelope<'a> {
    pub fn new(route: &Route, redirected: bool, page: &'a Page<'a>) -> Self {
        PageEnvelope {
            path: route.path(),
            redirected,
            title: page.title(),
            page,
            links: page.links().iter().map(Route::path).collect(),
        }
    }
}

/// Pretty-print any serializable value as JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

pub fn print_page(route: &Route, redirected: bool, page: &Page) -> Result<()> {
    print_json(&PageEnvelope::new(route, redirected, page))
}
