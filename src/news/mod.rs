mod fetch;
mod model;
mod render;

pub use fetch::{StorySource, TopStoriesClient};
pub use model::Story;
pub use render::render_cards;

use crate::error::LoadError;
use crate::page::{Page, Selector};
use tracing::info;

/// Presence of this element turns the loader on.
pub const HOME_MARKER: &str = "home";
/// Element whose content is replaced by the rendered cards.
pub const STORIES_CONTAINER: &str = "stories";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No home marker on the page; nothing was requested.
    Skipped,
    Rendered { count: usize },
}

/// Fetches once and fills the stories container, if the page is a home page.
///
/// Any failure leaves the container as it was. There is no retry.
pub async fn load_stories<S>(page: &mut Page, source: &S) -> Result<LoadOutcome, LoadError>
where
    S: StorySource + ?Sized,
{
    let marker = Selector::Class(HOME_MARKER.to_string());
    if page.query(&marker).is_none() {
        info!("no .{} marker on page; skipping story load", HOME_MARKER);
        return Ok(LoadOutcome::Skipped);
    }

    let stories = source.top_stories().await?;
    let html = render_cards(&stories)?;

    let container = Selector::Class(STORIES_CONTAINER.to_string());
    let target = page
        .query_mut(&container)
        .ok_or_else(|| LoadError::MissingContainer(format!(".{}", STORIES_CONTAINER)))?;
    target.set_inner_html(html);

    info!(count = stories.len(), "stories rendered");
    Ok(LoadOutcome::Rendered { count: stories.len() })
}
