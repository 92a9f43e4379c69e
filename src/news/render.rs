use super::model::Story;
use crate::error::RenderError;
use crate::util::sanitize::web_link;
use askama::Template;

/// Multimedia slot used for the card image.
// FIXME: assumes the API lists image renditions in a stable size order; no
// rendition is picked by `format`, and short lists fail instead of falling back.
pub const CARD_IMAGE_INDEX: usize = 2;

/// Values interpolated into one story card. Links are already restricted to
/// http(s); the template escapes everything.
struct Card<'a> {
    src: String,
    caption: &'a str,
    url: String,
    title: &'a str,
    summary: &'a str,
}

#[derive(Template)]
#[template(path = "card.html")]
struct CardTemplate<'a> {
    card: &'a Card<'a>,
}

/// Renders one card per story, in input order. Nothing is produced if any
/// story fails.
pub fn render_cards(stories: &[Story]) -> Result<String, RenderError> {
    stories
        .iter()
        .map(render_card)
        .collect::<Result<Vec<_>, _>>()
        .map(|cards| cards.concat())
}

pub fn render_card(story: &Story) -> Result<String, RenderError> {
    let card = card_for(story)?;
    Ok(CardTemplate { card: &card }.render()?)
}

fn card_for(story: &Story) -> Result<Card<'_>, RenderError> {
    let (src, caption) = match &story.multimedia {
        None => ("", ""),
        Some(media) => {
            let entry = media
                .get(CARD_IMAGE_INDEX)
                .ok_or_else(|| RenderError::MediaIndexOutOfRange {
                    url: story.url.clone(),
                    index: CARD_IMAGE_INDEX,
                    len: media.len(),
                })?;
            (entry.url.as_str(), entry.caption.as_deref().unwrap_or(""))
        }
    };
    Ok(Card {
        src: web_link(src),
        caption,
        url: web_link(&story.url),
        title: &story.title,
        summary: &story.summary,
    })
}
