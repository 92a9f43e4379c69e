//! In-memory page document.
//!
//! Just enough of a DOM for the loader and the nav router: elements with an
//! id, a class list and attributes, `querySelector`-style lookup, inner-HTML
//! replacement and serialization back to an HTML document.

use crate::error::SelectorError;
use askama::Template;
use std::str::FromStr;

/// A single simple selector: `#id`, `.class` or a tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(String),
    Class(String),
    Tag(String),
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SelectorError::Empty);
        }
        let selector = if let Some(id) = s.strip_prefix('#') {
            Selector::Id(id.to_string())
        } else if let Some(class) = s.strip_prefix('.') {
            Selector::Class(class.to_string())
        } else {
            Selector::Tag(s.to_string())
        };
        if matches!(&selector, Selector::Id(name) | Selector::Class(name) if name.is_empty()) {
            return Err(SelectorError::MissingName(s.to_string()));
        }
        Ok(selector)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Children(Vec<Element>),
    /// Escaped when serialized.
    Text(String),
    /// Trusted markup inserted verbatim.
    Html(String),
}

#[derive(Template)]
#[template(
    source = r#"<{{ tag }}{% if !id.is_empty() %} id="{{ id }}"{% endif %}{% if !class.is_empty() %} class="{{ class }}"{% endif %}{% for (name, value) in attrs %} {{ name }}="{{ value }}"{% endfor %}>{{ inner|safe }}</{{ tag }}>"#,
    ext = "html"
)]
struct ElementTemplate<'a> {
    tag: &'a str,
    id: &'a str,
    class: String,
    attrs: &'a Vec<(String, String)>,
    inner: String,
}

#[derive(Template)]
#[template(source = "{{ text }}", ext = "html")]
struct TextTemplate<'a> {
    text: &'a str,
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    title: &'a str,
    body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    content: Content,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            content: Content::Children(Vec::new()),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            Content::Text(_) | Content::Html(_) => {
                self.content = Content::Children(vec![child]);
            }
        }
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.content = Content::Text(text.to_string());
        self
    }

    #[cfg(test)]
    pub fn with_html(mut self, html: &str) -> Self {
        self.set_inner_html(html.to_string());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[cfg(test)]
    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn inner_html(&self) -> askama::Result<String> {
        match &self.content {
            Content::Html(html) => Ok(html.clone()),
            Content::Text(text) => TextTemplate { text }.render(),
            Content::Children(children) => children
                .iter()
                .map(Element::outer_html)
                .collect::<askama::Result<Vec<_>>>()
                .map(|parts| parts.concat()),
        }
    }

    pub fn outer_html(&self) -> askama::Result<String> {
        ElementTemplate {
            tag: &self.tag,
            id: self.id.as_deref().unwrap_or(""),
            class: self.classes.join(" "),
            attrs: &self.attrs,
            inner: self.inner_html()?,
        }
        .render()
    }

    /// Replaces everything inside the element.
    pub fn set_inner_html(&mut self, html: String) {
        self.content = Content::Html(html);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Flips `class` and returns whether it is present afterwards.
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }

    pub fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Id(id) => self.id.as_deref() == Some(id.as_str()),
            Selector::Class(class) => self.has_class(class),
            Selector::Tag(tag) => self.tag.eq_ignore_ascii_case(tag),
        }
    }

    /// First match in document order, the element itself included.
    pub fn find(&self, selector: &Selector) -> Option<&Element> {
        if self.matches(selector) {
            return Some(self);
        }
        match &self.content {
            Content::Children(children) => children.iter().find_map(|c| c.find(selector)),
            Content::Text(_) | Content::Html(_) => None,
        }
    }

    pub fn find_mut(&mut self, selector: &Selector) -> Option<&mut Element> {
        if self.matches(selector) {
            return Some(self);
        }
        match &mut self.content {
            Content::Children(children) => {
                children.iter_mut().find_map(|c| c.find_mut(selector))
            }
            Content::Text(_) | Content::Html(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    title: String,
    body: Element,
}

impl Page {
    pub fn new(title: &str, body: Element) -> Self {
        Self {
            title: title.to_string(),
            body,
        }
    }

    /// Front page: nav with the `#pull` control, a `.home` marker and an
    /// empty `.stories` container.
    pub fn home(title: &str) -> Self {
        Self::new(
            title,
            Element::new("body")
                .with_child(nav())
                .with_child(
                    Element::new("main")
                        .with_class("home")
                        .with_child(Element::new("h1").with_text(title))
                        .with_child(Element::new("section").with_class("stories")),
                ),
        )
    }

    /// Same chrome as [`Page::home`] but without the home marker.
    pub fn plain(title: &str) -> Self {
        Self::new(
            title,
            Element::new("body").with_child(nav()).with_child(
                Element::new("main")
                    .with_child(Element::new("h1").with_text(title))
                    .with_child(Element::new("section").with_class("stories")),
            ),
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    #[cfg(test)]
    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Element {
        &mut self.body
    }

    pub fn query(&self, selector: &Selector) -> Option<&Element> {
        self.body.find(selector)
    }

    pub fn query_mut(&mut self, selector: &Selector) -> Option<&mut Element> {
        self.body.find_mut(selector)
    }

    pub fn to_html(&self) -> askama::Result<String> {
        PageTemplate {
            title: &self.title,
            body: self.body.outer_html()?,
        }
        .render()
    }
}

fn nav() -> Element {
    Element::new("header").with_child(
        Element::new("nav")
            .with_class("site-nav")
            .with_child(
                Element::new("a")
                    .with_id("pull")
                    .with_attr("href", "#")
                    .with_text("Menu"),
            )
            .with_child(
                Element::new("ul").with_child(
                    Element::new("li").with_child(
                        Element::new("a")
                            .with_class("nav-link")
                            .with_attr("href", "index.html")
                            .with_text("Home"),
                    ),
                ),
            ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(s: &str) -> Selector {
        s.parse().unwrap()
    }

    #[test]
    fn parses_selectors() {
        assert_eq!(sel("#pull"), Selector::Id("pull".into()));
        assert_eq!(sel(".stories"), Selector::Class("stories".into()));
        assert_eq!(sel("body"), Selector::Tag("body".into()));
        assert_eq!("  ".parse::<Selector>(), Err(SelectorError::Empty));
        assert_eq!(
            "#".parse::<Selector>(),
            Err(SelectorError::MissingName("#".into()))
        );
    }

    #[test]
    fn home_page_has_markers() {
        let page = Page::home("NY Region");
        assert!(page.query(&sel(".home")).is_some());
        assert!(page.query(&sel(".stories")).is_some());
        assert_eq!(page.query(&sel("#pull")).map(|e| e.tag()), Some("a"));
        assert!(Page::plain("x").query(&sel(".home")).is_none());
    }

    #[test]
    fn query_returns_first_in_document_order() {
        let body = Element::new("body")
            .with_child(Element::new("div").with_class("x").with_id("first"))
            .with_child(Element::new("div").with_class("x").with_id("second"));
        let page = Page::new("t", body);
        assert_eq!(page.query(&sel(".x")).and_then(|e| e.id()), Some("first"));
    }

    #[test]
    fn inner_html_replaces_children() {
        let mut page = Page::home("t");
        let main = page.query_mut(&sel("main")).unwrap();
        main.set_inner_html("<p>gone</p>".into());
        assert!(page.query(&sel(".stories")).is_none());
        assert_eq!(page.query(&sel("main")).unwrap().inner_html().unwrap(), "<p>gone</p>");
    }

    #[test]
    fn toggle_class_flips_presence() {
        let mut el = Element::new("body");
        assert!(el.toggle_class("show-nav"));
        assert!(el.has_class("show-nav"));
        assert!(!el.toggle_class("show-nav"));
        assert!(el.classes().is_empty());
    }

    #[test]
    fn serializes_document() {
        let mut page = Page::home("Q&A");
        page.body_mut().add_class("show-nav");
        let html = page.to_html().unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Q&amp;A</title>"));
        assert!(html.contains("<body class=\"show-nav\">"));
        assert!(html.contains("<a id=\"pull\" href=\"#\">Menu</a>"));
        assert!(html.contains("<section class=\"stories\"></section>"));
        assert!(html.contains("<h1>Q&amp;A</h1>"));
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let body = Element::new("body").with_child(
            Element::new("a")
                .with_attr("title", "\"><script>x</script>")
                .with_text("<i>not markup</i>"),
        );
        let html = Page::new("t", body).to_html().unwrap();
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<i>"));
        assert!(html.contains("&lt;i&gt;not markup&lt;/i&gt;"));
    }

    #[test]
    fn trusted_html_is_kept_verbatim() {
        let el = Element::new("section").with_html("<p>card</p>");
        assert_eq!(el.outer_html().unwrap(), "<section><p>card</p></section>");
    }
}
