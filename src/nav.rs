//! Document-level click routing.
//!
//! One router receives every click on the page and looks the target's id up
//! in a routing table. Unrouted clicks are ignored.

use crate::page::{Element, Page, Selector};
use std::collections::HashMap;
use tracing::debug;

pub const PULL_CONTROL: &str = "pull";
pub const SHOW_NAV_CLASS: &str = "show-nav";

/// A click on one element of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    target_tag: String,
    target_id: Option<String>,
    target_classes: Vec<String>,
    default_prevented: bool,
}

impl ClickEvent {
    pub fn on(target: &Element) -> Self {
        Self {
            target_tag: target.tag().to_string(),
            target_id: target.id().map(String::from),
            target_classes: target.classes().to_vec(),
            default_prevented: false,
        }
    }

    /// Click on the first element matching `selector`, if there is one.
    pub fn at(page: &Page, selector: &Selector) -> Option<Self> {
        page.query(selector).map(Self::on)
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    ToggleBodyClass(String),
}

#[derive(Debug, Clone, Default)]
pub struct NavRouter {
    routes: HashMap<String, NavAction>,
}

impl NavRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The site's routing table: `#pull` shows and hides the nav panel.
    pub fn site() -> Self {
        let mut router = Self::new();
        router.route(PULL_CONTROL, NavAction::ToggleBodyClass(SHOW_NAV_CLASS.to_string()));
        router
    }

    pub fn route(&mut self, control_id: &str, action: NavAction) -> &mut Self {
        self.routes.insert(control_id.to_string(), action);
        self
    }

    /// Runs the action routed for the event's target. Returns whether the
    /// click was handled; handled clicks have their default prevented.
    pub fn dispatch(&self, page: &mut Page, event: &mut ClickEvent) -> bool {
        debug!(
            tag = %event.target_tag,
            id = event.target_id.as_deref().unwrap_or(""),
            classes = %event.target_classes.join(" "),
            "click"
        );
        let Some(action) = event.target_id.as_deref().and_then(|id| self.routes.get(id)) else {
            return false;
        };
        match action {
            NavAction::ToggleBodyClass(class) => {
                let shown = page.body_mut().toggle_class(class);
                debug!(class = %class, shown, "body class toggled");
            }
        }
        event.prevent_default();
        true
    }
}
