//! Active filter tags and their HTML rendering.
//!
//! Each active search or filter is shown as a removable tag. The markup
//! carries `data-clear` / `data-clear-filter` attributes instead of inline
//! handlers, so whichever rendering layer owns the manager binds removal to
//! [`FilterManager::clear_search`](super::FilterManager::clear_search) and
//! [`FilterManager::clear_filter`](super::FilterManager::clear_filter)
//! directly.

use minijinja::{AutoEscape, Environment, context};
use serde::Serialize;

use super::state::FilterState;
use crate::error::FilterError;

const TEMPLATE_NAME: &str = "active_filters.html";

const TEMPLATE: &str = concat!(
    "{% for tag in tags %}",
    "<span class=\"nf-filter-tag\">",
    "{% if tag.kind == \"search\" %}",
    "<i class=\"fas fa-search\"></i> {{ tag.label }}",
    "<button class=\"nf-filter-tag-remove\" data-clear=\"search\">",
    "{% else %}",
    "{{ tag.label }}",
    "<button class=\"nf-filter-tag-remove\" data-clear-filter=\"{{ tag.key }}\">",
    "{% endif %}",
    "<i class=\"fas fa-times\"></i></button>",
    "</span>",
    "{% endfor %}",
);

/// One removable token describing an active search or filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveFilterTag {
    /// The free-text search query.
    Search {
        /// Normalised query text.
        query: String,
    },
    /// A single field filter.
    Filter {
        /// Field name.
        key: String,
        /// Required value.
        value: String,
    },
}

impl ActiveFilterTag {
    /// Returns the tags for a state: the search first, then filters in key
    /// order.
    #[must_use]
    pub fn from_state(state: &FilterState) -> Vec<Self> {
        let search = (!state.search_query().is_empty()).then(|| Self::Search {
            query: state.search_query().to_owned(),
        });
        search
            .into_iter()
            .chain(state.filters().iter().map(|(key, value)| Self::Filter {
                key: key.clone(),
                value: value.clone(),
            }))
            .collect()
    }

    /// Returns the text shown on the tag.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Search { query } => format!("\"{query}\""),
            Self::Filter { key, value } => format!("{key}: {value}"),
        }
    }
}

#[derive(Debug, Serialize)]
struct TagContext<'a> {
    kind: &'static str,
    key: &'a str,
    label: String,
}

impl<'a> From<&'a ActiveFilterTag> for TagContext<'a> {
    fn from(tag: &'a ActiveFilterTag) -> Self {
        match tag {
            ActiveFilterTag::Search { .. } => Self {
                kind: "search",
                key: "",
                label: tag.label(),
            },
            ActiveFilterTag::Filter { key, .. } => Self {
                kind: "filter",
                key,
                label: tag.label(),
            },
        }
    }
}

/// Renders tags as HTML with every value escaped.
///
/// An empty slice renders the empty string, which callers use to hide the
/// tags container.
///
/// # Errors
///
/// Returns [`FilterError::Template`] if the template fails to render.
pub fn render_tags_html(tags: &[ActiveFilterTag]) -> Result<String, FilterError> {
    if tags.is_empty() {
        return Ok(String::new());
    }

    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.add_template(TEMPLATE_NAME, TEMPLATE)?;

    let contexts: Vec<TagContext<'_>> = tags.iter().map(TagContext::from).collect();
    let template = env.get_template(TEMPLATE_NAME)?;
    Ok(template.render(context! { tags => contexts })?)
}
