//! Bindings between the manager and the page elements that mirror its state.
//!
//! The page may or may not contain a search input, filter selects, or an
//! active-filters container. Implementations silently skip whatever is
//! missing; [`DetachedView`] is the implementation for a page with none of
//! them.

use super::tags::ActiveFilterTag;

/// Page elements that display filter state.
#[cfg_attr(test, mockall::automock)]
pub trait FilterView {
    /// Shows `value` in the search input.
    fn set_search_input(&mut self, value: &str);

    /// Resets the filter select bound to `key` to its empty option.
    fn clear_filter_select(&mut self, key: &str);

    /// Resets every bound filter select to its empty option.
    fn clear_all_filter_selects(&mut self);

    /// Replaces the contents of the active-filters container.
    ///
    /// An empty slice means the container should be emptied and hidden.
    fn render_active_tags(&mut self, tags: &[ActiveFilterTag]);
}

/// A view with no bound elements; every update is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedView;

impl FilterView for DetachedView {
    fn set_search_input(&mut self, _value: &str) {}

    fn clear_filter_select(&mut self, _key: &str) {}

    fn clear_all_filter_selects(&mut self) {}

    fn render_active_tags(&mut self, _tags: &[ActiveFilterTag]) {}
}

/// A view that keeps the rendered active-filters markup as a string.
///
/// Useful for server-rendered pages and for the command-line tool, which
/// have no live elements but still want the tag markup.
#[derive(Debug, Default, Clone)]
pub struct HtmlTagsView {
    search_input: String,
    html: String,
}

impl HtmlTagsView {
    /// Creates a view with an empty input and no tags.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last value shown in the search input.
    #[must_use]
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Returns the last rendered tag markup; empty when no tag is active.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }
}

impl FilterView for HtmlTagsView {
    fn set_search_input(&mut self, value: &str) {
        value.clone_into(&mut self.search_input);
    }

    fn clear_filter_select(&mut self, _key: &str) {}

    fn clear_all_filter_selects(&mut self) {}

    fn render_active_tags(&mut self, tags: &[ActiveFilterTag]) {
        match super::tags::render_tags_html(tags) {
            Ok(html) => self.html = html,
            Err(error) => {
                tracing::warn!("failed to render active filter tags: {error}");
                self.html.clear();
            }
        }
    }
}
