//! Pagination window
//!
//! Which page buttons a pagination control shows: a run of at most
//! `max_visible` consecutive pages centred on the current page where possible,
//! plus shortcuts to the first and last page with ellipses when they are not
//! adjacent to the run.

use std::fmt;

/// Visible page indices and the decorations around them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageWindow {
    /// Zero-based page the window was computed for
    pub current: u32,
    /// Total number of pages
    pub total_pages: u32,
    /// Consecutive, ascending page indices to render as buttons
    pub pages: Vec<u32>,
    /// Render a shortcut to page 0 before the run
    pub show_first: bool,
    /// Render an ellipsis between the first-page shortcut and the run
    pub leading_ellipsis: bool,
    /// Render a shortcut to the last page after the run
    pub show_last: bool,
    /// Render an ellipsis between the run and the last-page shortcut
    pub trailing_ellipsis: bool,
    /// Enable the "previous" button
    pub has_previous: bool,
    /// Enable the "next" button
    pub has_next: bool,
}

impl PageWindow {
    /// Whether there is anything to render
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// First index of the run (inclusive)
    #[must_use]
    pub fn start(&self) -> Option<u32> {
        self.pages.first().copied()
    }

    /// Last index of the run (exclusive)
    #[must_use]
    pub fn end(&self) -> Option<u32> {
        self.pages.last().map(|last| last + 1)
    }
}

/// Compute the window for `current` of `total_pages`
///
/// A single page (or none) yields an empty window. A `max_visible` of zero is
/// treated as one.
///
/// ```
/// use backoffice_console::pagination::window;
///
/// let w = window(10, 20, 5);
/// assert_eq!(w.pages, vec![8, 9, 10, 11, 12]);
/// assert!(w.leading_ellipsis && w.trailing_ellipsis);
/// ```
#[must_use]
pub fn window(current: u32, total_pages: u32, max_visible: u32) -> PageWindow {
    if total_pages <= 1 {
        return PageWindow {
            current,
            total_pages,
            ..PageWindow::default()
        };
    }

    let max_visible = max_visible.max(1);
    let half = max_visible / 2;
    let mut start = current.saturating_sub(half);
    let end = total_pages.min(start.saturating_add(max_visible));
    if end - start < max_visible {
        start = end.saturating_sub(max_visible);
    }

    PageWindow {
        current,
        total_pages,
        pages: (start..end).collect(),
        show_first: start > 0,
        leading_ellipsis: start > 1,
        show_last: end < total_pages,
        trailing_ellipsis: end < total_pages - 1,
        has_previous: current > 0,
        has_next: current.saturating_add(1) < total_pages,
    }
}

/// Text rendering with one-based labels, e.g. `< 1 ... 9 10 [11] 12 13 ... 20 >`
impl fmt::Display for PageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }

        let mut parts = Vec::with_capacity(self.pages.len() + 6);
        parts.push(if self.has_previous { "<" } else { "|" }.to_string());
        if self.show_first {
            parts.push("1".to_string());
            if self.leading_ellipsis {
                parts.push("...".to_string());
            }
        }
        for &page in &self.pages {
            if page == self.current {
                parts.push(format!("[{}]", page + 1));
            } else {
                parts.push((page + 1).to_string());
            }
        }
        if self.show_last {
            if self.trailing_ellipsis {
                parts.push("...".to_string());
            }
            parts.push(self.total_pages.to_string());
        }
        parts.push(if self.has_next { ">" } else { "|" }.to_string());

        f.write_str(&parts.join(" "))
    }
}
