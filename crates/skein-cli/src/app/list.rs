//! Torrent list: ordering, status and category filters, cursor and selection.

use std::collections::BTreeSet;

use skein_torrent_core::{TorrentId, TorrentStatusKind, TorrentSummary};

/// Ordering applied to the list after every refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum SortKey {
    /// Newest first.
    #[default]
    Added,
    /// Case-insensitive name.
    Name,
    /// Most complete first.
    Progress,
    /// Largest first.
    Size,
}

impl SortKey {
    pub(crate) const fn next(self) -> Self {
        match self {
            Self::Added => Self::Name,
            Self::Name => Self::Progress,
            Self::Progress => Self::Size,
            Self::Size => Self::Added,
        }
    }

    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::Added => "Added date",
            Self::Name => "Name",
            Self::Progress => "Progress",
            Self::Size => "Size",
        }
    }

    fn sort(self, torrents: &mut [TorrentSummary]) {
        match self {
            Self::Added => torrents.sort_by(|a, b| b.added_at.cmp(&a.added_at)),
            Self::Name => torrents.sort_by_cached_key(|t| t.name.to_lowercase()),
            Self::Progress => torrents.sort_by(|a, b| b.percent_done.total_cmp(&a.percent_done)),
            Self::Size => torrents.sort_by(|a, b| b.size_when_done.cmp(&a.size_when_done)),
        }
    }
}

/// Status filter; queued covers both download and seed waits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum StatusFilter {
    #[default]
    All,
    Stopped,
    CheckWait,
    Checking,
    Queued,
    Downloading,
    Seeding,
    /// Any transfer rate above zero.
    Active,
    Errored,
}

impl StatusFilter {
    pub(crate) const fn next(self) -> Self {
        match self {
            Self::All => Self::Stopped,
            Self::Stopped => Self::CheckWait,
            Self::CheckWait => Self::Checking,
            Self::Checking => Self::Queued,
            Self::Queued => Self::Downloading,
            Self::Downloading => Self::Seeding,
            Self::Seeding => Self::Active,
            Self::Active => Self::Errored,
            Self::Errored => Self::All,
        }
    }

    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Stopped => "Stopped",
            Self::CheckWait => "Check wait",
            Self::Checking => "Checking",
            Self::Queued => "Queued",
            Self::Downloading => "Downloading",
            Self::Seeding => "Seeding",
            Self::Active => "Active",
            Self::Errored => "Errored",
        }
    }

    fn matches(self, torrent: &TorrentSummary) -> bool {
        match self {
            Self::All => true,
            Self::Active => torrent.is_active(),
            Self::Errored => torrent.has_error(),
            Self::Stopped => torrent.status == TorrentStatusKind::Stopped,
            Self::CheckWait => torrent.status == TorrentStatusKind::CheckWait,
            Self::Checking => torrent.status == TorrentStatusKind::Checking,
            Self::Queued => matches!(
                torrent.status,
                TorrentStatusKind::DownloadWait | TorrentStatusKind::SeedWait
            ),
            Self::Downloading => torrent.status == TorrentStatusKind::Downloading,
            Self::Seeding => torrent.status == TorrentStatusKind::Seeding,
        }
    }
}

/// Label filter. `Unlabelled` is shown as "Default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum CategoryFilter {
    #[default]
    All,
    Unlabelled,
    Label(String),
}

impl CategoryFilter {
    pub(crate) fn label(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Unlabelled => "Default",
            Self::Label(label) => label,
        }
    }

    fn matches(&self, torrent: &TorrentSummary) -> bool {
        match self {
            Self::All => true,
            Self::Unlabelled => torrent.labels.is_empty(),
            Self::Label(label) => torrent.labels.iter().any(|l| l == label),
        }
    }
}

/// Sorted torrent list with the filters, cursor and multi-selection applied
/// on top. The cursor indexes the visible rows.
#[derive(Debug, Default)]
pub(crate) struct TorrentList {
    torrents: Vec<TorrentSummary>,
    sort: SortKey,
    status: StatusFilter,
    category: CategoryFilter,
    selected: BTreeSet<TorrentId>,
    cursor: usize,
}

impl TorrentList {
    /// Replace the contents with a fresh listing, keeping the cursor on the
    /// same torrent when it is still visible.
    ///
    /// When the active filter hides every torrent the filters reset to all.
    pub(crate) fn replace(&mut self, mut torrents: Vec<TorrentSummary>) {
        let focused = self.current().map(|t| t.id);
        self.sort.sort(&mut torrents);
        self.torrents = torrents;
        self.selected
            .retain(|id| self.torrents.iter().any(|t| t.id == *id));
        if self.visible().is_empty() && !self.is_unfiltered() {
            self.status = StatusFilter::All;
            self.category = CategoryFilter::All;
        }
        self.refocus(focused);
    }

    pub(crate) fn visible(&self) -> Vec<&TorrentSummary> {
        self.torrents
            .iter()
            .filter(|t| self.status.matches(t) && self.category.matches(t))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.torrents.len()
    }

    pub(crate) const fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn current(&self) -> Option<&TorrentSummary> {
        self.visible().get(self.cursor).copied()
    }

    pub(crate) fn move_cursor(&mut self, delta: isize) {
        let count = self.visible().len();
        if count == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(count - 1);
    }

    pub(crate) const fn sort_key(&self) -> SortKey {
        self.sort
    }

    pub(crate) fn set_sort(&mut self, sort: SortKey) {
        let focused = self.current().map(|t| t.id);
        self.sort = sort;
        self.sort.sort(&mut self.torrents);
        self.refocus(focused);
    }

    pub(crate) const fn status_filter(&self) -> StatusFilter {
        self.status
    }

    pub(crate) const fn category_filter(&self) -> &CategoryFilter {
        &self.category
    }

    /// Filter by status. Clears the category filter.
    pub(crate) fn set_status_filter(&mut self, status: StatusFilter) {
        self.status = status;
        self.category = CategoryFilter::All;
        self.cursor = 0;
    }

    /// Filter by category. Resets the status filter to all.
    pub(crate) fn set_category_filter(&mut self, category: CategoryFilter) {
        self.category = category;
        self.status = StatusFilter::All;
        self.cursor = 0;
    }

    /// Category after the current one: all, default, then labels in order.
    pub(crate) fn next_category(&self) -> CategoryFilter {
        let labels = self.labels();
        match &self.category {
            CategoryFilter::All => CategoryFilter::Unlabelled,
            CategoryFilter::Unlabelled => labels
                .first()
                .map_or(CategoryFilter::All, |l| CategoryFilter::Label(l.clone())),
            CategoryFilter::Label(current) => labels
                .iter()
                .skip_while(|l| *l != current)
                .nth(1)
                .map_or(CategoryFilter::All, |l| CategoryFilter::Label(l.clone())),
        }
    }

    /// Every label in use, sorted and de-duplicated.
    pub(crate) fn labels(&self) -> Vec<String> {
        self.torrents
            .iter()
            .flat_map(|t| t.labels.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub(crate) fn is_selected(&self, id: TorrentId) -> bool {
        self.selected.contains(&id)
    }

    pub(crate) fn selection_len(&self) -> usize {
        self.selected.len()
    }

    /// Flip selection of the torrent under the cursor and move down.
    pub(crate) fn toggle_selected(&mut self) {
        let Some(id) = self.current().map(|t| t.id) else {
            return;
        };
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        self.move_cursor(1);
    }

    pub(crate) fn select_all(&mut self, select: bool) {
        if select {
            let ids: Vec<TorrentId> = self.visible().iter().map(|t| t.id).collect();
            self.selected.extend(ids);
        } else {
            self.selected.clear();
        }
    }

    /// Torrents an action applies to: the selection, or the cursor row.
    pub(crate) fn targets(&self) -> Vec<TorrentId> {
        if self.selected.is_empty() {
            self.current().map(|t| t.id).into_iter().collect()
        } else {
            self.selected.iter().copied().collect()
        }
    }

    /// Move the cursor to the next visible torrent whose name contains
    /// `needle`, ignoring case and wrapping past the end. The search starts
    /// at the cursor row, or just after it when `skip_current` is set.
    /// Returns whether a match was found.
    pub(crate) fn search(&mut self, needle: &str, skip_current: bool) -> bool {
        let needle = needle.to_lowercase();
        if needle.is_empty() {
            return false;
        }
        let visible = self.visible();
        let count = visible.len();
        let start = self.cursor + usize::from(skip_current);
        let found = (0..count)
            .map(|offset| (start + offset) % count)
            .find(|&index| visible[index].name.to_lowercase().contains(&needle));
        match found {
            Some(index) => {
                self.cursor = index;
                true
            }
            None => false,
        }
    }

    fn is_unfiltered(&self) -> bool {
        self.status == StatusFilter::All && self.category == CategoryFilter::All
    }

    fn refocus(&mut self, focused: Option<TorrentId>) {
        let position = focused.and_then(|id| self.visible().iter().position(|t| t.id == id));
        match position {
            Some(position) => self.cursor = position,
            None => self.move_cursor(0),
        }
    }
}
