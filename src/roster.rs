use std::{
    collections::{HashMap, HashSet},
    num::NonZeroUsize,
};

use log::{debug, trace};

use crate::mailbox::{Intent, MailboxRecord, PrincipalId};

pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::new(100).expect("100 should be nonzero");

/// One display page cut out of the roster.
#[derive(Debug, PartialEq)]
pub struct Page<'a> {
    pub items: &'a [MailboxRecord],
    pub page_number: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

/// Mutable handles to a subset of the roster, in the order they were asked for.
#[derive(Debug)]
pub struct Selection<'a> {
    pub records: Vec<&'a mut MailboxRecord>,
    pub missing: Vec<PrincipalId>,
}

/// Last fetched snapshot of mailboxes plus the paging cursor over it.
///
/// `current_page` always stays within `1..=max(1, total_pages)`.
#[derive(Debug)]
pub struct Roster {
    records: Vec<MailboxRecord>,
    page_size: NonZeroUsize,
    current_page: usize,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Roster {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            records: Vec::new(),
            page_size,
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MailboxRecord> {
        self.records.iter()
    }

    pub fn total_pages(&self) -> usize {
        self.records.len().div_ceil(self.page_size.get())
    }

    fn last_page(&self) -> usize {
        self.total_pages().max(1)
    }

    /// Swaps in a freshly fetched snapshot. Records that are not directory
    /// synced never enter the roster.
    pub fn replace(&mut self, mut records: Vec<MailboxRecord>) {
        records.retain(|record| {
            if !record.directory_synced() {
                debug!("dropping cloud only mailbox {}", record.principal_id());
            }
            record.directory_synced()
        });
        debug!(
            "replacing snapshot of {} records with {} records",
            self.records.len(),
            records.len()
        );
        self.records = records;
        if self.current_page > self.last_page() {
            trace!("page {} out of range after replace", self.current_page);
            self.current_page = 1;
        }
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    /// Returns the requested page, clamped into the valid page range.
    pub fn page(&self, page_number: usize) -> Page<'_> {
        let page_number = page_number.clamp(1, self.last_page());
        let page_size = self.page_size.get();
        let start = (page_number - 1) * page_size;
        let end = (start + page_size).min(self.records.len());

        Page {
            items: &self.records[start.min(end)..end],
            page_number,
            total_pages: self.total_pages(),
            total_count: self.records.len(),
        }
    }

    pub fn current(&self) -> Page<'_> {
        self.page(self.current_page)
    }

    /// Moves the cursor to `page_number`, clamped into range.
    pub fn go_to(&mut self, page_number: usize) -> usize {
        self.current_page = page_number.clamp(1, self.last_page());
        self.current_page
    }

    /// Moves the cursor by `delta` pages. Leaving the valid range is a no-op.
    pub fn advance_page(&mut self, delta: isize) -> usize {
        match self.current_page.checked_add_signed(delta) {
            Some(target) if (1..=self.last_page()).contains(&target) => {
                self.current_page = target;
            }
            _ => {
                trace!(
                    "ignoring page move by {delta} from {} of {}",
                    self.current_page,
                    self.total_pages()
                );
            }
        }
        self.current_page
    }

    /// Reflects a confirmed remote write. Unknown ids are ignored.
    pub fn apply_local_update(&mut self, principal_id: &PrincipalId, cloud_managed: bool) -> bool {
        if let Some(record) = self
            .records
            .iter_mut()
            .find(|record| record.principal_id() == principal_id)
        {
            record.set_cloud_managed(cloud_managed);
            true
        } else {
            debug!("no record {principal_id} in snapshot to update");
            false
        }
    }

    /// Borrows the records with the given ids mutably, following the order of `ids`.
    ///
    /// Repeated ids select their record once. Ids without a record end up in
    /// [`Selection::missing`].
    pub fn select_mut(&mut self, ids: &[PrincipalId]) -> Selection<'_> {
        let mut order: HashMap<&PrincipalId, usize> = HashMap::with_capacity(ids.len());
        for (position, id) in ids.iter().enumerate() {
            order.entry(id).or_insert(position);
        }

        let mut found: Vec<(usize, &mut MailboxRecord)> = self
            .records
            .iter_mut()
            .filter_map(|record| {
                order
                    .get(record.principal_id())
                    .map(|position| (*position, record))
            })
            .collect();
        found.sort_by_key(|(position, _)| *position);

        let found_positions: HashSet<usize> = found.iter().map(|(position, _)| *position).collect();
        let mut missing: Vec<(usize, PrincipalId)> = order
            .into_iter()
            .filter(|(_, position)| !found_positions.contains(position))
            .map(|(id, position)| (position, id.clone()))
            .collect();
        missing.sort_by_key(|(position, _)| *position);

        Selection {
            records: found.into_iter().map(|(_, record)| record).collect(),
            missing: missing.into_iter().map(|(_, id)| id).collect(),
        }
    }

    /// Translates 1-based row numbers of the current page into principal ids.
    ///
    /// Returns the ids of valid rows and, separately, the rows that do not exist.
    pub fn principals_on_current_page(&self, rows: &[usize]) -> (Vec<PrincipalId>, Vec<usize>) {
        let page = self.current();
        let mut ids = Vec::with_capacity(rows.len());
        let mut out_of_range = Vec::new();
        for row in rows {
            match row.checked_sub(1).and_then(|index| page.items.get(index)) {
                Some(record) => ids.push(record.principal_id().clone()),
                None => out_of_range.push(*row),
            }
        }

        (ids, out_of_range)
    }

    /// Number of cloud managed and on-premises managed records in the snapshot.
    pub fn counts(&self) -> (usize, usize) {
        let cloud = self
            .records
            .iter()
            .filter(|record| record.is_in_state(Intent::SetCloudManaged))
            .count();
        (cloud, self.records.len() - cloud)
    }
}
