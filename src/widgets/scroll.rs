/// Cursor plus scroll window over a flat list of rows.
///
/// `max_visible == None` means the whole list is shown and the offset stays
/// pinned at zero.
#[derive(Debug, Clone)]
pub struct RowCursor {
    active: usize,
    offset: usize,
    max_visible: Option<usize>,
}

impl RowCursor {
    pub fn new(max_visible: Option<usize>) -> Self {
        Self {
            active: 0,
            offset: 0,
            max_visible,
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn set_max_visible(&mut self, rows: Option<usize>) {
        self.max_visible = rows;
    }

    /// Wrap-around cursor movement; reports whether the cursor moved.
    pub fn move_by(&mut self, delta: isize, total: usize) -> bool {
        if total == 0 {
            return false;
        }
        let len = total as isize;
        let next = ((self.active as isize + delta % len + len) % len) as usize;
        if next == self.active {
            return false;
        }
        self.active = next;
        self.ensure_visible(total);
        true
    }

    pub fn set_active(&mut self, index: usize, total: usize) {
        self.active = index;
        self.clamp(total);
    }

    pub fn clamp(&mut self, total: usize) {
        if total == 0 {
            self.active = 0;
            self.offset = 0;
            return;
        }
        if self.active >= total {
            self.active = total - 1;
        }
        self.ensure_visible(total);
    }

    fn ensure_visible(&mut self, total: usize) {
        let Some(max) = self.max_visible else {
            self.offset = 0;
            return;
        };
        if total <= max {
            self.offset = 0;
            return;
        }
        if self.active < self.offset {
            self.offset = self.active;
        } else {
            let last = self.offset + max - 1;
            if self.active > last {
                self.offset = self.active + 1 - max;
            }
        }
        self.offset = self.offset.min(total - max);
    }

    pub fn visible_range(&self, total: usize) -> (usize, usize) {
        match self.max_visible {
            Some(max) => {
                let start = self.offset.min(total);
                (start, (start + max).min(total))
            }
            None => (0, total),
        }
    }

    pub fn footer(&self, total: usize) -> Option<String> {
        let max = self.max_visible?;
        if total <= max {
            return None;
        }
        let (start, end) = self.visible_range(total);
        Some(format!("[{}-{} of {}]", start + 1, end, total))
    }
}
