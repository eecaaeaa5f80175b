use std::collections::HashMap;
use std::ops::Range;

use crate::core::value_path::ValuePath;

/// Extra items planned on each side of the visible range, so fast scrolling
/// does not outrun the rendered slice.
pub const OVERSCAN: usize = 10;

/// Size assumed for an item nobody has measured yet.
pub const DEFAULT_ITEM_SIZE: f32 = 28.0;

/// Units per rendered terminal row. One unmeasured item reads as one row.
pub const ROW_UNIT: f32 = 28.0;

/// Size source for window planning. Implementations answer with their best
/// current estimate and accept real measurements as rendering produces them,
/// so the planning math never needs a live rendering surface.
pub trait ItemSizer {
    fn estimate(&self, index: usize) -> f32;
    fn record(&mut self, index: usize, size: f32);
}

/// Fixed default estimate with measured overrides.
#[derive(Debug, Clone)]
pub struct EstimatedSizes {
    default_size: f32,
    measured: HashMap<usize, f32>,
}

impl EstimatedSizes {
    pub fn new(default_size: f32) -> Self {
        Self {
            default_size,
            measured: HashMap::new(),
        }
    }
}

impl Default for EstimatedSizes {
    fn default() -> Self {
        Self::new(DEFAULT_ITEM_SIZE)
    }
}

impl ItemSizer for EstimatedSizes {
    fn estimate(&self, index: usize) -> f32 {
        self.measured
            .get(&index)
            .copied()
            .unwrap_or(self.default_size)
    }

    fn record(&mut self, index: usize, size: f32) {
        if size > 0.0 {
            self.measured.insert(index, size);
        }
    }
}

/// The part of the scroll container a window is planned against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset: f32,
    pub height: f32,
}

/// The slice of a long list worth rendering right now.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowPlan {
    /// Scroll space the whole list occupies; unrendered items still take
    /// their share of it.
    pub total_extent: f32,
    /// Indexes to render: the visible range widened by the overscan margin.
    pub range: Range<usize>,
    /// Absolute start offset of each planned item, aligned with `range`.
    pub offsets: Vec<f32>,
}

impl WindowPlan {
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Computes the window of `len` items to render for `viewport`.
///
/// One pass over the estimates finds the visible index range and the total
/// extent; a second bounded pass produces the absolute offset of every
/// planned item. Work stays linear in `len` however the caller scrolls.
pub fn plan_window(
    sizer: &dyn ItemSizer,
    len: usize,
    viewport: Viewport,
    overscan: usize,
) -> WindowPlan {
    if len == 0 {
        return WindowPlan {
            total_extent: 0.0,
            range: 0..0,
            offsets: Vec::new(),
        };
    }

    let window_start = viewport.offset.max(0.0);
    let window_end = window_start + viewport.height.max(0.0);

    let mut total = 0.0f32;
    let mut first_visible = None;
    let mut end_visible = None;
    for index in 0..len {
        let start = total;
        total += sizer.estimate(index);
        if first_visible.is_none() && total > window_start {
            first_visible = Some(index);
        }
        if end_visible.is_none() && start >= window_end {
            end_visible = Some(index);
        }
    }

    // Scrolled past the end: pin the window to the last item.
    let first_visible = first_visible.unwrap_or(len - 1);
    let end_visible = end_visible.unwrap_or(len).max(first_visible + 1);

    let range = first_visible.saturating_sub(overscan)..(end_visible + overscan).min(len);

    let mut offsets = Vec::with_capacity(range.len());
    let mut cursor = 0.0f32;
    for index in 0..range.end {
        if index >= range.start {
            offsets.push(cursor);
        }
        cursor += sizer.estimate(index);
    }

    WindowPlan {
        total_extent: total,
        range,
        offsets,
    }
}

/// Per-list window state owned by the tree widget: one scroll offset and
/// one size tracker for every virtualized list, addressed by path. Lists
/// nobody scrolled or measured yet plan against defaults.
#[derive(Debug)]
pub struct WindowStates {
    viewport_height: f32,
    entries: HashMap<ValuePath, WindowEntry>,
}

#[derive(Debug)]
struct WindowEntry {
    offset: f32,
    sizes: EstimatedSizes,
}

impl Default for WindowEntry {
    fn default() -> Self {
        Self {
            offset: 0.0,
            sizes: EstimatedSizes::default(),
        }
    }
}

impl WindowStates {
    pub fn new(viewport_height: f32) -> Self {
        Self {
            viewport_height,
            entries: HashMap::new(),
        }
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(ROW_UNIT);
    }

    pub fn plan(&self, path: &ValuePath, len: usize) -> WindowPlan {
        let height = self.viewport_height;
        match self.entries.get(path) {
            Some(entry) => plan_window(
                &entry.sizes,
                len,
                Viewport {
                    offset: entry.offset,
                    height,
                },
                OVERSCAN,
            ),
            None => plan_window(
                &EstimatedSizes::default(),
                len,
                Viewport {
                    offset: 0.0,
                    height,
                },
                OVERSCAN,
            ),
        }
    }

    /// Moves the window over the list at `path` by `delta` units, clamped
    /// to the scroll range its current estimates allow.
    pub fn scroll_by(&mut self, path: &ValuePath, len: usize, delta: f32) {
        let height = self.viewport_height;
        let entry = self.entries.entry(path.clone()).or_default();
        let mut extent = 0.0f32;
        for index in 0..len {
            extent += entry.sizes.estimate(index);
        }
        let max_offset = (extent - height).max(0.0);
        entry.offset = (entry.offset + delta).clamp(0.0, max_offset);
    }

    pub fn offset(&self, path: &ValuePath) -> f32 {
        self.entries
            .get(path)
            .map(|entry| entry.offset)
            .unwrap_or(0.0)
    }

    pub fn record(&mut self, path: &ValuePath, index: usize, size: f32) {
        let entry = self.entries.entry(path.clone()).or_default();
        entry.sizes.record(index, size);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_ITEM_SIZE, EstimatedSizes, ItemSizer, OVERSCAN, Viewport, WindowStates,
        plan_window,
    };
    use crate::core::value_path::ValuePath;

    /// Deterministic stand-in for a rendering surface: sizes alternate
    /// between short and tall items.
    struct StepSizes;

    impl ItemSizer for StepSizes {
        fn estimate(&self, index: usize) -> f32 {
            if index % 2 == 0 { 10.0 } else { 30.0 }
        }

        fn record(&mut self, _index: usize, _size: f32) {}
    }

    fn viewport(offset: f32, height: f32) -> Viewport {
        Viewport { offset, height }
    }

    #[test]
    fn planned_count_is_bounded_by_viewport_and_overscan() {
        let sizes = EstimatedSizes::default();
        let height = 10.0 * DEFAULT_ITEM_SIZE;
        let visible_bound = 11; // height / item size, plus one partial row

        for len in [1_000usize, 100_000] {
            let mid = len as f32 * DEFAULT_ITEM_SIZE / 2.0;
            let plan = plan_window(&sizes, len, viewport(mid, height), OVERSCAN);
            assert!(
                plan.range.len() <= visible_bound + 2 * OVERSCAN,
                "planned {} items for len {}",
                plan.range.len(),
                len
            );
        }
    }

    #[test]
    fn planned_count_is_independent_of_total_length() {
        let sizes = EstimatedSizes::default();
        let height = 10.0 * DEFAULT_ITEM_SIZE;

        let small = plan_window(&sizes, 1_000, viewport(100.0 * 28.0, height), OVERSCAN);
        let large = plan_window(&sizes, 100_000, viewport(100.0 * 28.0, height), OVERSCAN);
        assert_eq!(small.range.len(), large.range.len());
    }

    #[test]
    fn total_extent_sums_every_estimate() {
        let plan = plan_window(&StepSizes, 10, viewport(0.0, 40.0), 0);
        // Five items at 10.0 and five at 30.0.
        assert_eq!(plan.total_extent, 200.0);
    }

    #[test]
    fn offsets_accumulate_preceding_sizes() {
        let plan = plan_window(&StepSizes, 6, viewport(0.0, 1000.0), 0);
        assert_eq!(plan.range, 0..6);
        assert_eq!(plan.offsets, vec![0.0, 10.0, 40.0, 50.0, 80.0, 90.0]);
    }

    #[test]
    fn scrolling_to_the_middle_plans_middle_items() {
        let sizes = EstimatedSizes::default();
        let len = 150usize;
        let mid = 75.0 * DEFAULT_ITEM_SIZE;
        let plan = plan_window(&sizes, len, viewport(mid, 10.0 * DEFAULT_ITEM_SIZE), OVERSCAN);

        assert!(plan.range.start >= 65, "range starts at {}", plan.range.start);
        assert!(plan.range.end <= 96, "range ends at {}", plan.range.end);
    }

    #[test]
    fn measurements_change_later_plans() {
        let mut sizes = EstimatedSizes::default();
        let before = plan_window(&sizes, 100, viewport(0.0, 5.0 * DEFAULT_ITEM_SIZE), 0);

        // The first item turns out to fill the whole viewport.
        sizes.record(0, 5.0 * DEFAULT_ITEM_SIZE);
        let after = plan_window(&sizes, 100, viewport(0.0, 5.0 * DEFAULT_ITEM_SIZE), 0);

        assert!(after.range.len() < before.range.len());
        assert_eq!(after.range, 0..1);
    }

    #[test]
    fn overscan_clamps_at_both_ends() {
        let sizes = EstimatedSizes::default();
        let top = plan_window(&sizes, 1_000, viewport(0.0, 28.0), OVERSCAN);
        assert_eq!(top.range.start, 0);

        let bottom = plan_window(&sizes, 1_000, viewport(1e9, 28.0), OVERSCAN);
        assert_eq!(bottom.range.end, 1_000);
    }

    #[test]
    fn window_states_scrolls_with_clamping() {
        let mut windows = WindowStates::new(10.0 * DEFAULT_ITEM_SIZE);
        let path = ValuePath::root().child_key("rows");

        windows.scroll_by(&path, 100, -500.0);
        assert_eq!(windows.offset(&path), 0.0);

        windows.scroll_by(&path, 100, 1e9);
        let max = 90.0 * DEFAULT_ITEM_SIZE;
        assert_eq!(windows.offset(&path), max);
    }

    #[test]
    fn unknown_paths_plan_with_defaults() {
        let windows = WindowStates::new(10.0 * DEFAULT_ITEM_SIZE);
        let plan = windows.plan(&ValuePath::root(), 500);
        assert_eq!(plan.range.start, 0);
        assert!(!plan.is_empty());
    }
}
