// Settings module
// Timeline configuration with documented defaults, resolved once per render.

use serde::{Deserialize, Serialize};

use crate::models::ui::ViewKind;

/// Smallest empty-slot width that still leaves room for a day label.
pub const MIN_EMPTY_SLOT_WIDTH: f32 = 12.0;
/// Smallest width of a compressed (non-anchor) day-view slot.
pub const MIN_COMPRESSED_SLOT_WIDTH: f32 = 4.0;
pub const MIN_DAY_SLOT_MINUTES: u32 = 5;
pub const MAX_DAY_SLOT_MINUTES: u32 = 240;

/// Whether day view covers the whole day or only configured work hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayRangeMode {
    #[default]
    Full,
    Work,
}

/// Work hours for day view; `end_hour` 24 means midnight of the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for WorkHours {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 18,
        }
    }
}

/// Named range of ISO weeks shown in sprint view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintDefinition {
    pub name: String,
    pub start_week: u32,
    pub end_week: u32,
}

impl SprintDefinition {
    pub fn covers(&self, week: u32) -> bool {
        self.start_week <= week && week <= self.end_week
    }
}

/// Column width allocation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Fixed,
    /// Empty slots shrink, slots with events keep the base width.
    Shrink,
    /// Empty slots shrink and the freed width goes to slots with events.
    Redistribute,
}

/// Which slots receive extra width when filling the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillTarget {
    #[default]
    All,
    Events,
}

/// How an empty-cell press creates events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreateMode {
    #[default]
    Drag,
    Click,
}

/// Base slot width per view, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotWidths {
    pub month: f32,
    /// Minimum for week view; week slots stretch to fill the viewport.
    pub week: f32,
    pub day: f32,
    pub sprint: f32,
}

impl Default for SlotWidths {
    fn default() -> Self {
        Self {
            month: 48.0,
            week: 120.0,
            day: 64.0,
            sprint: 56.0,
        }
    }
}

impl SlotWidths {
    pub fn for_view(&self, view: ViewKind) -> f32 {
        match view {
            ViewKind::Month => self.month,
            ViewKind::Week => self.week,
            ViewKind::Day => self.day,
            ViewKind::Sprint => self.sprint,
        }
    }
}

/// chrono format strings for slot header labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelFormats {
    pub month: String,
    pub week: String,
    pub day: String,
}

impl Default for LabelFormats {
    fn default() -> Self {
        Self {
            month: "%a %-d".to_string(),
            week: "%a %-d %b".to_string(),
            day: "%H:%M".to_string(),
        }
    }
}

/// Row virtualization and overscan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualizationConfig {
    pub enabled: bool,
    pub row_overscan: usize,
    pub column_overscan: usize,
}

impl Default for VirtualizationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            row_overscan: 4,
            column_overscan: 4,
        }
    }
}

/// Gesture permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub creatable: bool,
    pub draggable: bool,
    pub resizable: bool,
    pub deletable: bool,
    /// Disables every mutating gesture regardless of the flags above.
    pub view_only: bool,
    pub create_mode: CreateMode,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            creatable: true,
            draggable: true,
            resizable: true,
            deletable: true,
            view_only: false,
            create_mode: CreateMode::Drag,
        }
    }
}

impl GestureConfig {
    pub fn can_create(&self) -> bool {
        self.creatable && !self.view_only
    }

    pub fn can_drag(&self) -> bool {
        self.draggable && !self.view_only
    }

    pub fn can_resize(&self) -> bool {
        self.resizable && !self.view_only
    }

    pub fn can_delete(&self) -> bool {
        self.deletable && !self.view_only
    }
}

/// Edge autoscroll tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoScrollConfig {
    /// Distance from a viewport edge, in pixels, where scrolling starts.
    pub edge_margin: f32,
    /// Pixels scrolled per frame with the pointer on (or past) the edge.
    pub max_speed: f32,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            edge_margin: 48.0,
            max_speed: 24.0,
        }
    }
}

/// Complete timeline configuration.
///
/// Every field has a default; a TOML file only needs the keys it changes.
/// Call [`TimelineConfig::resolve`] before use so out-of-range values are
/// clamped instead of rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub view: ViewKind,
    /// IANA zone name; unknown names fall back to UTC.
    pub time_zone: String,
    /// 0 = Sunday, 1 = Monday, etc.
    pub week_starts_on: u8,
    /// Day-view slot length, clamped to 5..=240.
    pub day_slot_minutes: u32,
    pub day_range_mode: DayRangeMode,
    pub work_hours: WorkHours,
    pub sprint_definitions: Vec<SprintDefinition>,

    pub slot_widths: SlotWidths,
    /// Width of slots with no event under shrink/redistribute.
    pub empty_slot_width: f32,
    /// Width of non-anchor slots under day-view anchor compression.
    pub compressed_slot_width: f32,
    /// Upper bound for redistributed slot widths, as a multiple of the base.
    pub redistribute_max_multiple: f32,
    pub layout_mode: LayoutMode,
    /// Day view only: keep full width only on slots with event labels.
    pub anchor_compression: bool,
    /// Spans longer than this many slots get a midpoint anchor.
    pub anchor_midpoint_min_slots: usize,
    pub fill_container: bool,
    pub fill_target: FillTarget,

    pub row_height: f32,
    pub group_row_height: f32,
    pub event_height: f32,
    pub lane_gap: f32,
    pub row_padding: f32,
    pub max_lanes_per_row: usize,
    pub more_indicator_height: f32,

    pub virtualization: VirtualizationConfig,
    pub gestures: GestureConfig,
    pub autoscroll: AutoScrollConfig,
    pub labels: LabelFormats,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            view: ViewKind::Month,
            time_zone: "UTC".to_string(),
            week_starts_on: 1,
            day_slot_minutes: 60,
            day_range_mode: DayRangeMode::Full,
            work_hours: WorkHours::default(),
            sprint_definitions: Vec::new(),
            slot_widths: SlotWidths::default(),
            empty_slot_width: 16.0,
            compressed_slot_width: 12.0,
            redistribute_max_multiple: 4.0,
            layout_mode: LayoutMode::Fixed,
            anchor_compression: false,
            anchor_midpoint_min_slots: 6,
            fill_container: true,
            fill_target: FillTarget::All,
            row_height: 40.0,
            group_row_height: 28.0,
            event_height: 22.0,
            lane_gap: 2.0,
            row_padding: 4.0,
            max_lanes_per_row: 4,
            more_indicator_height: 16.0,
            virtualization: VirtualizationConfig::default(),
            gestures: GestureConfig::default(),
            autoscroll: AutoScrollConfig::default(),
            labels: LabelFormats::default(),
        }
    }
}

impl TimelineConfig {
    /// Return a copy with every out-of-range value clamped to the nearest
    /// valid one. Each adjustment is logged.
    pub fn resolve(&self) -> TimelineConfig {
        let mut resolved = self.clone();

        if resolved.week_starts_on > 6 {
            log::warn!("week_starts_on {} out of range, using {}", resolved.week_starts_on, resolved.week_starts_on % 7);
            resolved.week_starts_on %= 7;
        }

        let minutes = resolved
            .day_slot_minutes
            .clamp(MIN_DAY_SLOT_MINUTES, MAX_DAY_SLOT_MINUTES);
        if minutes != resolved.day_slot_minutes {
            log::warn!("day_slot_minutes {} clamped to {}", resolved.day_slot_minutes, minutes);
            resolved.day_slot_minutes = minutes;
        }

        let hours = &mut resolved.work_hours;
        hours.start_hour = hours.start_hour.min(23);
        hours.end_hour = hours.end_hour.min(24);
        if hours.end_hour <= hours.start_hour {
            log::warn!(
                "work hours {}..{} are empty, day view falls back to the full day",
                hours.start_hour,
                hours.end_hour
            );
            *hours = WorkHours {
                start_hour: 0,
                end_hour: 24,
            };
        }

        let widths = &mut resolved.slot_widths;
        for width in [&mut widths.month, &mut widths.week, &mut widths.day, &mut widths.sprint] {
            if !width.is_finite() || *width < MIN_EMPTY_SLOT_WIDTH {
                *width = MIN_EMPTY_SLOT_WIDTH;
            }
        }

        if !resolved.empty_slot_width.is_finite() || resolved.empty_slot_width < MIN_EMPTY_SLOT_WIDTH {
            log::warn!("empty_slot_width {} clamped to {}", resolved.empty_slot_width, MIN_EMPTY_SLOT_WIDTH);
            resolved.empty_slot_width = MIN_EMPTY_SLOT_WIDTH;
        }
        if !resolved.compressed_slot_width.is_finite()
            || resolved.compressed_slot_width < MIN_COMPRESSED_SLOT_WIDTH
        {
            resolved.compressed_slot_width = MIN_COMPRESSED_SLOT_WIDTH;
        }
        if !resolved.redistribute_max_multiple.is_finite() || resolved.redistribute_max_multiple < 1.0 {
            resolved.redistribute_max_multiple = 1.0;
        }
        resolved.anchor_midpoint_min_slots = resolved.anchor_midpoint_min_slots.max(2);

        if resolved.max_lanes_per_row == 0 {
            log::warn!("max_lanes_per_row must be at least 1");
            resolved.max_lanes_per_row = 1;
        }
        for size in [
            &mut resolved.row_height,
            &mut resolved.group_row_height,
            &mut resolved.event_height,
        ] {
            if !size.is_finite() || *size < 1.0 {
                *size = 1.0;
            }
        }
        for spacing in [
            &mut resolved.lane_gap,
            &mut resolved.row_padding,
            &mut resolved.more_indicator_height,
        ] {
            if !spacing.is_finite() || *spacing < 0.0 {
                *spacing = 0.0;
            }
        }

        let scroll = &mut resolved.autoscroll;
        if !scroll.edge_margin.is_finite() || scroll.edge_margin < 1.0 {
            scroll.edge_margin = 1.0;
        }
        if !scroll.max_speed.is_finite() || scroll.max_speed < 0.0 {
            scroll.max_speed = 0.0;
        }

        resolved
    }

    /// Layout mode after view restrictions: adaptive modes apply to month
    /// and day views only.
    pub fn effective_layout_mode(&self) -> LayoutMode {
        if self.view.supports_adaptive_columns() {
            self.layout_mode
        } else {
            LayoutMode::Fixed
        }
    }

    pub fn uses_anchor_compression(&self) -> bool {
        self.anchor_compression && self.view == ViewKind::Day
    }

    /// Height of a resource row showing `lanes` stacked events.
    pub fn resource_row_height(&self, lanes: usize, has_hidden: bool) -> f32 {
        let lanes = lanes.min(self.max_lanes_per_row);
        let mut content = self.row_padding * 2.0;
        if lanes > 0 {
            content += lanes as f32 * self.event_height + (lanes - 1) as f32 * self.lane_gap;
        }
        if has_hidden {
            content += self.more_indicator_height;
        }
        content.max(self.row_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_already_resolved() {
        let config = TimelineConfig::default();
        assert_eq!(config.resolve(), config);
    }

    #[test]
    fn test_resolve_clamps_slot_minutes() {
        let mut config = TimelineConfig::default();
        config.day_slot_minutes = 1;
        assert_eq!(config.resolve().day_slot_minutes, 5);
        config.day_slot_minutes = 1000;
        assert_eq!(config.resolve().day_slot_minutes, 240);
    }

    #[test]
    fn test_resolve_clamps_lane_cap_and_widths() {
        let mut config = TimelineConfig::default();
        config.max_lanes_per_row = 0;
        config.empty_slot_width = 2.0;
        config.redistribute_max_multiple = 0.5;
        let resolved = config.resolve();
        assert_eq!(resolved.max_lanes_per_row, 1);
        assert_eq!(resolved.empty_slot_width, MIN_EMPTY_SLOT_WIDTH);
        assert_eq!(resolved.redistribute_max_multiple, 1.0);
    }

    #[test]
    fn test_resolve_repairs_inverted_work_hours() {
        let mut config = TimelineConfig::default();
        config.work_hours = WorkHours {
            start_hour: 17,
            end_hour: 9,
        };
        assert_eq!(
            config.resolve().work_hours,
            WorkHours {
                start_hour: 0,
                end_hour: 24
            }
        );
    }

    #[test]
    fn test_adaptive_mode_only_for_month_and_day() {
        let mut config = TimelineConfig::default();
        config.layout_mode = LayoutMode::Redistribute;
        config.view = ViewKind::Week;
        assert_eq!(config.effective_layout_mode(), LayoutMode::Fixed);
        config.view = ViewKind::Day;
        assert_eq!(config.effective_layout_mode(), LayoutMode::Redistribute);
    }

    #[test]
    fn test_resource_row_height() {
        let config = TimelineConfig::default();
        // Empty row keeps the minimum height.
        assert_eq!(config.resource_row_height(0, false), 40.0);
        // 3 lanes: 4*2 + 3*22 + 2*2 = 78
        assert_eq!(config.resource_row_height(3, false), 78.0);
        // Capped at 4 lanes plus the indicator strip: 8 + 88 + 6 + 16 = 118
        assert_eq!(config.resource_row_height(9, true), 118.0);
    }

    #[test]
    fn test_view_only_blocks_gestures() {
        let gestures = GestureConfig {
            view_only: true,
            ..GestureConfig::default()
        };
        assert!(!gestures.can_create());
        assert!(!gestures.can_drag());
        assert!(!gestures.can_resize());
        assert!(!gestures.can_delete());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: TimelineConfig = toml::from_str(
            r#"
            view = "day"
            time_zone = "Europe/Berlin"
            day_slot_minutes = 30

            [gestures]
            create_mode = "click"
            "#,
        )
        .unwrap();
        assert_eq!(config.view, ViewKind::Day);
        assert_eq!(config.day_slot_minutes, 30);
        assert_eq!(config.gestures.create_mode, CreateMode::Click);
        assert!(config.gestures.draggable);
        assert_eq!(config.row_height, 40.0);
    }
}
