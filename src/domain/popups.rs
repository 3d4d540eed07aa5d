//! Popup activation window and display helpers.

use time::Date;

use crate::domain::entities::PopupRecord;
use crate::domain::error::DomainError;

pub const DEFAULT_DISPLAY_ORDER: i32 = 1;
/// Sort rank of a popup without a display order; it goes after every ranked one.
pub const UNRANKED_DISPLAY_ORDER: i32 = 999;
/// Size used when none is stored; also pre-filled on the create form.
pub const DEFAULT_SIZE_PERCENTAGE: i32 = 80;
/// Stored position meaning "centre horizontally".
pub const CENTERED_POSITION: i32 = -1;
/// Offset between stacked popups, applied to `top` and to unpositioned `left`.
pub const CASCADE_STEP_PX: i32 = 50;
pub const MIN_SIZE_PERCENTAGE: i32 = 10;
pub const MAX_SIZE_PERCENTAGE: i32 = 100;
/// Length of the activation window pre-filled on the create form.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

impl PopupRecord {
    /// Active and inside the inclusive `[start_date, end_date]` window.
    pub fn is_displayable_on(&self, day: Date) -> bool {
        self.is_active && self.start_date <= day && day <= self.end_date
    }

    pub fn position_display(&self) -> String {
        position_display(self.position)
    }

    pub fn display_order_or_default(&self) -> i32 {
        self.display_order.unwrap_or(DEFAULT_DISPLAY_ORDER)
    }

    pub fn size_percentage_or_default(&self) -> i32 {
        self.size_percentage.unwrap_or(DEFAULT_SIZE_PERCENTAGE)
    }

    pub fn display_rank(&self) -> i32 {
        self.display_order.unwrap_or(UNRANKED_DISPLAY_ORDER)
    }

    /// Where the popup sits when it is the `index`-th one shown.
    pub fn placement(&self, index: usize) -> PopupPlacement {
        let step = cascade_offset(index);
        let left = match self.position {
            Some(CENTERED_POSITION) => HorizontalPlacement::Centered,
            Some(px) => HorizontalPlacement::Left(px),
            None => HorizontalPlacement::Left(step),
        };
        PopupPlacement { left, top: step }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalPlacement {
    Centered,
    Left(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupPlacement {
    pub left: HorizontalPlacement,
    pub top: i32,
}

fn cascade_offset(index: usize) -> i32 {
    i32::try_from(index)
        .unwrap_or(i32::MAX)
        .saturating_mul(CASCADE_STEP_PX)
}

/// Pixel offset shown in the popup table; a missing position reads as `0px`.
pub fn position_display(position: Option<i32>) -> String {
    match position {
        Some(value) => format!("{value}px"),
        None => "0px".to_string(),
    }
}

pub fn ensure_window(start_date: Date, end_date: Date) -> Result<(), DomainError> {
    if start_date > end_date {
        return Err(DomainError::validation(format!(
            "popup window starts on {start_date} after it ends on {end_date}"
        )));
    }
    Ok(())
}
