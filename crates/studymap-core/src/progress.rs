//! Progress tracking: pure toggles over a roadmap's sub-items.

use thiserror::Error;

use crate::model::Roadmap;

/// How a caller points at one sub-item within a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSelector {
    /// 1-based position within the period.
    Index(usize),
    /// Exact label match; the first occurrence wins on duplicates.
    Label(String),
}

impl ItemSelector {
    /// Interpret user-facing input: digits become an index, anything else
    /// a label.
    ///
    /// Index always wins, so an item whose label is itself all digits can
    /// only be addressed by position, never by label.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<usize>() {
            Ok(n) => Self::Index(n),
            Err(_) => Self::Label(raw.trim().to_owned()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToggleError {
    #[error("no period with index {0}")]
    PeriodNotFound(u32),
    #[error("no item {selector:?} in period {period}")]
    ItemNotFound { period: u32, selector: ItemSelector },
}

/// Flip one sub-item's completion state and return the updated roadmap.
///
/// The input is untouched; on error the caller still holds the original.
/// Applying the same toggle twice returns a roadmap structurally equal to
/// the starting one.
pub fn toggle(
    roadmap: &Roadmap,
    period_index: u32,
    selector: &ItemSelector,
) -> Result<Roadmap, ToggleError> {
    let mut updated = roadmap.clone();

    let period = updated
        .periods
        .iter_mut()
        .find(|p| p.index == period_index)
        .ok_or(ToggleError::PeriodNotFound(period_index))?;

    let item = match selector {
        ItemSelector::Index(n) => {
            let slot = n.checked_sub(1).and_then(|i| period.items.get_mut(i));
            slot.ok_or_else(|| ToggleError::ItemNotFound {
                period: period_index,
                selector: selector.clone(),
            })?
        }
        ItemSelector::Label(label) => period
            .items
            .iter_mut()
            .find(|i| &i.label == label)
            .ok_or_else(|| ToggleError::ItemNotFound {
                period: period_index,
                selector: selector.clone(),
            })?,
    };

    item.completed = !item.completed;
    tracing::debug!(
        period = period_index,
        label = %item.label,
        completed = item.completed,
        "toggled item"
    );

    updated.recompute_progress();
    Ok(updated)
}
