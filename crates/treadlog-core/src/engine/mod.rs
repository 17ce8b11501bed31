//! Per-year equipment assignment.
//!
//! For a tracked year the engine derives two views over the registry:
//! the *base* pick per category (newest item in use before the year began)
//! and the *new* pick (newest item in use by the end of the year). Both are
//! computed on first use and cached for the lifetime of the engine; build a
//! fresh engine to see registry changes or to switch year.

pub mod name_map;
mod rules;

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::info;

use crate::config::{RouteOverride, TrackerConfig};
use crate::dates::{current_year, end_of_year};
use crate::errors::TrackerResult;
use crate::models::{CategoryPick, EquipmentRef};
use crate::registry::EquipmentRegistry;

pub use name_map::NameMap;

/// One pick per category, keyed by category name.
pub type CategoryView = BTreeMap<String, CategoryPick>;

pub struct AssignmentEngine<'r> {
    registry: &'r EquipmentRegistry,
    tracked_year: i32,
    route_cutover: NaiveDate,
    route_locations: BTreeSet<String>,
    route_equipment: EquipmentRef,
    base: OnceCell<CategoryView>,
    new: OnceCell<CategoryView>,
    names: OnceCell<NameMap>,
}

impl<'r> AssignmentEngine<'r> {
    /// An engine for `year`, or for the current calendar year when `None`.
    pub fn new(registry: &'r EquipmentRegistry, year: Option<i32>) -> Self {
        Self::build(
            registry,
            year.unwrap_or_else(current_year),
            &RouteOverride::default(),
        )
    }

    pub fn from_config(registry: &'r EquipmentRegistry, config: &TrackerConfig) -> Self {
        Self::build(
            registry,
            config.resolve_tracked_year(),
            &config.route_override,
        )
    }

    fn build(registry: &'r EquipmentRegistry, tracked_year: i32, route: &RouteOverride) -> Self {
        info!(tracked_year, "assignment engine created");
        Self {
            registry,
            tracked_year,
            route_cutover: route.cutover,
            route_locations: route.locations.iter().map(|l| l.to_lowercase()).collect(),
            route_equipment: route.equipment.clone(),
            base: OnceCell::new(),
            new: OnceCell::new(),
            names: OnceCell::new(),
        }
    }

    pub fn tracked_year(&self) -> i32 {
        self.tracked_year
    }

    pub fn registry(&self) -> &'r EquipmentRegistry {
        self.registry
    }

    /// Newest item per category whose start date is on or before 31 December
    /// of the previous year.
    pub fn base_equipment(&self) -> TrackerResult<&CategoryView> {
        cached(&self.base, || {
            let view = self.latest_by_category(end_of_year(self.tracked_year.saturating_sub(1))?);
            info!(year = self.tracked_year, ?view, "base equipment");
            Ok(view)
        })
    }

    /// Newest item per category whose start date is on or before 31 December
    /// of the tracked year. Equals the base pick when nothing newer arrived.
    pub fn new_equipment(&self) -> TrackerResult<&CategoryView> {
        cached(&self.new, || {
            let view = self.latest_by_category(end_of_year(self.tracked_year)?);
            info!(year = self.tracked_year, ?view, "new equipment");
            Ok(view)
        })
    }

    /// `base<Category>` / `new<Category>` labels mapped to equipment names.
    pub fn name_map(&self) -> TrackerResult<&NameMap> {
        if let Some(names) = self.names.get() {
            return Ok(names);
        }
        let mut names = NameMap::new();
        for (category, pick) in self.base_equipment()? {
            names.insert(format!("base{category}"), pick.name.clone());
        }
        for (category, pick) in self.new_equipment()? {
            names.insert(format!("new{category}"), pick.name.clone());
        }
        Ok(self.names.get_or_init(|| names))
    }

    /// Scan in storage order so that, on equal start dates, the earlier row
    /// wins.
    fn latest_by_category(&self, cutoff: NaiveDate) -> CategoryView {
        let mut view = CategoryView::new();
        for record in self.registry.records() {
            let Some(start_date) = record.start_date else {
                continue;
            };
            if start_date > cutoff {
                continue;
            }
            let newer = view
                .get(&record.category)
                .map_or(true, |pick| start_date > pick.start_date);
            if newer {
                view.insert(
                    record.category.clone(),
                    CategoryPick {
                        row_index: record.index,
                        start_date,
                        name: record.name.clone(),
                    },
                );
            }
        }
        view
    }

    /// Earliest item of `category` introduced during the tracked year.
    fn first_of_year(&self, category: &str) -> TrackerResult<Option<CategoryPick>> {
        let start = end_of_year(self.tracked_year.saturating_sub(1))?;
        let end = end_of_year(self.tracked_year)?;
        let mut first: Option<CategoryPick> = None;
        for record in self.registry.records_in_category(category) {
            let Some(start_date) = record.start_date else {
                continue;
            };
            if start_date <= start || start_date > end {
                continue;
            }
            if first
                .as_ref()
                .map_or(true, |pick| start_date < pick.start_date)
            {
                first = Some(CategoryPick {
                    row_index: record.index,
                    start_date,
                    name: record.name.clone(),
                });
            }
        }
        Ok(first)
    }
}

fn cached<'c>(
    cell: &'c OnceCell<CategoryView>,
    build: impl FnOnce() -> TrackerResult<CategoryView>,
) -> TrackerResult<&'c CategoryView> {
    if let Some(view) = cell.get() {
        return Ok(view);
    }
    let view = build()?;
    Ok(cell.get_or_init(|| view))
}
