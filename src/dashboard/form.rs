//! Form state: chart type plus start/end dates.

use chrono::NaiveDate;

use crate::api::DashboardQuery;
use crate::domain::{ChartType, DateRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

/// Every field is optional so an incomplete form can be represented (and refused).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardForm {
    pub chart_type: Option<ChartType>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DashboardForm {
    /// Pie chart over the default range ending `today`.
    pub fn new(today: NaiveDate) -> Self {
        let range = DateRange::default_for(today);
        Self {
            chart_type: Some(ChartType::Pie),
            start: Some(range.start),
            end: Some(range.end),
        }
    }

    pub fn get(&self, field: DateField) -> Option<NaiveDate> {
        match field {
            DateField::Start => self.start,
            DateField::End => self.end,
        }
    }

    pub fn set(&mut self, field: DateField, value: Option<NaiveDate>) {
        match field {
            DateField::Start => self.start = value,
            DateField::End => self.end = value,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.query().is_some()
    }

    /// The request selector, or `None` while any field is missing.
    pub fn query(&self) -> Option<DashboardQuery> {
        Some(DashboardQuery {
            chart_type: self.chart_type?,
            range: DateRange::new(self.start?, self.end?),
        })
    }
}
