use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::CoreError;
use crate::models::chart::BarChart;
use crate::models::view::{DashboardView, ListView};

/// A frontend component that redraws itself from tracker views.
///
/// Registered with `ExpenseTracker::subscribe`. After every successful
/// mutation each observer gets the full dashboard; toggling the list only
/// sends the new list. An error aborts the notification round and is
/// returned from the operation that triggered it.
pub trait ExpenseObserver {
    /// Collection changed: list, total and chart all need redrawing.
    fn expenses_changed(&mut self, view: &DashboardView) -> Result<(), CoreError>;

    /// The list was expanded or collapsed. Only the list changes.
    fn list_toggled(&mut self, list: &ListView) -> Result<(), CoreError> {
        let _ = list;
        Ok(())
    }
}

/// Shared observers: the host keeps one clone to read state back while the
/// tracker holds the other.
impl<T: ExpenseObserver + ?Sized> ExpenseObserver for Rc<RefCell<T>> {
    fn expenses_changed(&mut self, view: &DashboardView) -> Result<(), CoreError> {
        self.borrow_mut().expenses_changed(view)
    }

    fn list_toggled(&mut self, list: &ListView) -> Result<(), CoreError> {
        self.borrow_mut().list_toggled(list)
    }
}

/// Something that can draw a bar chart and later tear it down
/// (a canvas with a charting library, a terminal pane, ...).
pub trait ChartSurface {
    /// Token identifying one drawn chart.
    type Handle;

    fn draw(&mut self, chart: &BarChart) -> Result<Self::Handle, CoreError>;

    fn destroy(&mut self, handle: Self::Handle);
}
