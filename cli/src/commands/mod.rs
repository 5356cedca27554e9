mod add;
mod analyze;
mod calendar;
mod export;
mod goal;
mod helpers;
mod prune;
mod summary;

pub(crate) use add::cmd_add;
pub(crate) use analyze::cmd_analyze;
pub(crate) use calendar::cmd_calendar;
pub(crate) use export::{cmd_export_entries, cmd_export_month};
pub(crate) use goal::{cmd_goal_set, cmd_goal_show};
pub(crate) use prune::cmd_prune;
pub(crate) use summary::{cmd_history, cmd_summary};
