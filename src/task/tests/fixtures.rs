//! Builders shared by the task tests.

use crate::task::domain::{Link, LinkId, LinkKind, Task, TaskId, TaskKind};
use chrono::NaiveDate;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub(super) fn jan(day: u32) -> NaiveDate {
    date(2025, 1, day)
}

pub(super) fn id(value: u64) -> TaskId {
    TaskId::new(value).expect("non-zero task id")
}

pub(super) fn link_id(value: u64) -> LinkId {
    LinkId::new(value).expect("non-zero link id")
}

pub(super) fn issue(value: u64, title: &str) -> Task {
    Task::new(id(value), title, TaskKind::issue())
}

pub(super) fn milestone(value: u64, title: &str) -> Task {
    Task::new(id(value), title, TaskKind::milestone())
}

pub(super) fn scheduled(task: Task, start: NaiveDate, end: NaiveDate) -> Task {
    task.with_schedule(Some(start), Some(end))
        .expect("end on or after start")
}

pub(super) fn link(value: u64, source: u64, target: u64, kind: LinkKind) -> Link {
    Link::new(link_id(value), id(source), id(target), kind).expect("distinct endpoints")
}
