/// Process information and CPU/memory snapshots.
pub mod sys_info;
