mod summary;

pub use summary::write_plan_summary;
