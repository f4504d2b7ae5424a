mod repair;

pub use repair::RepairRecord;
