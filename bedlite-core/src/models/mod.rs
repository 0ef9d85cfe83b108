pub mod bed_record;
pub mod interval;
pub mod strand;

// re-export for cleaner imports
pub use self::bed_record::BedRecord;
pub use self::interval::Interval;
pub use self::strand::Strand;
