pub mod file;
pub mod traits;

// Re-export
pub use file::FileAttendanceRepository;
pub use traits::AttendanceRepository;
