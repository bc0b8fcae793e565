pub mod enrollments;
pub mod init;
pub mod maintenance;
pub mod programs;
