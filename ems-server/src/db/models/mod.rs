//! Database Models

// Serde helpers
pub mod serde_helpers;

// Identity
pub mod profile;

// Organization
pub mod department;
pub mod employee;

// Records
pub mod attendance;
pub mod leave;
pub mod payroll;

// Settings
pub mod settings;

// Tasks
pub mod task;

// Re-exports
pub use profile::{Profile, ProfileCreate, ProfileContactUpdate, ProfileId};
pub use department::{Department, DepartmentCreate, DepartmentUpdate};
pub use employee::{Employee, EmployeeCreate, EmployeeUpdate};
pub use attendance::AttendanceRecord;
pub use leave::{LeaveRequest, LeaveRequestCreate, LeaveStatus};
pub use payroll::{PayrollGenerateRequest, PayrollRecord};
pub use settings::{
    Holiday, HolidayCreate, JobRole, JobRoleCreate, LeaveType, LeaveTypeCreate, WorkingHours,
    WorkingHoursCreate,
};
pub use task::{
    AssigneeDecision, AssigneeStatus, Task, TaskAssignee, TaskAssigneeCreate, TaskCreate,
    TaskStatus,
};
