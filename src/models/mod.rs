pub mod course;
pub mod faculty;
pub mod loaders;
pub mod term;
pub mod work;

pub use course::{
    CombinedRecord, CourseContent, ExamEntry, ExportRecord, ModuleLite, ModuleSchedule,
    ScheduleEntry,
};
pub use faculty::{Faculty, FacultyTable};
pub use loaders::load_faculty_table;
pub use term::{current_term, select_latest_term, split_term, AcademicTerm};
pub use work::{ExamWork, GroupWork, WorkPlan};
