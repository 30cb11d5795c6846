mod control_file;
mod entry;
mod file;
mod food;
mod green_note;
mod house;
mod task;
mod topic;
mod tracking;

pub use control_file::*;
pub use entry::*;
pub use file::*;
pub use food::*;
pub use green_note::*;
pub use house::*;
pub use task::*;
pub use topic::*;
pub use tracking::*;
