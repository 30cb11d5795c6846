//! Each module contains `impl Database` blocks for one table or a small family of tables.

mod control_files;
mod entries;
mod files;
mod food;
mod green_notes;
mod houses;
mod tasks;
mod topics;
mod tracking;
mod unclassified_tasks;
