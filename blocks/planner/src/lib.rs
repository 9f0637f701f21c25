//! Operations that span more than one atom: scoped task views, the space
//! deletion cascade, sub-list item arrangement and the purge sweep.

pub mod maintenance;
pub mod spaces;
pub mod sublists;
pub mod tasks;
