/// Filesystem reads and writes for notes, catalogs, and datasets.
pub mod fs;
