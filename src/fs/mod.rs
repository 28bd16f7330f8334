mod descriptor;
mod dir;
mod file;

pub use descriptor::FileDescriptor;
pub use dir::Directory;
pub use file::File;
