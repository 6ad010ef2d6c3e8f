pub mod assembler;
pub use assembler::ReportArtifact;
pub use assembler::ReportAssembler;

pub mod deck;
pub mod file_name;
pub mod format;
pub mod layout;

pub mod picture;
pub use picture::ImageError;
pub use picture::Picture;

pub mod pptx;

pub mod source;
pub use source::HttpImageSource;
pub use source::ImageSource;
