pub mod decode;
pub mod extraction;
pub mod validate;

pub use decode::{decode, DecodeError, DecodeSuccess};
pub use extraction::KernelExtractor;
pub use validate::{looks_like_kernel_image, REJECTION_REASON};
