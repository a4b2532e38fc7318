pub mod codecs;
pub mod extract;
pub mod headers;
pub mod util;

pub use codecs::*;
pub use extract::*;
pub use headers::*;
pub use util::*;
